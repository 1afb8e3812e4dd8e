use crate::domain::{is_normal, normal_of, VcsInventory};
use crate::error::{ReckonError, Result};
use crate::git::{InventorySupplier, TagSelector};
use git2::{ErrorCode, Oid, Repository};
use semver::Version;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A version tag, peeled to the commit it marks
#[derive(Debug, Clone)]
struct TaggedVersion {
    commit: Oid,
    version: Version,
}

/// Builds inventories from the tags and history of a git repository.
///
/// The repository is reopened for every inventory, so the supplier holds
/// no libgit2 handle and can be shared between threads.
#[derive(Debug, Clone)]
pub struct GitInventorySupplier {
    path: PathBuf,
    selector: TagSelector,
}

impl GitInventorySupplier {
    /// Discover the repository containing `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(GitInventorySupplier {
            path,
            selector: TagSelector::default(),
        })
    }

    pub fn with_selector(mut self, selector: TagSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn selector(&self) -> &TagSelector {
        &self.selector
    }

    fn repository(&self) -> Result<Repository> {
        Ok(Repository::open(&self.path)?)
    }

    /// Name of the checked-out branch, or `None` when HEAD is detached
    pub fn current_branch(&self) -> Result<Option<String>> {
        let repo = self.repository()?;
        let head = repo.find_reference("HEAD")?;

        Ok(head
            .symbolic_target()
            .and_then(|target| target.strip_prefix("refs/heads/"))
            .map(str::to_string))
    }

    /// Create a lightweight tag for `version` on HEAD, returning the tag name
    ///
    /// # Errors
    /// * `Git` - if HEAD has no commit or the tag already exists
    pub fn tag_head(&self, version: &Version) -> Result<String> {
        let repo = self.repository()?;
        let head = repo.head()?.peel_to_commit()?;
        let name = self.selector.format(version);

        repo.tag_lightweight(&name, head.as_object(), false)?;
        debug!(tag = name.as_str(), commit = %head.id(), "created tag");

        Ok(name)
    }

    fn tagged_versions(&self, repo: &Repository) -> Result<Vec<TaggedVersion>> {
        let names = repo.tag_names(None)?;
        let mut tagged = Vec::new();

        for name in names.iter().flatten() {
            let version = match self.selector.select(name) {
                None => continue,
                Some(Ok(version)) => version,
                Some(Err(e)) => {
                    warn!(tag = name, error = %e, "skipping tag that is not a version");
                    continue;
                }
            };

            let reference = repo.find_reference(&format!("refs/tags/{}", name))?;
            let commit = match reference.peel_to_commit() {
                Ok(commit) => commit.id(),
                Err(e) => {
                    warn!(tag = name, error = %e, "skipping tag that does not mark a commit");
                    continue;
                }
            };

            tagged.push(TaggedVersion { commit, version });
        }

        Ok(tagged)
    }
}

/// Whether `ancestor` is reachable from `descendant`, counting a commit as its own ancestor
fn reaches(repo: &Repository, descendant: Oid, ancestor: Oid) -> Result<bool> {
    Ok(descendant == ancestor || repo.graph_descendant_of(descendant, ancestor)?)
}

/// Highest version among the nearest tagged ancestors of `head`
///
/// A tagged ancestor is nearest when no other candidate commit lies between
/// it and `head`.
fn find_base<'a>(
    repo: &Repository,
    head: Oid,
    candidates: impl Iterator<Item = &'a TaggedVersion>,
) -> Result<Option<TaggedVersion>> {
    let mut ancestors = Vec::new();
    for tagged in candidates {
        if reaches(repo, head, tagged.commit)? {
            ancestors.push(tagged);
        }
    }

    let mut nearest: Vec<&TaggedVersion> = Vec::new();
    for &tagged in &ancestors {
        let mut shadowed = false;
        for other in &ancestors {
            if other.commit != tagged.commit
                && repo.graph_descendant_of(other.commit, tagged.commit)?
            {
                shadowed = true;
                break;
            }
        }
        if !shadowed {
            nearest.push(tagged);
        }
    }

    Ok(nearest
        .into_iter()
        .max_by(|a, b| a.version.cmp_precedence(&b.version))
        .cloned())
}

fn count_commits_since(repo: &Repository, head: Oid, base: Option<Oid>) -> Result<u32> {
    let mut revwalk = repo.revwalk()?;
    revwalk.push(head)?;
    if let Some(base) = base {
        revwalk.hide(base)?;
    }

    let mut count: u32 = 0;
    for oid in revwalk {
        oid?;
        count = count.saturating_add(1);
    }
    Ok(count)
}

/// Normals being developed on lines that forked from HEAD's history after the base normal
fn find_parallel_normals(
    repo: &Repository,
    head: Oid,
    base_normal: Option<&TaggedVersion>,
    tagged: &[TaggedVersion],
) -> Result<BTreeSet<Version>> {
    let mut parallel = BTreeSet::new();

    for candidate in tagged {
        if reaches(repo, head, candidate.commit)? {
            continue;
        }

        let normal = normal_of(&candidate.version);
        if let Some(base) = base_normal {
            if normal <= base.version {
                continue;
            }
        }

        let merge_base = match repo.merge_base(head, candidate.commit) {
            Ok(oid) => oid,
            Err(e) if e.code() == ErrorCode::NotFound => continue,
            Err(e) => return Err(ReckonError::Git(e)),
        };

        let forked_after_base = match base_normal {
            Some(base) => reaches(repo, merge_base, base.commit)?,
            None => true,
        };
        if forked_after_base {
            debug!(%normal, commit = %candidate.commit, "parallel normal");
            parallel.insert(normal);
        }
    }

    Ok(parallel)
}

impl InventorySupplier for GitInventorySupplier {
    fn inventory(&self) -> Result<VcsInventory> {
        let repo = self.repository()?;

        let head = match repo.head() {
            Ok(head) => head.peel_to_commit()?.id(),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                debug!("repository has no commits yet");
                return Ok(VcsInventory::empty());
            }
            Err(e) => return Err(ReckonError::Git(e)),
        };

        let tagged = self.tagged_versions(&repo)?;

        let current = tagged
            .iter()
            .filter(|t| t.commit == head)
            .map(|t| &t.version)
            .max_by(|a, b| a.cmp_precedence(b))
            .cloned();
        let base = find_base(&repo, head, tagged.iter())?;
        let base_normal =
            find_base(&repo, head, tagged.iter().filter(|t| is_normal(&t.version)))?;
        let commits_since_base =
            count_commits_since(&repo, head, base.as_ref().map(|b| b.commit))?;
        let parallel = find_parallel_normals(&repo, head, base_normal.as_ref(), &tagged)?;

        debug!(
            commit = %head,
            current = ?current.as_ref().map(ToString::to_string),
            base = ?base.as_ref().map(|b| b.version.to_string()),
            base_normal = ?base_normal.as_ref().map(|b| b.version.to_string()),
            commits_since_base,
            tags = tagged.len(),
            "built inventory"
        );

        let mut builder = VcsInventory::builder()
            .commit_id(head.to_string())
            .commits_since_base(commits_since_base)
            .parallel_normals(parallel)
            .claimed_versions(tagged.into_iter().map(|t| t.version));
        if let Some(current) = current {
            builder = builder.current_version(current);
        }
        if let Some(base) = base {
            builder = builder.base_version(base.version);
        }
        if let Some(base_normal) = base_normal {
            builder = builder.base_normal(base_normal.version);
        }

        builder.build()
    }
}
