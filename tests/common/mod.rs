#![allow(dead_code)]

use git2::{Commit, Oid, Repository};
use tempfile::TempDir;

/// Scratch repository whose commits all share the empty tree
pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");

        {
            let mut config = repo.config().expect("Could not get config");
            config
                .set_str("user.name", "Test User")
                .expect("Could not set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Could not set user.email");
        }
        repo.set_head("refs/heads/main")
            .expect("Could not point HEAD at main");

        TestRepo { dir, repo }
    }

    /// Commit onto `reference` (created if missing) with the given parents
    pub fn commit_on(&self, reference: &str, message: &str, parents: &[Oid]) -> Oid {
        let signature = self.repo.signature().expect("Could not get sig");
        let tree_id = self
            .repo
            .index()
            .expect("Could not get index")
            .write_tree()
            .expect("Could not write tree");
        let tree = self.repo.find_tree(tree_id).expect("Could not find tree");

        let parents: Vec<Commit> = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid).expect("Could not find parent"))
            .collect();
        let parents: Vec<&Commit> = parents.iter().collect();

        self.repo
            .commit(Some(reference), &signature, &signature, message, &tree, &parents)
            .expect("Could not create commit")
    }

    /// Commit onto the checked-out branch
    pub fn commit(&self, message: &str) -> Oid {
        let parents: Vec<Oid> = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.target())
            .into_iter()
            .collect();
        self.commit_on("HEAD", message, &parents)
    }

    pub fn tag(&self, name: &str, oid: Oid) {
        let object = self.repo.find_object(oid, None).expect("Could not find object");
        self.repo
            .tag_lightweight(name, &object, false)
            .expect("Could not create tag");
    }

    pub fn annotated_tag(&self, name: &str, oid: Oid) {
        let object = self.repo.find_object(oid, None).expect("Could not find object");
        let signature = self.repo.signature().expect("Could not get sig");
        self.repo
            .tag(name, &object, &signature, "release", false)
            .expect("Could not create annotated tag");
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }
}
