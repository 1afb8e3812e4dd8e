// tests/git_inventory_test.rs
mod common;

use common::TestRepo;
use git_reckon::domain::Scope;
use git_reckon::git::{GitInventorySupplier, InventorySupplier, TagSelector};
use git_reckon::strategy::{NoPreReleaseStrategy, ScopeNormalStrategy};
use git_reckon::{reckon_from, ReckonError};
use semver::Version;

fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

fn supplier(repo: &TestRepo) -> GitInventorySupplier {
    GitInventorySupplier::open(repo.path()).expect("Could not open repository")
}

#[test]
fn test_repository_without_commits_has_empty_inventory() {
    let repo = TestRepo::new();
    let inventory = supplier(&repo).inventory().unwrap();

    assert_eq!(inventory.commit_id(), "");
    assert!(inventory.current_version().is_none());
    assert!(inventory.base_version().is_none());
    assert!(inventory.claimed_versions().is_empty());
}

#[test]
fn test_untagged_history_counts_every_commit() {
    let repo = TestRepo::new();
    repo.commit("first");
    repo.commit("second");
    let head = repo.commit("third");

    let inventory = supplier(&repo).inventory().unwrap();
    assert_eq!(inventory.commit_id(), head.to_string());
    assert!(inventory.base_normal().is_none());
    assert_eq!(inventory.commits_since_base(), 3);
}

#[test]
fn test_linear_history() {
    let repo = TestRepo::new();
    let first = repo.commit("first");
    repo.tag("v1.0.0", first);
    repo.commit("second");
    let third = repo.commit("third");
    repo.tag("v1.1.0-rc.1", third);
    let head = repo.commit("fourth");

    let inventory = supplier(&repo).inventory().unwrap();
    assert_eq!(inventory.commit_id(), head.to_string());
    assert!(inventory.current_version().is_none());
    assert_eq!(inventory.base_version(), Some(&v("1.1.0-rc.1")));
    assert_eq!(inventory.base_normal(), Some(&v("1.0.0")));
    assert_eq!(inventory.commits_since_base(), 1);
    assert!(inventory.parallel_normals().is_empty());
    assert_eq!(inventory.claimed_versions().len(), 2);
}

#[test]
fn test_tagged_head_is_current_version() {
    let repo = TestRepo::new();
    let first = repo.commit("first");
    repo.tag("v0.1.0", first);
    let head = repo.commit("second");
    repo.annotated_tag("v0.2.0", head);

    let inventory = supplier(&repo).inventory().unwrap();
    assert_eq!(inventory.current_version(), Some(&v("0.2.0")));
    assert_eq!(inventory.base_version(), Some(&v("0.2.0")));
    assert_eq!(inventory.base_normal(), Some(&v("0.2.0")));
    assert_eq!(inventory.commits_since_base(), 0);
}

#[test]
fn test_tags_that_are_not_versions_are_skipped() {
    let repo = TestRepo::new();
    let head = repo.commit("first");
    repo.tag("nightly", head);
    repo.tag("v2.0.0", head);

    let inventory = supplier(&repo).inventory().unwrap();
    assert_eq!(inventory.claimed_versions().len(), 1);
    assert_eq!(inventory.current_version(), Some(&v("2.0.0")));
}

#[test]
fn test_custom_tag_selector() {
    let repo = TestRepo::new();
    let head = repo.commit("first");
    repo.tag("api-1.3.0", head);
    repo.tag("v9.0.0", head);

    let selector = TagSelector::default()
        .with_prefix("api-")
        .with_pattern(r"^api-(.+)$")
        .unwrap();
    let inventory = supplier(&repo)
        .with_selector(selector)
        .inventory()
        .unwrap();
    assert_eq!(inventory.claimed_versions().len(), 1);
    assert_eq!(inventory.current_version(), Some(&v("1.3.0")));
}

#[test]
fn test_base_is_highest_of_nearest_tags_across_merge() {
    let repo = TestRepo::new();
    let root = repo.commit("root");
    repo.tag("v3.0.0", root);
    let left = repo.commit_on("refs/heads/main", "left", &[root]);
    repo.tag("v3.0.1", left);
    let right = repo.commit_on("refs/heads/right", "right", &[root]);
    repo.tag("v3.1.0", right);
    repo.commit_on("refs/heads/main", "merge", &[left, right]);

    let inventory = supplier(&repo).inventory().unwrap();
    assert_eq!(inventory.base_version(), Some(&v("3.1.0")));
    assert_eq!(inventory.base_normal(), Some(&v("3.1.0")));
    assert_eq!(inventory.commits_since_base(), 2);
}

#[test]
fn test_parallel_normals_from_sibling_branch() {
    let repo = TestRepo::new();
    let before = repo.commit("before release");
    let release = repo.commit("release");
    repo.tag("v1.0.0", release);
    repo.commit("main work");

    let feature = repo.commit_on("refs/heads/feature", "feature work", &[release]);
    repo.tag("v1.1.0-beta.1", feature);

    let stale = repo.commit_on("refs/heads/stale", "stale work", &[before]);
    repo.tag("v1.5.0", stale);

    let inventory = supplier(&repo).inventory().unwrap();
    assert_eq!(inventory.base_normal(), Some(&v("1.0.0")));
    assert_eq!(
        inventory.parallel_normals().iter().collect::<Vec<_>>(),
        vec![&v("1.1.0")]
    );
    assert!(inventory.is_claimed(&v("1.5.0")));

    let version = reckon_from(
        &supplier(&repo),
        &ScopeNormalStrategy::fixed(Scope::Minor),
        &NoPreReleaseStrategy,
    )
    .unwrap();
    assert_eq!(version, v("1.2.0"));
}

#[test]
fn test_current_branch() {
    let repo = TestRepo::new();
    let head = repo.commit("first");
    assert_eq!(
        supplier(&repo).current_branch().unwrap(),
        Some("main".to_string())
    );

    repo.repo.set_head_detached(head).unwrap();
    assert_eq!(supplier(&repo).current_branch().unwrap(), None);
}

#[test]
fn test_tag_head_then_reckon_again() {
    let repo = TestRepo::new();
    let first = repo.commit("first");
    repo.tag("v1.0.0", first);
    repo.commit("second");

    let supplier = supplier(&repo);
    let normal = ScopeNormalStrategy::fixed(Scope::Patch);
    let version = reckon_from(&supplier, &normal, &NoPreReleaseStrategy).unwrap();
    assert_eq!(version, v("1.0.1"));

    assert_eq!(supplier.tag_head(&version).unwrap(), "v1.0.1");
    assert!(matches!(
        supplier.tag_head(&version),
        Err(ReckonError::Git(_))
    ));

    let inventory = supplier.inventory().unwrap();
    assert_eq!(inventory.current_version(), Some(&v("1.0.1")));

    // A patch is still requested, so the tagged commit moves on to 1.0.2.
    let again = reckon_from(&supplier, &normal, &NoPreReleaseStrategy).unwrap();
    assert_eq!(again, v("1.0.2"));
}
