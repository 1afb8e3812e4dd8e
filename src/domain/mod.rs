//! Domain model - the inventory snapshot and version helpers, independent of git

pub mod inventory;
pub mod version;

pub use inventory::{VcsInventory, VcsInventoryBuilder};
pub use version::{
    canonical_identifiers, increment_normal, is_normal, normal_of, parse_version,
    same_precedence, with_build_metadata, with_pre_release, Scope,
};
