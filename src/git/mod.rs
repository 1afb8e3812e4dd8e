//! Inventory suppliers
//!
//! A reckoning needs a [VcsInventory] describing the commit being versioned.
//! The [InventorySupplier] trait produces one:
//!
//! - [repository::GitInventorySupplier]: reads tags and history with `git2`
//! - [mock::MockInventorySupplier]: hands out a fixed inventory, for tests
//!
//! Suppliers only read the repository; tagging a reckoned version is left to
//! the caller ([repository::GitInventorySupplier::tag_head]).

pub mod mock;
pub mod repository;
pub mod tag;

pub use mock::MockInventorySupplier;
pub use repository::GitInventorySupplier;
pub use tag::TagSelector;

use crate::domain::VcsInventory;
use crate::error::Result;

/// Produces a fresh inventory for each reckoning
///
/// ## Thread Safety
///
/// Implementors must be `Send + Sync`.
pub trait InventorySupplier: Send + Sync {
    fn inventory(&self) -> Result<VcsInventory>;
}
