use crate::domain::VcsInventory;
use crate::error::Result;
use crate::git::InventorySupplier;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Supplier returning a fixed inventory, for testing without a repository
#[derive(Debug)]
pub struct MockInventorySupplier {
    inventory: VcsInventory,
    calls: AtomicUsize,
}

impl MockInventorySupplier {
    pub fn new(inventory: VcsInventory) -> Self {
        MockInventorySupplier {
            inventory,
            calls: AtomicUsize::new(0),
        }
    }

    /// How many inventories have been handed out
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockInventorySupplier {
    fn default() -> Self {
        Self::new(VcsInventory::empty())
    }
}

impl InventorySupplier for MockInventorySupplier {
    fn inventory(&self) -> Result<VcsInventory> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.inventory.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    #[test]
    fn test_mock_supplier_returns_inventory() {
        let inventory = VcsInventory::builder()
            .commit_id("abc123")
            .base_normal(Version::new(1, 0, 0))
            .build()
            .unwrap();
        let supplier = MockInventorySupplier::new(inventory.clone());

        assert_eq!(supplier.inventory().unwrap(), inventory);
        assert_eq!(supplier.inventory().unwrap(), inventory);
        assert_eq!(supplier.calls(), 2);
    }

    #[test]
    fn test_mock_supplier_default() {
        let supplier = MockInventorySupplier::default();
        let inventory = supplier.inventory().unwrap();
        assert!(inventory.claimed_versions().is_empty());
        assert_eq!(inventory.commit_id(), "");
    }
}
