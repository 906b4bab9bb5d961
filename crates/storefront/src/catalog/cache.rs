//! Cache types for catalog query results.

use std::collections::HashSet;
use std::sync::Arc;

use product_catalog_core::ProductId;

use crate::catalog::types::Product;

/// Cache key for catalog queries.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    /// The full product listing.
    Products,
}

/// A cached product collection tagged with the mutation epoch at which
/// its fetch started.
///
/// Deletions recorded after `epoch` may still be present in `products`.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub products: Arc<[Product]>,
    pub epoch: u64,
}

impl Snapshot {
    pub fn new(products: Vec<Product>, epoch: u64) -> Self {
        Self {
            products: products.into(),
            epoch,
        }
    }

    /// Copy of this snapshot without `removed`, re-tagged at `epoch`.
    ///
    /// Shares the existing allocation when nothing is removed.
    pub fn without(&self, removed: &HashSet<ProductId>, epoch: u64) -> Self {
        if removed.is_empty() || !self.products.iter().any(|p| removed.contains(&p.id)) {
            return Self {
                products: Arc::clone(&self.products),
                epoch,
            };
        }

        Self {
            products: self
                .products
                .iter()
                .filter(|p| !removed.contains(&p.id))
                .cloned()
                .collect(),
            epoch,
        }
    }
}

/// A successful delete, stamped with the epoch it created.
#[derive(Debug, Clone)]
pub struct Deletion {
    pub epoch: u64,
    pub id: ProductId,
}

/// IDs deleted after `epoch`.
pub fn deleted_since(log: &[Deletion], epoch: u64) -> HashSet<ProductId> {
    log.iter()
        .filter(|d| d.epoch > epoch)
        .map(|d| d.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::testing::product;

    #[test]
    fn test_without_preserves_order() {
        let snapshot = Snapshot::new(
            vec![product("1", 1, 0.0), product("2", 1, 0.0), product("3", 1, 0.0)],
            0,
        );
        let removed = HashSet::from([ProductId::new("2")]);

        let pruned = snapshot.without(&removed, 4);

        let ids: Vec<&str> = pruned.products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["1", "3"]);
        assert_eq!(pruned.epoch, 4);
    }

    #[test]
    fn test_without_shares_allocation_when_unchanged() {
        let snapshot = Snapshot::new(vec![product("1", 1, 0.0)], 0);
        let removed = HashSet::from([ProductId::new("9")]);

        let pruned = snapshot.without(&removed, 1);

        assert!(Arc::ptr_eq(&snapshot.products, &pruned.products));
    }

    #[test]
    fn test_deleted_since_filters_by_epoch() {
        let log = vec![
            Deletion {
                epoch: 1,
                id: ProductId::new("a"),
            },
            Deletion {
                epoch: 2,
                id: ProductId::new("b"),
            },
            Deletion {
                epoch: 3,
                id: ProductId::new("c"),
            },
        ];

        let ids = deleted_since(&log, 1);

        assert_eq!(
            ids,
            HashSet::from([ProductId::new("b"), ProductId::new("c")])
        );
    }
}
