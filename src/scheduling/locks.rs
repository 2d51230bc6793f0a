//! Per-resource serialisation of check-then-write booking mutations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::scheduling::conflict::ResourceClaim;

#[derive(Debug, Default)]
pub struct ResourceLocks {
    slots: Mutex<HashMap<ResourceClaim, Arc<AsyncMutex<()>>>>,
}

/// Held for the duration of one mutation. Dropping it releases every claim.
#[derive(Debug)]
pub struct ClaimGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl ResourceLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks every claim. Claims are sorted and deduplicated first so two
    /// mutations touching the same pair of resources cannot deadlock.
    pub async fn acquire(&self, claims: &[ResourceClaim]) -> ClaimGuard {
        let mut claims = claims.to_vec();
        claims.sort();
        claims.dedup();

        let mutexes: Vec<Arc<AsyncMutex<()>>> = {
            let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // the map's own Arc is the only one left once no guard or waiter holds it
            slots.retain(|_, mutex| Arc::strong_count(mutex) > 1);
            claims
                .into_iter()
                .map(|claim| slots.entry(claim).or_default().clone())
                .collect()
        };

        let mut guards = Vec::with_capacity(mutexes.len());
        for mutex in mutexes {
            guards.push(mutex.lock_owned().await);
        }

        ClaimGuard { _guards: guards }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn same_claim_is_serialised() {
        let locks = Arc::new(ResourceLocks::new());
        let claim = vec![ResourceClaim::classroom("c101")];

        let first = locks.acquire(&claim).await;

        let contender = {
            let locks = locks.clone();
            let claim = claim.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&claim).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!contender.is_finished());

        drop(first);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn disjoint_claims_do_not_block() {
        let locks = ResourceLocks::new();
        let _a = locks.acquire(&[ResourceClaim::classroom("c101")]).await;
        let _b = locks.acquire(&[ResourceClaim::classroom("c102")]).await;
    }

    #[tokio::test]
    async fn released_slots_are_pruned() {
        let locks = ResourceLocks::new();
        let held = locks.acquire(&[ResourceClaim::classroom("c101")]).await;
        drop(locks.acquire(&[ResourceClaim::faculty("f1"), ResourceClaim::classroom("c102")]).await);

        let _next = locks.acquire(&[ResourceClaim::classroom("c103")]).await;
        let slots = locks.slots.lock().unwrap();
        assert_eq!(slots.len(), 2);
        assert!(slots.contains_key(&ResourceClaim::classroom("c101")));
        assert!(slots.contains_key(&ResourceClaim::classroom("c103")));
        drop(held);
    }
}
