//! Pool Snapshot Source
//!
//! The relayer reads pools through [`PoolDataSource`]. Every snapshot carries
//! a generation counter so lookup indexes built over it know when to rebuild.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use relayer_core::{Error, Pool, Result};

/// Source of pool snapshots
#[async_trait]
pub trait PoolDataSource: Send + Sync {
    /// Current snapshot
    fn pools(&self) -> Arc<[Pool]>;

    /// Changes whenever [`pools`](Self::pools) would return a different snapshot
    fn generation(&self) -> u64;

    /// Refresh the snapshot, optionally reconciling balances on-chain.
    ///
    /// Never fails; an unsuccessful refresh is reported as `false` and the
    /// previous snapshot stays in place.
    async fn fetch_pools(&self, on_chain: bool) -> bool;
}

/// Pool source backed by a replaceable in-memory snapshot
#[derive(Debug)]
pub struct InMemoryPoolSource {
    pools: RwLock<Arc<[Pool]>>,
    generation: AtomicU64,
    fetches: AtomicUsize,
}

impl InMemoryPoolSource {
    pub fn new(pools: Vec<Pool>) -> Self {
        Self {
            pools: RwLock::new(pools.into()),
            generation: AtomicU64::new(0),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Load a snapshot from a JSON array of pool records
    pub fn from_json(json: &str) -> Result<Self> {
        let pools: Vec<Pool> =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(Self::new(pools))
    }

    /// Swap in a new snapshot and bump the generation
    pub fn replace(&self, pools: Vec<Pool>) {
        let mut guard = self.pools.write().unwrap_or_else(|e| e.into_inner());
        *guard = pools.into();
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of refresh requests received
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryPoolSource {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl PoolDataSource for InMemoryPoolSource {
    fn pools(&self) -> Arc<[Pool]> {
        self.pools
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    async fn fetch_pools(&self, on_chain: bool) -> bool {
        // Nothing upstream to pull from; the current snapshot stays authoritative.
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(on_chain, generation = self.generation(), "in-memory pool refresh");
        true
    }
}
