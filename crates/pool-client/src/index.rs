//! Pool Lookup Index
//!
//! Keyed views over one pool snapshot (by id, by address, linear pools by
//! their wrapped token, phantom pools by address, token decimals). The
//! [`PoolIndexCache`] rebuilds the index only when the source generation moves.

use std::collections::HashMap;
use std::sync::Arc;

use alloy::primitives::{Address, B256};
use relayer_core::{LookupError, Pool};
use tokio::sync::RwLock;

use crate::source::PoolDataSource;

/// Lookup tables over a single pool snapshot
#[derive(Debug, Clone)]
pub struct PoolIndex {
    generation: u64,
    pools: Arc<[Pool]>,
    by_id: HashMap<B256, usize>,
    by_address: HashMap<Address, usize>,
    linear_by_address: HashMap<Address, usize>,
    linear_by_wrapped: HashMap<Address, usize>,
    phantom_by_address: HashMap<Address, usize>,
    token_decimals: HashMap<Address, u8>,
}

impl PoolIndex {
    pub fn build(pools: Arc<[Pool]>, generation: u64) -> Self {
        let mut index = Self {
            generation,
            pools: Arc::clone(&pools),
            by_id: HashMap::new(),
            by_address: HashMap::new(),
            linear_by_address: HashMap::new(),
            linear_by_wrapped: HashMap::new(),
            phantom_by_address: HashMap::new(),
            token_decimals: HashMap::new(),
        };

        for (i, pool) in pools.iter().enumerate() {
            // First pool wins for ids and token metadata, last wins for address maps
            index.by_id.entry(pool.id).or_insert(i);
            index.by_address.insert(pool.address, i);

            if pool.is_linear() {
                index.linear_by_address.insert(pool.address, i);
                if let Some(wrapped) = pool.wrapped_token() {
                    index.linear_by_wrapped.insert(wrapped, i);
                }
            } else if pool.is_stable_phantom() {
                index.phantom_by_address.insert(pool.address, i);
            }

            for token in &pool.tokens {
                index.token_decimals.entry(token.address).or_insert(token.decimals);
            }
        }

        index
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pools(&self) -> &[Pool] {
        &self.pools
    }

    pub fn pool(&self, id: &B256) -> Option<&Pool> {
        self.by_id.get(id).map(|&i| &self.pools[i])
    }

    /// Pool by id, or [`LookupError::PoolNotFound`]
    pub fn required_pool(&self, id: &B256) -> Result<&Pool, LookupError> {
        self.pool(id).ok_or(LookupError::PoolNotFound { id: *id })
    }

    pub fn pool_by_address(&self, address: &Address) -> Option<&Pool> {
        self.by_address.get(address).map(|&i| &self.pools[i])
    }

    /// Linear pool whose BPT address is `address`
    pub fn linear_pool(&self, address: &Address) -> Option<&Pool> {
        self.linear_by_address.get(address).map(|&i| &self.pools[i])
    }

    /// Stable phantom pool whose BPT address is `address`
    pub fn phantom_pool(&self, address: &Address) -> Option<&Pool> {
        self.phantom_by_address.get(address).map(|&i| &self.pools[i])
    }

    pub fn linear_pool_for_wrapped(&self, wrapped_token: &Address) -> Option<&Pool> {
        self.linear_by_wrapped.get(wrapped_token).map(|&i| &self.pools[i])
    }

    /// Linear pool holding `wrapped_token`, or [`LookupError::LinearPoolNotFound`]
    pub fn required_linear_pool_for_wrapped(
        &self,
        wrapped_token: &Address,
    ) -> Result<&Pool, LookupError> {
        self.linear_pool_for_wrapped(wrapped_token)
            .ok_or(LookupError::LinearPoolNotFound {
                wrapped_token: *wrapped_token,
            })
    }

    pub fn is_wrapped_token(&self, token: &Address) -> bool {
        self.linear_by_wrapped.contains_key(token)
    }

    /// Decimals of any token listed by any pool in the snapshot
    pub fn token_decimals(&self, token: &Address) -> Result<u8, LookupError> {
        self.token_decimals
            .get(token)
            .copied()
            .ok_or(LookupError::TokenNotFound { address: *token })
    }
}

/// Lazily rebuilt [`PoolIndex`] keyed off the source generation
#[derive(Debug, Default)]
pub struct PoolIndexCache {
    current: RwLock<Option<Arc<PoolIndex>>>,
}

impl PoolIndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index for the source's current snapshot, rebuilding on a generation change
    pub async fn get(&self, source: &dyn PoolDataSource) -> Arc<PoolIndex> {
        let generation = source.generation();
        {
            let lock = self.current.read().await;
            if let Some(index) = lock.as_ref() {
                if index.generation == generation {
                    return Arc::clone(index);
                }
            }
        }

        let mut lock = self.current.write().await;
        // Another task may have rebuilt while we waited for the write lock
        if let Some(index) = lock.as_ref() {
            if index.generation == generation {
                return Arc::clone(index);
            }
        }

        let index = Arc::new(PoolIndex::build(source.pools(), generation));
        tracing::debug!(
            generation,
            pools = index.pools.len(),
            linear = index.linear_by_address.len(),
            "rebuilt pool index"
        );
        *lock = Some(Arc::clone(&index));
        index
    }

    /// Drop the cached index so the next lookup rebuilds it
    pub async fn invalidate(&self) {
        let mut lock = self.current.write().await;
        *lock = None;
    }
}
