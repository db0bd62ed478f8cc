//! pool-client: Pool data access for the batch relayer
//!
//! This crate provides the pool snapshot source consumed by the relayer,
//! an explicit generation-keyed lookup index over the snapshot, and the
//! router oracle interface used for swap route and delta queries.

pub mod index;
pub mod oracle;
pub mod source;

pub use index::{PoolIndex, PoolIndexCache};
pub use oracle::{RouterOracle, SwapInfo};
pub use source::{InMemoryPoolSource, PoolDataSource};
