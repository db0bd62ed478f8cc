//! Batch Relayer Constants

/// Pool kind passed to relayer joins and exits
pub const POOL_KIND: u8 = 0;

/// Names of projected amounts in a batch plan
pub mod outputs {
    /// Final amounts received per requested output
    pub const AMOUNTS_OUT: &str = "amountsOut";
    /// Amounts spent per input token
    pub const AMOUNTS_IN: &str = "amountsIn";
}
