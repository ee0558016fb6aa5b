//! Configuration for ActionKV
//!
//! Centralized store configuration with sensible defaults.

/// Main configuration for a Store instance
#[derive(Debug, Clone)]
pub struct StoreConfig {
    // -------------------------------------------------------------------------
    // Key Map Configuration
    // -------------------------------------------------------------------------
    /// Number of keys to pre-allocate room for
    pub initial_capacity: usize,

    /// Max key length in bytes. Empty keys are always rejected.
    pub max_key_len: usize,

    // -------------------------------------------------------------------------
    // Codec Configuration
    // -------------------------------------------------------------------------
    /// Max payload size accepted by the binary snapshot codec (in bytes)
    pub max_frame_size: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            max_key_len: 1024,
            max_frame_size: 64 * 1024 * 1024, // 64 MB
        }
    }
}

impl StoreConfig {
    /// Create a new config builder
    pub fn builder() -> StoreConfigBuilder {
        StoreConfigBuilder::default()
    }
}

/// Builder for StoreConfig
#[derive(Default)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Set the number of keys to pre-allocate
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Set the maximum key length (in bytes)
    pub fn max_key_len(mut self, len: usize) -> Self {
        self.config.max_key_len = len;
        self
    }

    /// Set the maximum binary snapshot payload (in bytes)
    pub fn max_frame_size(mut self, size: u32) -> Self {
        self.config.max_frame_size = size;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}
