use crate::{cache::DEFAULT_CACHE_SIZE, error::VmError, memory::DEFAULT_STACK_CAPACITY};

/// Construction parameters for an [`crate::Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub stack_capacity: usize,
    /// Number of decoded instructions kept by the decode cache.
    pub decode_cache_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stack_capacity: DEFAULT_STACK_CAPACITY,
            decode_cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

impl EngineConfig {
    pub fn with_stack_capacity(mut self, capacity: usize) -> Self {
        self.stack_capacity = capacity;
        self
    }

    pub fn with_decode_cache_size(mut self, size: usize) -> Self {
        self.decode_cache_size = size;
        self
    }

    pub fn validate(&self) -> Result<(), VmError> {
        if self.stack_capacity == 0 {
            return Err(VmError::InvalidConfig("stack capacity must be at least 1"));
        }
        if self.decode_cache_size == 0 {
            return Err(VmError::InvalidConfig("decode cache size must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.stack_capacity, 5);
        assert_eq!(config.decode_cache_size, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let config = EngineConfig::default().with_stack_capacity(0);
        assert!(matches!(config.validate(), Err(VmError::InvalidConfig(_))));

        let config = EngineConfig::default().with_decode_cache_size(0);
        assert!(matches!(config.validate(), Err(VmError::InvalidConfig(_))));
    }
}
