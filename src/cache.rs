use caches::{AdaptiveCache, Cache};
use log::trace;

use crate::{
    decoder::{decode, Instruction},
    error::VmError,
};

pub const DEFAULT_CACHE_SIZE: usize = 32;

/// Decoded instructions keyed by instruction pointer.
///
/// Sound only because the program is immutable for the lifetime of the
/// engine that owns the cache: the text at a given `ip` never changes.
/// Failed decodes are not cached.
pub struct DecodeCache {
    entries: AdaptiveCache<usize, Instruction>,
    hits: u64,
    misses: u64,
}

impl DecodeCache {
    pub fn new(size: usize) -> Result<Self, VmError> {
        let entries = AdaptiveCache::new(size).map_err(|e| {
            log::error!("cannot build decode cache: {:?}", e);
            VmError::InvalidConfig("decode cache size must be at least 1")
        })?;

        Ok(Self {
            entries,
            hits: 0,
            misses: 0,
        })
    }

    /// Returns the instruction at `ip`, decoding `text` on a miss.
    pub fn fetch(&mut self, ip: usize, text: &str) -> Result<Instruction, VmError> {
        if let Some(instr) = self.entries.get(&ip) {
            let instr = *instr;
            self.hits += 1;
            trace!("decode cache hit at ip {}", ip);
            return Ok(instr);
        }

        self.misses += 1;
        let instr = Instruction::from_decoded(decode(text))?;
        let _ = self.entries.put(ip, instr);
        Ok(instr)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
