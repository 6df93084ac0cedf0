use crate::error::VmError;

pub trait Addressable<T> {
    fn read(&self, address: usize) -> Option<T>;
    fn write(&mut self, address: usize, value: T) -> Result<(), VmError>;
    fn clear(&mut self);
}

pub const DEFAULT_STACK_CAPACITY: usize = 5;

/// Fixed-capacity value stack.
///
/// The arena never grows. Which slots are live is decided by the stack
/// pointer held in [`crate::cpu::Registers`]: only `[0, sp)` holds pushed
/// values, anything at or beyond `sp` is a leftover and must not be read as
/// data. Use [`Stack::live`] rather than indexing [`Stack::slots`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    slots: Box<[i64]>,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new(DEFAULT_STACK_CAPACITY)
    }
}

impl Stack {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![0; capacity].into_boxed_slice(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Every physical slot, stale ones included. Meant for display only.
    pub fn slots(&self) -> &[i64] {
        &self.slots
    }

    /// The logically valid values below `sp`, bottom first.
    pub fn live(&self, sp: usize) -> &[i64] {
        &self.slots[..sp.min(self.slots.len())]
    }
}

impl Addressable<i64> for Stack {
    fn read(&self, address: usize) -> Option<i64> {
        self.slots.get(address).copied()
    }

    fn write(&mut self, address: usize, value: i64) -> Result<(), VmError> {
        let capacity = self.capacity();
        let slot = self
            .slots
            .get_mut(address)
            .ok_or(VmError::StackOverflow { capacity })?;
        *slot = value;
        Ok(())
    }

    fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacity_is_five() {
        let stack = Stack::default();
        assert_eq!(stack.capacity(), 5);
        assert_eq!(stack.slots(), &[0; 5]);
    }

    #[test]
    fn write_past_capacity_overflows() {
        let mut stack = Stack::new(2);
        stack.write(1, 7).unwrap();
        assert_eq!(stack.write(2, 8), Err(VmError::StackOverflow { capacity: 2 }));
        assert_eq!(stack.slots(), &[0, 7]);
    }

    #[test]
    fn live_excludes_stale_slots() {
        let mut stack = Stack::new(3);
        stack.write(0, 4).unwrap();
        stack.write(1, 5).unwrap();
        assert_eq!(stack.live(1), &[4]);
        assert_eq!(stack.read(1), Some(5));
        assert_eq!(stack.read(3), None);
    }

    #[test]
    fn clear_zeroes_every_slot() {
        let mut stack = Stack::new(3);
        stack.write(2, 9).unwrap();
        stack.clear();
        assert_eq!(stack.slots(), &[0, 0, 0]);
    }
}
