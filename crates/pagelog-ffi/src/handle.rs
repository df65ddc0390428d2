//! Generation-checked handle table for loggers owned across the C boundary.
//!
//! A handle packs `slot + 1` into the upper 32 bits and the slot's
//! generation into the lower 32, so `0` is never a valid handle. Removing
//! a value bumps the slot's generation; handles minted before the removal
//! no longer resolve.

/// Null handle: never issued, always rejected.
pub const NULL_HANDLE: u64 = 0;

fn pack(slot: usize, generation: u32) -> u64 {
    ((slot as u64 + 1) << 32) | u64::from(generation)
}

fn unpack(handle: u64) -> Option<(usize, u32)> {
    let slot = (handle >> 32).checked_sub(1)?;
    Some((usize::try_from(slot).ok()?, handle as u32))
}

struct Entry<T> {
    generation: u32,
    value: Option<T>,
}

/// Table of owned values addressed by `u64` handles.
pub(crate) struct HandleTable<T> {
    entries: Vec<Entry<T>>,
    vacant: Vec<usize>,
}

impl<T> HandleTable<T> {
    /// An empty table. `const` so it can back a `static`.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            vacant: Vec::new(),
        }
    }

    /// Store `value` and mint a handle for it.
    pub fn insert(&mut self, value: T) -> u64 {
        match self.vacant.pop() {
            Some(slot) => {
                let entry = &mut self.entries[slot];
                entry.value = Some(value);
                pack(slot, entry.generation)
            }
            None => {
                self.entries.push(Entry {
                    generation: 0,
                    value: Some(value),
                });
                pack(self.entries.len() - 1, 0)
            }
        }
    }

    fn entry(&self, handle: u64) -> Option<&Entry<T>> {
        let (slot, generation) = unpack(handle)?;
        self.entries
            .get(slot)
            .filter(|e| e.generation == generation)
    }

    /// Shared access to the value behind `handle`.
    pub fn get(&self, handle: u64) -> Option<&T> {
        self.entry(handle)?.value.as_ref()
    }

    /// Exclusive access to the value behind `handle`.
    pub fn get_mut(&mut self, handle: u64) -> Option<&mut T> {
        let (slot, generation) = unpack(handle)?;
        self.entries
            .get_mut(slot)
            .filter(|e| e.generation == generation)?
            .value
            .as_mut()
    }

    /// Take the value out, invalidating `handle`.
    ///
    /// A slot whose generation would wrap is retired for good rather than
    /// reused, so a stale handle can never alias a later value.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let (slot, generation) = unpack(handle)?;
        let entry = self
            .entries
            .get_mut(slot)
            .filter(|e| e.generation == generation)?;
        let value = entry.value.take()?;
        match entry.generation.checked_add(1) {
            Some(next) => {
                entry.generation = next;
                self.vacant.push(slot);
            }
            None => entry.generation = u32::MAX,
        }
        Some(value)
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.value.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_never_null() {
        let mut table = HandleTable::new();
        for i in 0..4 {
            assert_ne!(table.insert(i), NULL_HANDLE);
        }
        assert_eq!(table.get(NULL_HANDLE), None);
        assert_eq!(table.remove(NULL_HANDLE), None);
    }

    #[test]
    fn insert_get_remove() {
        let mut table = HandleTable::new();
        let h = table.insert("page");
        assert_eq!(table.get(h), Some(&"page"));
        *table.get_mut(h).unwrap() = "log";
        assert_eq!(table.remove(h), Some("log"));
        assert_eq!(table.get(h), None);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn double_remove_is_harmless() {
        let mut table = HandleTable::new();
        let h = table.insert(1u8);
        assert_eq!(table.remove(h), Some(1));
        assert_eq!(table.remove(h), None);
    }

    #[test]
    fn reused_slot_rejects_old_handle() {
        let mut table = HandleTable::new();
        let old = table.insert(1u8);
        table.remove(old);
        let new = table.insert(2u8);
        assert_eq!(unpack(old).map(|(s, _)| s), unpack(new).map(|(s, _)| s));
        assert_ne!(old, new);
        assert_eq!(table.get(old), None);
        assert_eq!(table.get(new), Some(&2));
    }

    #[test]
    fn exhausted_generation_retires_slot() {
        let mut table = HandleTable::new();
        let h = table.insert(1u8);
        table.remove(h);
        table.entries[0].generation = u32::MAX;
        let last = table.insert(2u8);
        assert_eq!(table.remove(last), Some(2));
        assert!(table.vacant.is_empty());
        assert_eq!(table.get(last), None);

        let fresh = table.insert(3u8);
        assert_eq!(unpack(fresh).map(|(s, _)| s), Some(1));
    }

    #[test]
    fn unknown_slot_is_rejected() {
        let table: HandleTable<u8> = HandleTable::new();
        assert_eq!(table.get(pack(42, 0)), None);
    }
}
