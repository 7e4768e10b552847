//! Fixed-capacity generational slot arena.
//!
//! Storage is allocated once in [`SlotArena::new`]; inserting and removing
//! only moves values in and out of pre-allocated slots. A vacated slot is
//! recycled with a bumped generation, so a stale [`SlotHandle`] never
//! aliases the entity that reused its slot.

use heapless::Vec;

/// Handle to a value stored in a [`SlotArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    slot: u16,
    generation: u32,
}

impl SlotHandle {
    /// Slot position inside the arena.
    #[inline]
    pub const fn slot(self) -> usize {
        self.slot as usize
    }

    /// Generation the handle was issued for.
    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Arena of at most `N` values addressed by [`SlotHandle`].
#[derive(Debug)]
pub struct SlotArena<T, const N: usize> {
    slots: [Slot<T>; N],
    /// Vacant slot positions; popped from the back.
    free: Vec<u16, N>,
    live: usize,
}

impl<T, const N: usize> SlotArena<T, N> {
    /// Create an empty arena with every slot vacant.
    pub fn new() -> Self {
        let mut free = Vec::new();
        // Reverse order so the lowest slot is handed out first.
        for slot in (0..N).rev() {
            let _ = free.push(slot as u16);
        }
        Self {
            slots: core::array::from_fn(|_| Slot {
                generation: 0,
                value: None,
            }),
            free,
            live: 0,
        }
    }

    /// Store `value`, or hand it back when every slot is taken.
    pub fn insert(&mut self, value: T) -> Result<SlotHandle, T> {
        let Some(slot) = self.free.pop() else {
            return Err(value);
        };
        let entry = &mut self.slots[slot as usize];
        entry.value = Some(value);
        self.live += 1;
        Ok(SlotHandle {
            slot,
            generation: entry.generation,
        })
    }

    /// Value behind `handle`, `None` if it was removed since.
    pub fn get(&self, handle: SlotHandle) -> Option<&T> {
        self.slots
            .get(handle.slot())
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.value.as_ref())
    }

    /// Mutable value behind `handle`.
    pub fn get_mut(&mut self, handle: SlotHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.slot())
            .filter(|s| s.generation == handle.generation)
            .and_then(|s| s.value.as_mut())
    }

    /// True while `handle` still addresses a live value.
    #[inline]
    pub fn contains(&self, handle: SlotHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Take the value out and recycle its slot.
    pub fn remove(&mut self, handle: SlotHandle) -> Option<T> {
        let entry = self.slots.get_mut(handle.slot())?;
        if entry.generation != handle.generation {
            return None;
        }
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        // One free entry per vacated slot, so this never overflows.
        let _ = self.free.push(handle.slot);
        self.live -= 1;
        Some(value)
    }

    /// Number of live values.
    #[inline]
    pub const fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    #[inline]
    pub const fn is_full(&self) -> bool {
        self.live == N
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T, const N: usize> Default for SlotArena<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
