//! Bounded entity pool kept sorted by remote index.
//!
//! A pool pairs a [`SlotArena`] (storage) with an ordering vector of
//! `(index, handle)` entries. The ordering vector is the only place that
//! knows the sort order; the arena never moves a value once stored.
//!
//! Invariants:
//! - entries are strictly ascending by index (unique indices)
//! - `order.len() == arena.len()`
//! - creating beyond capacity yields `None`, never a panic or an error

use super::arena::{SlotArena, SlotHandle};
use heapless::Vec;

/// An entity stored in a [`Pool`].
pub trait PoolEntity: Sized {
    /// Exclusive upper bound for indices this entity accepts.
    const INDEX_LIMIT: usize = usize::MAX;

    /// Fresh entity with category defaults.
    fn with_index(index: usize) -> Self;

    /// Remote index (stable identity).
    fn index(&self) -> usize;
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    index: usize,
    handle: SlotHandle,
}

/// Sorted, fixed-capacity collection of `T`.
#[derive(Debug)]
pub struct Pool<T: PoolEntity, const N: usize> {
    arena: SlotArena<T, N>,
    order: Vec<Entry, N>,
}

impl<T: PoolEntity, const N: usize> Pool<T, N> {
    pub fn new() -> Self {
        Self {
            arena: SlotArena::new(),
            order: Vec::new(),
        }
    }

    /// Position of `index` in the ordering vector, or where it would go.
    fn position(&self, index: usize) -> Result<usize, usize> {
        for (pos, entry) in self.order.iter().enumerate() {
            if entry.index == index {
                return Ok(pos);
            }
            if entry.index > index {
                return Err(pos);
            }
        }
        Err(self.order.len())
    }

    /// Entity with the given index.
    pub fn get(&self, index: usize) -> Option<&T> {
        let pos = self.position(index).ok()?;
        self.arena.get(self.order[pos].handle)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let pos = self.position(index).ok()?;
        self.arena.get_mut(self.order[pos].handle)
    }

    /// Entity with the given index, created with defaults when missing and
    /// `create` is set. Returns `None` on a miss without `create`, on an
    /// index the entity type rejects, and when the pool is full.
    pub fn get_or_create(&mut self, index: usize, create: bool) -> Option<&mut T> {
        let handle = match self.position(index) {
            Ok(pos) => self.order[pos].handle,
            Err(pos) => {
                if !create || index >= T::INDEX_LIMIT || self.order.is_full() {
                    return None;
                }
                let handle = self.arena.insert(T::with_index(index)).ok()?;
                if self.order.insert(pos, Entry { index, handle }).is_err() {
                    self.arena.remove(handle);
                    return None;
                }
                handle
            }
        };
        self.arena.get_mut(handle)
    }

    /// Arena handle of the entity with the given index.
    pub fn handle(&self, index: usize) -> Option<SlotHandle> {
        self.position(index).ok().map(|pos| self.order[pos].handle)
    }

    /// Entity addressed by handle, `None` once it was removed.
    pub fn by_handle(&self, handle: SlotHandle) -> Option<&T> {
        self.arena.get(handle)
    }

    /// First entity (ascending index) matching `predicate`.
    pub fn find<F>(&self, mut predicate: F) -> Option<&T>
    where
        F: FnMut(&T) -> bool,
    {
        self.iter().find(|e| predicate(e))
    }

    pub fn find_mut<F>(&mut self, mut predicate: F) -> Option<&mut T>
    where
        F: FnMut(&T) -> bool,
    {
        let arena = &self.arena;
        let handle = self
            .order
            .iter()
            .map(|e| e.handle)
            .find(|h| arena.get(*h).is_some_and(&mut predicate))?;
        self.arena.get_mut(handle)
    }

    /// All entities in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let arena = &self.arena;
        self.order.iter().filter_map(move |e| arena.get(e.handle))
    }

    /// Entities with index `>= from_index`, ascending.
    pub fn iter_from(&self, from_index: usize) -> impl Iterator<Item = &T> + '_ {
        let arena = &self.arena;
        self.order
            .iter()
            .skip_while(move |e| e.index < from_index)
            .filter_map(move |e| arena.get(e.handle))
    }

    /// Visit entities with index `>= from_index` mutably, ascending.
    pub fn for_each_from<F>(&mut self, from_index: usize, mut visitor: F)
    where
        F: FnMut(&mut T),
    {
        self.iterate_while(from_index, |e| {
            visitor(e);
            true
        });
    }

    /// Like [`Self::for_each_from`] but stops as soon as `visitor` returns
    /// `false`. Returns `true` when every entity was visited.
    pub fn iterate_while<F>(&mut self, from_index: usize, mut visitor: F) -> bool
    where
        F: FnMut(&mut T) -> bool,
    {
        for entry in self.order.iter().filter(|e| e.index >= from_index) {
            if let Some(value) = self.arena.get_mut(entry.handle) {
                if !visitor(value) {
                    return false;
                }
            }
        }
        true
    }

    /// Remove the entity at `index`, or with `cascade` every entity whose
    /// index is `>= index`. Returns how many entities were removed.
    pub fn remove(&mut self, index: usize, cascade: bool) -> usize {
        self.remove_with(index, cascade, drop)
    }

    /// [`Self::remove`] handing every removed entity to `release` first,
    /// so owned resources can be returned to their own arenas.
    pub fn remove_with<F>(&mut self, index: usize, cascade: bool, mut release: F) -> usize
    where
        F: FnMut(T),
    {
        match self.max_index() {
            Some(max) if max >= index => {}
            _ => return 0,
        }

        let mut removed = 0;
        let mut pos = self.order.len();
        while pos > 0 {
            pos -= 1;
            let entry = self.order[pos];
            if entry.index < index {
                break;
            }
            if cascade || entry.index == index {
                self.order.remove(pos);
                if let Some(value) = self.arena.remove(entry.handle) {
                    release(value);
                }
                removed += 1;
                if !cascade {
                    break;
                }
            }
        }
        removed
    }

    /// Highest index present.
    pub fn max_index(&self) -> Option<usize> {
        self.order.last().map(|e| e.index)
    }

    /// Indices present, ascending.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().map(|e| e.index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.order.is_full()
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<T: PoolEntity, const N: usize> Default for Pool<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item {
        index: usize,
        value: i32,
    }

    impl PoolEntity for Item {
        const INDEX_LIMIT: usize = 100;

        fn with_index(index: usize) -> Self {
            Self { index, value: 0 }
        }

        fn index(&self) -> usize {
            self.index
        }
    }

    fn pool_with(indices: &[usize]) -> Pool<Item, 8> {
        let mut pool: Pool<Item, 8> = Pool::new();
        for &i in indices {
            pool.get_or_create(i, true).unwrap().value = i as i32 * 10;
        }
        pool
    }

    fn indices(pool: &Pool<Item, 8>) -> std::vec::Vec<usize> {
        pool.indices().collect()
    }

    #[test]
    fn create_then_get_returns_same_entity() {
        let mut pool: Pool<Item, 8> = Pool::new();
        pool.get_or_create(3, true).unwrap().value = 42;
        assert_eq!(pool.get(3).map(|i| i.value), Some(42));
        // A second create does not reset the entity.
        assert_eq!(pool.get_or_create(3, true).map(|i| i.value), Some(42));
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn stays_sorted_on_out_of_order_insert() {
        let pool = pool_with(&[5, 1, 3, 0, 7]);
        assert_eq!(indices(&pool), [0, 1, 3, 5, 7]);
        assert_eq!(pool.max_index(), Some(7));
    }

    #[test]
    fn miss_without_create() {
        let mut pool = pool_with(&[1]);
        assert!(pool.get_or_create(2, false).is_none());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn full_pool_yields_none() {
        let mut pool = pool_with(&[0, 1, 2, 3, 4, 5, 6, 7]);
        assert!(pool.is_full());
        assert!(pool.get_or_create(8, true).is_none());
        // Existing entities are still reachable.
        assert!(pool.get_or_create(7, true).is_some());
    }

    #[test]
    fn index_limit_is_respected() {
        let mut pool: Pool<Item, 8> = Pool::new();
        assert!(pool.get_or_create(100, true).is_none());
        assert!(pool.get_or_create(99, true).is_some());
    }

    #[test]
    fn remove_single() {
        let mut pool = pool_with(&[0, 1, 2, 3]);
        assert_eq!(pool.remove(1, false), 1);
        assert_eq!(indices(&pool), [0, 2, 3]);
        assert_eq!(pool.remove(1, false), 0);
        assert_eq!(pool.get(2).map(|i| i.value), Some(20));
    }

    #[test]
    fn remove_cascade_removes_suffix_only() {
        let mut pool = pool_with(&[0, 1, 2, 3, 5]);
        assert_eq!(pool.remove(2, true), 3);
        assert_eq!(indices(&pool), [0, 1]);
    }

    #[test]
    fn remove_cascade_from_missing_index() {
        let mut pool = pool_with(&[0, 2, 4]);
        assert_eq!(pool.remove(3, true), 1);
        assert_eq!(indices(&pool), [0, 2]);
    }

    #[test]
    fn remove_above_max_is_noop() {
        let mut pool = pool_with(&[0, 1]);
        assert_eq!(pool.remove(2, true), 0);
        let mut empty: Pool<Item, 8> = Pool::new();
        assert_eq!(empty.remove(0, true), 0);
    }

    #[test]
    fn release_sees_every_removed_entity() {
        let mut pool = pool_with(&[0, 1, 2]);
        let mut released = std::vec::Vec::new();
        pool.remove_with(1, true, |item| released.push(item.index));
        assert_eq!(released, [2, 1]);
    }

    #[test]
    fn slots_are_reused_after_removal() {
        let mut pool = pool_with(&[0, 1, 2, 3, 4, 5, 6, 7]);
        pool.remove(4, true);
        assert!(pool.get_or_create(10, true).is_some());
        assert_eq!(indices(&pool), [0, 1, 2, 3, 10]);
    }

    #[test]
    fn iterate_from_and_while() {
        let mut pool = pool_with(&[0, 2, 4, 6]);
        let seen: std::vec::Vec<_> = pool.iter_from(3).map(|i| i.index).collect();
        assert_eq!(seen, [4, 6]);

        let mut visited = 0;
        let complete = pool.iterate_while(0, |item| {
            visited += 1;
            item.index < 2
        });
        assert!(!complete);
        assert_eq!(visited, 2);

        pool.for_each_from(4, |item| item.value = -1);
        assert_eq!(pool.get(2).map(|i| i.value), Some(20));
        assert_eq!(pool.get(6).map(|i| i.value), Some(-1));
    }

    #[test]
    fn find_first_match() {
        let mut pool = pool_with(&[1, 2, 3]);
        assert_eq!(pool.find(|i| i.value >= 20).map(|i| i.index), Some(2));
        assert!(pool.find(|i| i.value > 100).is_none());
        pool.find_mut(|i| i.index == 3).unwrap().value = 7;
        assert_eq!(pool.get(3).map(|i| i.value), Some(7));
    }

    #[test]
    fn stale_handle_after_removal() {
        let mut pool = pool_with(&[1]);
        let handle = pool.handle(1).unwrap();
        assert!(pool.by_handle(handle).is_some());
        pool.remove(1, false);
        pool.get_or_create(1, true);
        assert!(pool.by_handle(handle).is_none());
    }
}
