//! Growable circular buffer backing each queue instance
//!
//! `EventRing` is a bounded ring buffer that grows on demand rather than
//! rejecting a push. It is deliberately free of any threading concerns so the
//! index arithmetic and the wrapped-resize relocation can be unit tested in
//! isolation; callers provide their own locking.
//!
//! Invariants:
//! - `head` and `tail` are always in `[0, capacity)`
//! - an empty ring has `head == tail == 0` (popping the last entry re-anchors
//!   both indices so future growth starts from a contiguous layout)
//! - `tail` points at the newest occupied slot, not one past it; the first
//!   push into an empty ring therefore writes at the current `tail` without
//!   advancing it
//! - exactly `count` slots hold `Some`, at the logical positions between
//!   `head` and `tail`

use crate::queue::error::{QueueError, QueueResult};

/// Physical slot count used when no explicit size is given.
pub const DEFAULT_RING_CAPACITY: usize = 102_400;

/// Grown capacities are rounded up to the next multiple of this.
const GROWTH_ALIGNMENT: usize = 256;

fn align_up(size: usize, boundary: usize) -> usize {
    (size + boundary - 1) & !(boundary - 1)
}

/// Growable single-ended ring buffer of owned entries.
#[derive(Debug)]
pub struct EventRing<E> {
    slots: Vec<Option<E>>,
    count: usize,
    head: usize,
    tail: usize,
}

impl<E> EventRing<E> {
    /// Allocate a ring with `size` slots, or [`DEFAULT_RING_CAPACITY`] when
    /// `size` is zero.
    pub fn with_capacity(size: usize) -> QueueResult<Self> {
        let capacity = if size > 0 { size } else { DEFAULT_RING_CAPACITY };
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|err| QueueError::AllocationFailure {
                message: format!("ring of {capacity} slots: {err}"),
            })?;
        slots.resize_with(capacity, || None);

        Ok(Self {
            slots,
            count: 0,
            head: 0,
            tail: 0,
        })
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Number of physical slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Append an entry, growing the ring when every slot is occupied.
    ///
    /// A failed grow drops `item` and leaves the ring in its prior, still
    /// valid state.
    pub fn push_back(&mut self, item: E) -> QueueResult<()> {
        if self.count == self.slots.len() {
            let capacity = self.slots.len();
            self.grow(std::cmp::max(capacity * 2, capacity + 1))?;
        }
        if self.count > 0 {
            self.tail = (self.tail + 1) % self.slots.len();
        }
        self.slots[self.tail] = Some(item);
        self.count += 1;
        Ok(())
    }

    /// Remove and return the oldest entry, or `None` when empty.
    ///
    /// Empty is a normal condition, never an error.
    pub fn pop_front(&mut self) -> Option<E> {
        if self.count == 0 {
            return None;
        }
        let item = self.slots[self.head].take();
        debug_assert!(item.is_some(), "occupied slot at head was empty");
        self.head = (self.head + 1) % self.slots.len();
        self.count -= 1;
        if self.count == 0 {
            self.head = 0;
            self.tail = 0;
        }
        item
    }

    /// Extend the backing storage to at least `capacity_hint` slots, rounded
    /// up to the growth alignment. Growing never shrinks: a hint at or below
    /// the current capacity is a no-op.
    ///
    /// When the occupied region wraps the end of the array (`head > tail`),
    /// the segment `[head, old_capacity)` is relocated to the end of the new
    /// storage so the logical order survives the resize.
    pub fn grow(&mut self, capacity_hint: usize) -> QueueResult<()> {
        let capacity = self.slots.len();
        if capacity_hint <= capacity {
            return Ok(());
        }

        let target = align_up(capacity_hint, GROWTH_ALIGNMENT);
        self.slots
            .try_reserve_exact(target - capacity)
            .map_err(|err| QueueError::AllocationFailure {
                message: format!("ring grow {capacity} -> {target} slots: {err}"),
            })?;
        self.slots.resize_with(target, || None);

        if self.head > self.tail {
            let shift = target - capacity;
            for index in (self.head..capacity).rev() {
                self.slots[index + shift] = self.slots[index].take();
            }
            self.head += shift;
        }

        log::debug!("event ring resized: {capacity} -> {target} slots");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_creation_with_explicit_size() {
        let ring: EventRing<u32> = EventRing::with_capacity(16).unwrap();
        assert_eq!(ring.capacity(), 16);
        assert_eq!(ring.len(), 0);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_ring_creation_with_zero_size_uses_default() {
        let ring: EventRing<u32> = EventRing::with_capacity(0).unwrap();
        assert_eq!(ring.capacity(), DEFAULT_RING_CAPACITY);
    }

    #[test]
    fn test_push_pop_fifo_order() {
        let mut ring = EventRing::with_capacity(8).unwrap();
        for value in 0..5 {
            ring.push_back(value).unwrap();
        }
        assert_eq!(ring.len(), 5);
        for expected in 0..5 {
            assert_eq!(ring.pop_front(), Some(expected));
        }
        assert!(ring.pop_front().is_none());
    }

    #[test]
    fn test_pop_on_empty_returns_none() {
        let mut ring: EventRing<u8> = EventRing::with_capacity(4).unwrap();
        assert!(ring.pop_front().is_none());
    }

    #[test]
    fn test_draining_re_anchors_indices() {
        let mut ring = EventRing::with_capacity(4).unwrap();
        ring.push_back('a').unwrap();
        ring.push_back('b').unwrap();
        ring.pop_front();
        ring.pop_front();

        // A drained ring starts over from slot zero, so the next fills are
        // contiguous again.
        ring.push_back('c').unwrap();
        ring.push_back('d').unwrap();
        ring.push_back('e').unwrap();
        ring.push_back('f').unwrap();
        assert_eq!(ring.capacity(), 4);
        assert_eq!(ring.len(), 4);
        for expected in ['c', 'd', 'e', 'f'] {
            assert_eq!(ring.pop_front(), Some(expected));
        }
    }

    #[test]
    fn test_wraparound_preserves_order() {
        let mut ring = EventRing::with_capacity(4).unwrap();
        for value in [1, 2, 3, 4] {
            ring.push_back(value).unwrap();
        }
        assert_eq!(ring.pop_front(), Some(1));
        assert_eq!(ring.pop_front(), Some(2));

        // These two wrap past the end of the array.
        ring.push_back(5).unwrap();
        ring.push_back(6).unwrap();
        assert_eq!(ring.capacity(), 4);

        for expected in [3, 4, 5, 6] {
            assert_eq!(ring.pop_front(), Some(expected));
        }
    }

    #[test]
    fn test_growth_is_alignment_rounded() {
        let mut ring = EventRing::with_capacity(10).unwrap();
        for value in 0..10 {
            ring.push_back(value).unwrap();
        }
        assert_eq!(ring.capacity(), 10);

        // The push that finds the ring full triggers a grow to
        // max(20, 11) rounded up to the next multiple of 256.
        ring.push_back(10).unwrap();
        assert_eq!(ring.capacity(), 256);
        assert_eq!(ring.len(), 11);
    }

    #[test]
    fn test_grow_with_smaller_hint_is_noop() {
        let mut ring: EventRing<u8> = EventRing::with_capacity(512).unwrap();
        ring.grow(128).unwrap();
        assert_eq!(ring.capacity(), 512);
        ring.grow(512).unwrap();
        assert_eq!(ring.capacity(), 512);
    }

    #[test]
    fn test_resize_while_wrapped_preserves_order() {
        let mut ring = EventRing::with_capacity(4).unwrap();
        for value in ['a', 'b', 'c', 'd'] {
            ring.push_back(value).unwrap();
        }
        ring.pop_front();
        ring.pop_front();
        ring.push_back('e').unwrap();
        ring.push_back('f').unwrap();

        // Occupied region now wraps: c,d sit at the tail end of the array and
        // e,f at the front. The next push grows the ring and must relocate
        // the tail-side segment.
        ring.push_back('g').unwrap();
        assert_eq!(ring.capacity(), 256);
        assert_eq!(ring.len(), 5);

        for expected in ['c', 'd', 'e', 'f', 'g'] {
            assert_eq!(ring.pop_front(), Some(expected));
        }
        assert!(ring.pop_front().is_none());
    }

    #[test]
    fn test_repeated_growth_doubles_capacity() {
        let mut ring = EventRing::with_capacity(2).unwrap();
        for value in 0..300 {
            ring.push_back(value).unwrap();
        }
        // 2 -> 256 on the third push, 256 -> 512 on the 257th.
        assert_eq!(ring.capacity(), 512);
        for expected in 0..300 {
            assert_eq!(ring.pop_front(), Some(expected));
        }
    }
}
