// Copyright 2026 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The native event inbox.

use std::collections::VecDeque;

/// FIFO with a fixed capacity that evicts its oldest entry on overflow.
#[derive(Debug, Clone)]
pub(crate) struct BoundedQueue<T> {
    items: VecDeque<T>,
    capacity: usize,
    dropped: u64,
    dropped_unreported: u64,
}

impl<T> BoundedQueue<T> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            dropped: 0,
            dropped_unreported: 0,
        }
    }

    /// Appends `item`, returning the entry evicted to make room, if any.
    pub(crate) fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.items.len() == self.capacity {
            self.dropped += 1;
            self.dropped_unreported += 1;
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub(crate) fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    /// Total evictions since creation.
    pub(crate) fn dropped_count(&self) -> u64 {
        self.dropped
    }

    /// Evictions since the previous call.
    pub(crate) fn take_unreported_drops(&mut self) -> u64 {
        core::mem::take(&mut self.dropped_unreported)
    }
}

#[cfg(test)]
mod tests {
    use super::BoundedQueue;

    #[test]
    fn zero_capacity_is_promoted_to_one() {
        let mut queue = BoundedQueue::with_capacity(0);
        assert_eq!(queue.push(10_u32), None);
        assert_eq!(queue.push(11_u32), Some(10));
        assert_eq!(queue.pop(), Some(11_u32));
        assert_eq!(queue.dropped_count(), 1);
    }

    #[test]
    fn overflow_evicts_oldest_and_counts_once() {
        let mut queue = BoundedQueue::with_capacity(2);
        queue.push(1_u32);
        queue.push(2_u32);
        queue.push(3_u32);
        queue.push(4_u32);

        assert_eq!(queue.take_unreported_drops(), 2);
        assert_eq!(queue.take_unreported_drops(), 0, "drops are reported once");
        assert_eq!(queue.dropped_count(), 2);
        assert_eq!(queue.pop(), Some(3_u32));
        assert_eq!(queue.pop(), Some(4_u32));
        assert!(queue.is_empty());
    }

    #[test]
    fn clear_keeps_drop_count() {
        let mut queue = BoundedQueue::with_capacity(1);
        queue.push('a');
        queue.push('b');
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.dropped_count(), 1);
    }
}
