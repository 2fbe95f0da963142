use crate::errors::{RoadError, RoadResult};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Min-priority work queue that hands out equal priorities in insertion order.
///
/// Enqueueing never deduplicates: the same item may sit in the queue several
/// times at different priorities.
#[derive(Debug)]
pub struct PriorityFrontier<T> {
    heap: BinaryHeap<Entry<T>>,
    next_sequence: u64,
}

#[derive(Debug)]
struct Entry<T> {
    priority: f32,
    sequence: u64,
    item: T,
}

impl<T> Ord for Entry<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: lower priority, then earlier insertion, wins
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Entry<T> {}

impl<T> Default for PriorityFrontier<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PriorityFrontier<T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_sequence: 0,
        }
    }

    pub fn enqueue(&mut self, item: T, priority: f32) {
        self.heap.push(Entry {
            priority,
            sequence: self.next_sequence,
            item,
        });
        self.next_sequence += 1;
    }

    /// Remove the earliest-inserted item with the smallest priority
    pub fn dequeue(&mut self) -> RoadResult<T> {
        self.heap
            .pop()
            .map(|entry| entry.item)
            .ok_or(RoadError::EmptyQueue)
    }

    pub fn count(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
