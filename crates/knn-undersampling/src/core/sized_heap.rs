//! A max-heap that never holds more than `k` items.

use core::cmp::Ordering;
use std::collections::BinaryHeap;

/// The most slots reserved up front. Larger heaps grow as items arrive.
const MAX_RESERVED: usize = 1024;

/// A max-heap that never holds more than `k` items.
///
/// When full, pushing an item that is smaller than the current maximum
/// evicts the maximum. This keeps the `k` smallest items seen so far, which
/// is exactly what a k-NN query needs when items are `(distance, index)`
/// pairs.
pub struct SizedHeap<T: PartialOrd> {
    /// The items, largest on top.
    heap: BinaryHeap<MaxItem<T>>,
    /// The maximum number of items.
    k: usize,
}

impl<T: PartialOrd> SizedHeap<T> {
    /// Creates a new heap. `None` means unbounded.
    #[must_use]
    pub fn new(k: Option<usize>) -> Self {
        k.map_or_else(
            || Self {
                heap: BinaryHeap::new(),
                k: usize::MAX,
            },
            |k| Self {
                heap: BinaryHeap::with_capacity(k.min(MAX_RESERVED)),
                k,
            },
        )
    }

    /// Pushes an item, evicting the largest one if the heap would overflow.
    pub fn push(&mut self, item: T) {
        if self.heap.len() < self.k {
            self.heap.push(MaxItem(item));
        } else if let Some(top) = self.heap.peek() {
            if item < top.0 {
                self.heap.pop();
                self.heap.push(MaxItem(item));
            }
        }
    }

    /// Merges another heap into this one, keeping at most `k` items.
    pub fn merge(&mut self, other: Self) {
        for MaxItem(item) in other.heap {
            self.push(item);
        }
    }

    /// The largest item.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.heap.peek().map(|MaxItem(x)| x)
    }

    /// Removes and returns the largest item.
    pub fn pop(&mut self) -> Option<T> {
        self.heap.pop().map(|MaxItem(x)| x)
    }

    /// The number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the heap is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Whether the heap holds `k` items.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.heap.len() == self.k
    }

    /// Consumes the heap and returns the items in ascending order.
    #[must_use]
    pub fn into_sorted_vec(self) -> Vec<T> {
        self.heap.into_sorted_vec().into_iter().map(|MaxItem(x)| x).collect()
    }
}

/// Orders a `PartialOrd` totally. Incomparable items sort as the smaller one,
/// so a NaN distance never stays in the heap over a real one.
struct MaxItem<T: PartialOrd>(T);

impl<T: PartialOrd> PartialEq for MaxItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: PartialOrd> Eq for MaxItem<T> {}

impl<T: PartialOrd> PartialOrd for MaxItem<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: PartialOrd> Ord for MaxItem<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Less)
    }
}
