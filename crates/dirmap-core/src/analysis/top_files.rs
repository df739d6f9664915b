/// Bounded top-N largest files.
///
/// Keeps at most `capacity` files in a min-heap while the walk runs, so
/// memory stays O(N) no matter how many files the tree holds. Ties on size
/// are broken by visit order: the file seen first ranks higher, which keeps
/// the output stable for a given walk.
use crate::model::FileFact;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug)]
struct Ranked {
    seq: u64,
    fact: FileFact,
}

impl Ranked {
    fn rank(&self) -> (u64, Reverse<u64>) {
        (self.fact.size, Reverse(self.seq))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.rank() == other.rank()
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// The N largest files seen so far.
#[derive(Debug)]
pub struct TopFiles {
    capacity: usize,
    next_seq: u64,
    /// Min-heap on rank: the weakest kept file sits on top.
    heap: BinaryHeap<Reverse<Ranked>>,
}

impl TopFiles {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            next_seq: 0,
            heap: BinaryHeap::with_capacity(capacity.min(4_096)),
        }
    }

    /// Offer one file.
    pub fn offer(&mut self, fact: FileFact) {
        let candidate = Ranked {
            seq: self.next_seq,
            fact,
        };
        self.next_seq += 1;

        if self.capacity == 0 {
            return;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(candidate));
            return;
        }
        if let Some(Reverse(weakest)) = self.heap.peek() {
            if candidate > *weakest {
                self.heap.pop();
                self.heap.push(Reverse(candidate));
            }
        }
    }

    /// Finish into a list sorted by size descending.
    pub fn into_sorted(self) -> Vec<FileFact> {
        // Ascending on `Reverse<Ranked>` is descending on rank.
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(ranked)| ranked.fact)
            .collect()
    }
}
