use super::{value, Queue};
use crate::{
    element::Element,
    ring::{self, Link},
};
use core::cmp::Ordering;

/// The order in which [`Queue::sort`] arranges payloads, and in which
/// [`Group::merge`](crate::Group::merge) expects them.
///
/// Payloads are compared byte-wise, lexicographically (the same ordering as
/// `str`'s [`Ord`] implementation).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// Smallest payload first.
    #[default]
    Ascending,
    /// Largest payload first.
    Descending,
}

impl Order {
    /// Returns `true` if `later` must be placed in front of `earlier`.
    ///
    /// Equal payloads never need to be swapped, which is what keeps sorting
    /// and merging stable.
    #[inline]
    fn precedes(self, later: &str, earlier: &str) -> bool {
        let ordering = later.cmp(earlier);
        match self {
            Order::Ascending => ordering == Ordering::Less,
            Order::Descending => ordering == Ordering::Greater,
        }
    }
}

impl Queue {
    /// Sorts the queue in place.
    ///
    /// This is a stable merge sort: elements with equal payloads keep their
    /// relative order. The queue is recursively split at its midpoint, and
    /// sorted halves are merged by relinking elements, so sorting never
    /// allocates. It takes *O*(*n* log *n*) time and *O*(log *n*) stack.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyphae::{Order, Queue};
    ///
    /// let mut queue: Queue = ["spore", "cap", "gill", "stipe"].into_iter().collect();
    ///
    /// queue.sort(Order::Ascending);
    /// assert_eq!(queue.to_vec(), ["cap", "gill", "spore", "stipe"]);
    ///
    /// queue.sort(Order::Descending);
    /// assert_eq!(queue.to_vec(), ["stipe", "spore", "gill", "cap"]);
    /// ```
    pub fn sort(&mut self, order: Order) {
        let sentinel = self.ring.sentinel();
        unsafe {
            // Safety: the whole queue is the run between the sentinel and
            // itself, and we hold `&mut self` for the duration.
            sort_run(sentinel, sentinel, order);
        }
    }

    /// Moves every element of `other` into this queue, preserving `order`.
    ///
    /// Both queues must already be sorted in `order`. Afterwards, `other` is
    /// empty and this queue holds every element of both, still sorted. When
    /// payloads compare equal, elements that were already in this queue come
    /// first. Elements are relinked, never copied.
    ///
    /// Returns the number of elements moved out of `other`.
    pub fn merge_from(&mut self, other: &mut Queue, order: Order) -> usize {
        let moved = other.len();
        if moved == 0 {
            return 0;
        }

        let sentinel = self.ring.sentinel();
        unsafe {
            let left_last = ring::prev(sentinel);
            self.ring.append(&mut other.ring);
            // Safety: after the append, our old elements and `other`'s are
            // two adjacent sorted runs split at `left_last`.
            merge_runs(sentinel, left_last, sentinel, order);
        }

        tracing::trace!(moved, ?order, "merged queues");
        moved
    }
}

/// Sorts the nodes strictly between `before` and `end`.
///
/// Neither `before` nor `end` is moved, so the sorted run still sits between
/// them when this returns.
unsafe fn sort_run(before: Link<Element>, end: Link<Element>, order: Order) {
    let first = ring::next(before);
    if first == end || ring::next(first) == end {
        return;
    }

    let mid = ring::middle(first, end);
    sort_run(before, mid, order);

    // `mid` heads the (still unsorted) right half, so whatever now precedes it
    // is the last node of the sorted left half.
    let left_last = ring::prev(mid);
    sort_run(left_last, end, order);
    merge_runs(before, left_last, end, order);
}

/// Merges two adjacent sorted runs in place: the left one runs from after
/// `before` up to and including `left_last`, and the right one from after
/// `left_last` up to (but excluding) `end`.
///
/// Right-run nodes are spliced in front of the first left-run node they must
/// precede. Nodes are only ever moved backwards, so once either run is used
/// up, the other one is already in place.
unsafe fn merge_runs(
    before: Link<Element>,
    left_last: Link<Element>,
    end: Link<Element>,
    order: Order,
) {
    let mut left = ring::next(before);
    let mut right = ring::next(left_last);
    while left != right && right != end {
        if order.precedes(value(right), value(left)) {
            let following = ring::next(right);
            test_trace!(right = value(right), left = value(left), "merge: move");
            ring::move_before(right, left);
            right = following;
        } else {
            left = ring::next(left);
        }
    }
}
