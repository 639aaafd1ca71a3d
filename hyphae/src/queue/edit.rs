use super::{value, Queue};
use crate::ring;

impl Queue {
    /// Removes and drops the middle element of the queue.
    ///
    /// For a queue of `n` elements, this removes the element at index `n / 2`
    /// (counting from zero): when `n` is even, that is the second of the two
    /// middle elements.
    ///
    /// Returns `false` if the queue was empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyphae::Queue;
    ///
    /// let mut queue: Queue = ["a", "b", "c", "d"].into_iter().collect();
    /// assert!(queue.delete_mid());
    /// assert_eq!(queue.to_vec(), ["a", "b", "d"]);
    /// ```
    pub fn delete_mid(&mut self) -> bool {
        let Some(mid) = self.ring.pop_middle() else {
            return false;
        };
        tracing::trace!(value = mid.value(), "deleted middle element");
        true
    }

    /// Removes and drops every element whose payload equals that of an
    /// adjacent element.
    ///
    /// This is meant to be used on a sorted queue, where equal payloads are
    /// adjacent. Every run of two or more equal payloads is removed
    /// *entirely*: no copy of a duplicated value is kept.
    ///
    /// Returns `false` if the queue was empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyphae::Queue;
    ///
    /// let mut queue: Queue = ["a", "b", "b", "c", "c", "c", "d"].into_iter().collect();
    /// assert!(queue.delete_dup());
    /// assert_eq!(queue.to_vec(), ["a", "d"]);
    /// ```
    pub fn delete_dup(&mut self) -> bool {
        if self.is_empty() {
            return false;
        }

        let sentinel = self.ring.sentinel();
        let mut deleted = 0usize;
        unsafe {
            let mut curr = ring::next(sentinel);
            while curr != sentinel {
                let mut end = ring::next(curr);
                while end != sentinel && value(end) == value(curr) {
                    end = ring::next(end);
                }

                if end != ring::next(curr) {
                    // `curr` starts a run of duplicates ending right before
                    // `end`; drop all of it.
                    while curr != end {
                        let following = ring::next(curr);
                        drop(self.ring.take(curr));
                        deleted += 1;
                        curr = following;
                    }
                }
                curr = end;
            }
        }

        tracing::trace!(deleted, "deleted duplicates");
        true
    }

    /// Swaps every two adjacent elements.
    ///
    /// If the queue has an odd number of elements, the last one stays where
    /// it is.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyphae::Queue;
    ///
    /// let mut queue: Queue = ["1", "2", "3", "4", "5"].into_iter().collect();
    /// queue.swap();
    /// assert_eq!(queue.to_vec(), ["2", "1", "4", "3", "5"]);
    /// ```
    pub fn swap(&mut self) {
        self.ring.swap_pairs();
    }

    /// Reverses the queue in place.
    ///
    /// No element is moved or copied; every node's links are exchanged
    /// instead.
    pub fn reverse(&mut self) {
        self.ring.reverse();
    }

    /// Reverses every run of `k` consecutive elements, front to back.
    ///
    /// If the length of the queue is not a multiple of `k`, the trailing
    /// elements keep their order. A `k` of 0 or 1 leaves the queue as it is.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyphae::Queue;
    ///
    /// let mut queue: Queue = ["1", "2", "3", "4", "5", "6", "7", "8"].into_iter().collect();
    /// queue.reverse_k(3);
    /// assert_eq!(queue.to_vec(), ["3", "2", "1", "6", "5", "4", "7", "8"]);
    /// ```
    pub fn reverse_k(&mut self, k: usize) {
        self.ring.reverse_k(k);
    }
}
