use super::{value, Queue};
use crate::ring;

impl Queue {
    /// Removes every element that has an element with a strictly smaller
    /// payload anywhere after it.
    ///
    /// What remains is non-decreasing from front to back. Returns the number
    /// of elements left in the queue.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyphae::Queue;
    ///
    /// let mut queue: Queue = ["5", "3", "4", "1", "2"].into_iter().collect();
    /// assert_eq!(queue.ascend(), 2);
    /// assert_eq!(queue.to_vec(), ["1", "2"]);
    /// ```
    pub fn ascend(&mut self) -> usize {
        self.retain_from_back(|candidate, kept| candidate > kept)
    }

    /// Removes every element that has an element with a strictly greater
    /// payload anywhere after it.
    ///
    /// What remains is non-increasing from front to back. Returns the number
    /// of elements left in the queue.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyphae::Queue;
    ///
    /// let mut queue: Queue = ["5", "3", "4", "1", "2"].into_iter().collect();
    /// assert_eq!(queue.descend(), 3);
    /// assert_eq!(queue.to_vec(), ["5", "4", "2"]);
    /// ```
    pub fn descend(&mut self) -> usize {
        self.retain_from_back(|candidate, kept| candidate < kept)
    }

    /// Walks the queue from back to front, comparing each element against the
    /// most recently kept one, and drops it if `dominated(candidate, kept)`.
    ///
    /// The last element is always kept. Returns the number of elements kept.
    fn retain_from_back(&mut self, dominated: impl Fn(&str, &str) -> bool) -> usize {
        let sentinel = self.ring.sentinel();
        let mut kept = 0usize;
        let mut removed = 0usize;
        unsafe {
            let mut current = ring::prev(sentinel);
            if current == sentinel {
                return 0;
            }
            kept += 1;

            loop {
                let candidate = ring::prev(current);
                if candidate == sentinel {
                    break;
                }

                if dominated(value(candidate), value(current)) {
                    drop(self.ring.take(candidate));
                    removed += 1;
                } else {
                    current = candidate;
                    kept += 1;
                }
            }
        }

        tracing::trace!(kept, removed, "filtered queue");
        kept
    }
}
