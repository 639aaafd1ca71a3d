//! Circular queues of owned strings.
//!
//! See the [`Queue`] type for details.
use crate::{
    element::Element,
    ring::{self, Link, Ring},
    AllocError, Linked,
};
use alloc::{boxed::Box, vec::Vec};
use core::{fmt, iter::FusedIterator};

mod edit;
mod filter;
mod sort;


pub use self::sort::Order;

/// A circular, doubly-linked queue of owned strings.
///
/// A `Queue` is a [`Ring`] of [`Element`]s: one sentinel node whose `next`
/// and `prev` links point at the first and last elements, with each element
/// owning exactly one `String` payload. Elements may be inserted and removed
/// at either end, and the queue may be reordered, sorted, filtered and merged
/// in place; none of those operations allocates or copies a payload.
///
/// Removing an element transfers ownership of it to the caller as a
/// `Box<Element>`. Dropping a `Queue` drops every element still in it.
///
/// # Examples
///
/// ```
/// use hyphae::Queue;
///
/// let mut queue = Queue::new();
/// queue.insert_tail("gill").unwrap();
/// queue.insert_tail("spore").unwrap();
/// queue.insert_head("cap").unwrap();
///
/// assert_eq!(queue.len(), 3);
/// assert_eq!(queue.to_vec(), ["cap", "gill", "spore"]);
///
/// // removed elements can be copied out into a NUL-terminated buffer
/// let mut buf = [0u8; 4];
/// let spore = queue.remove_tail(Some(&mut buf)).unwrap();
/// assert_eq!(&buf, b"spo\0");
/// assert_eq!(spore.value(), "spore");
/// ```
pub struct Queue {
    ring: Ring<Element>,
}

/// A double-ended iterator over the payloads of a [`Queue`].
pub struct Iter<'queue> {
    inner: ring::Iter<'queue, Element>,
}

/// Returns the payload of the element containing `node`.
///
/// # Safety
///
/// `node` must be an element of a live queue, not its sentinel, and the
/// returned reference must not outlive that element.
#[inline]
unsafe fn value<'a>(node: Link<Element>) -> &'a str {
    Element::from_links(node).as_ref().value()
}

// === impl Queue ===

impl Queue {
    /// Returns a new, empty queue.
    ///
    /// This aborts if the sentinel cannot be allocated; use
    /// [`Queue::try_new`] to handle allocation failure instead.
    #[must_use]
    pub fn new() -> Self {
        Self { ring: Ring::new() }
    }

    /// Returns a new, empty queue, or an error if the sentinel could not be
    /// allocated.
    pub fn try_new() -> Result<Self, AllocError> {
        Ring::try_new().map(|ring| Self { ring })
    }

    /// Returns the number of elements in the queue.
    ///
    /// Queues do not track their length, so this is *O*(*n*): it counts every
    /// element reachable from the sentinel.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Returns `true` if the queue has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Returns the payload of the first element, if there is one.
    #[must_use]
    pub fn front(&self) -> Option<&str> {
        self.ring.front().map(Element::value)
    }

    /// Returns the payload of the last element, if there is one.
    #[must_use]
    pub fn back(&self) -> Option<&str> {
        self.ring.back().map(Element::value)
    }

    /// Returns an iterator over the payloads in this queue, front to back.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.ring.iter(),
        }
    }

    /// Returns the payloads in this queue, front to back.
    #[must_use]
    pub fn to_vec(&self) -> Vec<&str> {
        self.iter().collect()
    }

    /// Copies `value` into a new element and links it in at the front of the
    /// queue.
    ///
    /// # Errors
    ///
    /// If the element or its payload cannot be allocated, this returns an
    /// [`AllocError`] and the queue is left unchanged.
    pub fn insert_head(&mut self, value: &str) -> Result<(), AllocError> {
        let element = Element::try_new(value)?;
        self.ring.push_front(element);
        Ok(())
    }

    /// Copies `value` into a new element and links it in at the back of the
    /// queue.
    ///
    /// # Errors
    ///
    /// If the element or its payload cannot be allocated, this returns an
    /// [`AllocError`] and the queue is left unchanged.
    pub fn insert_tail(&mut self, value: &str) -> Result<(), AllocError> {
        let element = Element::try_new(value)?;
        self.ring.push_back(element);
        Ok(())
    }

    /// Unlinks the first element and returns ownership of it.
    pub fn pop_front(&mut self) -> Option<Box<Element>> {
        self.ring.pop_front()
    }

    /// Unlinks the last element and returns ownership of it.
    pub fn pop_back(&mut self) -> Option<Box<Element>> {
        self.ring.pop_back()
    }

    /// Unlinks the first element and returns ownership of it, optionally
    /// copying its payload into `buf` first.
    ///
    /// If a buffer is provided, at most `buf.len() - 1` bytes of the payload
    /// are copied into it, and the copy is NUL-terminated (see
    /// [`Element::copy_to`]). The payload of the returned element is left
    /// untouched.
    ///
    /// Returns `None` if the queue is empty, in which case `buf` is not
    /// written to.
    pub fn remove_head(&mut self, buf: Option<&mut [u8]>) -> Option<Box<Element>> {
        let element = self.pop_front()?;
        Some(copy_out(element, buf))
    }

    /// Unlinks the last element and returns ownership of it, optionally
    /// copying its payload into `buf` first.
    ///
    /// See [`Queue::remove_head`] for details.
    pub fn remove_tail(&mut self, buf: Option<&mut [u8]>) -> Option<Box<Element>> {
        let element = self.pop_back()?;
        Some(copy_out(element, buf))
    }

    /// Asserts as many of the queue's structural invariants as possible.
    ///
    /// # Panics
    ///
    /// If any element's neighbours do not link back to it.
    pub fn assert_valid(&self) {
        self.ring.assert_valid()
    }
}

fn copy_out(element: Box<Element>, buf: Option<&mut [u8]>) -> Box<Element> {
    debug_assert!(!element.is_linked(), "removed element must be unlinked");
    if let Some(buf) = buf {
        let copied = element.copy_to(buf);
        tracing::trace!(copied, len = element.value().len(), "copied out payload");
    }
    element
}

impl Default for Queue {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> Extend<&'a str> for Queue {
    /// Appends a copy of every string in `iter` to the back of the queue.
    ///
    /// Like [`Vec`]'s `Extend` implementation, this aborts on allocation
    /// failure. Use [`Queue::insert_tail`] to handle it instead.
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for value in iter {
            self.ring.push_back(Element::new(value));
        }
    }
}

impl<'a> FromIterator<&'a str> for Queue {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut queue = Self::new();
        queue.extend(iter);
        queue
    }
}

impl<'queue> IntoIterator for &'queue Queue {
    type Item = &'queue str;
    type IntoIter = Iter<'queue>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// === impl Iter ===

impl<'queue> Iterator for Iter<'queue> {
    type Item = &'queue str;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(Element::value)
    }
}

impl DoubleEndedIterator for Iter<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(Element::value)
    }
}

impl FusedIterator for Iter<'_> {}
