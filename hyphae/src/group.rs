//! Groups of queues, for merging many sorted queues into one.
//!
//! See the [`Group`] type for details.
use crate::{
    queue::{Order, Queue},
    ring::{self, Links, Ring},
    util, AllocError, Linked,
};
use alloc::boxed::Box;
use core::{fmt, ptr::NonNull};

#[cfg(test)]
mod tests;

/// A transient group of queues to be merged with [`Group::merge`].
///
/// A `Group` is itself a [`Ring`], whose entries ([`Context`]s) each borrow
/// one [`Queue`] mutably and cache its length. The group does not own its
/// queues: dropping the group leaves them intact, and since they are borrowed
/// for `'q`, none of them can be used directly until the group is gone.
///
/// # Examples
///
/// ```
/// use hyphae::{Group, Order, Queue};
///
/// let mut a: Queue = ["c", "a"].into_iter().collect();
/// let mut b: Queue = ["d", "b"].into_iter().collect();
/// let mut c: Queue = ["e"].into_iter().collect();
///
/// let mut group = Group::new();
/// for queue in [&mut a, &mut b, &mut c] {
///     queue.sort(Order::Descending);
///     group.push(queue).unwrap();
/// }
///
/// assert_eq!(group.len(), 3);
/// assert_eq!(group.merge(Order::Descending), 5);
/// drop(group);
///
/// assert_eq!(a.to_vec(), ["e", "d", "c", "b", "a"]);
/// assert!(b.is_empty());
/// assert!(c.is_empty());
/// ```
pub struct Group<'q> {
    chain: Ring<Context<'q>>,
    next_id: usize,
}

/// An entry in a [`Group`]: one borrowed queue and its cached length.
#[repr(C)]
pub struct Context<'q> {
    links: Links<Context<'q>>,
    queue: &'q mut Queue,
    size: usize,
    id: usize,
}

// === impl Group ===

impl<'q> Group<'q> {
    /// Returns a new, empty group.
    ///
    /// This aborts if the group's sentinel cannot be allocated; use
    /// [`Group::try_new`] to handle allocation failure instead.
    #[must_use]
    pub fn new() -> Self {
        Self {
            chain: Ring::new(),
            next_id: 0,
        }
    }

    /// Returns a new, empty group, or an error if the group's sentinel could
    /// not be allocated.
    pub fn try_new() -> Result<Self, AllocError> {
        Ok(Self {
            chain: Ring::try_new()?,
            next_id: 0,
        })
    }

    /// Adds `queue` to the end of the group, caching its current length.
    ///
    /// Returns the ID assigned to the new entry. IDs are assigned in push
    /// order, starting at 0.
    ///
    /// # Errors
    ///
    /// If the entry cannot be allocated, this returns an [`AllocError`] and the
    /// group is left unchanged.
    pub fn push(&mut self, queue: &'q mut Queue) -> Result<usize, AllocError> {
        let id = self.next_id;
        let size = queue.len();
        let context = util::try_box(
            Context {
                links: Links::new(),
                queue,
                size,
                id,
            },
            AllocError::Context,
        )?;
        self.chain.push_back(context);
        self.next_id += 1;
        tracing::trace!(id, size, "added queue to group");
        Ok(id)
    }

    /// Returns the number of queues in the group.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Returns `true` if the group has no queues.
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Returns the first entry in the group, whose queue receives every
    /// element on [`Group::merge`].
    #[must_use]
    pub fn first(&self) -> Option<&Context<'q>> {
        self.chain.front()
    }

    /// Returns an iterator over the group's entries, in the order they were
    /// pushed.
    pub fn iter(&self) -> ring::Iter<'_, Context<'q>> {
        self.chain.iter()
    }

    /// Merges every queue in the group into the first one.
    ///
    /// Each queue must already be sorted in `order`. Queues are merged into
    /// the first one pairwise, in group order; afterwards the first queue
    /// holds every element, sorted in `order`, and every other queue is
    /// empty. Elements are relinked from queue to queue, never copied or
    /// dropped.
    ///
    /// Returns the length of the merged queue: the first entry's cached size
    /// plus the number of elements moved into it. Cached sizes are updated to
    /// match. An empty group returns 0, and a group with a single entry
    /// returns that entry's cached size without touching its queue.
    pub fn merge(&mut self, order: Order) -> usize {
        let mut contexts = self.chain.iter_mut();
        let Some(first) = contexts.next() else {
            return 0;
        };

        let mut size = first.size;
        for context in contexts {
            let moved = first.queue.merge_from(context.queue, order);
            tracing::trace!(from = context.id, into = first.id, moved, "merged group member");
            context.size = 0;
            size += moved;
        }
        first.size = size;

        tracing::debug!(into = first.id, size, ?order, "merged queue group");
        size
    }
}

impl Default for Group<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Group<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.chain.iter()).finish()
    }
}

impl<'a, 'q> IntoIterator for &'a Group<'q> {
    type Item = &'a Context<'q>;
    type IntoIter = ring::Iter<'a, Context<'q>>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// === impl Context ===

impl<'q> Context<'q> {
    /// Returns the queue this entry refers to.
    #[must_use]
    pub fn queue(&self) -> &Queue {
        &*self.queue
    }

    /// Returns the queue's length as of the last time it was cached.
    ///
    /// The size is cached by [`Group::push`] and kept up to date by
    /// [`Group::merge`]. Since the group borrows its queues mutably, nothing
    /// else can change a queue's length while it is part of the group.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns this entry's ID within its group.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }
}

unsafe impl<'q> Linked<Links<Context<'q>>> for Context<'q> {
    type Handle = Box<Context<'q>>;

    fn into_ptr(handle: Box<Context<'q>>) -> NonNull<Context<'q>> {
        NonNull::from(Box::leak(handle))
    }

    unsafe fn from_ptr(ptr: NonNull<Context<'q>>) -> Box<Context<'q>> {
        Box::from_raw(ptr.as_ptr())
    }

    unsafe fn links(target: NonNull<Context<'q>>) -> NonNull<Links<Context<'q>>> {
        // Safety: this is safe because the `links` are the first field of
        // `Context`, and `Context` is `repr(C)`.
        target.cast()
    }

    unsafe fn from_links(links: NonNull<Links<Context<'q>>>) -> NonNull<Context<'q>> {
        links.cast()
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.id)
            .field("size", &self.size)
            .field("queue", &self.queue)
            .finish()
    }
}
