//! An [intrusive], circular, doubly-linked list with a sentinel.
//!
//! See the [`Ring`] type for details.
//!
//! [intrusive]: crate#intrusive-data-structures
use crate::{
    util::{self, FmtOption},
    AllocError, Linked,
};
use alloc::boxed::Box;
use core::{
    cell::UnsafeCell,
    fmt,
    iter::FusedIterator,
    marker::{PhantomData, PhantomPinned},
    mem,
    ptr::NonNull,
};


/// An [intrusive] circular doubly-linked list.
///
/// A `Ring` owns one heap-allocated *sentinel* [`Links`] that is never a data
/// node. The sentinel's `next` link points at the first element and its
/// `prev` link at the last; when the ring is empty, both point back at the
/// sentinel itself. Because every element always has a neighbour on both
/// sides, insertion and removal never have to special-case the ends of the
/// ring.
///
/// The ring does not keep a length counter: [`Ring::len`] walks the ring.
///
/// In order to be part of a `Ring`, a type `T` must implement [`Linked`] for
/// [`Links<T>`]. Pushing an element transfers ownership of its
/// [`Handle`](Linked::Handle) to the ring; popping it returns ownership to
/// the caller. Dropping a `Ring` drops every element still linked into it.
///
/// A linked element is only ever lent out by shared reference, since moving
/// it would leave its neighbours pointing at the old location. For instance,
/// the following code must not compile:
///
/// ```compile_fail
/// use hyphae::{Element, Ring};
///
/// let mut ring: Ring<Element> = Ring::new();
/// ring.push_back(Element::new("a"));
/// ring.push_back(Element::new("b"));
///
/// let mut iter = ring.iter_mut();
/// let a = iter.next().unwrap();
/// let b = iter.next().unwrap();
/// core::mem::swap(a, b);
/// ```
///
/// [intrusive]: crate#intrusive-data-structures
pub struct Ring<T: Linked<Links<T>>> {
    sentinel: Link<T>,
    _items: PhantomData<T::Handle>,
}

/// Links to other nodes in a [`Ring`].
///
/// In order to be part of a [`Ring`], a type must contain an instance of this
/// type, and must implement the [`Linked`] trait for `Links<Self>`.
pub struct Links<T> {
    inner: UnsafeCell<LinksInner<T>>,
}

/// A double-ended iterator over the elements of a [`Ring`], by reference.
pub struct Iter<'ring, T: Linked<Links<T>>> {
    front: Link<T>,
    back: Link<T>,
    done: bool,
    _ring: PhantomData<&'ring Ring<T>>,
}

/// A double-ended iterator over the elements of a [`Ring`], by mutable
/// reference.
///
/// Elements must not be moved out of the references this yields (for
/// example with [`mem::swap`]), as their links would move with them.
pub(crate) struct IterMut<'ring, T: Linked<Links<T>>> {
    front: Link<T>,
    back: Link<T>,
    done: bool,
    _ring: PhantomData<&'ring mut Ring<T>>,
}

pub(crate) type Link<T> = NonNull<Links<T>>;

#[repr(C)]
struct LinksInner<T> {
    next: Option<Link<T>>,
    prev: Option<Link<T>>,
    /// Linked list links must always be `!Unpin`, in order to ensure that they
    /// never recieve LLVM `noalias` annotations; see also
    /// <https://github.com/rust-lang/rust/issues/63818>.
    _unpin: PhantomPinned,
}

// === raw link surgery ===
//
// These operate on raw links rather than on a `Ring`, so that algorithms can
// splice runs of nodes around without holding a borrow of the ring. Every
// function requires that the links passed to it are live and, unless stated
// otherwise, currently part of a ring.

/// Returns the links following `node`.
#[inline]
pub(crate) unsafe fn next<T>(node: Link<T>) -> Link<T> {
    let next = node.as_ref().next();
    debug_assert!(next.is_some(), "node is not part of a ring; node={:?}", node.as_ref());
    next.unwrap_unchecked()
}

/// Returns the links preceding `node`.
#[inline]
pub(crate) unsafe fn prev<T>(node: Link<T>) -> Link<T> {
    let prev = node.as_ref().prev();
    debug_assert!(prev.is_some(), "node is not part of a ring; node={:?}", node.as_ref());
    prev.unwrap_unchecked()
}

/// Detaches `node` from its ring and joins its former neighbours.
///
/// Afterwards, `node` is no longer part of any ring.
#[inline]
pub(crate) unsafe fn unlink<T>(node: Link<T>) {
    let links = node.as_ref();
    let prev = links.set_prev(None);
    let next = links.set_next(None);
    debug_assert!(prev.is_some() && next.is_some(), "node is not part of a ring");
    prev.unwrap_unchecked().as_ref().set_next(next);
    next.unwrap_unchecked().as_ref().set_prev(prev);
}

/// Links the detached `node` immediately before `at`.
#[inline]
pub(crate) unsafe fn link_before<T>(node: Link<T>, at: Link<T>) {
    debug_assert!(!node.as_ref().is_linked(), "node is already linked");
    let prev = prev(at);
    node.as_ref().set_prev(Some(prev));
    node.as_ref().set_next(Some(at));
    prev.as_ref().set_next(Some(node));
    at.as_ref().set_prev(Some(node));
}

/// Links the detached `node` immediately after `at`.
#[inline]
pub(crate) unsafe fn link_after<T>(node: Link<T>, at: Link<T>) {
    link_before(node, next(at))
}

/// Moves `node` from wherever it is to immediately before `at`.
///
/// `node` and `at` must not be the same links.
#[inline]
pub(crate) unsafe fn move_before<T>(node: Link<T>, at: Link<T>) {
    debug_assert_ne!(node, at, "cannot move a node before itself");
    unlink(node);
    link_before(node, at);
}

/// Returns the node halfway through the run `[first, end)`.
///
/// The midpoint is found with a slow and a fast cursor; the fast one advances
/// two nodes for every node the slow one advances. For a run of `n` nodes,
/// this returns the node at index `n / 2`, i.e. the *second* of the two
/// middle nodes when `n` is even. If the run is empty, this returns `end`.
pub(crate) unsafe fn middle<T>(first: Link<T>, end: Link<T>) -> Link<T> {
    let mut slow = first;
    let mut fast = first;
    while fast != end && next(fast) != end {
        slow = next(slow);
        fast = next(next(fast));
    }
    slow
}

// ==== impl Ring ====

impl<T: Linked<Links<T>>> Ring<T> {
    /// Returns a new empty ring.
    ///
    /// # Panics
    ///
    /// Like [`Box::new`], this aborts if the sentinel cannot be allocated. Use
    /// [`Ring::try_new`] to handle allocation failure.
    #[must_use]
    pub fn new() -> Self {
        Self::from_sentinel(Box::new(Links::new()))
    }

    /// Returns a new empty ring, or an error if the sentinel could not be
    /// allocated.
    pub fn try_new() -> Result<Self, AllocError> {
        util::try_box(Links::new(), AllocError::Sentinel).map(Self::from_sentinel)
    }

    fn from_sentinel(sentinel: Box<Links<T>>) -> Self {
        let sentinel = NonNull::from(Box::leak(sentinel));
        unsafe {
            // Safety: we just leaked the box, so the sentinel is live, and
            // nothing else can be referencing it yet.
            sentinel.as_ref().set_next(Some(sentinel));
            sentinel.as_ref().set_prev(Some(sentinel));
        }
        Self {
            sentinel,
            _items: PhantomData,
        }
    }

    /// Returns `true` if this ring is empty.
    ///
    /// This is *O*(1).
    #[inline]
    pub fn is_empty(&self) -> bool {
        let empty = unsafe { next(self.sentinel) == self.sentinel };
        debug_assert_eq!(
            empty,
            unsafe { prev(self.sentinel) == self.sentinel },
            "inconsistent state: sentinel links to itself in one direction only"
        );
        empty
    }

    /// Returns the number of elements in this ring.
    ///
    /// The ring does not track its length, so this walks the whole ring and is
    /// *O*(*n*).
    pub fn len(&self) -> usize {
        let mut len = 0;
        let mut curr = unsafe { next(self.sentinel) };
        while curr != self.sentinel {
            len += 1;
            curr = unsafe { next(curr) };
        }
        len
    }

    /// Returns a reference to the first element in the ring, or `None` if it
    /// is empty.
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        unsafe { self.get(next(self.sentinel)) }
    }

    /// Returns a reference to the last element in the ring, or `None` if it is
    /// empty.
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        unsafe { self.get(prev(self.sentinel)) }
    }

    /// Asserts as many of the ring's invariants as possible.
    ///
    /// # Panics
    ///
    /// If any node's neighbours do not link back to it.
    pub fn assert_valid(&self) {
        let mut curr = self.sentinel;
        loop {
            let links = unsafe { curr.as_ref() };
            let next = links
                .next()
                .unwrap_or_else(|| panic!("linked node has no next link; node={:#?}", links));
            let prev = links
                .prev()
                .unwrap_or_else(|| panic!("linked node has no prev link; node={:#?}", links));
            assert_eq!(
                unsafe { next.as_ref().prev() },
                Some(curr),
                "node's next link must link back to it; node={:#?}",
                links
            );
            assert_eq!(
                unsafe { prev.as_ref().next() },
                Some(curr),
                "node's prev link must link back to it; node={:#?}",
                links
            );
            if next == self.sentinel {
                break;
            }
            assert_ne!(next, curr, "only the sentinel may link to itself");
            curr = next;
        }
    }

    /// Links an element in as the new first element of the ring.
    pub fn push_front(&mut self, item: T::Handle) {
        let ptr = T::into_ptr(item);
        test_trace!(?ptr, "push_front");
        unsafe { link_after(T::links(ptr), self.sentinel) }
    }

    /// Links an element in as the new last element of the ring.
    pub fn push_back(&mut self, item: T::Handle) {
        let ptr = T::into_ptr(item);
        test_trace!(?ptr, "push_back");
        unsafe { link_before(T::links(ptr), self.sentinel) }
    }

    /// Removes the first element of the ring, returning ownership of it.
    pub fn pop_front(&mut self) -> Option<T::Handle> {
        if self.is_empty() {
            return None;
        }
        unsafe { Some(self.take(next(self.sentinel))) }
    }

    /// Removes the last element of the ring, returning ownership of it.
    pub fn pop_back(&mut self) -> Option<T::Handle> {
        if self.is_empty() {
            return None;
        }
        unsafe { Some(self.take(prev(self.sentinel))) }
    }

    /// Removes the element halfway through the ring, returning ownership of
    /// it.
    ///
    /// For a ring of `n` elements, this is the element at index `n / 2`: for
    /// even `n`, the second of the two middle elements.
    pub fn pop_middle(&mut self) -> Option<T::Handle> {
        if self.is_empty() {
            return None;
        }
        unsafe {
            let mid = middle(next(self.sentinel), self.sentinel);
            Some(self.take(mid))
        }
    }

    /// Remove an arbitrary element from the ring.
    ///
    /// Returns `None` if `item` is not linked into any ring.
    ///
    /// # Safety
    ///
    /// The caller *must* ensure that, if `item` is linked, it is an element
    /// of this ring, and not of any other ring.
    pub unsafe fn remove(&mut self, item: NonNull<T>) -> Option<T::Handle> {
        let links = T::links(item);
        if !links.as_ref().is_linked() {
            return None;
        }
        Some(self.take(links))
    }

    /// Moves every element of `other` onto the end of this ring, leaving
    /// `other` empty.
    ///
    /// This is *O*(1): the whole chain is spliced in by rewriting four links.
    pub fn append(&mut self, other: &mut Ring<T>) {
        if other.is_empty() {
            return;
        }
        unsafe {
            let first = next(other.sentinel);
            let last = prev(other.sentinel);
            let tail = prev(self.sentinel);

            tail.as_ref().set_next(Some(first));
            first.as_ref().set_prev(Some(tail));
            last.as_ref().set_next(Some(self.sentinel));
            self.sentinel.as_ref().set_prev(Some(last));

            other.sentinel.as_ref().set_next(Some(other.sentinel));
            other.sentinel.as_ref().set_prev(Some(other.sentinel));
        }
    }

    /// Swaps every two adjacent elements in place.
    ///
    /// The first element trades places with the second, the third with the
    /// fourth, and so on. If the ring has an odd number of elements, the last
    /// one stays where it is.
    pub fn swap_pairs(&mut self) {
        unsafe {
            let mut curr = next(self.sentinel);
            while curr != self.sentinel {
                let second = next(curr);
                if second == self.sentinel {
                    break;
                }
                move_before(second, curr);
                curr = next(curr);
            }
        }
    }

    /// Reverses the order of the elements in place.
    ///
    /// Every node's `next` and `prev` links (the sentinel's included) are
    /// exchanged; no node is moved.
    pub fn reverse(&mut self) {
        let mut curr = self.sentinel;
        loop {
            unsafe {
                curr.as_ref().flip();
                // after the flip, the old `next` is now `prev`.
                curr = prev(curr);
            }
            if curr == self.sentinel {
                break;
            }
        }
    }

    /// Reverses each run of `k` consecutive elements in place, from front to
    /// back.
    ///
    /// If the number of elements is not a multiple of `k`, the trailing
    /// elements are left as they are. If `k` is 0 or 1, this does nothing.
    pub fn reverse_k(&mut self, k: usize) {
        if k <= 1 {
            return;
        }

        unsafe {
            let mut before = self.sentinel;
            loop {
                let first = next(before);
                let mut end = first;
                for _ in 0..k {
                    if end == self.sentinel {
                        return;
                    }
                    end = next(end);
                }

                // Move every node after `first` to the front of the run. Once
                // they have all been moved, `first` is the last node of the
                // run, and the next run starts right after it.
                let mut curr = next(first);
                while curr != end {
                    let following = next(curr);
                    unlink(curr);
                    link_after(curr, before);
                    curr = following;
                }
                before = first;
            }
        }
    }

    /// Returns an iterator over the elements of this ring, by reference.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        unsafe {
            Iter {
                front: next(self.sentinel),
                back: prev(self.sentinel),
                done: self.is_empty(),
                _ring: PhantomData,
            }
        }
    }

    /// Returns an iterator over the elements of this ring, by mutable
    /// reference.
    ///
    /// Callers may update an element's own fields, but must never move or
    /// replace a yielded element as a whole.
    #[must_use]
    pub(crate) fn iter_mut(&mut self) -> IterMut<'_, T> {
        unsafe {
            IterMut {
                front: next(self.sentinel),
                back: prev(self.sentinel),
                done: self.is_empty(),
                _ring: PhantomData,
            }
        }
    }

    /// Returns this ring's sentinel links.
    #[inline]
    pub(crate) fn sentinel(&self) -> Link<T> {
        self.sentinel
    }

    /// Unlinks `node` and returns ownership of the element containing it.
    ///
    /// # Safety
    ///
    /// `node` must be an element (not the sentinel) of this ring.
    pub(crate) unsafe fn take(&mut self, node: Link<T>) -> T::Handle {
        debug_assert_ne!(node, self.sentinel, "cannot take the sentinel");
        unlink(node);
        T::from_ptr(T::from_links(node))
    }

    /// Returns the element containing `node`, or `None` if `node` is the
    /// sentinel.
    ///
    /// # Safety
    ///
    /// `node` must be part of this ring.
    #[inline]
    pub(crate) unsafe fn get(&self, node: Link<T>) -> Option<&T> {
        if node == self.sentinel {
            return None;
        }
        Some(T::from_links(node).as_ref())
    }
}

unsafe impl<T: Linked<Links<T>>> Send for Ring<T> where T: Send {}
unsafe impl<T: Linked<Links<T>>> Sync for Ring<T> where T: Sync {}

impl<T: Linked<Links<T>>> Drop for Ring<T> {
    fn drop(&mut self) {
        while let Some(item) = self.pop_front() {
            drop(item);
        }

        unsafe {
            // Safety: the sentinel was leaked from a `Box` in
            // `Ring::from_sentinel`, and nothing links to it anymore.
            drop(Box::from_raw(self.sentinel.as_ptr()));
        }
    }
}

impl<T: Linked<Links<T>>> Default for Ring<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Linked<Links<T>>> fmt::Debug for Ring<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (first, last) = unsafe {
            let sentinel = self.sentinel.as_ref();
            (sentinel.next(), sentinel.prev())
        };
        f.debug_struct("Ring")
            .field("sentinel", &self.sentinel)
            .field("first", &FmtOption::new(&first))
            .field("last", &FmtOption::new(&last))
            .finish()
    }
}

impl<T: Linked<Links<T>>> Extend<T::Handle> for Ring<T> {
    fn extend<I: IntoIterator<Item = T::Handle>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T: Linked<Links<T>>> FromIterator<T::Handle> for Ring<T> {
    fn from_iter<I: IntoIterator<Item = T::Handle>>(iter: I) -> Self {
        let mut ring = Self::new();
        ring.extend(iter);
        ring
    }
}

impl<'ring, T: Linked<Links<T>>> IntoIterator for &'ring Ring<T> {
    type Item = &'ring T;
    type IntoIter = Iter<'ring, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ==== impl Links ====

impl<T> Links<T> {
    /// Returns new links for a [circular intrusive list](Ring).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: UnsafeCell::new(LinksInner {
                next: None,
                prev: None,
                _unpin: PhantomPinned,
            }),
        }
    }

    /// Returns `true` if this node is currently linked to a [`Ring`].
    pub fn is_linked(&self) -> bool {
        self.next().is_some() || self.prev().is_some()
    }

    #[inline]
    fn next(&self) -> Option<Link<T>> {
        unsafe { (*self.inner.get()).next }
    }

    #[inline]
    fn prev(&self) -> Option<Link<T>> {
        unsafe { (*self.inner.get()).prev }
    }

    // These take `&self`: the links of a node are reachable from both of its
    // neighbours, so handing out `&mut` references to them would alias.

    #[inline]
    fn set_next(&self, next: Option<Link<T>>) -> Option<Link<T>> {
        unsafe { mem::replace(&mut (*self.inner.get()).next, next) }
    }

    #[inline]
    fn set_prev(&self, prev: Option<Link<T>>) -> Option<Link<T>> {
        unsafe { mem::replace(&mut (*self.inner.get()).prev, prev) }
    }

    #[inline]
    fn flip(&self) {
        let inner = unsafe { &mut *self.inner.get() };
        mem::swap(&mut inner.next, &mut inner.prev);
    }
}

impl<T> Default for Links<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Links<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Links")
            .field("self", &format_args!("{:p}", self))
            .field("next", &FmtOption::new(&self.next()))
            .field("prev", &FmtOption::new(&self.prev()))
            .finish()
    }
}

/// # Safety
///
/// Types containing [`Links`] may be `Send`: the pointers within the `Links`
/// may mutably alias another value, but the links can only be _accessed_ by
/// the owner of the [`Ring`] itself, because the pointers are private. As
/// long as [`Ring`] upholds its own invariants, `Links` should not make a type
/// `!Send`.
unsafe impl<T: Send> Send for Links<T> {}

/// # Safety
///
/// Types containing [`Links`] may be `Sync`: the pointers within the `Links`
/// may mutably alias another value, but the links can only be _accessed_ by
/// the owner of the [`Ring`] itself, because the pointers are private. As
/// long as [`Ring`] upholds its own invariants, `Links` should not make a type
/// `!Sync`.
unsafe impl<T: Sync> Sync for Links<T> {}

// === impl Iter ====

impl<'ring, T: Linked<Links<T>>> Iterator for Iter<'ring, T> {
    type Item = &'ring T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let curr = self.front;
        if curr == self.back {
            self.done = true;
        } else {
            self.front = unsafe { next(curr) };
        }
        // Safety: the iterator borrows the ring, so the node cannot be
        // unlinked or freed while the returned reference is live.
        Some(unsafe { T::from_links(curr).as_ref() })
    }
}

impl<T: Linked<Links<T>>> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let curr = self.back;
        if curr == self.front {
            self.done = true;
        } else {
            self.back = unsafe { prev(curr) };
        }
        Some(unsafe { T::from_links(curr).as_ref() })
    }
}

impl<T: Linked<Links<T>>> FusedIterator for Iter<'_, T> {}

// === impl IterMut ====

impl<'ring, T: Linked<Links<T>>> Iterator for IterMut<'ring, T> {
    type Item = &'ring mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let curr = self.front;
        if curr == self.back {
            self.done = true;
        } else {
            self.front = unsafe { next(curr) };
        }
        // Safety: the iterator mutably borrows the ring, and yields each node
        // at most once, so no two returned references alias.
        Some(unsafe { T::from_links(curr).as_mut() })
    }
}

impl<T: Linked<Links<T>>> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let curr = self.back;
        if curr == self.front {
            self.done = true;
        } else {
            self.back = unsafe { prev(curr) };
        }
        Some(unsafe { T::from_links(curr).as_mut() })
    }
}

impl<T: Linked<Links<T>>> FusedIterator for IterMut<'_, T> {}
