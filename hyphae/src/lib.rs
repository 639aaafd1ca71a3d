//! Circular, [intrusive], doubly-linked queues of owned strings.
//!
//! The central type is [`Queue`], a ring of heap-allocated [`Element`]s
//! hanging off a single sentinel. Every operation on a [`Queue`] is a piece of
//! in-place pointer surgery: elements are spliced, reversed, sorted, filtered
//! and merged by rewriting their links, never by copying payloads into
//! auxiliary storage.
//!
//! ```
//! use hyphae::{Order, Queue};
//!
//! let mut queue: Queue = ["b", "a", "b", "c"].into_iter().collect();
//!
//! queue.sort(Order::Ascending);
//! assert_eq!(queue.to_vec(), ["a", "b", "b", "c"]);
//!
//! // remove every value that occurs more than once
//! queue.delete_dup();
//! assert_eq!(queue.to_vec(), ["a", "c"]);
//!
//! let head = queue.pop_front().expect("queue has two elements");
//! assert_eq!(head.value(), "a");
//! ```
//!
//! Several independently sorted queues may be merged into one with a
//! [`Group`]:
//!
//! ```
//! use hyphae::{Group, Order, Queue};
//!
//! let mut odd: Queue = ["1", "3", "5"].into_iter().collect();
//! let mut even: Queue = ["2", "4"].into_iter().collect();
//!
//! let mut group = Group::new();
//! group.push(&mut odd).unwrap();
//! group.push(&mut even).unwrap();
//! assert_eq!(group.merge(Order::Ascending), 5);
//! drop(group);
//!
//! assert_eq!(odd.to_vec(), ["1", "2", "3", "4", "5"]);
//! assert!(even.is_empty());
//! ```
//!
//! ## Intrusive data structures
//!
//! The rings in this crate do not allocate nodes of their own. Instead, each
//! node *embeds* a [`ring::Links`] value holding its `prev` and `next`
//! pointers, and implements the [`Linked`] trait to tell the ring where those
//! links live. Both [`Queue`] (a ring of [`Element`]s) and [`Group`] (a ring
//! of [`group::Context`]s) are built on the same generic [`Ring`].
//!
//! ## Features
//!
//! - `std` (on by default): enables `std` support in `tracing` and
//!   `thiserror`. Without it, this crate is `no_std` and only requires
//!   `alloc`.
//!
//! [intrusive]: #intrusive-data-structures
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, deny(missing_docs))]
#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;
#[cfg(test)]
extern crate std;

#[macro_use]
pub(crate) mod util;

pub mod element;
pub mod error;
pub mod group;
pub mod queue;
pub mod ring;

#[doc(inline)]
pub use element::Element;
#[doc(inline)]
pub use error::AllocError;
#[doc(inline)]
pub use group::Group;
#[doc(inline)]
pub use queue::{Order, Queue};
#[doc(inline)]
pub use ring::Ring;

use core::ptr::NonNull;

/// Trait implemented by types which can be members of an [intrusive
/// collection].
///
/// In order to be part of a [`Ring`], a type must contain a [`ring::Links`]
/// value that stores the pointers to its neighbours.
///
/// # Safety
///
/// This is unsafe to implement because it's the implementation's
/// responsibility to ensure that types implementing this trait are valid
/// intrusive collection nodes. In particular:
///
/// - Implementations **must** ensure that implementors are pinned in memory
///   while they are in an intrusive collection. While a given `Linked` type is
///   in an intrusive data structure, it may not be deallocated or moved to a
///   different memory location.
/// - [`Linked::links`] and [`Linked::from_links`] **must** be inverses of each
///   other.
///
/// Failure to uphold these invariants will result in corruption of the
/// intrusive data structure, including dangling pointers.
///
/// [intrusive collection]: crate#intrusive-data-structures
pub unsafe trait Linked<L> {
    /// The handle owning nodes in the ring.
    ///
    /// This type must have ownership over a `Self`-typed value. When a
    /// `Handle` is dropped, it should drop the corresponding `Linked` type.
    ///
    /// A quintessential example of a `Handle` is [`Box`].
    ///
    /// [`Box`]: alloc::boxed::Box
    type Handle;

    /// Convert a [`Self::Handle`] to a raw pointer to `Self`, taking ownership
    /// of it in the process.
    fn into_ptr(r: Self::Handle) -> NonNull<Self>;

    /// Convert a raw pointer to `Self` into an owning [`Self::Handle`].
    ///
    /// # Safety
    ///
    /// This function is safe to call when:
    /// - It is valid to construct a [`Self::Handle`] from a raw pointer
    /// - The pointer points to a valid instance of `Self` (e.g. it does not
    ///   dangle).
    unsafe fn from_ptr(ptr: NonNull<Self>) -> Self::Handle;

    /// Return the links of the node pointed to by `ptr`.
    ///
    /// # Safety
    ///
    /// The pointer must point to a valid instance of `Self`.
    unsafe fn links(ptr: NonNull<Self>) -> NonNull<L>;

    /// Return the node that contains the links pointed to by `links`.
    ///
    /// # Safety
    ///
    /// `links` must have been returned by [`Linked::links`]. In particular, it
    /// must never be the sentinel of a [`Ring`].
    unsafe fn from_links(links: NonNull<L>) -> NonNull<Self>;
}
