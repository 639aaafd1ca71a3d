//! Errors returned by fallible queue operations.

/// An allocation performed on behalf of a queue operation failed.
///
/// Operations returning this error leave their queue exactly as it was: any
/// memory allocated before the failing allocation has already been released.
#[derive(Debug, Clone, Copy, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum AllocError {
    /// The sentinel node of a new [`Ring`](crate::Ring) could not be
    /// allocated.
    #[error("failed to allocate a ring sentinel")]
    Sentinel,

    /// A new [`Element`](crate::Element) node could not be allocated.
    #[error("failed to allocate a queue element")]
    Element,

    /// The payload copy for a new [`Element`](crate::Element) could not be
    /// allocated.
    #[error("failed to allocate a {len}-byte element payload")]
    Payload {
        /// Length of the payload, in bytes.
        len: usize,
    },

    /// A new [`Context`](crate::group::Context) for a
    /// [`Group`](crate::Group) could not be allocated.
    #[error("failed to allocate a queue group entry")]
    Context,
}
