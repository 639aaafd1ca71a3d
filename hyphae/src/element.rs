//! Queue elements: one owned string plus the links that chain it into a
//! [`Queue`](crate::Queue).
use crate::{ring::Links, util, AllocError, Linked};
use alloc::{boxed::Box, string::String};
use core::{fmt, ptr::NonNull};

/// A single element of a [`Queue`](crate::Queue).
///
/// An `Element` exclusively owns its payload string. While it is linked into
/// a queue, it is owned by that queue; once removed (see
/// [`Queue::pop_front`](crate::Queue::pop_front) and friends), the caller
/// receives it as a `Box<Element>`, and dropping the box releases both the
/// node and its payload.
#[repr(C)]
pub struct Element {
    links: Links<Element>,
    value: String,
}

impl Element {
    /// Allocates a new, unlinked element holding a copy of `value`.
    ///
    /// Like [`Box::new`], this aborts if memory cannot be allocated. Use
    /// [`Element::try_new`] to handle allocation failure.
    #[must_use]
    pub fn new(value: &str) -> Box<Self> {
        Box::new(Self {
            links: Links::new(),
            value: String::from(value),
        })
    }

    /// Allocates a new, unlinked element holding a copy of `value`, or
    /// returns an error if either allocation fails.
    ///
    /// The payload is allocated first; if the element node itself cannot be
    /// allocated, the payload is released again before returning.
    pub fn try_new(value: &str) -> Result<Box<Self>, AllocError> {
        let mut payload = String::new();
        payload
            .try_reserve_exact(value.len())
            .map_err(|_| AllocError::Payload { len: value.len() })?;
        payload.push_str(value);

        util::try_box(
            Self {
                links: Links::new(),
                value: payload,
            },
            AllocError::Element,
        )
    }

    /// Returns this element's payload.
    #[inline]
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes this element, returning its payload without copying it.
    #[must_use]
    pub fn into_value(self: Box<Self>) -> String {
        let Self { value, .. } = *self;
        value
    }

    /// Copies as much of the payload as fits into `buf`, followed by a NUL
    /// terminator.
    ///
    /// At most `buf.len() - 1` bytes of the payload are copied. Any bytes of
    /// `buf` after the copied payload are zeroed, so the result is always
    /// NUL-terminated. If `buf` is empty, nothing is written.
    ///
    /// Returns the number of payload bytes copied. Note that a truncated copy
    /// may end in the middle of a multi-byte UTF-8 sequence.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyphae::Element;
    ///
    /// let element = Element::try_new("mycelium").unwrap();
    ///
    /// let mut buf = [0xff; 5];
    /// assert_eq!(element.copy_to(&mut buf), 4);
    /// assert_eq!(&buf, b"myce\0");
    ///
    /// let mut buf = [0xff; 12];
    /// assert_eq!(element.copy_to(&mut buf), 8);
    /// assert_eq!(&buf, b"mycelium\0\0\0\0");
    /// ```
    pub fn copy_to(&self, buf: &mut [u8]) -> usize {
        let Some(cap) = buf.len().checked_sub(1) else {
            return 0;
        };
        let bytes = self.value.as_bytes();
        let len = bytes.len().min(cap);
        let (copied, rest) = buf.split_at_mut(len);
        copied.copy_from_slice(&bytes[..len]);
        rest.fill(0);
        len
    }

    #[inline]
    pub(crate) fn is_linked(&self) -> bool {
        self.links.is_linked()
    }
}

unsafe impl Linked<Links<Element>> for Element {
    type Handle = Box<Element>;

    fn into_ptr(handle: Box<Element>) -> NonNull<Element> {
        NonNull::from(Box::leak(handle))
    }

    unsafe fn from_ptr(ptr: NonNull<Element>) -> Box<Element> {
        // Safety: every `Element` pointer in a ring was produced by
        // `into_ptr`, from a `Box`.
        Box::from_raw(ptr.as_ptr())
    }

    unsafe fn links(target: NonNull<Element>) -> NonNull<Links<Element>> {
        // Safety: this is safe because the `links` are the first field of
        // `Element`, and `Element` is `repr(C)`.
        target.cast()
    }

    unsafe fn from_links(links: NonNull<Links<Element>>) -> NonNull<Element> {
        // Safety: the inverse of the cast in `links`.
        links.cast()
    }
}

impl AsRef<str> for Element {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("value", &self.value)
            .field("links", &self.links)
            .finish()
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
