use crate::AllocError;
use alloc::boxed::Box;
use core::{alloc::Layout, fmt, ptr::NonNull};

macro_rules! test_trace {
    ($($tt:tt)*) => {
        #[cfg(test)]
        tracing::trace!($($tt)*)
    }
}

pub(crate) struct FmtOption<'a, T> {
    opt: Option<&'a T>,
    or_else: &'a str,
}

/// Moves `value` into a new heap allocation, returning `on_err` rather than
/// aborting if the global allocator is out of memory.
///
/// If the allocation fails, `value` is dropped before returning.
pub(crate) fn try_box<T>(value: T, on_err: AllocError) -> Result<Box<T>, AllocError> {
    let layout = Layout::new::<T>();
    if layout.size() == 0 {
        return Ok(Box::new(value));
    }

    // Safety: `layout` has a non-zero size.
    let ptr = unsafe { alloc::alloc::alloc(layout) }.cast::<T>();
    let Some(ptr) = NonNull::new(ptr) else {
        tracing::debug!(size = layout.size(), error = %on_err, "allocation failed");
        return Err(on_err);
    };

    unsafe {
        // Safety: `ptr` was just allocated by the global allocator with the
        // layout of `T`, which is exactly what `Box::from_raw` requires.
        ptr.as_ptr().write(value);
        Ok(Box::from_raw(ptr.as_ptr()))
    }
}

// === impl FmtOption ===

impl<'a, T> FmtOption<'a, T> {
    pub(crate) fn new(opt: &'a Option<T>) -> Self {
        Self {
            opt: opt.as_ref(),
            or_else: "None",
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for FmtOption<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.opt {
            Some(val) => val.fmt(f),
            None => f.write_str(self.or_else),
        }
    }
}

#[cfg(test)]
pub(crate) fn assert_send<T: Send>() {}
