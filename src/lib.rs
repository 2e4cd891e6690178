mod error;
mod matrix;
mod method;
mod op;
mod sequence;
mod shape;
extern crate alloc;
use core::marker::PhantomData;
use core::ptr::{self, NonNull};
use std::mem;

pub use error::{GResult, SeqError};
pub use matrix::Matrix;
pub use method::Scalar;
pub use sequence::{GrowableSequence, GrowthPolicy};
pub use shape::Shape;

#[macro_export]
macro_rules! seq {
    ($($x:expr),* $(,)*) => {{
        $crate::GrowableSequence::from(vec![$($x,)*])
    }};
}

#[macro_export]
macro_rules! mat {
    ($([$($x:expr),* $(,)*]),+ $(,)*) => {{
        $crate::Matrix::from_rows(&[$([$($x,)*],)*])
    }};
}

#[cold]
fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

pub(crate) struct SetLenOnDrop<'a> {
    len: &'a mut usize,
    local_len: usize,
}

impl<'a> SetLenOnDrop<'a> {
    #[inline]
    pub(crate) fn new(len: &'a mut usize) -> Self {
        SetLenOnDrop {
            local_len: *len,
            len,
        }
    }

    #[inline]
    pub(crate) fn increment_len(&mut self, increment: usize) {
        self.local_len += increment;
    }

    #[inline]
    pub(crate) fn current_len(&self) -> usize {
        self.local_len
    }
}

impl Drop for SetLenOnDrop<'_> {
    #[inline]
    fn drop(&mut self) {
        *self.len = self.local_len;
    }
}

pub(crate) struct RawBuf<P> {
    ptr: NonNull<P>,
    cap: usize,
    _marker: PhantomData<P>,
}

unsafe impl<P: Send> Send for RawBuf<P> {}
unsafe impl<P: Sync> Sync for RawBuf<P> {}

impl<P> RawBuf<P> {
    pub(crate) const fn dangling() -> Self {
        Self {
            ptr: NonNull::<P>::dangling(),
            cap: 0,
            _marker: PhantomData,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        if capacity == 0 {
            return Self::dangling();
        }
        use alloc::alloc::{alloc, handle_alloc_error, Layout};
        let layout = match Layout::array::<P>(capacity) {
            Ok(layout) => layout,
            Err(_) => capacity_overflow(),
        };
        let ptr = if layout.size() == 0 {
            core::ptr::NonNull::<P>::dangling()
        } else {
            let ptr = unsafe { alloc(layout) } as *mut P;
            if ptr.is_null() {
                handle_alloc_error(layout)
            } else {
                unsafe { NonNull::<P>::new_unchecked(ptr) }
            }
        };
        Self {
            ptr,
            cap: capacity,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    #[inline]
    pub(crate) fn as_ptr(&self) -> *const P {
        self.ptr.as_ptr()
    }

    #[inline]
    pub(crate) fn as_ptr_mut(&mut self) -> *mut P {
        self.ptr.as_ptr()
    }

    /// Moves the first `len` slots into a fresh allocation of `capacity` slots
    /// and releases the old one.
    ///
    /// # Safety
    ///
    /// Slots `[0, len)` must be initialised and `len <= capacity`.
    pub(crate) unsafe fn reallocate(&mut self, len: usize, capacity: usize) {
        debug_assert!(len <= capacity && len <= self.cap);
        let mut fresh = RawBuf::with_capacity(capacity);
        ptr::copy_nonoverlapping(self.as_ptr(), fresh.as_ptr_mut(), len);
        mem::swap(self, &mut fresh);
    }
}

impl<P> Drop for RawBuf<P> {
    fn drop(&mut self) {
        if self.cap == 0 || mem::size_of::<P>() == 0 {
            return;
        }
        use alloc::alloc::{dealloc, Layout};
        if let Ok(layout) = Layout::array::<P>(self.cap) {
            unsafe { dealloc(self.ptr.as_ptr() as *mut u8, layout) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rawbuf_capacity() {
        let b = RawBuf::<u32>::with_capacity(10);
        assert_eq!(b.capacity(), 10);
        let z = RawBuf::<u32>::with_capacity(0);
        assert_eq!(z.capacity(), 0);
        let zst = RawBuf::<()>::with_capacity(4);
        assert_eq!(zst.capacity(), 4);
    }

    #[test]
    fn test_rawbuf_reallocate_keeps_prefix() {
        let mut b = RawBuf::<u64>::with_capacity(2);
        unsafe {
            ptr::write(b.as_ptr_mut(), 7);
            ptr::write(b.as_ptr_mut().add(1), 9);
            b.reallocate(2, 8);
            assert_eq!(b.capacity(), 8);
            assert_eq!(*b.as_ptr(), 7);
            assert_eq!(*b.as_ptr().add(1), 9);
        }
    }

    #[test]
    fn test_set_len_on_drop() {
        let mut len = 3;
        {
            let mut guard = SetLenOnDrop::new(&mut len);
            guard.increment_len(2);
            assert_eq!(guard.current_len(), 5);
        }
        assert_eq!(len, 5);
    }

    #[test]
    fn test_macros() {
        let s = seq![1, 2, 3];
        assert_eq!(s.as_slice(), &[1, 2, 3]);
        let m = mat![[1, 2, 3], [4, 5, 6]].unwrap();
        assert_eq!((m.rows(), m.columns()), (2, 3));
        assert_eq!(m[(2, 3)], 6);
    }
}
