use core::ptr;
use std::fmt;
use std::mem;
use std::ops::{Index, IndexMut};
use std::slice;

use log::trace;
use rawpointer::PointerExt;

use crate::error::{GResult, SeqError};
use crate::{capacity_overflow, RawBuf, SetLenOnDrop};

const DEFAULT_MIN_CAPACITY: usize = 10;
const DEFAULT_GROWTH_FACTOR: f64 = 2.0;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GrowthPolicy {
    min_capacity: usize,
    growth_factor: f64,
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self {
            min_capacity: DEFAULT_MIN_CAPACITY,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }
}

impl GrowthPolicy {
    pub fn new(min_capacity: usize, growth_factor: f64) -> GResult<Self> {
        if min_capacity < 1 {
            return Err(SeqError::InvalidCapacity(min_capacity));
        }
        if !growth_factor.is_finite() || growth_factor <= 1.0 {
            return Err(SeqError::InvalidGrowthFactor(growth_factor));
        }
        Ok(Self {
            min_capacity,
            growth_factor,
        })
    }

    // floor of zero, used by the taken state
    const fn unbounded() -> Self {
        Self {
            min_capacity: 0,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        }
    }

    pub fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    pub fn growth_factor(&self) -> f64 {
        self.growth_factor
    }

    fn grow(&self, capacity: usize) -> usize {
        let scaled = (capacity as f64 * self.growth_factor).floor() as usize;
        let next = capacity
            .checked_add(1)
            .unwrap_or_else(|| capacity_overflow());
        scaled.max(next)
    }

    fn shrink(&self, len: usize, capacity: usize) -> Option<usize> {
        if len >= capacity / 4 {
            return None;
        }
        let target = (capacity / 2).max(self.min_capacity);
        (target != capacity).then_some(target)
    }
}

pub struct GrowableSequence<T> {
    buf: RawBuf<T>,
    len: usize,
    policy: GrowthPolicy,
}

impl<T> GrowableSequence<T> {
    pub fn new() -> Self {
        Self::with_policy(GrowthPolicy::default())
    }

    pub fn with_capacity(capacity: usize) -> GResult<Self> {
        Ok(Self::with_policy(GrowthPolicy::new(
            capacity,
            DEFAULT_GROWTH_FACTOR,
        )?))
    }

    pub fn with_policy(policy: GrowthPolicy) -> Self {
        Self {
            buf: RawBuf::with_capacity(policy.min_capacity),
            len: 0,
            policy,
        }
    }

    const fn taken() -> Self {
        Self {
            buf: RawBuf::dangling(),
            len: 0,
            policy: GrowthPolicy::unbounded(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn policy(&self) -> &GrowthPolicy {
        &self.policy
    }

    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.buf.as_ptr_mut(), self.len) }
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    pub fn element_at(&self, index: usize) -> GResult<&T> {
        self.check_index(index)?;
        Ok(unsafe { &*self.buf.as_ptr().add(index) })
    }

    pub fn element_at_mut(&mut self, index: usize) -> GResult<&mut T> {
        self.check_index(index)?;
        Ok(unsafe { &mut *self.buf.as_ptr_mut().add(index) })
    }

    pub fn insert_at(&mut self, index: usize, value: T) -> GResult<()> {
        if index != self.len {
            self.check_index(index)?;
        }
        self.reserve_one();
        unsafe {
            let p = self.buf.as_ptr_mut().add(index);
            ptr::copy(p, p.add(1), self.len - index);
            ptr::write(p, value);
        }
        self.len += 1;
        Ok(())
    }

    pub fn append(&mut self, value: T) {
        self.reserve_one();
        unsafe {
            ptr::write(self.buf.as_ptr_mut().add(self.len), value);
        }
        self.len += 1;
    }

    pub fn remove_last(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let value = unsafe { ptr::read(self.buf.as_ptr().add(self.len)) };
        self.shrink_to_policy();
        Some(value)
    }

    pub fn remove_at(&mut self, index: usize) -> GResult<T> {
        self.check_index(index)?;
        let value = unsafe {
            let p = self.buf.as_ptr_mut().add(index);
            let value = ptr::read(p);
            ptr::copy(p.add(1), p, self.len - index - 1);
            value
        };
        self.len -= 1;
        self.shrink_to_policy();
        Ok(value)
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Moves the contents out, leaving `self` with no backing store,
    /// zero length and zero capacity.
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::taken())
    }

    fn check_index(&self, index: usize) -> GResult<()> {
        if index >= self.len {
            return Err(SeqError::out_of_range(index, self.len));
        }
        Ok(())
    }

    fn reserve_one(&mut self) {
        if self.len == self.capacity() {
            let capacity = self.policy.grow(self.capacity());
            self.reallocate(capacity);
        }
    }

    fn shrink_to_policy(&mut self) {
        if let Some(capacity) = self.policy.shrink(self.len, self.capacity()) {
            self.reallocate(capacity);
        }
    }

    fn reallocate(&mut self, capacity: usize) {
        trace!(
            "reallocate sequence: len={} capacity {} -> {}",
            self.len,
            self.capacity(),
            capacity
        );
        unsafe { self.buf.reallocate(self.len, capacity) }
    }

    fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        unsafe {
            let tail =
                ptr::slice_from_raw_parts_mut(self.buf.as_ptr_mut().add(len), self.len - len);
            self.len = len;
            ptr::drop_in_place(tail);
        }
    }

    // Capacity for `n` more elements must already be there.
    fn fill_with<F>(&mut self, n: usize, mut f: F)
    where
        F: FnMut() -> T,
    {
        assert!(self.len + n <= self.capacity());
        let target = self.len + n;
        unsafe {
            let mut ptr = self.buf.as_ptr_mut().add(self.len);
            let mut local_len = SetLenOnDrop::new(&mut self.len);
            for _ in 0..n {
                ptr::write(ptr.post_inc(), f());
                // Increment the length in every step in case f() panics
                local_len.increment_len(1);
            }
            debug_assert_eq!(local_len.current_len(), target);
        }
    }
}

impl<T: Default> GrowableSequence<T> {
    pub fn resize(&mut self, len: usize) {
        if len > self.capacity() {
            let mut capacity = self.capacity();
            while capacity < len {
                capacity = self.policy.grow(capacity);
            }
            self.reallocate(capacity);
        }
        if len < self.len {
            self.truncate(len);
        } else {
            self.fill_with(len - self.len, T::default);
        }
    }
}

impl<T> Default for GrowableSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for GrowableSequence<T> {
    fn drop(&mut self) {
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.buf.as_ptr_mut(),
                self.len,
            ));
        }
    }
}

impl<T: Clone> Clone for GrowableSequence<T> {
    fn clone(&self) -> Self {
        let mut out = Self {
            buf: RawBuf::with_capacity(self.capacity()),
            len: 0,
            policy: self.policy,
        };
        let src = self.as_slice();
        let mut i = 0;
        out.fill_with(src.len(), || {
            let v = src[i].clone();
            i += 1;
            v
        });
        out
    }
}

impl<T> From<Vec<T>> for GrowableSequence<T> {
    fn from(v: Vec<T>) -> Self {
        let capacity = (v.len() * 2).max(1);
        let mut s = Self::with_policy(GrowthPolicy {
            min_capacity: capacity,
            growth_factor: DEFAULT_GROWTH_FACTOR,
        });
        s.extend(v);
        s
    }
}

impl<T, const N: usize> From<[T; N]> for GrowableSequence<T> {
    fn from(v: [T; N]) -> Self {
        Self::from(Vec::from(v))
    }
}

impl<T> FromIterator<T> for GrowableSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<T>>())
    }
}

impl<T> Extend<T> for GrowableSequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for x in iter {
            self.append(x);
        }
    }
}

impl<'a, T> IntoIterator for &'a GrowableSequence<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut GrowableSequence<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> Index<usize> for GrowableSequence<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.element_at(index) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T> IndexMut<usize> for GrowableSequence<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        match self.element_at_mut(index) {
            Ok(v) => v,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for GrowableSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for GrowableSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "array_list[{}/{}]:", self.len, self.capacity())?;
        for x in self.iter() {
            write!(f, " {} ;", x)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn check_capacity<T>(s: &GrowableSequence<T>) {
        assert!(s.len() <= s.capacity());
        assert!(s.capacity() >= s.policy().min_capacity());
    }

    #[derive(Clone)]
    struct Counted(Rc<Cell<usize>>);

    impl Drop for Counted {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_policy_validation() {
        assert_eq!(
            GrowthPolicy::new(0, 2.0),
            Err(SeqError::InvalidCapacity(0))
        );
        assert_eq!(
            GrowthPolicy::new(4, 1.0),
            Err(SeqError::InvalidGrowthFactor(1.0))
        );
        assert!(GrowthPolicy::new(4, f64::NAN).is_err());
        assert!(GrowthPolicy::new(1, 1.5).is_ok());
        assert!(GrowableSequence::<i32>::with_capacity(0).is_err());
    }

    #[test]
    fn test_grow_makes_progress() {
        let p = GrowthPolicy::new(1, 1.25).unwrap();
        assert_eq!(p.grow(0), 1);
        assert_eq!(p.grow(1), 2);
        assert_eq!(p.grow(8), 10);
        let d = GrowthPolicy::default();
        assert_eq!(d.grow(10), 20);
    }

    #[test]
    fn test_new() {
        let s = GrowableSequence::<i32>::new();
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
        assert_eq!(s.capacity(), 10);
    }

    #[test]
    fn test_append_and_index() {
        let mut s = GrowableSequence::with_capacity(1).unwrap();
        for i in 0..100 {
            s.append(i * 3);
            check_capacity(&s);
        }
        assert_eq!(s.len(), 100);
        for i in 0..100 {
            assert_eq!(*s.element_at(i).unwrap(), i * 3);
            assert_eq!(s[i], i * 3);
        }
        assert_eq!(
            s.element_at(100),
            Err(SeqError::OutOfRange {
                index: 100,
                len: 100
            })
        );
    }

    #[test]
    fn test_growth_is_logarithmic() {
        let mut s = GrowableSequence::with_capacity(1).unwrap();
        let mut reallocs = 0;
        let mut cap = s.capacity();
        for i in 0..1000 {
            s.append(i);
            if s.capacity() != cap {
                reallocs += 1;
                cap = s.capacity();
            }
        }
        // 1 -> 2 -> 4 -> ... -> 1024
        assert_eq!(reallocs, 10);
        assert_eq!(s.capacity(), 1024);
    }

    #[test]
    fn test_out_of_range_index_saturates() {
        let s = seq_of(&[1, 2]);
        assert_eq!(
            s.element_at(usize::MAX),
            Err(SeqError::OutOfRange {
                index: isize::MAX,
                len: 2
            })
        );
    }

    #[test]
    fn test_insert_at() {
        let mut s = GrowableSequence::with_capacity(2).unwrap();
        s.insert_at(0, 'b').unwrap();
        s.insert_at(0, 'a').unwrap();
        s.insert_at(2, 'd').unwrap();
        s.insert_at(2, 'c').unwrap();
        assert_eq!(s.as_slice(), &['a', 'b', 'c', 'd']);
        assert_eq!(s.capacity(), 4);
        assert_eq!(
            s.insert_at(5, 'x'),
            Err(SeqError::OutOfRange { index: 5, len: 4 })
        );
        assert_eq!(s.len(), 4);
        assert_eq!(s.capacity(), 4);
    }

    #[test]
    fn test_remove_last_on_empty_is_noop() {
        let mut s = GrowableSequence::<u8>::new();
        assert_eq!(s.remove_last(), None);
        assert_eq!(s.len(), 0);
        assert_eq!(s.capacity(), 10);
    }

    #[test]
    fn test_remove_at() {
        let mut s: GrowableSequence<i32> = seq_of(&[1, 2, 3, 4, 5]);
        assert_eq!(s.remove_at(1), Ok(2));
        assert_eq!(s.as_slice(), &[1, 3, 4, 5]);
        assert_eq!(s.remove_at(3), Ok(5));
        assert_eq!(s.as_slice(), &[1, 3, 4]);
        assert_eq!(
            s.remove_at(3),
            Err(SeqError::OutOfRange { index: 3, len: 3 })
        );
        let mut e = GrowableSequence::<i32>::new();
        assert!(e.remove_at(0).is_err());
    }

    fn seq_of(v: &[i32]) -> GrowableSequence<i32> {
        v.iter().copied().collect()
    }

    #[test]
    fn test_shrink_hysteresis() {
        let mut s = GrowableSequence::with_capacity(4).unwrap();
        for i in 0..64 {
            s.append(i);
        }
        assert_eq!(s.capacity(), 64);
        // capacity holds until len < 64 / 4
        while s.len() > 16 {
            s.remove_last();
            assert_eq!(s.capacity(), 64);
        }
        s.remove_last();
        assert_eq!(s.len(), 15);
        assert_eq!(s.capacity(), 32);
        while !s.is_empty() {
            s.remove_at(0).unwrap();
            check_capacity(&s);
        }
        assert_eq!(s.capacity(), 4);
    }

    #[test]
    fn test_shrink_respects_min_capacity() {
        let mut s = GrowableSequence::with_capacity(10).unwrap();
        s.append(1);
        s.remove_last();
        assert_eq!(s.capacity(), 10);
        for i in 0..50 {
            s.append(i);
        }
        for _ in 0..50 {
            s.remove_last();
        }
        assert_eq!(s.capacity(), 10);
    }

    #[test]
    fn test_resize() {
        let mut s = GrowableSequence::<i32>::with_capacity(3).unwrap();
        s.append(7);
        s.resize(5);
        // 3 -> 6
        assert_eq!(s.capacity(), 6);
        assert_eq!(s.as_slice(), &[7, 0, 0, 0, 0]);
        s.resize(13);
        // 6 -> 12 -> 24
        assert_eq!(s.capacity(), 24);
        assert_eq!(s.len(), 13);
        s[12] = 4;
        s.resize(2);
        assert_eq!(s.as_slice(), &[7, 0]);
        assert_eq!(s.capacity(), 24);
        s.resize(13);
        assert_eq!(s[12], 0);
    }

    #[test]
    fn test_clear() {
        let mut s = seq_of(&[1, 2, 3]);
        let cap = s.capacity();
        s.clear();
        assert!(s.is_empty());
        assert_eq!(s.capacity(), cap);
    }

    #[test]
    fn test_take_leaves_empty_source() {
        let mut a = seq_of(&[4, 5, 6]);
        let cap = a.capacity();
        let b = a.take();
        assert_eq!(a.len(), 0);
        assert_eq!(a.capacity(), 0);
        assert!(a.is_empty());
        assert_eq!(b.as_slice(), &[4, 5, 6]);
        assert_eq!(b.capacity(), cap);
        // the taken state is still usable
        a.append(1);
        a.append(2);
        assert_eq!(a.as_slice(), &[1, 2]);
        check_capacity(&a);
    }

    #[test]
    fn test_move_assignment_releases_old() {
        let hits = Rc::new(Cell::new(0));
        let mut dst = GrowableSequence::new();
        dst.append(Counted(hits.clone()));
        let mut src = GrowableSequence::new();
        src.append(Counted(hits.clone()));
        src.append(Counted(hits.clone()));
        dst = src.take();
        assert_eq!(hits.get(), 1);
        assert_eq!(dst.len(), 2);
        drop(dst);
        drop(src);
        assert_eq!(hits.get(), 3);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a = seq_of(&[1, 2, 3]);
        let mut b = a.clone();
        assert_eq!(b.capacity(), a.capacity());
        b[0] = 10;
        a[2] = 30;
        assert_eq!(a.as_slice(), &[1, 2, 30]);
        assert_eq!(b.as_slice(), &[10, 2, 3]);
        let mut c = GrowableSequence::new();
        c.append(99);
        c.clone_from(&a);
        assert_eq!(c.as_slice(), a.as_slice());
    }

    #[test]
    fn test_each_element_dropped_once() {
        let hits = Rc::new(Cell::new(0));
        {
            let mut s = GrowableSequence::with_capacity(1).unwrap();
            for _ in 0..20 {
                s.append(Counted(hits.clone()));
            }
            s.insert_at(3, Counted(hits.clone())).unwrap();
            drop(s.remove_at(0).unwrap());
            drop(s.remove_last());
            assert_eq!(hits.get(), 2);
            let c = s.clone();
            drop(c);
            assert_eq!(hits.get(), 21);
            s.clear();
            assert_eq!(hits.get(), 40);
            s.append(Counted(hits.clone()));
        }
        assert_eq!(hits.get(), 41);
    }

    #[test]
    fn test_from_literal() {
        let s = GrowableSequence::from([1, 2, 3]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.capacity(), 6);
        assert_eq!(s.policy().min_capacity(), 6);
        let e = GrowableSequence::<i32>::from(Vec::new());
        assert_eq!(e.capacity(), 1);
    }

    #[test]
    fn test_iter() {
        let mut s = seq_of(&[1, 2, 3]);
        for x in &mut s {
            *x *= 2;
        }
        let total: i32 = s.iter().sum();
        assert_eq!(total, 12);
    }

    #[test]
    fn test_fmt() {
        let s = GrowableSequence::from(vec![1, 2, 3]);
        assert_eq!(format!("{}", s), "array_list[3/6]: 1 ; 2 ; 3 ;");
        assert_eq!(format!("{:?}", s), "[1, 2, 3]");
    }

    #[test]
    fn test_zero_sized() {
        let mut s = GrowableSequence::<()>::with_capacity(1).unwrap();
        for _ in 0..10 {
            s.append(());
        }
        assert_eq!(s.len(), 10);
        s.remove_at(4).unwrap();
        assert_eq!(s.len(), 9);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_panics() {
        let s = seq_of(&[1]);
        let _ = s[1];
    }
}
