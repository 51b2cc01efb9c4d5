//! FP-add trace column layout
//!
//! Every row is one solved witness of the adder network. The operands and
//! the sum sit in a fixed prefix; the remaining columns are network internals.

use std::borrow::{Borrow, BorrowMut};

/// Public prefix of an FP-add row
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FpAddIo<T> {
    /// Exponent of the left operand
    pub e0: T,
    /// Mantissa of the left operand
    pub m0: T,
    /// Exponent of the right operand
    pub e1: T,
    /// Mantissa of the right operand
    pub m1: T,
    /// Exponent of the rounded sum
    pub e_out: T,
    /// Mantissa of the rounded sum
    pub m_out: T,
}

/// Number of columns in the I/O prefix
pub const FP_ADD_IO_COLUMNS: usize = std::mem::size_of::<FpAddIo<u8>>();

impl<T> Borrow<FpAddIo<T>> for [T; FP_ADD_IO_COLUMNS] {
    fn borrow(&self) -> &FpAddIo<T> {
        // Safety: FpAddIo is repr(C) and has exactly FP_ADD_IO_COLUMNS fields of type T
        unsafe { &*(self.as_ptr() as *const FpAddIo<T>) }
    }
}

impl<T> BorrowMut<FpAddIo<T>> for [T; FP_ADD_IO_COLUMNS] {
    fn borrow_mut(&mut self) -> &mut FpAddIo<T> {
        unsafe { &mut *(self.as_mut_ptr() as *mut FpAddIo<T>) }
    }
}

impl<T> Borrow<[T; FP_ADD_IO_COLUMNS]> for FpAddIo<T> {
    fn borrow(&self) -> &[T; FP_ADD_IO_COLUMNS] {
        unsafe { &*(self as *const FpAddIo<T> as *const [T; FP_ADD_IO_COLUMNS]) }
    }
}
