//! Per-payload-type dispatch tables and the empty sentinel.
//!
//! Each concrete payload type gets exactly one table, shared by every
//! container holding that type. Tables are associated constants promoted to
//! `&'static` references, so they are materialized at compile time and no
//! first-use initialization can race at run time.

use core::marker::PhantomData;
use core::ptr;

use crate::error::InvalidCallError;
use crate::signature::{Payload, Signature};

/// The erased operations of one payload type (or of the empty sentinel).
///
/// `invoke` interprets a slot as the bound payload and calls it; `relocate`
/// moves the payload between slots (destination assumed uninitialized,
/// source dead afterwards); `dispose` runs the payload's destructor in
/// place. Only the sentinel's `invoke` can fail.
pub(crate) struct OpsTable<S: Signature> {
    pub(crate) invoke: unsafe fn(*mut u8, S::Args) -> Result<S::Output, InvalidCallError>,
    pub(crate) relocate: unsafe fn(*mut u8, *mut u8),
    pub(crate) dispose: unsafe fn(*mut u8),
    /// True only for the sentinel. Emptiness is a table datum rather than a
    /// sentinel-address comparison: promoted constants are not guaranteed a
    /// unique address across codegen units.
    pub(crate) empty: bool,
}

impl<S: Signature> OpsTable<S> {
    const EMPTY: Self = Self {
        invoke: invoke_empty::<S>,
        relocate: relocate_empty,
        dispose: dispose_empty,
        empty: true,
    };

    /// The per-signature empty sentinel.
    #[inline]
    pub(crate) const fn empty() -> &'static Self {
        &Self::EMPTY
    }

    /// The table for payload type `F`.
    #[inline]
    pub(crate) fn of<F: Payload<S>>() -> &'static Self {
        &Bound::<S, F>::TABLE
    }
}

/// Holder for the per-payload table constant; referencing it promotes one
/// table per (signature, payload) pair to `'static`.
struct Bound<S, F>(PhantomData<(S, F)>);

impl<S: Signature, F: Payload<S>> Bound<S, F> {
    const TABLE: OpsTable<S> = OpsTable {
        invoke: invoke_bound::<S, F>,
        relocate: relocate_bound::<F>,
        dispose: dispose_bound::<F>,
        empty: false,
    };
}

/// # Safety
/// `slot` must point to a live, exclusively borrowed `F`.
unsafe fn invoke_bound<S: Signature, F: Payload<S>>(
    slot: *mut u8,
    args: S::Args,
) -> Result<S::Output, InvalidCallError> {
    let payload = unsafe { &mut *slot.cast::<F>() };
    Ok(payload.invoke(args))
}

/// # Safety
/// `src` must hold a live `F`; `dst` must be valid for `size_of::<F>()`
/// bytes at `F`'s alignment and must not overlap `src`. Afterwards the
/// payload lives at `dst` and `src` is dead.
unsafe fn relocate_bound<F>(src: *mut u8, dst: *mut u8) {
    // Every Rust value is bitwise-movable, so the move-construct-then-destroy
    // pair collapses into one copy of the payload's exact size.
    unsafe { ptr::copy_nonoverlapping(src.cast::<F>(), dst.cast::<F>(), 1) };
}

/// # Safety
/// `slot` must hold a live `F` that is never used again afterwards.
unsafe fn dispose_bound<F>(slot: *mut u8) {
    unsafe { ptr::drop_in_place(slot.cast::<F>()) };
}

fn invoke_empty<S: Signature>(
    _slot: *mut u8,
    _args: S::Args,
) -> Result<S::Output, InvalidCallError> {
    Err(InvalidCallError)
}

fn relocate_empty(_src: *mut u8, _dst: *mut u8) {}

fn dispose_empty(_slot: *mut u8) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_flagged_empty() {
        let sentinel = OpsTable::<fn()>::empty();
        assert!(sentinel.empty);
        assert!(!OpsTable::<fn()>::of::<fn()>().empty);
    }

    #[test]
    fn test_sentinel_invoke_fails() {
        let sentinel = OpsTable::<fn() -> u32>::empty();
        // SAFETY: the sentinel's operations never dereference the slot.
        let out = unsafe { (sentinel.invoke)(ptr::null_mut(), ()) };
        assert_eq!(out, Err(InvalidCallError));
    }

    #[test]
    fn test_sentinel_relocate_and_dispose_are_noops() {
        let sentinel = OpsTable::<fn()>::empty();
        // SAFETY: no-ops by construction; null is never dereferenced.
        unsafe {
            (sentinel.relocate)(ptr::null_mut(), ptr::null_mut());
            (sentinel.dispose)(ptr::null_mut());
        }
    }
}
