//! The fixed-capacity, allocation-free, type-erased callable container.

use core::fmt;
use core::marker::PhantomData;
use core::mem;

use crate::error::InvalidCallError;
use crate::signature::{Payload, Signature};
use crate::storage::{MaxAlign, Slot, DEFAULT_CAPACITY};
use crate::table::OpsTable;

/// A fixed-capacity container for one callable of signature `S`, stored in
/// place and invoked, moved, and swapped without touching the heap.
///
/// The container pairs a `CAPACITY`-byte slot (aligned as the exemplar type
/// `A`) with a reference to a per-payload-type dispatch table. Payloads are
/// accepted only if their size and alignment fit the slot, checked when the
/// instantiation is compiled, never at run time. The container is move-only:
/// payloads routinely capture move-only resources, so no copy operation
/// could be given unsurprising semantics.
///
/// One instance belongs to one thread. The erased payload's auto-trait
/// obligations are unknown, so the container is neither `Send` nor `Sync`;
/// a scheduler drains its queue of these on its own control thread.
///
/// ## Example
///
/// ```rust
/// use berth::InplaceFn;
///
/// let x = 5;
/// let mut task: InplaceFn<fn() -> i32> = InplaceFn::new(move || x * 2);
/// assert_eq!(task.call(()), Ok(10));
///
/// let mut moved = task.take();
/// assert!(task.is_empty());
/// assert_eq!(moved.call(()), Ok(10));
/// ```
pub struct InplaceFn<S: Signature, const CAPACITY: usize = DEFAULT_CAPACITY, A = MaxAlign> {
    slot: Slot<A, CAPACITY>,
    table: &'static OpsTable<S>,
    /// Opts out of `Send`/`Sync`: the payload behind the erasure may be
    /// neither.
    _marker: PhantomData<*mut ()>,
}

impl<S: Signature, const CAPACITY: usize, A> InplaceFn<S, CAPACITY, A> {
    /// Creates an empty container, bound to the sentinel table.
    ///
    /// Calling it yields [`InvalidCallError`]; storage is not touched until
    /// a payload is stored.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            slot: Slot::uninit(),
            table: OpsTable::empty(),
            _marker: PhantomData,
        }
    }

    /// Stores `f` in place and binds its dispatch table.
    ///
    /// The payload must fit the slot: `size_of::<F>() <= CAPACITY`, and the
    /// slot alignment must be a multiple of the payload's. Both are
    /// compile-time contracts; a violating instantiation fails to build
    /// rather than being rejected at run time:
    ///
    /// ```compile_fail
    /// use berth::InplaceFn;
    ///
    /// let big = [0u8; 512];
    /// let task: InplaceFn<fn() -> u8, 64> = InplaceFn::new(move || big[0]);
    /// ```
    #[must_use]
    pub fn new<F>(f: F) -> Self
    where
        F: Payload<S> + 'static,
    {
        const {
            assert!(
                mem::size_of::<F>() <= CAPACITY,
                "payload does not fit the container's capacity"
            );
            assert!(
                mem::align_of::<A>() % mem::align_of::<F>() == 0,
                "payload alignment exceeds the container's storage alignment"
            );
        }

        let mut this = Self::empty();
        // SAFETY: the const block above proves `F` fits the slot's size and
        // alignment; the slot is uninitialized and exclusively owned.
        unsafe { this.slot.as_mut_ptr().cast::<F>().write(f) };
        this.table = OpsTable::of::<F>();
        this
    }

    /// Invokes the stored payload, forwarding `args` as a tuple.
    ///
    /// A populated container behaves exactly as calling the payload
    /// directly, in return value and side effects.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCallError`] if the container is empty. An empty
    /// invocation indicates a scheduling or ownership bug upstream, so the
    /// error should be propagated, not swallowed or retried.
    #[inline]
    pub fn call(&mut self, args: S::Args) -> Result<S::Output, InvalidCallError> {
        // SAFETY: the slot's contents always match the bound table, and the
        // sentinel's invoke never touches the slot.
        unsafe { (self.table.invoke)(self.slot.as_mut_ptr(), args) }
    }

    /// Returns `true` if no payload is stored.
    ///
    /// Intended for diagnostics; slot occupancy should be tracked by the
    /// owner, not probed through this.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.empty
    }

    /// Moves the payload (if any) into a fresh container, leaving `self`
    /// empty and reusable.
    ///
    /// This is the move-out primitive for containers behind a reference,
    /// e.g. pulling a unit of work out of a queue slot. Moving the container
    /// by value needs no helper; ownership transfer is the language's.
    #[must_use = "the payload is dropped immediately if the result is discarded"]
    pub fn take(&mut self) -> Self {
        let mut out = Self::empty();
        out.table = mem::replace(&mut self.table, OpsTable::empty());
        // SAFETY: `out.table` is the table `self`'s slot was bound to; the
        // two slots are distinct and `out`'s is uninitialized.
        unsafe { (out.table.relocate)(self.slot.as_mut_ptr(), out.slot.as_mut_ptr()) };
        out
    }

    /// Exchanges payloads and tables with `other`, without allocating.
    ///
    /// Payloads are only relocated, never duplicated or dropped: `self`'s
    /// payload moves through an on-stack temporary slot while `other`'s
    /// moves across directly, then the table references are exchanged.
    pub fn swap(&mut self, other: &mut Self) {
        let mut tmp = Slot::<A, CAPACITY>::uninit();
        // SAFETY: each relocate pairs a slot holding the payload its table
        // was built for with a vacated destination of identical capacity and
        // alignment; `tmp` is left dead by the third relocate.
        unsafe {
            (self.table.relocate)(self.slot.as_mut_ptr(), tmp.as_mut_ptr());
            (other.table.relocate)(other.slot.as_mut_ptr(), self.slot.as_mut_ptr());
            (self.table.relocate)(tmp.as_mut_ptr(), other.slot.as_mut_ptr());
        }
        mem::swap(&mut self.table, &mut other.table);
    }

    /// Slot capacity in bytes.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Slot alignment in bytes.
    #[inline]
    #[must_use]
    pub const fn align(&self) -> usize {
        mem::align_of::<A>()
    }
}

impl<S: Signature, const CAPACITY: usize, A> Default for InplaceFn<S, CAPACITY, A> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: Signature, const CAPACITY: usize, A> Drop for InplaceFn<S, CAPACITY, A> {
    fn drop(&mut self) {
        // SAFETY: the slot's contents match the bound table; dispose runs
        // exactly once here, and the sentinel's dispose is a no-op.
        unsafe { (self.table.dispose)(self.slot.as_mut_ptr()) };
    }
}

impl<S: Signature, const CAPACITY: usize, A> fmt::Debug for InplaceFn<S, CAPACITY, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InplaceFn")
            .field("empty", &self.is_empty())
            .field("capacity", &CAPACITY)
            .field("align", &mem::align_of::<A>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stores_and_calls() {
        let mut task: InplaceFn<fn() -> i32> = InplaceFn::new(|| 41 + 1);
        assert!(!task.is_empty());
        assert_eq!(task.call(()), Ok(42));
    }

    #[test]
    fn test_empty_call_fails() {
        let mut task: InplaceFn<fn() -> i32> = InplaceFn::empty();
        assert!(task.is_empty());
        assert_eq!(task.call(()), Err(InvalidCallError));
    }

    #[test]
    fn test_take_resets_source_to_sentinel() {
        let mut a: InplaceFn<fn() -> i32, 64> = InplaceFn::new(|| 3);
        let mut b = a.take();
        assert!(a.is_empty());
        assert_eq!(b.call(()), Ok(3));
    }

    #[test]
    fn test_swap_exchanges_tables_and_payloads() {
        let mut a: InplaceFn<fn() -> i32, 64> = InplaceFn::new(|| 1);
        let mut b: InplaceFn<fn() -> i32, 64> = InplaceFn::new(|| 2);
        a.swap(&mut b);
        assert_eq!(a.call(()), Ok(2));
        assert_eq!(b.call(()), Ok(1));
    }

    #[test]
    fn test_capacity_and_align_accessors() {
        let task: InplaceFn<fn(), 64, u64> = InplaceFn::empty();
        assert_eq!(task.capacity(), 64);
        assert_eq!(task.align(), 8);
    }

    #[test]
    fn test_debug_does_not_expose_payload() {
        let task: InplaceFn<fn() -> i32, 64> = InplaceFn::new(|| 5);
        let rendered = format!("{task:?}");
        assert!(rendered.contains("empty: false"));
        assert!(rendered.contains("capacity: 64"));
    }
}
