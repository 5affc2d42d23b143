//! # `berth` — fixed-capacity, allocation-free, type-erased callables
//!
//! A container for deferred units of work in latency-sensitive systems:
//! it holds any callable matching a fixed signature inside a statically
//! sized, statically aligned in-place buffer, and can be invoked, moved,
//! and swapped without ever touching a memory allocator. Schedulers that
//! must not allocate on their real-time execution path queue these in
//! stack- or pool-resident storage and drain them once per tick.
//!
//! ## Guarantees
//!
//! - **No heap allocation**: construction, invocation, `take`, `swap`, and
//!   drop never allocate. Storage lives inside the container value itself.
//! - **Compile-time fit contract**: a payload whose size or alignment
//!   exceeds the configured slot fails to *build*; there is no runtime
//!   rejection path.
//! - **Exactly-once destruction**: every stored payload is dropped exactly
//!   once, across any sequence of moves, takes, and swaps.
//! - **Move-only**: the container has no copy or clone operation, because
//!   payloads routinely capture move-only resources.
//!
//! ## Architecture
//!
//! Type erasure is a hand-built dispatch table instead of `dyn` indirection
//! through a heap box: an [`InplaceFn`] pairs an aligned byte slot with a
//! `&'static` table of three function pointers (invoke, relocate, dispose)
//! built per concrete payload type as a promoted constant. An empty
//! container is bound to a per-signature sentinel table whose invoke
//! reports [`InvalidCallError`], so the container is never in a null
//! dispatch state and its drop path is unconditional.
//!
//! ## Example
//!
//! ```rust
//! use berth::InplaceFn;
//!
//! // A queue of deferred work: no boxing, no allocator.
//! let mut queue: Vec<InplaceFn<fn() -> u32, 64>> = Vec::new();
//! let base = 40;
//! queue.push(InplaceFn::new(move || base + 2));
//! queue.push(InplaceFn::new(|| 7));
//!
//! let results: Vec<u32> = queue
//!     .iter_mut()
//!     .map(|task| task.call(()).expect("queued tasks are populated"))
//!     .collect();
//! assert_eq!(results, [42, 7]);
//! ```
//!
//! The single runtime failure mode is invoking an empty container:
//!
//! ```rust
//! use berth::{InplaceFn, InvalidCallError};
//!
//! let mut task: InplaceFn<fn() -> u32> = InplaceFn::default();
//! assert_eq!(task.call(()), Err(InvalidCallError));
//! ```

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod signature;

mod inplace_fn;
mod storage;
mod table;

pub use error::InvalidCallError;
pub use inplace_fn::InplaceFn;
pub use signature::{Payload, Signature};
pub use storage::{MaxAlign, DEFAULT_CAPACITY};

// Compile-time layout assertions.
const _: () = {
    use core::mem;

    // The exemplar contributes alignment, never size.
    assert!(mem::size_of::<MaxAlign>() == 0);
    assert!(mem::align_of::<MaxAlign>() == 16);

    // A container is its slot plus one table reference, padded to the slot
    // alignment. Loose upper bound to stay platform-tolerant.
    assert!(mem::size_of::<InplaceFn<fn()>>() <= DEFAULT_CAPACITY + 16);
    assert!(mem::align_of::<InplaceFn<fn()>>() == 16);

    // Narrow instantiations stay narrow.
    assert!(mem::size_of::<InplaceFn<fn(), 8, u8>>() <= 8 + mem::size_of::<usize>());
};
