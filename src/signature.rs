//! Call-signature description and the bridge from argument tuples to
//! `FnMut` calls.
//!
//! A signature is spelled as a function-pointer type (`fn(u32) -> bool`),
//! which lets a container name its argument and return types with a single
//! type parameter, independent of the concrete payload stored in it.

mod sealed {
    pub trait Sealed {}
}

/// A call signature: an argument tuple plus a return type.
///
/// Implemented for function-pointer types of up to five parameters. Sealed,
/// so the pairing between a storage slot and the dispatch table interpreting
/// it cannot be subverted from outside the crate.
///
/// Argument types are taken by value; signatures whose parameters borrow
/// from the caller are out of scope for a deferred-work container.
pub trait Signature: sealed::Sealed + 'static {
    /// The arguments, packed as a tuple.
    type Args: 'static;
    /// The return type.
    type Output: 'static;
}

/// A callable usable as the payload of a container with signature `S`.
///
/// Blanket-implemented for every `FnMut` whose parameters and return type
/// match `S`. Payloads are invoked through an exclusive reference, so both
/// plain `Fn` closures and state-mutating `FnMut` closures qualify, while
/// `FnOnce`-only values are rejected at the bound.
pub trait Payload<S: Signature> {
    /// Calls the payload with the packed argument tuple.
    fn invoke(&mut self, args: S::Args) -> S::Output;
}

macro_rules! impl_signature {
    ($(($ty:ident, $arg:ident)),*) => {
        impl<Ret: 'static, $($ty: 'static),*> sealed::Sealed for fn($($ty),*) -> Ret {}

        impl<Ret: 'static, $($ty: 'static),*> Signature for fn($($ty),*) -> Ret {
            type Args = ($($ty,)*);
            type Output = Ret;
        }

        impl<Ret: 'static, F, $($ty: 'static),*> Payload<fn($($ty),*) -> Ret> for F
        where
            F: FnMut($($ty),*) -> Ret,
        {
            #[inline]
            fn invoke(&mut self, ($($arg,)*): ($($ty,)*)) -> Ret {
                self($($arg),*)
            }
        }
    };
}

impl_signature!();
impl_signature!((A0, a0));
impl_signature!((A0, a0), (A1, a1));
impl_signature!((A0, a0), (A1, a1), (A2, a2));
impl_signature!((A0, a0), (A1, a1), (A2, a2), (A3, a3));
impl_signature!((A0, a0), (A1, a1), (A2, a2), (A3, a3), (A4, a4));
