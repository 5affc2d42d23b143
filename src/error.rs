//! Error type for invoking an empty container.

/// The error returned when calling an [`InplaceFn`](crate::InplaceFn) that
/// holds no payload.
///
/// Reaching this error means an upstream owner invoked a slot it had already
/// moved out of or never filled, so callers should propagate it rather than
/// retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCallError;

impl core::fmt::Display for InvalidCallError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("invoked an empty in-place callable")
    }
}

impl std::error::Error for InvalidCallError {}
