// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conditional logging macros.
//!
//! With the `tracing` feature these are the `tracing` macros; without it they
//! expand to nothing and their arguments are not evaluated.

#[cfg(feature = "tracing")]
pub(crate) use tracing::warn;

// Named apart from the builtin `warn` attribute, which a plain re-export
// would be ambiguous with.
#[cfg(not(feature = "tracing"))]
macro_rules! plane_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use plane_warn as warn;

#[cfg(test)]
mod tests {
    use super::warn;

    #[test]
    fn warn_resolves_with_and_without_tracing() {
        warn!(value = 3, "warn event");
    }
}
