// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Conditional logging macros.
//!
//! With the `tracing` feature these are the `tracing` macros; without it they
//! expand to nothing and their arguments are not evaluated.

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, warn};

// Named apart from the builtin `warn` attribute, which a plain re-export
// would be ambiguous with.
#[cfg(not(feature = "tracing"))]
macro_rules! scene_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! scene_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use {scene_debug as debug, scene_warn as warn};

#[cfg(test)]
mod tests {
    use super::{debug, warn};

    #[test]
    fn macros_resolve_with_and_without_tracing() {
        debug!(value = 3, "debug event");
        warn!(value = 4, "warn event");
    }
}
