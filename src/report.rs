//! Constructor-failure diagnostics.
//!
//! Compile-time-selectable: with the `debug-log` feature, constructors
//! forward a short uppercase failure tag to the `log` facade; the default
//! build compiles the hook to nothing.

#[cfg(feature = "debug-log")]
#[inline]
pub(crate) fn constructor_failure(tag: &str) {
    log::debug!(target: "mailring", "{tag}");
}

#[cfg(not(feature = "debug-log"))]
#[inline]
pub(crate) fn constructor_failure(_tag: &str) {}
