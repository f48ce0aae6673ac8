//! Tracing hooks.
//!
//! Compiled to a no-op unless the `tracing` feature is enabled. Subscribers are
//! the binary's business.

#[cfg(feature = "tracing")]
pub fn emit(event: &'static str, key_values: &[(&str, String)]) {
    let span = tracing::trace_span!("iquery", event);
    let _entered = span.enter();
    for (k, v) in key_values {
        tracing::trace!(%k, %v, "metric");
    }
}

#[cfg(not(feature = "tracing"))]
pub fn emit(_event: &'static str, _key_values: &[(&str, String)]) { /* no-op */
}
