//! Telemetry helpers for applications embedding `touchplot`.
//!
//! Gesture transitions log at `trace`, layout changes at `debug`, rejected
//! numeric input at `warn`; all through `tracing`, so hosts that already
//! run a subscriber see chart events with zero setup here. The helpers
//! below are for hosts that do not.

/// Initializes a default `tracing` subscriber when the `telemetry` feature
/// is enabled, honoring `RUST_LOG` and falling back to `info`.
///
/// Returns `true` when initialization succeeds. Returns `false` when no
/// initialization is performed (feature disabled) or if a global subscriber
/// was already set by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter("info")
}

/// Like [`init_default_tracing`], with an explicit fallback filter such as
/// `"touchplot=trace"` for debugging a gesture sequence.
#[must_use]
pub fn init_tracing_with_filter(fallback_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback_filter)),
            )
            .with_target(false)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}
