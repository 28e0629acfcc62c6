//! Tracing macros for diff diagnostics.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]`
//! boilerplate at every call site.

/// Summary of a finished diff.
macro_rules! sqlshift_trace_diff {
    ($statements:expr, $errors:expr, $hints:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(
            statements = $statements,
            errors = $errors,
            hints = $hints,
            "sqlshift.diff"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = (&$statements, &$errors, &$hints);
    };
}

/// A rename accepted from the resolver.
macro_rules! sqlshift_trace_rename {
    ($kind:expr, $from:expr, $to:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(kind = %$kind, from = %$from, to = %$to, "sqlshift.rename");
        #[cfg(not(feature = "tracing"))]
        let _ = (&$kind, &$from, &$to);
    };
}

/// A table scheduled for shadow-table recreation.
macro_rules! sqlshift_trace_recreate {
    ($table:expr, $reasons:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(table = %$table, reasons = ?$reasons, "sqlshift.recreate");
        #[cfg(not(feature = "tracing"))]
        let _ = (&$table, &$reasons);
    };
}

/// A queued model error.
macro_rules! sqlshift_trace_conflict {
    ($error:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!(error = %$error, "sqlshift.conflict");
        #[cfg(not(feature = "tracing"))]
        let _ = &$error;
    };
}

/// A resolver answer that was discarded in favour of drop + create.
macro_rules! sqlshift_trace_resolver {
    ($kind:expr, $reason:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!(kind = %$kind, reason = %$reason, "sqlshift.resolver");
        #[cfg(not(feature = "tracing"))]
        let _ = (&$kind, &$reason);
    };
}
