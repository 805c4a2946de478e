//! Verbose execution traces.
//!
//! These lines are only emitted when the execution [`Context`](crate::Context) asks for them,
//! and can be filtered separately from the rest of the crate's logs:
//! `RUST_LOG=info,query_resolver::trace=info`
use std::fmt::Arguments;

pub(crate) const TARGET: &str = "query_resolver::trace";
const INDENT: usize = 4;

/// Emit a trace line indented by `depth` levels when `enabled`.
pub(crate) fn emit(enabled: bool, depth: usize, message: Arguments<'_>) {
    if enabled {
        tracing::info!(target: TARGET, "{:indent$}{}", "", message, indent = depth * INDENT);
    }
}

/// `trace!(context, depth, "format", args..)`
///
/// The message is only formatted when the context is verbose.
macro_rules! trace {
    ($context:expr, $depth:expr, $($arg:tt)+) => {
        if $context.verbose() {
            $crate::trace::emit(true, $depth, format_args!($($arg)+));
        }
    };
}

pub(crate) use trace;
