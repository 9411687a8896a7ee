//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod reminder_service;
pub mod scheduler_worker;
pub mod verse_service;

/// Milliseconds in one day, the unit reminder intervals are expressed in.
pub const MS_PER_DAY: i64 = 86_400_000;

/// Current wall-clock time in unix epoch milliseconds.
///
/// Clamps to 0 for clocks set before the epoch instead of failing.
pub fn now_epoch_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
