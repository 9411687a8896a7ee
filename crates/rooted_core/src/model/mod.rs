//! Domain model for verse references, intervals and reminders.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep validation rules (interval ranges, reference shape) next to the
//!   types that carry them.
//!
//! # Invariants
//! - Every reminder is identified by a stable `ReminderId`.
//! - Model types carry no connection or I/O state.
//!
//! # See also
//! - docs/architecture/data-model.md

pub mod book;
pub mod intervals;
pub mod note;
pub mod reference;
pub mod reminder;
