//! Scripture reference detection over free note text.
//!
//! # Responsibility
//! - Find verse references (`"John 3:16"`, `"1 Cor 13:4-7"`) in plain text.
//! - Split note text into renderable plain/reference segments.
//!
//! # Invariants
//! - Detection is read-only and never fails; malformed candidates are
//!   silently skipped.
//! - Segment contents concatenate back to the exact input text.
//!
//! # See also
//! - docs/architecture/detection.md

mod scanner;

pub use scanner::{detect_references, segment_text};
