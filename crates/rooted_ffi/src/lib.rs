//! FFI crate exposing Rooted core use-cases to the Flutter shell.

pub mod api;
