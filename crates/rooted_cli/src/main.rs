//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `rooted_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    // Tiny probe for core crate wiring, independent of Flutter/FFI runtime
    // setup.
    println!("rooted_core ping={}", rooted_core::ping());
    println!("rooted_core version={}", rooted_core::core_version());

    let references = rooted_core::detect_references("John 3:16");
    for reference in references {
        println!("detected {}", reference.display_label());
    }
}
