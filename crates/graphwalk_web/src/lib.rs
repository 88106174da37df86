//! Browser front-end for graphwalk.
//!
//! Empty unless built with `--features web` for a wasm32 target, so the
//! workspace still builds natively. `trunk serve` from this directory does
//! both.

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::start;
