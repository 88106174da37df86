//! Render model shared by the graphwalk front-ends.
//!
//! The scene knows where every city sits on a canvas, which ones a running
//! search is touching, and what colour each dot and line should be. Drawing
//! goes through the [`Surface`] trait so the browser canvas and tests share
//! the same code path.

pub mod layout;
pub mod palette;
pub mod scene;

pub use layout::{project, City, Conn};
pub use scene::{Highlight, Scene, Surface};
