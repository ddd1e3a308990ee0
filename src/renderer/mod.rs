//! WebGPU rendering module
//!
//! [`scene`] turns a [`GameState`](crate::sim::GameState) into a flat triangle
//! list; [`pipeline`] owns the device and draws it.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState};
pub use scene::{build_frame, canvas_to_ndc};
pub use vertex::Vertex;
