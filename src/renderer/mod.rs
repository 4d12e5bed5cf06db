//! WebGPU rendering module
//!
//! The scene is built on the CPU as flat-colored triangles in game screen
//! coordinates, then letterboxed into the canvas.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;
pub mod viewport;

pub use pipeline::RenderState;
pub use scene::{SceneOptions, build_scene};
pub use vertex::Vertex;
pub use viewport::Viewport;
