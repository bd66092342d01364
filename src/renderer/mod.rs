//! WebGPU rendering module
//!
//! The scene is plain colored triangles in well pixel space, built per layer
//! on the CPU and uploaded as one vertex buffer per frame.

pub mod layers;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use layers::{Layer, LayerStack};
pub use pipeline::RenderState;
pub use vertex::Vertex;
