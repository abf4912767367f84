/*!
Real-time Julia set explorer on `wgpu`.

The host keeps a [`control::Control`] block describing the view, the
[`navigation::Navigator`] updates it from input, and the [`renderer::Renderer`]
uploads it as a uniform block for `compute.wgsl`. [`julia`] is a CPU rendition of
the same kernel, used by [`snapshot`] for headless output.
*/

pub mod buffer;
pub mod colour;
pub mod command_encoder;
pub mod compute;
pub mod config;
pub mod control;
pub mod error;
pub mod julia;
pub mod navigation;
pub mod renderer;
pub mod snapshot;
pub mod var;

pub use control::Control;
pub use error::{Error, Result};
