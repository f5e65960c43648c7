// ABOUTME: Composable capability traits for the container engine.
// ABOUTME: Defines ImageOps and ContainerOps plus their shared types.

mod container;
mod image;
mod shared_types;

pub use container::{ContainerError, ContainerOps};
pub use image::{BuildStream, ImageError, ImageOps, PullStream};
pub use shared_types::*;
