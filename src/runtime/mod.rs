// ABOUTME: Container engine access for builds and container lifecycle.
// ABOUTME: Capability traits, the bollard implementation, endpoints, and port allocation.

mod bollard_engine;
mod error;
mod port;
pub mod traits;
mod types;

pub use bollard_engine::BollardRuntime;
pub use error::RuntimeError;
pub use port::{OsPortAllocator, PortAllocator};
pub use traits::{
    BuildRequest, BuildStream, ContainerError, ContainerInfo, ContainerOps, ContainerSpec,
    ContainerState, ImageError, ImageOps, PortMapping, PullProgress, PullStream,
};
pub use types::EngineEndpoint;
