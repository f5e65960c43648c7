// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Resolve, build, provision, register, configure, with typed partial failures.

mod compensate;
mod components;
mod deployment;
mod error;
mod outcome;
mod pipeline;
mod request;
mod state;
mod transitions;

pub use compensate::settle;
pub use components::{ComponentFactory, Components, LiveComponents, PipelineSettings};
pub use deployment::{Deployment, Footprint};
pub use error::{DeployError, DeployErrorKind, Phase};
pub use outcome::{
    CompensationAction, CompensationRecord, DeployOutcome, DeploymentResult, Resources,
};
pub use pipeline::Pipeline;
pub use request::{DEFAULT_ENV, DEFAULT_PORT, DeploymentRequest, RequestError};
pub use state::{Accepted, Built, Configured, Provisioned, Registered, Resolved};
pub use transitions::TransitionResult;
