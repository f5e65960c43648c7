// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Repository refs, commit ids, deployment names, and env assignments.

mod commit;
mod deployment_name;
mod env_assignment;
mod id;
mod repo;

pub use commit::{COMMIT_SHA_LEN, CommitSha, CommitShaError};
pub use deployment_name::{DeploymentName, sanitize_label};
pub use env_assignment::{EnvAssignment, EnvAssignmentError, parse_env_list};
pub use id::{ContainerId, DnsRecordId, ImageId};
pub use repo::{RepoRef, RepoRefError};
