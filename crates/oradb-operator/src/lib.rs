//! Framework layer of the OraDB Kubernetes operator.
//!
//! The operator reconciles database custom resources against the cloud
//! control plane. This crate carries the pieces shared by every resource
//! type:
//!
//! - [`diff`]: structural change detection between a submitted spec and the
//!   last successfully applied one,
//! - [`last_applied`]: persistence of that baseline as an annotation,
//! - [`lifecycle`]: the lifecycle states reported by the managed databases,
//! - [`admission`]: the spec update policy built on top of the three above.

pub mod admission;
pub mod diff;
pub mod last_applied;
pub mod lifecycle;

// External re-exports
pub use k8s_openapi;
pub use kube;
