//! Admission-time validation of spec updates.
//!
//! The webhook layer hands this module the submitted spec, the baseline
//! recorded on the old object, and the lifecycle state from the old object's
//! status. The AdmissionReview plumbing itself stays with the caller.
//!
//! The update policy: while a long-running operation is in progress on the
//! underlying database, the spec must not change. "Change" is decided by
//! [`crate::diff`], so submitting a spec that is field-by-field identical to
//! the last successfully applied one passes even mid-operation.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use serde::de::DeserializeOwned;
use snafu::{ResultExt, Snafu};

use crate::{diff::Diff, last_applied, lifecycle::LifecycleState};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to read the last successful spec of the old object"))]
    ReadLastApplied { source: last_applied::Error },

    #[snafu(display("cannot change the spec while lifecycleState is {state}"))]
    SpecChangeWhileIntermediate { state: LifecycleState },
}

/// Masked view of a submitted spec against the recorded baseline.
#[derive(Clone, Debug, PartialEq)]
pub struct SpecChange<S> {
    /// The candidate spec with every unchanged field reset to its unset
    /// value, leaving only the fields that were actually edited.
    pub delta: S,
    /// Whether any field actually changed.
    pub changed: bool,
}

/// Compares `candidate` against `last_applied` without mutating either.
///
/// Reconcilers use the returned delta to decide which of the pending edits
/// still have to be applied to the underlying database.
pub fn spec_change<S>(candidate: &S, last_applied: &S) -> SpecChange<S>
where
    S: Diff + Clone,
{
    let mut delta = candidate.clone();
    let changed = delta.mask_unchanged(last_applied);
    SpecChange { delta, changed }
}

/// Validates a spec update against the update policy.
///
/// A missing baseline (`None`) means nothing was ever applied, so there is
/// nothing to protect and the update passes. A missing lifecycle state is
/// treated as not intermediate.
pub fn validate_spec_update<S>(
    candidate: &S,
    last_applied: Option<&S>,
    state: Option<LifecycleState>,
) -> Result<()>
where
    S: Diff + Clone,
{
    let Some(last_applied) = last_applied else {
        return Ok(());
    };
    let Some(state) = state else {
        return Ok(());
    };

    if state.is_intermediate() && spec_change(candidate, last_applied).changed {
        tracing::debug!(%state, "rejecting spec update during long-running operation");
        return SpecChangeWhileIntermediateSnafu { state }.fail();
    }

    Ok(())
}

/// Like [`validate_spec_update`], reading the baseline directly from the old
/// object's metadata.
pub fn validate_object_update<S>(
    old_meta: &ObjectMeta,
    candidate: &S,
    state: Option<LifecycleState>,
) -> Result<()>
where
    S: Diff + Clone + DeserializeOwned,
{
    let baseline: Option<S> = last_applied::get(old_meta).context(ReadLastAppliedSnafu)?;
    validate_spec_update(candidate, baseline.as_ref(), state)
}
