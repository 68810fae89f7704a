//! Persistence of the spec that was last applied successfully.
//!
//! After a reconciliation run has applied a spec to the managed database, the
//! operator records that spec as a JSON-encoded annotation on the resource
//! itself. Admission and later reconciliation runs read the annotation back
//! as the baseline for change detection, see [`crate::diff`].
//!
//! Deserialization happens here so that the diff machinery only ever sees
//! already-decoded specs. A stored baseline that no longer decodes as the
//! current spec type is reported as an error before any comparison begins.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::{
    api::{Api, Patch, PatchParams},
    Resource,
};
use serde::{de::DeserializeOwned, Serialize};
use snafu::{OptionExt, ResultExt, Snafu};

/// Annotation holding the JSON encoding of the spec that was last applied
/// successfully.
pub const LAST_SUCCESSFUL_SPEC_ANNOTATION: &str = "oradb.io/last-successful-spec";

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to deserialize the last successful spec annotation"))]
    DeserializeSpec { source: serde_json::Error },

    #[snafu(display("failed to serialize the spec for the last successful spec annotation"))]
    SerializeSpec { source: serde_json::Error },

    #[snafu(display("object defines no name, so the annotation cannot be patched"))]
    ObjectWithoutName,

    #[snafu(display("failed to patch the last successful spec annotation onto the object"))]
    PatchAnnotation { source: kube::Error },
}

/// Returns the baseline recorded on `meta`, or `None` if no spec has ever
/// been applied successfully.
pub fn get<S>(meta: &ObjectMeta) -> Result<Option<S>>
where
    S: DeserializeOwned,
{
    meta.annotations
        .as_ref()
        .and_then(|annotations| annotations.get(LAST_SUCCESSFUL_SPEC_ANNOTATION))
        .map(|raw| serde_json::from_str(raw).context(DeserializeSpecSnafu))
        .transpose()
}

/// Records `spec` as the new baseline by merge-patching the annotation onto
/// the metadata of `obj`.
///
/// Concurrent writers are serialized by the API server, not here.
pub async fn save<K, S>(api: &Api<K>, obj: &K, spec: &S) -> Result<()>
where
    K: Resource + Clone + std::fmt::Debug + DeserializeOwned,
    S: Serialize,
{
    let name = obj.meta().name.as_deref().context(ObjectWithoutNameSnafu)?;
    let raw = serde_json::to_string(spec).context(SerializeSpecSnafu)?;
    let patch = serde_json::json!({
        "metadata": {
            "annotations": {
                LAST_SUCCESSFUL_SPEC_ANNOTATION: raw,
            },
        },
    });

    tracing::debug!(name, "recording last successful spec");

    api.patch_metadata(name, &PatchParams::default(), &Patch::Merge(&patch))
        .await
        .context(PatchAnnotationSnafu)?;

    Ok(())
}
