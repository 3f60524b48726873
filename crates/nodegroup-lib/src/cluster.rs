//! Cluster association for cluster-api objects

use crate::keys::AnnotationKeys;
use kube::core::DynamicObject;
use kube::ResourceExt;
use serde_json::Value;
use tracing::debug;

enum SpecField<'a> {
    Absent,
    Present(&'a str),
    Malformed(&'static str),
}

/// Name of the cluster `obj` belongs to, or an empty string if unknown
///
/// `spec.clusterName` wins whenever it is present, even when empty. Objects
/// from older API versions have no such field and fall back to the
/// cluster-name label. A malformed field is treated as absent.
pub fn cluster_name_from_resource(keys: &AnnotationKeys, obj: &DynamicObject) -> String {
    match spec_cluster_name(&obj.data) {
        SpecField::Present(name) => return name.to_string(),
        SpecField::Absent => {}
        SpecField::Malformed(reason) => {
            debug!(
                object = %obj.name_any(),
                reason = reason,
                "Ignoring malformed spec.clusterName, falling back to label"
            );
        }
    }

    obj.labels()
        .get(&keys.cluster_name_label)
        .cloned()
        .unwrap_or_default()
}

/// True when `spec.clusterName` is set to a string, including the empty string
pub(crate) fn has_spec_cluster_name(obj: &DynamicObject) -> bool {
    matches!(spec_cluster_name(&obj.data), SpecField::Present(_))
}

fn spec_cluster_name(data: &Value) -> SpecField<'_> {
    let Some(spec) = data.get("spec") else {
        return SpecField::Absent;
    };
    let Some(spec) = spec.as_object() else {
        return SpecField::Malformed("spec is not an object");
    };

    match spec.get("clusterName") {
        None => SpecField::Absent,
        Some(Value::String(name)) => SpecField::Present(name),
        Some(_) => SpecField::Malformed("clusterName is not a string"),
    }
}
