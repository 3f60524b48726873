//! Object builders shared by unit tests

use kube::core::DynamicObject;
use serde_json::{json, Value};

/// Build a cluster-api object from its kind, metadata and optional spec
pub fn object(kind: &str, metadata: Value, spec: Option<Value>) -> DynamicObject {
    let mut value = json!({
        "apiVersion": "cluster.x-k8s.io/v1beta1",
        "kind": kind,
        "metadata": metadata,
    });
    if let Some(spec) = spec {
        value["spec"] = spec;
    }
    serde_json::from_value(value).expect("fixture object should deserialize")
}

pub fn owner(kind: &str, name: &str) -> Value {
    json!({
        "apiVersion": "cluster.x-k8s.io/v1beta1",
        "kind": kind,
        "name": name,
        "uid": format!("uid-{}", name),
    })
}

pub fn with_owners(kind: &str, owners: Vec<Value>) -> DynamicObject {
    object(
        kind,
        json!({ "name": "test", "namespace": "default", "ownerReferences": owners }),
        None,
    )
}
