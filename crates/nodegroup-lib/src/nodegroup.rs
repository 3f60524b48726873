//! Provider-adapter view of a node group
//!
//! Combines the individual resolvers into the record a cloud-provider
//! adapter keeps per MachineSet or MachineDeployment. Deprecated
//! `cluster.k8s.io` keys are honoured here, not in the resolvers themselves.

use crate::bounds::{parse_scaling_bounds, ScalingBounds};
use crate::capacity::{parse_capacity, scale_from_zero_enabled, ResourceCapacity};
use crate::cluster::{cluster_name_from_resource, has_spec_cluster_name};
use crate::error::{BoundsError, CapacityError};
use crate::keys::{deprecated, AnnotationKeys};
use crate::ownership::{machine_set_owner_ref, MACHINE_DEPLOYMENT_KIND, MACHINE_SET_KIND};
use kube::core::DynamicObject;
use kube::{Resource, ResourceExt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Cluster-api kinds that can back a node group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeGroupKind {
    MachineSet,
    MachineDeployment,
}

impl NodeGroupKind {
    pub fn kind(&self) -> &'static str {
        match self {
            NodeGroupKind::MachineSet => MACHINE_SET_KIND,
            NodeGroupKind::MachineDeployment => MACHINE_DEPLOYMENT_KIND,
        }
    }

    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            MACHINE_SET_KIND => Some(NodeGroupKind::MachineSet),
            MACHINE_DEPLOYMENT_KIND => Some(NodeGroupKind::MachineDeployment),
            _ => None,
        }
    }
}

impl fmt::Display for NodeGroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// Everything the autoscaler needs to know about one node group
#[derive(Debug, Clone)]
pub struct NodeGroup {
    pub name: String,
    pub namespace: String,
    pub kind: NodeGroupKind,
    pub cluster_name: String,
    pub bounds: Result<ScalingBounds, BoundsError>,
    pub capacity: Result<ResourceCapacity, CapacityError>,
    pub scale_from_zero: bool,
    /// MachineDeployment that owns this MachineSet, if any
    pub owned_by: Option<String>,
}

impl NodeGroup {
    pub fn from_object(keys: &AnnotationKeys, kind: NodeGroupKind, obj: &DynamicObject) -> Self {
        let annotations = effective_annotations(keys, obj.annotations());

        let owned_by = match kind {
            NodeGroupKind::MachineSet => machine_set_owner_ref(obj).map(|r| r.name.clone()),
            NodeGroupKind::MachineDeployment => None,
        };

        Self {
            name: obj.name_any(),
            namespace: obj.namespace().unwrap_or_default(),
            kind,
            cluster_name: effective_cluster_name(keys, obj),
            bounds: parse_scaling_bounds(keys, &annotations),
            capacity: parse_capacity(&annotations),
            scale_from_zero: scale_from_zero_enabled(&annotations),
            owned_by,
        }
    }

    /// Identifier of the form `<Kind>/<namespace>/<name>`
    pub fn id(&self) -> String {
        format!("{}/{}/{}", self.kind, self.namespace, self.name)
    }

    /// False when the group carries no bounds annotations at all
    pub fn is_managed(&self) -> bool {
        !matches!(&self.bounds, Err(e) if e.is_missing())
    }
}

/// Annotations with deprecated min/max size keys filled in where the current ones are absent
pub fn effective_annotations(
    keys: &AnnotationKeys,
    annotations: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut effective = annotations.clone();

    for (current, legacy) in [
        (&keys.node_group_min_size, deprecated::NODE_GROUP_MIN_SIZE),
        (&keys.node_group_max_size, deprecated::NODE_GROUP_MAX_SIZE),
    ] {
        if effective.contains_key(current) {
            continue;
        }
        if let Some(value) = annotations.get(legacy) {
            effective.insert(current.clone(), value.clone());
        }
    }

    effective
}

/// Cluster name with the deprecated `cluster.k8s.io/cluster-name` label as a last resort
///
/// The deprecated label is only consulted when `spec.clusterName` is absent;
/// an explicitly empty field still wins over every label.
pub fn effective_cluster_name(keys: &AnnotationKeys, obj: &DynamicObject) -> String {
    let name = cluster_name_from_resource(keys, obj);
    if !name.is_empty() || has_spec_cluster_name(obj) {
        return name;
    }
    obj.labels()
        .get(deprecated::CLUSTER_NAME_LABEL)
        .cloned()
        .unwrap_or_default()
}

/// True when the Machine carries the delete-machine marker
pub fn is_marked_for_deletion<K: Resource>(keys: &AnnotationKeys, machine: &K) -> bool {
    machine.annotations().contains_key(&keys.delete_machine)
}

/// Machine a Node is linked to through the `<group>/machine` annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MachineRef {
    pub namespace: String,
    pub name: String,
}

pub fn machine_ref_from_node(
    keys: &AnnotationKeys,
    node_annotations: &BTreeMap<String, String>,
) -> Option<MachineRef> {
    let value = node_annotations.get(&keys.machine)?;
    let (namespace, name) = value.split_once('/')?;
    if namespace.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some(MachineRef {
        namespace: namespace.to_string(),
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Bound;
    use crate::fixtures::{object, owner};
    use crate::keys::{CPU_KEY, MEMORY_KEY};
    use serde_json::json;

    fn string_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!(NodeGroupKind::MachineSet.kind(), "MachineSet");
        assert_eq!(
            NodeGroupKind::from_kind("MachineDeployment"),
            Some(NodeGroupKind::MachineDeployment)
        );
        assert_eq!(NodeGroupKind::from_kind("Machine"), None);
    }

    #[test]
    fn test_deprecated_bounds_used_as_fallback() {
        let keys = AnnotationKeys::default();
        let annotations = string_map(&[
            (deprecated::NODE_GROUP_MIN_SIZE, "1"),
            (deprecated::NODE_GROUP_MAX_SIZE, "4"),
        ]);

        let effective = effective_annotations(&keys, &annotations);
        assert_eq!(
            parse_scaling_bounds(&keys, &effective).unwrap(),
            ScalingBounds { min: 1, max: 4 }
        );
    }

    #[test]
    fn test_current_keys_win_over_deprecated() {
        let keys = AnnotationKeys::default();
        let annotations = string_map(&[
            (keys.node_group_min_size.as_str(), "2"),
            (deprecated::NODE_GROUP_MIN_SIZE, "9"),
            (deprecated::NODE_GROUP_MAX_SIZE, "5"),
        ]);

        let effective = effective_annotations(&keys, &annotations);
        assert_eq!(
            parse_scaling_bounds(&keys, &effective).unwrap(),
            ScalingBounds { min: 2, max: 5 }
        );
    }

    #[test]
    fn test_node_group_from_machine_set() {
        let keys = AnnotationKeys::default();
        let obj = object(
            "MachineSet",
            json!({
                "name": "workers-abc",
                "namespace": "capi",
                "annotations": {
                    keys.node_group_min_size.as_str(): "0",
                    keys.node_group_max_size.as_str(): "6",
                    CPU_KEY: "4",
                    MEMORY_KEY: "8192",
                },
                "ownerReferences": [owner("MachineDeployment", "workers")],
            }),
            Some(json!({ "clusterName": "prod" })),
        );

        let group = NodeGroup::from_object(&keys, NodeGroupKind::MachineSet, &obj);
        assert_eq!(group.id(), "MachineSet/capi/workers-abc");
        assert_eq!(group.cluster_name, "prod");
        assert_eq!(group.bounds, Ok(ScalingBounds { min: 0, max: 6 }));
        assert!(group.scale_from_zero);
        assert!(group.is_managed());
        assert_eq!(group.owned_by.as_deref(), Some("workers"));

        let capacity = group.capacity.unwrap();
        assert_eq!(capacity.memory.0, (8192i64 << 20).to_string());
    }

    #[test]
    fn test_unmanaged_group() {
        let keys = AnnotationKeys::default();
        let obj = object("MachineDeployment", json!({ "name": "md" }), None);

        let group = NodeGroup::from_object(&keys, NodeGroupKind::MachineDeployment, &obj);
        assert_eq!(group.bounds, Err(BoundsError::Missing(Bound::Min)));
        assert!(!group.is_managed());
        assert!(!group.scale_from_zero);
        assert_eq!(group.owned_by, None);
    }

    #[test]
    fn test_invalid_bounds_group_is_still_managed() {
        let keys = AnnotationKeys::default();
        let obj = object(
            "MachineDeployment",
            json!({
                "name": "md",
                "annotations": {
                    keys.node_group_min_size.as_str(): "5",
                    keys.node_group_max_size.as_str(): "2",
                },
            }),
            None,
        );

        let group = NodeGroup::from_object(&keys, NodeGroupKind::MachineDeployment, &obj);
        assert!(group.bounds.is_err());
        assert!(group.is_managed());
    }

    #[test]
    fn test_deprecated_cluster_label_fallback() {
        let keys = AnnotationKeys::default();
        let legacy = object(
            "MachineSet",
            json!({ "name": "ms", "labels": { (deprecated::CLUSTER_NAME_LABEL): "legacy" } }),
            None,
        );
        assert_eq!(effective_cluster_name(&keys, &legacy), "legacy");

        let current = object(
            "MachineSet",
            json!({
                "name": "ms",
                "labels": {
                    keys.cluster_name_label.as_str(): "current",
                    (deprecated::CLUSTER_NAME_LABEL): "legacy",
                },
            }),
            None,
        );
        assert_eq!(effective_cluster_name(&keys, &current), "current");
    }

    #[test]
    fn test_empty_spec_cluster_name_beats_deprecated_label() {
        let keys = AnnotationKeys::default();
        let obj = object(
            "MachineSet",
            json!({ "name": "ms", "labels": { (deprecated::CLUSTER_NAME_LABEL): "legacy" } }),
            Some(json!({ "clusterName": "" })),
        );
        assert_eq!(cluster_name_from_resource(&keys, &obj), "");
        assert_eq!(effective_cluster_name(&keys, &obj), "");

        let group = NodeGroup::from_object(&keys, NodeGroupKind::MachineSet, &obj);
        assert_eq!(group.cluster_name, "");

        let malformed = object(
            "MachineSet",
            json!({ "name": "ms", "labels": { (deprecated::CLUSTER_NAME_LABEL): "legacy" } }),
            Some(json!({ "clusterName": 7 })),
        );
        assert_eq!(effective_cluster_name(&keys, &malformed), "legacy");
    }

    #[test]
    fn test_delete_marker() {
        let keys = AnnotationKeys::default();
        let marked = object(
            "Machine",
            json!({ "name": "m", "annotations": { keys.delete_machine.as_str(): "" } }),
            None,
        );
        let unmarked = object("Machine", json!({ "name": "m" }), None);

        assert!(is_marked_for_deletion(&keys, &marked));
        assert!(!is_marked_for_deletion(&keys, &unmarked));
    }

    #[test]
    fn test_machine_ref_from_node() {
        let keys = AnnotationKeys::default();
        let annotations = string_map(&[(keys.machine.as_str(), "capi/workers-abc-xyz")]);
        assert_eq!(
            machine_ref_from_node(&keys, &annotations),
            Some(MachineRef {
                namespace: "capi".to_string(),
                name: "workers-abc-xyz".to_string(),
            })
        );

        for bad in ["no-slash", "/name", "ns/", "a/b/c"] {
            let annotations = string_map(&[(keys.machine.as_str(), bad)]);
            assert_eq!(machine_ref_from_node(&keys, &annotations), None, "{:?}", bad);
        }
        assert_eq!(machine_ref_from_node(&keys, &BTreeMap::new()), None);
    }
}
