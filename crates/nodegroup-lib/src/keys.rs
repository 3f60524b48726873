//! Annotation and label key surface
//!
//! Every node-group key the resolvers read is qualified by the cluster-api
//! group (`<group>/<suffix>`). The group defaults to `cluster.x-k8s.io` and is
//! resolved once at startup, then handed around as an immutable
//! [`AnnotationKeys`] value.

use serde::Serialize;

/// Default cluster-api group used to qualify node-group keys
pub const DEFAULT_CAPI_GROUP: &str = "cluster.x-k8s.io";

/// Environment variable that overrides the cluster-api group
pub const CAPI_GROUP_ENV: &str = "CAPI_GROUP";

const MIN_SIZE_SUFFIX: &str = "cluster-api-autoscaler-node-group-min-size";
const MAX_SIZE_SUFFIX: &str = "cluster-api-autoscaler-node-group-max-size";
const DELETE_MACHINE_SUFFIX: &str = "delete-machine";
const MACHINE_SUFFIX: &str = "machine";
const CLUSTER_NAME_SUFFIX: &str = "cluster-name";

/// Scale-from-zero capacity keys. These are not group-qualified.
pub const CPU_KEY: &str = "machine.openshift.io/vCPU";
pub const MEMORY_KEY: &str = "machine.openshift.io/memoryMb";
pub const GPU_KEY: &str = "machine.openshift.io/GPU";
pub const MAX_PODS_KEY: &str = "machine.openshift.io/maxPods";

/// Legacy keys from the `cluster.k8s.io` group, honoured by the adapter layer only
pub mod deprecated {
    pub const NODE_GROUP_MIN_SIZE: &str =
        "cluster.k8s.io/cluster-api-autoscaler-node-group-min-size";
    pub const NODE_GROUP_MAX_SIZE: &str =
        "cluster.k8s.io/cluster-api-autoscaler-node-group-max-size";
    pub const CLUSTER_NAME_LABEL: &str = "cluster.k8s.io/cluster-name";
}

/// Group-qualified keys derived from the configured cluster-api group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationKeys {
    pub group: String,
    pub node_group_min_size: String,
    pub node_group_max_size: String,
    pub delete_machine: String,
    pub machine: String,
    pub cluster_name_label: String,
}

impl AnnotationKeys {
    /// Build the key set for `group`; an empty group falls back to [`DEFAULT_CAPI_GROUP`].
    ///
    /// The group is not validated. A malformed group yields malformed keys,
    /// which lets operators rename the group alongside their own CRDs.
    pub fn new(group: impl Into<String>) -> Self {
        let mut group = group.into();
        if group.is_empty() {
            group = DEFAULT_CAPI_GROUP.to_string();
        }

        let qualify = |suffix: &str| format!("{}/{}", group, suffix);

        Self {
            node_group_min_size: qualify(MIN_SIZE_SUFFIX),
            node_group_max_size: qualify(MAX_SIZE_SUFFIX),
            delete_machine: qualify(DELETE_MACHINE_SUFFIX),
            machine: qualify(MACHINE_SUFFIX),
            cluster_name_label: qualify(CLUSTER_NAME_SUFFIX),
            group,
        }
    }
}

impl Default for AnnotationKeys {
    fn default() -> Self {
        Self::new(DEFAULT_CAPI_GROUP)
    }
}
