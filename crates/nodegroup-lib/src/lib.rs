//! Node group configuration for cluster-api autoscaling
//!
//! This crate resolves, from the metadata of Machine, MachineSet and
//! MachineDeployment objects:
//! - Scaling bounds (min/max replicas)
//! - Scale-from-zero capacity (CPU, memory, GPU, max pods)
//! - Owner references up the Machine → MachineSet → MachineDeployment chain
//! - Cluster association and normalized provider IDs
//!
//! All resolvers are pure functions of their inputs. The only configuration
//! is the cluster-api group, captured once in [`AnnotationKeys`].

pub mod bounds;
pub mod capacity;
pub mod cluster;
pub mod config;
pub mod error;
pub mod keys;
pub mod nodegroup;
pub mod observability;
pub mod ownership;
pub mod provider_id;
pub mod quantity;

#[cfg(test)]
mod fixtures;

pub use bounds::{parse_scaling_bounds, ScalingBounds};
pub use capacity::{
    parse_capacity, parse_cpu_capacity, parse_gpu_capacity, parse_max_pods_capacity,
    parse_memory_capacity, scale_from_zero_enabled, ResourceCapacity,
};
pub use cluster::cluster_name_from_resource;
pub use config::ResolverConfig;
pub use error::{Bound, BoundsError, CapacityError, ConfigError, InvalidBound, QuantityError};
pub use keys::{
    AnnotationKeys, CPU_KEY, DEFAULT_CAPI_GROUP, GPU_KEY, MAX_PODS_KEY, MEMORY_KEY,
};
pub use nodegroup::{
    effective_annotations, effective_cluster_name, is_marked_for_deletion,
    machine_ref_from_node, MachineRef, NodeGroup, NodeGroupKind,
};
pub use observability::StructuredLogger;
pub use ownership::{
    machine_owner_ref, machine_set_has_deployment_owner, machine_set_owner_ref, owner_for_kind,
};
pub use provider_id::{normalize, NormalizedProviderId};
