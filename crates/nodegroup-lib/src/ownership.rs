//! Owner-reference lookups across the Machine → MachineSet → MachineDeployment chain

use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{Resource, ResourceExt};

pub const MACHINE_KIND: &str = "Machine";
pub const MACHINE_SET_KIND: &str = "MachineSet";
pub const MACHINE_DEPLOYMENT_KIND: &str = "MachineDeployment";

/// First owner reference of `kind` that names a real owner
///
/// References with an empty name are skipped even when the kind matches.
pub fn owner_for_kind<'a, K: Resource>(obj: &'a K, kind: &str) -> Option<&'a OwnerReference> {
    obj.owner_references()
        .iter()
        .find(|r| r.kind == kind && !r.name.is_empty())
}

/// MachineSet that owns a Machine
pub fn machine_owner_ref<K: Resource>(machine: &K) -> Option<&OwnerReference> {
    owner_for_kind(machine, MACHINE_SET_KIND)
}

/// MachineDeployment that owns a MachineSet
pub fn machine_set_owner_ref<K: Resource>(machine_set: &K) -> Option<&OwnerReference> {
    owner_for_kind(machine_set, MACHINE_DEPLOYMENT_KIND)
}

pub fn machine_set_has_deployment_owner<K: Resource>(machine_set: &K) -> bool {
    machine_set_owner_ref(machine_set).is_some()
}
