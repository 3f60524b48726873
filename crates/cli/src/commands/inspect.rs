//! Per-object resolution commands

use anyhow::Result;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::core::DynamicObject;
use kube::ResourceExt;
use nodegroup_lib::ownership::{MACHINE_DEPLOYMENT_KIND, MACHINE_KIND, MACHINE_SET_KIND};
use nodegroup_lib::{
    cluster_name_from_resource, effective_annotations, effective_cluster_name,
    is_marked_for_deletion, machine_ref_from_node, owner_for_kind, parse_cpu_capacity,
    parse_gpu_capacity, parse_max_pods_capacity, parse_memory_capacity, parse_scaling_bounds,
    quantity, scale_from_zero_enabled, AnnotationKeys, BoundsError, CapacityError, NodeGroup,
    NodeGroupKind, ResourceCapacity, ScalingBounds, StructuredLogger,
};
use serde::Serialize;
use tabled::Tabled;

use crate::input::{display_name, kind_of};
use crate::output::{
    color_status, format_bytes, or_dash, print_info, print_rows, print_warning, OutputFormat,
};

const NODE_KIND: &str = "Node";

#[derive(Serialize)]
struct BoundsRecord {
    object: String,
    min: Option<i32>,
    max: Option<i32>,
    status: &'static str,
    error: Option<String>,
}

/// Row for scaling bounds table
#[derive(Tabled)]
struct BoundsRow {
    #[tabled(rename = "Object")]
    object: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

#[derive(Serialize)]
struct CapacityRecord {
    object: String,
    cpu: Option<String>,
    memory: Option<String>,
    gpu: Option<String>,
    max_pods: Option<String>,
    scale_from_zero: bool,
    errors: Vec<String>,
}

/// Row for capacity table
#[derive(Tabled)]
struct CapacityRow {
    #[tabled(rename = "Object")]
    object: String,
    #[tabled(rename = "CPU")]
    cpu: String,
    #[tabled(rename = "Memory")]
    memory: String,
    #[tabled(rename = "GPU")]
    gpu: String,
    #[tabled(rename = "Max Pods")]
    max_pods: String,
    #[tabled(rename = "Scale From Zero")]
    scale_from_zero: bool,
}

#[derive(Serialize)]
struct OwnerRecord {
    object: String,
    owner_kind: Option<String>,
    owner: Option<String>,
    owner_uid: Option<String>,
    marked_for_deletion: bool,
}

/// Row for owner table
#[derive(Tabled)]
struct OwnerRow {
    #[tabled(rename = "Object")]
    object: String,
    #[tabled(rename = "Owner Kind")]
    owner_kind: String,
    #[tabled(rename = "Owner")]
    owner: String,
    #[tabled(rename = "Delete Marker")]
    marked_for_deletion: bool,
}

/// Row for cluster table
#[derive(Tabled, Serialize)]
struct ClusterRow {
    #[tabled(rename = "Object")]
    object: String,
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "With Deprecated Label")]
    effective: String,
}

#[derive(Serialize)]
struct NodeGroupRecord {
    id: String,
    cluster: String,
    min: Option<i32>,
    max: Option<i32>,
    status: &'static str,
    bounds_error: Option<String>,
    scale_from_zero: bool,
    capacity: Option<ResourceCapacity>,
    capacity_error: Option<String>,
    owned_by: Option<String>,
}

/// Row for node group table
#[derive(Tabled)]
struct NodeGroupRow {
    #[tabled(rename = "Node Group")]
    id: String,
    #[tabled(rename = "Cluster")]
    cluster: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Scale From Zero")]
    scale_from_zero: bool,
    #[tabled(rename = "Owned By")]
    owned_by: String,
}

fn bounds_status(bounds: &Result<ScalingBounds, BoundsError>) -> (&'static str, Option<String>) {
    match bounds {
        Ok(_) => ("ok", None),
        Err(err) if err.is_missing() => ("unmanaged", Some(err.to_string())),
        Err(err) => ("invalid", Some(err.to_string())),
    }
}

fn opt_to_string<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn count_invalid<'a>(statuses: impl Iterator<Item = &'a str>) -> usize {
    statuses.filter(|s| *s == "invalid").count()
}

/// Show min/max scaling bounds
pub fn show_bounds(
    keys: &AnnotationKeys,
    objects: &[DynamicObject],
    format: OutputFormat,
) -> Result<()> {
    let records: Vec<BoundsRecord> = objects
        .iter()
        .map(|obj| {
            let annotations = effective_annotations(keys, obj.annotations());
            let bounds = parse_scaling_bounds(keys, &annotations);
            let (status, error) = bounds_status(&bounds);
            let bounds = bounds.ok();
            BoundsRecord {
                object: display_name(obj),
                min: bounds.map(|b| b.min),
                max: bounds.map(|b| b.max),
                status,
                error,
            }
        })
        .collect();

    let rows: Vec<BoundsRow> = records
        .iter()
        .map(|r| BoundsRow {
            object: r.object.clone(),
            min: opt_to_string(r.min),
            max: opt_to_string(r.max),
            status: color_status(r.status),
            detail: r.error.clone().unwrap_or_default(),
        })
        .collect();

    print_rows(&rows, &records, format)?;

    let invalid = count_invalid(records.iter().map(|r| r.status));
    if invalid > 0 {
        print_warning(&format!("{} object(s) have invalid scaling bounds", invalid));
    }
    Ok(())
}

fn capacity_field(
    result: Result<Quantity, CapacityError>,
    errors: &mut Vec<String>,
) -> Option<String> {
    match result {
        Ok(q) => Some(q.0),
        Err(err) => {
            errors.push(err.to_string());
            None
        }
    }
}

fn display_memory(memory: &Option<String>) -> String {
    match memory {
        Some(bytes) => match quantity::parse_quantity(bytes) {
            Ok(parsed) if parsed.as_f64() > 0.0 => {
                format!("{} ({})", bytes, format_bytes(parsed.as_f64() as u64))
            }
            _ => bytes.clone(),
        },
        None => "error".to_string(),
    }
}

/// Show scale-from-zero capacity
pub fn show_capacity(objects: &[DynamicObject], format: OutputFormat) -> Result<()> {
    let records: Vec<CapacityRecord> = objects
        .iter()
        .map(|obj| {
            let annotations = obj.annotations();
            let mut errors = Vec::new();
            CapacityRecord {
                object: display_name(obj),
                cpu: capacity_field(parse_cpu_capacity(annotations), &mut errors),
                memory: capacity_field(parse_memory_capacity(annotations), &mut errors),
                gpu: capacity_field(parse_gpu_capacity(annotations), &mut errors),
                max_pods: capacity_field(parse_max_pods_capacity(annotations), &mut errors),
                scale_from_zero: scale_from_zero_enabled(annotations),
                errors,
            }
        })
        .collect();

    let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "error".to_string());
    let rows: Vec<CapacityRow> = records
        .iter()
        .map(|r| CapacityRow {
            object: r.object.clone(),
            cpu: field(&r.cpu),
            memory: display_memory(&r.memory),
            gpu: field(&r.gpu),
            max_pods: field(&r.max_pods),
            scale_from_zero: r.scale_from_zero,
        })
        .collect();

    print_rows(&rows, &records, format)?;

    for record in records.iter().filter(|r| !r.errors.is_empty()) {
        for err in &record.errors {
            print_warning(&format!("{}: {}", record.object, err));
        }
    }
    Ok(())
}

/// Next level up the Node → Machine → MachineSet → MachineDeployment chain
fn default_owner_kind(kind: &str) -> Option<&'static str> {
    match kind {
        NODE_KIND => Some(MACHINE_KIND),
        MACHINE_KIND => Some(MACHINE_SET_KIND),
        MACHINE_SET_KIND => Some(MACHINE_DEPLOYMENT_KIND),
        _ => None,
    }
}

fn owner_record(keys: &AnnotationKeys, obj: &DynamicObject, kind: Option<&str>) -> OwnerRecord {
    let object_kind = kind_of(obj);
    let owner_kind = kind.or_else(|| default_owner_kind(object_kind));
    let marked_for_deletion = object_kind == MACHINE_KIND && is_marked_for_deletion(keys, obj);

    // Nodes point at their Machine through an annotation, not an owner reference
    if object_kind == NODE_KIND && owner_kind == Some(MACHINE_KIND) {
        let machine = machine_ref_from_node(keys, obj.annotations());
        return OwnerRecord {
            object: display_name(obj),
            owner_kind: Some(MACHINE_KIND.to_string()),
            owner: machine.map(|m| format!("{}/{}", m.namespace, m.name)),
            owner_uid: None,
            marked_for_deletion,
        };
    }

    let owner = owner_kind.and_then(|k| owner_for_kind(obj, k));
    OwnerRecord {
        object: display_name(obj),
        owner_kind: owner_kind.map(str::to_string),
        owner: owner.map(|r| r.name.clone()),
        owner_uid: owner.map(|r| r.uid.clone()),
        marked_for_deletion,
    }
}

/// Show the owning object of a given kind
pub fn show_owners(
    keys: &AnnotationKeys,
    objects: &[DynamicObject],
    kind: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let records: Vec<OwnerRecord> = objects
        .iter()
        .map(|obj| owner_record(keys, obj, kind))
        .collect();

    let rows: Vec<OwnerRow> = records
        .iter()
        .map(|r| OwnerRow {
            object: r.object.clone(),
            owner_kind: opt_to_string(r.owner_kind.as_deref()),
            owner: opt_to_string(r.owner.as_deref()),
            marked_for_deletion: r.marked_for_deletion,
        })
        .collect();

    print_rows(&rows, &records, format)
}

/// Show the cluster each object belongs to
pub fn show_clusters(
    keys: &AnnotationKeys,
    objects: &[DynamicObject],
    format: OutputFormat,
) -> Result<()> {
    let rows: Vec<ClusterRow> = objects
        .iter()
        .map(|obj| ClusterRow {
            object: display_name(obj),
            cluster: cluster_name_from_resource(keys, obj),
            effective: effective_cluster_name(keys, obj),
        })
        .collect();

    match format {
        OutputFormat::Table => {
            let display: Vec<ClusterRow> = rows
                .iter()
                .map(|r| ClusterRow {
                    object: r.object.clone(),
                    cluster: or_dash(&r.cluster),
                    effective: or_dash(&r.effective),
                })
                .collect();
            print_rows(&display, &rows, format)
        }
        OutputFormat::Json => print_rows(&rows, &rows, format),
    }
}

/// Show the full node group view of MachineSets and MachineDeployments
pub fn inspect_node_groups(
    keys: &AnnotationKeys,
    logger: &StructuredLogger,
    objects: &[DynamicObject],
    format: OutputFormat,
) -> Result<()> {
    let groups: Vec<NodeGroup> = objects
        .iter()
        .filter_map(|obj| {
            NodeGroupKind::from_kind(kind_of(obj)).map(|kind| NodeGroup::from_object(keys, kind, obj))
        })
        .collect();
    let skipped = objects.len() - groups.len();

    for group in &groups {
        logger.log_node_group(group);
    }

    let records: Vec<NodeGroupRecord> = groups
        .iter()
        .map(|group| {
            let (status, bounds_error) = bounds_status(&group.bounds);
            let bounds = group.bounds.as_ref().ok();
            NodeGroupRecord {
                id: group.id(),
                cluster: group.cluster_name.clone(),
                min: bounds.map(|b| b.min),
                max: bounds.map(|b| b.max),
                status,
                bounds_error,
                scale_from_zero: group.scale_from_zero,
                capacity: group.capacity.as_ref().ok().cloned(),
                capacity_error: group.capacity.as_ref().err().map(|e| e.to_string()),
                owned_by: group.owned_by.clone(),
            }
        })
        .collect();

    let rows: Vec<NodeGroupRow> = records
        .iter()
        .map(|r| NodeGroupRow {
            id: r.id.clone(),
            cluster: or_dash(&r.cluster),
            min: opt_to_string(r.min),
            max: opt_to_string(r.max),
            status: color_status(r.status),
            scale_from_zero: r.scale_from_zero,
            owned_by: opt_to_string(r.owned_by.as_deref()),
        })
        .collect();

    print_rows(&rows, &records, format)?;

    if skipped > 0 {
        print_info(&format!(
            "Skipped {} object(s) that are not MachineSets or MachineDeployments",
            skipped
        ));
    }
    let invalid = count_invalid(records.iter().map(|r| r.status));
    if invalid > 0 {
        print_warning(&format!("{} node group(s) have invalid scaling bounds", invalid));
    }
    Ok(())
}
