//! Key surface and provider ID commands

use anyhow::Result;
use nodegroup_lib::keys::deprecated;
use nodegroup_lib::{normalize, AnnotationKeys, CPU_KEY, GPU_KEY, MAX_PODS_KEY, MEMORY_KEY};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{print_rows, OutputFormat};

/// Row for the key surface table
#[derive(Tabled, Serialize)]
struct KeyRow {
    #[tabled(rename = "Purpose")]
    purpose: &'static str,
    #[tabled(rename = "Key")]
    key: String,
}

/// Row for provider ID normalization
#[derive(Tabled, Serialize)]
struct ProviderIdRow {
    #[tabled(rename = "Provider ID")]
    provider_id: String,
    #[tabled(rename = "Normalized")]
    normalized: String,
}

fn row(purpose: &'static str, key: &str) -> KeyRow {
    KeyRow {
        purpose,
        key: key.to_string(),
    }
}

fn key_rows(keys: &AnnotationKeys) -> Vec<KeyRow> {
    vec![
        row("group", &keys.group),
        row("min size", &keys.node_group_min_size),
        row("max size", &keys.node_group_max_size),
        row("delete marker", &keys.delete_machine),
        row("node → machine", &keys.machine),
        row("cluster label", &keys.cluster_name_label),
        row("cpu capacity", CPU_KEY),
        row("memory capacity (MiB)", MEMORY_KEY),
        row("gpu capacity", GPU_KEY),
        row("max pods", MAX_PODS_KEY),
        row("deprecated min size", deprecated::NODE_GROUP_MIN_SIZE),
        row("deprecated max size", deprecated::NODE_GROUP_MAX_SIZE),
        row("deprecated cluster label", deprecated::CLUSTER_NAME_LABEL),
    ]
}

/// Show the annotation and label keys in use
pub fn show_keys(keys: &AnnotationKeys, format: OutputFormat) -> Result<()> {
    let rows = key_rows(keys);
    print_rows(&rows, &rows, format)
}

/// Normalize provider IDs
pub fn show_normalized(provider_ids: &[String], format: OutputFormat) -> Result<()> {
    let rows: Vec<ProviderIdRow> = provider_ids
        .iter()
        .map(|id| ProviderIdRow {
            provider_id: id.clone(),
            normalized: normalize(id).to_string(),
        })
        .collect();
    print_rows(&rows, &rows, format)
}
