//! Loading cluster-api objects from JSON files

use anyhow::{Context, Result};
use kube::core::DynamicObject;
use kube::ResourceExt;
use serde_json::Value;
use std::path::Path;

/// Read a single object, a `List` (`{"items": [...]}`) or a JSON array of objects
pub fn load_objects(path: &Path) -> Result<Vec<DynamicObject>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_objects(&content).with_context(|| format!("Failed to decode {}", path.display()))
}

fn parse_objects(content: &str) -> Result<Vec<DynamicObject>> {
    let value: Value = serde_json::from_str(content).context("Input is not valid JSON")?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) if map.get("items").map_or(false, Value::is_array) => {
            match map.remove("items") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            }
        }
        other => vec![other],
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item)
                .with_context(|| format!("Item {} is not a Kubernetes object", i))
        })
        .collect()
}

/// Kind of an object, empty when `kind` is not set
pub fn kind_of(obj: &DynamicObject) -> &str {
    obj.types.as_ref().map(|t| t.kind.as_str()).unwrap_or("")
}

/// Human-readable `Kind namespace/name` label
pub fn display_name(obj: &DynamicObject) -> String {
    let name = match obj.namespace() {
        Some(ns) => format!("{}/{}", ns, obj.name_any()),
        None => obj.name_any(),
    };
    match kind_of(obj) {
        "" => name,
        kind => format!("{} {}", kind, name),
    }
}
