//! Scale-from-zero capacity annotations
//!
//! CPU, GPU and max-pods use the regular quantity grammar. Memory is a plain
//! integer count of MiB and is converted to bytes.

use crate::error::CapacityError;
use crate::keys::{CPU_KEY, GPU_KEY, MAX_PODS_KEY, MEMORY_KEY};
use crate::quantity;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Bytes per Mebibyte
pub const MIB: i64 = 1 << 20;

/// Per-instance capacity assumed for a node group with no live instances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceCapacity {
    pub cpu: Quantity,
    pub memory: Quantity,
    pub gpu: Quantity,
    pub max_pods: Quantity,
}

/// Parse all four capacity annotations, failing on the first bad value
pub fn parse_capacity(annotations: &BTreeMap<String, String>) -> Result<ResourceCapacity, CapacityError> {
    Ok(ResourceCapacity {
        cpu: parse_cpu_capacity(annotations)?,
        memory: parse_memory_capacity(annotations)?,
        gpu: parse_gpu_capacity(annotations)?,
        max_pods: parse_max_pods_capacity(annotations)?,
    })
}

/// True when both CPU and memory capacity are declared
pub fn scale_from_zero_enabled(annotations: &BTreeMap<String, String>) -> bool {
    non_empty(annotations, CPU_KEY).is_some() && non_empty(annotations, MEMORY_KEY).is_some()
}

pub fn parse_cpu_capacity(annotations: &BTreeMap<String, String>) -> Result<Quantity, CapacityError> {
    parse_key(annotations, CPU_KEY)
}

pub fn parse_gpu_capacity(annotations: &BTreeMap<String, String>) -> Result<Quantity, CapacityError> {
    parse_key(annotations, GPU_KEY)
}

pub fn parse_max_pods_capacity(
    annotations: &BTreeMap<String, String>,
) -> Result<Quantity, CapacityError> {
    parse_key(annotations, MAX_PODS_KEY)
}

/// Parse the memory annotation (integer MiB) into a byte quantity
pub fn parse_memory_capacity(
    annotations: &BTreeMap<String, String>,
) -> Result<Quantity, CapacityError> {
    let Some(value) = non_empty(annotations, MEMORY_KEY) else {
        return Ok(quantity::zero());
    };

    let mebibytes: i64 = value
        .parse()
        .map_err(|source| CapacityError::MemoryNotInteger {
            key: MEMORY_KEY.to_string(),
            value: value.to_string(),
            source,
        })?;

    let bytes = mebibytes
        .checked_mul(MIB)
        .ok_or_else(|| CapacityError::MemoryOverflow {
            key: MEMORY_KEY.to_string(),
            value: value.to_string(),
        })?;

    Ok(quantity::decimal_si(bytes))
}

fn parse_key(annotations: &BTreeMap<String, String>, key: &str) -> Result<Quantity, CapacityError> {
    match non_empty(annotations, key) {
        Some(value) => quantity::parse(value).map_err(|source| CapacityError::Quantity {
            key: key.to_string(),
            value: value.to_string(),
            source,
        }),
        None => Ok(quantity::zero()),
    }
}

fn non_empty<'a>(annotations: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    annotations
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}
