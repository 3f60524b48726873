//! Structured logging for node-group resolution
//!
//! The library never installs a subscriber; binaries decide how events are
//! rendered (JSON or plain text).

use crate::error::BoundsError;
use crate::nodegroup::NodeGroup;
use tracing::{debug, info, warn};

/// Emits consistent `event = "..."` records for resolution outcomes
#[derive(Clone)]
pub struct StructuredLogger {
    group: String,
}

impl StructuredLogger {
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
        }
    }

    /// Log the configured key group once at startup
    pub fn log_startup(&self, version: &str) {
        info!(
            event = "resolver_started",
            capi_group = %self.group,
            version = %version,
            "Node group resolver started"
        );
    }

    /// Log the outcome of resolving one node group
    pub fn log_node_group(&self, node_group: &NodeGroup) {
        let id = node_group.id();

        match &node_group.bounds {
            Ok(bounds) => {
                info!(
                    event = "node_group_resolved",
                    capi_group = %self.group,
                    node_group = %id,
                    cluster = %node_group.cluster_name,
                    min_size = bounds.min,
                    max_size = bounds.max,
                    scale_from_zero = node_group.scale_from_zero,
                    "Resolved node group bounds"
                );
            }
            Err(BoundsError::Missing(bound)) => {
                debug!(
                    event = "node_group_unmanaged",
                    capi_group = %self.group,
                    node_group = %id,
                    missing = %bound,
                    "Skipping node group without scaling bounds"
                );
            }
            Err(err) => {
                warn!(
                    event = "node_group_invalid_bounds",
                    capi_group = %self.group,
                    node_group = %id,
                    error = %err,
                    "Invalid scaling bounds"
                );
            }
        }

        if let Err(err) = &node_group.capacity {
            warn!(
                event = "node_group_invalid_capacity",
                capi_group = %self.group,
                node_group = %id,
                annotation = %err.key(),
                error = %err,
                "Invalid scale-from-zero capacity"
            );
        }
    }
}
