//! Metrics surface (spec §2, §5, §6): the harness-supplied per-node usage
//! snapshot consulted by the oversub controller and the extenders.

use std::collections::HashMap;

use crate::models::NodeMetrics;

/// `nodeName -> {usage, allocatable, request}`, written once per tick by the
/// harness before `Schedule`, read-only for the remainder of the call.
/// Absence of an entry means "unknown"; extenders treat that node
/// optimistically (§6).
pub type NodeMetricsCache = HashMap<String, NodeMetrics>;
