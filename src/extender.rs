//! Extenders (§4.4): an out-of-band filter + prioritize pair invoked after
//! the in-process plugins, operating on the already-filtered node list.
//! Extender scores compose additively into the final prioritizer total —
//! the design notes call out that high extender weights dominate, and this
//! implementation does not normalize.

use std::collections::HashMap;

use crate::models::{Node, Pod};
use crate::metrics::NodeMetricsCache;
use crate::plugins::MAX_PRIORITY;

pub trait Extender: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the subset of `nodes` (by name) that survive this extender's
    /// filter, preserving the input order.
    fn filter(&self, pod: &Pod, nodes: &[Node], metrics: &NodeMetricsCache) -> Vec<String>;

    /// Scores every node passed in, in `[0, MaxPriority]`.
    fn prioritize(&self, pod: &Pod, nodes: &[Node], metrics: &NodeMetricsCache) -> HashMap<String, u32>;
}

/// Drops a node if `usage + request(pod)` would exceed `allocatable` — a
/// usage-aware admission test on top of the request-aware predicates.
/// Nodes absent from the metrics cache are treated optimistically and kept.
pub struct FilterFitResource;

impl Extender for FilterFitResource {
    fn name(&self) -> &'static str {
        "filterFitResource"
    }

    fn filter(&self, pod: &Pod, nodes: &[Node], metrics: &NodeMetricsCache) -> Vec<String> {
        nodes
            .iter()
            .filter(|node| match metrics.get(&node.name) {
                Some(m) => (m.usage + pod.request).fits_within(&m.allocatable),
                None => true,
            })
            .map(|node| node.name.clone())
            .collect()
    }

    fn prioritize(&self, _pod: &Pod, nodes: &[Node], _metrics: &NodeMetricsCache) -> HashMap<String, u32> {
        nodes.iter().map(|n| (n.name.clone(), 0)).collect()
    }
}

/// Scores each node by `MaxPriority · (allocatable − usage) / allocatable`,
/// per resource, taking the min across resources. Nodes lacking metrics
/// score `MaxPriority`.
pub struct PrioritizeLowUsageNode;

impl Extender for PrioritizeLowUsageNode {
    fn name(&self) -> &'static str {
        "prioritizeLowUsageNode"
    }

    fn filter(&self, _pod: &Pod, nodes: &[Node], _metrics: &NodeMetricsCache) -> Vec<String> {
        nodes.iter().map(|n| n.name.clone()).collect()
    }

    fn prioritize(&self, _pod: &Pod, nodes: &[Node], metrics: &NodeMetricsCache) -> HashMap<String, u32> {
        nodes
            .iter()
            .map(|node| {
                let score = match metrics.get(&node.name) {
                    Some(m) => {
                        let headroom = |alloc: u64, used: u64| {
                            if alloc == 0 {
                                1.0
                            } else {
                                ((alloc.saturating_sub(used)) as f64 / alloc as f64).clamp(0.0, 1.0)
                            }
                        };
                        let min_headroom = headroom(m.allocatable.milli_cpu, m.usage.milli_cpu)
                            .min(headroom(m.allocatable.memory_bytes, m.usage.memory_bytes))
                            .min(headroom(m.allocatable.ephemeral_bytes, m.usage.ephemeral_bytes));
                        (min_headroom * MAX_PRIORITY as f64).round() as u32
                    }
                    None => MAX_PRIORITY,
                };
                (node.name.clone(), score)
            })
            .collect()
    }
}
