//! Resource-fit predicates and request-shape prioritizers, grounded on the
//! teacher's `node_resources_fit.rs` and `balanced_allocation.rs` plugins.

use crate::models::{Node, Pod};
use crate::plugins::{Predicate, PredicateResult, Prioritizer, MAX_PRIORITY};

/// `request(pod) + requestSum(node) ≤ allocatable(node)`.
pub struct PodFitsResources;

impl Predicate for PodFitsResources {
    fn name(&self) -> &'static str {
        "PodFitsResources"
    }

    fn check(&self, pod: &Pod, node: &Node) -> PredicateResult {
        let projected = pod.request + node.request_sum();
        if projected.fits_within(&node.allocatable) {
            PredicateResult::ok()
        } else {
            PredicateResult::reject(format!(
                "insufficient resources on {}: would need {:?}, allocatable is {:?}",
                node.name, projected, node.allocatable
            ))
        }
    }
}

/// Same as `PodFitsResources` but scaled by the node's current oversub
/// factor on the right-hand side.
pub struct PodFitsResourcesOverSub;

impl Predicate for PodFitsResourcesOverSub {
    fn name(&self) -> &'static str {
        "PodFitsResourcesOverSub"
    }

    fn check(&self, pod: &Pod, node: &Node) -> PredicateResult {
        let projected = pod.request + node.request_sum();
        if projected.fits_within_scaled(&node.allocatable, node.oversub_factor) {
            PredicateResult::ok()
        } else {
            PredicateResult::reject(format!(
                "insufficient oversubscribed resources on {} at factor {:.2}",
                node.name, node.oversub_factor
            ))
        }
    }
}

/// Favors nodes with higher `requestSum / allocatable` — best-fit.
pub struct MostRequested;

impl Prioritizer for MostRequested {
    fn name(&self) -> &'static str {
        "MostRequested"
    }

    fn score(&self, pod: &Pod, node: &Node) -> u32 {
        let projected = node.request_sum() + pod.request;
        let utilization = node.allocatable.average_utilization(&projected).clamp(0.0, 1.0);
        (utilization * MAX_PRIORITY as f64).round() as u32
    }
}

/// Favors nodes with lower `requestSum / allocatable` — worst-fit.
pub struct LeastRequested;

impl Prioritizer for LeastRequested {
    fn name(&self) -> &'static str {
        "LeastRequested"
    }

    fn score(&self, pod: &Pod, node: &Node) -> u32 {
        let projected = node.request_sum() + pod.request;
        let utilization = node.allocatable.average_utilization(&projected).clamp(0.0, 1.0);
        (((1.0 - utilization) * MAX_PRIORITY as f64).round() as u32).min(MAX_PRIORITY)
    }
}

/// Favors nodes where CPU and memory utilization end up close together
/// after the candidate binds, penalizing lopsided allocation.
pub struct BalancedResourceAllocation;

impl Prioritizer for BalancedResourceAllocation {
    fn name(&self) -> &'static str {
        "BalancedResourceAllocation"
    }

    fn score(&self, pod: &Pod, node: &Node) -> u32 {
        if node.allocatable.milli_cpu == 0 || node.allocatable.memory_bytes == 0 {
            return 0;
        }
        let projected = node.request_sum() + pod.request;
        let cpu_fraction = projected.milli_cpu as f64 / node.allocatable.milli_cpu as f64;
        let mem_fraction = projected.memory_bytes as f64 / node.allocatable.memory_bytes as f64;
        if cpu_fraction > 1.0 || mem_fraction > 1.0 {
            return 0;
        }
        let diff = (cpu_fraction - mem_fraction).abs();
        (((1.0 - diff) * MAX_PRIORITY as f64).round() as u32).min(MAX_PRIORITY)
    }
}
