//! Preemption (§4.7): evicting lower-priority pods to make room for a pod
//! that failed to fit anywhere.

use crate::error::ScheduleError;
use crate::models::{Node, Pod, PodId};
use crate::node_map::NodeInfoMap;

pub struct PreemptionOutcome {
    pub node_name: String,
    pub victims: Vec<PodId>,
}

/// A node is a preemption candidate unless its failure reason names a
/// condition eviction cannot cure (a non-resource predicate). This
/// simulator's only non-resource predicate is `JobConflict`, whose reason
/// string is checked for explicitly.
fn is_curable_by_eviction(reason: &str) -> bool {
    !reason.contains("already hosts a pod from job")
}

/// `selectVictimsOnNode` (§4.7 step 3): returns `None` if the node is
/// hopeless even after evicting every lower-priority pod, `Some(victims)`
/// otherwise (possibly empty, if the preemptor already fits).
fn select_victims_on_node(preemptor: &Pod, node: &Node) -> Option<Vec<PodId>> {
    let bound = node.bound_pods_for_preemption();
    let (below, kept): (Vec<_>, Vec<_>) = bound
        .into_iter()
        .partition(|(_, _, priority)| *priority < preemptor.priority);

    let kept_sum = kept
        .iter()
        .fold(crate::resources::ResourceVector::ZERO, |acc, (_, req, _)| acc + *req);

    let fits = |extra_sum: crate::resources::ResourceVector| {
        (preemptor.request + kept_sum + extra_sum).fits_within_scaled(&node.allocatable, node.oversub_factor)
    };

    if !fits(crate::resources::ResourceVector::ZERO) {
        return None;
    }

    // Higher-priority-first: try to reprieve the pods we'd most like to keep.
    let mut below_sorted = below;
    below_sorted.sort_by(|a, b| b.2.cmp(&a.2));

    let mut reprieved_sum = crate::resources::ResourceVector::ZERO;
    let mut victims = Vec::new();
    for (id, request, _priority) in below_sorted {
        let candidate_sum = reprieved_sum + request;
        if fits(candidate_sum) {
            reprieved_sum = candidate_sum;
        } else {
            victims.push(id);
        }
    }
    Some(victims)
}

struct Candidate {
    node_name: String,
    victims: Vec<PodId>,
    highest_victim_priority: i64,
    total_victim_priority: i64,
}

/// `pickOneNodeForPreemption` (§4.7 step 4): fewest PDB-violating victims
/// (always zero here — PDBs are unimplemented), then lowest highest-
/// priority victim, then smallest total victim priority sum, then fewest
/// victims, then name order.
fn pick_one_node(candidates: Vec<Candidate>) -> Option<Candidate> {
    candidates.into_iter().min_by(|a, b| {
        a.highest_victim_priority
            .cmp(&b.highest_victim_priority)
            .then(a.total_victim_priority.cmp(&b.total_victim_priority))
            .then(a.victims.len().cmp(&b.victims.len()))
            .then(a.node_name.cmp(&b.node_name))
    })
}

/// Runs preemption for `preemptor`, which just failed to fit anywhere.
/// Returns `None` if the preemptor is ineligible (it already holds a valid
/// nomination) or no candidate node can be made to fit even after
/// eviction.
pub fn preempt(preemptor: &Pod, fit_error: &ScheduleError, nodes: &NodeInfoMap) -> Option<PreemptionOutcome> {
    let ScheduleError::FitError { failed, .. } = fit_error else {
        return None;
    };

    // Eligibility: an existing nomination to a node still present in the
    // fleet is treated as still valid, so we decline to redo preemption.
    if let Some(nominated) = &preemptor.nominated_node {
        if nodes.contains(nominated) {
            return None;
        }
    }

    let candidates: Vec<Candidate> = failed
        .iter()
        .filter(|(_, reason)| is_curable_by_eviction(reason))
        .filter_map(|(node_name, _)| {
            let node = nodes.get(node_name)?;
            let victims = select_victims_on_node(preemptor, node)?;
            let priorities: std::collections::HashMap<PodId, i64> = node
                .bound_pods_for_preemption()
                .into_iter()
                .map(|(id, _, priority)| (id, priority))
                .collect();
            let highest_victim_priority = victims
                .iter()
                .filter_map(|id| priorities.get(id).copied())
                .max()
                .unwrap_or(i64::MIN);
            let total_victim_priority = victims.iter().filter_map(|id| priorities.get(id).copied()).sum();
            Some(Candidate {
                node_name: node_name.clone(),
                victims,
                highest_victim_priority,
                total_victim_priority,
            })
        })
        .collect();

    let chosen = pick_one_node(candidates)?;
    log::debug!(
        "preempting {} victim(s) on {} to admit pod {}",
        chosen.victims.len(),
        chosen.node_name,
        preemptor.id
    );
    Some(PreemptionOutcome {
        node_name: chosen.node_name,
        victims: chosen.victims,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceVector;
    use std::collections::HashMap;

    fn fit_error(failed: HashMap<String, String>) -> ScheduleError {
        ScheduleError::FitError {
            pod: PodId::new("default", "preemptor"),
            node_count: failed.len(),
            failed,
        }
    }

    #[test]
    fn picks_node_with_cheapest_victim() {
        let mut nodes = NodeInfoMap::new();
        let mut x = Node::new("x", ResourceVector::new(10, 0), 1.0);
        x.bind(&Pod::new("default", "low", ResourceVector::new(10, 0), 1, 0));
        let mut y = Node::new("y", ResourceVector::new(10, 0), 1.0);
        y.bind(&Pod::new("default", "high", ResourceVector::new(10, 0), 5, 0));
        nodes.insert(x);
        nodes.insert(y);

        let preemptor = Pod::new("default", "p", ResourceVector::new(10, 0), 9, 1);
        let mut failed = HashMap::new();
        failed.insert("x".to_string(), "insufficient resources".to_string());
        failed.insert("y".to_string(), "insufficient resources".to_string());
        let err = fit_error(failed);

        let outcome = preempt(&preemptor, &err, &nodes).expect("should find a node");
        assert_eq!(outcome.node_name, "x");
        assert_eq!(outcome.victims, vec![PodId::new("default", "low")]);
    }

    #[test]
    fn non_curable_reason_excludes_node() {
        let mut nodes = NodeInfoMap::new();
        let n = Node::new("n1", ResourceVector::new(10, 0), 1.0);
        nodes.insert(n);
        let preemptor = Pod::new("default", "p", ResourceVector::new(10, 0), 9, 1);
        let mut failed = HashMap::new();
        failed.insert(
            "n1".to_string(),
            "node n1 already hosts a pod from job p".to_string(),
        );
        let err = fit_error(failed);
        assert!(preempt(&preemptor, &err, &nodes).is_none());
    }

    #[test]
    fn ineligible_when_existing_nomination_still_valid() {
        let mut nodes = NodeInfoMap::new();
        nodes.insert(Node::new("n1", ResourceVector::new(10, 0), 1.0));
        let mut preemptor = Pod::new("default", "p", ResourceVector::new(10, 0), 9, 1);
        preemptor.nominated_node = Some("n1".to_string());
        let mut failed = HashMap::new();
        failed.insert("n1".to_string(), "insufficient resources".to_string());
        let err = fit_error(failed);
        assert!(preempt(&preemptor, &err, &nodes).is_none());
    }
}
