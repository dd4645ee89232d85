//! Job-spreading policy pair (§4.2, §4.3). `JobConflict` is opt-in per the
//! design notes — register it only when task-spreading is the desired
//! policy.

use crate::models::{Node, Pod};
use crate::plugins::{Predicate, PredicateResult, Prioritizer, MAX_PRIORITY};

/// Rejects a node that already hosts a pod from the candidate's job.
pub struct JobConflict;

impl Predicate for JobConflict {
    fn name(&self) -> &'static str {
        "JobConflict"
    }

    fn check(&self, pod: &Pod, node: &Node) -> PredicateResult {
        if node.job_task_count(&pod.job_name) > 0 {
            PredicateResult::reject(format!(
                "node {} already hosts a pod from job {}",
                node.name, pod.job_name
            ))
        } else {
            PredicateResult::ok()
        }
    }
}

/// Favors nodes hosting few pods of the candidate's job.
pub struct LeastTasksFromSameJob;

impl Prioritizer for LeastTasksFromSameJob {
    fn name(&self) -> &'static str {
        "LeastTasksFromSameJob"
    }

    fn score(&self, pod: &Pod, node: &Node) -> u32 {
        let same_job = node.job_task_count(&pod.job_name) as u32;
        MAX_PRIORITY.saturating_sub(same_job.min(MAX_PRIORITY))
    }
}
