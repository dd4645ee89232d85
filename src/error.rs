//! Typed error kinds for the scheduling engine (spec §7).
//!
//! `EmptyQueue` and `FitError` are recoverable — the driver matches on them
//! internally and they never escape `Driver::schedule`. Every other variant
//! is fatal for the tick and is returned to the harness.

use std::collections::HashMap;

use crate::models::PodId;

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// Signal to end the tick's dequeue loop; not surfaced to the harness.
    #[error("pending queue is empty")]
    EmptyQueue,

    /// No node passed every predicate for `pod`. Recoverable via preemption
    /// or the fail-queue (§4.6).
    #[error("pod {pod} did not fit any of {node_count} node(s)")]
    FitError {
        pod: PodId,
        node_count: usize,
        /// Per-node failure reason, keyed by node name.
        failed: HashMap<String, String>,
    },

    /// The fleet is empty. Fatal for the tick.
    #[error("no nodes available in the fleet")]
    NoNodesAvailable,

    /// A predicate or prioritizer returned an error. Fatal for the tick.
    #[error("policy error in plugin {plugin}: {message}")]
    PolicyError { plugin: String, message: String },

    /// Programmer error: the queue already contains this pod.
    #[error("pod {0} is already queued")]
    DuplicatePush(PodId),

    /// Programmer error: a nomination or bind referenced an unknown node.
    #[error("unknown node {0}")]
    UnknownNode(String),
}

impl ScheduleError {
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ScheduleError::EmptyQueue | ScheduleError::FitError { .. })
    }
}
