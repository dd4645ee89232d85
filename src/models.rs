//! Pod and Node data model (spec §3).

use std::collections::BTreeMap;
use std::fmt;

use crate::clock::Tick;
use crate::resources::ResourceVector;

/// A pod's identity: `namespace/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct PodId {
    pub namespace: String,
    pub name: String,
}

impl PodId {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for PodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

/// A pending or bound workload unit.
///
/// Immutable after creation except for the scheduling-state annotation
/// `nominated_node`, which preemption (§4.7) is the only writer of.
#[derive(Debug, Clone)]
pub struct Pod {
    pub id: PodId,
    /// What the scheduler reserves against a node's allocatable capacity.
    pub request: ResourceVector,
    /// Multiplier applied to `request` to derive what the pod actually
    /// consumes once running, in the absence of an external phase-demand
    /// model. 1.0 means demand equals request.
    pub demand_to_request_ratio: f64,
    pub priority: i64,
    pub creation_timestamp: Tick,
    pub nominated_node: Option<String>,
    /// Tasks sharing a job should be spread; derived from `name` by
    /// stripping a trailing `-<suffix>` generation token.
    pub job_name: String,
}

impl Pod {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        request: ResourceVector,
        priority: i64,
        creation_timestamp: Tick,
    ) -> Self {
        let name = name.into();
        let job_name = derive_job_name(&name);
        Self {
            id: PodId::new(namespace, name),
            request,
            demand_to_request_ratio: 1.0,
            priority,
            creation_timestamp,
            nominated_node: None,
            job_name,
        }
    }

    pub fn with_demand_ratio(mut self, ratio: f64) -> Self {
        self.demand_to_request_ratio = ratio;
        self
    }

    /// What this pod will actually consume once running.
    pub fn demand(&self) -> ResourceVector {
        self.request.scale(self.demand_to_request_ratio)
    }
}

fn derive_job_name(pod_name: &str) -> String {
    match pod_name.rsplit_once('-') {
        Some((job, suffix)) if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_alphanumeric()) => {
            job.to_string()
        }
        _ => pod_name.to_string(),
    }
}

/// A compute node. Tracks allocatable capacity, the bound-pod set, the
/// derived request sum, and the per-node oversub factor. Usage (the
/// time-varying, harness-supplied figure) lives in `NodeMetrics` (§5), not
/// here — a node's "request side" is this simulator's own bookkeeping; its
/// "usage side" is externally modeled and fed in once per tick.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub allocatable: ResourceVector,
    pub oversub_factor: f64,
    bound: BTreeMap<PodId, BoundPod>,
}

#[derive(Debug, Clone)]
struct BoundPod {
    request: ResourceVector,
    priority: i64,
    job_name: String,
}

impl Node {
    pub fn new(name: impl Into<String>, allocatable: ResourceVector, default_oversub: f64) -> Self {
        Self {
            name: name.into(),
            allocatable,
            oversub_factor: default_oversub,
            bound: BTreeMap::new(),
        }
    }

    pub fn request_sum(&self) -> ResourceVector {
        self.bound
            .values()
            .fold(ResourceVector::ZERO, |acc, b| acc + b.request)
    }

    pub fn bound_pod_ids(&self) -> impl Iterator<Item = &PodId> {
        self.bound.keys()
    }

    pub fn bound_pod_count(&self) -> usize {
        self.bound.len()
    }

    pub fn job_task_count(&self, job_name: &str) -> usize {
        self.bound.values().filter(|b| b.job_name == job_name).count()
    }

    pub fn is_bound(&self, pod_id: &PodId) -> bool {
        self.bound.contains_key(pod_id)
    }

    /// Snapshot of bound pods' `(id, request, priority)`, used by
    /// preemption's victim selection. Owned because preemption needs to
    /// simulate removing and reprieving pods without mutating this node.
    pub fn bound_pods_for_preemption(&self) -> Vec<(PodId, ResourceVector, i64)> {
        self.bound
            .iter()
            .map(|(id, b)| (id.clone(), b.request, b.priority))
            .collect()
    }

    /// Reserve `pod`'s request against this node. Returns `false` (and does
    /// nothing) if the pod is already bound here — binding is the driver's
    /// job and it must unbind before rebinding (§3 invariant).
    pub fn bind(&mut self, pod: &Pod) -> bool {
        if self.bound.contains_key(&pod.id) {
            return false;
        }
        self.bound.insert(
            pod.id.clone(),
            BoundPod {
                request: pod.request,
                priority: pod.priority,
                job_name: pod.job_name.clone(),
            },
        );
        true
    }

    /// Release `pod_id`'s reservation. Returns the request that was freed,
    /// or `None` if the pod was not bound here.
    pub fn unbind(&mut self, pod_id: &PodId) -> Option<ResourceVector> {
        self.bound.remove(pod_id).map(|b| b.request)
    }
}

/// Harness-supplied, read-only-during-`Schedule` usage snapshot for one
/// node (§5, §6). Absence of an entry for a node means "unknown" and
/// extenders treat that node optimistically.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeMetrics {
    pub usage: ResourceVector,
    pub allocatable: ResourceVector,
    pub requested: ResourceVector,
}
