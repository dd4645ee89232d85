//! Pending-pod queue (spec §4.1): FIFO and priority variants behind one
//! contract.

use std::cmp::Ordering;
use std::collections::{HashSet, VecDeque};

use crate::error::ScheduleError;
use crate::models::{Pod, PodId};

pub trait PodQueue: Send {
    fn push(&mut self, pod: Pod) -> Result<(), ScheduleError>;
    fn front(&self) -> Result<&Pod, ScheduleError>;
    fn pop(&mut self) -> Result<Pod, ScheduleError>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Records a preemption hint; does not change queue order (§4.1).
    fn update_nominated_node(&mut self, pod_id: &PodId, node_name: String);
    fn remove_nominated_node(&mut self, pod_id: &PodId);
    fn contains(&self, pod_id: &PodId) -> bool;

    /// Clears the nomination of every queued pod nominated to `node_name`
    /// whose priority is strictly less than `threshold_priority` — run
    /// after a higher-priority pod claims that node by preemption (§4.7),
    /// so the displaced nominees get another chance elsewhere.
    fn clear_lower_priority_nominations(&mut self, node_name: &str, threshold_priority: i64);
}

/// Insertion-order queue.
#[derive(Default)]
pub struct FifoQueue {
    items: VecDeque<Pod>,
    ids: HashSet<PodId>,
}

impl FifoQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PodQueue for FifoQueue {
    fn push(&mut self, pod: Pod) -> Result<(), ScheduleError> {
        if !self.ids.insert(pod.id.clone()) {
            return Err(ScheduleError::DuplicatePush(pod.id));
        }
        self.items.push_back(pod);
        Ok(())
    }

    fn front(&self) -> Result<&Pod, ScheduleError> {
        self.items.front().ok_or(ScheduleError::EmptyQueue)
    }

    fn pop(&mut self) -> Result<Pod, ScheduleError> {
        let pod = self.items.pop_front().ok_or(ScheduleError::EmptyQueue)?;
        self.ids.remove(&pod.id);
        Ok(pod)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn update_nominated_node(&mut self, pod_id: &PodId, node_name: String) {
        if let Some(pod) = self.items.iter_mut().find(|p| &p.id == pod_id) {
            pod.nominated_node = Some(node_name);
        }
    }

    fn remove_nominated_node(&mut self, pod_id: &PodId) {
        if let Some(pod) = self.items.iter_mut().find(|p| &p.id == pod_id) {
            pod.nominated_node = None;
        }
    }

    fn contains(&self, pod_id: &PodId) -> bool {
        self.ids.contains(pod_id)
    }

    fn clear_lower_priority_nominations(&mut self, node_name: &str, threshold_priority: i64) {
        for pod in self.items.iter_mut() {
            if pod.priority < threshold_priority && pod.nominated_node.as_deref() == Some(node_name) {
                pod.nominated_node = None;
            }
        }
    }
}

/// What `priorityType` in the configuration (§6) selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityType {
    /// `priorityType=0`: pod priority field descending, ties by
    /// creationTimestamp ascending.
    Field,
    /// `priorityType=1`: request size descending (CPU-dominant: compare
    /// milliCPU first, memory only breaks CPU ties), then creationTimestamp.
    RequestSize,
}

/// Kept sorted (best-first at index 0) on every push.
pub struct PriorityQueue {
    priority_type: PriorityType,
    items: Vec<Pod>,
    ids: HashSet<PodId>,
}

impl PriorityQueue {
    pub fn new(priority_type: PriorityType) -> Self {
        Self {
            priority_type,
            items: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// `Less` means `a` sorts ahead of `b` (a is higher priority / bigger).
    fn order(&self, a: &Pod, b: &Pod) -> Ordering {
        match self.priority_type {
            PriorityType::Field => b
                .priority
                .cmp(&a.priority)
                .then(a.creation_timestamp.cmp(&b.creation_timestamp)),
            PriorityType::RequestSize => b
                .request
                .milli_cpu
                .cmp(&a.request.milli_cpu)
                .then(b.request.memory_bytes.cmp(&a.request.memory_bytes))
                .then(a.creation_timestamp.cmp(&b.creation_timestamp)),
        }
    }
}

impl PodQueue for PriorityQueue {
    fn push(&mut self, pod: Pod) -> Result<(), ScheduleError> {
        if !self.ids.insert(pod.id.clone()) {
            return Err(ScheduleError::DuplicatePush(pod.id));
        }
        let pos = self
            .items
            .partition_point(|existing| self.order(existing, &pod) != Ordering::Greater);
        self.items.insert(pos, pod);
        Ok(())
    }

    fn front(&self) -> Result<&Pod, ScheduleError> {
        self.items.first().ok_or(ScheduleError::EmptyQueue)
    }

    fn pop(&mut self) -> Result<Pod, ScheduleError> {
        if self.items.is_empty() {
            return Err(ScheduleError::EmptyQueue);
        }
        let pod = self.items.remove(0);
        self.ids.remove(&pod.id);
        Ok(pod)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn update_nominated_node(&mut self, pod_id: &PodId, node_name: String) {
        if let Some(pod) = self.items.iter_mut().find(|p| &p.id == pod_id) {
            pod.nominated_node = Some(node_name);
        }
    }

    fn remove_nominated_node(&mut self, pod_id: &PodId) {
        if let Some(pod) = self.items.iter_mut().find(|p| &p.id == pod_id) {
            pod.nominated_node = None;
        }
    }

    fn contains(&self, pod_id: &PodId) -> bool {
        self.ids.contains(pod_id)
    }

    fn clear_lower_priority_nominations(&mut self, node_name: &str, threshold_priority: i64) {
        for pod in self.items.iter_mut() {
            if pod.priority < threshold_priority && pod.nominated_node.as_deref() == Some(node_name) {
                pod.nominated_node = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceVector;

    fn pod(name: &str, priority: i64, ts: u64, cpu: u64) -> Pod {
        Pod::new("default", name, ResourceVector::new(cpu, 0), priority, ts)
    }

    #[test]
    fn fifo_preserves_insertion_order() {
        let mut q = FifoQueue::new();
        q.push(pod("a", 0, 0, 0)).unwrap();
        q.push(pod("b", 0, 1, 0)).unwrap();
        assert_eq!(q.front().unwrap().id.name, "a");
        q.pop().unwrap();
        assert_eq!(q.front().unwrap().id.name, "b");
    }

    #[test]
    fn fifo_rejects_duplicate_push() {
        let mut q = FifoQueue::new();
        q.push(pod("a", 0, 0, 0)).unwrap();
        assert!(matches!(
            q.push(pod("a", 0, 1, 0)),
            Err(ScheduleError::DuplicatePush(_))
        ));
    }

    #[test]
    fn priority_queue_orders_by_priority_then_creation() {
        let mut q = PriorityQueue::new(PriorityType::Field);
        q.push(pod("low", 1, 0, 0)).unwrap();
        q.push(pod("high", 5, 1, 0)).unwrap();
        q.push(pod("high-later", 5, 2, 0)).unwrap();
        assert_eq!(q.front().unwrap().id.name, "high");
        q.pop().unwrap();
        assert_eq!(q.front().unwrap().id.name, "high-later");
        q.pop().unwrap();
        assert_eq!(q.front().unwrap().id.name, "low");
    }

    #[test]
    fn priority_queue_request_size_is_cpu_dominant() {
        let mut q = PriorityQueue::new(PriorityType::RequestSize);
        q.push(pod("small", 0, 0, 100)).unwrap();
        q.push(pod("big", 0, 1, 900)).unwrap();
        assert_eq!(q.front().unwrap().id.name, "big");
    }

    #[test]
    fn empty_queue_errors() {
        let q = FifoQueue::new();
        assert!(matches!(q.front(), Err(ScheduleError::EmptyQueue)));
    }
}
