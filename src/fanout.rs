//! Bounded-worker parallel fan-out over the node list (§4.8), used for both
//! the filter and prioritize phases.
//!
//! Contract: output is indexed by node position, so ordering is preserved
//! regardless of completion order; each task reads only the shared
//! read-only snapshot and writes only its own slot.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Runs `f(index, item)` for every item in `items` across at most
/// `worker_num` concurrently-spawned tasks, returning outputs in the same
/// order as `items`.
pub async fn fan_out<T, O, F>(items: Arc<[T]>, worker_num: usize, f: F) -> Vec<O>
where
    T: Send + Sync + 'static,
    O: Send + 'static,
    F: Fn(usize, &T) -> O + Send + Sync + 'static,
{
    let worker_num = worker_num.max(1);
    let semaphore = Arc::new(Semaphore::new(worker_num));
    let f = Arc::new(f);
    let mut slots: Vec<Option<O>> = (0..items.len()).map(|_| None).collect();
    let mut set = JoinSet::new();

    for idx in 0..items.len() {
        let items = Arc::clone(&items);
        let semaphore = Arc::clone(&semaphore);
        let f = Arc::clone(&f);
        set.spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("fan-out semaphore never closes");
            let out = f(idx, &items[idx]);
            (idx, out)
        });
    }

    while let Some(res) = set.join_next().await {
        let (idx, out) = res.expect("fan-out task panicked");
        slots[idx] = Some(out);
    }

    slots.into_iter().map(|s| s.expect("every index filled")).collect()
}
