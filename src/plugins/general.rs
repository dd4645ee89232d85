//! `GeneralPredicates` (§4.2): the compound check kube-style schedulers run
//! first. Name/host/port checks have no counterpart in this simulator (no
//! network model), so they are stubbed to always pass; resource fit is the
//! only material check.

use crate::models::{Node, Pod};
use crate::plugins::resources_fit::PodFitsResources;
use crate::plugins::{Predicate, PredicateResult};

pub struct GeneralPredicates;

impl Predicate for GeneralPredicates {
    fn name(&self) -> &'static str {
        "GeneralPredicates"
    }

    fn check(&self, pod: &Pod, node: &Node) -> PredicateResult {
        PodFitsResources.check(pod, node)
    }
}
