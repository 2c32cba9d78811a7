//! Attribute path resolution
//!
//! Follows an [`AttributeId`] through a dataset tree. Every item of every
//! traversed sequence is a separate branch, so one path can reach many
//! values.

use crate::attribute_id::AttributeId;
use crate::dataset::{Attribute, DatasetNode};

/// Collect every value reachable from `root` along `path`.
///
/// Container tags must name sequences; branches where a container is missing
/// or holds plain values are dropped. At the target tag each node contributes
/// its values, and when the target is itself a sequence its items are searched
/// for the same tag again, to any depth.
///
/// Values come back in encounter order (depth-first, item order) without
/// deduplication. Returns `None` when the target attribute does not occur at
/// the end of any branch, and `Some` (possibly empty) otherwise.
pub fn resolve<'a, N: DatasetNode>(root: &'a N, path: &AttributeId) -> Option<Vec<&'a N::Value>> {
    let mut frontier: Vec<&'a N> = vec![root];

    for &container in path.containers() {
        let mut next = Vec::new();
        for node in frontier {
            if let Some(Attribute::Sequence(items)) = node.attribute(container) {
                next.extend(items.iter());
            }
        }
        if next.is_empty() {
            return None;
        }
        frontier = next;
    }

    let target = path.target();
    let mut found = false;
    let mut values = Vec::new();

    // Worklist in reverse so that popping preserves encounter order.
    let mut pending: Vec<&'a N> = frontier.into_iter().rev().collect();
    while let Some(node) = pending.pop() {
        match node.attribute(target) {
            Some(Attribute::Values(leaf)) => {
                found = true;
                values.extend(leaf.iter());
            }
            Some(Attribute::Sequence(items)) => {
                found = true;
                pending.extend(items.iter().rev());
            }
            None => {}
        }
    }

    found.then_some(values)
}
