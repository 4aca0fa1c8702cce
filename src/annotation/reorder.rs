//! Reordering of keyed sequences
//!
//! Two shapes of reorder exist: applying a full or partial id list, and the
//! single splice a drag-and-drop produces.

use std::collections::HashSet;
use std::hash::Hash;

/// Apply `ordered` as a stable partial permutation.
///
/// The slots currently held by items named in `ordered` are refilled with
/// those items in the requested order. Items not named keep their index.
/// Unknown and repeated ids are ignored, so no item is ever lost.
pub fn reorder_by_ids<T, K, F>(items: Vec<T>, ordered: &[K], key: F) -> Vec<T>
where
    K: Eq + Hash + Copy,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::with_capacity(ordered.len());
    let requested: Vec<usize> = ordered
        .iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|id| items.iter().position(|item| key(item) == *id))
        .collect();

    let mut is_slot = vec![false; items.len()];
    for &index in &requested {
        is_slot[index] = true;
    }

    let mut source: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut next_requested = requested.iter();
    let mut result = Vec::with_capacity(source.len());
    for index in 0..source.len() {
        let from = if is_slot[index] {
            // one requested index per slot
            *next_requested.next().unwrap_or(&index)
        } else {
            index
        };
        if let Some(item) = source[from].take() {
            result.push(item);
        }
    }
    result
}

/// Move the item at `from` so it ends up at index `to`
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Drag-and-drop splice: `dragged` takes the place of `target`.
///
/// Returns false when either id is missing or both are the same item.
pub fn move_by_id<T, K, F>(items: &mut Vec<T>, dragged: K, target: K, key: F) -> bool
where
    K: Eq,
    F: Fn(&T) -> K,
{
    let from = items.iter().position(|item| key(item) == dragged);
    let to = items.iter().position(|item| key(item) == target);
    match (from, to) {
        (Some(from), Some(to)) => move_item(items, from, to),
        _ => false,
    }
}
