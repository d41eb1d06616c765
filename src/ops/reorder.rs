use std::collections::HashSet;

use crate::model::{SortMode, Store, ViewFilter};
use crate::ops::view::{card_matches, visible_card_ids};

/// Where a drag wants to land, expressed against the visible sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// Insert above the given card (pointer in its upper half).
    Before(String),
    /// Insert below the given card (pointer in its lower half).
    After(String),
    /// Dropped on empty grid space: append to the end of the view.
    End,
}

/// Commit a drag of `dragged` (one or more selected cards) onto `target`.
///
/// The reference sequence is the visible view under `Default` sort —
/// reordering is disabled in every other mode, so this re-derives the
/// exact sequence the user was looking at. Dragged cards keep their
/// mutual visible order; cards outside the filter keep their mutual
/// order and are renumbered after the visible block; the full card
/// collection is left stable-sorted by `order`.
///
/// Returns true when the relative order of any card actually changed.
/// A drop back onto the dragged block's own slot, an unknown target,
/// or an empty effective selection leaves the store untouched.
pub fn reorder(
    store: &mut Store,
    filter: &ViewFilter,
    dragged: &[String],
    target: &DropTarget,
) -> bool {
    let visible = visible_card_ids(store, filter, SortMode::Default);

    let dragged_set: HashSet<&str> = dragged.iter().map(String::as_str).collect();
    // Positions of the dragged cards within the view, ascending. Ids
    // hidden by the filter (or stale) simply don't participate.
    let selected_indices: Vec<usize> = visible
        .iter()
        .enumerate()
        .filter(|(_, id)| dragged_set.contains(id.as_str()))
        .map(|(i, _)| i)
        .collect();
    let (Some(&min), Some(&max)) = (selected_indices.first(), selected_indices.last()) else {
        return false;
    };

    let target_index = match target {
        DropTarget::Before(id) => match visible.iter().position(|v| v == id) {
            Some(i) => i,
            None => return false,
        },
        DropTarget::After(id) => match visible.iter().position(|v| v == id) {
            Some(i) => i + 1,
            None => return false,
        },
        DropTarget::End => visible.len(),
    };

    // A drop inside the dragged block collapses to the block's start.
    let effective = if (min..=max).contains(&target_index) {
        min
    } else {
        target_index
    };
    let dragged_before = selected_indices.iter().filter(|&&i| i < effective).count();

    let remaining: Vec<&String> = visible
        .iter()
        .filter(|id| !dragged_set.contains(id.as_str()))
        .collect();
    let adjusted = (effective - dragged_before).min(remaining.len());

    let mut new_visible: Vec<String> = Vec::with_capacity(visible.len());
    new_visible.extend(remaining[..adjusted].iter().map(|s| (*s).clone()));
    new_visible.extend(selected_indices.iter().map(|&i| visible[i].clone()));
    new_visible.extend(remaining[adjusted..].iter().map(|s| (*s).clone()));

    if new_visible == visible {
        return false;
    }

    apply_visible_order(store, filter, &new_visible);
    true
}

/// Write the given visible sequence back as order values 0..n-1, push
/// the filtered-out cards after it (stable by their prior order), and
/// stable-sort the whole collection by order.
fn apply_visible_order(store: &mut Store, filter: &ViewFilter, new_visible: &[String]) {
    for (i, id) in new_visible.iter().enumerate() {
        if let Some(card) = store.card_mut(id) {
            card.order = i as i64;
        }
    }

    let mut hidden: Vec<(String, i64)> = store
        .cards
        .iter()
        .filter(|c| !card_matches(c, filter))
        .map(|c| (c.id.clone(), c.order))
        .collect();
    hidden.sort_by_key(|(_, order)| *order);

    let base = new_visible.len() as i64;
    for (i, (id, _)) in hidden.iter().enumerate() {
        if let Some(card) = store.card_mut(id) {
            card.order = base + i as i64;
        }
    }

    store.cards.sort_by_key(|c| c.order);
}
