use rand::rng;
use rand::seq::SliceRandom;

use crate::model::{Card, SortMode, Store, ViewFilter};

/// Derive the currently visible, ordered card sequence.
///
/// This is the single source of truth for on-screen positions: the
/// reorder engine re-runs it (under `Default`) to agree with the render
/// path on indices. Pure for every mode except `Random`, which shuffles
/// fresh on each call by design.
pub fn visible_cards(store: &Store, filter: &ViewFilter, mode: SortMode) -> Vec<Card> {
    let mut cards: Vec<Card> = store
        .cards
        .iter()
        .filter(|c| card_matches(c, filter))
        .cloned()
        .collect();

    match mode {
        SortMode::Default => sort_default(&mut cards),
        SortMode::Alphabetical => {
            // Hangul syllables are laid out in dictionary order in
            // Unicode, so a plain code-point compare on the trimmed
            // question reproduces the natural ordering.
            cards.sort_by(|a, b| a.question.trim().cmp(b.question.trim()));
        }
        SortMode::Random => cards.shuffle(&mut rng()),
        SortMode::Length => cards.sort_by_key(|c| c.text_len()),
    }
    cards
}

/// Visible card ids only; convenient for selection and reorder math.
pub fn visible_card_ids(store: &Store, filter: &ViewFilter, mode: SortMode) -> Vec<String> {
    visible_cards(store, filter, mode)
        .into_iter()
        .map(|c| c.id)
        .collect()
}

/// Pinned first (stable), then ascending manual order. Stable sort keeps
/// array position as the tiebreak for duplicate order values.
pub fn sort_default(cards: &mut [Card]) {
    cards.sort_by(|a, b| b.pinned.cmp(&a.pinned).then(a.order.cmp(&b.order)));
}

pub fn card_matches(card: &Card, filter: &ViewFilter) -> bool {
    let company_ok = filter.company.matches(&card.company_id);
    // A specific folder filter wants exact membership: an unfiled card
    // (`folder_id = All`) only shows under the all-folders view.
    let folder_ok = match &filter.folder {
        crate::model::Scope::All => true,
        crate::model::Scope::Id(want) => card.folder_id.as_id() == Some(want.as_str()),
    };
    company_ok && folder_ok
}
