use crate::model::{SortMode, Store, ViewFilter};

use super::view::visible_cards;

/// Render the current view as plain text, in the order the user sees
/// it. `questions_only` emits one question per paragraph; the full form
/// interleaves answers. Cards with no question still export (as a blank
/// line) so positions stay recognizable.
pub fn export_text(
    store: &Store,
    filter: &ViewFilter,
    mode: SortMode,
    questions_only: bool,
) -> String {
    let cards = visible_cards(store, filter, mode);
    let mut out = String::new();
    for card in &cards {
        out.push_str(card.question.trim());
        out.push('\n');
        if !questions_only {
            out.push_str(card.answer.trim());
            out.push('\n');
        }
        out.push('\n');
    }
    out
}
