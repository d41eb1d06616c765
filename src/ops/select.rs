use indexmap::IndexSet;

use crate::model::Store;

/// Modifier keys active during a card click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickMods {
    pub shift: bool,
    /// Ctrl, or Cmd on macOS.
    pub ctrl: bool,
}

impl ClickMods {
    pub const NONE: ClickMods = ClickMods {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: ClickMods = ClickMods {
        shift: true,
        ctrl: false,
    };
    pub const CTRL: ClickMods = ClickMods {
        shift: false,
        ctrl: true,
    };
}

/// The set of selected card ids, in selection order.
///
/// Insertion order matters: a shift-click ranges from the most recently
/// selected card, which is simply the last id in the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    cards: IndexSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Selection::default()
    }

    pub fn from_ids(ids: impl IntoIterator<Item = String>) -> Self {
        Selection {
            cards: ids.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cards.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.cards.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// Inline question/answer editing is disabled the moment anything is
    /// selected — clicks on text areas become selection toggles instead.
    pub fn editing_enabled(&self) -> bool {
        self.cards.is_empty()
    }

    /// Apply a click on `card_id` with the given modifiers. `visible` is
    /// the render-time sequence, which anchors shift ranges.
    pub fn click(&mut self, card_id: &str, mods: ClickMods, visible: &[String]) {
        if mods.shift {
            self.range_click(card_id, visible);
        } else if mods.ctrl {
            // Toggle just this card, leaving the rest alone.
            if !self.cards.shift_remove(card_id) {
                self.cards.insert(card_id.to_string());
            }
        } else if self.cards.contains(card_id) {
            // Plain click on a selected card: a lone selection clears
            // entirely, a multi selection sheds only this card.
            if self.cards.len() == 1 {
                self.cards.clear();
            } else {
                self.cards.shift_remove(card_id);
            }
        } else {
            // Plain click replaces whatever was selected.
            self.cards.clear();
            self.cards.insert(card_id.to_string());
        }
    }

    /// Shift-click: add the inclusive range between the last-selected
    /// card and the clicked one. Degrades to a single select when there
    /// is no usable anchor.
    fn range_click(&mut self, card_id: &str, visible: &[String]) {
        let clicked = visible.iter().position(|id| id == card_id);
        let anchor = self
            .cards
            .last()
            .and_then(|last| visible.iter().position(|id| id == last));

        match (clicked, anchor) {
            (Some(to), Some(from)) => {
                let (start, end) = if from <= to { (from, to) } else { (to, from) };
                for id in &visible[start..=end] {
                    self.cards.insert(id.clone());
                }
            }
            _ => {
                self.cards.insert(card_id.to_string());
            }
        }
    }

    /// Select every visible card, replacing the current selection.
    pub fn select_all(&mut self, visible: &[String]) {
        self.cards.clear();
        for id in visible {
            self.cards.insert(id.clone());
        }
    }

    /// Drop ids that no longer refer to an active card (after deletes,
    /// undo, cascades).
    pub fn retain_existing(&mut self, store: &Store) {
        self.cards.retain(|id| store.card(id).is_some());
    }
}
