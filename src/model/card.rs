use serde::{Deserialize, Serialize};

use super::filter::Scope;

/// A single question/answer flashcard.
///
/// Field names in the persisted blob are camelCase.
/// `order` is a dense-ish integer used by the default sort; uniqueness is
/// not enforced — ties break by array position under stable sort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    /// Always a concrete company id — cards never use the `all` sentinel.
    pub company_id: String,
    /// A folder id, or `All` for cards not filed anywhere.
    #[serde(default)]
    pub folder_id: Scope,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub order: i64,
}

impl Card {
    pub fn new(id: String, company_id: String, folder_id: Scope, order: i64) -> Self {
        Card {
            id,
            company_id,
            folder_id,
            question: String::new(),
            answer: String::new(),
            pinned: false,
            order,
        }
    }

    /// Combined question + answer length, used by the length sort.
    pub fn text_len(&self) -> usize {
        self.question.chars().count() + self.answer.chars().count()
    }

    /// True when the card has something to practice.
    pub fn has_question(&self) -> bool {
        !self.question.trim().is_empty()
    }
}
