use serde::{Deserialize, Serialize};

use super::card::Card;
use super::catalog::{Company, Folder};
use super::filter::Scope;

/// All entities, in memory. Active cards and trashed cards are disjoint;
/// soft delete moves cards from `cards` to `deleted_cards` and restore
/// moves them back (appended, original `order` retained).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub companies: Vec<Company>,
    pub folders: Vec<Folder>,
    pub cards: Vec<Card>,
    pub deleted_cards: Vec<Card>,
}

impl Store {
    pub fn company(&self, id: &str) -> Option<&Company> {
        self.companies.iter().find(|c| c.id == id)
    }

    pub fn company_mut(&mut self, id: &str) -> Option<&mut Company> {
        self.companies.iter_mut().find(|c| c.id == id)
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn folder_mut(&mut self, id: &str) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| f.id == id)
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: &str) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    pub fn deleted_card(&self, id: &str) -> Option<&Card> {
        self.deleted_cards.iter().find(|c| c.id == id)
    }

    /// The order value for a newly appended card: max existing + 1, or 0.
    pub fn next_order(&self) -> i64 {
        self.cards.iter().map(|c| c.order).max().map_or(0, |m| m + 1)
    }

    /// Folders listed under the given company filter, in stored order.
    pub fn visible_folders(&self, company: &Scope) -> Vec<&Folder> {
        self.folders
            .iter()
            .filter(|f| f.visible_under(company))
            .collect()
    }

    /// Number of active cards filed in exactly this folder, restricted
    /// by company filter. Unfiled cards count toward no folder.
    pub fn folder_card_count(&self, company: &Scope, folder_id: &str) -> usize {
        self.cards
            .iter()
            .filter(|c| {
                company.matches(&c.company_id) && c.folder_id.as_id() == Some(folder_id)
            })
            .count()
    }
}
