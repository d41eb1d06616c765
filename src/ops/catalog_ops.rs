use crate::model::{Company, Folder, Scope, Store, ViewFilter};
use crate::util::ids::generate_id;

use super::card_ops::delete_cards;

pub const NEW_COMPANY_NAME: &str = "New company";
pub const COPY_SUFFIX: &str = " (copy)";

/// Create a company with a placeholder name, ready for an inline
/// rename. Returns the new id.
pub fn add_company(store: &mut Store) -> String {
    let company = Company::new(generate_id(), NEW_COMPANY_NAME);
    let id = company.id.clone();
    store.companies.push(company);
    id
}

/// Rename a company. An empty trimmed name deletes the company instead,
/// cascading its cards to the trash; this is how cancelling the inline
/// rename of a fresh company cleans it up. Returns false when nothing
/// matched.
pub fn rename_company(store: &mut Store, id: &str, name: &str, filter: &mut ViewFilter) -> bool {
    let name = name.trim();
    if name.is_empty() {
        return delete_company(store, id, filter);
    }
    match store.company_mut(id) {
        Some(company) => {
            company.name = name.to_string();
            true
        }
        None => false,
    }
}

/// Delete a company: its cards (whole company, every folder) go to the
/// trash, and a filter pointing at it resets to `All`. Folders are
/// shared across companies and stay; one scoped to the dead company
/// simply never shows again.
pub fn delete_company(store: &mut Store, id: &str, filter: &mut ViewFilter) -> bool {
    let before = store.companies.len();
    store.companies.retain(|c| c.id != id);
    if store.companies.len() == before {
        return false;
    }

    let doomed: Vec<String> = store
        .cards
        .iter()
        .filter(|c| c.company_id == id)
        .map(|c| c.id.clone())
        .collect();
    delete_cards(store, &doomed);

    if filter.company.as_id() == Some(id) {
        filter.company = Scope::All;
        filter.folder = Scope::All;
    }
    true
}

/// Clone a company and all of its cards. Copies keep their folder and
/// order values, so the duplicate reads in the same arrangement; fresh
/// ids keep the two sets independent. Returns the new company's id.
pub fn duplicate_company(store: &mut Store, id: &str) -> Option<String> {
    let source = store.company(id)?;
    let copy = Company::new(generate_id(), format!("{}{COPY_SUFFIX}", source.name));
    let copy_id = copy.id.clone();
    store.companies.push(copy);

    let mut clones = Vec::new();
    for card in store.cards.iter().filter(|c| c.company_id == id) {
        let mut clone = card.clone();
        clone.id = generate_id();
        clone.company_id = copy_id.clone();
        clones.push(clone);
    }
    store.cards.extend(clones);
    Some(copy_id)
}

/// Create a folder under the filter's current company (or unscoped when
/// viewing `All`), with an empty name pending an inline rename.
pub fn add_folder(store: &mut Store, filter: &ViewFilter) -> String {
    let folder = Folder::new(generate_id(), "", filter.company.clone());
    let id = folder.id.clone();
    store.folders.push(folder);
    id
}

/// Rename a folder; empty trimmed name deletes it instead (same rule as
/// [`rename_company`]).
pub fn rename_folder(store: &mut Store, id: &str, name: &str, filter: &mut ViewFilter) -> bool {
    let name = name.trim();
    if name.is_empty() {
        return delete_folder(store, id, filter);
    }
    match store.folder_mut(id) {
        Some(folder) => {
            folder.name = name.to_string();
            true
        }
        None => false,
    }
}

/// Delete a folder: its cards go to the trash, and a filter pointing at
/// it falls back to the company's `All` view.
pub fn delete_folder(store: &mut Store, id: &str, filter: &mut ViewFilter) -> bool {
    let before = store.folders.len();
    store.folders.retain(|f| f.id != id);
    if store.folders.len() == before {
        return false;
    }

    let doomed: Vec<String> = store
        .cards
        .iter()
        .filter(|c| c.folder_id.as_id() == Some(id))
        .map(|c| c.id.clone())
        .collect();
    delete_cards(store, &doomed);

    if filter.folder.as_id() == Some(id) {
        filter.folder = Scope::All;
    }
    true
}
