use crate::model::{Card, Scope, Store, ViewFilter};
use crate::util::ids::generate_id;

use super::OpError;

/// Trim leading/trailing whitespace and newlines, keeping interior
/// line breaks.
fn clean_text(text: &str) -> String {
    text.trim().to_string()
}

/// The company a new card lands in: the active filter's company, or the
/// first company when the filter is `All`.
fn target_company(store: &Store, filter: &ViewFilter) -> Result<String, OpError> {
    match &filter.company {
        Scope::Id(id) => Ok(id.clone()),
        Scope::All => store
            .companies
            .first()
            .map(|c| c.id.clone())
            .ok_or(OpError::NoCompanies),
    }
}

/// Add a single empty card at the end of the manual order.
/// Returns the new card's id.
pub fn add_card(store: &mut Store, filter: &ViewFilter) -> Result<String, OpError> {
    let company_id = target_company(store, filter)?;
    let card = Card::new(
        generate_id(),
        company_id,
        filter.folder.clone(),
        store.next_order(),
    );
    let id = card.id.clone();
    store.cards.push(card);
    Ok(id)
}

/// Add one card per non-blank line of `text`, questions pre-trimmed.
/// Returns the new ids, or `EmptyBatch` when nothing usable was given.
pub fn batch_add(store: &mut Store, filter: &ViewFilter, text: &str) -> Result<Vec<String>, OpError> {
    let questions: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if questions.is_empty() {
        return Err(OpError::EmptyBatch);
    }

    let company_id = target_company(store, filter)?;
    let base = store.next_order();
    let mut ids = Vec::with_capacity(questions.len());
    for (i, question) in questions.iter().enumerate() {
        let mut card = Card::new(
            generate_id(),
            company_id.clone(),
            filter.folder.clone(),
            base + i as i64,
        );
        card.question = (*question).to_string();
        ids.push(card.id.clone());
        store.cards.push(card);
    }
    Ok(ids)
}

/// Set a card's question text. Missing card is a silent no-op.
pub fn edit_question(store: &mut Store, card_id: &str, text: &str) -> bool {
    match store.card_mut(card_id) {
        Some(card) => {
            card.question = clean_text(text);
            true
        }
        None => false,
    }
}

/// Set a card's answer text. Missing card is a silent no-op.
pub fn edit_answer(store: &mut Store, card_id: &str, text: &str) -> bool {
    match store.card_mut(card_id) {
        Some(card) => {
            card.answer = clean_text(text);
            true
        }
        None => false,
    }
}

pub fn toggle_pin(store: &mut Store, card_id: &str) -> bool {
    match store.card_mut(card_id) {
        Some(card) => {
            card.pinned = !card.pinned;
            true
        }
        None => false,
    }
}

/// File a card under a folder (or `All`). Unknown folder ids no-op.
pub fn move_to_folder(store: &mut Store, card_id: &str, folder: Scope) -> bool {
    if let Scope::Id(id) = &folder
        && store.folder(id).is_none()
    {
        return false;
    }
    match store.card_mut(card_id) {
        Some(card) => {
            card.folder_id = folder;
            true
        }
        None => false,
    }
}

/// Clone a card into another company, appended at the end of the manual
/// order. Copying into the card's own company is rejected upstream; here
/// it simply no-ops, as do unknown ids.
pub fn copy_to_company(store: &mut Store, card_id: &str, company_id: &str) -> Option<String> {
    store.company(company_id)?;
    let source = store.card(card_id)?;
    if source.company_id == company_id {
        return None;
    }
    let mut copy = source.clone();
    copy.id = generate_id();
    copy.company_id = company_id.to_string();
    copy.order = store.next_order();
    let id = copy.id.clone();
    store.cards.push(copy);
    Some(id)
}

/// Soft-delete: move the given cards to the trash, preserving their
/// stored order. Returns how many were moved.
pub fn delete_cards(store: &mut Store, ids: &[String]) -> usize {
    let (trashed, kept): (Vec<Card>, Vec<Card>) = store
        .cards
        .drain(..)
        .partition(|c| ids.iter().any(|id| id == &c.id));
    let moved = trashed.len();
    store.deleted_cards.extend(trashed);
    store.cards = kept;
    moved
}

/// Move a card back out of the trash, appended to the active set with
/// its original order value. A colliding order resolves by stable sort
/// on the next reorder.
pub fn restore_card(store: &mut Store, card_id: &str) -> bool {
    let Some(pos) = store.deleted_cards.iter().position(|c| c.id == card_id) else {
        return false;
    };
    let card = store.deleted_cards.remove(pos);
    store.cards.push(card);
    true
}

/// Remove a card from the trash for good.
pub fn purge_card(store: &mut Store, card_id: &str) -> bool {
    let before = store.deleted_cards.len();
    store.deleted_cards.retain(|c| c.id != card_id);
    store.deleted_cards.len() != before
}

/// Empty the trash. Returns how many cards were discarded.
pub fn empty_trash(store: &mut Store) -> usize {
    let n = store.deleted_cards.len();
    store.deleted_cards.clear();
    n
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{Company, Folder};

    fn sample_store() -> Store {
        Store {
            companies: vec![Company::new("c1", "Acme"), Company::new("c2", "Initech")],
            folders: vec![Folder::new("f1", "Basics", Scope::All)],
            ..Default::default()
        }
    }

    #[test]
    fn add_card_under_all_uses_first_company() {
        let mut store = sample_store();
        let id = add_card(&mut store, &ViewFilter::default()).unwrap();
        let card = store.card(&id).unwrap();
        assert_eq!(card.company_id, "c1");
        assert_eq!(card.folder_id, Scope::All);
        assert_eq!(card.order, 0);
    }

    #[test]
    fn add_card_inherits_active_filter() {
        let mut store = sample_store();
        let filter = ViewFilter::new(Scope::id("c2"), Scope::id("f1"));
        let id = add_card(&mut store, &filter).unwrap();
        let card = store.card(&id).unwrap();
        assert_eq!(card.company_id, "c2");
        assert_eq!(card.folder_id, Scope::id("f1"));
    }

    #[test]
    fn add_card_without_companies_fails() {
        let mut store = Store::default();
        assert!(matches!(
            add_card(&mut store, &ViewFilter::default()),
            Err(OpError::NoCompanies)
        ));
    }

    #[test]
    fn batch_add_skips_blank_lines() {
        let mut store = sample_store();
        let ids = batch_add(
            &mut store,
            &ViewFilter::default(),
            "  What is Rust?  \n\n   \nWhy borrowck?\n",
        )
        .unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(store.cards[0].question, "What is Rust?");
        assert_eq!(store.cards[1].question, "Why borrowck?");
        assert_eq!(store.cards[0].order, 0);
        assert_eq!(store.cards[1].order, 1);
    }

    #[test]
    fn batch_add_rejects_empty_input() {
        let mut store = sample_store();
        assert!(matches!(
            batch_add(&mut store, &ViewFilter::default(), "  \n \n"),
            Err(OpError::EmptyBatch)
        ));
        assert!(store.cards.is_empty());
    }

    #[test]
    fn batch_add_orders_continue_from_max() {
        let mut store = sample_store();
        store.cards.push(Card::new("x".into(), "c1".into(), Scope::All, 9));
        let ids = batch_add(&mut store, &ViewFilter::default(), "a\nb").unwrap();
        assert_eq!(store.card(&ids[0]).unwrap().order, 10);
        assert_eq!(store.card(&ids[1]).unwrap().order, 11);
    }

    #[test]
    fn edit_trims_outer_whitespace_only() {
        let mut store = sample_store();
        let id = add_card(&mut store, &ViewFilter::default()).unwrap();
        assert!(edit_question(&mut store, &id, "  line one\nline two \n"));
        assert_eq!(store.card(&id).unwrap().question, "line one\nline two");
        assert!(!edit_question(&mut store, "missing", "x"));
    }

    #[test]
    fn toggle_pin_flips() {
        let mut store = sample_store();
        let id = add_card(&mut store, &ViewFilter::default()).unwrap();
        assert!(toggle_pin(&mut store, &id));
        assert!(store.card(&id).unwrap().pinned);
        assert!(toggle_pin(&mut store, &id));
        assert!(!store.card(&id).unwrap().pinned);
    }

    #[test]
    fn move_to_unknown_folder_noops() {
        let mut store = sample_store();
        let id = add_card(&mut store, &ViewFilter::default()).unwrap();
        assert!(!move_to_folder(&mut store, &id, Scope::id("ghost")));
        assert_eq!(store.card(&id).unwrap().folder_id, Scope::All);
        assert!(move_to_folder(&mut store, &id, Scope::id("f1")));
        assert_eq!(store.card(&id).unwrap().folder_id, Scope::id("f1"));
    }

    #[test]
    fn copy_to_company_clones_with_fresh_id() {
        let mut store = sample_store();
        let id = add_card(&mut store, &ViewFilter::default()).unwrap();
        edit_question(&mut store, &id, "q");
        let copy_id = copy_to_company(&mut store, &id, "c2").unwrap();
        assert_ne!(copy_id, id);
        let copy = store.card(&copy_id).unwrap();
        assert_eq!(copy.company_id, "c2");
        assert_eq!(copy.question, "q");
        assert_eq!(copy.order, 1);
    }

    #[test]
    fn copy_to_same_company_noops() {
        let mut store = sample_store();
        let id = add_card(&mut store, &ViewFilter::default()).unwrap();
        assert!(copy_to_company(&mut store, &id, "c1").is_none());
        assert_eq!(store.cards.len(), 1);
    }

    #[test]
    fn delete_and_restore_round_trip() {
        let mut store = sample_store();
        let a = add_card(&mut store, &ViewFilter::default()).unwrap();
        let b = add_card(&mut store, &ViewFilter::default()).unwrap();

        assert_eq!(delete_cards(&mut store, &[a.clone()]), 1);
        assert!(store.card(&a).is_none());
        assert!(store.deleted_card(&a).is_some());
        assert!(store.card(&b).is_some());

        assert!(restore_card(&mut store, &a));
        assert!(store.deleted_card(&a).is_none());
        // Restored card is appended with its original order intact.
        assert_eq!(store.cards.last().unwrap().id, a);
        assert_eq!(store.cards.last().unwrap().order, 0);
    }

    #[test]
    fn purge_and_empty_trash() {
        let mut store = sample_store();
        let a = add_card(&mut store, &ViewFilter::default()).unwrap();
        let b = add_card(&mut store, &ViewFilter::default()).unwrap();
        delete_cards(&mut store, &[a.clone(), b.clone()]);

        assert!(purge_card(&mut store, &a));
        assert!(!purge_card(&mut store, &a));
        assert_eq!(store.deleted_cards.len(), 1);

        assert_eq!(empty_trash(&mut store), 1);
        assert!(store.deleted_cards.is_empty());
    }
}
