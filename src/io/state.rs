use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::history::{History, Snapshot};
use crate::model::{Card, Company, Folder, Scope, SortMode, Store, ViewFilter};
use crate::ops::select::Selection;

use super::StateError;

/// Default deck file in the working directory.
pub const DEFAULT_FILE: &str = "prepdeck.json";

pub const DEFAULT_FONT: &str = "default";

/// A user-supplied font carried inside the deck file so the deck stays
/// a single portable blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFont {
    pub id: String,
    pub name: String,
    pub font_family: String,
    /// Base64-encoded font bytes.
    pub data: String,
    pub mime_type: String,
}

/// On-disk layout of the deck file. Field names are camelCase, matching
/// the JSON export format the deck file interoperates with.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub deleted_cards: Vec<Card>,
    #[serde(default)]
    pub current_company: Scope,
    #[serde(default)]
    pub current_folder: Scope,
    #[serde(default)]
    pub sort_mode: SortMode,
    #[serde(default)]
    pub questions_only: bool,
    #[serde(default)]
    pub selected_cards: Vec<String>,
    #[serde(default)]
    pub history: Vec<Snapshot>,
    #[serde(default = "minus_one")]
    pub history_index: i64,
    #[serde(default = "default_font")]
    pub font_family: String,
    #[serde(default)]
    pub custom_fonts: Vec<CustomFont>,
}

fn minus_one() -> i64 {
    -1
}

fn default_font() -> String {
    DEFAULT_FONT.to_string()
}

/// Everything a running instance works on: the store plus the view,
/// selection, and undo state that persist with it.
#[derive(Debug)]
pub struct Session {
    pub path: PathBuf,
    pub store: Store,
    pub filter: ViewFilter,
    pub sort_mode: SortMode,
    pub questions_only: bool,
    pub selection: Selection,
    pub history: History,
    pub font_family: String,
    pub custom_fonts: Vec<CustomFont>,
}

impl Session {
    /// The state a fresh deck starts with: two placeholder companies and
    /// two unscoped folders, no cards.
    pub fn first_run(path: &Path) -> Self {
        let store = Store {
            companies: vec![
                Company::new("company1", "Company 1"),
                Company::new("company2", "Company 2"),
            ],
            folders: vec![
                Folder::new("folder1", "Folder 1", Scope::All),
                Folder::new("folder2", "Folder 2", Scope::All),
            ],
            ..Default::default()
        };
        Session {
            path: path.to_path_buf(),
            store,
            filter: ViewFilter::default(),
            sort_mode: SortMode::Default,
            questions_only: false,
            selection: Selection::new(),
            history: History::new(),
            font_family: DEFAULT_FONT.to_string(),
            custom_fonts: Vec::new(),
        }
    }

    /// Load the deck file, or start fresh when it is missing or does
    /// not parse. Selection entries pointing at cards that no longer
    /// exist are dropped on the way in.
    pub fn load(path: &Path) -> Self {
        let Some(persisted) = read_state(path) else {
            return Session::first_run(path);
        };

        let store = Store {
            companies: persisted.companies,
            folders: persisted.folders,
            cards: persisted.cards,
            deleted_cards: persisted.deleted_cards,
        };
        let mut selection = Selection::from_ids(persisted.selected_cards);
        selection.retain_existing(&store);

        Session {
            path: path.to_path_buf(),
            store,
            filter: ViewFilter::new(persisted.current_company, persisted.current_folder),
            sort_mode: persisted.sort_mode,
            questions_only: persisted.questions_only,
            selection,
            history: History::from_parts(persisted.history, persisted.history_index),
            font_family: persisted.font_family,
            custom_fonts: persisted.custom_fonts,
        }
    }

    /// Record the current store as an undo point. Call after every
    /// mutation, before saving.
    pub fn checkpoint(&mut self) {
        self.history.record(&self.store);
    }

    /// Write the deck file atomically.
    pub fn save(&self) -> Result<(), StateError> {
        let persisted = PersistedState {
            companies: self.store.companies.clone(),
            folders: self.store.folders.clone(),
            cards: self.store.cards.clone(),
            deleted_cards: self.store.deleted_cards.clone(),
            current_company: self.filter.company.clone(),
            current_folder: self.filter.folder.clone(),
            sort_mode: self.sort_mode,
            questions_only: self.questions_only,
            selected_cards: self.selection.to_vec(),
            history: self.history.entries().to_vec(),
            history_index: self.history.index(),
            font_family: self.font_family.clone(),
            custom_fonts: self.custom_fonts.clone(),
        };
        let content = serde_json::to_string_pretty(&persisted)?;
        atomic_write(&self.path, content.as_bytes()).map_err(|source| StateError::Write {
            path: self.path.to_path_buf(),
            source,
        })
    }
}

fn read_state(path: &Path) -> Option<PersistedState> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;
    use crate::ops::card_ops::{add_card, edit_question};

    fn deck_path(dir: &TempDir) -> PathBuf {
        dir.path().join(DEFAULT_FILE)
    }

    #[test]
    fn missing_file_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let session = Session::load(&deck_path(&dir));
        assert_eq!(session.store.companies.len(), 2);
        assert_eq!(session.store.folders.len(), 2);
        assert!(session.store.cards.is_empty());
        assert_eq!(session.filter, ViewFilter::default());
        assert_eq!(session.history.index(), -1);
    }

    #[test]
    fn malformed_file_starts_fresh() {
        let dir = TempDir::new().unwrap();
        let path = deck_path(&dir);
        fs::write(&path, "not json {{{").unwrap();
        let session = Session::load(&path);
        assert!(session.store.cards.is_empty());
        assert_eq!(session.store.companies.len(), 2);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::first_run(&deck_path(&dir));

        let id = add_card(&mut session.store, &session.filter).unwrap();
        edit_question(&mut session.store, &id, "What is ownership?");
        session.checkpoint();
        session.filter.company = Scope::id("company2");
        session.sort_mode = SortMode::Length;
        session.questions_only = true;
        session.selection = Selection::from_ids([id.clone()]);
        session.save().unwrap();

        let loaded = Session::load(&session.path);
        assert_eq!(loaded.store.cards.len(), 1);
        assert_eq!(loaded.store.cards[0].question, "What is ownership?");
        assert_eq!(loaded.filter.company, Scope::id("company2"));
        assert_eq!(loaded.sort_mode, SortMode::Length);
        assert!(loaded.questions_only);
        assert!(loaded.selection.contains(&id));
        assert_eq!(loaded.history.len(), 1);
        assert_eq!(loaded.history.index(), 0);
    }

    #[test]
    fn stale_selection_is_dropped_on_load() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::first_run(&deck_path(&dir));
        session.selection = Selection::from_ids(["ghost".to_string()]);
        session.save().unwrap();

        let loaded = Session::load(&session.path);
        assert!(loaded.selection.is_empty());
    }

    #[test]
    fn scope_round_trips_through_json() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::first_run(&deck_path(&dir));
        session.filter = ViewFilter::new(Scope::id("company1"), Scope::All);
        session.save().unwrap();

        let raw = fs::read_to_string(&session.path).unwrap();
        // Scopes serialize as the raw id or the "all" sentinel.
        assert!(raw.contains("\"currentCompany\": \"company1\""));
        assert!(raw.contains("\"currentFolder\": \"all\""));

        let loaded = Session::load(&session.path);
        assert_eq!(loaded.filter.company, Scope::id("company1"));
        assert_eq!(loaded.filter.folder, Scope::All);
    }

    #[test]
    fn folder_without_company_scope_defaults_to_all() {
        let dir = TempDir::new().unwrap();
        let path = deck_path(&dir);
        fs::write(
            &path,
            r#"{"companies":[{"id":"c1","name":"Acme"}],
                "folders":[{"id":"f1","name":"Basics"}]}"#,
        )
        .unwrap();
        let session = Session::load(&path);
        assert_eq!(session.store.folders[0].company_id, Scope::All);
    }

    #[test]
    fn history_survives_persistence() {
        let dir = TempDir::new().unwrap();
        let mut session = Session::first_run(&deck_path(&dir));

        add_card(&mut session.store, &session.filter).unwrap();
        session.checkpoint();
        add_card(&mut session.store, &session.filter).unwrap();
        session.checkpoint();
        session.save().unwrap();

        let mut loaded = Session::load(&session.path);
        assert!(loaded.history.can_undo());
        assert!(loaded.history.undo(&mut loaded.store));
        assert_eq!(loaded.store.cards.len(), 1);
    }

    #[test]
    fn atomic_write_replaces_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        atomic_write(&path, b"old").unwrap();
        atomic_write(&path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }
}
