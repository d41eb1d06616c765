use std::fs;
use std::io::Read;
use std::path::PathBuf;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::state::{Session, DEFAULT_FILE};
use crate::model::{Scope, SortMode, Store, ViewFilter};
use crate::ops::reorder::{reorder, DropTarget};
use crate::ops::view::{visible_card_ids, visible_cards};
use crate::ops::{card_ops, catalog_ops, export, practice};

type CliResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CliResult {
    let json = cli.json;
    let path = deck_path(cli.file.as_deref());

    match cli.command {
        None => unreachable!("main launches the TUI for the bare command"),
        Some(cmd) => match cmd {
            // Read commands
            Commands::List(args) => cmd_list(&path, args, json),
            Commands::Trash(args) if matches!(args.action, TrashAction::List) => {
                cmd_trash_list(&path, json)
            }

            // Write commands
            Commands::Add(args) => cmd_add(&path, args),
            Commands::Batch(args) => cmd_batch(&path, args),
            Commands::Edit(args) => cmd_edit(&path, args),
            Commands::Pin(args) => cmd_pin(&path, args),
            Commands::Mv(args) => cmd_mv(&path, args),
            Commands::Rm(args) => cmd_rm(&path, args),
            Commands::Trash(args) => cmd_trash(&path, args),
            Commands::Company(args) => cmd_company(&path, args, json),
            Commands::Folder(args) => cmd_folder(&path, args, json),
            Commands::Use(args) => cmd_use(&path, args),
            Commands::Sort(args) => cmd_sort(&path, args),
            Commands::Undo => cmd_undo(&path),
            Commands::Redo => cmd_redo(&path),
            Commands::Export(args) => cmd_export(&path, args),
            Commands::Practice(args) => cmd_practice(&path, args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn deck_path(file: Option<&str>) -> PathBuf {
    file.map(PathBuf::from).unwrap_or_else(|| PathBuf::from(DEFAULT_FILE))
}

/// Map a 1-based view position to a card id.
fn card_at(session: &Session, position: usize) -> Result<String, String> {
    let visible = visible_card_ids(&session.store, &session.filter, session.sort_mode);
    position
        .checked_sub(1)
        .and_then(|i| visible.get(i).cloned())
        .ok_or_else(|| format!("no card at position {}", position))
}

fn cards_at(session: &Session, positions: &[usize]) -> Result<Vec<String>, String> {
    positions.iter().map(|&p| card_at(session, p)).collect()
}

/// Resolve a company by id first, then by exact name.
fn resolve_company(store: &Store, who: &str) -> Result<String, String> {
    if let Some(c) = store.company(who) {
        return Ok(c.id.clone());
    }
    let mut matches = store.companies.iter().filter(|c| c.name == who);
    match (matches.next(), matches.next()) {
        (Some(c), None) => Ok(c.id.clone()),
        (Some(_), Some(_)) => Err(format!("company name '{}' is ambiguous; use the id", who)),
        (None, _) => Err(format!("no company '{}'", who)),
    }
}

fn resolve_folder(store: &Store, who: &str) -> Result<String, String> {
    if let Some(f) = store.folder(who) {
        return Ok(f.id.clone());
    }
    let mut matches = store.folders.iter().filter(|f| f.name == who);
    match (matches.next(), matches.next()) {
        (Some(f), None) => Ok(f.id.clone()),
        (Some(_), Some(_)) => Err(format!("folder name '{}' is ambiguous; use the id", who)),
        (None, _) => Err(format!("no folder '{}'", who)),
    }
}

/// Checkpoint + save after a successful mutation.
fn commit(session: &mut Session) -> CliResult {
    session.checkpoint();
    session.save()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(path: &PathBuf, args: ListArgs, json: bool) -> CliResult {
    let session = Session::load(path);
    let cards = visible_cards(&session.store, &session.filter, session.sort_mode);
    let questions_only = args.questions_only || session.questions_only;

    if json {
        let rows: Vec<CardJson> = cards
            .iter()
            .enumerate()
            .map(|(i, card)| {
                let company = session
                    .store
                    .company(&card.company_id)
                    .map(|c| c.name.as_str())
                    .unwrap_or("?");
                let folder = scope_name(
                    &card.folder_id,
                    card.folder_id
                        .as_id()
                        .and_then(|id| session.store.folder(id))
                        .map(|f| f.name.as_str()),
                );
                CardJson::new(i + 1, card, company, &folder)
            })
            .collect();
        print_json(&rows);
        return Ok(());
    }

    if cards.is_empty() {
        println!("no cards in this view");
        return Ok(());
    }
    let company = scope_name(
        &session.filter.company,
        session
            .filter
            .company
            .as_id()
            .and_then(|id| session.store.company(id))
            .map(|c| c.name.as_str()),
    );
    let folder = scope_name(
        &session.filter.folder,
        session
            .filter
            .folder
            .as_id()
            .and_then(|id| session.store.folder(id))
            .map(|f| f.name.as_str()),
    );
    println!(
        "{} cards  (company: {}, folder: {}, sort: {})",
        cards.len(),
        company,
        folder,
        session.sort_mode.label()
    );
    for (i, card) in cards.iter().enumerate() {
        println!("{}", card_line(i + 1, card, questions_only));
    }
    Ok(())
}

fn cmd_trash_list(path: &PathBuf, json: bool) -> CliResult {
    let session = Session::load(path);
    if json {
        let rows: Vec<CardJson> = session
            .store
            .deleted_cards
            .iter()
            .enumerate()
            .map(|(i, card)| {
                let company = session
                    .store
                    .company(&card.company_id)
                    .map(|c| c.name.as_str())
                    .unwrap_or("?");
                CardJson::new(i + 1, card, company, "")
            })
            .collect();
        print_json(&rows);
        return Ok(());
    }
    if session.store.deleted_cards.is_empty() {
        println!("trash is empty");
        return Ok(());
    }
    for (i, card) in session.store.deleted_cards.iter().enumerate() {
        println!("{}", card_line(i + 1, card, true));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Card write handlers
// ---------------------------------------------------------------------------

fn cmd_add(path: &PathBuf, args: AddArgs) -> CliResult {
    let mut session = Session::load(path);
    let id = card_ops::add_card(&mut session.store, &session.filter)?;
    if let Some(q) = args.question.as_deref() {
        card_ops::edit_question(&mut session.store, &id, q);
    }
    if let Some(a) = args.answer.as_deref() {
        card_ops::edit_answer(&mut session.store, &id, a);
    }
    commit(&mut session)?;
    let visible = visible_card_ids(&session.store, &session.filter, session.sort_mode);
    match visible.iter().position(|v| v == &id) {
        Some(i) => println!("added card at position {}", i + 1),
        None => println!("added card (outside the current view)"),
    }
    Ok(())
}

fn cmd_batch(path: &PathBuf, args: BatchArgs) -> CliResult {
    let text = if args.path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&args.path)?
    };
    let mut session = Session::load(path);
    let ids = card_ops::batch_add(&mut session.store, &session.filter, &text)?;
    commit(&mut session)?;
    println!("added {} cards", ids.len());
    Ok(())
}

fn cmd_edit(path: &PathBuf, args: EditArgs) -> CliResult {
    if args.question.is_none() && args.answer.is_none() {
        return Err("nothing to change; pass --question and/or --answer".into());
    }
    let mut session = Session::load(path);
    let id = card_at(&session, args.position)?;
    if let Some(q) = args.question.as_deref() {
        card_ops::edit_question(&mut session.store, &id, q);
    }
    if let Some(a) = args.answer.as_deref() {
        card_ops::edit_answer(&mut session.store, &id, a);
    }
    commit(&mut session)?;
    println!("updated card {}", args.position);
    Ok(())
}

fn cmd_pin(path: &PathBuf, args: PinArgs) -> CliResult {
    let mut session = Session::load(path);
    let id = card_at(&session, args.position)?;
    card_ops::toggle_pin(&mut session.store, &id);
    commit(&mut session)?;
    let pinned = session.store.card(&id).is_some_and(|c| c.pinned);
    println!(
        "card {} {}",
        args.position,
        if pinned { "pinned" } else { "unpinned" }
    );
    Ok(())
}

fn cmd_mv(path: &PathBuf, args: MvArgs) -> CliResult {
    let mut session = Session::load(path);
    if !session.sort_mode.allows_reorder() {
        return Err(format!(
            "manual reordering needs the default sort (currently: {})",
            session.sort_mode.label()
        )
        .into());
    }

    let dragged = cards_at(&session, &args.positions)?;
    let target = if args.end {
        DropTarget::End
    } else if let Some(p) = args.before {
        DropTarget::Before(card_at(&session, p)?)
    } else if let Some(p) = args.after {
        DropTarget::After(card_at(&session, p)?)
    } else {
        return Err("pass one of --before, --after, --end".into());
    };

    if reorder(&mut session.store, &session.filter, &dragged, &target) {
        commit(&mut session)?;
        println!("moved {} cards", dragged.len());
    } else {
        println!("no change");
    }
    Ok(())
}

fn cmd_rm(path: &PathBuf, args: RmArgs) -> CliResult {
    let mut session = Session::load(path);
    let ids = cards_at(&session, &args.positions)?;
    let moved = card_ops::delete_cards(&mut session.store, &ids);
    session.selection.retain_existing(&session.store);
    commit(&mut session)?;
    println!("moved {} cards to the trash", moved);
    Ok(())
}

fn cmd_trash(path: &PathBuf, args: TrashCmd) -> CliResult {
    let mut session = Session::load(path);
    match args.action {
        TrashAction::List => unreachable!("handled in dispatch"),
        TrashAction::Restore { position } => {
            let card = session
                .store
                .deleted_cards
                .get(position.wrapping_sub(1))
                .ok_or_else(|| format!("no trashed card at position {}", position))?;
            let id = card.id.clone();
            card_ops::restore_card(&mut session.store, &id);
            commit(&mut session)?;
            println!("restored card");
        }
        TrashAction::Rm { position } => {
            let card = session
                .store
                .deleted_cards
                .get(position.wrapping_sub(1))
                .ok_or_else(|| format!("no trashed card at position {}", position))?;
            let id = card.id.clone();
            card_ops::purge_card(&mut session.store, &id);
            // Trash is outside undo history; save without a checkpoint.
            session.save()?;
            println!("deleted permanently");
        }
        TrashAction::Empty => {
            let n = card_ops::empty_trash(&mut session.store);
            session.save()?;
            println!("emptied the trash ({} cards)", n);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Company and folder handlers
// ---------------------------------------------------------------------------

fn cmd_company(path: &PathBuf, args: CompanyCmd, json: bool) -> CliResult {
    let mut session = Session::load(path);
    match args.action {
        CompanyAction::List => {
            if json {
                let rows: Vec<CompanyJson> = session
                    .store
                    .companies
                    .iter()
                    .map(|c| CompanyJson {
                        id: c.id.clone(),
                        name: c.name.clone(),
                        cards: session
                            .store
                            .cards
                            .iter()
                            .filter(|card| card.company_id == c.id)
                            .count(),
                    })
                    .collect();
                print_json(&rows);
                return Ok(());
            }
            for company in &session.store.companies {
                let cards = session
                    .store
                    .cards
                    .iter()
                    .filter(|card| card.company_id == company.id)
                    .count();
                let current = session.filter.company.matches(&company.id)
                    && !session.filter.company.is_all();
                println!("{}", company_line(company, cards, current));
            }
            return Ok(());
        }
        CompanyAction::Add { name } => {
            let id = catalog_ops::add_company(&mut session.store);
            catalog_ops::rename_company(&mut session.store, &id, &name, &mut session.filter);
            commit(&mut session)?;
            println!("added company {}", id);
        }
        CompanyAction::Rename { who, name } => {
            let id = resolve_company(&session.store, &who)?;
            catalog_ops::rename_company(&mut session.store, &id, &name, &mut session.filter);
            commit(&mut session)?;
            println!("renamed company");
        }
        CompanyAction::Rm { who } => {
            let id = resolve_company(&session.store, &who)?;
            catalog_ops::delete_company(&mut session.store, &id, &mut session.filter);
            session.selection.retain_existing(&session.store);
            commit(&mut session)?;
            println!("deleted company; its cards are in the trash");
        }
        CompanyAction::Dup { who } => {
            let id = resolve_company(&session.store, &who)?;
            if let Some(copy) = catalog_ops::duplicate_company(&mut session.store, &id) {
                // The view jumps into the freshly made copy.
                session.filter = ViewFilter::new(Scope::id(copy.clone()), Scope::All);
                commit(&mut session)?;
                println!("duplicated company as {}", copy);
            }
        }
    }
    Ok(())
}

fn cmd_folder(path: &PathBuf, args: FolderCmd, json: bool) -> CliResult {
    let mut session = Session::load(path);
    match args.action {
        FolderAction::List => {
            let folders = session.store.visible_folders(&session.filter.company);
            if json {
                let rows: Vec<FolderJson> = folders
                    .iter()
                    .map(|f| FolderJson {
                        id: f.id.clone(),
                        name: f.name.clone(),
                        company: f.company_id.to_string(),
                        cards: session
                            .store
                            .folder_card_count(&session.filter.company, &f.id),
                    })
                    .collect();
                print_json(&rows);
                return Ok(());
            }
            for folder in folders {
                let cards = session
                    .store
                    .folder_card_count(&session.filter.company, &folder.id);
                let current = session.filter.folder.matches(&folder.id)
                    && !session.filter.folder.is_all();
                println!("{}", folder_line(folder, cards, current));
            }
            return Ok(());
        }
        FolderAction::Add { name } => {
            let id = catalog_ops::add_folder(&mut session.store, &session.filter);
            catalog_ops::rename_folder(&mut session.store, &id, &name, &mut session.filter);
            commit(&mut session)?;
            println!("added folder {}", id);
        }
        FolderAction::Rename { who, name } => {
            let id = resolve_folder(&session.store, &who)?;
            catalog_ops::rename_folder(&mut session.store, &id, &name, &mut session.filter);
            commit(&mut session)?;
            println!("renamed folder");
        }
        FolderAction::Rm { who } => {
            let id = resolve_folder(&session.store, &who)?;
            catalog_ops::delete_folder(&mut session.store, &id, &mut session.filter);
            session.selection.retain_existing(&session.store);
            commit(&mut session)?;
            println!("deleted folder; its cards are in the trash");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// View and session handlers
// ---------------------------------------------------------------------------

fn cmd_use(path: &PathBuf, args: UseArgs) -> CliResult {
    if args.company.is_none() && args.folder.is_none() {
        return Err("pass --company and/or --folder".into());
    }
    let mut session = Session::load(path);
    if let Some(who) = args.company.as_deref() {
        session.filter.company = if who == "all" {
            Scope::All
        } else {
            Scope::id(resolve_company(&session.store, who)?)
        };
        // A company switch invalidates the folder context.
        session.filter.folder = Scope::All;
    }
    if let Some(who) = args.folder.as_deref() {
        session.filter.folder = if who == "all" {
            Scope::All
        } else {
            Scope::id(resolve_folder(&session.store, who)?)
        };
    }
    session.selection.clear();
    // Filter changes are view state, not document edits.
    session.save()?;
    println!(
        "viewing company: {}, folder: {}",
        session.filter.company, session.filter.folder
    );
    Ok(())
}

fn cmd_sort(path: &PathBuf, args: SortArgs) -> CliResult {
    let mut session = Session::load(path);
    session.sort_mode = args.mode.parse::<SortMode>()?;
    session.save()?;
    println!("sort mode: {}", session.sort_mode.label());
    Ok(())
}

fn cmd_undo(path: &PathBuf) -> CliResult {
    let mut session = Session::load(path);
    if session.history.undo(&mut session.store) {
        session.selection.retain_existing(&session.store);
        session.save()?;
        println!("undone");
    } else {
        println!("nothing to undo");
    }
    Ok(())
}

fn cmd_redo(path: &PathBuf) -> CliResult {
    let mut session = Session::load(path);
    if session.history.redo(&mut session.store) {
        session.selection.retain_existing(&session.store);
        session.save()?;
        println!("redone");
    } else {
        println!("nothing to redo");
    }
    Ok(())
}

fn cmd_export(path: &PathBuf, args: ExportArgs) -> CliResult {
    let session = Session::load(path);
    let questions_only = args.questions_only || session.questions_only;
    let text = export::export_text(
        &session.store,
        &session.filter,
        session.sort_mode,
        questions_only,
    );
    fs::write(&args.path, text)?;
    println!("exported to {}", args.path);
    Ok(())
}

fn cmd_practice(path: &PathBuf, args: PracticeArgs) -> CliResult {
    let session = Session::load(path);
    let mut run = practice::PracticeSession::start(
        &session.store,
        &session.filter,
        practice::PracticeMode::Random,
    )?;
    let count = args.count.unwrap_or(run.len());
    for i in 0..count {
        println!("{:3}. {}", i + 1, run.current().question);
        if !run.advance() {
            break;
        }
    }
    Ok(())
}
