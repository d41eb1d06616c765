use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::model::Scope;
use crate::ops::gesture::DragOutcome;
use crate::ops::practice::{PracticeMode, PracticeSession, Stopwatch};
use crate::ops::reorder::{DropTarget, reorder};
use crate::ops::select::ClickMods;
use crate::ops::{card_ops, catalog_ops};

use super::app::{App, Confirm, EditField, EditState, Mode, RenameState, RenameTarget, View};

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.toast = None;

    // Help overlay swallows everything
    if app.show_help {
        app.show_help = false;
        return;
    }

    match app.mode.clone() {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Edit => handle_edit(app, key),
        Mode::Rename => handle_rename(app, key),
        Mode::Confirm(confirm) => handle_confirm(app, key, confirm),
        Mode::Practice => handle_practice(app, key),
    }
}

// ---------------------------------------------------------------------------
// Navigate mode
// ---------------------------------------------------------------------------

fn handle_navigate(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.show_help = true,

        // Cursor movement
        KeyCode::Char('j') | KeyCode::Down => {
            let len = app.visible_ids().len();
            if len > 0 && app.cursor + 1 < len {
                app.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Char('g') => app.cursor = 0,
        KeyCode::Char('G') => {
            app.cursor = app.visible_ids().len().saturating_sub(1);
        }

        // Selection (keyboard equivalents of the three click kinds)
        KeyCode::Char('a') if ctrl => {
            let visible = app.visible_ids();
            app.session.selection.select_all(&visible);
        }
        KeyCode::Enter => {
            if let Some(id) = app.cursor_card() {
                let visible = app.visible_ids();
                app.session.selection.click(&id, ClickMods::NONE, &visible);
            }
        }
        KeyCode::Char(' ') => {
            if let Some(id) = app.cursor_card() {
                let visible = app.visible_ids();
                app.session.selection.click(&id, ClickMods::CTRL, &visible);
            }
        }
        KeyCode::Char('v') => {
            if let Some(id) = app.cursor_card() {
                let visible = app.visible_ids();
                app.session.selection.click(&id, ClickMods::SHIFT, &visible);
            }
        }
        KeyCode::Esc => app.session.selection.clear(),

        // Card edits
        KeyCode::Char('a') => add_card(app),
        KeyCode::Char('e') => begin_edit(app, EditField::Question, false),
        KeyCode::Char('E') => begin_edit(app, EditField::Answer, false),
        KeyCode::Char('p') => {
            if app.view == View::Cards
                && let Some(id) = app.cursor_card()
            {
                card_ops::toggle_pin(&mut app.session.store, &id);
                app.commit();
            }
        }
        KeyCode::Char('d') => request_delete(app),

        // Keyboard reorder
        KeyCode::Char('J') => nudge(app, 1),
        KeyCode::Char('K') => nudge(app, -1),

        // View state
        KeyCode::Char('s') => {
            app.session.sort_mode = app.session.sort_mode.next();
            app.save_view();
            app.toast(format!("sort: {}", app.session.sort_mode.label()));
        }
        KeyCode::Char('c') => cycle_company(app),
        KeyCode::Char('f') => cycle_folder(app),
        KeyCode::Char('t') => {
            app.session.questions_only = !app.session.questions_only;
            app.save_view();
        }
        KeyCode::Char('T') => {
            app.view = match app.view {
                View::Cards => View::Trash,
                View::Trash => View::Cards,
            };
            app.cursor = 0;
            app.scroll_offset = 0;
        }

        // Catalog
        KeyCode::Char('C') => {
            let id = catalog_ops::add_company(&mut app.session.store);
            app.rename = Some(RenameState {
                target: RenameTarget::Company(id),
                buffer: String::new(),
                is_new: true,
            });
            app.mode = Mode::Rename;
        }
        KeyCode::Char('F') => {
            let id = catalog_ops::add_folder(&mut app.session.store, &app.session.filter);
            app.rename = Some(RenameState {
                target: RenameTarget::Folder(id),
                buffer: String::new(),
                is_new: true,
            });
            app.mode = Mode::Rename;
        }
        KeyCode::Char('R') => begin_rename_current(app),
        KeyCode::Char('D') => {
            if let Some(id) = app.session.filter.company.as_id() {
                app.mode = Mode::Confirm(Confirm::DeleteCompany(id.to_string()));
            } else {
                app.toast("switch to a company first");
            }
        }

        // History
        KeyCode::Char('u') => {
            if app.session.history.undo(&mut app.session.store) {
                app.session.selection.retain_existing(&app.session.store);
                app.clamp_cursor();
                app.save_view();
                app.toast("undone");
            } else {
                app.toast("nothing to undo");
            }
        }
        KeyCode::Char('r') => {
            if app.session.history.redo(&mut app.session.store) {
                app.session.selection.retain_existing(&app.session.store);
                app.clamp_cursor();
                app.save_view();
                app.toast("redone");
            } else {
                app.toast("nothing to redo");
            }
        }

        // Trash actions (only meaningful in the trash view)
        KeyCode::Char('o') if app.view == View::Trash => {
            if let Some(id) = app.cursor_card() {
                card_ops::restore_card(&mut app.session.store, &id);
                app.clamp_cursor();
                app.commit();
                app.toast("restored");
            }
        }
        KeyCode::Char('X') if app.view == View::Trash => {
            app.mode = Mode::Confirm(Confirm::EmptyTrash);
        }

        // Practice & export
        KeyCode::Char('P') => start_practice(app),
        KeyCode::Char('w') => export_view(app),

        _ => {}
    }
}

fn add_card(app: &mut App) {
    if app.view != View::Cards {
        return;
    }
    match card_ops::add_card(&mut app.session.store, &app.session.filter) {
        Ok(id) => {
            let visible = app.visible_ids();
            if let Some(pos) = visible.iter().position(|v| v == &id) {
                app.cursor = pos;
            }
            app.edit = Some(EditState {
                card_id: id,
                field: EditField::Question,
                buffer: String::new(),
                is_new: true,
            });
            app.mode = Mode::Edit;
        }
        Err(e) => app.toast(e.to_string()),
    }
}

fn begin_edit(app: &mut App, field: EditField, is_new: bool) {
    if app.view != View::Cards {
        return;
    }
    // Editing only makes sense with at most one card selected.
    if !app.session.selection.editing_enabled() {
        app.toast("clear the selection to edit (Esc)");
        return;
    }
    let Some(id) = app.cursor_card() else { return };
    let Some(card) = app.session.store.card(&id) else {
        return;
    };
    let buffer = match field {
        EditField::Question => card.question.clone(),
        EditField::Answer => card.answer.clone(),
    };
    app.edit = Some(EditState {
        card_id: id,
        field,
        buffer,
        is_new,
    });
    app.mode = Mode::Edit;
}

fn request_delete(app: &mut App) {
    if app.view == View::Trash {
        if let Some(id) = app.cursor_card() {
            card_ops::purge_card(&mut app.session.store, &id);
            app.clamp_cursor();
            // Trash is outside undo history.
            app.save_view();
            app.toast("deleted permanently");
        }
        return;
    }
    let ids = if app.session.selection.is_empty() {
        match app.cursor_card() {
            Some(id) => vec![id],
            None => return,
        }
    } else {
        app.session.selection.to_vec()
    };
    app.mode = Mode::Confirm(Confirm::DeleteCards(ids));
}

/// Move the selected block (or the cursor card) one visible position.
fn nudge(app: &mut App, delta: i32) {
    if app.view != View::Cards {
        return;
    }
    if !app.session.sort_mode.allows_reorder() {
        app.toast("reordering needs the default sort");
        return;
    }
    let visible = app.visible_ids();
    let dragged = dragged_set(app);
    if dragged.is_empty() {
        return;
    }
    let positions: Vec<usize> = visible
        .iter()
        .enumerate()
        .filter(|(_, id)| dragged.contains(id))
        .map(|(i, _)| i)
        .collect();
    let (Some(&first), Some(&last)) = (positions.first(), positions.last()) else {
        return;
    };

    let target = if delta < 0 {
        match first.checked_sub(1) {
            Some(i) => DropTarget::Before(visible[i].clone()),
            None => return,
        }
    } else {
        match visible.get(last + 1) {
            Some(id) => DropTarget::After(id.clone()),
            None => return,
        }
    };

    if reorder(&mut app.session.store, &app.session.filter, &dragged, &target) {
        app.commit();
        // Keep the cursor on the moved block.
        if let Some(id) = dragged.first() {
            let visible = app.visible_ids();
            if let Some(pos) = visible.iter().position(|v| v == id) {
                app.cursor = pos;
            }
        }
    }
}

fn dragged_set(app: &App) -> Vec<String> {
    if app.session.selection.is_empty() {
        app.cursor_card().into_iter().collect()
    } else {
        app.session.selection.to_vec()
    }
}

fn cycle_company(app: &mut App) {
    let companies = &app.session.store.companies;
    let next = match app.session.filter.company.as_id() {
        None => companies.first().map(|c| c.id.clone()),
        Some(current) => {
            let pos = companies.iter().position(|c| c.id == current);
            match pos {
                Some(i) => companies.get(i + 1).map(|c| c.id.clone()),
                None => None,
            }
        }
    };
    app.session.filter.company = match next {
        Some(id) => Scope::id(id),
        None => Scope::All,
    };
    // A company switch invalidates the folder context.
    app.session.filter.folder = Scope::All;
    app.session.selection.clear();
    app.cursor = 0;
    app.scroll_offset = 0;
    app.save_view();
}

fn cycle_folder(app: &mut App) {
    let folders = app.session.store.visible_folders(&app.session.filter.company);
    let next = match app.session.filter.folder.as_id() {
        None => folders.first().map(|f| f.id.clone()),
        Some(current) => {
            let pos = folders.iter().position(|f| f.id == current);
            match pos {
                Some(i) => folders.get(i + 1).map(|f| f.id.clone()),
                None => None,
            }
        }
    };
    app.session.filter.folder = match next {
        Some(id) => Scope::id(id),
        None => Scope::All,
    };
    app.session.selection.clear();
    app.cursor = 0;
    app.scroll_offset = 0;
    app.save_view();
}

fn begin_rename_current(app: &mut App) {
    // Folder context wins when both filters are set.
    if let Some(id) = app.session.filter.folder.as_id() {
        let buffer = app
            .session
            .store
            .folder(id)
            .map(|f| f.name.clone())
            .unwrap_or_default();
        app.rename = Some(RenameState {
            target: RenameTarget::Folder(id.to_string()),
            buffer,
            is_new: false,
        });
        app.mode = Mode::Rename;
    } else if let Some(id) = app.session.filter.company.as_id() {
        let buffer = app
            .session
            .store
            .company(id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        app.rename = Some(RenameState {
            target: RenameTarget::Company(id.to_string()),
            buffer,
            is_new: false,
        });
        app.mode = Mode::Rename;
    } else {
        app.toast("switch to a company or folder first");
    }
}

fn start_practice(app: &mut App) {
    match PracticeSession::start(&app.session.store, &app.session.filter, PracticeMode::Random) {
        Ok(session) => {
            app.practice = Some((session, Stopwatch::start()));
            app.mode = Mode::Practice;
        }
        Err(e) => app.toast(e.to_string()),
    }
}

fn export_view(app: &mut App) {
    let text = crate::ops::export::export_text(
        &app.session.store,
        &app.session.filter,
        app.session.sort_mode,
        app.session.questions_only,
    );
    let path = app.session.path.with_extension("txt");
    match std::fs::write(&path, text) {
        Ok(()) => app.toast(format!("exported to {}", path.display())),
        Err(e) => app.toast(format!("export failed: {}", e)),
    }
}

// ---------------------------------------------------------------------------
// Edit mode
// ---------------------------------------------------------------------------

fn handle_edit(app: &mut App, key: KeyEvent) {
    let Some(mut edit) = app.edit.take() else {
        app.mode = Mode::Navigate;
        return;
    };
    match key.code {
        KeyCode::Esc => {
            // Abandon the edit; a brand-new card with no question reverts.
            if edit.is_new {
                card_ops::delete_cards(&mut app.session.store, &[edit.card_id.clone()]);
                card_ops::purge_card(&mut app.session.store, &edit.card_id);
                app.clamp_cursor();
            }
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
            edit.buffer.push('\n');
            app.edit = Some(edit);
        }
        KeyCode::Enter => {
            match edit.field {
                EditField::Question => {
                    card_ops::edit_question(&mut app.session.store, &edit.card_id, &edit.buffer);
                }
                EditField::Answer => {
                    card_ops::edit_answer(&mut app.session.store, &edit.card_id, &edit.buffer);
                }
            }
            app.commit();
            app.mode = Mode::Navigate;
        }
        KeyCode::Backspace => {
            edit.buffer.pop();
            app.edit = Some(edit);
        }
        KeyCode::Char(c) => {
            edit.buffer.push(c);
            app.edit = Some(edit);
        }
        _ => app.edit = Some(edit),
    }
    if app.mode == Mode::Edit && app.edit.is_none() {
        app.mode = Mode::Navigate;
    }
}

// ---------------------------------------------------------------------------
// Rename mode
// ---------------------------------------------------------------------------

fn handle_rename(app: &mut App, key: KeyEvent) {
    let Some(mut rename) = app.rename.take() else {
        app.mode = Mode::Navigate;
        return;
    };
    match key.code {
        KeyCode::Esc if !rename.is_new => {
            // Cancel: an existing entity keeps its previous name.
            app.mode = Mode::Navigate;
        }
        KeyCode::Esc | KeyCode::Enter => {
            // Committing an empty name deletes the target, which is
            // also how a cancelled add cleans up after itself.
            let name = if key.code == KeyCode::Esc {
                String::new()
            } else {
                rename.buffer.clone()
            };
            match &rename.target {
                RenameTarget::Company(id) => {
                    catalog_ops::rename_company(
                        &mut app.session.store,
                        id,
                        &name,
                        &mut app.session.filter,
                    );
                }
                RenameTarget::Folder(id) => {
                    catalog_ops::rename_folder(
                        &mut app.session.store,
                        id,
                        &name,
                        &mut app.session.filter,
                    );
                }
            }
            app.session.selection.retain_existing(&app.session.store);
            app.clamp_cursor();
            app.commit();
            app.mode = Mode::Navigate;
        }
        KeyCode::Backspace => {
            rename.buffer.pop();
            app.rename = Some(rename);
        }
        KeyCode::Char(c) => {
            rename.buffer.push(c);
            app.rename = Some(rename);
        }
        _ => app.rename = Some(rename),
    }
}

// ---------------------------------------------------------------------------
// Confirm mode
// ---------------------------------------------------------------------------

fn handle_confirm(app: &mut App, key: KeyEvent, confirm: Confirm) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            match confirm {
                Confirm::DeleteCards(ids) => {
                    let n = card_ops::delete_cards(&mut app.session.store, &ids);
                    app.session.selection.retain_existing(&app.session.store);
                    app.clamp_cursor();
                    app.commit();
                    app.toast(format!("{} cards moved to the trash", n));
                }
                Confirm::DeleteCompany(id) => {
                    catalog_ops::delete_company(
                        &mut app.session.store,
                        &id,
                        &mut app.session.filter,
                    );
                    app.session.selection.retain_existing(&app.session.store);
                    app.clamp_cursor();
                    app.commit();
                    app.toast("company deleted; its cards are in the trash");
                }
                Confirm::DeleteFolder(id) => {
                    catalog_ops::delete_folder(
                        &mut app.session.store,
                        &id,
                        &mut app.session.filter,
                    );
                    app.session.selection.retain_existing(&app.session.store);
                    app.clamp_cursor();
                    app.commit();
                    app.toast("folder deleted; its cards are in the trash");
                }
                Confirm::EmptyTrash => {
                    let n = card_ops::empty_trash(&mut app.session.store);
                    app.cursor = 0;
                    app.save_view();
                    app.toast(format!("emptied the trash ({} cards)", n));
                }
            }
            app.mode = Mode::Navigate;
        }
        _ => app.mode = Mode::Navigate,
    }
}

// ---------------------------------------------------------------------------
// Practice mode
// ---------------------------------------------------------------------------

fn handle_practice(app: &mut App, key: KeyEvent) {
    let Some((mut session, mut watch)) = app.practice.take() else {
        app.mode = Mode::Navigate;
        return;
    };
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.mode = Mode::Navigate;
            return;
        }
        KeyCode::Char(' ') => session.show_answer = !session.show_answer,
        KeyCode::Char('n') | KeyCode::Enter => {
            if !session.advance() {
                app.toast("practice finished");
                app.mode = Mode::Navigate;
                return;
            }
        }
        KeyCode::Char('p') => watch.toggle(),
        _ => {}
    }
    app.practice = Some((session, watch));
}

// ---------------------------------------------------------------------------
// Mouse
// ---------------------------------------------------------------------------

/// Feed mouse events through the drag state machine. Clicks select,
/// drags reorder.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.mode != Mode::Navigate || app.view != View::Cards {
        return;
    }
    let pos = (mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(crate::ops::gesture::Hover::Card { id, .. }) =
                app.hit_test(mouse.column, mouse.row)
            {
                app.drag.pointer_down(&id, pos);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            let over = app.hit_test(mouse.column, mouse.row);
            app.drag.pointer_move(pos, over);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let over = app.hit_test(mouse.column, mouse.row);
            match app.drag.pointer_up(over) {
                DragOutcome::Click { card } => {
                    let visible = app.visible_ids();
                    let mods = ClickMods {
                        shift: mouse.modifiers.contains(KeyModifiers::SHIFT),
                        ctrl: mouse.modifiers.contains(KeyModifiers::CONTROL),
                    };
                    app.session.selection.click(&card, mods, &visible);
                    if let Some(pos) = visible.iter().position(|v| v == &card) {
                        app.cursor = pos;
                    }
                }
                DragOutcome::Drop { card, target } => {
                    if !app.session.sort_mode.allows_reorder() {
                        app.toast("reordering needs the default sort");
                        return;
                    }
                    let dragged = if app.session.selection.contains(&card) {
                        app.session.selection.to_vec()
                    } else {
                        vec![card]
                    };
                    if reorder(
                        &mut app.session.store,
                        &app.session.filter,
                        &dragged,
                        &target,
                    ) {
                        app.commit();
                    }
                }
                DragOutcome::Cancelled | DragOutcome::None => {}
            }
        }
        MouseEventKind::ScrollDown => {
            let len = app.visible_ids().len();
            if app.scroll_offset + 1 < len {
                app.scroll_offset += 1;
            }
        }
        MouseEventKind::ScrollUp => {
            app.scroll_offset = app.scroll_offset.saturating_sub(1);
        }
        _ => {}
    }
}
