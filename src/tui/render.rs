use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::model::Card;
use crate::ops::gesture::Hover;
use crate::util::text::{flatten, truncate_to_width};

use super::app::{App, EditField, Mode, RenameTarget, View};

/// Main render function — draws the header, card list, and status row,
/// then any active overlay.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header + separator
            Constraint::Min(1),    // card list
            Constraint::Length(1), // status row
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_cards(frame, app, chunks[1]);
    render_status(frame, app, chunks[2]);

    if app.show_help {
        render_help_overlay(frame, app, area);
    }
    if app.mode == Mode::Practice {
        render_practice_overlay(frame, app, area);
    }
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let filter = &app.session.filter;

    let company = match filter.company.as_id() {
        None => "all companies".to_string(),
        Some(id) => app
            .session
            .store
            .company(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.to_string()),
    };
    let folder = match filter.folder.as_id() {
        None => "all folders".to_string(),
        Some(id) => app
            .session
            .store
            .folder(id)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| id.to_string()),
    };

    let mut spans = vec![
        Span::styled(
            " prepdeck ",
            Style::default()
                .fg(theme.text_bright)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} / {} ", company, folder),
            Style::default().fg(theme.cyan),
        ),
        Span::styled(
            format!(" sort: {} ", app.session.sort_mode.label()),
            Style::default().fg(theme.dim),
        ),
    ];
    if app.session.questions_only {
        spans.push(Span::styled(
            " questions only ",
            Style::default().fg(theme.yellow),
        ));
    }
    if app.view == View::Trash {
        spans.push(Span::styled(
            format!(" TRASH ({}) ", app.session.store.deleted_cards.len()),
            Style::default().fg(theme.red).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(rename) = &app.rename {
        let label = match rename.target {
            RenameTarget::Company(_) => "company name",
            RenameTarget::Folder(_) => "folder name",
        };
        spans.push(Span::styled(
            format!(" {}: {}▏", label, rename.buffer),
            Style::default().fg(theme.text_bright),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), Rect { height: 1, ..area });

    // Separator line
    let sep = "─".repeat(area.width as usize);
    frame.render_widget(
        Paragraph::new(Span::styled(sep, Style::default().fg(theme.dim))),
        Rect {
            y: area.y + 1,
            height: 1,
            ..area
        },
    );
}

// ---------------------------------------------------------------------------
// Card list
// ---------------------------------------------------------------------------

fn render_cards(frame: &mut Frame, app: &mut App, area: Rect) {
    app.list_area = area;

    let cards = app.visible();
    let theme = app.theme.clone();
    if cards.is_empty() {
        let msg = match app.view {
            View::Cards => "no cards — press a to add one",
            View::Trash => "trash is empty",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(msg, Style::default().fg(theme.dim))),
            area,
        );
        return;
    }

    // Keep the cursor on screen
    let height = area.height as usize;
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if height > 0 && app.cursor >= app.scroll_offset + height {
        app.scroll_offset = app.cursor + 1 - height;
    }

    let drop_hover = app.drag.hover().cloned();
    for (row, (index, card)) in cards
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
        .enumerate()
    {
        let line = card_row(app, card, index, &drop_hover);
        frame.render_widget(
            Paragraph::new(line),
            Rect {
                y: area.y + row as u16,
                height: 1,
                ..area
            },
        );
    }
}

fn card_row<'a>(app: &App, card: &Card, index: usize, drop_hover: &Option<Hover>) -> Line<'a> {
    let theme = &app.theme;
    let selected = app.session.selection.contains(&card.id);
    let at_cursor = index == app.cursor;
    let is_drop_target = matches!(drop_hover, Some(Hover::Card { id, .. }) if *id == card.id);
    let being_dragged =
        app.drag.is_dragging() && app.drag.dragged_card() == Some(card.id.as_str());

    let mut base = Style::default().fg(theme.text);
    if selected {
        base = base.bg(theme.selection_bg);
    }
    if being_dragged {
        base = base.fg(theme.dim);
    }

    let cursor_mark = if at_cursor { ">" } else { " " };
    let select_mark = if selected { "▌" } else { " " };
    let pin_mark = if card.pinned { "* " } else { "  " };

    let editing = app
        .edit
        .as_ref()
        .filter(|e| e.card_id == card.id)
        .map(|e| (e.field, e.buffer.clone()));

    let width = app.list_area.width.saturating_sub(12) as usize;
    let text = match &editing {
        Some((field, buffer)) => {
            let label = match field {
                EditField::Question => "q",
                EditField::Answer => "a",
            };
            format!("{}: {}▏", label, flatten(buffer))
        }
        None => {
            let question = if card.question.is_empty() {
                "(blank)".to_string()
            } else {
                flatten(&card.question)
            };
            if app.session.questions_only || card.answer.is_empty() {
                question
            } else {
                format!("{}  · {}", question, flatten(&card.answer))
            }
        }
    };

    let mut spans = vec![
        Span::styled(
            format!("{}{}{:3}. ", cursor_mark, select_mark, index + 1),
            if at_cursor {
                Style::default()
                    .fg(theme.highlight)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.dim)
            },
        ),
        Span::styled(
            pin_mark.to_string(),
            Style::default().fg(theme.yellow),
        ),
        Span::styled(truncate_to_width(&text, width), base),
    ];
    if is_drop_target {
        spans.insert(
            0,
            Span::styled("▸", Style::default().fg(theme.drop_line)),
        );
    } else {
        spans.insert(0, Span::raw(" "));
    }
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Status row
// ---------------------------------------------------------------------------

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let line = if let Some(toast) = &app.toast {
        Line::from(Span::styled(
            format!(" {}", toast),
            Style::default().fg(theme.yellow),
        ))
    } else if let Mode::Confirm(_) = app.mode {
        Line::from(Span::styled(
            " confirm? y/n",
            Style::default().fg(theme.red).add_modifier(Modifier::BOLD),
        ))
    } else if app.mode == Mode::Edit {
        Line::from(Span::styled(
            " editing — enter: save, esc: cancel",
            Style::default().fg(theme.cyan),
        ))
    } else {
        let selected = app.session.selection.len();
        let mut parts = vec![format!("{} cards", app.visible_ids().len())];
        if selected > 0 {
            parts.push(format!("{} selected", selected));
        }
        if app.drag.is_dragging() {
            parts.push("dragging — release to drop".to_string());
        } else {
            parts.push("? for help".to_string());
        }
        Line::from(Span::styled(
            format!(" {}", parts.join("  ·  ")),
            Style::default().fg(theme.dim),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let lines: Vec<Line> = [
        ("j/k", "move cursor"),
        ("enter", "select card (space: toggle, v: range)"),
        ("ctrl-a", "select all / esc: clear"),
        ("a", "add card"),
        ("e / E", "edit question / answer"),
        ("p", "pin"),
        ("d", "delete to trash"),
        ("J/K", "move card(s) down / up"),
        ("drag", "reorder with the mouse (default sort)"),
        ("s", "cycle sort mode"),
        ("c / f", "cycle company / folder filter"),
        ("t", "questions only"),
        ("T", "trash view (o: restore, X: empty)"),
        ("C / F / R / D", "company or folder: add / add / rename / delete"),
        ("u / r", "undo / redo"),
        ("P", "practice"),
        ("w", "export to text"),
        ("q", "quit"),
    ]
    .iter()
    .map(|(key, what)| {
        Line::from(vec![
            Span::styled(
                format!(" {:<14}", key),
                Style::default().fg(theme.cyan),
            ),
            Span::styled((*what).to_string(), Style::default().fg(theme.text)),
        ])
    })
    .collect();

    let height = lines.len() as u16 + 2;
    let popup = centered(area, 56, height);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" keys ")
                .style(Style::default().bg(theme.background).fg(theme.text)),
        ),
        popup,
    );
}

fn render_practice_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let Some((session, watch)) = &app.practice else {
        return;
    };

    let card = session.current();
    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                " {}/{}   {}{}",
                session.position() + 1,
                session.len(),
                watch.display(),
                if watch.is_running() { "" } else { " (paused)" },
            ),
            Style::default().fg(theme.dim),
        )),
        Line::default(),
        Line::from(Span::styled(
            card.question.clone(),
            Style::default()
                .fg(theme.text_bright)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    if session.show_answer {
        lines.push(Line::default());
        let answer = if card.answer.is_empty() {
            "(no answer)".to_string()
        } else {
            card.answer.clone()
        };
        lines.push(Line::from(Span::styled(
            answer,
            Style::default().fg(theme.green),
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        " space: answer · n: next · p: pause · esc: done",
        Style::default().fg(theme.dim),
    )));

    let popup = centered(area, 64, (lines.len() as u16 + 2).max(9));
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" practice ")
                    .style(Style::default().bg(theme.background).fg(theme.text)),
            )
            .wrap(ratatui::widgets::Wrap { trim: false }),
        popup,
    );
}
