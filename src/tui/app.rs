use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;

use crate::io::state::{DEFAULT_FILE, Session};
use crate::model::Card;
use crate::ops::gesture::{DragState, Hover};
use crate::ops::practice::{PracticeSession, Stopwatch};
use crate::ops::view::{visible_card_ids, visible_cards};

use super::input;
use super::render;
use super::theme::Theme;

/// Which view is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Cards,
    Trash,
}

/// Current interaction mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Inline text entry for a card field.
    Edit,
    /// Inline text entry for a company/folder name.
    Rename,
    Confirm(Confirm),
    Practice,
}

/// Pending destructive action awaiting y/n.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    DeleteCards(Vec<String>),
    DeleteCompany(String),
    DeleteFolder(String),
    EmptyTrash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Question,
    Answer,
}

/// In-flight inline edit of a card field.
#[derive(Debug, Clone)]
pub struct EditState {
    pub card_id: String,
    pub field: EditField,
    pub buffer: String,
    /// Revert (delete) the card if the question is left empty.
    pub is_new: bool,
}

/// In-flight inline rename of a company or folder.
#[derive(Debug, Clone)]
pub struct RenameState {
    /// Company id or folder id.
    pub target: RenameTarget,
    pub buffer: String,
    /// Cancelling the rename of a just-created entity removes it.
    pub is_new: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameTarget {
    Company(String),
    Folder(String),
}

/// Main application state
pub struct App {
    pub session: Session,
    pub view: View,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    /// Cursor index into the visible card list (or trash list).
    pub cursor: usize,
    pub scroll_offset: usize,
    /// Mouse drag gesture state.
    pub drag: DragState,
    pub edit: Option<EditState>,
    pub rename: Option<RenameState>,
    pub practice: Option<(PracticeSession, Stopwatch)>,
    pub show_help: bool,
    /// One-line transient message for the status row.
    pub toast: Option<String>,
    /// Card list screen area, set during render for mouse hit-testing.
    pub list_area: Rect,
}

impl App {
    pub fn new(session: Session) -> Self {
        App {
            session,
            view: View::Cards,
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::default(),
            cursor: 0,
            scroll_offset: 0,
            drag: DragState::default(),
            edit: None,
            rename: None,
            practice: None,
            show_help: false,
            toast: None,
            list_area: Rect::default(),
        }
    }

    /// The cards currently on screen, in display order.
    pub fn visible(&self) -> Vec<Card> {
        match self.view {
            View::Cards => visible_cards(
                &self.session.store,
                &self.session.filter,
                self.session.sort_mode,
            ),
            View::Trash => self.session.store.deleted_cards.clone(),
        }
    }

    pub fn visible_ids(&self) -> Vec<String> {
        match self.view {
            View::Cards => visible_card_ids(
                &self.session.store,
                &self.session.filter,
                self.session.sort_mode,
            ),
            View::Trash => self
                .session
                .store
                .deleted_cards
                .iter()
                .map(|c| c.id.clone())
                .collect(),
        }
    }

    /// Card id under the cursor, if any.
    pub fn cursor_card(&self) -> Option<String> {
        self.visible_ids().get(self.cursor).cloned()
    }

    pub fn clamp_cursor(&mut self) {
        let len = self.visible_ids().len();
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }

    /// Map a screen position to what the pointer is over in the card
    /// list. Rows below the last card count as empty grid space.
    pub fn hit_test(&self, column: u16, row: u16) -> Option<Hover> {
        let area = self.list_area;
        if column < area.x
            || column >= area.x + area.width
            || row < area.y
            || row >= area.y + area.height
        {
            return None;
        }
        let index = (row - area.y) as usize + self.scroll_offset;
        let ids = self.visible_ids();
        match ids.get(index) {
            Some(id) => Some(Hover::Card {
                id: id.clone(),
                upper_half: true,
            }),
            None => Some(Hover::Empty),
        }
    }

    pub fn toast(&mut self, msg: impl Into<String>) {
        self.toast = Some(msg.into());
    }

    /// Checkpoint + save after a mutation; surfaces write failures in
    /// the status row instead of crashing the TUI.
    pub fn commit(&mut self) {
        self.session.checkpoint();
        self.save_view();
    }

    /// Save without an undo checkpoint (view state, trash operations).
    pub fn save_view(&mut self) {
        if let Err(e) = self.session.save() {
            self.toast(format!("save failed: {}", e));
        }
    }
}

pub fn run(file: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let path = file.map(Path::new).unwrap_or(Path::new(DEFAULT_FILE));
    let session = Session::load(path);
    let mut app = App::new(session);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        // The 250ms poll doubles as the stopwatch redraw tick.
        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Mouse(mouse) => {
                    input::handle_mouse(app, mouse);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
