use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "prep", about = concat!("[#] prepdeck v", env!("CARGO_PKG_VERSION"), " - interview flashcards in one file"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Deck file to operate on (default: prepdeck.json in the current directory)
    #[arg(short = 'C', long = "file", global = true)]
    pub file: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the visible cards with their positions
    List(ListArgs),
    /// Add a card
    Add(AddArgs),
    /// Add one card per line from a file (or stdin with "-")
    Batch(BatchArgs),
    /// Edit a card's question or answer
    Edit(EditArgs),
    /// Toggle a card's pin
    Pin(PinArgs),
    /// Move cards to a new position (manual sort only)
    Mv(MvArgs),
    /// Move cards to the trash
    Rm(RmArgs),
    /// Inspect or empty the trash
    Trash(TrashCmd),
    /// Manage companies
    Company(CompanyCmd),
    /// Manage folders
    Folder(FolderCmd),
    /// Switch the active company/folder filter
    Use(UseArgs),
    /// Set the sort mode
    Sort(SortArgs),
    /// Undo the last change
    Undo,
    /// Redo an undone change
    Redo,
    /// Write the visible cards to a text file
    Export(ExportArgs),
    /// Print a shuffled practice run of the visible questions
    Practice(PracticeArgs),
}

// ---------------------------------------------------------------------------
// Card command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Show only questions
    #[arg(long)]
    pub questions_only: bool,
}

#[derive(Args)]
pub struct AddArgs {
    /// Question text (omit for a blank card)
    pub question: Option<String>,
    /// Answer text
    #[arg(long)]
    pub answer: Option<String>,
}

#[derive(Args)]
pub struct BatchArgs {
    /// File with one question per line, or "-" for stdin
    pub path: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Card position in the current view (1-based)
    pub position: usize,
    /// New question text
    #[arg(long)]
    pub question: Option<String>,
    /// New answer text
    #[arg(long)]
    pub answer: Option<String>,
}

#[derive(Args)]
pub struct PinArgs {
    /// Card position in the current view (1-based)
    pub position: usize,
}

#[derive(Args)]
pub struct MvArgs {
    /// Card positions to move (1-based)
    #[arg(required = true)]
    pub positions: Vec<usize>,
    /// Drop before this position
    #[arg(long, conflicts_with_all = ["after", "end"])]
    pub before: Option<usize>,
    /// Drop after this position
    #[arg(long, conflicts_with = "end")]
    pub after: Option<usize>,
    /// Drop at the end of the view
    #[arg(long)]
    pub end: bool,
}

#[derive(Args)]
pub struct RmArgs {
    /// Card positions to trash (1-based)
    #[arg(required = true)]
    pub positions: Vec<usize>,
}

// ---------------------------------------------------------------------------
// Trash
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TrashCmd {
    #[command(subcommand)]
    pub action: TrashAction,
}

#[derive(Subcommand)]
pub enum TrashAction {
    /// List trashed cards
    List,
    /// Restore a trashed card (1-based position in the trash)
    Restore { position: usize },
    /// Permanently delete a trashed card
    Rm { position: usize },
    /// Permanently delete everything in the trash
    Empty,
}

// ---------------------------------------------------------------------------
// Companies and folders
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct CompanyCmd {
    #[command(subcommand)]
    pub action: CompanyAction,
}

#[derive(Subcommand)]
pub enum CompanyAction {
    /// List companies
    List,
    /// Add a company
    Add { name: String },
    /// Rename a company (by id or name)
    Rename { who: String, name: String },
    /// Delete a company; its cards go to the trash
    Rm { who: String },
    /// Duplicate a company and all of its cards
    Dup { who: String },
}

#[derive(Args)]
pub struct FolderCmd {
    #[command(subcommand)]
    pub action: FolderAction,
}

#[derive(Subcommand)]
pub enum FolderAction {
    /// List folders visible under the current company
    List,
    /// Add a folder under the current company
    Add { name: String },
    /// Rename a folder (by id or name)
    Rename { who: String, name: String },
    /// Delete a folder; its cards go to the trash
    Rm { who: String },
}

// ---------------------------------------------------------------------------
// View and session args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct UseArgs {
    /// Company id, name, or "all"
    #[arg(long)]
    pub company: Option<String>,
    /// Folder id, name, or "all"
    #[arg(long)]
    pub folder: Option<String>,
}

#[derive(Args)]
pub struct SortArgs {
    /// One of: default, alphabetical, random, length
    pub mode: String,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file
    pub path: String,
    /// Export questions without answers
    #[arg(long)]
    pub questions_only: bool,
}

#[derive(Args)]
pub struct PracticeArgs {
    /// Stop after this many questions (default: one pass over the deck)
    #[arg(long)]
    pub count: Option<usize>,
}
