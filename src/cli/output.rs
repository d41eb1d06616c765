use serde::Serialize;

use crate::model::{Card, Company, Folder, Scope};
use crate::util::text::flatten;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct CardJson {
    pub position: usize,
    pub id: String,
    pub question: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub answer: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub pinned: bool,
    pub company: String,
    pub folder: String,
}

#[derive(Serialize)]
pub struct CompanyJson {
    pub id: String,
    pub name: String,
    pub cards: usize,
}

#[derive(Serialize)]
pub struct FolderJson {
    pub id: String,
    pub name: String,
    pub company: String,
    pub cards: usize,
}

impl CardJson {
    pub fn new(position: usize, card: &Card, company_name: &str, folder_name: &str) -> Self {
        CardJson {
            position,
            id: card.id.clone(),
            question: card.question.clone(),
            answer: card.answer.clone(),
            pinned: card.pinned,
            company: company_name.to_string(),
            folder: folder_name.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// One-line listing form: `  3. [*] What is ownership?`
pub fn card_line(position: usize, card: &Card, questions_only: bool) -> String {
    let pin = if card.pinned { "[*] " } else { "" };
    let question = if card.question.is_empty() {
        "(blank)".to_string()
    } else {
        flatten(&card.question)
    };
    let mut line = format!("{:3}. {}{}", position, pin, question);
    if !questions_only && !card.answer.is_empty() {
        line.push_str(&format!("\n     > {}", flatten(&card.answer)));
    }
    line
}

pub fn scope_name(scope: &Scope, name: Option<&str>) -> String {
    match scope {
        Scope::All => "all".to_string(),
        Scope::Id(_) => name.unwrap_or("?").to_string(),
    }
}

pub fn company_line(company: &Company, cards: usize, current: bool) -> String {
    let marker = if current { "*" } else { " " };
    format!("{} {}  {} ({} cards)", marker, company.id, company.name, cards)
}

pub fn folder_line(folder: &Folder, cards: usize, current: bool) -> String {
    let marker = if current { "*" } else { " " };
    format!("{} {}  {} ({} cards)", marker, folder.id, folder.name, cards)
}

pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("error: {}", e),
    }
}
