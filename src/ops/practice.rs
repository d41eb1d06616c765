use std::time::{Duration, Instant};

use rand::rng;
use rand::seq::SliceRandom;

use crate::model::{Scope, SortMode, Store, ViewFilter};

use super::view::visible_cards;
use super::OpError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PracticeMode {
    /// Every visible card with a question, shuffled, looping forever.
    Random,
    /// Up to N shuffled cards from each listed folder; finite.
    PerFolder(Vec<(String, usize)>),
}

/// A single practice question, detached from the live store so edits
/// during a session do not shift the deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeCard {
    pub card_id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug)]
pub struct PracticeSession {
    mode: PracticeMode,
    deck: Vec<PracticeCard>,
    pos: usize,
    pub show_answer: bool,
}

impl PracticeSession {
    /// Build a session from the current view. Fails when no visible
    /// card has a non-blank question.
    pub fn start(
        store: &Store,
        filter: &ViewFilter,
        mode: PracticeMode,
    ) -> Result<Self, OpError> {
        let mut deck = match &mode {
            PracticeMode::Random => collect(store, filter),
            PracticeMode::PerFolder(counts) => {
                let mut deck = Vec::new();
                for (folder_id, limit) in counts {
                    let scoped =
                        ViewFilter::new(filter.company.clone(), Scope::id(folder_id.clone()));
                    let mut pool = collect(store, &scoped);
                    pool.shuffle(&mut rng());
                    pool.truncate(*limit);
                    deck.extend(pool);
                }
                deck
            }
        };
        if deck.is_empty() {
            return Err(OpError::NoPracticeQuestions);
        }
        deck.shuffle(&mut rng());
        Ok(PracticeSession {
            mode,
            deck,
            pos: 0,
            show_answer: false,
        })
    }

    pub fn current(&self) -> &PracticeCard {
        &self.deck[self.pos]
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    /// Advance to the next question. Past the end, Random mode
    /// reshuffles and restarts; PerFolder mode reports completion.
    /// Returns false when the session is over.
    pub fn advance(&mut self) -> bool {
        self.show_answer = false;
        if self.pos + 1 < self.deck.len() {
            self.pos += 1;
            return true;
        }
        match self.mode {
            PracticeMode::Random => {
                self.deck.shuffle(&mut rng());
                self.pos = 0;
                true
            }
            PracticeMode::PerFolder(_) => false,
        }
    }
}

fn collect(store: &Store, filter: &ViewFilter) -> Vec<PracticeCard> {
    visible_cards(store, filter, SortMode::Default)
        .into_iter()
        .filter(|c| c.has_question())
        .map(|c| PracticeCard {
            card_id: c.id,
            question: c.question,
            answer: c.answer,
        })
        .collect()
}

/// Wall-clock stopwatch shown during practice. Pausable; display
/// resolution is one second.
#[derive(Debug)]
pub struct Stopwatch {
    started: Option<Instant>,
    banked: Duration,
}

impl Stopwatch {
    pub fn start() -> Self {
        Stopwatch {
            started: Some(Instant::now()),
            banked: Duration::ZERO,
        }
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    pub fn toggle(&mut self) {
        match self.started.take() {
            Some(t) => self.banked += t.elapsed(),
            None => self.started = Some(Instant::now()),
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self.started {
            Some(t) => self.banked + t.elapsed(),
            None => self.banked,
        }
    }

    pub fn display(&self) -> String {
        let secs = self.elapsed().as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}
