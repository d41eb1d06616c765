pub mod card_ops;
pub mod catalog_ops;
pub mod export;
pub mod gesture;
pub mod practice;
pub mod reorder;
pub mod select;
pub mod view;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OpError {
    #[error("no companies exist; create one first")]
    NoCompanies,
    #[error("no questions to add")]
    EmptyBatch,
    #[error("no cards with a question to practice")]
    NoPracticeQuestions,
}
