pub mod card;
pub mod catalog;
pub mod filter;
pub mod store;

pub use card::*;
pub use catalog::*;
pub use filter::*;
pub use store::*;
