pub mod cli;
pub mod history;
pub mod io;
pub mod model;
pub mod ops;
pub mod tui;
pub mod util;
