//! CLI commands

mod check;
mod parse;
mod rules;

pub use check::{check, CheckArgs};
pub use parse::{parse, ParseArgs};
pub use rules::list_rules;
