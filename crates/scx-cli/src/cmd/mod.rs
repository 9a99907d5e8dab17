pub mod completions;
pub mod extract;
pub mod search;
