pub mod completions;
pub mod score;
