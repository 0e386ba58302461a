pub mod grid;
pub mod merge;
pub mod rules;
