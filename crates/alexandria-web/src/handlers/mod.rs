pub mod index;
pub mod parse;
