//! Parser combinators, parsed data and emitters shared across the grammar

pub mod data;
pub mod emitters;
pub mod parsers;

pub use data::*;
pub use emitters::*;
pub use parsers::*;
