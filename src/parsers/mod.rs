//! Input parsing for genotype encodings that don't use the canonical
//! H/D/R alphabet.

pub mod symbols;

pub use symbols::{SymbolError, SymbolMap, SymbolTable};
