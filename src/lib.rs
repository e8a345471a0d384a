//! # Cross Probability
//!
//! Probability that a cross between two parent genotypes produces a given
//! target genotype, assuming independent (unlinked) loci.
//!
//! Genotypes are written one symbol per locus:
//!
//! - `H` - heterozygous (`Aa`)
//! - `D` - homozygous dominant (`AA`)
//! - `R` - homozygous recessive (`aa`)
//!
//! so `aaBBCc` is `RDH`. Incomplete dominance is handled by remapping custom
//! symbols onto this alphabet before evaluation.
//!
//! ```
//! use cross_probability::evaluate;
//!
//! let outcome = evaluate("HH", "HH", "DD").unwrap();
//! assert_eq!(outcome.denominator(), Some(16));
//! assert!(evaluate("D", "D", "H").unwrap().is_impossible());
//! ```

pub mod analysis;
pub mod config;
pub mod output;
pub mod parsers;
pub mod shell;
pub mod types;

// Re-export key types
pub use analysis::{evaluate, evaluate_with, CrossEvaluator};
pub use config::CrossConfig;
pub use output::{CrossReport, Renderer, ReportFormat};
pub use parsers::{SymbolError, SymbolMap, SymbolTable};
pub use shell::{CrossPrompt, InteractiveSession, SessionSummary, TerminalPrompt};
pub use types::*;
