use tracing::{debug, trace};

use crate::parsers::SymbolTable;
use crate::types::*;

/// Evaluate a cross between two parents against a target genotype.
///
/// Inputs are case-insensitive. Lengths are checked first, then symbols, and
/// only then are loci compared. Each locus contributes a power of 1/2, so the
/// result is carried as the summed exponent and is always exact.
pub fn evaluate(parent1: &str, parent2: &str, target: &str) -> Result<CrossOutcome, CrossError> {
    CrossEvaluator::new().evaluate(parent1, parent2, target)
}

/// Remap custom symbols through `symbols`, then evaluate as usual.
pub fn evaluate_with(
    symbols: &SymbolTable,
    parent1: &str,
    parent2: &str,
    target: &str,
) -> Result<CrossOutcome, CrossError> {
    CrossEvaluator::with_symbols(symbols.clone()).evaluate(parent1, parent2, target)
}

/// Mendelian cross evaluator, optionally fronted by a symbol remapping
#[derive(Debug, Clone, Default)]
pub struct CrossEvaluator {
    symbols: Option<SymbolTable>,
}

impl CrossEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symbols(symbols: SymbolTable) -> Self {
        Self {
            symbols: Some(symbols),
        }
    }

    pub fn evaluate(
        &self,
        parent1: &str,
        parent2: &str,
        target: &str,
    ) -> Result<CrossOutcome, CrossError> {
        let (p1, p2, t) = self.prepare(parent1, parent2, target)?;

        let mut odds = Odds::CERTAIN;
        for (index, ((a, b), goal)) in p1.loci().iter().zip(p2.loci()).zip(t.loci()).enumerate() {
            match assess_locus(*a, *b, *goal) {
                LocusVerdict::Blocked(reason) => {
                    debug!(locus = index, %reason, "cross is impossible");
                    return Ok(CrossOutcome::Impossible {
                        locus: index,
                        reason,
                    });
                }
                LocusVerdict::Split(splits) => {
                    trace!(locus = index, splits, "locus assessed");
                    odds = odds.and(Odds::from_division_count(u32::from(splits)));
                }
            }
        }

        debug!(loci = t.len(), odds = %odds, "cross evaluated");
        Ok(CrossOutcome::Probability(odds))
    }

    /// Per-locus assessments for every locus, without stopping at the first
    /// blocked one.
    pub fn breakdown(
        &self,
        parent1: &str,
        parent2: &str,
        target: &str,
    ) -> Result<Vec<LocusAssessment>, CrossError> {
        let (p1, p2, t) = self.prepare(parent1, parent2, target)?;

        Ok(p1
            .loci()
            .iter()
            .zip(p2.loci())
            .zip(t.loci())
            .enumerate()
            .map(|(index, ((a, b), goal))| LocusAssessment {
                index,
                parent1: *a,
                parent2: *b,
                target: *goal,
                verdict: assess_locus(*a, *b, *goal),
            })
            .collect())
    }

    fn prepare(
        &self,
        parent1: &str,
        parent2: &str,
        target: &str,
    ) -> Result<(Genotype, Genotype, Genotype), CrossError> {
        let (parent1, parent2, target) = match &self.symbols {
            Some(symbols) => (
                symbols.remap(parent1),
                symbols.remap(parent2),
                symbols.remap(target),
            ),
            None => (parent1.to_string(), parent2.to_string(), target.to_string()),
        };

        let parent1 = parent1.to_uppercase();
        let parent2 = parent2.to_uppercase();
        let target = target.to_uppercase();

        let lengths = (
            parent1.chars().count(),
            parent2.chars().count(),
            target.chars().count(),
        );
        if lengths.0 != lengths.1 || lengths.1 != lengths.2 {
            return Err(CrossError::LengthMismatch {
                parent1: lengths.0,
                parent2: lengths.1,
                target: lengths.2,
            });
        }

        Ok((
            Genotype::parse(&parent1, GenotypeRole::Parent1)?,
            Genotype::parse(&parent2, GenotypeRole::Parent2)?,
            Genotype::parse(&target, GenotypeRole::Target)?,
        ))
    }
}

/// Feasibility and split count for a single locus.
pub fn assess_locus(parent1: AlleleState, parent2: AlleleState, target: AlleleState) -> LocusVerdict {
    use AlleleState::*;

    let either = |state: AlleleState| parent1 == state || parent2 == state;

    if either(HomozygousDominant) && target == HomozygousRecessive {
        return LocusVerdict::Blocked(Infeasibility::DominantParentRecessiveTarget);
    }
    if either(HomozygousRecessive) && target == HomozygousDominant {
        return LocusVerdict::Blocked(Infeasibility::RecessiveParentDominantTarget);
    }
    if target == Heterozygous && parent1 == parent2 && parent1.is_homozygous() {
        return LocusVerdict::Blocked(Infeasibility::HomozygousParentsHeterozygousTarget);
    }

    let splits = match target {
        // DD x RR always gives Aa
        Heterozygous if parent1 != parent2 && parent1.is_homozygous() && parent2.is_homozygous() => 0,
        Heterozygous => 1,
        _ if parent1 == Heterozygous && parent2 == Heterozygous => 2,
        _ if parent1 != parent2 => 1,
        _ => 0,
    };

    LocusVerdict::Split(splits)
}
