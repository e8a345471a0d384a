use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Inheritance mode used to interpret the genotype strings
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InheritanceMode {
    /// Plain Mendelian alphabet (H, D, R)
    #[default]
    Basic,
    /// Custom symbols remapped onto H, D, R before evaluation
    Incomplete,
}

/// Allele state at a single locus
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AlleleState {
    #[serde(rename = "H", alias = "h", alias = "heterozygous")]
    Heterozygous, // Aa
    #[serde(rename = "D", alias = "d", alias = "dominant")]
    HomozygousDominant, // AA
    #[serde(rename = "R", alias = "r", alias = "recessive")]
    HomozygousRecessive, // aa
}

impl AlleleState {
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            'H' => Some(AlleleState::Heterozygous),
            'D' => Some(AlleleState::HomozygousDominant),
            'R' => Some(AlleleState::HomozygousRecessive),
            _ => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            AlleleState::Heterozygous => 'H',
            AlleleState::HomozygousDominant => 'D',
            AlleleState::HomozygousRecessive => 'R',
        }
    }

    pub fn is_homozygous(&self) -> bool {
        !self.is_heterozygous()
    }

    pub fn is_heterozygous(&self) -> bool {
        matches!(self, AlleleState::Heterozygous)
    }
}

impl fmt::Display for AlleleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Which of the three inputs a genotype string came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenotypeRole {
    Parent1,
    Parent2,
    Target,
}

impl fmt::Display for GenotypeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenotypeRole::Parent1 => write!(f, "parent 1"),
            GenotypeRole::Parent2 => write!(f, "parent 2"),
            GenotypeRole::Target => write!(f, "target"),
        }
    }
}

/// Ordered per-locus allele states, e.g. `aaBBCc` encodes as `RDH`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Genotype {
    loci: Vec<AlleleState>,
}

impl Genotype {
    /// Parse an already case-normalized encoding.
    pub fn parse(encoding: &str, role: GenotypeRole) -> Result<Self, CrossError> {
        let loci = encoding
            .chars()
            .enumerate()
            .map(|(position, found)| {
                AlleleState::from_symbol(found).ok_or(CrossError::InvalidCharacter {
                    role,
                    position,
                    found,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { loci })
    }

    pub fn len(&self) -> usize {
        self.loci.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loci.is_empty()
    }

    pub fn loci(&self) -> &[AlleleState] {
        &self.loci
    }
}

impl fmt::Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in &self.loci {
            write!(f, "{}", state)?;
        }
        Ok(())
    }
}

/// Input errors detected before any per-locus logic runs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CrossError {
    #[error("genotype lengths differ (parent 1: {parent1}, parent 2: {parent2}, target: {target})")]
    LengthMismatch {
        parent1: usize,
        parent2: usize,
        target: usize,
    },

    #[error("invalid allele '{found}' in {role} at locus {position} (expected H, D or R)")]
    InvalidCharacter {
        role: GenotypeRole,
        position: usize,
        found: char,
    },
}

impl CrossError {
    /// Short machine-readable kind, used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            CrossError::LengthMismatch { .. } => "length_mismatch",
            CrossError::InvalidCharacter { .. } => "invalid_character",
        }
    }
}

/// Why a locus rules the whole cross out
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Infeasibility {
    /// A homozygous-dominant parent always passes on a dominant allele
    DominantParentRecessiveTarget,
    /// A homozygous-recessive parent always passes on a recessive allele
    RecessiveParentDominantTarget,
    /// Two identical homozygous parents only produce that same homozygote
    HomozygousParentsHeterozygousTarget,
}

impl fmt::Display for Infeasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Infeasibility::DominantParentRecessiveTarget => {
                "homozygous dominant parent cannot yield a homozygous recessive offspring"
            }
            Infeasibility::RecessiveParentDominantTarget => {
                "homozygous recessive parent cannot yield a homozygous dominant offspring"
            }
            Infeasibility::HomozygousParentsHeterozygousTarget => {
                "identical homozygous parents cannot yield a heterozygous offspring"
            }
        };
        f.write_str(text)
    }
}

/// Exact probability 1/2^c, kept as the division count `c`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Odds {
    division_count: u32,
}

impl Odds {
    pub const CERTAIN: Odds = Odds { division_count: 0 };

    pub fn from_division_count(division_count: u32) -> Self {
        Self { division_count }
    }

    pub fn division_count(&self) -> u32 {
        self.division_count
    }

    /// `2^c`, or `None` once it no longer fits in a `u128`
    pub fn denominator(&self) -> Option<u128> {
        1u128.checked_shl(self.division_count)
    }

    /// Probability in percent, truncated to two decimal places
    pub fn percentage(&self) -> f64 {
        (self.probability() * 10_000.0).floor() / 100.0
    }

    pub fn probability(&self) -> f64 {
        // saturates to 0.0 long before the exponent overflows
        2f64.powi(-(self.division_count.min(i32::MAX as u32) as i32))
    }

    /// Combine the odds of two independent events
    pub fn and(self, other: Odds) -> Odds {
        Odds {
            division_count: self.division_count.saturating_add(other.division_count),
        }
    }
}

impl fmt::Display for Odds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.denominator() {
            Some(denominator) => write!(f, "1/{}", denominator),
            None => write!(f, "1/2^{}", self.division_count),
        }
    }
}

/// Result of a cross that passed input validation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CrossOutcome {
    /// Probability is exactly zero; `locus` is the first one that rules it out
    Impossible { locus: usize, reason: Infeasibility },
    /// Target occurs with probability 1/denominator
    Probability(Odds),
}

impl CrossOutcome {
    pub fn is_impossible(&self) -> bool {
        matches!(self, CrossOutcome::Impossible { .. })
    }

    pub fn odds(&self) -> Option<Odds> {
        match self {
            CrossOutcome::Probability(odds) => Some(*odds),
            CrossOutcome::Impossible { .. } => None,
        }
    }

    pub fn denominator(&self) -> Option<u128> {
        self.odds().and_then(|odds| odds.denominator())
    }
}

/// Contribution of one locus to the overall cross
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "verdict", content = "detail", rename_all = "snake_case")]
pub enum LocusVerdict {
    /// Number of independent 1-in-2 splits at this locus (0, 1 or 2)
    Split(u8),
    Blocked(Infeasibility),
}

/// Per-locus view of a cross, used to explain a result
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocusAssessment {
    pub index: usize,
    pub parent1: AlleleState,
    pub parent2: AlleleState,
    pub target: AlleleState,
    pub verdict: LocusVerdict,
}
