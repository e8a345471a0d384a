use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::trace;

use crate::types::AlleleState;

lazy_static! {
    // `P=H`, `p : h`, ...
    static ref ENTRY: Regex = Regex::new(r"^\s*(\S)\s*[=:]\s*(\S+)\s*$").unwrap();
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("malformed symbol entry '{0}' (expected e.g. 'P=H')")]
    Malformed(String),

    #[error("unknown allele state '{state}' for symbol '{symbol}' (expected H, D or R)")]
    UnknownState { symbol: char, state: String },

    #[error("symbol '{symbol}' is mapped to both {first} and {second}")]
    Conflict {
        symbol: char,
        first: AlleleState,
        second: AlleleState,
    },

    #[error("symbol key '{0}' must be a single non-whitespace character")]
    InvalidKey(String),
}

/// Mapping from custom allele symbols to H/D/R.
///
/// Used for incomplete dominance, e.g. snapdragon colour where red (`R`) is
/// one homozygote, white (`W`) the other and pink (`P`) the heterozygote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, AlleleState>", into = "BTreeMap<String, AlleleState>")]
pub struct SymbolMap {
    entries: BTreeMap<char, AlleleState>,
}

impl SymbolMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the textual form `"R=D, W=R, P=H"`.
    pub fn parse(text: &str) -> Result<Self, SymbolError> {
        let mut map = Self::new();

        for entry in text.split(',').filter(|e| !e.trim().is_empty()) {
            let caps = ENTRY
                .captures(entry)
                .ok_or_else(|| SymbolError::Malformed(entry.trim().to_string()))?;

            let symbol = caps[1].chars().next().unwrap_or_default();
            let state_text = &caps[2];
            let state = parse_state(state_text).ok_or_else(|| SymbolError::UnknownState {
                symbol,
                state: state_text.to_string(),
            })?;

            map.insert(symbol, state)?;
        }

        Ok(map)
    }

    pub fn insert(&mut self, symbol: char, state: AlleleState) -> Result<(), SymbolError> {
        if symbol.is_whitespace() {
            return Err(SymbolError::InvalidKey(symbol.to_string()));
        }

        match self.entries.get(&symbol) {
            Some(&first) if first != state => Err(SymbolError::Conflict {
                symbol,
                first,
                second: state,
            }),
            _ => {
                self.entries.insert(symbol, state);
                Ok(())
            }
        }
    }

    /// Exact symbol first, then a case-insensitive match, so `B` and `b`
    /// can name different states while `p` still finds a `P` entry.
    pub fn get(&self, symbol: char) -> Option<AlleleState> {
        self.entries.get(&symbol).copied().or_else(|| {
            self.entries
                .iter()
                .find(|(key, _)| same_letter(**key, symbol))
                .map(|(_, state)| *state)
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for SymbolMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(symbol, state)| format!("{}={}", symbol, state))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

impl TryFrom<BTreeMap<String, AlleleState>> for SymbolMap {
    type Error = SymbolError;

    fn try_from(raw: BTreeMap<String, AlleleState>) -> Result<Self, Self::Error> {
        let mut map = Self::new();
        for (key, state) in raw {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(symbol), None) => map.insert(symbol, state)?,
                _ => return Err(SymbolError::InvalidKey(key)),
            }
        }
        Ok(map)
    }
}

impl From<SymbolMap> for BTreeMap<String, AlleleState> {
    fn from(map: SymbolMap) -> Self {
        map.entries
            .into_iter()
            .map(|(symbol, state)| (symbol.to_string(), state))
            .collect()
    }
}

/// Default symbol map plus per-locus overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    default: SymbolMap,
    per_locus: BTreeMap<usize, SymbolMap>,
}

impl SymbolTable {
    pub fn new(default: SymbolMap) -> Self {
        Self {
            default,
            per_locus: BTreeMap::new(),
        }
    }

    pub fn with_locus(mut self, index: usize, symbols: SymbolMap) -> Self {
        self.per_locus.insert(index, symbols);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_empty() && self.per_locus.values().all(SymbolMap::is_empty)
    }

    pub fn default_map(&self) -> &SymbolMap {
        &self.default
    }

    pub fn locus_overrides(&self) -> impl Iterator<Item = (usize, &SymbolMap)> {
        self.per_locus.iter().map(|(index, map)| (*index, map))
    }

    /// Translate an encoding to the canonical alphabet.
    ///
    /// Locus overrides win over the default map. Unmapped characters are kept
    /// as they are, so canonical symbols still work and anything else is
    /// rejected later by the evaluator.
    pub fn remap(&self, encoding: &str) -> String {
        let remapped: String = encoding
            .chars()
            .enumerate()
            .map(|(index, symbol)| {
                self.per_locus
                    .get(&index)
                    .and_then(|map| map.get(symbol))
                    .or_else(|| self.default.get(symbol))
                    .map(|state| state.symbol())
                    .unwrap_or(symbol)
            })
            .collect();

        trace!(input = encoding, output = %remapped, "remapped genotype symbols");
        remapped
    }
}

fn same_letter(a: char, b: char) -> bool {
    a.to_lowercase().eq(b.to_lowercase())
}

fn parse_state(text: &str) -> Option<AlleleState> {
    match text.to_lowercase().as_str() {
        "h" | "het" | "heterozygous" => Some(AlleleState::Heterozygous),
        "d" | "dom" | "dominant" => Some(AlleleState::HomozygousDominant),
        "r" | "rec" | "recessive" => Some(AlleleState::HomozygousRecessive),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbol_map() {
        let map = SymbolMap::parse("R=D, w:r ,P = heterozygous").unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get('r'), Some(AlleleState::HomozygousDominant));
        assert_eq!(map.get('W'), Some(AlleleState::HomozygousRecessive));
        assert_eq!(map.get('p'), Some(AlleleState::Heterozygous));
        assert_eq!(map.to_string(), "P=H, R=D, w=R");
    }

    #[test]
    fn test_parse_rejects_bad_entries() {
        assert_eq!(
            SymbolMap::parse("PH"),
            Err(SymbolError::Malformed("PH".to_string()))
        );
        assert_eq!(
            SymbolMap::parse("P=Q"),
            Err(SymbolError::UnknownState {
                symbol: 'P',
                state: "Q".to_string(),
            })
        );
        assert!(matches!(
            SymbolMap::parse("P=H, P=D"),
            Err(SymbolError::Conflict { symbol: 'P', .. })
        ));
        // repeating the same mapping is harmless
        assert!(SymbolMap::parse("P=H, P=h").is_ok());
        assert!(SymbolMap::parse("").unwrap().is_empty());
    }

    #[test]
    fn test_case_distinguished_symbols() {
        let map = SymbolMap::parse("B=D, b=R, X=H").unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get('B'), Some(AlleleState::HomozygousDominant));
        assert_eq!(map.get('b'), Some(AlleleState::HomozygousRecessive));
        // no exact entry, falls back to the other case
        assert_eq!(map.get('x'), Some(AlleleState::Heterozygous));
    }

    #[test]
    fn test_multi_char_uppercase_does_not_collide() {
        let map = SymbolMap::parse("S=D").unwrap();
        assert_eq!(map.get('s'), Some(AlleleState::HomozygousDominant));
        assert_eq!(map.get('ß'), None);

        let map = SymbolMap::parse("S=D, ß=R").unwrap();
        assert_eq!(map.get('ß'), Some(AlleleState::HomozygousRecessive));
        assert_eq!(map.get('S'), Some(AlleleState::HomozygousDominant));
    }

    #[test]
    fn test_remap_prefers_locus_overrides() {
        let table = SymbolTable::new(SymbolMap::parse("R=D, W=R, P=H").unwrap())
            .with_locus(1, SymbolMap::parse("B=D, S=R, M=H").unwrap());

        assert_eq!(table.remap("RbP"), "DDH");
        assert_eq!(table.remap("wmx"), "RHx");
        // canonical symbols pass through where nothing maps them
        assert_eq!(table.remap("hH"), "hH");
    }

    #[test]
    fn test_empty_table_is_identity() {
        let table = SymbolTable::default();
        assert!(table.is_empty());
        assert_eq!(table.remap("HdR"), "HdR");
    }

    #[test]
    fn test_map_from_string_keys() {
        let mut raw = BTreeMap::new();
        raw.insert("p".to_string(), AlleleState::Heterozygous);
        let map = SymbolMap::try_from(raw).unwrap();
        assert_eq!(map.get('P'), Some(AlleleState::Heterozygous));

        let mut raw = BTreeMap::new();
        raw.insert("PP".to_string(), AlleleState::Heterozygous);
        assert_eq!(
            SymbolMap::try_from(raw),
            Err(SymbolError::InvalidKey("PP".to_string()))
        );
    }
}
