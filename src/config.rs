use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::parsers::{SymbolMap, SymbolTable};
use crate::types::InheritanceMode;

/// Settings file contents, e.g.
///
/// ```toml
/// mode = "incomplete"
/// color = true
///
/// [symbols]
/// R = "D"
/// W = "R"
/// P = "H"
///
/// [[locus]]
/// index = 1
/// symbols = { B = "D", b = "R", X = "H" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CrossConfig {
    pub mode: InheritanceMode,
    pub color: bool,
    pub explain: bool,
    pub symbols: SymbolMap,
    #[serde(rename = "locus")]
    pub loci: Vec<LocusSymbols>,
}

/// Symbol overrides for a single locus (zero-based index)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LocusSymbols {
    pub index: usize,
    pub symbols: SymbolMap,
}

impl Default for CrossConfig {
    fn default() -> Self {
        Self {
            mode: InheritanceMode::Basic,
            color: true,
            explain: false,
            symbols: SymbolMap::new(),
            loci: Vec::new(),
        }
    }
}

impl CrossConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: CrossConfig = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!(
            "Loaded config from {} ({} symbols, {} locus overrides)",
            path.display(),
            config.symbols.len(),
            config.loci.len()
        );

        if config.mode == InheritanceMode::Basic && config.has_symbols() {
            warn!("Symbol mappings are ignored in basic mode");
        }

        Ok(config)
    }

    pub fn has_symbols(&self) -> bool {
        !self.symbols.is_empty() || self.loci.iter().any(|l| !l.symbols.is_empty())
    }

    pub fn symbol_table(&self) -> SymbolTable {
        self.loci.iter().fold(
            SymbolTable::new(self.symbols.clone()),
            |table, locus| table.with_locus(locus.index, locus.symbols.clone()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AlleleState;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "mode = \"incomplete\"")?;
        writeln!(file, "color = false")?;
        writeln!(file, "[symbols]")?;
        writeln!(file, "R = \"D\"")?;
        writeln!(file, "w = \"recessive\"")?;
        writeln!(file, "P = \"H\"")?;
        writeln!(file, "[[locus]]")?;
        writeln!(file, "index = 1")?;
        writeln!(file, "symbols = {{ B = \"D\", S = \"R\", M = \"H\" }}")?;

        let config = CrossConfig::load(file.path())?;
        assert_eq!(config.mode, InheritanceMode::Incomplete);
        assert!(!config.color);
        assert!(!config.explain);
        assert_eq!(config.symbols.get('W'), Some(AlleleState::HomozygousRecessive));
        assert_eq!(config.loci.len(), 1);

        let table = config.symbol_table();
        assert_eq!(table.remap("RBP"), "DDH");
        Ok(())
    }

    #[test]
    fn test_case_distinguished_locus_symbols() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"mode = "incomplete"   # or "basic"
color = true
explain = false
[symbols]             # default symbol map
R = "D"
W = "R"
P = "H"
[[locus]]             # optional per-locus override
index = 1
symbols = {{ B = "D", b = "R", X = "H" }}
"#
        )?;

        let config = CrossConfig::load(file.path())?;
        assert_eq!(config.loci[0].symbols.len(), 3);

        let table = config.symbol_table();
        assert_eq!(table.remap("RBP"), "DDH");
        assert_eq!(table.remap("RbP"), "DRH");
        assert_eq!(table.remap("WxW"), "RHR");
        Ok(())
    }

    #[test]
    fn test_defaults_when_file_is_empty() -> Result<()> {
        let file = NamedTempFile::new()?;
        let config = CrossConfig::load(file.path())?;
        assert_eq!(config, CrossConfig::default());
        assert!(!config.has_symbols());
        Ok(())
    }

    #[test]
    fn test_rejects_bad_symbol_keys() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "[symbols]")?;
        writeln!(file, "RR = \"D\"")?;
        assert!(CrossConfig::load(file.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = CrossConfig::load(Path::new("/nonexistent/cross.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
