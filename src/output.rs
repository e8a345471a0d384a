use anyhow::{Context, Result};
use console::{style, StyledObject};
use csv::Writer;
use serde::Serialize;
use serde_json::to_string_pretty;

use crate::types::*;

/// Supported report formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Everything known about one evaluated cross, in serializable form
#[derive(Debug, Clone, Serialize)]
pub struct CrossReport {
    pub parent1: String,
    pub parent2: String,
    pub target: String,
    pub mode: InheritanceMode,
    pub outcome: &'static str,
    pub division_count: Option<u32>,
    pub denominator: Option<u128>,
    pub percentage: Option<f64>,
    pub blocked_locus: Option<usize>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loci: Option<Vec<LocusAssessment>>,
}

impl CrossReport {
    pub fn new(
        inputs: [&str; 3],
        mode: InheritanceMode,
        result: &Result<CrossOutcome, CrossError>,
    ) -> Self {
        let [parent1, parent2, target] = inputs;
        let mut report = Self {
            parent1: parent1.to_string(),
            parent2: parent2.to_string(),
            target: target.to_string(),
            mode,
            outcome: "",
            division_count: None,
            denominator: None,
            percentage: None,
            blocked_locus: None,
            message: String::new(),
            loci: None,
        };

        match result {
            Ok(CrossOutcome::Probability(odds)) => {
                report.outcome = "probability";
                report.division_count = Some(odds.division_count());
                report.denominator = odds.denominator();
                report.percentage = Some(odds.percentage());
                report.message = format!("target found in {} offspring", odds);
            }
            Ok(CrossOutcome::Impossible { locus, reason }) => {
                report.outcome = "impossible";
                report.blocked_locus = Some(*locus);
                report.message = reason.to_string();
            }
            Err(e) => {
                report.outcome = e.kind();
                report.message = e.to_string();
            }
        }

        report
    }

    pub fn with_loci(mut self, loci: Vec<LocusAssessment>) -> Self {
        self.loci = Some(loci);
        self
    }

    pub fn is_error(&self) -> bool {
        !matches!(self.outcome, "probability" | "impossible")
    }
}

/// Turns evaluation results into terminal text or report documents
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn paint<D>(&self, styled: StyledObject<D>) -> StyledObject<D> {
        if self.color {
            styled
        } else {
            styled.force_styling(false)
        }
    }

    /// One-line summary, e.g. `result: target found in 1/8 offspring 12.5%`
    pub fn render_line(&self, result: &Result<CrossOutcome, CrossError>) -> String {
        match result {
            Ok(CrossOutcome::Probability(odds)) => {
                let denominator = match odds.denominator() {
                    Some(d) => d.to_string(),
                    None => format!("2^{}", odds.division_count()),
                };
                format!(
                    "{} target found in {}/{} offspring {}",
                    self.paint(style("result:").green()),
                    self.paint(style("1").yellow()),
                    self.paint(style(denominator).yellow()),
                    self.paint(style(format!("{}%", odds.percentage())).yellow()),
                )
            }
            Ok(CrossOutcome::Impossible { .. }) => {
                format!("{} impossible target", self.paint(style("result:").red()))
            }
            Err(e) => self
                .paint(style(format!("failed: input error ({})", e)).red())
                .to_string(),
        }
    }

    /// Per-locus explanation lines
    pub fn render_loci(&self, loci: &[LocusAssessment]) -> Vec<String> {
        loci.iter()
            .map(|locus| {
                let verdict = match locus.verdict {
                    LocusVerdict::Split(0) => self.paint(style("certain".to_string()).green()),
                    LocusVerdict::Split(splits) => {
                        self.paint(style(format!("1/{}", 1u32 << splits)).yellow())
                    }
                    LocusVerdict::Blocked(reason) => self.paint(style(reason.to_string()).red()),
                };
                format!(
                    "  locus {:>3}: {} x {} -> {}  {}",
                    locus.index + 1,
                    locus.parent1,
                    locus.parent2,
                    locus.target,
                    verdict
                )
            })
            .collect()
    }

    pub fn render_report(&self, report: &CrossReport, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text(report)),
            ReportFormat::Json => {
                to_string_pretty(report).context("Failed to serialize cross report to JSON")
            }
            ReportFormat::Csv => render_csv(report),
        }
    }

    fn render_text(&self, report: &CrossReport) -> String {
        let line = match report.outcome {
            "probability" => {
                let odds = Odds::from_division_count(report.division_count.unwrap_or_default());
                self.render_line(&Ok(CrossOutcome::Probability(odds)))
            }
            "impossible" => format!("{} impossible target", self.paint(style("result:").red())),
            _ => self
                .paint(style(format!("failed: input error ({})", report.message)).red())
                .to_string(),
        };

        let mut lines = vec![line];
        if let Some(loci) = &report.loci {
            lines.extend(self.render_loci(loci));
        }
        lines.join("\n")
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    parent1: &'a str,
    parent2: &'a str,
    target: &'a str,
    mode: InheritanceMode,
    outcome: &'a str,
    division_count: Option<u32>,
    denominator: Option<String>,
    percentage: Option<f64>,
    blocked_locus: Option<usize>,
    message: &'a str,
}

fn render_csv(report: &CrossReport) -> Result<String> {
    let mut writer = Writer::from_writer(vec![]);
    writer
        .serialize(CsvRow {
            parent1: &report.parent1,
            parent2: &report.parent2,
            target: &report.target,
            mode: report.mode,
            outcome: report.outcome,
            division_count: report.division_count,
            denominator: report.denominator.map(|d| d.to_string()),
            percentage: report.percentage,
            blocked_locus: report.blocked_locus,
            message: &report.message,
        })
        .context("Failed to write CSV row")?;

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}
