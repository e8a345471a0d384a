use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use std::io::Write;
use tracing::{debug, info};

use crate::analysis::CrossEvaluator;
use crate::output::Renderer;

/// Source of genotype strings and loop decisions for an interactive session
pub trait CrossPrompt {
    fn read_genotype(&mut self, label: &str) -> Result<String>;

    /// Whether to evaluate another cross
    fn ask_again(&mut self) -> Result<bool>;
}

/// Terminal prompts backed by dialoguer
pub struct TerminalPrompt {
    theme: ColorfulTheme,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl CrossPrompt for TerminalPrompt {
    fn read_genotype(&mut self, label: &str) -> Result<String> {
        Input::with_theme(&self.theme)
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
            .with_context(|| format!("Failed to read {}", label))
    }

    fn ask_again(&mut self) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt("Again?")
            .default(false)
            .interact()
            .context("Failed to read confirmation")
    }
}

/// Counts for a finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub crosses: usize,
    pub input_errors: usize,
}

/// Prompt, evaluate, print, repeat
pub struct InteractiveSession<P, W> {
    prompt: P,
    out: W,
    evaluator: CrossEvaluator,
    renderer: Renderer,
    explain: bool,
}

impl<P: CrossPrompt, W: Write> InteractiveSession<P, W> {
    pub fn new(prompt: P, out: W, evaluator: CrossEvaluator, renderer: Renderer) -> Self {
        Self {
            prompt,
            out,
            evaluator,
            renderer,
            explain: false,
        }
    }

    /// Print the per-locus breakdown after each result
    pub fn explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    pub fn run(mut self) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();

        loop {
            let parent1 = self.prompt.read_genotype("Parent 1")?;
            let parent2 = self.prompt.read_genotype("Parent 2")?;
            let target = self.prompt.read_genotype("Target")?;

            let result = self.evaluator.evaluate(&parent1, &parent2, &target);
            summary.crosses += 1;
            if result.is_err() {
                summary.input_errors += 1;
            }
            debug!(?result, "interactive cross");

            writeln!(self.out, "{}", self.renderer.render_line(&result))
                .context("Failed to write result")?;

            if self.explain && result.is_ok() {
                let loci = self.evaluator.breakdown(&parent1, &parent2, &target)?;
                for line in self.renderer.render_loci(&loci) {
                    writeln!(self.out, "{}", line).context("Failed to write result")?;
                }
            }

            if !self.prompt.ask_again()? {
                break;
            }
        }

        info!(
            "Session finished: {} crosses, {} input errors",
            summary.crosses, summary.input_errors
        );
        Ok(summary)
    }
}
