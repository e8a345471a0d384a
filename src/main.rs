use anyhow::{bail, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::{generate, Shell};
use console::style;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

use cross_probability::{
    CrossConfig, CrossEvaluator, CrossReport, InheritanceMode, InteractiveSession, Renderer,
    ReportFormat, SymbolMap, SymbolTable, TerminalPrompt,
};

/// Mendelian cross probability calculator
#[derive(Parser, Debug)]
#[command(
    name = "cross-probability",
    version,
    about = "Probability that a cross between two parents yields a target genotype",
    long_about = r#"
Genotypes are written one symbol per locus:
  H - heterozygous          (Aa)
  D - homozygous dominant   (AA)
  R - homozygous recessive  (aa)

e.g. aaBBCc -> RDH. Input is case-insensitive.

For incomplete dominance, map your own symbols onto H/D/R with --symbols,
e.g. --symbols "R=D,W=R,P=H" for red, white and pink flowers.
"#
)]
struct Cli {
    /// Inheritance mode
    #[arg(short, long, value_enum, global = true)]
    mode: Option<InheritanceMode>,

    /// Custom symbol mapping for incomplete dominance, e.g. "R=D,W=R,P=H"
    #[arg(short, long, value_name = "MAP", global = true)]
    symbols: Option<String>,

    /// TOML settings file
    #[arg(short, long, value_name = "FILE", value_hint = ValueHint::FilePath, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Show the per-locus breakdown
    #[arg(long, global = true)]
    explain: bool,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Subcommands
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate a single cross
    Cross {
        /// First parent genotype
        parent1: String,
        /// Second parent genotype
        parent2: String,
        /// Target offspring genotype
        target: String,
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,
    },
    /// Prompt for crosses until told to stop (default)
    Interactive,
    /// Generate shell completions
    Completions { shell: Shell },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Handle shell completions
    if let Some(Commands::Completions { shell }) = &cli.command {
        generate_completions(*shell);
        return Ok(ExitCode::SUCCESS);
    }

    // Initialize logging
    init_logging(cli.verbose);

    let config = AppConfig::resolve(&cli)?;
    info!("Mode: {:?}, explain: {}", config.mode, config.explain);

    match &cli.command {
        Some(Commands::Cross {
            parent1,
            parent2,
            target,
            format,
        }) => run_cross(
            &config,
            [parent1.as_str(), parent2.as_str(), target.as_str()],
            *format,
        ),
        _ => {
            run_interactive(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("cross_probability={}", level))
        .with_writer(io::stderr)
        .init();
}

fn run_cross(config: &AppConfig, inputs: [&str; 3], format: ReportFormat) -> Result<ExitCode> {
    let report = build_report(config, inputs)?;

    let renderer = Renderer::new(config.color);
    println!("{}", renderer.render_report(&report, format)?);

    Ok(ExitCode::from(exit_status(&report)))
}

fn build_report(config: &AppConfig, inputs: [&str; 3]) -> Result<CrossReport> {
    let [parent1, parent2, target] = inputs;
    let evaluator = config.evaluator();
    let result = evaluator.evaluate(parent1, parent2, target);

    let mut report = CrossReport::new(inputs, config.mode, &result);
    if config.explain && result.is_ok() {
        report = report.with_loci(evaluator.breakdown(parent1, parent2, target)?);
    }
    Ok(report)
}

/// 0 for any evaluated outcome, 2 for input errors
fn exit_status(report: &CrossReport) -> u8 {
    if report.is_error() {
        2
    } else {
        0
    }
}

fn run_interactive(config: &AppConfig) -> Result<()> {
    println!(
        "{}",
        style("╔══════════════════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║        Cross Probability - Interactive Mode                  ║")
            .cyan()
            .bold()
    );
    println!(
        "{}",
        style("╚══════════════════════════════════════════════════════════════╝").cyan()
    );
    println!(
        "  {} H = heterozygous, D = homozygous dominant, R = homozygous recessive",
        style("alleles:").dim()
    );
    if config.mode == InheritanceMode::Incomplete {
        println!(
            "  {} {}",
            style("symbols:").dim(),
            style(config.symbols.default_map()).yellow()
        );
        for (index, map) in config.symbols.locus_overrides() {
            println!(
                "  {} {}",
                style(format!("locus {}:", index + 1)).dim(),
                style(map).yellow()
            );
        }
    }
    println!();

    let session = InteractiveSession::new(
        TerminalPrompt::new(),
        io::stdout(),
        config.evaluator(),
        Renderer::new(config.color),
    )
    .explain(config.explain);

    let summary = session.run()?;
    info!("Evaluated {} crosses", summary.crosses);
    Ok(())
}

#[derive(Debug)]
struct AppConfig {
    mode: InheritanceMode,
    symbols: SymbolTable,
    color: bool,
    explain: bool,
}

impl AppConfig {
    /// Settings file first, then command-line overrides
    fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => CrossConfig::load(path)?,
            None => CrossConfig::default(),
        };

        let mut symbols = file.symbol_table();
        let mut mode = file.mode;

        if let Some(text) = &cli.symbols {
            let map = SymbolMap::parse(text)?;
            symbols = file
                .loci
                .iter()
                .fold(SymbolTable::new(map), |table, locus| {
                    table.with_locus(locus.index, locus.symbols.clone())
                });
            mode = InheritanceMode::Incomplete;
        }

        if let Some(explicit) = cli.mode {
            mode = explicit;
        }

        if mode == InheritanceMode::Incomplete && symbols.is_empty() {
            bail!("Incomplete dominance mode needs a symbol mapping (--symbols or [symbols] in the config file)");
        }

        Ok(Self {
            mode,
            symbols,
            color: file.color && !cli.no_color,
            explain: file.explain || cli.explain,
        })
    }

    fn evaluator(&self) -> CrossEvaluator {
        match self.mode {
            InheritanceMode::Basic => CrossEvaluator::new(),
            InheritanceMode::Incomplete => CrossEvaluator::with_symbols(self.symbols.clone()),
        }
    }
}
