use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use crate::cli::{parse_assembly, parse_category, OutputFormat};
use crate::config::RunConfig;
use crate::core::types::{AnalysisMode, Assembly, Category};
use crate::pipeline::run_pipeline;
use crate::report::{
    write_diplotypes_tsv, write_outputs, write_results_tsv, write_summary_text, JsonReport,
};

#[derive(Args)]
pub struct RunArgs {
    /// Run configuration (JSON)
    #[arg(short, long, required = true)]
    pub config: PathBuf,

    /// Output directory (overrides the configuration)
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Sample name used as output prefix (overrides the configuration)
    #[arg(long)]
    pub sample: Option<String>,

    /// Analysis mode (overrides the configuration)
    #[arg(long, value_enum)]
    pub mode: Option<AnalysisMode>,

    /// Minimum database review confidence, 0-4 (overrides the configuration)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=4))]
    pub evidence_level: Option<u8>,

    /// Genome assembly, 37 or 38 (overrides the configuration)
    #[arg(long, value_parser = parse_assembly)]
    pub assembly: Option<Assembly>,

    /// Comma-separated categories to run: pr, rr, fg
    #[arg(long, value_delimiter = ',', value_parser = parse_category)]
    pub categories: Vec<Category>,
}

impl RunArgs {
    fn apply(&self, config: &mut RunConfig) {
        if let Some(out_dir) = &self.out_dir {
            config.out_dir.clone_from(out_dir);
        }
        if let Some(sample) = &self.sample {
            config.sample.clone_from(sample);
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(level) = self.evidence_level {
            config.evidence_level = level;
        }
        if let Some(assembly) = self.assembly {
            config.assembly = assembly;
        }
        if !self.categories.is_empty() {
            config.categories.clone_from(&self.categories);
        }
    }
}

/// Execute run subcommand
///
/// # Errors
///
/// Returns an error if the configuration is invalid, outputs cannot be
/// written, or any category failed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: RunArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut config = RunConfig::load_from_file(&args.config)?;
    args.apply(&mut config);

    let output = run_pipeline(&config)?;
    let written = write_outputs(&config, &output)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => {
            write_summary_text(&mut out, &output)?;
            if verbose {
                for path in &written {
                    writeln!(out, "wrote {}", path.display())?;
                }
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &JsonReport::new(&config, &output))?;
            writeln!(out)?;
        }
        OutputFormat::Tsv => {
            for report in &output.risk {
                writeln!(out, "# {}", report.category)?;
                write_results_tsv(&mut out, report)?;
            }
            if let Some(pgx) = &output.pharmacogenomic {
                writeln!(out, "# {}", Category::Pharmacogenomic)?;
                write_diplotypes_tsv(&mut out, &pgx.diplotypes)?;
            }
        }
    }

    if !output.failures.is_empty() {
        anyhow::bail!(
            "{} of {} categories failed",
            output.failures.len(),
            config.selected_categories().len()
        );
    }
    Ok(())
}
