use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use crate::catalog::pgx::PharmacoVariantCatalog;
use crate::catalog::phenotypes::DiplotypePhenotypeTable;
use crate::catalog::rules::DiplotypeRuleSet;
use crate::cli::OutputFormat;
use crate::parsing::vcf::parse_overlap_vcf;
use crate::pipeline::pharmacogenomic_report;
use crate::report::{write_diplotypes_text, write_diplotypes_tsv, write_pgx_variants_tsv};

#[derive(Args)]
pub struct DiplotypeArgs {
    /// Overlap VCF of the sample with the pharmacogenomic regions
    #[arg(required = true)]
    pub input: PathBuf,

    /// Pharmacogenomic variant catalog (JSON)
    #[arg(long, required = true)]
    pub variants: PathBuf,

    /// Diplotype phenotype table (CSV)
    #[arg(long)]
    pub phenotypes: Option<PathBuf>,

    /// Diplotype rule file replacing the built-in rules
    #[arg(long)]
    pub rules: Option<PathBuf>,

    /// Also list every overlap record with its catalog annotation
    #[arg(long)]
    pub show_variants: bool,
}

/// Execute diplotype subcommand
///
/// # Errors
///
/// Returns an error if an input cannot be read or parsed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: DiplotypeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let catalog = PharmacoVariantCatalog::load_from_file(&args.variants)?;
    let rules = match &args.rules {
        Some(path) => DiplotypeRuleSet::load_from_file(path)?,
        None => DiplotypeRuleSet::load_embedded()?,
    };
    let phenotypes = match &args.phenotypes {
        Some(path) => DiplotypePhenotypeTable::load_from_file(path)?,
        None => DiplotypePhenotypeTable::new(),
    };
    let overlap = parse_overlap_vcf(&args.input)?;

    if verbose {
        eprintln!(
            "{} overlap records, {} catalog sites, {} genes with rules",
            overlap.len(),
            catalog.len(),
            rules.len()
        );
    }

    let report = pharmacogenomic_report(&overlap, &catalog, &rules, &phenotypes);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => {
            if args.show_variants {
                for variant in &report.variants {
                    writeln!(
                        out,
                        "{}\t{}\t{}",
                        variant.key,
                        variant.genotype_code,
                        variant.gene.as_deref().unwrap_or("-")
                    )?;
                }
                writeln!(out)?;
            }
            writeln!(out, "Diplotypes:")?;
            write_diplotypes_text(&mut out, &report.diplotypes)?;
        }
        OutputFormat::Json => {
            if args.show_variants {
                serde_json::to_writer_pretty(&mut out, &report)?;
            } else {
                serde_json::to_writer_pretty(&mut out, &report.diplotypes)?;
            }
            writeln!(out)?;
        }
        OutputFormat::Tsv => {
            if args.show_variants {
                write_pgx_variants_tsv(&mut out, &report.variants)?;
                writeln!(out)?;
            }
            write_diplotypes_tsv(&mut out, &report.diplotypes)?;
        }
    }
    Ok(())
}
