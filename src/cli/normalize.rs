use clap::Args;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::core::variant::{to_trimmed_convention, to_vcf_convention, TrimmedKey, VcfKey};

#[derive(Args)]
pub struct NormalizeArgs {
    /// Variant key as chrom:pos:ref:alt
    #[arg(required = true)]
    pub key: String,

    /// Convert a trimmed-convention key back to VCF convention
    #[arg(long, requires = "anchor")]
    pub reverse: bool,

    /// Reference base at the VCF position (needed for indels with --reverse)
    #[arg(long)]
    pub anchor: Option<char>,
}

#[derive(Serialize)]
struct Conversion {
    vcf: String,
    trimmed: String,
}

/// Execute normalize subcommand
///
/// # Errors
///
/// Returns an error if the key violates the allele or position contract.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: NormalizeArgs, format: OutputFormat, _verbose: bool) -> anyhow::Result<()> {
    let conversion = if args.reverse {
        let trimmed: TrimmedKey = args.key.parse()?;
        let anchor = args
            .anchor
            .ok_or_else(|| anyhow::anyhow!("--reverse requires --anchor"))?;
        let vcf = to_vcf_convention(&trimmed, anchor)?;
        Conversion {
            vcf: vcf.to_string(),
            trimmed: trimmed.to_string(),
        }
    } else {
        let vcf: VcfKey = args.key.parse()?;
        let trimmed = to_trimmed_convention(&vcf);
        Conversion {
            vcf: vcf.to_string(),
            trimmed: trimmed.to_string(),
        }
    };

    match format {
        OutputFormat::Text => {
            if args.reverse {
                println!("{}", conversion.vcf);
            } else {
                println!("{}", conversion.trimmed);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&conversion)?),
        OutputFormat::Tsv => {
            println!("vcf\ttrimmed");
            println!("{}\t{}", conversion.vcf, conversion.trimmed);
        }
    }
    Ok(())
}
