// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-sv CLI
//!
//! Command-line interface for structural variant junction reconstruction and
//! variant density layout.

use clap::{Parser, Subcommand};
use ferro_sv::annotation::{GeneFile, MockAnnotationProvider};
use ferro_sv::cli::{
    find_chromosome, output_allele, output_analysis, output_error, output_layout,
    parse_transcript_mode, read_json, read_variants, OutputFormat,
};
use ferro_sv::config::SvConfig;
use ferro_sv::junction::{Reconstructor, VariantAnalysis};
use ferro_sv::layout::{LayoutEngine, Viewport};
use ferro_sv::variant::{analyze_allele, analyze_variant, VariantRecord, VariantRequest};
use ferro_sv::FerroError;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "ferro-sv")]
#[command(author, version, about = "Structural variant junction reconstruction and variant layout")]
#[command(long_about = "Reconstruct the exon structures produced by structural variants and lay
out dense variant tracks.

Examples:
  ferro-sv allele G 'G]17:198982]'
  ferro-sv analyze --bundle annotation.json --variant del.json
  ferro-sv analyze --bundle annotation.json --vcf-file 7 --chromosome 1 --position 150
  ferro-sv layout -i variants.jsonl.gz --chromosome 1 --start 1 --end 100000 --width 1200
  ferro-sv config > .ferro-sv.toml")]
struct Cli {
    /// Configuration file (defaults to .ferro-sv.toml or ~/.config/ferro/sv.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. "info" or "ferro_sv=debug"
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an alternative allele against its reference
    Allele {
        /// Reference allele
        reference: String,

        /// Alternative allele (sequence, <SYMBOLIC> or breakend)
        alternate: String,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Reconstruct the alternative structures of a variant
    Analyze {
        /// Annotation bundle (reference, genes and variants) as JSON
        #[arg(long)]
        bundle: PathBuf,

        /// Variant record as JSON; otherwise the variant is loaded from the bundle
        #[arg(long, conflicts_with = "position")]
        variant: Option<PathBuf>,

        /// Variant file id for bundle lookups
        #[arg(long, default_value = "0")]
        vcf_file: u64,

        /// Chromosome id or name for bundle lookups
        #[arg(long, requires = "position")]
        chromosome: Option<String>,

        /// Variant position for bundle lookups
        #[arg(long, requires = "chromosome")]
        position: Option<u64>,

        /// Gene file id (defaults to the first available)
        #[arg(long)]
        gene_file: Option<u64>,

        /// Transcript selection (canonical or consensus)
        #[arg(long, value_parser = parse_transcript_mode)]
        transcript_mode: Option<ferro_sv::config::TranscriptMode>,

        /// Select another gene at a breakpoint, as INDEX:GENE (repeatable)
        #[arg(long = "select-gene")]
        select_gene: Vec<String>,

        /// Pin a transcript of an affected gene, as GENE:TRANSCRIPT (repeatable)
        #[arg(long = "select-transcript")]
        select_transcript: Vec<String>,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Aggregate variants into bubbles and assign lanes for a window
    Layout {
        /// Variant records as a JSON array or JSON Lines (.gz supported, - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Name of the displayed chromosome
        #[arg(long)]
        chromosome: String,

        /// First visible position (defaults to the first variant start)
        #[arg(long)]
        start: Option<u64>,

        /// Last visible position (defaults to the last variant end)
        #[arg(long)]
        end: Option<u64>,

        /// Track width in pixels
        #[arg(long, default_value = "1000")]
        width: f64,

        /// Keep aggregates collapsed
        #[arg(long)]
        collapsed: bool,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Allele {
            reference,
            alternate,
            format,
        } => run_allele(&reference, &alternate, parse_format(&format)),
        Commands::Analyze {
            bundle,
            variant,
            vcf_file,
            chromosome,
            position,
            gene_file,
            transcript_mode,
            select_gene,
            select_transcript,
            format,
        } => {
            let config = config.merge_with_cli(None, transcript_mode);
            let source = match (variant, chromosome, position) {
                (Some(path), _, _) => VariantSource::File(path),
                (None, Some(chromosome), Some(position)) => VariantSource::Bundle {
                    vcf_file,
                    chromosome,
                    position,
                },
                _ => {
                    return Err("either --variant or --chromosome with --position is required".into())
                }
            };
            let selections = Selections {
                genes: select_gene,
                transcripts: select_transcript,
            };
            run_analyze(
                &config,
                &bundle,
                source,
                gene_file,
                &selections,
                parse_format(&format),
            )
        }
        Commands::Layout {
            input,
            chromosome,
            start,
            end,
            width,
            collapsed,
            format,
        } => {
            let config = config.merge_with_cli(collapsed.then_some(true), None);
            let window = Window { start, end, width };
            run_layout(&config, &input, &chromosome, window, parse_format(&format))
        }
        Commands::Config { output, force } => run_config(&config, output.as_deref(), force),
    }
}

fn init_tracing(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_new(level).map_err(|e| format!("Invalid log level '{}': {}", level, e))?;

    // Library records emitted through `log` are bridged by the default tracing-log feature.
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    debug!("Tracing initialized with level: {}", level);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SvConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            Ok(SvConfig::load_from_path(path)?)
        }
        None => Ok(SvConfig::load().unwrap_or_default()),
    }
}

fn parse_format(format: &str) -> OutputFormat {
    // value_parser restricts the input, so this never fails
    OutputFormat::from_str(format).unwrap_or_default()
}

/// Report an error on stderr in the requested format and exit non-zero.
fn fail(input: &str, error: &FerroError, format: OutputFormat) -> ! {
    let mut stderr = io::stderr();
    let _ = output_error(&mut stderr, input, error, format);
    std::process::exit(1);
}

fn run_allele(
    reference: &str,
    alternate: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let allele = match analyze_allele(reference, alternate) {
        Ok(allele) => allele,
        Err(e) => fail(alternate, &e, format),
    };
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    output_allele(&mut writer, &allele, format)?;
    writer.flush()?;
    Ok(())
}

enum VariantSource {
    File(PathBuf),
    Bundle {
        vcf_file: u64,
        chromosome: String,
        position: u64,
    },
}

struct Selections {
    genes: Vec<String>,
    transcripts: Vec<String>,
}

fn split_pair<'a>(value: &'a str, flag: &str) -> Result<(&'a str, &'a str), String> {
    value
        .split_once(':')
        .filter(|(a, b)| !a.is_empty() && !b.is_empty())
        .ok_or_else(|| format!("Invalid {} value '{}'", flag, value))
}

fn run_analyze(
    config: &SvConfig,
    bundle: &Path,
    source: VariantSource,
    gene_file_id: Option<u64>,
    selections: &Selections,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let provider = MockAnnotationProvider::from_json(bundle)?;
    let context = provider.reference().clone();
    let reconstructor =
        Reconstructor::with_config(provider, context, config.reconstruction.clone());

    let selection = match reconstructor.pre_analyze() {
        Ok(selection) => selection,
        Err(e) => fail(&bundle.display().to_string(), &e, format),
    };
    let gene_file: GeneFile = match gene_file_id {
        Some(id) => selection
            .gene_files
            .into_iter()
            .find(|f| f.id == id)
            .ok_or_else(|| format!("Gene file {} is not available", id))?,
        None => selection.selected,
    };
    info!("Using gene file {} ({})", gene_file.name, gene_file.id);

    let (input, result) = match source {
        VariantSource::File(path) => {
            let record: VariantRecord = read_json(&path)?;
            let input = path.display().to_string();
            (input, reconstructor.analyze_record(&record, Some(&gene_file)))
        }
        VariantSource::Bundle {
            vcf_file,
            chromosome,
            position,
        } => {
            let resolved = find_chromosome(reconstructor.context(), &chromosome)
                .and_then(|c| c.id)
                .ok_or_else(|| format!("Unknown chromosome '{}'", chromosome))?;
            let request = VariantRequest::new(vcf_file, resolved, position);
            let input = format!("{}:{}", chromosome, position);
            (input, reconstructor.analyze(&request, Some(&gene_file)))
        }
    };
    let mut analysis = match result {
        Ok(analysis) => analysis,
        Err(e) => fail(&input, &e, format),
    };

    if let VariantAnalysis::Structural(structural) = &mut analysis {
        let placeholder = config.reconstruction.placeholder_length();
        for value in &selections.genes {
            let (index, gene) = split_pair(value, "--select-gene")?;
            let index: usize = index
                .parse()
                .map_err(|_| format!("Invalid breakpoint index '{}'", index))?;
            if let Err(e) = structural.change_affected_gene(index, gene, placeholder) {
                fail(value, &e, format);
            }
        }
        for value in &selections.transcripts {
            let (gene, transcript) = split_pair(value, "--select-transcript")?;
            if let Err(e) = structural.change_affected_transcript(gene, transcript, placeholder) {
                fail(value, &e, format);
            }
        }
    } else if !selections.genes.is_empty() || !selections.transcripts.is_empty() {
        warn!("Gene and transcript selection only applies to structural variants");
    }

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    output_analysis(&mut writer, &analysis, format)?;
    writer.flush()?;
    Ok(())
}

struct Window {
    start: Option<u64>,
    end: Option<u64>,
    width: f64,
}

fn run_layout(
    config: &SvConfig,
    input: &Path,
    chromosome: &str,
    window: Window,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let records = read_variants(input)?;
    info!("Read {} variant records from {}", records.len(), input.display());

    let mut variants = Vec::with_capacity(records.len());
    for record in &records {
        match analyze_variant(record, chromosome) {
            Ok(variant) => variants.push(variant),
            Err(e) => warn!(
                "Skipping variant at {}:{}: {}",
                record.chromosome_id, record.start_index, e
            ),
        }
    }

    let start = window
        .start
        .or_else(|| variants.iter().map(|v| v.start_index).min())
        .unwrap_or(1);
    let end = window
        .end
        .or_else(|| variants.iter().map(|v| v.end_index).max())
        .unwrap_or(start);
    let viewport = match Viewport::new(start, end, window.width) {
        Ok(viewport) => viewport,
        Err(e) => fail(&format!("{}-{}", start, end), &e, format),
    };

    let layout = LayoutEngine::new(config.layout.clone()).layout(&variants, &viewport);

    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    output_layout(&mut writer, &layout, &variants, format)?;
    writer.flush()?;
    Ok(())
}

fn run_config(
    config: &SvConfig,
    output: Option<&Path>,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            if path.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )
                .into());
            }
            config.to_file(path)?;
            info!("Wrote configuration to {}", path.display());
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(())
}
