use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueHint};
use clap_complete::{generate, Shell};
use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pgx_risk::discovery::{patient_id_from_path, FileDiscovery};
use pgx_risk::{
    AnalysisReport, AnalysisService, Catalog, Drug, ExplanationService, Gene, MatchStrategy,
    PgxError, ReportFormat, ReportGenerator, Settings,
};

/// Pharmacogenomic drug-risk assessment from VCF files
#[derive(Parser, Debug)]
#[command(
    name = "pgx-risk",
    version,
    about = "Classify drug risk from pharmacogenomic variants in a VCF",
    long_about = r#"
Reads a VCF, extracts the variants of the drug's primary gene, infers star
alleles and a diplotype, resolves the metabolizer phenotype and reports the
clinical risk rule for the drug.

Supported drugs: CODEINE, WARFARIN, CLOPIDOGREL, SIMVASTATIN, AZATHIOPRINE,
FLUOROURACIL.
"#
)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Interactive mode with prompts for all parameters
    #[arg(short, long, global = true)]
    interactive: bool,

    /// Settings file (TOML)
    #[arg(short, long, global = true, env = "PGX_CONFIG", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Number of threads (0 = auto)
    #[arg(short, long, global = true, default_value = "0")]
    threads: usize,

    /// Enable verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one VCF for one drug
    Analyze {
        /// VCF file (.vcf or .vcf.gz)
        #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
        vcf: PathBuf,

        /// Drug to assess
        #[arg(short, long, value_enum, ignore_case = true)]
        drug: Drug,

        /// Patient identifier (defaults to the file name)
        #[arg(short, long)]
        patient_id: Option<String>,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// Analyze every VCF under the given paths
    Batch {
        /// VCF files or directories
        #[arg(required = true, num_args = 1.., value_hint = ValueHint::AnyPath)]
        paths: Vec<PathBuf>,

        /// Drugs to assess (default: all)
        #[arg(short, long, value_enum, ignore_case = true, num_args = 1..)]
        drug: Vec<Drug>,

        /// Recursively search directories
        #[arg(short, long)]
        recursive: bool,

        #[command(flatten)]
        report: ReportArgs,
    },
    /// List supported genes
    Genes,
    /// List supported drugs and their primary genes
    Drugs,
    /// Generate shell completions
    Completions { shell: Shell },
}

#[derive(clap::Args, Debug, Clone)]
struct ReportArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: ReportFormat,

    /// Output directory for reports (JSON goes to stdout when omitted)
    #[arg(short, long, value_hint = ValueHint::DirPath)]
    output: Option<PathBuf>,

    /// Match by gene coordinates only, ignoring annotations
    #[arg(long)]
    coordinates_only: bool,
}

impl ReportArgs {
    fn strategy(&self) -> MatchStrategy {
        if self.coordinates_only {
            MatchStrategy::CoordinatesOnly
        } else {
            MatchStrategy::Auto
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        generate_completions(shell);
        return Ok(());
    }

    init_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())?;
    let catalog = Catalog::standard();
    catalog.validate()?;

    let command = if cli.interactive {
        run_interactive_mode()?
    } else {
        match cli.command {
            Some(command) => command,
            None => {
                Cli::command().print_help()?;
                return Ok(());
            }
        }
    };

    let result = match command {
        Commands::Genes => {
            list_genes(&catalog);
            Ok(())
        }
        Commands::Drugs => {
            list_drugs();
            Ok(())
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
        Commands::Analyze {
            vcf,
            drug,
            patient_id,
            report,
        } => run_analyze(&catalog, &settings, &vcf, drug, patient_id, &report),
        Commands::Batch {
            paths,
            drug,
            recursive,
            report,
        } => init_thread_pool(cli.threads)
            .and_then(|_| run_batch(&catalog, &settings, &paths, &drug, recursive, &report)),
    };

    // Rejected input exits with 2, anything else with anyhow's default
    if let Err(e) = &result {
        if let Some(pgx) = e.downcast_ref::<PgxError>() {
            if pgx.is_input_error() {
                eprintln!("{} {:#}", style("error:").red().bold(), e);
                std::process::exit(2);
            }
        }
    }
    result
}

fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

fn list_genes(catalog: &Catalog) {
    println!("{}", style("Supported Genes:").bold().cyan());
    println!();

    for gene in Gene::ALL {
        let Some(profile) = catalog.profile(gene) else {
            continue;
        };
        let mut alleles: Vec<&str> = profile
            .star_alleles
            .values()
            .map(|hit| hit.star_allele.as_str())
            .collect();
        alleles.sort_unstable();
        alleles.dedup();
        let phenotypes: Vec<&str> = profile
            .phenotypes
            .phenotypes()
            .iter()
            .map(|p| p.abbreviation())
            .collect();

        println!(
            "  {} - {}",
            style(gene).green().bold(),
            style(format!(
                "chr{}:{}-{}",
                profile.region.chromosome, profile.region.start, profile.region.end
            ))
            .yellow()
        );
        println!(
            "         {}",
            style(format!(
                "alleles {} | phenotypes {}",
                alleles.join(", "),
                phenotypes.join(", ")
            ))
            .dim()
        );
    }
}

fn list_drugs() {
    println!("{}", style("Supported Drugs:").bold().cyan());
    println!();

    for drug in Drug::ALL {
        println!(
            "  {} - {}",
            style(drug).green().bold(),
            style(drug.primary_gene()).yellow()
        );
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pgx_risk={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn init_thread_pool(threads: usize) -> Result<()> {
    let num_threads = if threads == 0 {
        num_cpus::get()
    } else {
        threads
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .map_err(|e| anyhow::anyhow!("Failed to initialize thread pool: {}", e))?;

    Ok(())
}

fn run_analyze(
    catalog: &Catalog,
    settings: &Settings,
    vcf: &Path,
    drug: Drug,
    patient_id: Option<String>,
    args: &ReportArgs,
) -> Result<()> {
    let explanations = ExplanationService::from_settings(&settings.llm);
    let service = AnalysisService::new(catalog, &settings.limits, &explanations)
        .with_strategy(args.strategy());

    let patient_id = patient_id.unwrap_or_else(|| patient_id_from_path(vcf));
    let report = service
        .analyze_path(vcf, &patient_id, drug)
        .with_context(|| format!("Failed to analyze {}", vcf.display()))?;

    emit_reports(&[report], args)
}

fn run_batch(
    catalog: &Catalog,
    settings: &Settings,
    paths: &[PathBuf],
    drugs: &[Drug],
    recursive: bool,
    args: &ReportArgs,
) -> Result<()> {
    let drugs: Vec<Drug> = if drugs.is_empty() {
        Drug::ALL.to_vec()
    } else {
        drugs.to_vec()
    };

    let files = FileDiscovery::new(recursive).discover(paths)?;
    if files.is_empty() {
        warn!("No VCF files found");
        return Ok(());
    }
    info!(
        "Found {} VCF files, {} drugs, {} threads",
        files.len(),
        drugs.len(),
        rayon::current_num_threads()
    );

    let explanations = ExplanationService::from_settings(&settings.llm);
    let service = AnalysisService::new(catalog, &settings.limits, &explanations)
        .with_strategy(args.strategy());

    let jobs: Vec<(&PathBuf, Drug)> = files
        .iter()
        .flat_map(|file| drugs.iter().map(move |drug| (file, *drug)))
        .collect();

    let pb = ProgressBar::new(jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message("Analyzing...");

    let reports: Vec<AnalysisReport> = jobs
        .par_iter()
        .filter_map(|(path, drug)| {
            let result = service.analyze_path(path, &patient_id_from_path(path), *drug);
            pb.inc(1);
            match result {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!("Failed to analyze {} for {}: {}", path.display(), drug, e);
                    None
                }
            }
        })
        .collect();

    pb.finish_with_message("Analysis complete!");

    let failed = jobs.len() - reports.len();
    if failed > 0 {
        eprintln!(
            "{} {} of {} analyses failed (rerun with -v for details)",
            style("!").yellow().bold(),
            failed,
            jobs.len()
        );
    }

    emit_reports(&reports, args)
}

fn emit_reports(reports: &[AnalysisReport], args: &ReportArgs) -> Result<()> {
    let Some(output) = &args.output else {
        let json = if reports.len() == 1 {
            serde_json::to_string_pretty(&reports[0])?
        } else {
            serde_json::to_string_pretty(reports)?
        };
        println!("{}", json);
        return Ok(());
    };

    let generator = ReportGenerator::new(output)?;
    let written = generator.generate(reports, args.format)?;

    println!(
        "\n{} {} report file(s) saved to: {}",
        style("✓").green().bold(),
        written.len(),
        style(output.display()).cyan()
    );

    Ok(())
}

fn run_interactive_mode() -> Result<Commands> {
    println!(
        "{}",
        style("╔══════════════════════════════════════════════════════════════╗").cyan()
    );
    println!(
        "{}",
        style("║        Pharmacogenomic Risk Analysis - Interactive Mode      ║")
            .cyan()
            .bold()
    );
    println!(
        "{}",
        style("╚══════════════════════════════════════════════════════════════╝").cyan()
    );
    println!();

    let theme = ColorfulTheme::default();

    let vcf: String = Input::with_theme(&theme)
        .with_prompt("VCF file")
        .interact_text()?;
    let vcf = PathBuf::from(vcf.trim());

    let patient_id: String = Input::with_theme(&theme)
        .with_prompt("Patient identifier")
        .default(patient_id_from_path(&vcf))
        .interact_text()?;

    let drug_names: Vec<&str> = Drug::ALL.iter().map(|d| d.name()).collect();
    let drug_idx = Select::with_theme(&theme)
        .with_prompt("Select drug")
        .default(0)
        .items(&drug_names)
        .interact()?;
    let drug = Drug::ALL[drug_idx];

    let coordinates_only = !Confirm::with_theme(&theme)
        .with_prompt("Use INFO annotations to locate gene variants?")
        .default(true)
        .interact()?;

    let formats = ["JSON", "CSV", "TSV", "HTML", "All formats"];
    let format_idx = Select::with_theme(&theme)
        .with_prompt("Select output format")
        .default(0)
        .items(&formats)
        .interact()?;

    let format = match format_idx {
        0 => ReportFormat::Json,
        1 => ReportFormat::Csv,
        2 => ReportFormat::Tsv,
        3 => ReportFormat::Html,
        _ => ReportFormat::All,
    };

    let output: String = Input::with_theme(&theme)
        .with_prompt("Output directory")
        .default("./reports".to_string())
        .interact_text()?;

    Ok(Commands::Analyze {
        vcf,
        drug,
        patient_id: Some(patient_id),
        report: ReportArgs {
            format,
            output: Some(PathBuf::from(output)),
            coordinates_only,
        },
    })
}
