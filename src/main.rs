use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cramers_assoc::association::{
    exhaustive_pairs, sample_pairs, select_snps, AssociationDriver, AssociationError,
    AssociationWriter, SingleVsAll,
};
use cramers_assoc::features::{read_features, SnpLabel, SubsetFilter};
use cramers_assoc::RunConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cramers-assoc", about = "SNP association scores using Cramér's V")]
struct Cli {
    /// Work directory holding project_summary.json and features.json.
    #[arg(long)]
    workdir: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute pairwise association of SNPs.
    Pairwise {
        /// Score this many randomly sampled distinct pairs instead of all pairs.
        #[arg(long = "n-samples")]
        n_samples: Option<usize>,
        /// File of `chromosome position` lines restricting the first set.
        #[arg(long = "subset-1")]
        subset_1: Option<PathBuf>,
        /// File of `chromosome position` lines restricting the second set.
        #[arg(long = "subset-2")]
        subset_2: Option<PathBuf>,
        /// Output file name inside the statistics directory.
        #[arg(long = "output-fl")]
        output_fl: Option<String>,
        /// Seed for pair sampling (default: from entropy).
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Compute pairwise association versus a single SNP.
    PairwiseSingle {
        /// Chromosome of the query SNP.
        #[arg(long)]
        chrom: String,
        /// Position of the query SNP.
        #[arg(long)]
        pos: u64,
    },
    /// Calculate association versus population structure.
    Populations,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("cramers_assoc=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = RunConfig::new(&cli.workdir)?;
    config.ensure_stats_dir()?;
    let features = read_features(config.workdir())
        .with_context(|| format!("failed to load features from {}", config.workdir().display()))?;
    let driver = AssociationDriver::new(&features);

    match cli.command {
        Commands::Pairwise {
            n_samples,
            subset_1,
            subset_2,
            output_fl,
            seed,
        } => run_pairwise(
            &driver,
            &config,
            n_samples,
            subset_1.as_deref(),
            subset_2.as_deref(),
            output_fl.as_deref(),
            seed,
        )?,
        Commands::PairwiseSingle { chrom, pos } => {
            run_pairwise_single(&driver, &config, SnpLabel::new(chrom, pos))?
        }
        Commands::Populations => run_populations(&driver, &config)?,
    }

    Ok(())
}

fn run_pairwise(
    driver: &AssociationDriver<'_>,
    config: &RunConfig,
    n_samples: Option<usize>,
    subset_1: Option<&Path>,
    subset_2: Option<&Path>,
    output_fl: Option<&str>,
    seed: Option<u64>,
) -> Result<()> {
    driver.require_categories("pairwise")?;

    let set_one = read_subset(subset_1)?;
    let set_two = read_subset(subset_2)?;
    let snps = driver.features().snps();
    let one = select_snps(snps, set_one.as_ref());
    let two = select_snps(snps, set_two.as_ref());
    info!("Found {} SNPs in set one", one.len());
    info!("Found {} SNPs in set two", two.len());

    let output = config.pairwise_output(output_fl);
    match n_samples {
        Some(n) => {
            let rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let pairs = sample_pairs(n, &one, &two, rng)?;
            info!("Evaluating {n} sampled pairs");
            write_records(&output, |out| driver.pairwise(pairs, out))
        }
        None => {
            info!("Evaluating {} pairs", one.len() * two.len());
            write_records(&output, |out| driver.pairwise(exhaustive_pairs(&one, &two), out))
        }
    }
}

fn run_pairwise_single(
    driver: &AssociationDriver<'_>,
    config: &RunConfig,
    query: SnpLabel,
) -> Result<()> {
    driver.require_categories("pairwise-single")?;
    let selection = SingleVsAll::new(driver.features().snps(), &query)?;
    write_records(&config.single_output(&query), |out| {
        driver.pairwise_single(&selection, out)
    })
}

fn run_populations(driver: &AssociationDriver<'_>, config: &RunConfig) -> Result<()> {
    write_records(&config.population_output(), |out| driver.populations(out))
}

fn read_subset(path: Option<&Path>) -> Result<Option<SubsetFilter>> {
    path.map(|path| {
        SubsetFilter::from_path(path)
            .with_context(|| format!("failed to read subset file {}", path.display()))
    })
    .transpose()
}

/// Open `path`, run `write` against it and flush.
fn write_records<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut AssociationWriter<BufWriter<File>>) -> Result<usize, AssociationError>,
{
    let file = File::create(path)
        .with_context(|| format!("failed to create output file {}", path.display()))?;
    let mut out = AssociationWriter::new(BufWriter::new(file));
    let written = write(&mut out)?;
    out.finish()
        .with_context(|| format!("failed to flush output file {}", path.display()))?;
    info!("Wrote {written} records to {}", path.display());
    Ok(())
}
