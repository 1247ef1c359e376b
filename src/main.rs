use anyhow::{Context, Result};
use castingpulse::{KeywordMatch, PulseConfig, PulsePipeline};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MatchArg {
    Substring,
    WholeWord,
}

impl From<MatchArg> for KeywordMatch {
    fn from(m: MatchArg) -> Self {
        match m {
            MatchArg::Substring => KeywordMatch::Substring,
            MatchArg::WholeWord => KeywordMatch::WholeWord,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Build the daily Casting Pulse from a breakdown CSV")]
struct Args {
    /// Input breakdown CSV file
    #[arg(short, long)]
    input: PathBuf,
    /// Output summary file (.csv, or .parquet)
    #[arg(short, long)]
    output: PathBuf,
    /// YAML config; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Privacy floor: buckets with fewer rows are dropped
    #[arg(long)]
    min_bucket_size: Option<u64>,
    /// Add Laplace noise to counts before filtering
    #[arg(long)]
    noise: bool,
    /// Privacy budget; noise scale is 1/epsilon
    #[arg(long)]
    epsilon: Option<f64>,
    /// Seed the noise source for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Leave out the theme_ai_share_pct_day column
    #[arg(long)]
    no_theme_column: bool,
    /// How AI keywords match role descriptions
    #[arg(long, value_enum)]
    ai_match: Option<MatchArg>,
    /// How project-type keywords match
    #[arg(long, value_enum)]
    project_type_match: Option<MatchArg>,
    /// Score sentiment on one thread
    #[arg(long)]
    serial_scoring: bool,
    /// Also write the run summary as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

impl Args {
    fn to_config(&self) -> Result<PulseConfig> {
        let mut cfg = match &self.config {
            Some(path) => PulseConfig::from_yaml_file(path)?,
            None => PulseConfig::default(),
        };
        if let Some(n) = self.min_bucket_size {
            cfg.min_bucket_size = n;
        }
        if self.noise {
            cfg.noise.enabled = true;
        }
        if let Some(eps) = self.epsilon {
            cfg.noise.epsilon = eps;
        }
        if let Some(seed) = self.seed {
            cfg.noise.seed = Some(seed);
        }
        if self.no_theme_column {
            cfg.include_theme_share = false;
        }
        if let Some(m) = self.ai_match {
            cfg.ai_match = m.into();
        }
        if let Some(m) = self.project_type_match {
            cfg.project_type_match = m.into();
        }
        if self.serial_scoring {
            cfg.parallel_scoring = false;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    // logs go to stderr so stdout stays clean
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let cfg = args.to_config().context("loading configuration")?;
    info!(min_bucket_size = cfg.min_bucket_size, noise = cfg.noise.enabled, "startup");

    let pipeline = PulsePipeline::new(cfg)?;
    let summary = pipeline
        .run(&args.input, &args.output)
        .with_context(|| format!("building pulse from {}", args.input.display()))?;

    if let Some(path) = &args.summary_json {
        summary
            .write_json(path)
            .with_context(|| format!("writing run summary {}", path.display()))?;
    }

    info!("Done.");
    Ok(())
}
