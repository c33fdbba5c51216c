use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::{Args, Parser, Subcommand};
use melprep::archive::read_archive;
use melprep::progress::LogProgress;
use melprep::{extract_log_mel_feats, ExtractConfig, LabelIndex, SplitType};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// melprep - log-mel feature extraction for audio classification datasets
#[derive(Parser, Debug)]
#[command(name = "melprep")]
#[command(version = "0.1.0")]
#[command(about = "Convert audio datasets into log-mel feature archives", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract features for a train or test split.
    Extract(ExtractArgs),
    /// Summarise a feature archive.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct ExtractArgs {
    /// Dataset split: "train" or "test" (case-insensitive)
    #[arg(long)]
    split: String,

    /// Tab-separated manifest (train split only)
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Directory holding the audio files
    #[arg(long, value_name = "DIR")]
    audio_dir: PathBuf,

    /// Path of the feature archive to write
    #[arg(long, short, value_name = "PATH")]
    output: PathBuf,

    /// JSON file with extraction settings; flags below override it
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[arg(long)]
    sample_rate: Option<u32>,

    #[arg(long)]
    fft_size: Option<usize>,

    #[arg(long)]
    hop_length: Option<usize>,

    #[arg(long)]
    n_mels: Option<usize>,

    /// Silence floor in dB below the loudest frame (train split)
    #[arg(long)]
    top_db: Option<f64>,

    /// Write the label-to-id mapping here as JSON (train split)
    #[arg(long, value_name = "PATH")]
    labels_out: Option<PathBuf>,
}

impl ExtractArgs {
    fn validate(&self) -> Result<()> {
        self.split.parse::<SplitType>()?;
        if !self.audio_dir.is_dir() {
            anyhow::bail!("Audio directory does not exist: {:?}", self.audio_dir);
        }
        if self.output.is_dir() {
            anyhow::bail!("Output path is a directory: {:?}", self.output);
        }
        Ok(())
    }

    fn extract_config(&self) -> Result<ExtractConfig> {
        let mut config = match &self.config {
            Some(path) => ExtractConfig::from_file(path)?,
            None => ExtractConfig::default(),
        };
        let spec = &mut config.spectrogram;
        if let Some(value) = self.sample_rate {
            spec.sample_rate = value;
        }
        if let Some(value) = self.fft_size {
            spec.fft_size = value;
        }
        if let Some(value) = self.hop_length {
            spec.hop_length = value;
        }
        if let Some(value) = self.n_mels {
            spec.n_mels = value;
        }
        if let Some(value) = self.top_db {
            config.silence.top_db = value;
        }
        Ok(config)
    }
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Feature archive written by `melprep extract`
    #[arg(value_name = "ARCHIVE")]
    archive: PathBuf,

    /// Also list every record
    #[arg(long)]
    records: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Extract(args) => run_extract(&args),
        Command::Inspect(args) => run_inspect(&args),
    }
}

fn run_extract(args: &ExtractArgs) -> Result<()> {
    args.validate()
        .context("Failed to validate command-line arguments")?;
    let config = args
        .extract_config()
        .context("Failed to load extraction settings")?;

    let mut progress = LogProgress::default();
    let labels = extract_log_mel_feats(
        &args.split,
        args.manifest.as_deref(),
        &args.audio_dir,
        &args.output,
        &config,
        &mut progress,
    )
    .context("Feature extraction failed")?;

    match (labels, &args.labels_out) {
        (Some(labels), Some(path)) => write_labels(&labels, path)?,
        (Some(labels), None) => {
            for (label, id) in labels.iter() {
                info!(label, id, "label id");
            }
        }
        (None, Some(_)) => {
            tracing::warn!("--labels-out ignored: the test split has no labels");
        }
        (None, None) => {}
    }
    Ok(())
}

fn write_labels(labels: &LabelIndex, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(labels).context("Failed to encode label map")?;
    fs::write(path, json).with_context(|| format!("Failed to write label map {:?}", path))?;
    info!(path = %path.display(), labels = labels.len(), "wrote label map");
    Ok(())
}

fn run_inspect(args: &InspectArgs) -> Result<()> {
    ensure!(
        args.archive.is_file(),
        "Archive does not exist: {:?}",
        args.archive
    );
    let archive = read_archive(&args.archive)
        .with_context(|| format!("Failed to read archive {:?}", args.archive))?;

    let spec = &archive.spectrogram;
    println!("format version: {}", archive.format_version);
    println!("split: {}", archive.split);
    println!(
        "spectrogram: sr={} fft={} hop={} mels={}",
        spec.sample_rate, spec.fft_size, spec.hop_length, spec.n_mels
    );
    println!("records: {}", archive.records.len());

    if args.records {
        for record in &archive.records {
            let label = record
                .label_id
                .map_or_else(|| "-".to_string(), |id| id.to_string());
            println!(
                "{}\t{}x{}\t{}",
                record.file_name,
                record.mel_bands(),
                record.frames(),
                label
            );
        }
    }
    Ok(())
}
