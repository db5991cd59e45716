// Command-line entry point
// Resolves the dataset, builds the catalogue, and runs the extraction

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use cadenza::dataset::{self, DatasetKind, Phase};
use cadenza::paths;
use cadenza::processor::{ExtractionConfig, Processor};

#[derive(Debug, Parser)]
#[command(
    name = "cadenza",
    about = "Generate batched feature and label files for music transcription training"
)]
struct Cli {
    /// Dataset to process: Maps, Maestro, MusicNet, Su, Su-10, URMP, Bach, or Rhythm
    dataset: String,

    /// Path to the downloaded dataset root
    dataset_path: PathBuf,

    /// Generate training or testing features
    #[arg(short, long, value_enum, default_value = "train")]
    phase: PhaseArg,

    /// Number of pieces included in one generated file
    #[arg(short = 'n', long, default_value_t = 40, value_parser = clap::value_parser!(u64).range(1..))]
    piece_per_file: u64,

    /// Path to save the generated feature and label files
    #[arg(short, long, default_value = "./train_feature")]
    save_path: PathBuf,

    /// Generate harmonic features
    #[arg(short = 'a', long)]
    harmonic: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PhaseArg {
    Train,
    Test,
}

impl From<PhaseArg> for Phase {
    fn from(arg: PhaseArg) -> Self {
        match arg {
            PhaseArg::Train => Phase::Train,
            PhaseArg::Test => Phase::Test,
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let kind = DatasetKind::from_name(&cli.dataset)?;
    let entry = dataset::resolve(kind);

    let info = (entry.build_info)(&cli.dataset_path)?;
    let phase: Phase = cli.phase.into();

    let wav_paths = paths::resolve_paths(&info.base_path, info.wavs(phase));
    let label_paths = paths::resolve_paths(&info.base_path, info.labels(phase));

    log::info!(
        "{}: {} pairs in the {} split",
        kind.name(),
        wav_paths.len(),
        phase.as_str()
    );

    let processor = Processor::new(
        wav_paths,
        label_paths,
        info.label_ext.to_string(),
        (entry.extractor)(),
        ExtractionConfig {
            save_path: cli.save_path,
            file_prefix: phase.as_str().to_string(),
            piece_per_file: cli.piece_per_file as usize,
            harmonic: cli.harmonic,
        },
    );

    let summary = processor.process()?;
    log::info!(
        "Done: {} artifacts, {} frames",
        summary.artifacts_written,
        summary.frames_written
    );

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
