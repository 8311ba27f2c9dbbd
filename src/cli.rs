//! Headless entry points. Without a subcommand the desktop window opens.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use willowbend::model::read_metadata;
use willowbend::notice::Notice;
use willowbend::settings::{DEFAULT_CLIP_LIMIT, DEFAULT_FRAME_RATE, DEFAULT_JPEG_QUALITY};
use willowbend::{
    convert_file, load_file, parse_clip_limit, parse_frame_rate, ConversionSettings,
    EnhancementMode, OutputFormat,
};

#[derive(Parser)]
#[command(
    name = "willowbend",
    version,
    about = "Convert DICOM cine loops into contrast-enhanced AVI or MP4 videos"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Enhance and write one video per input file
    Convert(ConvertArgs),
    /// Print the study details of a DICOM file
    Info {
        file: PathBuf,
    },
}

#[derive(Args)]
pub struct ConvertArgs {
    /// CLAHE clip limit, relative to a flat histogram
    #[arg(long, default_value_t = DEFAULT_CLIP_LIMIT, value_parser = parse_clip_limit)]
    clip_limit: f32,

    #[arg(long, value_enum, default_value_t = OutputFormat::Avi)]
    format: OutputFormat,

    #[arg(long, value_enum, default_value_t = EnhancementMode::Clahe)]
    enhancement: EnhancementMode,

    /// Frame rate used when a file declares none
    #[arg(long, default_value_t = DEFAULT_FRAME_RATE, value_parser = parse_frame_rate)]
    fps: f64,

    /// JPEG quality of each video frame
    #[arg(
        long,
        default_value_t = DEFAULT_JPEG_QUALITY,
        value_parser = clap::value_parser!(u8).range(1..=100)
    )]
    quality: u8,

    /// Directory the videos are written to. Created if missing.
    #[arg(short, long)]
    output_directory: PathBuf,

    #[arg(required = true)]
    files: Vec<PathBuf>,
}

impl ConvertArgs {
    fn settings(&self) -> ConversionSettings {
        ConversionSettings {
            clip_limit: self.clip_limit,
            output_format: self.format,
            enhancement: self.enhancement,
            fallback_frame_rate: self.fps,
            jpeg_quality: self.quality,
        }
    }
}

pub fn run(command: Command) -> ExitCode {
    match command {
        Command::Convert(args) => convert(&args),
        Command::Info { file } => info(file),
    }
}

fn convert(args: &ConvertArgs) -> ExitCode {
    if let Err(err) = fs::create_dir_all(&args.output_directory) {
        eprintln!(
            "error: cannot create {}: {err}",
            args.output_directory.display()
        );
        return ExitCode::FAILURE;
    }

    let settings = args.settings();
    let mut converted = 0;
    let mut failures = Vec::new();
    for file in &args.files {
        let result = load_file(file)
            .and_then(|loaded| convert_file(&loaded, &settings, &args.output_directory));
        match result {
            Ok(summary) => {
                println!(
                    "{} -> {} ({} frames, {:.3} fps)",
                    file.display(),
                    summary.path.display(),
                    summary.frames,
                    summary.frame_rate.fps()
                );
                converted += 1;
            }
            Err(err) => {
                eprintln!("error: {err}");
                failures.push(err.to_string());
            }
        }
    }

    let failed = !failures.is_empty();
    println!(
        "{}",
        Notice::Converted {
            format: settings.output_format,
            converted,
            failures,
        }
        .description()
    );

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn info(file: PathBuf) -> ExitCode {
    match read_metadata(&file) {
        Ok(metadata) => {
            for (label, value) in metadata.rows() {
                println!("{label}: {value}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
