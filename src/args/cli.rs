use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use super::parsers::parse_duration_arg;
use super::types::Visibility;

#[derive(Debug, Subcommand, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run one functional sweep over the whole API surface and exit
    Smoke,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Async load harness for social-media backends - drives concurrent signup/login/upload/post user journeys over HTTP and reports per-workflow outcomes."
)]
pub struct HarnessArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Base URL of the target API (e.g. http://127.0.0.1:8000)
    #[arg(
        long = "base-url",
        short = 'u',
        env = "STAMPEDE_BASE_URL",
        global = true
    )]
    pub base_url: Option<String>,

    /// Total number of simulated user workflows
    #[arg(long, short = 'n')]
    pub workflows: Option<u64>,

    /// Maximum number of workflows in flight at once
    #[arg(long, short = 'c')]
    pub concurrency: Option<NonZeroUsize>,

    /// Upload/upload/post rounds per workflow
    #[arg(long, short = 'i')]
    pub iterations: Option<u32>,

    /// Password used for generated accounts
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Directory holding the audio files to upload
    #[arg(long = "audio-dir", global = true)]
    pub audio_dir: Option<PathBuf>,

    /// Directory holding the image files to upload
    #[arg(long = "images-dir", global = true)]
    pub images_dir: Option<PathBuf>,

    /// Visibility of created posts
    #[arg(long, ignore_case = true)]
    pub visibility: Option<Visibility>,

    /// Request timeout (supports ms/s/m/h)
    #[arg(long, value_parser = parse_duration_arg, global = true)]
    pub timeout: Option<Duration>,

    /// Config file path (defaults to stampede.toml / stampede.json if present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Disable ANSI colors in log output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,
}
