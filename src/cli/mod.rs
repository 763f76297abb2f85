use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::fetch::AudioFormat;
use crate::transcribe::ResponseFormat;

#[derive(Parser)]
#[command(
    name = "yt2text",
    about = "Download a YouTube video's audio with yt-dlp and transcribe it via the Lemonfox API",
    version,
    long_about = "A CLI tool that extracts audio from a YouTube URL using yt-dlp, uploads it to the \
Lemonfox speech-to-text API, and prints the transcript. The API key is read from --api-key or the \
LEMONFOX_API_KEY environment variable."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download a video's audio and transcribe it
    Transcribe(TranscribeArgs),

    /// Inspect or create the configuration file
    Config {
        /// Show current configuration
        #[arg(short, long)]
        show: bool,

        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args, Debug)]
pub struct TranscribeArgs {
    /// YouTube URL to transcribe
    #[arg(value_name = "URL")]
    pub url: String,

    /// Destination path for the downloaded audio
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Spoken language sent to the transcription API
    #[arg(short, long, value_name = "LANG")]
    pub language: Option<String>,

    /// Response format requested from the transcription API
    #[arg(short = 'f', long, value_enum, value_name = "FORMAT")]
    pub response_format: Option<ResponseFormat>,

    /// Audio container yt-dlp extracts to
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub audio_format: Option<AudioFormat>,

    /// yt-dlp audio quality, 0 (best) to 10 (worst)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(0..=10))]
    pub audio_quality: Option<u8>,

    /// Lemonfox API key
    #[arg(long, env = "LEMONFOX_API_KEY", hide_env_values = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Transcription endpoint URL
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Attempt the upload even when the download fails
    #[arg(long)]
    pub keep_going: bool,
}
