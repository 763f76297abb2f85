//! yt2text - transcribe YouTube videos from the command line
//!
//! This library wires two external collaborators together: `yt-dlp` extracts
//! the audio track of a video to a local file, and the Lemonfox transcription
//! API turns that file into text. Everything in between is a short, strictly
//! sequential pipeline.

pub mod cli;
pub mod config;
pub mod fetch;
pub mod output;
pub mod transcribe;
pub mod utils;

pub use cli::{Cli, Commands};
pub use config::{Config, Settings};
pub use fetch::{AudioFetcher, AudioFormat};
pub use transcribe::{
    ResponseFormat, Transcriber, TranscriptionPipeline, TranscriptionResult,
};

/// Result type used throughout the library
pub type Result<T> = anyhow::Result<T>;

/// Error types specific to the transcription pipeline
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("audio download failed: {0}")]
    DownloadFailed(String),

    #[error("audio download timed out after {0}s")]
    DownloadTimeout(u64),

    #[error("yt-dlp reported success but no file exists at {}", .0.display())]
    MissingAudio(std::path::PathBuf),

    #[error("no API key configured: pass --api-key or set LEMONFOX_API_KEY")]
    MissingApiKey,

    #[error("transcription request failed with status {status}: {body}")]
    ApiStatus { status: u16, body: String },

    #[error("malformed transcription response: {0}")]
    MalformedResponse(String),
}
