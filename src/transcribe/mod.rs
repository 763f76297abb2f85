use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::config::Settings;
use crate::fetch::{AudioFetcher, YtDlpFetcher};
use crate::Result;

pub mod client;
pub mod vtt;

pub use client::LemonfoxClient;
pub use vtt::TranscriptCue;

/// Response body shape requested from the transcription API.
///
/// `json` is the default. `vtt` additionally yields timed cues that are
/// parsed client-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    Json,
    Text,
    Vtt,
}

impl ResponseFormat {
    /// Value sent in the `response_format` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Text => "text",
            ResponseFormat::Vtt => "vtt",
        }
    }
}

impl Default for ResponseFormat {
    fn default() -> Self {
        ResponseFormat::Json
    }
}

impl fmt::Display for ResponseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Completed transcription with everything the caller might render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionResult {
    /// Full transcript text.
    pub text: String,

    /// Timed cues, present only when the response format carries timing.
    pub cues: Vec<TranscriptCue>,

    /// Format the API was asked for.
    pub format: ResponseFormat,

    /// Metadata about the transcription request.
    pub metadata: TranscriptionMetadata,
}

/// Metadata about the transcription process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionMetadata {
    /// Endpoint that produced the transcript.
    pub endpoint: String,

    /// Language hint that was sent with the request.
    pub language: String,

    /// Wall-clock seconds spent on the request.
    pub processing_duration: f64,

    /// Timestamp when transcription completed.
    pub completed_at: DateTime<Utc>,
}

/// Anything that can turn an audio file into a transcript.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe_file(&self, path: &Path) -> Result<TranscriptionResult>;
}

/// Main transcription pipeline: download, then transcribe.
pub struct TranscriptionPipeline {
    settings: Settings,
    fetcher: Box<dyn AudioFetcher>,
    transcriber: Box<dyn Transcriber>,
}

impl TranscriptionPipeline {
    /// Create a pipeline with the default yt-dlp fetcher and Lemonfox client.
    pub fn new(settings: Settings) -> Result<Self> {
        let fetcher = Box::new(YtDlpFetcher::new(&settings));
        let transcriber = Box::new(LemonfoxClient::new(&settings)?);
        Ok(Self {
            settings,
            fetcher,
            transcriber,
        })
    }

    /// Create a pipeline from explicit stages.
    pub fn with_parts(
        settings: Settings,
        fetcher: Box<dyn AudioFetcher>,
        transcriber: Box<dyn Transcriber>,
    ) -> Self {
        Self {
            settings,
            fetcher,
            transcriber,
        }
    }

    /// Download the audio, then send it for transcription.
    ///
    /// A failed download aborts the run unless `keep_going` is set, in which
    /// case the failure is logged and the upload is attempted against
    /// whatever already sits at the output path.
    pub async fn run(&self) -> Result<TranscriptionResult> {
        match self
            .fetcher
            .fetch(&self.settings.source_url, &self.settings.output_path)
            .await
        {
            Ok(()) => println!("Audio downloaded successfully."),
            Err(err) if self.settings.keep_going => {
                tracing::error!("Error downloading audio: {:#}", err);
                tracing::warn!(
                    "continuing despite the failed download, uploading {}",
                    self.settings.output_path.display()
                );
            }
            Err(err) => {
                tracing::error!("Error downloading audio: {:#}", err);
                return Err(err);
            }
        }

        self.transcriber
            .transcribe_file(&self.settings.output_path)
            .await
    }
}
