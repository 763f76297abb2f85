use anyhow::Context;
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Deserialize;
use std::path::Path;
use std::time::{Duration, Instant};

use super::{
    ResponseFormat, Transcriber, TranscriptCue, TranscriptionMetadata, TranscriptionResult,
};
use crate::config::Settings;
use crate::fetch::AudioFormat;
use crate::transcribe::vtt;
use crate::{PipelineError, Result};

/// Body returned by the API for `response_format=json`.
#[derive(Debug, Deserialize)]
struct JsonTranscript {
    text: String,
}

/// Client for the Lemonfox speech-to-text API.
///
/// Uploads a local audio file as `multipart/form-data` and decodes the
/// response according to the requested format.
pub struct LemonfoxClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    language: String,
    response_format: ResponseFormat,
    audio_format: AudioFormat,
    quiet: bool,
}

impl LemonfoxClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            language: settings.language.clone(),
            response_format: settings.response_format,
            audio_format: settings.audio_format,
            quiet: settings.quiet,
        })
    }

    fn spinner(&self) -> ProgressBar {
        let progress = ProgressBar::new_spinner();
        if self.quiet {
            progress.set_draw_target(ProgressDrawTarget::hidden());
        }
        progress.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap(),
        );
        progress
    }

    fn decode_response(&self, body: &str) -> Result<(String, Vec<TranscriptCue>)> {
        match self.response_format {
            ResponseFormat::Json => {
                let parsed: JsonTranscript = serde_json::from_str(body)
                    .map_err(|err| PipelineError::MalformedResponse(err.to_string()))?;
                Ok((parsed.text, Vec::new()))
            }
            ResponseFormat::Text => Ok((body.trim_end().to_string(), Vec::new())),
            ResponseFormat::Vtt => {
                let cues = vtt::parse_vtt(body)
                    .map_err(|err| PipelineError::MalformedResponse(format!("{:#}", err)))?;
                Ok((vtt::flatten_cues(&cues), cues))
            }
        }
    }
}

#[async_trait]
impl Transcriber for LemonfoxClient {
    async fn transcribe_file(&self, path: &Path) -> Result<TranscriptionResult> {
        tracing::info!("Starting transcription process for {}", path.display());
        let started = Instant::now();

        let audio = tokio::fs::read(path)
            .await
            .with_context(|| format!("Error reading audio file {}", path.display()))?;
        if audio.is_empty() {
            tracing::warn!(
                "audio file {} is empty, the API will have nothing to transcribe",
                path.display()
            );
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("audio.{}", self.audio_format.as_str()));

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio)
                    .file_name(file_name)
                    .mime_str(self.audio_format.mime_type())?,
            )
            .text("language", self.language.clone())
            .text("response_format", self.response_format.as_str());

        let progress = self.spinner();
        progress.set_message("Sending audio for transcription...");

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                progress.finish_and_clear();
                tracing::error!("Error sending audio for transcription: {}", err);
                return Err(err).context("Transcription request failed");
            }
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Error reading transcription response")?;

        if !status.is_success() {
            progress.finish_and_clear();
            tracing::error!("Transcription API returned {}: {}", status, body);
            return Err(PipelineError::ApiStatus {
                status: status.as_u16(),
                body,
            }
            .into());
        }
        progress.finish_with_message("Transcription received");

        let (text, cues) = match self.decode_response(&body) {
            Ok(decoded) => decoded,
            Err(err) => {
                tracing::error!("Error decoding transcription response: {:#}", err);
                return Err(err);
            }
        };

        Ok(TranscriptionResult {
            text,
            cues,
            format: self.response_format,
            metadata: TranscriptionMetadata {
                endpoint: self.endpoint.clone(),
                language: self.language.clone(),
                processing_duration: started.elapsed().as_secs_f64(),
                completed_at: chrono::Utc::now(),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use std::path::PathBuf;

    fn test_settings(format: ResponseFormat) -> Settings {
        Settings {
            source_url: "https://www.youtube.com/watch?v=Y9QfOPxmxVI".to_string(),
            output_path: PathBuf::from("downloaded_audio.mp3"),
            api_key: "test-key".to_string(),
            language: "english".to_string(),
            response_format: format,
            endpoint: "http://127.0.0.1:9/v1/audio/transcriptions".to_string(),
            audio_format: AudioFormat::Mp3,
            audio_quality: 0,
            yt_dlp_path: "yt-dlp".to_string(),
            download_timeout_secs: 5,
            request_timeout_secs: 5,
            keep_going: false,
            quiet: true,
        }
    }

    #[test]
    fn decode_json_response() {
        let client = LemonfoxClient::new(&test_settings(ResponseFormat::Json)).unwrap();
        let (text, cues) = client
            .decode_response(r#"{"text": "hello world"}"#)
            .unwrap();
        assert_eq!(text, "hello world");
        assert!(cues.is_empty());
    }

    #[test]
    fn decode_json_response_rejects_garbage() {
        let client = LemonfoxClient::new(&test_settings(ResponseFormat::Json)).unwrap();
        let err = client.decode_response("not json at all").unwrap_err();
        assert!(err.to_string().contains("malformed transcription response"));
    }

    #[test]
    fn decode_text_response_trims_trailing_newline() {
        let client = LemonfoxClient::new(&test_settings(ResponseFormat::Text)).unwrap();
        let (text, _) = client.decode_response("hello world\n").unwrap();
        assert_eq!(text, "hello world");
    }

    #[test]
    fn decode_vtt_response_yields_cues() {
        let client = LemonfoxClient::new(&test_settings(ResponseFormat::Vtt)).unwrap();
        let body = "WEBVTT\n\n00:00:00.000 --> 00:00:02.500\nhello\n\n00:00:02.500 --> 00:00:04.000\nworld\n";
        let (text, cues) = client.decode_response(body).unwrap();
        assert_eq!(text, "hello world");
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[1].text, "world");
    }
}
