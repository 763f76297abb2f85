use anyhow::Context;
use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use super::{AudioFetcher, AudioFormat};
use crate::config::Settings;
use crate::{PipelineError, Result};

/// Audio fetcher backed by the external yt-dlp tool
pub struct YtDlpFetcher {
    yt_dlp_path: String,
    audio_format: AudioFormat,
    audio_quality: u8,
    timeout_secs: u64,
    quiet: bool,
}

impl YtDlpFetcher {
    pub fn new(settings: &Settings) -> Self {
        Self {
            yt_dlp_path: settings.yt_dlp_path.clone(),
            audio_format: settings.audio_format,
            audio_quality: settings.audio_quality,
            timeout_secs: settings.download_timeout_secs,
            quiet: settings.quiet,
        }
    }

    /// Check if yt-dlp is available
    pub async fn check_availability(&self) -> Result<bool> {
        let output = Command::new(&self.yt_dlp_path)
            .arg("--version")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        Ok(matches!(output, Ok(out) if out.status.success()))
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
}

#[async_trait]
impl AudioFetcher for YtDlpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        if !self.check_availability().await? {
            anyhow::bail!(
                "yt-dlp is not available. Please install it: https://github.com/yt-dlp/yt-dlp"
            );
        }

        let source = crate::utils::extract_domain(url).unwrap_or_else(|| "source".to_string());
        tracing::info!("Downloading audio from {} to {}", source, dest.display());

        let progress = self.spinner();
        progress.set_message("Downloading audio with yt-dlp...");

        let mut cmd = Command::new(&self.yt_dlp_path);
        cmd.args([
            "--extract-audio",
            "--audio-format",
            self.audio_format.as_str(),
            "--audio-quality",
            &self.audio_quality.to_string(),
            "-o",
            &dest.to_string_lossy(),
            url,
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // a timed-out download must not leave yt-dlp running
        .kill_on_drop(true);

        let output = match timeout(Duration::from_secs(self.timeout_secs), cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                progress.finish_and_clear();
                return Err(err).with_context(|| format!("failed to run {}", self.yt_dlp_path));
            }
            Err(_) => {
                progress.finish_and_clear();
                return Err(PipelineError::DownloadTimeout(self.timeout_secs).into());
            }
        };

        if !output.status.success() {
            progress.finish_and_clear();
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = if stderr.trim().is_empty() {
                format!("yt-dlp exited with {}", output.status)
            } else {
                stderr.trim().to_string()
            };
            return Err(PipelineError::DownloadFailed(detail).into());
        }

        // yt-dlp can exit zero without producing the file (unsupported URL
        // resolved to nothing, or a post-processing step quietly skipped)
        if !dest.exists() {
            progress.finish_and_clear();
            return Err(PipelineError::MissingAudio(dest.to_path_buf()).into());
        }

        progress.finish_with_message("Download complete");
        Ok(())
    }
}
