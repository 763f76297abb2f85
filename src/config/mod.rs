use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cli::TranscribeArgs;
use crate::fetch::AudioFormat;
use crate::transcribe::ResponseFormat;
use crate::PipelineError;

/// Default transcription endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.lemonfox.ai/v1/audio/transcriptions";

/// Default destination for downloaded audio.
pub const DEFAULT_OUTPUT_PATH: &str = "downloaded_audio.mp3";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Audio download settings
    pub fetch: FetchConfig,

    /// Transcription API settings
    pub api: ApiConfig,

    /// Application settings
    pub app: AppConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Path or name of the yt-dlp binary
    pub yt_dlp_path: String,

    /// Audio container yt-dlp extracts to
    pub audio_format: AudioFormat,

    /// yt-dlp audio quality, 0 (best) to 10 (worst)
    pub audio_quality: u8,

    /// Seconds a download may run before it is killed
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Transcription endpoint URL
    pub endpoint: String,

    /// Spoken language hint sent with every request
    pub language: String,

    /// Response body shape requested from the API
    pub response_format: ResponseFormat,

    /// Seconds an upload may take before the request is aborted
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the downloaded audio lands
    pub output_path: PathBuf,

    /// Attempt the upload even when the download fails
    pub keep_going: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            api: ApiConfig::default(),
            app: AppConfig::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            yt_dlp_path: "yt-dlp".to_string(),
            audio_format: AudioFormat::Mp3,
            audio_quality: 0,
            timeout_secs: 900,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            language: "english".to_string(),
            response_format: ResponseFormat::Json,
            timeout_secs: 300,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            keep_going: false,
        }
    }
}

/// Fully resolved settings for one pipeline run.
///
/// Produced by [`Config::resolve`] from the config file, environment and
/// command-line flags. Flags win over the file, the file wins over defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source_url: String,
    pub output_path: PathBuf,
    pub api_key: String,
    pub language: String,
    pub response_format: ResponseFormat,
    pub endpoint: String,
    pub audio_format: AudioFormat,
    pub audio_quality: u8,
    pub yt_dlp_path: String,
    pub download_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub keep_going: bool,
    pub quiet: bool,
}

impl Config {
    /// Load configuration from file, falling back to defaults.
    ///
    /// Never writes the file, `config --init` does that explicitly.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs_err::read_to_string(&config_path)
                .context("Failed to read config file")?;

            let config: Config = serde_yaml::from_str(&content)
                .context("Failed to parse config file")?;

            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Write this configuration to the config path, refusing to clobber.
    pub fn init(&self) -> Result<PathBuf> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            anyhow::bail!(
                "Configuration file already exists at {}",
                config_path.display()
            );
        }

        if let Some(parent) = config_path.parent() {
            fs_err::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("yt2text").join("config.yaml"))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.api.endpoint.is_empty() {
            anyhow::bail!("Transcription endpoint must not be empty");
        }

        url::Url::parse(&self.api.endpoint)
            .with_context(|| format!("Invalid transcription endpoint: {}", self.api.endpoint))?;

        if self.fetch.audio_quality > 10 {
            anyhow::bail!("Audio quality must be between 0 (best) and 10 (worst)");
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  Endpoint: {}", self.api.endpoint);
        println!("  Language: {}", self.api.language);
        println!("  Response Format: {}", self.api.response_format);
        println!("  Request Timeout: {}s", self.api.timeout_secs);
        println!("  Audio Format: {}", self.fetch.audio_format);
        println!("  Audio Quality: {} (0 = best)", self.fetch.audio_quality);
        println!("  Download Timeout: {}s", self.fetch.timeout_secs);
        println!("  yt-dlp Path: {}", self.fetch.yt_dlp_path);
        println!("  Output Path: {}", self.app.output_path.display());
        println!("  Keep Going: {}", self.app.keep_going);
        println!("  API Key: taken from --api-key or LEMONFOX_API_KEY");
    }

    /// Merge command-line arguments over this configuration.
    ///
    /// The API key never lives in the config file, it must arrive via flag
    /// or environment.
    pub fn resolve(self, args: &TranscribeArgs, quiet: bool) -> Result<Settings> {
        let api_key = args.api_key.clone().unwrap_or_default();
        if api_key.is_empty() {
            return Err(PipelineError::MissingApiKey.into());
        }

        Ok(Settings {
            source_url: args.url.clone(),
            output_path: args.output.clone().unwrap_or(self.app.output_path),
            api_key,
            language: args.language.clone().unwrap_or(self.api.language),
            response_format: args.response_format.unwrap_or(self.api.response_format),
            endpoint: args.endpoint.clone().unwrap_or(self.api.endpoint),
            audio_format: args.audio_format.unwrap_or(self.fetch.audio_format),
            audio_quality: args.audio_quality.unwrap_or(self.fetch.audio_quality),
            yt_dlp_path: self.fetch.yt_dlp_path,
            download_timeout_secs: self.fetch.timeout_secs,
            request_timeout_secs: self.api.timeout_secs,
            keep_going: args.keep_going || self.app.keep_going,
            quiet,
        })
    }
}
