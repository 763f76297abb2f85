use url::Url;

/// Check if the current environment has the external tools the pipeline needs
pub async fn check_dependencies(yt_dlp_path: &str) -> Vec<String> {
    let mut missing = Vec::new();

    if !check_command_available(yt_dlp_path).await {
        missing.push(format!(
            "{} - required for audio extraction (https://github.com/yt-dlp/yt-dlp)",
            yt_dlp_path
        ));
    }

    // yt-dlp shells out to ffmpeg for --extract-audio transcoding
    if !check_command_available("ffmpeg").await {
        missing.push("ffmpeg - required by yt-dlp to transcode audio".to_string());
    }

    missing
}

/// Check if a command is available in PATH
async fn check_command_available(command: &str) -> bool {
    use tokio::process::Command;

    Command::new(command)
        .arg("--version")
        .output()
        .await
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Extract domain from URL for display purposes
pub fn extract_domain(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .map(|host| {
            // Remove 'www.' prefix if present
            if host.starts_with("www.") {
                host[4..].to_string()
            } else {
                host.to_string()
            }
        })
}
