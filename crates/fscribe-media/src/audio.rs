//! Audio track extraction.

use std::path::Path;

use crate::command::{run_ffmpeg, FfmpegCommand};
use crate::error::MediaResult;

/// Extract the audio track as mono 16 kHz 16-bit PCM, the fixed input
/// contract of the transcription backend.
pub async fn extract_audio(video: &Path, dest: &Path) -> MediaResult<()> {
    let cmd = audio_command(video, dest);
    run_ffmpeg(&cmd).await
}

fn audio_command(video: &Path, dest: &Path) -> FfmpegCommand {
    FfmpegCommand::new(video, dest).output_args([
        "-vn",
        "-acodec",
        "pcm_s16le",
        "-ar",
        "16000",
        "-ac",
        "1",
    ])
}
