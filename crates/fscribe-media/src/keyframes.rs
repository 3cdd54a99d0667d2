//! Scene-cut keyframe extraction.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::command::{run_ffmpeg, FfmpegCommand};
use crate::error::MediaResult;

/// Output filename pattern used by the scene-cut pass.
const FRAME_PATTERN: &str = "frame_%04d.png";

/// One extracted keyframe on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFrame {
    /// Numeric ordinal parsed from the filename; authoritative for ordering
    pub ordinal: u32,
    pub filename: String,
    pub path: PathBuf,
}

/// Parse the numeric ordinal out of a `frame_NNNN.png` filename.
pub fn parse_frame_ordinal(filename: &str) -> Option<u32> {
    filename
        .strip_prefix("frame_")?
        .strip_suffix(".png")?
        .parse()
        .ok()
}

/// Detect scene changes in `video` and write one PNG per cut into
/// `frames_dir`, returning the frames sorted by ordinal.
///
/// Lower `sensitivity` values yield more keyframes.
pub async fn extract_keyframes(
    video: &Path,
    frames_dir: &Path,
    sensitivity: f64,
) -> MediaResult<Vec<ExtractedFrame>> {
    tokio::fs::create_dir_all(frames_dir).await?;

    let filter = format!("select='gt(scene,{})'", sensitivity);
    let cmd = FfmpegCommand::new(video, frames_dir.join(FRAME_PATTERN))
        .video_filter(filter)
        .output_args(["-vsync", "vfr"]);

    run_ffmpeg(&cmd).await?;

    let frames = collect_frames(frames_dir).await?;
    info!(
        video = %video.display(),
        sensitivity = sensitivity,
        frames = frames.len(),
        "Extracted scene-change keyframes"
    );
    Ok(frames)
}

/// Gather the frame files in `dir`, sorted by their filename ordinal.
///
/// Files that do not match the frame pattern are ignored.
pub async fn collect_frames(dir: &Path) -> MediaResult<Vec<ExtractedFrame>> {
    let mut frames = Vec::new();

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let filename = entry.file_name().to_string_lossy().to_string();
        if let Some(ordinal) = parse_frame_ordinal(&filename) {
            frames.push(ExtractedFrame {
                ordinal,
                filename,
                path: entry.path(),
            });
        }
    }

    frames.sort_by_key(|f| f.ordinal);
    Ok(frames)
}
