//! Video preview sources and the looping preview player
//!
//! Frames are decoded to RGBA buffers. Animated GIFs and directories of still
//! frames are always supported; other containers need the `ffmpeg` feature.

#[cfg(feature = "ffmpeg")]
mod ffmpeg;
mod gif;
mod player;
mod sequence;

#[cfg(feature = "ffmpeg")]
pub use ffmpeg::FfmpegSource;
pub use gif::GifSource;
pub use player::{LoopPlayer, PlayerState, Scheduler, DEFAULT_FRAME_INTERVAL};
pub use sequence::SequenceSource;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from opening or decoding a preview source
#[derive(Debug, Error)]
pub enum VideoError {
    #[error("Unable to open the video file {path:?}: {reason}")]
    ResourceUnavailable { path: PathBuf, reason: String },
    #[error("Decoding failed: {0}")]
    DecodeFailed(String),
    #[error("Video {0:?} contains no frames")]
    EmptyStream(PathBuf),
}

impl VideoError {
    pub fn unavailable(path: &Path, reason: impl std::fmt::Display) -> Self {
        VideoError::ResourceUnavailable {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

/// A decoded RGBA frame
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    /// Tightly packed RGBA pixels, `width * height * 4` bytes
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Frame index since the last rewind (0-based)
    pub index: u64,
}

impl VideoFrame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: u64) -> Self {
        Self {
            data,
            width,
            height,
            index,
        }
    }

    /// Get the expected data size for RGBA frame dimensions (width * height * 4)
    pub fn expected_size(width: u32, height: u32) -> usize {
        (width as usize) * (height as usize) * 4
    }

    pub fn is_valid(&self) -> bool {
        self.data.len() == Self::expected_size(self.width, self.height)
    }
}

/// A stream of frames that can be restarted from the beginning
pub trait FrameSource {
    /// Decode the next frame, `None` at end of stream
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, VideoError>;

    /// Seek back to frame zero
    fn rewind(&mut self) -> Result<(), VideoError>;

    /// Frame size in pixels
    fn dimensions(&self) -> (u32, u32);

    /// Path the source was opened from
    fn path(&self) -> &Path;
}

/// Supported single-file extensions without the `ffmpeg` feature
const IMAGE_ANIMATION_EXTENSIONS: &[&str] = &["gif"];

/// Container extensions handed to FFmpeg
pub const VIDEO_EXTENSIONS: &[&str] = &["avi", "mp4", "mov", "mkv", "webm", "m4v"];

/// Open the right source for `path`
///
/// Directories are read as image sequences, `.gif` files as animations and
/// anything else through FFmpeg when available.
pub fn open_source(path: &Path) -> Result<Box<dyn FrameSource>, VideoError> {
    if path.is_dir() {
        return Ok(Box::new(SequenceSource::open(path)?));
    }
    if !path.exists() {
        return Err(VideoError::unavailable(path, "file not found"));
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if IMAGE_ANIMATION_EXTENSIONS.contains(&ext.as_str()) {
        return Ok(Box::new(GifSource::open(path)?));
    }
    open_container(path, &ext)
}

#[cfg(feature = "ffmpeg")]
fn open_container(path: &Path, _ext: &str) -> Result<Box<dyn FrameSource>, VideoError> {
    Ok(Box::new(FfmpegSource::open(path)?))
}

#[cfg(not(feature = "ffmpeg"))]
fn open_container(path: &Path, ext: &str) -> Result<Box<dyn FrameSource>, VideoError> {
    let reason = if VIDEO_EXTENSIONS.contains(&ext) {
        format!(".{} files need a build with the `ffmpeg` feature", ext)
    } else {
        "unsupported file type".to_string()
    };
    Err(VideoError::unavailable(path, reason))
}

/// File dialog extensions for the current build
pub fn supported_extensions() -> Vec<&'static str> {
    let mut extensions = IMAGE_ANIMATION_EXTENSIONS.to_vec();
    if cfg!(feature = "ffmpeg") {
        extensions.extend_from_slice(VIDEO_EXTENSIONS);
    }
    extensions
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = open_source(Path::new("/definitely/not/here.avi"))
            .err()
            .unwrap();
        assert!(matches!(err, VideoError::ResourceUnavailable { .. }));
    }

    #[test]
    fn test_unsupported_extension_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "not a video").unwrap();

        let err = open_source(&path).err().unwrap();
        assert!(matches!(err, VideoError::ResourceUnavailable { .. }));
    }

    #[test]
    fn test_open_gif() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.gif");
        test_support::write_gif(&path, 3);

        let source = open_source(&path).unwrap();
        assert_eq!(source.dimensions(), (4, 3));
        assert_eq!(source.path(), path.as_path());
    }

    #[test]
    fn test_frame_size() {
        let frame = VideoFrame::new(vec![0; 4 * 3 * 4], 4, 3, 0);
        assert!(frame.is_valid());
        assert_eq!(VideoFrame::expected_size(1920, 1080), 1920 * 1080 * 4);
    }

    #[test]
    fn test_gif_always_supported() {
        assert!(supported_extensions().contains(&"gif"));
    }
}
