//! Animated GIF source
//!
//! Frames are decoded one at a time as playback reaches them, so memory stays
//! at one canvas regardless of clip length. Rewinding reopens the file.

use super::{FrameSource, VideoError, VideoFrame};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, Frames, ImageDecoder};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

pub struct GifSource {
    path: PathBuf,
    frames: Frames<'static>,
    position: u64,
    width: u32,
    height: u32,
}

impl GifSource {
    pub fn open(path: &Path) -> Result<Self, VideoError> {
        let (frames, (width, height)) = decode(path)?;
        log::info!("Opened GIF {:?}: {}x{}", path, width, height);

        Ok(Self {
            path: path.to_path_buf(),
            frames,
            position: 0,
            width,
            height,
        })
    }
}

/// Start decoding `path` from its first frame
fn decode(path: &Path) -> Result<(Frames<'static>, (u32, u32)), VideoError> {
    let file = File::open(path).map_err(|e| VideoError::unavailable(path, e))?;
    let decoder =
        GifDecoder::new(BufReader::new(file)).map_err(|e| VideoError::unavailable(path, e))?;
    let dimensions = decoder.dimensions();
    Ok((decoder.into_frames(), dimensions))
}

impl FrameSource for GifSource {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, VideoError> {
        let Some(frame) = self.frames.next() else {
            return Ok(None);
        };
        let img = frame
            .map_err(|e| VideoError::DecodeFailed(format!("{:?}: {}", self.path, e)))?
            .into_buffer();

        let (width, height) = img.dimensions();
        let frame = VideoFrame::new(img.into_raw(), width, height, self.position);
        self.position += 1;
        Ok(Some(frame))
    }

    fn rewind(&mut self) -> Result<(), VideoError> {
        let (frames, _) = decode(&self.path)?;
        self.frames = frames;
        self.position = 0;
        Ok(())
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
