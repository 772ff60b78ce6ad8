//! Image sequence source
//!
//! Plays a directory of still frames in file name order. Frames are loaded
//! lazily, one per call.

use super::{FrameSource, VideoError, VideoFrame};
use std::path::{Path, PathBuf};

const FRAME_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp"];

pub struct SequenceSource {
    dir: PathBuf,
    files: Vec<PathBuf>,
    position: usize,
    width: u32,
    height: u32,
}

impl SequenceSource {
    pub fn open(dir: &Path) -> Result<Self, VideoError> {
        let entries = std::fs::read_dir(dir).map_err(|e| VideoError::unavailable(dir, e))?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_frame_file(path))
            .collect();
        files.sort();

        let Some(first) = files.first() else {
            return Err(VideoError::EmptyStream(dir.to_path_buf()));
        };
        let (width, height) =
            image::image_dimensions(first).map_err(|e| VideoError::unavailable(first, e))?;

        log::info!(
            "Opened image sequence {:?}: {}x{}, {} frames",
            dir,
            width,
            height,
            files.len()
        );

        Ok(Self {
            dir: dir.to_path_buf(),
            files,
            position: 0,
            width,
            height,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.files.len()
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .map(|ext| FRAME_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

impl FrameSource for SequenceSource {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, VideoError> {
        let Some(path) = self.files.get(self.position) else {
            return Ok(None);
        };
        let img = image::open(path)
            .map_err(|e| VideoError::DecodeFailed(format!("{:?}: {}", path, e)))?
            .to_rgba8();

        let frame = VideoFrame::new(
            img.as_raw().clone(),
            img.width(),
            img.height(),
            self.position as u64,
        );
        self.position += 1;
        Ok(Some(frame))
    }

    fn rewind(&mut self) -> Result<(), VideoError> {
        self.position = 0;
        Ok(())
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn path(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn write_frames(dir: &Path, names: &[&str]) {
        for (i, name) in names.iter().enumerate() {
            let shade = (i as u8) * 50;
            RgbaImage::from_pixel(5, 2, Rgba([shade, 0, 0, 255]))
                .save(dir.join(name))
                .unwrap();
        }
    }

    #[test]
    fn test_frames_play_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write_frames(dir.path(), &["frame_002.png", "frame_000.png", "frame_001.png"]);
        std::fs::write(dir.path().join("readme.txt"), "skip me").unwrap();

        let mut source = SequenceSource::open(dir.path()).unwrap();
        assert_eq!(source.frame_count(), 3);
        assert_eq!(source.dimensions(), (5, 2));

        // frame_000 was written second, with shade 50
        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.data[0], 50);
        assert_eq!(first.index, 0);

        source.next_frame().unwrap();
        source.next_frame().unwrap();
        assert!(source.next_frame().unwrap().is_none());

        source.rewind().unwrap();
        assert_eq!(source.next_frame().unwrap().unwrap().index, 0);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            SequenceSource::open(dir.path()),
            Err(VideoError::EmptyStream(_))
        ));
    }
}
