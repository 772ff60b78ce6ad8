//! FFmpeg-backed source for regular video containers
//!
//! Software decode of the best video stream, scaled to RGBA.

use super::{FrameSource, VideoError, VideoFrame};
use std::path::{Path, PathBuf};

impl From<ffmpeg_next::Error> for VideoError {
    fn from(e: ffmpeg_next::Error) -> Self {
        VideoError::DecodeFailed(e.to_string())
    }
}

pub struct FfmpegSource {
    path: PathBuf,
    input: ffmpeg_next::format::context::Input,
    video_stream_index: usize,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
    frame_index: u64,
    eof: bool,
}

impl FfmpegSource {
    pub fn open(path: &Path) -> Result<Self, VideoError> {
        // Initialize FFmpeg (safe to call multiple times)
        ffmpeg_next::init().map_err(|e| VideoError::unavailable(path, e))?;

        let input = ffmpeg_next::format::input(&path).map_err(|e| VideoError::unavailable(path, e))?;

        let video_stream = input
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or_else(|| VideoError::unavailable(path, "no video stream found in file"))?;
        let video_stream_index = video_stream.index();

        let context = ffmpeg_next::codec::context::Context::from_parameters(video_stream.parameters())
            .map_err(|e| VideoError::unavailable(path, e))?;
        let decoder = context
            .decoder()
            .video()
            .map_err(|e| VideoError::unavailable(path, format!("failed to create decoder: {}", e)))?;

        let width = decoder.width();
        let height = decoder.height();

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGBA,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )
        .map_err(|e| VideoError::unavailable(path, format!("failed to create scaler: {}", e)))?;

        log::info!("Opened video {:?}: {}x{}", path, width, height);

        Ok(Self {
            path: path.to_path_buf(),
            input,
            video_stream_index,
            decoder,
            scaler,
            width,
            height,
            frame_index: 0,
            eof: false,
        })
    }

    fn to_frame(&mut self, decoded: &ffmpeg_next::frame::Video) -> Result<VideoFrame, VideoError> {
        let mut rgba_frame = ffmpeg_next::frame::Video::empty();
        self.scaler.run(decoded, &mut rgba_frame)?;

        let data = rgba_frame.data(0);
        let stride = rgba_frame.stride(0);
        let row_bytes = (self.width as usize) * 4;

        let mut pixels = Vec::with_capacity(VideoFrame::expected_size(self.width, self.height));
        for y in 0..self.height as usize {
            let row_start = y * stride;
            pixels.extend_from_slice(&data[row_start..row_start + row_bytes]);
        }

        let frame = VideoFrame::new(pixels, self.width, self.height, self.frame_index);
        self.frame_index += 1;
        Ok(frame)
    }
}

impl FrameSource for FfmpegSource {
    fn next_frame(&mut self) -> Result<Option<VideoFrame>, VideoError> {
        let mut decoded = ffmpeg_next::frame::Video::empty();

        loop {
            match self.decoder.receive_frame(&mut decoded) {
                Ok(()) => return self.to_frame(&decoded).map(Some),
                Err(ffmpeg_next::Error::Other {
                    errno: ffmpeg_next::error::EAGAIN,
                }) => {
                    // Need more input
                }
                Err(ffmpeg_next::Error::Eof) => return Ok(None),
                Err(e) => return Err(VideoError::DecodeFailed(e.to_string())),
            }

            if self.eof {
                return Ok(None);
            }

            loop {
                match self.input.packets().next() {
                    Some((stream, packet)) => {
                        if stream.index() == self.video_stream_index {
                            self.decoder.send_packet(&packet)?;
                            break;
                        }
                    }
                    None => {
                        self.decoder.send_eof()?;
                        self.eof = true;
                        break;
                    }
                }
            }
        }
    }

    fn rewind(&mut self) -> Result<(), VideoError> {
        self.input.seek(0, ..)?;
        self.decoder.flush();
        self.frame_index = 0;
        self.eof = false;
        Ok(())
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
