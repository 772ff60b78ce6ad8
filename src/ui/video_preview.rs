//! Video preview window
//!
//! Wraps the [`LoopPlayer`] and uploads each new frame as an egui texture.
//! Closing the window stops playback.

use crate::video::{self, LoopPlayer, VideoError, VideoFrame};
use eframe::egui::{self, Color32, Pos2, Rect, Stroke, Vec2};
use std::path::Path;
use std::time::{Duration, Instant};

/// Video preview window
pub struct VideoPreviewWindow {
    /// Whether the window is shown
    pub open: bool,
    player: LoopPlayer,
    texture: Option<egui::TextureHandle>,
}

impl VideoPreviewWindow {
    pub fn new(interval: Duration) -> Self {
        Self {
            open: false,
            player: LoopPlayer::new(interval),
            texture: None,
        }
    }

    pub fn player(&self) -> &LoopPlayer {
        &self.player
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.player.set_interval(interval);
    }

    /// Open `path` and start looping it in the window
    pub fn start(&mut self, ctx: &egui::Context, path: &Path) -> Result<(), VideoError> {
        let source = video::open_source(path)?;
        self.player.start(source, Instant::now(), &mut ctx.clone());
        self.texture = None;
        self.open = true;
        Ok(())
    }

    pub fn stop(&mut self) {
        self.player.stop();
        self.texture = None;
        self.open = false;
    }

    /// Advance playback and draw the window
    ///
    /// A playback error closes the window and is returned for the caller to
    /// report. Playback continues while the window is disabled.
    pub fn show(&mut self, ctx: &egui::Context, enabled: bool) -> Option<VideoError> {
        if !self.open {
            return None;
        }

        match self.player.poll(Instant::now(), &mut ctx.clone()) {
            Ok(true) => {
                if let Some(frame) = self.player.current_frame() {
                    upload_frame(ctx, &mut self.texture, frame);
                }
            }
            Ok(false) => {}
            Err(e) => {
                self.stop();
                return Some(e);
            }
        }

        let mut open = self.open;
        let texture = self.texture.as_ref().map(|t| (t.id(), t.size_vec2()));
        let loops = self.player.loop_count();
        egui::Window::new("Video")
            .open(&mut open)
            .enabled(enabled)
            .default_size([640.0, 400.0])
            .resizable(true)
            .show(ctx, |ui| {
                draw_frame(ui, texture);
                ui.label(format!("Loops: {}", loops));
            });

        if !open {
            log::debug!("Preview window closed");
            self.stop();
        }
        None
    }
}

fn upload_frame(ctx: &egui::Context, texture: &mut Option<egui::TextureHandle>, frame: &VideoFrame) {
    if !frame.is_valid() {
        log::warn!("Skipping malformed frame {}", frame.index);
        return;
    }
    let image = egui::ColorImage::from_rgba_unmultiplied(
        [frame.width as usize, frame.height as usize],
        &frame.data,
    );
    match texture {
        Some(handle) => handle.set(image, egui::TextureOptions::LINEAR),
        None => *texture = Some(ctx.load_texture("video_preview", image, egui::TextureOptions::LINEAR)),
    }
}

/// Draw the frame scaled to fit, keeping its aspect ratio
fn draw_frame(ui: &mut egui::Ui, texture: Option<(egui::TextureId, Vec2)>) {
    let available = Vec2::new(ui.available_width().max(160.0), (ui.available_height() - 24.0).max(120.0));
    let (response, painter) = ui.allocate_painter(available, egui::Sense::hover());
    let rect = response.rect;

    painter.rect_filled(rect, 4.0, Color32::from_gray(20));

    match texture {
        Some((id, size)) if size.x > 0.0 && size.y > 0.0 => {
            let scale = (rect.width() / size.x).min(rect.height() / size.y);
            let fitted = Rect::from_center_size(rect.center(), size * scale);
            painter.image(
                id,
                fitted,
                Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        _ => {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Loading...",
                egui::FontId::proportional(16.0),
                Color32::from_gray(100),
            );
        }
    }

    painter.rect_stroke(rect, 4.0, Stroke::new(1.0, Color32::from_gray(60)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_missing_file_stays_closed() {
        let ctx = egui::Context::default();
        let mut window = VideoPreviewWindow::new(Duration::from_millis(10));

        let err = window.start(&ctx, Path::new("/definitely/not/here.gif")).unwrap_err();
        assert!(matches!(err, VideoError::ResourceUnavailable { .. }));
        assert!(!window.open);
        assert!(!window.player().is_playing());
    }

    #[test]
    fn test_start_and_stop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.gif");
        crate::video::test_support::write_gif(&path, 3);

        let ctx = egui::Context::default();
        let mut window = VideoPreviewWindow::new(Duration::from_millis(10));
        window.start(&ctx, &path).unwrap();
        assert!(window.open);
        assert!(window.player().is_playing());

        window.stop();
        assert!(!window.open);
        assert!(!window.player().is_playing());
    }
}
