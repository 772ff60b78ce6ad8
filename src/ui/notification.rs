//! Modal notifications
//!
//! A notification dims the rest of the window and must be dismissed before
//! the application accepts input again.

use eframe::egui::{self, Color32};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Success,
}

/// A message waiting for the user to acknowledge it
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Success".to_string(),
            message: message.into(),
        }
    }

    fn accent(&self) -> Color32 {
        match self.kind {
            NotificationKind::Error => Color32::from_rgb(220, 80, 80),
            NotificationKind::Success => Color32::from_rgb(80, 180, 100),
        }
    }

    /// Show the notification as a modal window
    ///
    /// Returns `true` once the user dismisses it.
    pub fn show_modal(&self, ctx: &egui::Context) -> bool {
        // Dim everything below the modal
        let backdrop = egui::LayerId::new(egui::Order::Middle, egui::Id::new("notification_backdrop"));
        ctx.layer_painter(backdrop)
            .rect_filled(ctx.screen_rect(), 0.0, Color32::from_black_alpha(140));

        let mut dismissed = false;
        egui::Window::new(&self.title)
            .id(egui::Id::new("notification_modal"))
            .order(egui::Order::Foreground)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.set_min_width(260.0);
                ui.colored_label(self.accent(), &self.message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if ctx.input(|i| i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Escape)) {
            dismissed = true;
        }
        dismissed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let err = Notification::error("Invalid input for Sensor Angle");
        assert_eq!(err.kind, NotificationKind::Error);
        assert_eq!(err.title, "Error");

        let ok = Notification::success("Data saved");
        assert_eq!(ok.kind, NotificationKind::Success);
        assert_ne!(ok.accent(), err.accent());
    }
}
