//! UI components
//!
//! Tab contents, plot windows, the video preview window and modal
//! notifications.

pub mod calculation_panel;
pub mod notification;
pub mod plot_view;
pub mod video_preview;

pub use notification::{Notification, NotificationKind};
pub use plot_view::{DepthProfileView, PrismView};
pub use video_preview::VideoPreviewWindow;
