//! 2D and 3D plot windows
//!
//! Both plots are painted directly with the egui painter. The 3D view keeps an
//! orbit camera: drag to rotate, scroll to zoom, double-click to reset.

use crate::geometry::UnitMode;
use crate::plot::{box_edges, plasma, DepthProfile, OrbitCamera, PrismMesh, PRISM_TRIANGLES};
use eframe::egui::{self, Color32, FontId, Pos2, Rect, Stroke, Vec2};

const AXIS_COLOR: Color32 = Color32::from_gray(160);
const GRID_COLOR: Color32 = Color32::from_gray(60);
const LINE_COLOR: Color32 = Color32::from_rgb(100, 180, 255);

fn label_font() -> FontId {
    FontId::proportional(12.0)
}

/// Snapshot of the 2D depth profile
pub struct DepthProfileView {
    pub profile: DepthProfile,
    pub units: UnitMode,
}

impl DepthProfileView {
    pub fn new(sensor_height: f64, road_height: f64, units: UnitMode) -> Self {
        Self {
            profile: DepthProfile::new(sensor_height, road_height),
            units,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let size = Vec2::new(ui.available_width().max(360.0), ui.available_height().max(260.0));
        let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
        let rect = response.rect;

        painter.rect_filled(rect, 4.0, Color32::from_gray(20));

        let plot = Rect::from_min_max(
            rect.min + Vec2::new(64.0, 32.0),
            rect.max - Vec2::new(24.0, 40.0),
        );
        let (lo, hi) = self.profile.value_range();
        let to_y = |v: f64| plot.max.y - ((v - lo) / (hi - lo)) as f32 * plot.height();

        // Horizontal grid with value ticks
        for i in 0..=4 {
            let v = lo + (hi - lo) * i as f64 / 4.0;
            let y = to_y(v);
            painter.line_segment(
                [Pos2::new(plot.min.x, y), Pos2::new(plot.max.x, y)],
                Stroke::new(1.0, GRID_COLOR),
            );
            painter.text(
                Pos2::new(plot.min.x - 6.0, y),
                egui::Align2::RIGHT_CENTER,
                format!("{:.2}", v),
                label_font(),
                AXIS_COLOR,
            );
        }

        painter.line_segment([plot.left_bottom(), plot.right_bottom()], Stroke::new(1.0, AXIS_COLOR));
        painter.line_segment([plot.left_bottom(), plot.left_top()], Stroke::new(1.0, AXIS_COLOR));

        let count = self.profile.points.len();
        let points: Vec<Pos2> = self
            .profile
            .points
            .iter()
            .enumerate()
            .map(|(i, (_, v))| {
                let x = plot.min.x + plot.width() * (i as f32 + 0.5) / count as f32;
                Pos2::new(x, to_y(*v))
            })
            .collect();

        for window in points.windows(2) {
            painter.line_segment([window[0], window[1]], Stroke::new(2.0, LINE_COLOR));
        }
        for (point, (label, _)) in points.iter().zip(self.profile.points.iter()) {
            painter.circle(*point, 5.0, LINE_COLOR, Stroke::new(1.0, Color32::WHITE));
            painter.text(
                Pos2::new(point.x, plot.max.y + 6.0),
                egui::Align2::CENTER_TOP,
                *label,
                label_font(),
                AXIS_COLOR,
            );
        }

        painter.text(
            rect.left_top() + Vec2::new(8.0, 8.0),
            egui::Align2::LEFT_TOP,
            format!("Depth ({})", self.units.length_label()),
            label_font(),
            AXIS_COLOR,
        );
    }
}

/// Interactive 3D view of the pothole prism
pub struct PrismView {
    pub mesh: PrismMesh,
    pub units: UnitMode,
    camera: OrbitCamera,
}

impl PrismView {
    pub fn new(sensor_height: f64, road_height: f64, units: UnitMode) -> Self {
        let mesh = PrismMesh::new(sensor_height, road_height);
        let mut camera = OrbitCamera::new();
        let (min, max) = mesh.bounds();
        camera.fit_to(min, max);
        Self { mesh, units, camera }
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn show(&mut self, ui: &mut egui::Ui) {
        let size = Vec2::new(ui.available_width().max(420.0), ui.available_height().max(320.0));
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());
        let rect = response.rect;

        if response.dragged_by(egui::PointerButton::Primary) {
            let delta = response.drag_delta();
            self.camera.on_mouse_drag((delta.x * 0.01, delta.y * 0.01), 1.0);
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.0 {
                self.camera.on_scroll(scroll * 0.01);
            }
        }
        if response.double_clicked() {
            self.camera.reset();
        }

        painter.rect_filled(rect, 4.0, Color32::from_gray(20));

        let bar_width = 18.0;
        let plot = Rect::from_min_max(rect.min, Pos2::new(rect.max.x - bar_width * 5.0, rect.max.y));
        self.camera.set_aspect(plot.width() / plot.height());

        let project = |p: glam::Vec3| {
            self.camera
                .project(p, plot.width(), plot.height())
                .map(|pp| (Pos2::new(plot.min.x + pp.x, plot.min.y + pp.y), pp.depth))
        };

        // Bounding box grid
        let (min, max) = self.mesh.bounds();
        for (a, b) in box_edges(min, max) {
            if let (Some((pa, _)), Some((pb, _))) = (project(a), project(b)) {
                painter.extend(egui::Shape::dashed_line(&[pa, pb], Stroke::new(1.0, GRID_COLOR), 4.0, 3.0));
            }
        }

        // Axis labels at the midpoints of three box edges
        let unit = self.units.length_label();
        let axis_labels = [
            (glam::Vec3::new((min.x + max.x) * 0.5, min.y, min.z), format!("X-axis ({})", unit)),
            (glam::Vec3::new(max.x, (min.y + max.y) * 0.5, min.z), format!("Y-axis ({})", unit)),
            (glam::Vec3::new(min.x, max.y, (min.z + max.z) * 0.5), format!("Z-axis ({})", unit)),
        ];
        for (anchor, text) in axis_labels {
            if let Some((pos, _)) = project(anchor) {
                painter.text(pos, egui::Align2::CENTER_CENTER, text, label_font(), AXIS_COLOR);
            }
        }

        // Half-transparent surface
        let mut surface = egui::Mesh::default();
        for triangle in PRISM_TRIANGLES {
            let corners: Vec<_> = triangle
                .iter()
                .filter_map(|&i| project(self.mesh.vertices[i]).map(|(pos, _)| (i, pos)))
                .collect();
            if corners.len() != 3 {
                continue;
            }
            let base = surface.vertices.len() as u32;
            for (i, pos) in corners {
                let [r, g, b] = self.mesh.vertex_color(i);
                surface.colored_vertex(pos, Color32::from_rgba_unmultiplied(r, g, b, 128));
            }
            surface.add_triangle(base, base + 1, base + 2);
        }
        painter.add(egui::Shape::mesh(surface));

        // Scatter, far points first
        let mut points: Vec<_> = self
            .mesh
            .vertices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| project(*v).map(|(pos, depth)| (i, pos, depth)))
            .collect();
        points.sort_by(|a, b| b.2.total_cmp(&a.2));
        for (i, pos, _) in points {
            let [r, g, b] = self.mesh.vertex_color(i);
            painter.circle(pos, 6.0, Color32::from_rgb(r, g, b), Stroke::new(1.0, Color32::BLACK));
        }

        self.draw_color_bar(&painter, rect, bar_width);
    }

    fn draw_color_bar(&self, painter: &egui::Painter, rect: Rect, bar_width: f32) {
        let bar = Rect::from_min_max(
            Pos2::new(rect.max.x - bar_width * 4.0, rect.min.y + rect.height() * 0.1),
            Pos2::new(rect.max.x - bar_width * 3.0, rect.min.y + rect.height() * 0.9),
        );

        let steps = 32;
        let step_height = bar.height() / steps as f32;
        for i in 0..steps {
            // Top of the bar is the deepest value
            let t = 1.0 - (i as f32 + 0.5) / steps as f32;
            let [r, g, b] = plasma(t);
            let y = bar.min.y + i as f32 * step_height;
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(bar.min.x, y), Vec2::new(bar.width(), step_height + 0.5)),
                0.0,
                Color32::from_rgb(r, g, b),
            );
        }
        painter.rect_stroke(bar, 0.0, Stroke::new(1.0, AXIS_COLOR));

        let (lo, hi) = self.mesh.depth_range();
        painter.text(
            bar.right_top() + Vec2::new(4.0, 0.0),
            egui::Align2::LEFT_CENTER,
            format!("{:.2}", hi),
            label_font(),
            AXIS_COLOR,
        );
        painter.text(
            bar.right_bottom() + Vec2::new(4.0, 0.0),
            egui::Align2::LEFT_CENTER,
            format!("{:.2}", lo),
            label_font(),
            AXIS_COLOR,
        );
        painter.text(
            Pos2::new(bar.center().x, bar.min.y - 8.0),
            egui::Align2::CENTER_BOTTOM,
            format!("Depth ({})", self.units.length_label()),
            label_font(),
            AXIS_COLOR,
        );
    }
}
