//! Plot rendering module using egui_plot
//!
//! This module draws the loaded capture and the measurement cursors, and
//! translates pointer input over the plot into cursor events.
//!
//! # Features
//!
//! - **Decimation**: Long captures are reduced to min/max pairs per bucket
//! - **Cursor overlays**: Time markers as vertical lines, voltage markers as
//!   horizontal lines, each with a value label
//! - **Interaction**: Double-click places a marker, dragging near a marker
//!   with the primary button moves it, dragging elsewhere pans the plot
//! - **Graticule**: Background and a 1-2-5 grid drawn in the palette colors
//!
//! # Main Types
//!
//! - [`PlotSurface`] - Per-window plot state (decimation cache, last transform)

use std::collections::HashMap;
use std::path::PathBuf;

use egui::{Align2, PointerButton, Pos2, Shape, Stroke, Ui};
use egui_plot::{HLine, Legend, Line, Plot, PlotPoint, PlotPoints, PlotTransform, Text, VLine};

use crate::capture::CaptureLoader;
use crate::config::theme::{color32, Palette};
use crate::cursor::{Axis, CursorId, CursorModel, PlotPos, PlotViewport, PointerEvent};
use crate::types::{Capture, MAX_RENDER_POINTS};
use crate::viewer::{Viewer, ViewerAction};

/// Target grid divisions along x and y, like a scope graticule
const GRID_DIVISIONS: [f64; 2] = [10.0, 8.0];

/// Plot state that lives across frames
#[derive(Debug, Default)]
pub struct PlotSurface {
    /// Line width for channel traces
    pub line_width: f32,
    /// Decimated points per channel for the current capture
    decimation_cache: HashMap<String, Vec<[f64; 2]>>,
    /// Capture the cache was built for
    cache_source: Option<PathBuf>,
    /// Transform of the previous frame, used to hit-test before drawing
    last_transform: Option<PlotTransform>,
    reset_requested: bool,
}

impl PlotSurface {
    pub fn new() -> Self {
        Self {
            line_width: 1.0,
            ..Default::default()
        }
    }

    /// Fit the capture again on the next frame
    pub fn reset_zoom(&mut self) {
        self.reset_requested = true;
    }

    /// Visible ranges as of the last drawn frame
    pub fn viewport(&self) -> Option<PlotViewport> {
        self.last_transform.as_ref().map(viewport_of)
    }

    fn sync_cache(&mut self, capture: &Capture) {
        if self.cache_source.as_deref() == Some(capture.path()) {
            return;
        }
        self.decimation_cache.clear();
        for channel in capture.waveform.channels() {
            if let Some(points) = capture.waveform.plot_points(&channel.name) {
                self.decimation_cache
                    .insert(channel.name.clone(), decimate_points(&points, MAX_RENDER_POINTS));
            }
        }
        self.cache_source = Some(capture.path().to_path_buf());
        self.reset_requested = true;
    }

    /// Draw the plot and feed pointer input to the viewer
    ///
    /// Returns true when a cursor position changed this frame.
    pub fn render<L: CaptureLoader>(
        &mut self,
        ui: &mut Ui,
        viewer: &mut Viewer<L>,
        palette: &Palette,
    ) -> bool {
        let Some(capture) = viewer.capture() else {
            ui.centered_and_justified(|ui| {
                ui.label("Open a folder and select a CSV file to view it");
            });
            return false;
        };
        self.sync_cache(capture);

        if let Some(title) = viewer.plot_title() {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(title).color(color32(palette.foreground)).strong());
            });
        }

        let cursors = viewer.cursors();
        let grab_marker = cursors.is_dragging() || self.pointer_near_marker(ui, cursors);

        let mut plot = Plot::new("scope_plot")
            .legend(Legend::default())
            .x_axis_label(format!("Time ({})", capture.metadata.horizontal_units()))
            .y_axis_label(format!("Voltage ({})", capture.metadata.vertical_units()))
            .allow_drag(!grab_marker)
            .allow_double_click_reset(false)
            .show_background(false)
            .show_grid(false);
        if self.reset_requested {
            plot = plot.reset();
            self.reset_requested = false;
        }

        // filled in once the frame's transform is known
        let backdrop = ui.painter().add(Shape::Noop);

        let line_width = self.line_width;
        let cache = &self.decimation_cache;
        let response = plot.show(ui, |plot_ui| {
            for (index, channel) in viewer.channels().iter().enumerate() {
                if !channel.visible {
                    continue;
                }
                let Some(points) = cache.get(&channel.name) else {
                    continue;
                };
                let line = Line::new(channel.name.clone(), PlotPoints::from(points.clone()))
                    .color(palette.channel_color(index))
                    .width(line_width);
                plot_ui.line(line);
            }

            let bounds = plot_ui.plot_bounds();
            let (x_min, y_max) = (bounds.min()[0], bounds.max()[1]);
            for id in CursorId::ALL {
                let pair = cursors.pair(id.axis);
                let Some(value) = pair.position(id.slot) else {
                    continue;
                };
                let color = color32(pair.color.rgba());
                match id.axis {
                    Axis::Time => {
                        plot_ui.vline(VLine::new(id.name(), value).color(color).width(1.5));
                        plot_ui.text(
                            Text::new(id.name(), PlotPoint::new(value, y_max), id.label(value))
                                .color(color)
                                .anchor(Align2::RIGHT_TOP),
                        );
                    }
                    Axis::Voltage => {
                        plot_ui.hline(HLine::new(id.name(), value).color(color).width(1.5));
                        plot_ui.text(
                            Text::new(id.name(), PlotPoint::new(x_min, value), id.label(value))
                                .color(color)
                                .anchor(Align2::LEFT_BOTTOM),
                        );
                    }
                }
            }
        });

        let transform = response.transform;
        ui.painter().set(backdrop, graticule(&transform, palette));
        let viewport = viewport_of(&transform);

        let r = &response.response;
        let gesture = PlotGesture {
            double_click: r.double_clicked().then(|| r.interact_pointer_pos()).flatten(),
            press: r
                .drag_started_by(PointerButton::Primary)
                .then(|| ui.input(|i| i.pointer.press_origin()).or(r.interact_pointer_pos()))
                .flatten(),
            drag: r
                .dragged_by(PointerButton::Primary)
                .then(|| r.interact_pointer_pos())
                .flatten(),
            release: r.drag_stopped_by(PointerButton::Primary),
        };
        let events = gesture.events(|pos| {
            let value = transform.value_from_position(pos);
            PlotPos::new(value.x, value.y)
        });
        self.last_transform = Some(transform);

        let mut changed = false;
        for event in events {
            changed |= viewer.dispatch(ViewerAction::Pointer { event, viewport });
        }
        changed
    }

    fn pointer_near_marker(&self, ui: &Ui, cursors: &CursorModel) -> bool {
        let (Some(transform), Some(pos)) = (
            self.last_transform.as_ref(),
            ui.input(|i| i.pointer.hover_pos()),
        ) else {
            return false;
        };
        if !transform.frame().contains(pos) {
            return false;
        }
        let value = transform.value_from_position(pos);
        cursors
            .marker_near(PlotPos::new(value.x, value.y), &viewport_of(transform))
            .is_some()
    }
}

/// Pointer input over the plot for one frame, in screen coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PlotGesture {
    double_click: Option<Pos2>,
    /// Where the primary button went down for a drag that started this frame
    press: Option<Pos2>,
    /// Pointer position while dragging with the primary button
    drag: Option<Pos2>,
    release: bool,
}

impl PlotGesture {
    fn events(&self, to_plot: impl Fn(Pos2) -> PlotPos) -> Vec<PointerEvent> {
        let mut events = Vec::new();
        if let Some(pos) = self.double_click {
            events.push(PointerEvent::DoubleClick(to_plot(pos)));
        }
        if let Some(pos) = self.press {
            events.push(PointerEvent::Press(to_plot(pos)));
        }
        if let Some(pos) = self.drag {
            events.push(PointerEvent::Move(to_plot(pos)));
        }
        if self.release {
            events.push(PointerEvent::Release);
        }
        events
    }
}

/// Grid line positions at a 1-2-5 step covering `[min, max]`
fn grid_lines(min: f64, max: f64, divisions: f64) -> Vec<f64> {
    let span = max - min;
    if !span.is_finite() || span <= 0.0 || divisions <= 0.0 {
        return Vec::new();
    }
    let step = nice_step(span / divisions);
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|k| k as f64 * step).collect()
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let factor = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    factor * magnitude
}

/// Plot background and grid in the palette colors
fn graticule(transform: &PlotTransform, palette: &Palette) -> Shape {
    let frame = *transform.frame();
    let bounds = transform.bounds();
    let stroke = Stroke::new(1.0, color32(palette.grid));

    let mut shapes = vec![Shape::rect_filled(frame, 0.0, color32(palette.background))];
    for x in grid_lines(bounds.min()[0], bounds.max()[0], GRID_DIVISIONS[0]) {
        let sx = transform.position_from_point_x(x);
        shapes.push(Shape::line_segment(
            [Pos2::new(sx, frame.top()), Pos2::new(sx, frame.bottom())],
            stroke,
        ));
    }
    for y in grid_lines(bounds.min()[1], bounds.max()[1], GRID_DIVISIONS[1]) {
        let sy = transform.position_from_point_y(y);
        shapes.push(Shape::line_segment(
            [Pos2::new(frame.left(), sy), Pos2::new(frame.right(), sy)],
            stroke,
        ));
    }
    Shape::Vec(shapes)
}

fn viewport_of(transform: &PlotTransform) -> PlotViewport {
    let bounds = transform.bounds();
    PlotViewport::new(
        [bounds.min()[0], bounds.max()[0]],
        [bounds.min()[1], bounds.max()[1]],
    )
}

/// Reduce a trace to at most about `max_points` points
///
/// Keeps the first and last point and, per bucket, the minimum and maximum
/// sample in time order so peaks survive.
pub fn decimate_points(points: &[[f64; 2]], max_points: usize) -> Vec<[f64; 2]> {
    if points.len() <= max_points || points.is_empty() {
        return points.to_vec();
    }

    let bucket_size = points.len() / (max_points / 2).max(1);
    let mut result = Vec::with_capacity(max_points + 2);

    result.push(points[0]);

    for bucket in points[1..points.len() - 1].chunks(bucket_size.max(1)) {
        let (min_pt, max_pt) = bucket.iter().fold((bucket[0], bucket[0]), |(min, max), pt| {
            (
                if pt[1] < min[1] { *pt } else { min },
                if pt[1] > max[1] { *pt } else { max },
            )
        });
        if min_pt[0] < max_pt[0] {
            result.push(min_pt);
            result.push(max_pt);
        } else {
            result.push(max_pt);
            result.push(min_pt);
        }
    }

    if let Some(last) = points.last() {
        result.push(*last);
    }

    result
}
