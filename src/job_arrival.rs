//! Job arrival graph: multi-granularity arrival histograms
//!
//! Buckets the submission times of a workload trace at second, minute, hour
//! and day granularity and renders the four series as line plots in a 2x2
//! grid, saved as `job_arrival_{workload}.png`.
//!
//! Traces with no arrivals, or with every bucket below one unit of the
//! granularity, get a "trace too small" placeholder panel instead of a plot.
//! That is the expected output for short traces, not an error.
//!
//! # Example
//!
//! ```no_run
//! use wta_stats::arrival::ArrivalRecord;
//! use wta_stats::job_arrival::generate;
//!
//! # fn main() -> Result<(), wta_stats::job_arrival::GraphError> {
//! let records: Vec<ArrivalRecord> = [0, 30, 90, 7_200].into_iter().map(ArrivalRecord::from).collect();
//! let (text, image) = generate(&records, "spark_pi", "/tmp")?;
//! assert!(text.is_none());
//! assert_eq!(image, "job_arrival_spark_pi");
//! # Ok(())
//! # }
//! ```

use crate::arrival::{aggregate_all, ArrivalRecord, BucketMap, PanelKind};
use crate::canvas::{format_tick, nice_ticks, Anchor, Canvas, BLACK, GRID_GREY};
use crate::granularity::Granularity;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Figure size in inches, matching the report layout
pub const FIGURE_SIZE_INCHES: (f64, f64) = (6.4, 4.8);

/// Output resolution; fixes the pixel size of every saved figure
pub const DPI: f64 = 200.0;

/// Extension of the saved image
pub const IMAGE_EXTENSION: &str = "png";

/// Placeholder notice for panels with nothing to plot
pub const PLACEHOLDER_LINES: [&str; 2] = ["Not available;", "Trace too small."];

pub const Y_LABEL: &str = "# Jobs";

const Y_MAX_BINS: usize = 3;
const X_MAX_BINS: usize = 4;
const MARGIN: f64 = 0.05;

const OUTER_PAD: i32 = 16;
const LABEL_SCALE: u32 = 2;
const TICK_SCALE: u32 = 2;
const NOTICE_SCALE: u32 = 3;
const TICK_LEN: i32 = 6;

/// Errors from rendering or saving an arrival graph
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Output folder does not exist or is not a directory: {0}")]
    OutputFolder(PathBuf),

    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for arrival graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

/// Pixel size of the saved figure
pub fn figure_pixels() -> (u32, u32) {
    (
        (FIGURE_SIZE_INCHES.0 * DPI).round() as u32,
        (FIGURE_SIZE_INCHES.1 * DPI).round() as u32,
    )
}

/// Base name of the saved image, without directory or extension
pub fn output_name(workload_name: &str) -> String {
    format!("job_arrival_{}", workload_name)
}

/// Job arrival graph for one workload
#[derive(Debug)]
pub struct JobArrivalGraph<'a> {
    workload_name: &'a str,
    records: &'a [ArrivalRecord],
    folder: &'a Path,
}

impl<'a> JobArrivalGraph<'a> {
    pub fn new(workload_name: &'a str, records: &'a [ArrivalRecord], folder: &'a Path) -> Self {
        Self {
            workload_name,
            records,
            folder,
        }
    }

    /// Report content: no text, plus the saved image name
    pub fn generate_content(&self) -> Result<(Option<String>, String)> {
        let image = self.generate_graphs()?;
        Ok((None, image))
    }

    /// Render and save the figure, returning its base file name
    pub fn generate_graphs(&self) -> Result<String> {
        if !self.folder.is_dir() {
            return Err(GraphError::OutputFolder(self.folder.to_path_buf()));
        }

        let canvas = self.render();

        let filename = output_name(self.workload_name);
        let path = self
            .folder
            .join(format!("{}.{}", filename, IMAGE_EXTENSION));
        canvas.save(&path)?;

        tracing::info!(
            path = %path.display(),
            records = self.records.len(),
            "Saved job arrival graph"
        );

        Ok(filename)
    }

    /// Render the composite figure in memory
    pub fn render(&self) -> Canvas {
        let (width, height) = figure_pixels();
        let mut canvas = Canvas::new(width, height);

        for map in aggregate_all(self.records) {
            let granularity = map.granularity();
            let cell = Cell::for_granularity(granularity);

            tracing::debug!(
                granularity = %granularity,
                buckets = map.len(),
                max_key = ?map.max_key(),
                "Bucketed arrivals"
            );

            match map.panel_kind() {
                PanelKind::Line => draw_line_panel(&mut canvas, &cell, &map),
                PanelKind::Placeholder => {
                    tracing::debug!(granularity = %granularity, "Trace too small for arrival plot");
                    draw_placeholder_panel(&mut canvas, &cell);
                }
            }
            draw_axis_labels(&mut canvas, &cell, &granularity.axis_label());
        }

        canvas
    }
}

/// Render arrivals for `workload_name` into `output_folder`
///
/// Returns `(None, "job_arrival_{workload_name}")`; the image itself is
/// written with the `.png` extension.
pub fn generate<P: AsRef<Path>>(
    records: &[ArrivalRecord],
    workload_name: &str,
    output_folder: P,
) -> Result<(Option<String>, String)> {
    JobArrivalGraph::new(workload_name, records, output_folder.as_ref()).generate_content()
}

/// One grid cell of the figure, in pixels
#[derive(Debug, Clone, Copy)]
struct Cell {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

/// Plot area inside a cell, leaving room for ticks and labels
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: i32,
    top: i32,
    right: i32,
    bottom: i32,
}

impl Cell {
    /// Cell of the 2x2 grid assigned to `granularity`
    fn for_granularity(granularity: Granularity) -> Self {
        let (width, height) = figure_pixels();
        let cell_w = (width as i32 - 2 * OUTER_PAD) / 2;
        let cell_h = (height as i32 - 2 * OUTER_PAD) / 2;
        let (row, col) = granularity.grid_cell();
        Self {
            x: OUTER_PAD + col as i32 * cell_w,
            y: OUTER_PAD + row as i32 * cell_h,
            width: cell_w,
            height: cell_h,
        }
    }

    fn plot_area(&self) -> PlotArea {
        let label_h = (8 * LABEL_SCALE) as i32;
        let tick_h = (8 * TICK_SCALE) as i32;
        PlotArea {
            left: self.x + label_h + 12 + 7 * tick_h + TICK_LEN,
            top: self.y + 12,
            right: self.x + self.width - 40,
            bottom: self.y + self.height - (label_h + tick_h + TICK_LEN + 20),
        }
    }
}

impl PlotArea {
    fn width(&self) -> f64 {
        (self.right - self.left) as f64
    }

    fn x_pixel(&self, range: &AxisRange, value: f64) -> f32 {
        self.left as f32 + (range.fraction(value) * self.width()) as f32
    }

    fn height(&self) -> f64 {
        (self.bottom - self.top) as f64
    }
}

/// Data range of one axis
#[derive(Debug, Clone, Copy)]
struct AxisRange {
    lo: f64,
    hi: f64,
}

impl AxisRange {
    /// Lower bound pinned at zero, upper bound padded by the margin
    fn from_zero(max: f64) -> Self {
        let hi = if max > 0.0 { max * (1.0 + MARGIN) } else { 1.0 };
        Self { lo: 0.0, hi }
    }

    fn fraction(&self, value: f64) -> f64 {
        (value - self.lo) / (self.hi - self.lo)
    }
}

/// Minimum horizontal gap between neighbouring x tick labels
const LABEL_GAP: i32 = 8;

/// Positioned x-axis tick label
#[derive(Debug, Clone, PartialEq)]
struct TickLabel {
    /// Tick position in pixels
    x: f32,
    text: String,
    /// Label box, in pixels
    left: i32,
    right: i32,
}

/// X tick labels that fit the cell without touching each other
///
/// Starts from `X_MAX_BINS` and drops bins until every label box keeps
/// `LABEL_GAP` from its neighbour. Labels are centered on their tick but
/// shifted back inside the cell at the edges.
fn x_tick_labels(range: AxisRange, cell: &Cell) -> Vec<TickLabel> {
    let area = cell.plot_area();
    let cell_right = cell.x + cell.width;
    let mut labels = Vec::new();

    for bins in (1..=X_MAX_BINS).rev() {
        labels = nice_ticks(range.lo, range.hi, bins)
            .into_iter()
            .map(|tick| {
                let x = area.x_pixel(&range, tick);
                let text = format_tick(tick);
                let width = Canvas::text_width(&text, TICK_SCALE) as i32;
                let left = (x as i32 - width / 2).min(cell_right - width).max(cell.x);
                TickLabel {
                    x,
                    text,
                    left,
                    right: left + width,
                }
            })
            .collect();

        let fits = labels
            .windows(2)
            .all(|pair| pair[0].right + LABEL_GAP <= pair[1].left);
        if fits {
            break;
        }
    }

    labels
}

fn draw_line_panel(canvas: &mut Canvas, cell: &Cell, map: &BucketMap) {
    let area = cell.plot_area();
    let x_range = AxisRange::from_zero(map.max_key().unwrap_or(0.0));
    let y_range = AxisRange::from_zero(map.max_count().unwrap_or(0) as f64);

    let to_px = |key: f64| area.x_pixel(&x_range, key);
    let to_py = |count: f64| area.bottom as f32 - (y_range.fraction(count) * area.height()) as f32;

    // grid and ticks
    let tick_px = (8 * TICK_SCALE) as i32;
    for label in x_tick_labels(x_range, cell) {
        let x = label.x;
        canvas.line((x, area.top as f32), (x, area.bottom as f32), GRID_GREY);
        canvas.line((x, area.bottom as f32), (x, (area.bottom + TICK_LEN) as f32), BLACK);
        canvas.text(
            label.left,
            area.bottom + TICK_LEN + 4,
            &label.text,
            TICK_SCALE,
            Anchor::Left,
            BLACK,
        );
    }
    for tick in nice_ticks(y_range.lo, y_range.hi, Y_MAX_BINS) {
        let y = to_py(tick);
        canvas.line((area.left as f32, y), (area.right as f32, y), GRID_GREY);
        canvas.line(((area.left - TICK_LEN) as f32, y), (area.left as f32, y), BLACK);
        canvas.text(
            area.left - TICK_LEN - 4,
            y as i32 - tick_px / 2,
            &format_tick(tick),
            TICK_SCALE,
            Anchor::Right,
            BLACK,
        );
    }

    canvas.rect_outline(
        area.left,
        area.top,
        (area.right - area.left + 1) as u32,
        (area.bottom - area.top + 1) as u32,
        BLACK,
    );

    let points: Vec<(f32, f32)> = map
        .iter()
        .map(|(key, count)| (to_px(key), to_py(count as f64)))
        .collect();
    for pair in points.windows(2) {
        canvas.thick_line(pair[0], pair[1], BLACK);
    }
}

fn draw_placeholder_panel(canvas: &mut Canvas, cell: &Cell) {
    let area = cell.plot_area();
    let center_x = (area.left + area.right) / 2;
    let center_y = (area.top + area.bottom) / 2;
    let line_h = (8 * NOTICE_SCALE) as i32 + 8;
    let top = center_y - line_h * PLACEHOLDER_LINES.len() as i32 / 2;

    for (i, line) in PLACEHOLDER_LINES.iter().enumerate() {
        canvas.text(
            center_x,
            top + i as i32 * line_h,
            line,
            NOTICE_SCALE,
            Anchor::Center,
            BLACK,
        );
    }
}

fn draw_axis_labels(canvas: &mut Canvas, cell: &Cell, x_label: &str) {
    let area = cell.plot_area();
    let label_h = (8 * LABEL_SCALE) as i32;
    canvas.text(
        (area.left + area.right) / 2,
        cell.y + cell.height - label_h - 6,
        x_label,
        LABEL_SCALE,
        Anchor::Center,
        BLACK,
    );
    canvas.text_vertical(
        cell.x + 4,
        (area.top + area.bottom) / 2,
        Y_LABEL,
        LABEL_SCALE,
        BLACK,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::WHITE;

    fn records(times: &[u64]) -> Vec<ArrivalRecord> {
        times.iter().copied().map(ArrivalRecord::from).collect()
    }

    #[test]
    fn test_figure_pixels_fixed() {
        assert_eq!(figure_pixels(), (1280, 960));
    }

    #[test]
    fn test_output_name() {
        assert_eq!(output_name("alibaba"), "job_arrival_alibaba");
    }

    #[test]
    fn test_render_dimensions_match_figure() {
        let records = records(&[]);
        let graph = JobArrivalGraph::new("empty", &records, Path::new("."));
        let canvas = graph.render();
        assert_eq!((canvas.width(), canvas.height()), figure_pixels());
    }

    #[test]
    fn test_placeholder_panel_has_no_frame() {
        let records = records(&[0]);
        let graph = JobArrivalGraph::new("tiny", &records, Path::new("."));
        let canvas = graph.render();

        let area = Cell::for_granularity(Granularity::Second).plot_area();
        // top-left corner of where the axes frame would be
        let corner = canvas.pixel(area.left as u32, area.top as u32);
        assert_eq!(corner, Some(WHITE));
    }

    #[test]
    fn test_line_panel_has_frame() {
        let records = records(&[30, 90]);
        let graph = JobArrivalGraph::new("pair", &records, Path::new("."));
        let canvas = graph.render();

        let area = Cell::for_granularity(Granularity::Second).plot_area();
        assert_eq!(canvas.pixel(area.left as u32, area.top as u32), Some(BLACK));
        assert_eq!(canvas.pixel(area.right as u32, area.bottom as u32), Some(BLACK));

        // hour panel is still a placeholder
        let hour = Cell::for_granularity(Granularity::Hour).plot_area();
        assert_eq!(canvas.pixel(hour.left as u32, hour.top as u32), Some(WHITE));
    }

    fn assert_labels_separate(labels: &[TickLabel], cell: &Cell) {
        assert!(!labels.is_empty());
        for pair in labels.windows(2) {
            assert!(
                pair[0].right + LABEL_GAP <= pair[1].left,
                "labels {:?} and {:?} touch",
                pair[0].text,
                pair[1].text
            );
        }
        for label in labels {
            assert!(label.left >= cell.x);
            assert!(label.right <= cell.x + cell.width);
        }
    }

    #[test]
    fn test_x_tick_labels_millisecond_epochs_do_not_overlap() {
        let records = records(&[3_809_523_809_524]);
        for map in aggregate_all(&records) {
            let cell = Cell::for_granularity(map.granularity());
            let range = AxisRange::from_zero(map.max_key().unwrap_or(0.0));
            let labels = x_tick_labels(range, &cell);
            assert_labels_separate(&labels, &cell);
        }
    }

    #[test]
    fn test_x_tick_labels_keep_bins_when_room() {
        let cell = Cell::for_granularity(Granularity::Second);
        let labels = x_tick_labels(AxisRange::from_zero(100.0), &cell);
        let texts: Vec<&str> = labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["0", "50", "100"]);
        assert_labels_separate(&labels, &cell);
    }

    #[test]
    fn test_x_tick_labels_drop_bins_for_long_labels() {
        let cell = Cell::for_granularity(Granularity::Minute);
        for max in [1_234_567.0, 98_765_432.0, 7.7e15, 123_456.789] {
            let labels = x_tick_labels(AxisRange::from_zero(max), &cell);
            assert_labels_separate(&labels, &cell);
        }
    }

    #[test]
    fn test_empty_trace_renders_notice_in_every_panel() {
        let records = records(&[]);
        let canvas = JobArrivalGraph::new("empty", &records, Path::new(".")).render();

        for granularity in Granularity::ALL {
            let area = Cell::for_granularity(granularity).plot_area();
            let center_y = (area.top + area.bottom) / 2;

            let band_ink = (center_y - 40..center_y + 40)
                .flat_map(|y| (area.left..=area.right).map(move |x| (x, y)))
                .filter(|&(x, y)| canvas.pixel(x as u32, y as u32) != Some(WHITE))
                .count();
            assert!(band_ink > 0, "{} panel has no notice", granularity);

            // no frame, grid or series anywhere on the plot border
            for x in area.left..=area.right {
                assert_eq!(canvas.pixel(x as u32, area.top as u32), Some(WHITE));
                assert_eq!(canvas.pixel(x as u32, area.bottom as u32), Some(WHITE));
            }
            for y in area.top..=area.bottom {
                assert_eq!(canvas.pixel(area.left as u32, y as u32), Some(WHITE));
                assert_eq!(canvas.pixel(area.right as u32, y as u32), Some(WHITE));
            }
        }
    }

    #[test]
    fn test_axis_range_pins_zero_with_margin() {
        let range = AxisRange::from_zero(100.0);
        assert_eq!(range.lo, 0.0);
        assert!((range.hi - 105.0).abs() < 1e-9);
        assert_eq!(AxisRange::from_zero(0.0).hi, 1.0);
    }

    #[test]
    fn test_missing_folder_is_error() {
        let records = records(&[1, 2, 3]);
        let result = generate(&records, "x", "/nonexistent/wta-stats/folder");
        assert!(matches!(result, Err(GraphError::OutputFolder(_))));
    }
}
