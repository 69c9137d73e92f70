use log::error;
use pitchside_api::{HeatPoint, Player};
use std::cell::Cell;
use std::fmt;
use tui::buffer::Buffer;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Style};
use tui::text::Line;
use tui::widgets::{Block, Paragraph, Widget, Wrap};

/// Pixel size of one terminal cell. A region's pixel space is its cell area
/// times these.
pub const CELL_PX_W: u32 = 8;
pub const CELL_PX_H: u32 = 16;

pub const NO_PLAYER_SELECTED: &str = "Select a player to view their heatmap.";
pub const NO_MOVEMENT_DATA: &str = "No movement data found for selected player.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapConfig {
    /// Influence radius in pixels.
    pub radius: f64,
    pub min_opacity: f64,
    pub max_opacity: f64,
    /// Share of the radius over which a point fades out.
    pub blur: f64,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self { radius: 40.0, min_opacity: 0.0, max_opacity: 0.7, blur: 0.75 }
    }
}

/// A sample scaled into a region's pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: i64,
    pub y: i64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DensityData {
    pub min: f64,
    pub max: f64,
    pub points: Vec<PixelPoint>,
}

/// Point-density backend. Receives points already scaled to pixels.
pub trait DensityRenderer {
    fn clear(&mut self);
    fn set_data(&mut self, width: u32, height: u32, data: DensityData);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPreconditionError {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for RenderPreconditionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "heatmap region has zero size ({}x{} px); not rendering",
            self.width, self.height
        )
    }
}

impl std::error::Error for RenderPreconditionError {}

/// Map percentage coordinates onto a `width` x `height` pixel region.
pub fn scale_points(points: &[HeatPoint], width: u32, height: u32) -> Vec<PixelPoint> {
    let (w, h) = (f64::from(width), f64::from(height));
    points
        .iter()
        .map(|p| PixelPoint {
            x: (p.x * w / 100.0).round() as i64,
            y: (p.y * h / 100.0).round() as i64,
            value: p.value,
        })
        .collect()
}

/// Highest weight, or 1 when there is nothing to normalize against.
pub fn intensity_ceiling(points: &[HeatPoint]) -> f64 {
    let max = points.iter().map(|p| p.value).fold(0.0_f64, f64::max);
    if max > 0.0 { max } else { 1.0 }
}

pub fn render_heatmap<R: DensityRenderer + ?Sized>(
    renderer: &mut R,
    width: u32,
    height: u32,
    points: &[HeatPoint],
) -> Result<(), RenderPreconditionError> {
    if width == 0 || height == 0 {
        return Err(RenderPreconditionError { width, height });
    }
    renderer.clear();
    renderer.set_data(
        width,
        height,
        DensityData { min: 0.0, max: intensity_ceiling(points), points: scale_points(points, width, height) },
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Terminal density grid
// ---------------------------------------------------------------------------

const GRADIENT: [(f64, (u8, u8, u8)); 4] = [
    (0.25, (0x00, 0x00, 0xff)),
    (0.55, (0x00, 0xff, 0x00)),
    (0.85, (0xff, 0xff, 0x00)),
    (1.00, (0xff, 0x00, 0x00)),
];

/// Accumulates point intensity per terminal cell, sampled at the cell centre.
#[derive(Debug, Clone)]
pub struct DensityGrid {
    config: HeatmapConfig,
    cols: u16,
    rows: u16,
    cells: Vec<f64>,
}

impl DensityGrid {
    pub fn new(cols: u16, rows: u16, config: HeatmapConfig) -> Self {
        Self { config, cols, rows, cells: vec![0.0; cols as usize * rows as usize] }
    }

    pub fn intensity(&self, col: u16, row: u16) -> f64 {
        if col >= self.cols || row >= self.rows {
            return 0.0;
        }
        self.cells[row as usize * self.cols as usize + col as usize]
    }

    /// Colour and opacity of a cell, `None` where nothing was drawn.
    pub fn cell_color(&self, col: u16, row: u16) -> Option<((u8, u8, u8), f64)> {
        let intensity = self.intensity(col, row);
        if intensity <= 0.0 {
            return None;
        }
        let opacity = intensity.clamp(self.config.min_opacity, self.config.max_opacity);
        Some((gradient(intensity), opacity))
    }

    fn falloff(&self, distance: f64) -> f64 {
        let radius = self.config.radius;
        let solid = radius * (1.0 - self.config.blur);
        if distance >= radius {
            0.0
        } else if distance <= solid {
            1.0
        } else {
            (radius - distance) / (radius - solid)
        }
    }
}

impl DensityRenderer for DensityGrid {
    fn clear(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = 0.0);
    }

    fn set_data(&mut self, width: u32, height: u32, data: DensityData) {
        if self.cols == 0 || self.rows == 0 {
            return;
        }
        let cell_w = f64::from(width) / f64::from(self.cols);
        let cell_h = f64::from(height) / f64::from(self.rows);
        let span = (data.max - data.min).max(f64::EPSILON);

        for row in 0..self.rows {
            let cy = (f64::from(row) + 0.5) * cell_h;
            for col in 0..self.cols {
                let cx = (f64::from(col) + 0.5) * cell_w;
                let mut alpha = 0.0;
                for p in &data.points {
                    let d = ((p.x as f64 - cx).powi(2) + (p.y as f64 - cy).powi(2)).sqrt();
                    let weight = ((p.value - data.min) / span).clamp(0.0, 1.0) * self.falloff(d);
                    // Stack like translucent layers: never past 1.
                    alpha += weight * (1.0 - alpha);
                }
                self.cells[row as usize * self.cols as usize + col as usize] = alpha;
            }
        }
    }
}

fn gradient(intensity: f64) -> (u8, u8, u8) {
    let t = intensity.clamp(0.0, 1.0);
    let mut prev = GRADIENT[0];
    if t <= prev.0 {
        return prev.1;
    }
    for stop in GRADIENT.iter().skip(1) {
        if t <= stop.0 {
            let f = (t - prev.0) / (stop.0 - prev.0);
            let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * f).round() as u8;
            return (lerp(prev.1.0, stop.1.0), lerp(prev.1.1, stop.1.1), lerp(prev.1.2, stop.1.2));
        }
        prev = *stop;
    }
    prev.1
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RegionContent {
    #[default]
    Placeholder,
    NoData,
    Points(Vec<HeatPoint>),
}

/// One team's heatmap area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeatmapRegion {
    content: RegionContent,
    player_name: Option<String>,
    /// Set once a failed render has been logged for the current content.
    failure_reported: Cell<bool>,
}

impl HeatmapRegion {
    pub fn clear(&mut self) {
        self.content = RegionContent::Placeholder;
        self.player_name = None;
        self.failure_reported.set(false);
    }

    pub fn show_player(&mut self, player: Option<&Player>) {
        let Some(player) = player else {
            self.clear();
            return;
        };
        self.player_name = Some(player.name.clone());
        self.failure_reported.set(false);
        self.content = if player.heatmap.is_empty() {
            RegionContent::NoData
        } else {
            RegionContent::Points(player.heatmap.clone())
        };
    }

    pub fn content(&self) -> &RegionContent {
        &self.content
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    pub fn message(&self) -> Option<&'static str> {
        match self.content {
            RegionContent::Placeholder => Some(NO_PLAYER_SELECTED),
            RegionContent::NoData => Some(NO_MOVEMENT_DATA),
            RegionContent::Points(_) => None,
        }
    }

    /// True the first time it is called after the content last changed.
    fn should_report_failure(&self) -> bool {
        !self.failure_reported.replace(true)
    }
}

// ---------------------------------------------------------------------------
// Widget
// ---------------------------------------------------------------------------

const PITCH: (u8, u8, u8) = (0x1b, 0x5e, 0x20);
const MARKING: Color = Color::Rgb(0xa5, 0xd6, 0xa7);

pub struct HeatmapView<'a> {
    pub region: &'a HeatmapRegion,
    pub block: Block<'a>,
    pub config: HeatmapConfig,
}

impl Widget for HeatmapView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.block.inner(area);
        self.block.render(area, buf);

        let (r, g, b) = PITCH;
        buf.set_style(inner, Style::default().bg(Color::Rgb(r, g, b)));
        draw_markings(inner, buf);

        match self.region.content() {
            RegionContent::Points(points) => {
                let width = u32::from(inner.width) * CELL_PX_W;
                let height = u32::from(inner.height) * CELL_PX_H;
                let mut grid = DensityGrid::new(inner.width, inner.height, self.config);
                if let Err(e) = render_heatmap(&mut grid, width, height, points) {
                    if self.region.should_report_failure() {
                        error!("{e}");
                    }
                    return;
                }
                paint_grid(&grid, inner, buf);
            }
            _ => {
                if inner.height == 0 {
                    return;
                }
                let message = self.region.message().unwrap_or_default();
                let top = inner.y + inner.height.saturating_sub(1) / 2;
                let line_area = Rect::new(inner.x, top, inner.width, inner.height - (top - inner.y));
                Paragraph::new(Line::from(message))
                    .style(Style::default().fg(Color::White))
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true })
                    .render(line_area, buf);
            }
        }
    }
}

fn draw_markings(area: Rect, buf: &mut Buffer) {
    if area.width < 4 || area.height < 3 {
        return;
    }
    let style = Style::default().fg(MARKING);
    let mid = area.x + area.width / 2;
    for y in area.top()..area.bottom() {
        buf[(mid, y)].set_symbol("│").set_style(style);
    }
    buf[(mid, area.y + area.height / 2)].set_symbol("┼").set_style(style);

    // Penalty areas: a sixth of the length deep, three fifths of the width tall.
    let depth = (area.width / 6).max(1);
    let top = area.y + area.height / 5;
    let bottom = area.y + area.height - area.height / 5 - 1;
    for (edge, inward) in [(area.x, area.x + depth), (area.right() - 1, area.right() - 1 - depth)] {
        let (from, to) = (edge.min(inward), edge.max(inward));
        for x in from..=to {
            buf[(x, top)].set_symbol("─").set_style(style);
            buf[(x, bottom)].set_symbol("─").set_style(style);
        }
        for y in top..=bottom {
            buf[(inward, y)].set_symbol("│").set_style(style);
        }
    }
}

fn paint_grid(grid: &DensityGrid, area: Rect, buf: &mut Buffer) {
    for row in 0..area.height {
        for col in 0..area.width {
            let Some((color, opacity)) = grid.cell_color(col, row) else {
                continue;
            };
            let blend = |over: u8, under: u8| {
                (f64::from(over) * opacity + f64::from(under) * (1.0 - opacity)).round() as u8
            };
            let bg = Color::Rgb(blend(color.0, PITCH.0), blend(color.1, PITCH.1), blend(color.2, PITCH.2));
            buf[(area.x + col, area.y + row)].set_bg(bg);
        }
    }
}
