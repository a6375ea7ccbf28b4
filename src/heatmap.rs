// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::path::Path;

use bitflags::bitflags;
use hex_color::HexColor;
use log::{debug, info};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, FontTransform};

use crate::config::LoopmapConfig;
use crate::errors::LoopmapError;
use crate::fonts::FONT_FAMILY;
use crate::prevalence::PrevalenceMatrix;

const VMIN: f64 = 0.0;
const VMAX: f64 = 100.0;
const COLORBAR_TICKS: [f64; 6] = [0.0, 20.0, 40.0, 60.0, 80.0, 100.0];
const COLORBAR_SLICES: i32 = 256;
// Text on cells darker than this is drawn white.
const LUMINANCE_THRESHOLD: f64 = 0.408;
const DARK_TEXT: RGBColor = RGBColor(38, 38, 38);

bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct OutputFormats: u8 {
        const PNG = 0b01;
        const SVG = 0b10;
    }
}

// Both loops side by side, separated by one no-data column.
#[derive(Debug, Clone)]
pub struct CombinedMatrix {
    pub values: Vec<Vec<f64>>,
    pub row_labels: Vec<char>,
    pub col_labels: Vec<String>,
    pub left_cols: usize,
    pub right_cols: usize,
}

impl CombinedMatrix {
    pub fn new(left: &PrevalenceMatrix, right: &PrevalenceMatrix) -> Self {
        let values = left
            .values
            .iter()
            .zip(right.values.iter())
            .map(|(l, r)| {
                let mut row = l.clone();
                row.push(f64::NAN);
                row.extend_from_slice(r);
                row
            })
            .collect();
        let left_cols = left.num_positions();
        let right_cols = right.num_positions();
        let col_labels = (1..=left_cols)
            .map(|i| i.to_string())
            .chain(std::iter::once(String::new()))
            .chain((1..=right_cols).map(|i| i.to_string()))
            .collect();
        CombinedMatrix {
            values,
            row_labels: left.alphabet.chars().collect(),
            col_labels,
            left_cols,
            right_cols,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.values.len(), self.left_cols + 1 + self.right_cols)
    }

    pub fn sentinel_col(&self) -> usize {
        self.left_cols
    }

    // Column offset and width of each loop's block.
    pub fn regions(&self) -> [(usize, usize); 2] {
        [(0, self.left_cols), (self.left_cols + 1, self.right_cols)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    stops: Vec<RGBColor>,
}

impl Colormap {
    pub fn from_hex(stops: &[String]) -> Result<Self, LoopmapError> {
        let stops = stops
            .iter()
            .map(|s| {
                HexColor::parse(s)
                    .map(|c| RGBColor(c.r, c.g, c.b))
                    .map_err(|e| LoopmapError::Config(format!("bad colour '{}': {}", s, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if stops.len() < 2 {
            return Err(LoopmapError::Config(String::from(
                "colormap needs at least two colour stops",
            )));
        }
        Ok(Colormap { stops })
    }

    // t in [0, 1], linear between evenly spaced stops.
    pub fn at(&self, t: f64) -> RGBColor {
        let t = t.clamp(0.0, 1.0);
        let segments = (self.stops.len() - 1) as f64;
        let x = t * segments;
        let i = (x.floor() as usize).min(self.stops.len() - 2);
        let frac = x - i as f64;
        let (a, b) = (self.stops[i], self.stops[i + 1]);
        let lerp = |p: u8, q: u8| (p as f64 + (q as f64 - p as f64) * frac).round() as u8;
        RGBColor(lerp(a.0, b.0), lerp(a.1, b.1), lerp(a.2, b.2))
    }

    // None for no-data cells, which stay background white.
    pub fn value_color(&self, value: f64) -> Option<RGBColor> {
        if value.is_nan() {
            return None;
        }
        Some(self.at((value - VMIN) / (VMAX - VMIN)))
    }
}

fn relative_luminance(c: RGBColor) -> f64 {
    let channel = |v: u8| {
        let v = v as f64 / 255.0;
        if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * channel(c.0) + 0.7152 * channel(c.1) + 0.0722 * channel(c.2)
}

pub fn annotation_color(cell: RGBColor) -> RGBColor {
    if relative_luminance(cell) > LUMINANCE_THRESHOLD {
        DARK_TEXT
    } else {
        WHITE
    }
}

#[derive(Debug, Clone)]
pub struct FigureStyle {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: u32,
    pub titles: [String; 2],
    pub subtitle: String,
    pub colormap: Colormap,
}

impl FigureStyle {
    pub fn from_config(config: &LoopmapConfig) -> Result<Self, LoopmapError> {
        let titles = match config.titles.as_slice() {
            [a, b] => [a.clone(), b.clone()],
            _ => {
                return Err(LoopmapError::Config(String::from(
                    "need exactly two titles",
                )))
            }
        };
        Ok(FigureStyle {
            width_in: config.figure_size.0,
            height_in: config.figure_size.1,
            dpi: config.dpi,
            titles,
            subtitle: config.subtitle.clone(),
            colormap: Colormap::from_hex(&config.colormap)?,
        })
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        let px = |inches: f64| (inches * self.dpi as f64).round() as u32;
        (px(self.width_in), px(self.height_in))
    }

    // Font sizes are given in points.
    fn pt(&self, points: f64) -> f64 {
        points * self.dpi as f64 / 72.0
    }
}

// Pixel geometry of the figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub plot_left: i32,
    pub plot_top: i32,
    pub cell_w: f64,
    pub cell_h: f64,
    pub colorbar: (i32, i32, i32, i32),
}

impl Layout {
    pub fn new(canvas: (u32, u32), shape: (usize, usize)) -> Self {
        let (w, h) = (canvas.0 as f64, canvas.1 as f64);
        let (rows, cols) = (shape.0.max(1) as f64, shape.1.max(1) as f64);
        let plot_left = 0.07 * w;
        let plot_right = 0.86 * w;
        let plot_top = 0.12 * h;
        let plot_bottom = 0.90 * h;
        let plot_h = plot_bottom - plot_top;
        // 80% of the plot height, centred.
        let cb_h = 0.8 * plot_h;
        let cb_top = plot_top + (plot_h - cb_h) / 2.0;
        let cb_left = 0.88 * w;
        Layout {
            plot_left: plot_left as i32,
            plot_top: plot_top as i32,
            cell_w: (plot_right - plot_left) / cols,
            cell_h: plot_h / rows,
            colorbar: (
                cb_left as i32,
                cb_top as i32,
                (cb_left + 0.018 * w) as i32,
                (cb_top + cb_h) as i32,
            ),
        }
    }

    fn x(&self, col: f64) -> i32 {
        self.plot_left + (col * self.cell_w).round() as i32
    }

    fn y(&self, row: f64) -> i32 {
        self.plot_top + (row * self.cell_h).round() as i32
    }

    pub fn cell_center(&self, row: usize, col: usize) -> (i32, i32) {
        (self.x(col as f64 + 0.5), self.y(row as f64 + 0.5))
    }
}

fn render_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> LoopmapError {
    LoopmapError::Render(e.to_string())
}

fn text_style(size: f64, color: &RGBColor, pos: Pos) -> TextStyle<'static> {
    (FONT_FAMILY, size).into_font().color(color).pos(pos)
}

pub fn draw_heatmap<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    matrix: &CombinedMatrix,
    style: &FigureStyle,
) -> Result<(), LoopmapError> {
    let (rows, cols) = matrix.shape();
    let layout = Layout::new(root.dim_in_pixel(), (rows, cols));
    let centre = Pos::new(HPos::Center, VPos::Center);
    let annot_size = style.pt(7.0);
    let tick_size = style.pt(10.0);
    let tick_len = style.pt(3.5).round() as i32;
    let black = BLACK;

    root.fill(&WHITE).map_err(render_err)?;

    // Cells
    for (r, row) in matrix.values.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            let Some(color) = style.colormap.value_color(value) else {
                continue;
            };
            root.draw(&Rectangle::new(
                [
                    (layout.x(c as f64), layout.y(r as f64)),
                    (layout.x(c as f64 + 1.0), layout.y(r as f64 + 1.0)),
                ],
                color.filled(),
            ))
            .map_err(render_err)?;
            root.draw(&Text::new(
                format!("{:.0}", value),
                layout.cell_center(r, c),
                text_style(annot_size, &annotation_color(color), centre),
            ))
            .map_err(render_err)?;
        }
    }

    // Row labels (residues) with ticks on the left edge
    let right_mid = Pos::new(HPos::Right, VPos::Center);
    for (r, aa) in matrix.row_labels.iter().enumerate() {
        let y = layout.y(r as f64 + 0.5);
        root.draw(&PathElement::new(
            vec![(layout.plot_left - tick_len, y), (layout.plot_left, y)],
            black.stroke_width(2),
        ))
        .map_err(render_err)?;
        root.draw(&Text::new(
            aa.to_string(),
            (layout.plot_left - 2 * tick_len, y),
            text_style(tick_size, &black, right_mid),
        ))
        .map_err(render_err)?;
    }

    // Column labels (1-based within each loop); the separator gets neither tick nor label
    let bottom = layout.y(rows as f64);
    let top_centre = Pos::new(HPos::Center, VPos::Top);
    for (c, label) in matrix.col_labels.iter().enumerate() {
        if label.is_empty() {
            continue;
        }
        let x = layout.x(c as f64 + 0.5);
        root.draw(&PathElement::new(
            vec![(x, bottom), (x, bottom + tick_len)],
            black.stroke_width(2),
        ))
        .map_err(render_err)?;
        root.draw(&Text::new(
            label.clone(),
            (x, bottom + 2 * tick_len),
            text_style(tick_size, &black, top_centre),
        ))
        .map_err(render_err)?;
    }

    // Axis titles
    let axis_size = style.pt(12.0);
    root.draw(&Text::new(
        String::from("Position"),
        (layout.x(cols as f64 / 2.0), bottom + 2 * tick_len + (2.2 * tick_size) as i32),
        text_style(axis_size, &black, top_centre),
    ))
    .map_err(render_err)?;
    root.draw(&Text::new(
        String::from("Amino Acid"),
        (
            layout.plot_left - 2 * tick_len - (1.8 * tick_size) as i32,
            layout.y(rows as f64 / 2.0),
        ),
        (FONT_FAMILY, axis_size)
            .into_font()
            .transform(FontTransform::Rotate270)
            .color(&black)
            .pos(Pos::new(HPos::Center, VPos::Bottom)),
    ))
    .map_err(render_err)?;

    // Loop titles, centred over each block
    let title_size = style.pt(11.0);
    let line_gap = (1.25 * title_size) as i32;
    let bottom_centre = Pos::new(HPos::Center, VPos::Bottom);
    for ((offset, width), title) in matrix.regions().iter().zip(style.titles.iter()) {
        let x = layout.x(*offset as f64 + *width as f64 / 2.0);
        let base = layout.plot_top - (0.8 * layout.cell_h) as i32;
        for (i, line) in [title.as_str(), style.subtitle.as_str()].iter().enumerate() {
            root.draw(&Text::new(
                line.to_string(),
                (x, base - line_gap * (1 - i as i32)),
                (FONT_FAMILY, title_size, FontStyle::Bold)
                    .into_font()
                    .color(&black)
                    .pos(bottom_centre),
            ))
            .map_err(render_err)?;
        }
    }

    draw_colorbar(root, &layout, style, tick_len, tick_size)?;
    debug!("heatmap drawn: {} x {} cells", rows, cols);
    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &Layout,
    style: &FigureStyle,
    tick_len: i32,
    tick_size: f64,
) -> Result<(), LoopmapError> {
    let (x0, y0, x1, y1) = layout.colorbar;
    let height = (y1 - y0) as f64;
    let y_at = |t: f64| y1 - (t * height).round() as i32;

    for i in 0..COLORBAR_SLICES {
        let t0 = i as f64 / COLORBAR_SLICES as f64;
        let t1 = (i + 1) as f64 / COLORBAR_SLICES as f64;
        let color = style.colormap.at((t0 + t1) / 2.0);
        root.draw(&Rectangle::new([(x0, y_at(t1)), (x1, y_at(t0))], color.filled()))
            .map_err(render_err)?;
    }
    root.draw(&Rectangle::new([(x0, y0), (x1, y1)], BLACK.stroke_width(1)))
        .map_err(render_err)?;

    let left_mid = Pos::new(HPos::Left, VPos::Center);
    for tick in COLORBAR_TICKS {
        let y = y_at((tick - VMIN) / (VMAX - VMIN));
        root.draw(&PathElement::new(
            vec![(x1, y), (x1 + tick_len, y)],
            BLACK.stroke_width(2),
        ))
        .map_err(render_err)?;
        root.draw(&Text::new(
            format!("{:.0}", tick),
            (x1 + 2 * tick_len, y),
            text_style(tick_size, &BLACK, left_mid),
        ))
        .map_err(render_err)?;
    }

    root.draw(&Text::new(
        String::from("Prevalence (%)"),
        (x1 + 2 * tick_len + (2.6 * tick_size) as i32, (y0 + y1) / 2),
        (FONT_FAMILY, style.pt(12.0))
            .into_font()
            .transform(FontTransform::Rotate270)
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Top)),
    ))
    .map_err(render_err)?;
    Ok(())
}

fn check_output_dir(path: &Path) -> Result<(), LoopmapError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => {
            Err(LoopmapError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("output directory {} does not exist", dir.display()),
            )))
        }
        _ => Ok(()),
    }
}

pub fn write_png(
    path: &Path,
    matrix: &CombinedMatrix,
    style: &FigureStyle,
) -> Result<(), LoopmapError> {
    check_output_dir(path)?;
    let root = BitMapBackend::new(path, style.canvas_size()).into_drawing_area();
    draw_heatmap(&root, matrix, style)?;
    root.present().map_err(render_err)?;
    info!("wrote {}", path.display());
    Ok(())
}

pub fn write_svg(
    path: &Path,
    matrix: &CombinedMatrix,
    style: &FigureStyle,
) -> Result<(), LoopmapError> {
    check_output_dir(path)?;
    let root = SVGBackend::new(path, style.canvas_size()).into_drawing_area();
    draw_heatmap(&root, matrix, style)?;
    root.present().map_err(render_err)?;
    info!("wrote {}", path.display());
    Ok(())
}
