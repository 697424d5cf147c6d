//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - fitted density: `-` line
//! - percentile markers: vertical `|` rules topped with `T` (typical),
//!   `S` (serious), `E` (extreme)

use crate::domain::{DensityGrid, FitFile, Resolution};

/// Render a density plot for an in-memory resolution.
pub fn render_ascii_plot(
    resolution: &Resolution,
    grid: &DensityGrid,
    width: usize,
    height: usize,
) -> String {
    let markers: Vec<(f64, char)> = resolution
        .points
        .iter()
        .map(|p| (p.value, p.percentile.marker()))
        .collect();
    render_plot(grid, &markers, width, height)
}

/// Render a density plot from a saved fit JSON file.
pub fn render_ascii_plot_from_fit_file(fit: &FitFile, width: usize, height: usize) -> String {
    let markers: Vec<(f64, char)> = fit
        .points
        .iter()
        .map(|p| (p.value, p.percentile.marker()))
        .collect();
    render_plot(&fit.grid, &markers, width, height)
}

fn render_plot(grid: &DensityGrid, markers: &[(f64, char)], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = x_range(grid).unwrap_or((1e-3, 1.0));
    let (y_min, y_max) = y_range(grid).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut cells = vec![vec![' '; width]; height];

    draw_curve(&mut cells, grid, x_min, x_max, y_min, y_max);

    // Vertical percentile rules go over the curve; the glyph on the top row
    // identifies which percentile the rule belongs to.
    for &(value, glyph) in markers {
        let x = map_x(value, x_min, x_max, width);
        for row in cells.iter_mut() {
            if row[x] == ' ' {
                row[x] = '|';
            }
        }
        cells[0][x] = glyph;
    }

    // Build final string. We include a small header with ranges and a legend.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x=[{x_min:.3}, {x_max:.3}] | pdf=[{y_min:.6}, {y_max:.6}]\n"
    ));
    out.push_str("Markers: T=Typical (50%)  S=Serious (80%)  E=Extreme (95%)\n");

    for row in cells {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn x_range(grid: &DensityGrid) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &x in &grid.x {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn y_range(grid: &DensityGrid) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &y in &grid.pdf {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(
    cells: &mut [Vec<char>],
    grid: &DensityGrid,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    if grid.x.len() < 2 {
        return;
    }
    let height = cells.len();
    let width = cells[0].len();

    let mut prev = None;
    for (&x, &y) in grid.x.iter().zip(grid.pdf.iter()) {
        let cx = map_x(x, x_min, x_max, width);
        let cy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(cells, x0, y0, cx, cy, '-');
        } else {
            cells[cy][cx] = '-';
        }
        prev = Some((cx, cy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(cells: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < cells.len()
            && x0 >= 0
            && (x0 as usize) < cells[0].len()
            && cells[y0 as usize][x0 as usize] == ' '
        {
            cells[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::density_grid;
    use crate::domain::{Observation, Percentile};
    use crate::fit::resolve;

    fn sample() -> (Resolution, DensityGrid) {
        let res = resolve(
            &Observation::new(Percentile::P50, 100.0),
            &Observation::new(Percentile::P80, 150.0),
        )
        .unwrap();
        let grid = density_grid(&res, 200);
        (res, grid)
    }

    #[test]
    fn plot_is_deterministic_and_sized() {
        let (res, grid) = sample();
        let a = render_ascii_plot(&res, &grid, 60, 15);
        let b = render_ascii_plot(&res, &grid, 60, 15);
        assert_eq!(a, b);

        // Header + legend + one line per grid row.
        let lines: Vec<&str> = a.lines().collect();
        assert_eq!(lines.len(), 2 + 15);
        for line in &lines[2..] {
            assert_eq!(line.chars().count(), 60);
        }
    }

    #[test]
    fn plot_contains_all_three_markers() {
        let (res, grid) = sample();
        let txt = render_ascii_plot(&res, &grid, 80, 20);
        let top_row = txt.lines().nth(2).unwrap();
        assert!(top_row.contains('T'));
        assert!(top_row.contains('S'));
        assert!(top_row.contains('E'));
        // Markers sit in value order left to right.
        let t = top_row.find('T').unwrap();
        let s = top_row.find('S').unwrap();
        let e = top_row.find('E').unwrap();
        assert!(t < s && s < e);
    }

    #[test]
    fn fit_file_render_matches_in_memory_render() {
        let (res, grid) = sample();
        let file = FitFile {
            tool: "lnp".to_string(),
            fit: res.fit,
            points: res.points.to_vec(),
            grid: grid.clone(),
        };
        let a = render_ascii_plot(&res, &grid, 60, 15);
        let b = render_ascii_plot_from_fit_file(&file, 60, 15);
        assert_eq!(a, b);
    }
}
