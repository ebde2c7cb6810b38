use crate::core::geo::{Basemap, project_ring};
use crate::core::sites::cell_boundary;
use crate::render::colormap::{to_hex, viridis};
use crate::render::svg::{draw_ring, fmt_tick, nice_ticks, svg_close, svg_open};
use anyhow::Result;
use h3o::CellIndex;
use std::fmt::Write;

const WIDTH: f64 = 1400.0;
const HEIGHT: f64 = 600.0;
const BASEMAP_FILL: &str = "#d3d3d3";
const COLORBAR_SLICES: usize = 64;

/// Choropleth of per-cell first-observation years over the basemap, with a
/// bottom-anchored colorbar at half the plot width.
pub fn figure(basemap: &Basemap, cells: &[(CellIndex, i32)]) -> Result<String> {
    let (w, h) = (WIDTH, HEIGHT);
    let left = 10.0;
    let right = 10.0;
    let top = 10.0;
    let bottom = 80.0;
    let plot_w = w - left - right;
    let plot_h = h - top - bottom;

    let map_rings: Vec<Vec<(f64, f64)>> =
        basemap.polygons.iter().map(|ring| project_ring(ring)).collect();
    let hex_rings: Vec<(Vec<(f64, f64)>, i32)> = cells
        .iter()
        .map(|&(cell, year)| (project_ring(&cell_boundary(cell)), year))
        .collect();

    // Fit both layers into the viewport, aspect preserved.
    let (min_x, min_y, max_x, max_y) =
        bounds(map_rings.iter().chain(hex_rings.iter().map(|(ring, _)| ring)));
    let span_x = (max_x - min_x).max(1e-9);
    let span_y = (max_y - min_y).max(1e-9);
    let scale = (plot_w / span_x).min(plot_h / span_y);
    let off_x = left + (plot_w - span_x * scale) / 2.0;
    let off_y = top + (plot_h - span_y * scale) / 2.0;
    let to_px = |(x, y): (f64, f64)| (off_x + (x - min_x) * scale, off_y + (max_y - y) * scale);

    let mut out = String::new();
    svg_open(&mut out, w, h)?;

    for ring in &map_rings {
        let px: Vec<(f64, f64)> = ring.iter().map(|&p| to_px(p)).collect();
        draw_ring(&mut out, &px, BASEMAP_FILL, "#fff", 0.5)?;
    }

    let year_min = cells.iter().map(|&(_, year)| year).min();
    let year_max = cells.iter().map(|&(_, year)| year).max();

    if let (Some(year_min), Some(year_max)) = (year_min, year_max) {
        let span = (year_max - year_min) as f64;
        for (ring, year) in &hex_rings {
            let t = if span > 0.0 {
                (year - year_min) as f64 / span
            } else {
                0.5
            };
            let px: Vec<(f64, f64)> = ring.iter().map(|&p| to_px(p)).collect();
            draw_ring(&mut out, &px, &to_hex(viridis(t)), "none", 0.0)?;
        }
        draw_colorbar(&mut out, w, h, plot_w, year_min, year_max)?;
    }

    svg_close(&mut out)?;
    Ok(out)
}

fn draw_colorbar(
    out: &mut String,
    w: f64,
    h: f64,
    plot_w: f64,
    year_min: i32,
    year_max: i32,
) -> Result<()> {
    let cb_w = plot_w * 0.5;
    let cb_h = 12.0;
    let cb_x = (w - cb_w) / 2.0;
    let cb_y = h - 50.0;

    let slice_w = cb_w / COLORBAR_SLICES as f64;
    for i in 0..COLORBAR_SLICES {
        let t = i as f64 / (COLORBAR_SLICES - 1) as f64;
        writeln!(
            out,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            cb_x + i as f64 * slice_w,
            cb_y,
            slice_w + 0.5,
            cb_h,
            to_hex(viridis(t))
        )?;
    }
    writeln!(
        out,
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"#999\"/>",
        cb_x, cb_y, cb_w, cb_h
    )?;

    if year_max > year_min {
        let (start, step, count) = nice_ticks(year_min as f64, year_max as f64, 5);
        for i in 0..count {
            let v = start + step * i as f64;
            if v < year_min as f64 - 1e-9 || v > year_max as f64 + 1e-9 {
                continue;
            }
            let x = cb_x + (v - year_min as f64) / (year_max - year_min) as f64 * cb_w;
            writeln!(
                out,
                "<text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#666\" text-anchor=\"middle\" dominant-baseline=\"hanging\">{}</text>",
                x,
                cb_y + cb_h + 4.0,
                fmt_tick(v)
            )?;
        }
    } else {
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#666\" text-anchor=\"middle\" dominant-baseline=\"hanging\">{}</text>",
            cb_x + cb_w / 2.0,
            cb_y + cb_h + 4.0,
            year_min
        )?;
    }
    Ok(())
}

fn bounds<'a, I>(rings: I) -> (f64, f64, f64, f64)
where
    I: Iterator<Item = &'a Vec<(f64, f64)>>,
{
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for ring in rings {
        for &(x, y) in ring {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }
    if !min_x.is_finite() {
        return (0.0, 0.0, 1.0, 1.0);
    }
    (min_x, min_y, max_x, max_y)
}
