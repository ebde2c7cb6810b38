use crate::core::busco::CATEGORIES;
use crate::render::svg::{
    draw_x_axis_label, draw_x_axis_ticks, svg_close, svg_open, xml_escape,
};
use anyhow::Result;
use std::fmt::Write;

/// Segment colors in `CATEGORIES` order: deepskyblue, royalblue, gold,
/// orangered.
const COLORS: [&str; 4] = ["#00bfff", "#4169e1", "#ffd700", "#ff4500"];

const WIDTH: f64 = 800.0;
const HEIGHT: f64 = 220.0;

/// One horizontal stacked bar over a 0-100% axis, with the completeness
/// label annotated across the bar.
pub fn figure(percentages: &[f64; 4], label: &str) -> Result<String> {
    let (w, h) = (WIDTH, HEIGHT);
    let left = 20.0;
    let right = 20.0;
    let top = 16.0;
    let bottom = 50.0;
    let plot_w = w - left - right;
    let plot_h = h - top - bottom;

    let mut out = String::new();
    svg_open(&mut out, w, h)?;

    draw_x_axis_ticks(&mut out, left, top, plot_w, plot_h, 0.0, 100.0, 6)?;

    // Left and bottom spines only; no y ticks, no frame.
    writeln!(
        out,
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#333\"/>",
        left,
        top,
        left,
        top + plot_h
    )?;
    writeln!(
        out,
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#333\"/>",
        left,
        top + plot_h,
        left + plot_w,
        top + plot_h
    )?;

    let bar_h = plot_h * 0.5;
    let bar_y = top + (plot_h - bar_h) / 2.0;
    let mut x = left;
    for (pct, color) in percentages.iter().zip(COLORS) {
        let seg_w = pct / 100.0 * plot_w;
        writeln!(
            out,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"/>",
            x, bar_y, seg_w, bar_h, color
        )?;
        x += seg_w;
    }

    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"16\" fill=\"#000\">{}</text>",
        left + 0.02 * plot_w,
        top + plot_h / 2.0 + 0.05 * plot_h + 6.0,
        xml_escape(label)
    )?;

    // Legend, lower left inside the axes, all entries on one row.
    let mut legend_x = left + 8.0;
    let legend_y = top + plot_h - 14.0;
    for (category, color) in CATEGORIES.iter().zip(COLORS) {
        writeln!(
            out,
            "<rect x=\"{}\" y=\"{}\" width=\"10\" height=\"10\" fill=\"{}\"/>",
            legend_x, legend_y, color
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#333\">{}</text>",
            legend_x + 14.0,
            legend_y + 9.0,
            category
        )?;
        legend_x += 14.0 + category.len() as f64 * 6.2 + 16.0;
    }

    draw_x_axis_label(&mut out, left, top, plot_w, plot_h, "% BUSCOs")?;
    svg_close(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_scale_with_percentages() {
        let svg = figure(&[50.0, 10.0, 5.0, 35.0], "C:60.0%").unwrap();
        // 50% of the 760 px plot width.
        assert!(svg.contains("width=\"380\""));
        // 10% -> 76 px.
        assert!(svg.contains("width=\"76\""));
        for color in COLORS {
            assert!(svg.contains(color));
        }
    }

    #[test]
    fn carries_axis_label_and_annotation() {
        let svg = figure(&[50.0, 10.0, 5.0, 35.0], "C:60.0%[S:50.0%,D:10.0%]").unwrap();
        assert!(svg.contains("% BUSCOs"));
        assert!(svg.contains("C:60.0%[S:50.0%,D:10.0%]"));
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn legend_names_every_category() {
        let svg = figure(&[25.0, 25.0, 25.0, 25.0], "C:50.0%").unwrap();
        for category in CATEGORIES {
            assert!(svg.contains(category));
        }
    }
}
