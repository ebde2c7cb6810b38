use anyhow::Result;
use std::fmt::Write;

pub fn svg_open(out: &mut String, w: f64, h: f64) -> Result<()> {
    writeln!(
        out,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\">",
        w, h, w, h
    )?;
    writeln!(
        out,
        "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"#fff\"/>",
        w, h
    )?;
    Ok(())
}

pub fn svg_close(out: &mut String) -> Result<()> {
    writeln!(out, "</svg>")?;
    Ok(())
}

/// Closed polygon path from pre-projected pixel vertices.
pub fn draw_ring(
    out: &mut String,
    ring: &[(f64, f64)],
    fill: &str,
    stroke: &str,
    stroke_width: f64,
) -> Result<()> {
    if ring.len() < 3 {
        return Ok(());
    }
    let mut d = String::with_capacity(ring.len() * 16);
    for (i, (x, y)) in ring.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        write!(d, "{}{:.2} {:.2}", cmd, x, y)?;
    }
    d.push('Z');
    writeln!(
        out,
        "<path d=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
        d, fill, stroke, stroke_width
    )?;
    Ok(())
}

pub fn draw_x_axis_ticks(
    out: &mut String,
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
    min_x: f64,
    max_x: f64,
    ticks: usize,
) -> Result<()> {
    if ticks < 2 || (max_x - min_x).abs() < 1e-9 {
        return Ok(());
    }
    let (start, step, count) = nice_ticks(min_x, max_x, ticks);
    for i in 0..count {
        let v = start + step * i as f64;
        if v < min_x - 1e-9 || v > max_x + 1e-9 {
            continue;
        }
        let x = left + ((v - min_x) / (max_x - min_x).max(1e-6)) * plot_w;
        writeln!(
            out,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#eee\"/>",
            x,
            top,
            x,
            top + plot_h
        )?;
        writeln!(
            out,
            "<text x=\"{}\" y=\"{}\" font-size=\"10\" fill=\"#666\" text-anchor=\"middle\" dominant-baseline=\"hanging\">{}</text>",
            x,
            top + plot_h + 4.0,
            fmt_tick(v)
        )?;
    }
    Ok(())
}

pub fn draw_x_axis_label(
    out: &mut String,
    left: f64,
    top: f64,
    plot_w: f64,
    plot_h: f64,
    label: &str,
) -> Result<()> {
    writeln!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"11\" fill=\"#444\" text-anchor=\"middle\">{}</text>",
        left + plot_w / 2.0,
        top + plot_h + 28.0,
        xml_escape(label)
    )?;
    Ok(())
}

pub fn fmt_tick(v: f64) -> String {
    if (v - v.round()).abs() < 0.001 {
        format!("{}", v.round() as i64)
    } else if v.abs() < 10.0 {
        format!("{:.2}", v)
    } else {
        format!("{:.1}", v)
    }
}

pub fn nice_ticks(min: f64, max: f64, ticks: usize) -> (f64, f64, usize) {
    let range = (max - min).abs().max(1e-9);
    let rough = range / (ticks as f64 - 1.0);
    let mag = 10f64.powf(rough.abs().log10().floor());
    let norm = rough / mag;
    let step = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    } * mag;
    let start = (min / step).floor() * step;
    let end = (max / step).ceil() * step;
    let count = ((end - start) / step).round() as usize + 1;
    (start, step, count)
}

pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_axis_gets_round_ticks() {
        let (start, step, count) = nice_ticks(0.0, 100.0, 6);
        assert_eq!(start, 0.0);
        assert_eq!(step, 20.0);
        assert_eq!(count, 6);
    }

    #[test]
    fn ring_path_is_closed() {
        let mut out = String::new();
        draw_ring(&mut out, &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)], "#aaa", "none", 0.0)
            .unwrap();
        assert!(out.contains("M0.00 0.00"));
        assert!(out.contains("Z\""));
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(xml_escape("a<b&c"), "a&lt;b&amp;c");
    }
}
