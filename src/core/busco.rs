use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;

/// Extraction schema for the short summary, in count order. Each marker is
/// matched as a substring of the third tab-separated field; the count is the
/// second field of the matching line.
const MARKERS: [&str; 5] = ["(S)", "(D)", "(F)", "(M)", "Total BUSCO groups"];

/// Plot/table column names for the four category counts.
pub const CATEGORIES: [&str; 4] = ["Complete", "Duplicated", "Fragmented", "Missing"];

#[derive(Clone, Debug)]
pub struct BuscoSummary {
    /// Raw counts in marker order: single copy, duplicated, fragmented,
    /// missing, total groups.
    pub counts: [u64; 5],
    /// Free-text completeness line, e.g.
    /// `C:60.0%[S:50.0%,D:10.0%],F:5.0%,M:35.0%,n:100`.
    pub label: String,
}

impl BuscoSummary {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut counts: [Option<u64>; 5] = [None; 5];
        let mut label: Option<String> = None;

        for line in text.lines() {
            let fields: Vec<&str> = line.split('\t').collect();
            // Only lines with more than two tab-separated fields carry data.
            if fields.len() <= 2 {
                continue;
            }
            if label.is_none() && fields[1].contains("C:") {
                label = Some(fields[1].trim().to_string());
            }
            for (slot, marker) in MARKERS.iter().enumerate() {
                if counts[slot].is_none() && fields[2].contains(marker) {
                    let count = fields[1].trim().parse::<u64>().with_context(|| {
                        format!("bad count {:?} on the {:?} line", fields[1], marker)
                    })?;
                    counts[slot] = Some(count);
                }
            }
        }

        let mut out = [0u64; 5];
        for (slot, marker) in MARKERS.iter().enumerate() {
            out[slot] =
                counts[slot].with_context(|| format!("short summary has no {marker:?} line"))?;
        }
        let label = label.context("short summary has no completeness (C:) line")?;
        if out[4] == 0 {
            bail!("Total BUSCO groups is zero");
        }
        Ok(Self { counts: out, label })
    }

    /// Category percentages in `CATEGORIES` order. The denominator is always
    /// the total group count.
    pub fn percentages(&self) -> [f64; 4] {
        let total = self.counts[4] as f64;
        let mut out = [0.0; 4];
        for (i, &count) in self.counts[..4].iter().enumerate() {
            out[i] = 100.0 * round_to(count as f64 / total, 4);
        }
        out
    }
}

/// Round to `digits` decimal places, ties to even.
fn round_to(x: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (x * scale).round_ties_even() / scale
}

/// Second-to-last dot-delimited segment of a name. Used for the table row
/// label and the output stem: `sample.busco.txt` -> `busco`.
pub fn dot_stem(name: &str) -> Result<&str> {
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() < 2 {
        bail!("cannot derive an output name from {name:?}");
    }
    Ok(parts[parts.len() - 2])
}

/// Single-row summary table in the layout the tool prints to stdout.
pub fn render_table(row_label: &str, percentages: &[f64; 4]) -> String {
    let mut header_line = " ".repeat(row_label.len());
    let mut value_line = row_label.to_string();
    for (category, pct) in CATEGORIES.iter().zip(percentages) {
        let value = fmt_pct(*pct);
        let width = category.len().max(value.len());
        header_line.push_str("  ");
        header_line.push_str(&format!("{category:>width$}"));
        value_line.push_str("  ");
        value_line.push_str(&format!("{value:>width$}"));
    }
    format!("{header_line}\n{value_line}\n")
}

fn fmt_pct(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}
