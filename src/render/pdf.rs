use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use svg2pdf::usvg;
use svg2pdf::{ConversionOptions, PageOptions};

pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    let tree =
        usvg::Tree::from_str(svg, &opt).map_err(|e| anyhow::anyhow!("usvg parse failed: {e}"))?;
    let pdf = svg2pdf::to_pdf(&tree, ConversionOptions::default(), PageOptions::default())
        .map_err(|e| anyhow::anyhow!("svg2pdf conversion failed: {e}"))?;
    Ok(pdf)
}

pub fn write_pdf(path: &Path, svg: &str) -> Result<()> {
    let pdf = svg_to_pdf(svg)
        .with_context(|| format!("failed to convert figure for {}", path.display()))?;
    fs::write(path, pdf).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
