use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Core table name inside a GBIF Darwin Core Archive.
pub const CORE_TABLE: &str = "occurrence.txt";

/// Occurrence table columns consumed by the mapper; everything else in the
/// core table is ignored.
pub const FIELDS: [&str; 3] = ["year", "decimalLatitude", "decimalLongitude"];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OccurrenceRecord {
    pub year: i32,
    pub lat: f64,
    pub lon: f64,
}

/// A Darwin Core Archive with a located core occurrence table.
#[derive(Debug)]
pub struct DwcArchive {
    archive: ZipArchive<File>,
    core_name: String,
}

impl DwcArchive {
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
        let archive = ZipArchive::new(file)
            .with_context(|| format!("{} is not a readable zip archive", path.display()))?;
        let core_name = archive
            .file_names()
            .find(|name| *name == CORE_TABLE || name.ends_with(&format!("/{CORE_TABLE}")))
            .map(str::to_string)
            .with_context(|| {
                format!("{} has no {} core table", path.display(), CORE_TABLE)
            })?;
        Ok(Self { archive, core_name })
    }

    pub fn core_name(&self) -> &str {
        &self.core_name
    }

    pub fn read_core(&mut self) -> Result<String> {
        let core_name = self.core_name.clone();
        let mut entry = self
            .archive
            .by_name(&core_name)
            .with_context(|| format!("failed to locate {core_name} in archive"))?;
        let mut text = String::new();
        entry
            .read_to_string(&mut text)
            .with_context(|| format!("failed to read {}", self.core_name))?;
        Ok(text)
    }
}

/// Pulls (year, lat, lon) out of the tab-delimited core table. Rows with a
/// missing or unparseable value in any of the three fields are dropped.
pub fn extract_records(table: &str) -> Result<Vec<OccurrenceRecord>> {
    let mut lines = table.lines();
    let header = lines.next().context("occurrence table is empty")?;
    let columns: Vec<&str> = header.split('\t').collect();

    let mut indices = [0usize; 3];
    for (slot, field) in FIELDS.iter().enumerate() {
        indices[slot] = columns
            .iter()
            .position(|c| c.trim() == *field)
            .with_context(|| format!("occurrence table is missing the {field} column"))?;
    }
    let [year_idx, lat_idx, lon_idx] = indices;

    let mut records = Vec::new();
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let year = fields.get(year_idx).and_then(|v| v.trim().parse::<i32>().ok());
        let lat = fields.get(lat_idx).and_then(|v| v.trim().parse::<f64>().ok());
        let lon = fields.get(lon_idx).and_then(|v| v.trim().parse::<f64>().ok());
        if let (Some(year), Some(lat), Some(lon)) = (year, lat, lon) {
            records.push(OccurrenceRecord { year, lat, lon });
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_wanted_columns_only() {
        let table = "gbifID\tyear\tdecimalLatitude\tdecimalLongitude\tcountryCode\n\
                     1\t2005\t52.2\t0.1\tGB\n\
                     2\t1990\t48.9\t2.3\tFR\n";
        let records = extract_records(table).unwrap();
        assert_eq!(
            records,
            vec![
                OccurrenceRecord { year: 2005, lat: 52.2, lon: 0.1 },
                OccurrenceRecord { year: 1990, lat: 48.9, lon: 2.3 },
            ]
        );
    }

    #[test]
    fn rows_with_gaps_are_dropped() {
        let table = "year\tdecimalLatitude\tdecimalLongitude\n\
                     2005\t52.2\t0.1\n\
                     \t52.2\t0.1\n\
                     2011\t\t0.1\n\
                     2012\t48.9\tnot-a-number\n";
        let records = extract_records(table).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].year, 2005);
    }

    #[test]
    fn missing_column_is_named() {
        let table = "gbifID\tyear\tdecimalLongitude\n1\t2005\t0.1\n";
        let err = extract_records(table).unwrap_err();
        assert!(err.to_string().contains("decimalLatitude"));
    }
}
