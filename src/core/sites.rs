use crate::core::dwca::OccurrenceRecord;
use anyhow::{Context, Result};
use h3o::{CellIndex, LatLng, Resolution};
use std::collections::HashMap;

/// Binning resolution for occurrence sites (average cell edge ~3.7 km).
pub const HEX_RESOLUTION: Resolution = Resolution::Six;

/// One row per unique coordinate: the earliest year an individual was
/// recorded at that site.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Site {
    pub lat: f64,
    pub lon: f64,
    pub first_year: i32,
}

/// Reduces the record set to one row per exact (lat, lon) pair holding the
/// minimum observed year. Output order is deterministic regardless of input
/// order.
pub fn first_year_per_site(records: &[OccurrenceRecord]) -> Vec<Site> {
    let mut min_year: HashMap<(u64, u64), i32> = HashMap::new();
    for rec in records {
        min_year
            .entry((rec.lat.to_bits(), rec.lon.to_bits()))
            .and_modify(|year| *year = (*year).min(rec.year))
            .or_insert(rec.year);
    }
    let mut sites: Vec<Site> = min_year
        .into_iter()
        .map(|((lat, lon), first_year)| Site {
            lat: f64::from_bits(lat),
            lon: f64::from_bits(lon),
            first_year,
        })
        .collect();
    sites.sort_by(|a, b| a.lat.total_cmp(&b.lat).then(a.lon.total_cmp(&b.lon)));
    sites
}

/// Assigns each site to its containing hex cell and keeps the minimum
/// first-observation year per cell. Sorted by cell index, so permuting the
/// input rows cannot change the result.
pub fn bin_sites(sites: &[Site], resolution: Resolution) -> Result<Vec<(CellIndex, i32)>> {
    let mut cells: HashMap<CellIndex, i32> = HashMap::new();
    for site in sites {
        let coord = LatLng::new(site.lat, site.lon).with_context(|| {
            format!("({}, {}) is not a valid coordinate", site.lat, site.lon)
        })?;
        cells
            .entry(coord.to_cell(resolution))
            .and_modify(|year| *year = (*year).min(site.first_year))
            .or_insert(site.first_year);
    }
    let mut out: Vec<(CellIndex, i32)> = cells.into_iter().collect();
    out.sort_by_key(|&(cell, _)| cell);
    Ok(out)
}

/// Boundary polygon of a cell as (lon, lat) vertices in degrees.
pub fn cell_boundary(cell: CellIndex) -> Vec<(f64, f64)> {
    cell.boundary().iter().map(|v| (v.lng(), v.lat())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(year: i32, lat: f64, lon: f64) -> OccurrenceRecord {
        OccurrenceRecord { year, lat, lon }
    }

    #[test]
    fn earliest_year_wins_per_site() {
        let sites = first_year_per_site(&[rec(2005, 52.2, 0.1), rec(1990, 52.2, 0.1)]);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].first_year, 1990);
    }

    #[test]
    fn distinct_coordinates_stay_separate() {
        let sites = first_year_per_site(&[rec(2005, 52.2, 0.1), rec(1990, 52.2, 0.2)]);
        assert_eq!(sites.len(), 2);
    }

    #[test]
    fn binning_is_order_independent() {
        let forward = [
            rec(2005, 52.20, 0.10),
            rec(1990, 52.20, 0.11),
            rec(2012, 48.90, 2.30),
            rec(1987, 59.33, 18.07),
        ];
        let mut reversed = forward;
        reversed.reverse();

        let a = bin_sites(&first_year_per_site(&forward), HEX_RESOLUTION).unwrap();
        let b = bin_sites(&first_year_per_site(&reversed), HEX_RESOLUTION).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn nearby_sites_share_a_cell() {
        // ~100 m apart, well inside one resolution-6 hexagon.
        let sites = first_year_per_site(&[rec(2005, 52.2000, 0.1000), rec(1990, 52.2005, 0.1000)]);
        let cells = bin_sites(&sites, HEX_RESOLUTION).unwrap();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].1, 1990);
    }

    #[test]
    fn boundary_is_a_hexagon() {
        let cells = bin_sites(
            &first_year_per_site(&[rec(2000, 52.2, 0.1)]),
            HEX_RESOLUTION,
        )
        .unwrap();
        let boundary = cell_boundary(cells[0].0);
        assert!(boundary.len() >= 6);
        assert!(boundary.iter().all(|&(lon, lat)| {
            (lon - 0.1).abs() < 0.1 && (lat - 52.2).abs() < 0.1
        }));
    }
}
