use anyhow::{Context, Result, bail};
use geojson::{GeoJson, Value};
use std::fs;
use std::path::Path;

/// Polygon outlines of the basemap layer, outer rings only, as (lon, lat)
/// vertices in degrees (EPSG:4326).
pub struct Basemap {
    pub polygons: Vec<Vec<(f64, f64)>>,
}

impl Basemap {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let geojson: GeoJson = text
            .parse()
            .with_context(|| format!("{} is not valid GeoJSON", path.display()))?;

        let mut polygons = Vec::new();
        match geojson {
            GeoJson::FeatureCollection(fc) => {
                for feature in fc.features {
                    if let Some(geometry) = feature.geometry {
                        collect_polygons(&geometry.value, &mut polygons);
                    }
                }
            }
            GeoJson::Feature(feature) => {
                if let Some(geometry) = feature.geometry {
                    collect_polygons(&geometry.value, &mut polygons);
                }
            }
            GeoJson::Geometry(geometry) => collect_polygons(&geometry.value, &mut polygons),
        }
        if polygons.is_empty() {
            bail!("{} contains no polygon features", path.display());
        }
        Ok(Self { polygons })
    }
}

fn collect_polygons(value: &Value, out: &mut Vec<Vec<(f64, f64)>>) {
    match value {
        Value::Polygon(rings) => push_outer_ring(rings, out),
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                push_outer_ring(rings, out);
            }
        }
        Value::GeometryCollection(geometries) => {
            for geometry in geometries {
                collect_polygons(&geometry.value, out);
            }
        }
        _ => {}
    }
}

fn push_outer_ring(rings: &[Vec<Vec<f64>>], out: &mut Vec<Vec<(f64, f64)>>) {
    if let Some(ring) = rings.first() {
        let ring: Vec<(f64, f64)> = ring
            .iter()
            .filter(|position| position.len() >= 2)
            .map(|position| (position[0], position[1]))
            .collect();
        if ring.len() >= 3 {
            out.push(ring);
        }
    }
}

// WGS84 semi-major axis and first eccentricity.
const WGS84_A: f64 = 6_378_137.0;
const WGS84_E: f64 = 0.081_819_190_842_622;

/// Forward World Mercator (EPSG:3395): (lon, lat) degrees to meters.
/// Latitudes are clamped short of the poles, where the projection diverges.
pub fn mercator(lon: f64, lat: f64) -> (f64, f64) {
    let lambda = lon.to_radians();
    let phi = lat.clamp(-89.5, 89.5).to_radians();
    let x = WGS84_A * lambda;
    let esin = WGS84_E * phi.sin();
    let y = WGS84_A
        * ((std::f64::consts::FRAC_PI_4 + phi / 2.0).tan()
            * ((1.0 - esin) / (1.0 + esin)).powf(WGS84_E / 2.0))
        .ln();
    (x, y)
}

/// Projects a (lon, lat) ring into EPSG:3395.
pub fn project_ring(ring: &[(f64, f64)]) -> Vec<(f64, f64)> {
    ring.iter().map(|&(lon, lat)| mercator(lon, lat)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_maps_to_origin() {
        let (x, y) = mercator(0.0, 0.0);
        assert_eq!(x, 0.0);
        assert!(y.abs() < 1e-9);
    }

    #[test]
    fn matches_reference_values() {
        // EPSG:3395 at (10E, 45N).
        let (x, y) = mercator(10.0, 45.0);
        assert!((x - 1_113_194.9).abs() < 1.0);
        assert!((y - 5_591_295.9).abs() < 10.0);
    }

    #[test]
    fn southern_hemisphere_is_negative() {
        let (_, y) = mercator(0.0, -30.0);
        assert!(y < 0.0);
    }

    #[test]
    fn rejects_non_polygon_files() {
        let dir = std::env::temp_dir().join(format!("bioplot_geo_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("points.geojson");
        fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[0.0,0.0]}}]}"#,
        )
        .unwrap();
        assert!(Basemap::from_file(&path).is_err());
    }

    #[test]
    fn reads_multipolygons() {
        let dir = std::env::temp_dir().join(format!("bioplot_geo_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("two.geojson");
        fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{},"geometry":{"type":"MultiPolygon","coordinates":[[[[0.0,0.0],[1.0,0.0],[1.0,1.0],[0.0,0.0]]],[[[2.0,2.0],[3.0,2.0],[3.0,3.0],[2.0,2.0]]]]}}]}"#,
        )
        .unwrap();
        let basemap = Basemap::from_file(&path).unwrap();
        assert_eq!(basemap.polygons.len(), 2);
    }
}
