use crate::map::{Lod, MapRenderer};
use crate::report::Report;
use anyhow::{Context, Result};
use geojson::{GeoJson, Geometry, Value};
use log::warn;
use std::fs;
use std::path::Path;

/// Load the report collection from a backend JSON export (an array of
/// report records). A missing or malformed file is fatal; an empty
/// array is fine.
pub fn load_reports(path: &Path) -> Result<Vec<Report>> {
    let mut bytes = fs::read(path)
        .with_context(|| format!("failed to read reports file {}", path.display()))?;
    let reports: Vec<Report> = simd_json::serde::from_slice(&mut bytes)
        .with_context(|| format!("failed to parse reports file {}", path.display()))?;
    Ok(reports)
}

/// Load available Natural Earth GeoJSON background data into the map
/// renderer. Individual missing or broken files only cost their layer.
pub fn load_basemap(renderer: &mut MapRenderer, data_dir: &Path) -> Result<()> {
    let coastline_files = [
        ("ne_110m_coastline.json", Lod::Low),
        ("natural-earth.json", Lod::Medium),
        ("ne_50m_coastline.json", Lod::Medium),
    ];

    for (filename, lod) in coastline_files {
        let path = data_dir.join(filename);
        if path.exists() {
            if let Err(e) = load_coastlines(renderer, &path, lod) {
                warn!("failed to load {filename}: {e}");
            }
        }
    }

    let borders_path = data_dir.join("ne_50m_borders.json");
    if borders_path.exists() {
        if let Err(e) = load_borders(renderer, &borders_path) {
            warn!("failed to load borders: {e}");
        }
    }

    Ok(())
}

/// Load coastline GeoJSON data
fn load_coastlines(renderer: &mut MapRenderer, path: &Path, lod: Lod) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let geojson: GeoJson = content.parse()?;
    process_geojson_lines(&geojson, |line| renderer.add_coastline(line, lod));
    Ok(())
}

/// Load border GeoJSON data
fn load_borders(renderer: &mut MapRenderer, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let geojson: GeoJson = content.parse()?;
    process_geojson_lines(&geojson, |line| renderer.add_border(line));
    Ok(())
}

/// Process GeoJSON and extract line features
fn process_geojson_lines<F>(geojson: &GeoJson, mut add_line: F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    process_geometry_lines(geometry, &mut add_line);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                process_geometry_lines(geometry, &mut add_line);
            }
        }
        GeoJson::Geometry(geometry) => {
            process_geometry_lines(geometry, &mut add_line);
        }
    }
}

fn process_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    match &geometry.value {
        Value::LineString(coords) => {
            add_line(coords.iter().map(|c| (c[0], c[1])).collect());
        }
        Value::MultiLineString(lines) => {
            for coords in lines {
                add_line(coords.iter().map(|c| (c[0], c[1])).collect());
            }
        }
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_line(exterior.iter().map(|c| (c[0], c[1])).collect());
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    add_line(exterior.iter().map(|c| (c[0], c[1])).collect());
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}

/// Generate a simple world outline for when no data file is available
pub fn generate_simple_world(renderer: &mut MapRenderer) {
    // Simplified continent outlines (used as Low LOD fallback)
    renderer.add_coastline(
        vec![
            (-168.0, 65.0), (-166.0, 60.0), (-141.0, 60.0), (-130.0, 55.0),
            (-125.0, 48.0), (-124.0, 40.0), (-117.0, 32.0), (-110.0, 25.0),
            (-97.0, 25.0), (-97.0, 28.0), (-82.0, 24.0), (-80.0, 25.0),
            (-81.0, 31.0), (-75.0, 35.0), (-70.0, 41.0), (-67.0, 45.0),
            (-65.0, 47.0), (-55.0, 47.0), (-52.0, 47.0), (-55.0, 52.0),
            (-58.0, 55.0), (-64.0, 60.0), (-73.0, 62.0), (-80.0, 63.0),
            (-95.0, 62.0), (-110.0, 68.0), (-130.0, 70.0), (-145.0, 70.0),
            (-168.0, 65.0),
        ],
        Lod::Low,
    );

    renderer.add_coastline(
        vec![
            (-80.0, 10.0), (-75.0, 5.0), (-70.0, 5.0), (-60.0, 5.0),
            (-50.0, 0.0), (-35.0, -5.0), (-35.0, -10.0), (-38.0, -15.0),
            (-40.0, -22.0), (-48.0, -25.0), (-55.0, -34.0), (-58.0, -38.0),
            (-65.0, -42.0), (-68.0, -50.0), (-75.0, -52.0), (-75.0, -45.0),
            (-72.0, -40.0), (-72.0, -30.0), (-70.0, -20.0), (-70.0, -15.0),
            (-80.0, -5.0), (-80.0, 0.0), (-80.0, 10.0),
        ],
        Lod::Low,
    );

    renderer.add_coastline(
        vec![
            (-10.0, 36.0), (-5.0, 36.0), (0.0, 38.0), (5.0, 43.0),
            (10.0, 44.0), (15.0, 45.0), (20.0, 40.0), (25.0, 37.0),
            (30.0, 40.0), (35.0, 42.0), (40.0, 43.0), (40.0, 55.0),
            (30.0, 60.0), (25.0, 65.0), (20.0, 70.0), (10.0, 71.0),
            (5.0, 62.0), (5.0, 58.0), (-5.0, 58.0), (-10.0, 52.0),
            (-5.0, 48.0), (-5.0, 43.0), (-10.0, 36.0),
        ],
        Lod::Low,
    );

    renderer.add_coastline(
        vec![
            (-17.0, 15.0), (-15.0, 10.0), (-10.0, 5.0), (0.0, 5.0),
            (10.0, 5.0), (15.0, 0.0), (20.0, -5.0), (25.0, -10.0),
            (35.0, -20.0), (35.0, -25.0), (30.0, -30.0), (20.0, -35.0),
            (18.0, -35.0), (15.0, -30.0), (10.0, -15.0), (10.0, 0.0),
            (5.0, 5.0), (-5.0, 5.0), (-10.0, 10.0), (-17.0, 15.0),
        ],
        Lod::Low,
    );

    renderer.add_coastline(
        vec![
            (-17.0, 15.0), (-17.0, 20.0), (-15.0, 28.0), (-5.0, 35.0),
            (10.0, 37.0), (20.0, 33.0), (25.0, 32.0), (35.0, 30.0),
            (35.0, 20.0), (42.0, 12.0), (50.0, 12.0), (45.0, 5.0),
            (35.0, -5.0), (35.0, -20.0),
        ],
        Lod::Low,
    );

    renderer.add_coastline(
        vec![
            (35.0, 42.0), (40.0, 43.0), (50.0, 40.0), (55.0, 37.0),
            (60.0, 25.0), (65.0, 25.0), (70.0, 20.0), (75.0, 15.0),
            (80.0, 8.0), (80.0, 15.0), (88.0, 22.0), (92.0, 22.0),
            (95.0, 16.0), (100.0, 14.0), (105.0, 10.0), (110.0, 20.0),
            (115.0, 22.0), (120.0, 22.0), (122.0, 25.0), (125.0, 30.0),
            (130.0, 35.0), (135.0, 35.0), (140.0, 40.0), (145.0, 45.0),
            (145.0, 50.0), (140.0, 55.0), (135.0, 55.0), (130.0, 52.0),
            (130.0, 43.0), (120.0, 40.0), (110.0, 45.0), (90.0, 50.0),
            (70.0, 55.0), (60.0, 55.0), (50.0, 50.0), (40.0, 43.0),
        ],
        Lod::Low,
    );

    renderer.add_coastline(
        vec![
            (115.0, -20.0), (120.0, -18.0), (130.0, -12.0), (140.0, -12.0),
            (145.0, -15.0), (150.0, -25.0), (153.0, -30.0), (150.0, -35.0),
            (145.0, -38.0), (140.0, -38.0), (135.0, -35.0), (130.0, -32.0),
            (125.0, -32.0), (115.0, -35.0), (115.0, -25.0), (115.0, -20.0),
        ],
        Lod::Low,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_reports_parses_export() {
        let dir = std::env::temp_dir().join("disaster-watch-test-load");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("reports.json");
        fs::write(
            &path,
            r#"[{
                "_id": "r1",
                "prediction": "flood",
                "note": "water rising",
                "location": "Latitude: 9.9, Longitude: 76.2",
                "createdAt": "2024-06-01T08:30:00Z"
            }]"#,
        )
        .unwrap();

        let reports = load_reports(&path).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].prediction, "flood");
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_reports_empty_array_is_ok() {
        let dir = std::env::temp_dir().join("disaster-watch-test-empty");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("reports.json");
        fs::write(&path, "[]").unwrap();
        assert!(load_reports(&path).unwrap().is_empty());
        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_reports_missing_file_is_an_error() {
        assert!(load_reports(Path::new("/nonexistent/reports.json")).is_err());
    }

    #[test]
    fn test_simple_world_populates_renderer() {
        let mut renderer = MapRenderer::new();
        assert!(!renderer.has_data());
        generate_simple_world(&mut renderer);
        assert!(renderer.has_data());
    }
}
