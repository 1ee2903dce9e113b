//! Output formatting and persistence for comparison results.
//!
//! Supports pretty-printing, JSON export of the full comparison, and CSV
//! append of the empirical points and model curves.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::comparison::Comparison;
use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// A single empirical point flattened with its cell key, one CSV row.
#[derive(Debug, Serialize)]
struct PointRecord {
    mcc: u32,
    mnc: u32,
    lac: u32,
    cellid: u64,
    measured_at: i64,
    lat: f64,
    lon: f64,
    signal_dbm: f64,
    distance_m: f64,
    value_db: f64,
}

/// One sample of one model curve, long format.
#[derive(Debug, Serialize)]
struct CurveRecord<'a> {
    cellid: u64,
    model: &'a str,
    distance_m: f64,
    value_db: f64,
}

/// Logs a comparison using Rust's debug pretty-print format.
pub fn print_pretty(comparison: &Comparison) {
    debug!("{:#?}", comparison);
}

/// Logs a comparison as pretty-printed JSON.
pub fn print_json(comparison: &Comparison) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(comparison)?);
    Ok(())
}

/// Writes the whole comparison as pretty-printed JSON, replacing `path`.
pub fn write_json(path: &Path, comparison: &Comparison) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, comparison)?;
    writer.flush()?;
    info!(path = %path.display(), "Comparison written");
    Ok(())
}

/// Appends the empirical points of a comparison as rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_points(path: &Path, comparison: &Comparison) -> Result<()> {
    let cell = comparison.cell;
    let records = comparison.empirical.iter().map(|p| PointRecord {
        mcc: cell.mcc,
        mnc: cell.mnc,
        lac: cell.lac,
        cellid: cell.cellid,
        measured_at: p.measured_at,
        lat: p.lat,
        lon: p.lon,
        signal_dbm: p.signal_dbm,
        distance_m: p.distance_m,
        value_db: p.value_db,
    });
    append_records(path, records)
}

/// Appends every model curve of a comparison, one row per distance sample.
pub fn append_curves(path: &Path, comparison: &Comparison) -> Result<()> {
    let records = comparison.curves.iter().flat_map(|curve| {
        comparison
            .distances
            .iter()
            .zip(&curve.values)
            .map(move |(&distance_m, &value_db)| CurveRecord {
                cellid: comparison.cell.cellid,
                model: &curve.label,
                distance_m,
                value_db,
            })
    });
    append_records(path, records)
}

fn append_records<T, I>(path: &Path, records: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let mut records = records.into_iter().peekable();
    if records.peek().is_none() {
        return Ok(());
    }

    let file_exists = path.exists();
    debug!(path = %path.display(), file_exists, "Appending CSV records");

    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::{EmpiricalPoint, ModelCurve};
    use crate::dataset::CellKey;
    use crate::models::ModelKind;
    use crate::stats::SignalStats;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn comparison() -> Comparison {
        Comparison {
            cell: CellKey {
                mcc: 302,
                mnc: 720,
                lac: 11300,
                cellid: 30,
            },
            tower: None,
            path_gain: false,
            distances: vec![1.0, 2.0, 3.0],
            curves: vec![ModelCurve {
                kind: ModelKind::FreeSpace,
                label: "Free Space".into(),
                values: vec![10.0, 16.0, 19.5],
            }],
            empirical: vec![
                EmpiricalPoint {
                    measured_at: 1000,
                    lat: 45.5,
                    lon: -73.5,
                    signal_dbm: -70.0,
                    distance_m: 30.0,
                    value_db: 108.0,
                },
                EmpiricalPoint {
                    measured_at: 2000,
                    lat: 45.505,
                    lon: -73.5,
                    signal_dbm: -85.0,
                    distance_m: 557.0,
                    value_db: 123.0,
                },
            ],
            signal: SignalStats::default(),
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&comparison());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&comparison()).unwrap();
    }

    #[test]
    fn test_append_points_writes_header_once() {
        let path = temp_path("walksignal_test_points_header.csv");
        let _ = fs::remove_file(&path);

        append_points(&path, &comparison()).unwrap();
        append_points(&path, &comparison()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content.lines().filter(|l| l.contains("measured_at")).count();
        assert_eq!(header_count, 1);
        // 1 header + 2 appends of 2 rows
        assert_eq!(content.lines().count(), 5);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_curves_long_format() {
        let path = temp_path("walksignal_test_curves.csv");
        let _ = fs::remove_file(&path);

        append_curves(&path, &comparison()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "cellid,model,distance_m,value_db");
        assert_eq!(lines[1], "30,Free Space,1.0,10.0");
        assert_eq!(lines.len(), 4);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_json_round_trips_key_fields() {
        let path = temp_path("walksignal_test_comparison.json");
        write_json(&path, &comparison()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["cell"]["cellid"], 30);
        assert_eq!(value["curves"][0]["kind"], "free_space");
        assert_eq!(value["empirical"].as_array().unwrap().len(), 2);

        fs::remove_file(&path).unwrap();
    }
}
