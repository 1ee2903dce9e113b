//! CSV parsers for measurement logs and reference cell tables.
//!
//! Rows are mapped onto typed records once, at load time. Unknown columns
//! are ignored; a missing required column fails the whole file.

use crate::error::{Result, WalkError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Columns every measurement file must carry.
pub const MEASUREMENT_COLUMNS: &[&str] = &[
    "mcc",
    "mnc",
    "lac",
    "cellid",
    "lat",
    "lon",
    "signal",
    "pci",
    "speed",
    "measured_at",
    "rating",
    "direction",
    "act",
    "ta",
];

/// Columns every reference table must carry.
pub const REFERENCE_COLUMNS: &[&str] = &[
    "radio", "mcc", "net", "area", "cell", "lon", "lat", "range", "samples",
];

/// Radio access technology reported with a measurement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum AccessType {
    Lte,
    LtePlus,
    Umts,
    HspaPlus,
    Other(String),
}

impl From<String> for AccessType {
    fn from(value: String) -> Self {
        match value.trim() {
            "LTE" => AccessType::Lte,
            "LTE+" => AccessType::LtePlus,
            "UMTS" => AccessType::Umts,
            "HSPA+" => AccessType::HspaPlus,
            _ => AccessType::Other(value),
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessType::Lte => write!(f, "LTE"),
            AccessType::LtePlus => write!(f, "LTE+"),
            AccessType::Umts => write!(f, "UMTS"),
            AccessType::HspaPlus => write!(f, "HSPA+"),
            AccessType::Other(s) => write!(f, "{s}"),
        }
    }
}

/// One row of a measurement log.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Measurement {
    pub mcc: u32,
    pub mnc: u32,
    pub lac: u32,
    pub cellid: u64,
    pub lat: f64,
    pub lon: f64,
    /// Received signal level, dBm.
    pub signal: f64,
    pub pci: Option<f64>,
    pub speed: Option<f64>,
    /// Epoch milliseconds.
    pub measured_at: i64,
    pub rating: Option<f64>,
    /// Heading in degrees.
    pub direction: Option<f64>,
    pub act: AccessType,
    /// Timing advance.
    pub ta: Option<f64>,
    #[serde(default)]
    pub tac: Option<u32>,
}

impl Measurement {
    pub fn measured_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.measured_at)
    }
}

/// One row of an OpenCellID-style reference table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReferenceCell {
    pub radio: String,
    pub mcc: u32,
    #[serde(rename = "net")]
    pub mnc: u32,
    #[serde(rename = "area")]
    pub lac: u32,
    #[serde(rename = "cell")]
    pub cellid: u64,
    pub lon: f64,
    pub lat: f64,
    /// Declared coverage range, metres.
    pub range: f64,
    pub samples: u64,
}

/// Parses measurement rows from any reader; `source` is only used in errors.
pub fn read_measurements<R: Read>(reader: R, source: &Path) -> Result<Vec<Measurement>> {
    read_records(reader, MEASUREMENT_COLUMNS, source)
}

pub fn load_measurements(path: &Path) -> Result<Vec<Measurement>> {
    let file = File::open(path).map_err(|e| WalkError::data_load(path, e))?;
    read_measurements(file, path)
}

pub fn read_reference_cells<R: Read>(reader: R, source: &Path) -> Result<Vec<ReferenceCell>> {
    read_records(reader, REFERENCE_COLUMNS, source)
}

pub fn load_reference_cells(path: &Path) -> Result<Vec<ReferenceCell>> {
    let file = File::open(path).map_err(|e| WalkError::data_load(path, e))?;
    read_reference_cells(file, path)
}

fn read_records<T, R>(reader: R, required: &[&str], source: &Path) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| WalkError::data_load(source, e))?
        .clone();
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(WalkError::data_load(
            source,
            format!("missing required columns: {}", missing.join(", ")),
        ));
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: T = result.map_err(|e| WalkError::data_load(source, e))?;
        rows.push(record);
    }

    debug!(path = %source.display(), rows = rows.len(), "Parsed CSV");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "mcc,mnc,lac,cellid,lat,lon,signal,pci,speed,measured_at,rating,direction,act,ta";

    fn source() -> &'static Path {
        Path::new("memory.csv")
    }

    #[test]
    fn test_parse_measurement_rows() {
        let csv = format!(
            "{HEADER}\n\
             302,720,11300,27653378,45.5017,-73.5673,-87,143,1.2,1617201000000,3,90,LTE,4\n\
             302,720,11300,27653378,45.5018,-73.5672,-91,143,1.4,1617201001000,3,92,HSPA+,\n"
        );
        let rows = read_measurements(csv.as_bytes(), source()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cellid, 27653378);
        assert_eq!(rows[0].signal, -87.0);
        assert_eq!(rows[0].act, AccessType::Lte);
        assert_eq!(rows[0].ta, Some(4.0));
        assert_eq!(rows[0].tac, None);
        assert_eq!(rows[1].act, AccessType::HspaPlus);
        assert_eq!(rows[1].ta, None);
    }

    #[test]
    fn test_optional_tac_and_extra_columns() {
        let csv = format!(
            "{HEADER},tac,psc\n\
             302,720,11300,5,45.0,-73.0,-80,1,0,1617201000000,1,0,UMTS,0,11300,7\n"
        );
        let rows = read_measurements(csv.as_bytes(), source()).unwrap();
        assert_eq!(rows[0].tac, Some(11300));
        assert_eq!(rows[0].act, AccessType::Umts);
    }

    #[test]
    fn test_missing_column_is_data_load_error() {
        let csv = "mcc,mnc,lac,cellid,lat,lon\n302,720,1,2,45.0,-73.0\n";
        let err = read_measurements(csv.as_bytes(), source()).unwrap_err();
        match err {
            WalkError::DataLoad { reason, .. } => {
                assert!(reason.contains("signal"));
                assert!(reason.contains("measured_at"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unparseable_value_is_data_load_error() {
        let csv = format!("{HEADER}\n302,720,11300,abc,45.0,-73.0,-80,1,0,1,1,0,LTE,0\n");
        let err = read_measurements(csv.as_bytes(), source()).unwrap_err();
        assert!(matches!(err, WalkError::DataLoad { .. }));
    }

    #[test]
    fn test_missing_file_is_data_load_error() {
        let err = load_measurements(Path::new("/nonexistent/walk.csv")).unwrap_err();
        assert!(matches!(err, WalkError::DataLoad { .. }));
    }

    #[test]
    fn test_unknown_access_type_is_kept() {
        assert_eq!(AccessType::from("GSM".to_string()), AccessType::Other("GSM".into()));
        assert_eq!(AccessType::from("LTE+".to_string()).to_string(), "LTE+");
    }

    #[test]
    fn test_parse_reference_rows() {
        let csv = "radio,mcc,net,area,cell,unit,lon,lat,range,samples,changeable\n\
                   LTE,302,720,11300,27653378,,-73.5601,45.5049,1000,42,1\n";
        let rows = read_reference_cells(csv.as_bytes(), source()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mnc, 720);
        assert_eq!(rows[0].lac, 11300);
        assert_eq!(rows[0].cellid, 27653378);
        assert_eq!(rows[0].range, 1000.0);
    }

    #[test]
    fn test_measured_at_to_utc() {
        let csv = format!("{HEADER}\n302,720,1,2,45.0,-73.0,-80,1,0,1617201000000,1,0,LTE,0\n");
        let rows = read_measurements(csv.as_bytes(), source()).unwrap();
        let ts = rows[0].measured_at_utc().unwrap();
        assert_eq!(ts.to_rfc3339(), "2021-03-31T14:30:00+00:00");
    }
}
