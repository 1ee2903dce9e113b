//! Per-cell measurement groups and the empirical path-loss curve.

use crate::error::{Result, WalkError};
use crate::geodistance::distance_m;
use crate::parser::{Measurement, ReferenceCell};
use crate::stats::{SignalStats, dbm_to_mw};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Natural key of a cell across measurement logs and reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellKey {
    pub mcc: u32,
    pub mnc: u32,
    pub lac: u32,
    pub cellid: u64,
}

impl CellKey {
    pub fn of_measurement(m: &Measurement) -> Self {
        CellKey {
            mcc: m.mcc,
            mnc: m.mnc,
            lac: m.lac,
            cellid: m.cellid,
        }
    }

    pub fn of_reference(r: &ReferenceCell) -> Self {
        CellKey {
            mcc: r.mcc,
            mnc: r.mnc,
            lac: r.lac,
            cellid: r.cellid,
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}/{}", self.mcc, self.mnc, self.lac, self.cellid)
    }
}

/// Position and antenna height of a serving cell tower.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tower {
    pub lat: f64,
    pub lon: f64,
    /// Antenna height above the measurement plane, metres.
    pub height_m: f64,
}

impl Tower {
    pub fn new(lat: f64, lon: f64, height_m: f64) -> Self {
        Self { lat, lon, height_m }
    }

    pub fn from_reference(reference: &ReferenceCell, height_m: f64) -> Self {
        Self::new(reference.lat, reference.lon, height_m)
    }

    /// Distance in metres from the tower to a point.
    pub fn distance_to(&self, lat: f64, lon: f64, mode: DistanceMode) -> f64 {
        let horizontal = distance_m(self.lat, self.lon, lat, lon);
        match mode {
            DistanceMode::Slant => (self.height_m.powi(2) + horizontal.powi(2)).sqrt(),
            DistanceMode::Horizontal => horizontal,
        }
    }
}

/// How tower-to-point distances are measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMode {
    /// Straight line from the antenna: `sqrt(h^2 + horizontal^2)`.
    #[default]
    Slant,
    /// Ground distance only.
    Horizontal,
}

/// Reference level the measured signal is subtracted from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathLossConvention {
    /// `tx_power - signal`, with an assumed transmit power in dBm.
    TxPower(f64),
    /// `peak - signal`, where `peak` is the strongest signal in the cell.
    PeakReferenced,
}

/// All measurements served by one CellID, in source row order.
#[derive(Debug, Clone, PartialEq)]
pub struct CellGroup {
    key: CellKey,
    rows: Vec<Measurement>,
}

impl CellGroup {
    /// Selects the rows of `table` whose CellID matches, preserving order.
    /// The group's key is taken from the first matching row.
    pub fn group(table: &[Measurement], cellid: u64) -> Result<Self> {
        let rows: Vec<Measurement> = table
            .iter()
            .filter(|m| m.cellid == cellid)
            .cloned()
            .collect();

        let first = rows
            .first()
            .ok_or_else(|| WalkError::NotFound(format!("cell {cellid}")))?;

        Ok(CellGroup {
            key: CellKey::of_measurement(first),
            rows,
        })
    }

    /// Builds a group from rows already known to share one CellID.
    pub(crate) fn from_rows(key: CellKey, rows: Vec<Measurement>) -> Self {
        CellGroup { key, rows }
    }

    pub fn key(&self) -> CellKey {
        self.key
    }

    pub fn cellid(&self) -> u64 {
        self.key.cellid
    }

    pub fn rows(&self) -> &[Measurement] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Received signal level per point, dBm.
    pub fn signal_power(&self) -> Vec<f64> {
        self.rows.iter().map(|m| m.signal).collect()
    }

    /// Received power per point, mW.
    pub fn power_mw(&self) -> Vec<f64> {
        self.rows.iter().map(|m| dbm_to_mw(m.signal)).collect()
    }

    pub fn signal_stats(&self) -> SignalStats {
        SignalStats::from_signal(&self.signal_power())
    }

    /// Distance in metres from the tower to every point.
    pub fn distances(&self, tower: &Tower, mode: DistanceMode) -> Vec<f64> {
        self.rows
            .iter()
            .map(|m| tower.distance_to(m.lat, m.lon, mode))
            .collect()
    }

    /// Empirical path loss in dB per point.
    pub fn empirical_path_loss(&self, convention: PathLossConvention) -> Vec<f64> {
        let reference = match convention {
            PathLossConvention::TxPower(tx_power) => tx_power,
            PathLossConvention::PeakReferenced => self
                .rows
                .iter()
                .map(|m| m.signal)
                .fold(f64::NEG_INFINITY, f64::max),
        };
        self.rows.iter().map(|m| reference - m.signal).collect()
    }
}
