//! Measurement dataset: pooled rows from one or more logs, grouped by cell,
//! joined against an optional reference table.
//!
//! Rows are kept verbatim in load order (file order, then row order). Cell
//! groups are built once per load; distances and path loss are derived on
//! demand from a [`Tower`] and a [`PathLossConvention`].

pub mod cell;

pub use cell::{CellGroup, CellKey, DistanceMode, PathLossConvention, Tower};

use crate::error::{Result, WalkError};
use crate::parser::{self, Measurement, ReferenceCell};
use crate::stats::{SignalStats, TimeSpan};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    files: Vec<PathBuf>,
    rows: Vec<Measurement>,
    /// Unique CellIDs in order of first appearance.
    cell_ids: Vec<u64>,
    groups: HashMap<u64, CellGroup>,
    references: HashMap<CellKey, ReferenceCell>,
}

impl Dataset {
    /// Loads and concatenates measurement files in the given order.
    #[tracing::instrument(skip_all, fields(files = files.len()))]
    pub fn load<P: AsRef<Path>>(files: &[P]) -> Result<Self> {
        let mut rows = Vec::new();
        for path in files {
            let path = path.as_ref();
            let file_rows = parser::load_measurements(path)?;
            debug!(path = %path.display(), rows = file_rows.len(), "Loaded measurement file");
            rows.extend(file_rows);
        }

        let mut dataset = Self::from_rows(rows);
        dataset.files = files.iter().map(|p| p.as_ref().to_path_buf()).collect();

        info!(
            rows = dataset.rows.len(),
            cells = dataset.cell_ids.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }

    /// Builds a dataset from rows already in memory.
    pub fn from_rows(rows: Vec<Measurement>) -> Self {
        let mut cell_ids = Vec::new();
        let mut grouped: HashMap<u64, (CellKey, Vec<Measurement>)> = HashMap::new();

        for row in &rows {
            grouped
                .entry(row.cellid)
                .or_insert_with(|| {
                    cell_ids.push(row.cellid);
                    (CellKey::of_measurement(row), Vec::new())
                })
                .1
                .push(row.clone());
        }

        let groups = grouped
            .into_iter()
            .map(|(id, (key, members))| (id, CellGroup::from_rows(key, members)))
            .collect();

        Dataset {
            files: Vec::new(),
            rows,
            cell_ids,
            groups,
            references: HashMap::new(),
        }
    }

    /// Joins a reference table, keeping only entries whose CellID was
    /// observed in the measurements.
    pub fn with_reference(mut self, cells: Vec<ReferenceCell>) -> Self {
        let observed: HashSet<u64> = self.cell_ids.iter().copied().collect();
        let total = cells.len();

        self.references = cells
            .into_iter()
            .filter(|r| observed.contains(&r.cellid))
            .map(|r| (CellKey::of_reference(&r), r))
            .collect();

        info!(
            total,
            matched = self.references.len(),
            "Reference table joined"
        );
        self
    }

    pub fn load_reference(self, path: &Path) -> Result<Self> {
        let cells = parser::load_reference_cells(path)?;
        Ok(self.with_reference(cells))
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn rows(&self) -> &[Measurement] {
        &self.rows
    }

    /// Unique CellIDs, in order of first appearance.
    pub fn unique_cell_ids(&self) -> &[u64] {
        &self.cell_ids
    }

    /// Cell keys for every unique CellID, taken from its first row.
    pub fn cell_keys(&self) -> Vec<CellKey> {
        self.cell_groups().map(CellGroup::key).collect()
    }

    /// Cell groups in order of first appearance.
    pub fn cell_groups(&self) -> impl Iterator<Item = &CellGroup> {
        self.cell_ids.iter().filter_map(|id| self.groups.get(id))
    }

    pub fn get_cell(&self, cellid: u64) -> Result<&CellGroup> {
        self.groups
            .get(&cellid)
            .ok_or_else(|| WalkError::NotFound(format!("cell {cellid} was never observed")))
    }

    /// Reference entry for a full `(mcc, mnc, lac, cellid)` key.
    pub fn reference(&self, key: &CellKey) -> Result<&ReferenceCell> {
        self.references
            .get(key)
            .ok_or_else(|| WalkError::NotFound(format!("no reference entry for {key}")))
    }

    /// All reference entries that matched an observed CellID.
    pub fn references(&self) -> impl Iterator<Item = &ReferenceCell> {
        self.references.values()
    }

    /// Reference entry for an observed cell, if the table has one.
    pub fn reference_for_cell(&self, cellid: u64) -> Option<&ReferenceCell> {
        let key = self.groups.get(&cellid)?.key();
        self.references.get(&key)
    }

    /// Tower position for an observed cell, when the reference table knows it.
    pub fn tower_for_cell(&self, cellid: u64, height_m: f64) -> Option<Tower> {
        match self.reference_for_cell(cellid) {
            Some(reference) => Some(Tower::from_reference(reference, height_m)),
            None => {
                warn!(cell_id = cellid, "No reference position for cell");
                None
            }
        }
    }

    pub fn signal_stats(&self) -> SignalStats {
        let signal: Vec<f64> = self.rows.iter().map(|m| m.signal).collect();
        SignalStats::from_signal(&signal)
    }

    pub fn time_span(&self) -> Option<TimeSpan> {
        TimeSpan::from_measurements(&self.rows)
    }
}
