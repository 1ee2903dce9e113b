//! Model-versus-measurement comparison for a single cell.
//!
//! Produces the analytical curves of every configured model over the
//! distance domain, and the empirical path-loss points of the cell, ready to
//! be handed to a plotting or export collaborator.

use crate::config::ModelConfig;
use crate::dataset::{CellKey, Dataset, Tower};
use crate::error::Result;
use crate::models::ModelKind;
use crate::stats::SignalStats;
use serde::Serialize;
use tracing::{debug, info};

/// One analytical curve over the comparison's distance domain.
#[derive(Debug, Clone, Serialize)]
pub struct ModelCurve {
    pub kind: ModelKind,
    pub label: String,
    pub values: Vec<f64>,
}

/// One measured point with its distance to the serving tower.
#[derive(Debug, Clone, Serialize)]
pub struct EmpiricalPoint {
    pub measured_at: i64,
    pub lat: f64,
    pub lon: f64,
    pub signal_dbm: f64,
    pub distance_m: f64,
    /// Path loss, or path gain when the comparison reports gain.
    pub value_db: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub cell: CellKey,
    /// Serving tower; `None` when no position is known for the cell.
    pub tower: Option<Tower>,
    /// Values are path gain (negated loss) rather than path loss.
    pub path_gain: bool,
    pub distances: Vec<f64>,
    pub curves: Vec<ModelCurve>,
    /// Empty when the tower position is unknown.
    pub empirical: Vec<EmpiricalPoint>,
    pub signal: SignalStats,
}

impl Comparison {
    pub fn curve(&self, kind: ModelKind) -> Option<&ModelCurve> {
        self.curves.iter().find(|c| c.kind == kind)
    }
}

/// Evaluates every model from `config` against the measurements of `cellid`.
///
/// The tower comes from the config override when set, otherwise from the
/// dataset's reference table. Antenna gains are subtracted from both the
/// model curves and the empirical points.
#[tracing::instrument(skip(dataset, config), fields(cell_id = cellid))]
pub fn compare(dataset: &Dataset, cellid: u64, config: &ModelConfig) -> Result<Comparison> {
    let group = dataset.get_cell(cellid)?;
    let gains = config.gains();
    let orient = |pl: f64| if config.path_gain { -pl } else { pl };

    let distances = config.distance_domain()?;
    let mut shadowing = config.shadowing();
    let mut curves = Vec::new();

    for model in config.build_models()? {
        let values = model
            .path_loss_over_range(&distances, &mut shadowing)?
            .into_iter()
            .map(|pl| orient(gains.apply(pl)))
            .collect();
        debug!(model = %model.kind(), "Model curve evaluated");
        curves.push(ModelCurve {
            kind: model.kind(),
            label: model.kind().to_string(),
            values,
        });
    }

    let tower = match config.tower_position() {
        Some((lat, lon)) => Some(Tower::new(lat, lon, config.bs_height)),
        None => dataset.tower_for_cell(cellid, config.bs_height),
    };

    let empirical = match &tower {
        Some(tower) => {
            let path_loss = group.empirical_path_loss(config.convention());
            let distances = group.distances(tower, config.distance_mode);
            group
                .rows()
                .iter()
                .zip(distances)
                .zip(path_loss)
                .map(|((m, distance_m), pl)| EmpiricalPoint {
                    measured_at: m.measured_at,
                    lat: m.lat,
                    lon: m.lon,
                    signal_dbm: m.signal,
                    distance_m,
                    value_db: orient(gains.apply(pl)),
                })
                .collect()
        }
        None => Vec::new(),
    };

    info!(
        points = empirical.len(),
        curves = curves.len(),
        has_tower = tower.is_some(),
        "Comparison ready"
    );

    Ok(Comparison {
        cell: group.key(),
        tower,
        path_gain: config.path_gain,
        distances,
        curves,
        empirical,
        signal: group.signal_stats(),
    })
}
