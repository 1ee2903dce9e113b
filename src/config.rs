use crate::dataset::{DistanceMode, PathLossConvention};
use crate::error::{Result, WalkError};
use crate::models::{
    Abg, CloseIn, Environment, FreeSpace, Gains, OkumuraHata, PropagationModel, Shadowing, TwoRay,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Which reference level empirical path loss is computed against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathLossReference {
    #[default]
    TxPower,
    PeakReferenced,
}

/// Model and comparison parameters.
///
/// Stored as a flat JSON object on disk; every key is optional:
/// ```json
/// {
///   "signal_data_files": ["runs/walk1.csv", "runs/walk2.csv"],
///   "reference_file": "runs/cell_towers.csv",
///   "freq_mhz": 1900,
///   "bs_height": 30,
///   "sigma": 6,
///   "seed": 42
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub signal_data_files: Vec<PathBuf>,
    pub reference_file: Option<PathBuf>,
    /// Manual tower position, used instead of the reference table.
    pub tower_lat: Option<f64>,
    pub tower_lon: Option<f64>,

    pub freq_mhz: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub sigma: f64,
    pub pl_exp: f64,
    pub pl_exp_tworay: f64,
    pub ref_dist: f64,
    pub ref_freq: f64,
    pub tx_power: f64,
    pub tx_gain: f64,
    pub rx_gain: f64,
    pub bs_height: f64,
    pub ue_height: f64,
    pub large_city: bool,
    pub path_gain: bool,

    /// Shadowing block length in samples; unset or 1 means independent draws.
    pub coherence_length: Option<usize>,
    pub seed: u64,
    pub distance_mode: DistanceMode,
    pub path_loss_convention: PathLossReference,

    pub plot_start: f64,
    pub plot_end: f64,
    pub plot_points: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            signal_data_files: Vec::new(),
            reference_file: None,
            tower_lat: None,
            tower_lon: None,
            freq_mhz: 50.0,
            alpha: 1.0,
            beta: 1.0,
            gamma: 1.0,
            sigma: 1.0,
            pl_exp: 1.0,
            pl_exp_tworay: 1.0,
            ref_dist: 1.0,
            ref_freq: crate::models::log_distance::ABG_DEFAULT_REF_FREQ,
            tx_power: 43.0,
            tx_gain: 3.0,
            rx_gain: 3.0,
            bs_height: 1.0,
            ue_height: 1.0,
            large_city: true,
            path_gain: false,
            coherence_length: None,
            seed: 0,
            distance_mode: DistanceMode::Slant,
            path_loss_convention: PathLossReference::TxPower,
            plot_start: 1.0,
            plot_end: 1500.0,
            plot_points: 500,
        }
    }
}

impl ModelConfig {
    /// Loads the config from a JSON file at `path`. A missing file yields the
    /// defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| WalkError::data_load(path, e))?;
        Self::from_json(&content).map_err(|e| WalkError::data_load(path, e))
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn gains(&self) -> Gains {
        Gains::new(self.tx_gain, self.rx_gain)
    }

    pub fn convention(&self) -> PathLossConvention {
        match self.path_loss_convention {
            PathLossReference::TxPower => PathLossConvention::TxPower(self.tx_power),
            PathLossReference::PeakReferenced => PathLossConvention::PeakReferenced,
        }
    }

    pub fn shadowing(&self) -> Shadowing {
        Shadowing::seeded(self.seed).with_coherence_length(self.coherence_length.unwrap_or(1))
    }

    /// Manual tower override, when both coordinates are set.
    pub fn tower_position(&self) -> Option<(f64, f64)> {
        self.tower_lat.zip(self.tower_lon)
    }

    /// Evenly spaced distances from `plot_start` to `plot_end` inclusive.
    pub fn distance_domain(&self) -> Result<Vec<f64>> {
        if self.plot_start <= 0.0 || self.plot_end < self.plot_start {
            return Err(WalkError::Domain(format!(
                "distance domain must satisfy 0 < start <= end, got {}..{}",
                self.plot_start, self.plot_end
            )));
        }
        Ok(linspace(self.plot_start, self.plot_end, self.plot_points))
    }

    /// One instance of every model variant.
    pub fn build_models(&self) -> Result<Vec<PropagationModel>> {
        let f = self.freq_mhz;
        let oh = OkumuraHata::new(f, self.bs_height, self.ue_height, self.large_city)?;

        Ok(vec![
            PropagationModel::FreeSpace(FreeSpace::new(f)?),
            PropagationModel::TwoRay(TwoRay::new(f, self.pl_exp_tworay, self.ref_dist)?),
            PropagationModel::Abg(
                Abg::new(f, self.alpha, self.beta, self.gamma, self.sigma)?
                    .with_reference(self.ref_dist, self.ref_freq)?,
            ),
            PropagationModel::CloseIn(CloseIn::new(f, self.pl_exp, self.sigma, self.ref_dist)?),
            PropagationModel::OkumuraHata(Environment::Urban, oh),
            PropagationModel::OkumuraHata(Environment::Suburban, oh),
            PropagationModel::OkumuraHata(Environment::Rural, oh),
        ])
    }
}

fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        n => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}
