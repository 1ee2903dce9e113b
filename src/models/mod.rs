//! Analytical radio propagation models.
//!
//! Every model maps a distance in metres to a path loss in dB. Frequencies
//! are in MHz, heights in metres. The closed set of variants lives in
//! [`PropagationModel`]; stochastic variants (ABG, Close-In) take their
//! shadowing from an explicit [`Shadowing`] source so results are
//! reproducible under a fixed seed.

pub mod log_distance;
pub mod okumura_hata;
pub mod shadowing;

pub use log_distance::{Abg, CloseIn, FreeSpace, TwoRay};
pub use okumura_hata::{Environment, OkumuraHata};
pub use shadowing::Shadowing;

use crate::error::{Result, WalkError};
use rand::Rng;
use serde::Serialize;
use std::fmt;

/// Identifies a model variant, used to label comparison curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    FreeSpace,
    TwoRay,
    Abg,
    CloseIn,
    OkumuraHataUrban,
    OkumuraHataSuburban,
    OkumuraHataRural,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelKind::FreeSpace => write!(f, "Free Space"),
            ModelKind::TwoRay => write!(f, "Two-Ray"),
            ModelKind::Abg => write!(f, "ABG"),
            ModelKind::CloseIn => write!(f, "CI"),
            ModelKind::OkumuraHataUrban => write!(f, "OH Urban"),
            ModelKind::OkumuraHataSuburban => write!(f, "OH Suburban"),
            ModelKind::OkumuraHataRural => write!(f, "OH Rural"),
        }
    }
}

/// A configured propagation model. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropagationModel {
    FreeSpace(FreeSpace),
    TwoRay(TwoRay),
    Abg(Abg),
    CloseIn(CloseIn),
    OkumuraHata(Environment, OkumuraHata),
}

impl PropagationModel {
    pub fn kind(&self) -> ModelKind {
        match self {
            PropagationModel::FreeSpace(_) => ModelKind::FreeSpace,
            PropagationModel::TwoRay(_) => ModelKind::TwoRay,
            PropagationModel::Abg(_) => ModelKind::Abg,
            PropagationModel::CloseIn(_) => ModelKind::CloseIn,
            PropagationModel::OkumuraHata(Environment::Urban, _) => ModelKind::OkumuraHataUrban,
            PropagationModel::OkumuraHata(Environment::Suburban, _) => {
                ModelKind::OkumuraHataSuburban
            }
            PropagationModel::OkumuraHata(Environment::Rural, _) => ModelKind::OkumuraHataRural,
        }
    }

    /// Standard deviation of the shadowing term, for stochastic variants.
    pub fn sigma(&self) -> Option<f64> {
        match self {
            PropagationModel::Abg(m) => Some(m.sigma()),
            PropagationModel::CloseIn(m) => Some(m.sigma()),
            _ => None,
        }
    }

    /// Deterministic part of the path loss, without any shadowing.
    pub fn median_path_loss(&self, dist_m: f64) -> Result<f64> {
        match self {
            PropagationModel::FreeSpace(m) => m.path_loss(dist_m),
            PropagationModel::TwoRay(m) => m.path_loss(dist_m),
            PropagationModel::Abg(m) => m.median_path_loss(dist_m),
            PropagationModel::CloseIn(m) => m.median_path_loss(dist_m),
            PropagationModel::OkumuraHata(env, m) => m.path_loss(*env, dist_m),
        }
    }

    /// Path loss in dB at one distance. Stochastic variants take one draw
    /// from `shadowing`.
    pub fn path_loss<R: Rng>(&self, dist_m: f64, shadowing: &mut Shadowing<R>) -> Result<f64> {
        let median = self.median_path_loss(dist_m)?;
        match self.sigma() {
            Some(sigma) => Ok(median + shadowing.draw(sigma)?),
            None => Ok(median),
        }
    }

    /// Path loss over a sequence of distances. Stochastic variants start a
    /// new coherence block at the first distance.
    pub fn path_loss_over_range<R: Rng>(
        &self,
        distances: &[f64],
        shadowing: &mut Shadowing<R>,
    ) -> Result<Vec<f64>> {
        shadowing.start_block();
        distances
            .iter()
            .map(|&d| self.path_loss(d, shadowing))
            .collect()
    }

    /// Path gain, the negated path loss.
    pub fn path_gain<R: Rng>(&self, dist_m: f64, shadowing: &mut Shadowing<R>) -> Result<f64> {
        Ok(-self.path_loss(dist_m, shadowing)?)
    }

    pub fn path_gain_over_range<R: Rng>(
        &self,
        distances: &[f64],
        shadowing: &mut Shadowing<R>,
    ) -> Result<Vec<f64>> {
        Ok(self
            .path_loss_over_range(distances, shadowing)?
            .into_iter()
            .map(|pl| -pl)
            .collect())
    }
}

/// Transmit and receive antenna gains in dBi.
///
/// Gains are not part of any model; they are an offset subtracted from path
/// loss when curves are compared against measurements.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Gains {
    pub tx: f64,
    pub rx: f64,
}

impl Gains {
    pub fn new(tx: f64, rx: f64) -> Self {
        Self { tx, rx }
    }

    pub fn apply(&self, path_loss: f64) -> f64 {
        path_loss - self.tx - self.rx
    }
}

/// Rejects distances for which the log-domain formulas are undefined.
pub(crate) fn check_distance(dist_m: f64) -> Result<()> {
    if dist_m > 0.0 && dist_m.is_finite() {
        Ok(())
    } else {
        Err(WalkError::Domain(format!("distance must be > 0 m, got {dist_m}")))
    }
}

pub(crate) fn check_positive(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(WalkError::Domain(format!("{name} must be > 0, got {value}")))
    }
}
