//! Free-space anchored and log-distance path-loss models.
//!
//! All formulas take distance in metres and frequency in MHz and return dB.

use super::{check_distance, check_positive};
use crate::error::Result;

/// Constant term of the free-space formula for metres and MHz.
pub const FREE_SPACE_CONSTANT_DB: f64 = 27.55;

/// ABG reference frequency scaling constant.
///
/// Frequencies are in MHz everywhere else, but the ABG frequency term divides
/// by this Hz-scaled constant. Kept as-is so results stay comparable with
/// existing ABG fits.
pub const ABG_DEFAULT_REF_FREQ: f64 = 1_000_000_000.0;

/// Free-space path loss: `20 log10(d) + 20 log10(f) - 27.55`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeSpace {
    freq_mhz: f64,
}

impl FreeSpace {
    pub fn new(freq_mhz: f64) -> Result<Self> {
        check_positive("frequency", freq_mhz)?;
        Ok(Self { freq_mhz })
    }

    pub fn freq_mhz(&self) -> f64 {
        self.freq_mhz
    }

    pub fn path_loss(&self, dist_m: f64) -> Result<f64> {
        check_distance(dist_m)?;
        Ok(free_space(dist_m, self.freq_mhz))
    }
}

/// Unchecked free-space formula; inputs are validated by the callers.
fn free_space(dist_m: f64, freq_mhz: f64) -> f64 {
    20.0 * dist_m.log10() + 20.0 * freq_mhz.log10() - FREE_SPACE_CONSTANT_DB
}

/// Two-Ray slope model anchored at free space at the reference distance:
/// `FS(d0) + 10 n log10(d / d0)`, with `n` typically between 2 and 8.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoRay {
    freq_mhz: f64,
    pl_exp: f64,
    ref_dist: f64,
}

impl TwoRay {
    pub fn new(freq_mhz: f64, pl_exp: f64, ref_dist: f64) -> Result<Self> {
        check_positive("frequency", freq_mhz)?;
        check_positive("reference distance", ref_dist)?;
        Ok(Self {
            freq_mhz,
            pl_exp,
            ref_dist,
        })
    }

    pub fn path_loss(&self, dist_m: f64) -> Result<f64> {
        check_distance(dist_m)?;
        Ok(free_space(self.ref_dist, self.freq_mhz)
            + 10.0 * self.pl_exp * (dist_m / self.ref_dist).log10())
    }
}

/// Close-In (CI) reference-distance model. Same slope form as [`TwoRay`]
/// plus a zero-mean Gaussian shadowing term with standard deviation `sigma`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CloseIn {
    freq_mhz: f64,
    pl_exp: f64,
    sigma: f64,
    ref_dist: f64,
}

impl CloseIn {
    pub fn new(freq_mhz: f64, pl_exp: f64, sigma: f64, ref_dist: f64) -> Result<Self> {
        check_positive("frequency", freq_mhz)?;
        check_positive("reference distance", ref_dist)?;
        super::shadowing::validate_sigma(sigma)?;
        Ok(Self {
            freq_mhz,
            pl_exp,
            sigma,
            ref_dist,
        })
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Path loss without the shadowing term.
    pub fn median_path_loss(&self, dist_m: f64) -> Result<f64> {
        check_distance(dist_m)?;
        Ok(free_space(self.ref_dist, self.freq_mhz)
            + 10.0 * self.pl_exp * (dist_m / self.ref_dist).log10())
    }
}

/// Alpha-Beta-Gamma model:
/// `10 a log10(d / d0) + b + 10 g log10(f / f0) + N(0, sigma)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Abg {
    freq_mhz: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
    sigma: f64,
    ref_dist: f64,
    ref_freq: f64,
}

impl Abg {
    /// Builds an ABG model with a 1 m reference distance and the default
    /// reference frequency constant.
    pub fn new(freq_mhz: f64, alpha: f64, beta: f64, gamma: f64, sigma: f64) -> Result<Self> {
        check_positive("frequency", freq_mhz)?;
        super::shadowing::validate_sigma(sigma)?;
        Ok(Self {
            freq_mhz,
            alpha,
            beta,
            gamma,
            sigma,
            ref_dist: 1.0,
            ref_freq: ABG_DEFAULT_REF_FREQ,
        })
    }

    /// Replaces the reference distance and reference frequency constant.
    pub fn with_reference(mut self, ref_dist: f64, ref_freq: f64) -> Result<Self> {
        check_positive("reference distance", ref_dist)?;
        check_positive("reference frequency", ref_freq)?;
        self.ref_dist = ref_dist;
        self.ref_freq = ref_freq;
        Ok(self)
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Path loss without the shadowing term.
    pub fn median_path_loss(&self, dist_m: f64) -> Result<f64> {
        check_distance(dist_m)?;
        Ok(10.0 * self.alpha * (dist_m / self.ref_dist).log10()
            + self.beta
            + 10.0 * self.gamma * (self.freq_mhz / self.ref_freq).log10())
    }
}
