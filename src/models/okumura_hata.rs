//! Okumura-Hata macrocell models.
//!
//! The urban formula is the base; suburban and rural variants subtract an
//! additive, frequency-only correction from it. Distance is in metres and is
//! converted to kilometres inside the formula.

use super::{check_distance, check_positive};
use crate::error::Result;

/// Base-station height coefficient of the urban formula.
pub const BS_HEIGHT_COEFFICIENT: f64 = 13.85;

/// Frequency below which the large-city mobile antenna correction uses its
/// low-band form.
pub const LARGE_CITY_LOW_BAND_MHZ: f64 = 300.0;

/// Okumura-Hata propagation environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Urban,
    Suburban,
    Rural,
}

/// Shared Okumura-Hata parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OkumuraHata {
    freq_mhz: f64,
    bs_height: f64,
    ue_height: f64,
    large_city: bool,
}

impl OkumuraHata {
    pub fn new(freq_mhz: f64, bs_height: f64, ue_height: f64, large_city: bool) -> Result<Self> {
        check_positive("frequency", freq_mhz)?;
        check_positive("base station height", bs_height)?;
        check_positive("mobile antenna height", ue_height)?;
        Ok(Self {
            freq_mhz,
            bs_height,
            ue_height,
            large_city,
        })
    }

    pub fn large_city(&self) -> bool {
        self.large_city
    }

    /// Path loss in dB for the given environment.
    pub fn path_loss(&self, environment: Environment, dist_m: f64) -> Result<f64> {
        let urban = self.urban(dist_m)?;
        let lf = self.freq_mhz.log10();

        Ok(match environment {
            Environment::Urban => urban,
            Environment::Suburban => urban - 2.0 * (self.freq_mhz / 28.0).log10().powi(2) - 5.4,
            Environment::Rural => urban - 4.78 * lf.powi(2) + 18.33 * lf - 40.94,
        })
    }

    fn urban(&self, dist_m: f64) -> Result<f64> {
        check_distance(dist_m)?;
        let f = self.freq_mhz;
        let hb = self.bs_height;

        Ok(69.55
            + 26.26 * f.log10()
            + (44.9 - 6.55 * hb.log10()) * (dist_m / 1000.0).log10()
            - BS_HEIGHT_COEFFICIENT * hb.log10()
            - antenna_correction(self.ue_height, f, self.large_city))
    }
}

/// Mobile antenna height correction factor `a(h_m)` in dB.
pub fn antenna_correction(ue_height: f64, freq_mhz: f64, large_city: bool) -> f64 {
    if large_city {
        if freq_mhz < LARGE_CITY_LOW_BAND_MHZ {
            8.29 * (1.54 * ue_height).log10().powi(2) - 1.1
        } else {
            3.2 * (11.75 * ue_height).log10().powi(2) - 4.97
        }
    } else {
        let lf = freq_mhz.log10();
        (1.1 * lf - 0.7) * ue_height - (1.56 * lf - 0.8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalkError;
    use approx::assert_abs_diff_eq;

    fn urban_reference(d: f64, f: f64, hb: f64, hm: f64, large_city: bool) -> f64 {
        69.55 + 26.26 * f.log10() + (44.9 - 6.55 * hb.log10()) * (d / 1000.0).log10()
            - 13.85 * hb.log10()
            - antenna_correction(hm, f, large_city)
    }

    #[test]
    fn test_urban_small_city_known_value() {
        // 900 MHz, 30 m BS, 1.5 m mobile, 1 km.
        let model = OkumuraHata::new(900.0, 30.0, 1.5, false).unwrap();
        let pl = model.path_loss(Environment::Urban, 1000.0).unwrap();
        assert_abs_diff_eq!(pl, urban_reference(1000.0, 900.0, 30.0, 1.5, false), epsilon = 1e-12);
        assert_abs_diff_eq!(pl, 126.6544, epsilon = 1e-4);
    }

    #[test]
    fn test_large_city_correction_branches_on_frequency() {
        let low = antenna_correction(1.5, 150.0, true);
        let high = antenna_correction(1.5, 900.0, true);
        assert_abs_diff_eq!(low, 8.29 * (1.54f64 * 1.5).log10().powi(2) - 1.1, epsilon = 1e-12);
        assert_abs_diff_eq!(high, 3.2 * (11.75f64 * 1.5).log10().powi(2) - 4.97, epsilon = 1e-12);
        // The 300 MHz boundary belongs to the high band.
        assert_eq!(
            antenna_correction(1.5, 300.0, true),
            3.2 * (11.75f64 * 1.5).log10().powi(2) - 4.97
        );
    }

    #[test]
    fn test_suburban_is_additive_to_urban() {
        let model = OkumuraHata::new(1800.0, 40.0, 1.5, true).unwrap();
        for d in [250.0, 1000.0, 4200.0] {
            let urban = model.path_loss(Environment::Urban, d).unwrap();
            let suburban = model.path_loss(Environment::Suburban, d).unwrap();
            let expected = urban - 2.0 * (1800.0f64 / 28.0).log10().powi(2) - 5.4;
            assert_abs_diff_eq!(suburban, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rural_is_additive_to_urban() {
        let model = OkumuraHata::new(450.0, 25.0, 2.0, false).unwrap();
        for d in [250.0, 1000.0, 4200.0] {
            let urban = model.path_loss(Environment::Urban, d).unwrap();
            let rural = model.path_loss(Environment::Rural, d).unwrap();
            let lf = 450.0f64.log10();
            let expected = urban - 4.78 * lf * lf + 18.33 * lf - 40.94;
            assert_abs_diff_eq!(rural, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_non_positive_heights_rejected() {
        assert!(matches!(OkumuraHata::new(900.0, 0.0, 1.5, true), Err(WalkError::Domain(_))));
        assert!(matches!(OkumuraHata::new(900.0, 30.0, -1.0, true), Err(WalkError::Domain(_))));
        assert!(matches!(OkumuraHata::new(0.0, 30.0, 1.5, true), Err(WalkError::Domain(_))));
    }

    #[test]
    fn test_non_positive_distance_rejected() {
        let model = OkumuraHata::new(900.0, 30.0, 1.5, true).unwrap();
        for env in [Environment::Urban, Environment::Suburban, Environment::Rural] {
            assert!(matches!(model.path_loss(env, 0.0), Err(WalkError::Domain(_))));
            assert!(matches!(model.path_loss(env, -10.0), Err(WalkError::Domain(_))));
        }
    }
}
