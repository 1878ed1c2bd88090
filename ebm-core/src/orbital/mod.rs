//! Orbital elements of the Earth for an arbitrary calendar year
//!
//! Eccentricity, obliquity and longitude of perihelion are reconstructed from the
//! truncated trigonometric expansions of Berger (1978). The series are tabulated
//! constants so that the forcing of a given epoch is reproducible bit-for-bit.
//!
//! With $t$ the number of years since 1950 AD:
//!
//! $$e \sin\varpi = \sum_i M_i \sin(g_i t + \beta_i), \quad
//!   e \cos\varpi = \sum_i M_i \cos(g_i t + \beta_i)$$
//!
//! $$\varepsilon = \varepsilon^* + \sum_i A_i \cos(f_i t + \delta_i)$$
//!
//! $$\tilde\omega = \varpi + \tilde\psi t + \zeta + \sum_i F_i \sin(f'_i t + \delta'_i)$$

mod series;

use serde::{Deserialize, Serialize};
use series::{
    HarmonicTerm, ECCENTRICITY_TERMS, EPSILON_STAR, OBLIQUITY_TERMS, PRECESSION_TERMS, PSI_BAR,
    ZETA,
};
use std::f64::consts::TAU;

/// Reference epoch of the series.
pub const REFERENCE_YEAR: i64 = 1950;

/// Eccentricity, obliquity and longitude of perihelion for one year.
///
/// Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    pub eccentricity: f64,
    pub obliquity: f64,
    pub perihelion: f64,
}

impl OrbitalElements {
    /// Evaluate all three elements for a calendar year.
    pub fn for_year(year: i64) -> Self {
        Self {
            eccentricity: eccentricity(year),
            obliquity: obliquity(year),
            perihelion: perihelion(year),
        }
    }
}

fn years_since_epoch(year: i64) -> f64 {
    (year - REFERENCE_YEAR) as f64
}

/// Components `(e sin(pi), e cos(pi))` of the eccentricity vector.
fn eccentricity_vector(year: i64) -> (f64, f64) {
    let t = years_since_epoch(year);
    ECCENTRICITY_TERMS
        .iter()
        .fold((0.0, 0.0), |(esin, ecos), term: &HarmonicTerm| {
            let arg = term.argument(t);
            (
                esin + term.amplitude * arg.sin(),
                ecos + term.amplitude * arg.cos(),
            )
        })
}

/// Orbital eccentricity (dimensionless).
pub fn eccentricity(year: i64) -> f64 {
    let (esin, ecos) = eccentricity_vector(year);
    esin.hypot(ecos)
}

/// Obliquity of the ecliptic (radians).
pub fn obliquity(year: i64) -> f64 {
    let t = years_since_epoch(year);
    let correction: f64 = OBLIQUITY_TERMS
        .iter()
        .map(|term| term.amplitude / 3600.0 * term.argument(t).cos())
        .sum();
    (EPSILON_STAR + correction).to_radians()
}

/// Longitude of perihelion relative to the moving vernal equinox (radians, in `[0, 2pi)`).
pub fn perihelion(year: i64) -> f64 {
    let t = years_since_epoch(year);
    let (esin, ecos) = eccentricity_vector(year);
    let fixed_perihelion = esin.atan2(ecos);

    let precession_terms: f64 = PRECESSION_TERMS
        .iter()
        .map(|term| term.amplitude / 3600.0 * term.argument(t).sin())
        .sum();
    let general_precession = (PSI_BAR / 3600.0 * t + ZETA + precession_terms).to_radians();

    (fixed_perihelion + general_precession).rem_euclid(TAU)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_lengths() {
        assert_eq!(ECCENTRICITY_TERMS.len(), 19);
        assert_eq!(OBLIQUITY_TERMS.len(), 47);
        assert_eq!(PRECESSION_TERMS.len(), 78);
    }

    #[test]
    fn test_reference_epoch() {
        let elements = OrbitalElements::for_year(1950);

        assert!(
            (elements.eccentricity - 0.016740).abs() < 5e-5,
            "eccentricity = {}",
            elements.eccentricity
        );
        assert!(
            (elements.obliquity - 0.409253).abs() < 1e-4,
            "obliquity = {}",
            elements.obliquity
        );
        assert!(
            (elements.perihelion - 1.783037).abs() < 5e-3,
            "perihelion = {}",
            elements.perihelion
        );
    }

    #[test]
    fn test_eccentricity_bounded() {
        for year in (-1_000_000..1_000_000).step_by(9_973) {
            let e = eccentricity(year);
            assert!((0.0..1.0).contains(&e), "e({}) = {}", year, e);
        }
    }

    #[test]
    fn test_perihelion_reduced() {
        for year in [-250_000, -21_000, 0, 1950, 2100, 50_000] {
            let p = perihelion(year);
            assert!((0.0..TAU).contains(&p), "perihelion({}) = {}", year, p);
        }
    }

    #[test]
    fn test_obliquity_range() {
        // Obliquity stays within roughly 22-24.5 degrees over the last million years
        for year in (-1_000_000..0).step_by(25_013) {
            let eps = obliquity(year).to_degrees();
            assert!(eps > 21.5 && eps < 25.0, "obliquity({}) = {}", year, eps);
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(OrbitalElements::for_year(-12_345), OrbitalElements::for_year(-12_345));
    }
}
