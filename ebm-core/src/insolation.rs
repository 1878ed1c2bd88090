//! Daily-mean insolation over the annual cycle
//!
//! # What This Module Does
//!
//! 1. Integrates the orbital longitude $\lambda$ of the Earth over one year with a
//!    fixed-step 4th-order Runge-Kutta scheme
//! 2. Computes the solar declination and the daily-mean insolation for every
//!    latitude band at every step of the year
//!
//! The angular rate follows from Kepler's second law:
//!
//! $$\frac{d\lambda}{dt} = \frac{2\pi}{(1-e^2)^{3/2}} (1 - e \cos\nu)^2, \quad \nu = \lambda - \tilde\omega$$
//!
//! with $t$ in years and $\lambda = 0$ at the vernal equinox.

use crate::errors::{EBMError, EBMResult};
use crate::orbital::OrbitalElements;
use ndarray::Array2;
use ode_solvers::{Rk4, System, Vector1};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Magnitude at which `tan(latitude)` is clamped at the poles.
pub const POLAR_TAN_LIMIT: f64 = 1000.0;

type OrbitState = Vector1<f64>;

/// Precomputed trigonometry of the latitude bands.
#[derive(Debug, Clone, PartialEq)]
pub struct LatitudeBands {
    sin: Vec<f64>,
    cos: Vec<f64>,
    tan: Vec<f64>,
}

impl LatitudeBands {
    /// Bands from latitudes in radians.
    pub fn from_latitudes(latitudes: &[f64]) -> Self {
        let tan = latitudes
            .iter()
            .map(|lat| {
                if (FRAC_PI_2 - lat.abs()).abs() < 1e-12 {
                    POLAR_TAN_LIMIT.copysign(*lat)
                } else {
                    lat.tan().clamp(-POLAR_TAN_LIMIT, POLAR_TAN_LIMIT)
                }
            })
            .collect();
        Self {
            sin: latitudes.iter().map(|lat| lat.sin()).collect(),
            cos: latitudes.iter().map(|lat| lat.cos()).collect(),
            tan,
        }
    }

    /// `nlat` equally spaced bands from the North Pole (row 0) to the South Pole.
    pub fn pole_to_pole(nlat: usize) -> Self {
        Self::from_latitudes(&pole_to_pole_latitudes(nlat))
    }

    pub fn len(&self) -> usize {
        self.sin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sin.is_empty()
    }
}

/// Latitudes (radians) of `nlat` rows spanning both poles, north first.
pub fn pole_to_pole_latitudes(nlat: usize) -> Vec<f64> {
    if nlat < 2 {
        return vec![0.0; nlat];
    }
    let spacing = PI / (nlat - 1) as f64;
    (0..nlat).map(|j| FRAC_PI_2 - j as f64 * spacing).collect()
}

/// Solar constant driving the insolation, optionally varying over the year.
#[derive(Debug, Clone, PartialEq)]
pub enum SolarConstant {
    Fixed(f64),
    /// One value per time step of the year.
    Series(Vec<f64>),
}

impl SolarConstant {
    fn at(&self, step: usize) -> f64 {
        match self {
            SolarConstant::Fixed(s0) => *s0,
            SolarConstant::Series(values) => values[step],
        }
    }
}

/// Angular rate of the orbital longitude.
struct KeplerOrbit {
    eccentricity: f64,
    perihelion: f64,
}

impl KeplerOrbit {
    fn rate(&self, longitude: f64) -> f64 {
        let e = self.eccentricity;
        let anomaly = longitude - self.perihelion;
        TAU / (1.0 - e * e).powf(1.5) * (1.0 - e * anomaly.cos()).powi(2)
    }
}

impl System<f64, OrbitState> for KeplerOrbit {
    fn system(&self, _t: f64, y: &OrbitState, dy: &mut OrbitState) {
        dy[0] = self.rate(y[0]);
    }
}

/// Insolation over one year.
#[derive(Debug, Clone, PartialEq)]
pub struct Insolation {
    /// Daily-mean insolation ($\text{W/m}^2$), shape `[nlat, nt]`.
    pub daily_mean: Array2<f64>,
    /// Orbital longitude at the start of each step plus the end of the year, `nt + 1` values.
    pub orbital_longitude: Vec<f64>,
}

/// Computes insolation for a fixed orbital configuration.
#[derive(Debug, Clone)]
pub struct InsolationEngine {
    orbit: OrbitalElements,
    ntimesteps: usize,
    solar_constant: SolarConstant,
}

impl InsolationEngine {
    pub fn new(
        orbit: OrbitalElements,
        ntimesteps: usize,
        solar_constant: SolarConstant,
    ) -> EBMResult<Self> {
        if !(0.0..1.0).contains(&orbit.eccentricity) {
            return Err(EBMError::UnphysicalEccentricity(orbit.eccentricity));
        }
        if ntimesteps == 0 {
            return Err(EBMError::InvalidConfiguration(
                "number of insolation time steps must be positive".to_string(),
            ));
        }
        if let SolarConstant::Series(values) = &solar_constant {
            if values.len() != ntimesteps {
                return Err(EBMError::ShapeMismatch {
                    field: "solar constant series".to_string(),
                    expected: format!("[{}]", ntimesteps),
                    found: format!("[{}]", values.len()),
                });
            }
        }
        Ok(Self {
            orbit,
            ntimesteps,
            solar_constant,
        })
    }

    /// Time step as a fraction of a year.
    pub fn dt(&self) -> f64 {
        1.0 / self.ntimesteps as f64
    }

    /// Integrate the orbital longitude over one year starting at the vernal equinox.
    ///
    /// Returns `ntimesteps + 1` values.
    pub fn orbital_longitude(&self) -> EBMResult<Vec<f64>> {
        let orbit = KeplerOrbit {
            eccentricity: self.orbit.eccentricity,
            perihelion: self.orbit.perihelion,
        };
        let dt = self.dt();
        let t_end = self.ntimesteps as f64 * dt;

        let mut stepper = Rk4::new(orbit, 0.0, OrbitState::new(0.0), t_end, dt);
        stepper
            .integrate()
            .map_err(|e| EBMError::Integration(format!("{:?}", e)))?;

        // Rounding in t_end / dt can add one trailing step; the first nt + 1 points are exact
        let (_, states) = stepper.results().get();
        let longitude: Vec<f64> = states
            .iter()
            .take(self.ntimesteps + 1)
            .map(|y| y[0])
            .collect();

        if longitude.len() != self.ntimesteps + 1 {
            return Err(EBMError::Integration(format!(
                "expected {} orbit points, got {}",
                self.ntimesteps + 1,
                longitude.len()
            )));
        }
        Ok(longitude)
    }

    /// Daily-mean insolation for every band and step of the year.
    pub fn compute(&self, bands: &LatitudeBands) -> EBMResult<Insolation> {
        let longitude = self.orbital_longitude()?;
        let e = self.orbit.eccentricity;
        let sin_obliquity = self.orbit.obliquity.sin();

        let mut daily_mean = Array2::zeros((bands.len(), self.ntimesteps));
        for t in 0..self.ntimesteps {
            let lambda = longitude[t];
            let anomaly = lambda - self.orbit.perihelion;
            let distance_factor = ((1.0 - e * anomaly.cos()) / (1.0 - e * e)).powi(2);
            let declination = (sin_obliquity * lambda.sin()).asin();
            let s0 = self.solar_constant.at(t);

            for j in 0..bands.len() {
                daily_mean[[j, t]] = daily_mean_insolation(
                    bands.sin[j],
                    bands.cos[j],
                    bands.tan[j],
                    declination,
                    distance_factor * s0,
                );
            }
        }

        Ok(Insolation {
            daily_mean,
            orbital_longitude: longitude,
        })
    }
}

/// Daily-mean insolation at one latitude.
///
/// `flux` is the solar constant already scaled by the Earth-Sun distance factor.
fn daily_mean_insolation(
    sin_lat: f64,
    cos_lat: f64,
    tan_lat: f64,
    declination: f64,
    flux: f64,
) -> f64 {
    let z = -tan_lat * declination.tan();
    if z >= 1.0 {
        // Polar night
        0.0
    } else if z <= -1.0 {
        // Polar day
        flux * sin_lat * declination.sin()
    } else {
        let hour_angle = z.acos();
        flux / PI
            * (hour_angle * sin_lat * declination.sin()
                + cos_lat * declination.cos() * hour_angle.sin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use is_close::is_close;

    fn reference_engine() -> InsolationEngine {
        InsolationEngine::new(
            OrbitalElements::for_year(1950),
            48,
            SolarConstant::Fixed(1371.685),
        )
        .unwrap()
    }

    #[test]
    fn test_orbit_closes_after_one_year() {
        let longitude = reference_engine().orbital_longitude().unwrap();

        assert_eq!(longitude.len(), 49);
        assert_eq!(longitude[0], 0.0);
        assert!(
            (longitude[48] - TAU).abs() < 1e-6,
            "longitude after one year = {}",
            longitude[48]
        );
    }

    #[test]
    fn test_circular_orbit_is_uniform() {
        let orbit = OrbitalElements {
            eccentricity: 0.0,
            obliquity: 0.4,
            perihelion: 1.0,
        };
        let engine = InsolationEngine::new(orbit, 12, SolarConstant::Fixed(1361.0)).unwrap();
        let longitude = engine.orbital_longitude().unwrap();

        for (t, lambda) in longitude.iter().enumerate() {
            assert!((lambda - TAU * t as f64 / 12.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_unphysical_eccentricity_rejected() {
        let orbit = OrbitalElements {
            eccentricity: 1.0,
            obliquity: 0.4,
            perihelion: 0.0,
        };
        assert_eq!(
            InsolationEngine::new(orbit, 48, SolarConstant::Fixed(1361.0)).unwrap_err(),
            EBMError::UnphysicalEccentricity(1.0)
        );
    }

    #[test]
    fn test_series_length_checked() {
        let result = InsolationEngine::new(
            OrbitalElements::for_year(1950),
            48,
            SolarConstant::Series(vec![1361.0; 12]),
        );
        assert!(matches!(result, Err(EBMError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_pole_tangent_clamped() {
        let bands = LatitudeBands::pole_to_pole(5);
        assert_eq!(bands.tan[0], POLAR_TAN_LIMIT);
        assert_eq!(bands.tan[4], -POLAR_TAN_LIMIT);
        assert!(bands.tan[2].abs() < 1e-12);
    }

    #[test]
    fn test_polar_night_is_zero() {
        // Northern winter: negative declination
        let declination = -0.4;
        let insolation = daily_mean_insolation(1.0, 0.0, POLAR_TAN_LIMIT, declination, 1361.0);
        assert_eq!(insolation, 0.0);
    }

    #[test]
    fn test_polar_day_branch() {
        let declination = 0.4;
        let insolation = daily_mean_insolation(1.0, 0.0, POLAR_TAN_LIMIT, declination, 1361.0);
        assert!(is_close!(insolation, 1361.0 * declination.sin()));
    }

    #[test]
    fn test_equinox_peaks_at_equator() {
        let bands = LatitudeBands::pole_to_pole(65);
        let insolation = reference_engine().compute(&bands).unwrap();

        // The year starts at the vernal equinox where the declination is zero
        let column = insolation.daily_mean.column(0);
        let equator = column[32];
        for (j, value) in column.iter().enumerate() {
            assert!(*value <= equator, "row {} exceeds equator: {} > {}", j, value, equator);
        }
    }

    #[test]
    fn test_northern_winter_polar_night() {
        let bands = LatitudeBands::pole_to_pole(65);
        let insolation = reference_engine().compute(&bands).unwrap();

        // Step closest to the December solstice (longitude 3pi/2)
        let t = (0..48)
            .min_by(|&a, &b| {
                let da = (insolation.orbital_longitude[a] - 1.5 * PI).abs();
                let db = (insolation.orbital_longitude[b] - 1.5 * PI).abs();
                da.total_cmp(&db)
            })
            .unwrap();

        assert_eq!(insolation.daily_mean[[0, t]], 0.0);
        assert!(insolation.daily_mean[[64, t]] > 500.0);
    }

    #[test]
    fn test_annual_global_mean() {
        let nlat = 65;
        let bands = LatitudeBands::pole_to_pole(nlat);
        let insolation = reference_engine().compute(&bands).unwrap();

        // Area weight of each band between its edges
        let latitudes = pole_to_pole_latitudes(nlat);
        let half = PI / (nlat - 1) as f64 / 2.0;
        let weights: Vec<f64> = latitudes
            .iter()
            .map(|lat| (lat + half).min(FRAC_PI_2).sin() - (lat - half).max(-FRAC_PI_2).sin())
            .collect();
        let total_weight: f64 = weights.iter().sum();

        let mean: f64 = insolation
            .daily_mean
            .outer_iter()
            .zip(weights.iter())
            .map(|(row, w)| w * row.mean().unwrap())
            .sum::<f64>()
            / total_weight;

        // S0 / 4
        assert!((mean - 1371.685 / 4.0).abs() < 1.0, "global mean = {}", mean);
    }

    #[test]
    fn test_solar_series_scales_insolation() {
        let bands = LatitudeBands::pole_to_pole(9);
        let orbit = OrbitalElements::for_year(1950);
        let fixed = InsolationEngine::new(orbit, 4, SolarConstant::Fixed(1000.0))
            .unwrap()
            .compute(&bands)
            .unwrap();
        let series = InsolationEngine::new(
            orbit,
            4,
            SolarConstant::Series(vec![1000.0, 2000.0, 1000.0, 1000.0]),
        )
        .unwrap()
        .compute(&bands)
        .unwrap();

        for j in 0..9 {
            assert!(is_close!(
                series.daily_mean[[j, 1]],
                2.0 * fixed.daily_mean[[j, 1]]
            ));
            assert_eq!(series.daily_mean[[j, 0]], fixed.daily_mean[[j, 0]]);
        }
    }
}
