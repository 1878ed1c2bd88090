//! Simulation configuration
//!
//! Every field has a default, so a configuration file only needs to name what it
//! changes:
//!
//! ```toml
//! steps_per_year = 48
//!
//! [grid]
//! nx = 64
//! ny = 33
//!
//! [model]
//! co2_ppm = 280.0
//!
//! [[co2_scenario]]
//! year = 10
//! co2_ppm = 560.0
//! ```

use crate::errors::{SimulationError, SimulationResult};
use ebm_core::parameters::ModelParameters;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extents of the longitude-latitude grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of longitudes.
    /// Default: 128
    pub nx: usize,
    /// Number of latitude rows, poles included.
    /// Default: 65
    pub ny: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { nx: 128, ny: 65 }
    }
}

/// Limits of the spin-up to a periodic annual cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinUpConfig {
    /// Largest number of years to run.
    /// Default: 200
    pub max_years: usize,
    /// Change in global annual mean temperature between consecutive years below which
    /// the cycle is considered periodic (K).
    /// Default: 1e-4
    pub tolerance: f64,
}

impl Default for SpinUpConfig {
    fn default() -> Self {
        Self {
            max_years: 200,
            tolerance: 1e-4,
        }
    }
}

/// CO2 concentration taking effect at the start of a simulated year.
///
/// Years count from zero, the first year run by a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Co2Change {
    pub year: usize,
    pub co2_ppm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of implicit steps in each simulated year.
    /// Default: 48
    pub steps_per_year: usize,

    /// Albedo of every cell when no albedo table is supplied.
    /// Default: 0.3
    pub albedo: f64,

    pub grid: GridConfig,

    pub model: ModelParameters,

    pub spin_up: SpinUpConfig,

    /// CO2 changes applied between years.
    pub co2_scenario: Vec<Co2Change>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps_per_year: 48,
            albedo: 0.3,
            grid: GridConfig::default(),
            model: ModelParameters::default(),
            spin_up: SpinUpConfig::default(),
            co2_scenario: vec![],
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(contents: &str) -> SimulationResult<Self> {
        let config: Self = toml::from_str(contents)?;
        validate_scenario(&config.co2_scenario)?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> SimulationResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SimulationError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }
}

/// Reject non-positive concentrations and years with more than one change.
pub fn validate_scenario(scenario: &[Co2Change]) -> SimulationResult<()> {
    for (index, change) in scenario.iter().enumerate() {
        if !(change.co2_ppm.is_finite() && change.co2_ppm > 0.0) {
            return Err(SimulationError::InvalidScenario(format!(
                "CO2 concentration for year {} must be positive, got {}",
                change.year, change.co2_ppm
            )));
        }
        if scenario[..index].iter().any(|c| c.year == change.year) {
            return Err(SimulationError::InvalidScenario(format!(
                "more than one CO2 change for year {}",
                change.year
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.grid.nx, 128);
        assert_eq!(config.grid.ny, 65);
        assert_eq!(config.model.co2_ppm, 315.0);
    }

    #[test]
    fn test_partial_override() {
        let config = SimulationConfig::from_toml_str(
            r#"
            steps_per_year = 24

            [grid]
            ny = 33

            [model]
            co2_ppm = 280.0
            diffusion_ocean = 0.5

            [[co2_scenario]]
            year = 5
            co2_ppm = 560.0
            "#,
        )
        .unwrap();

        assert_eq!(config.steps_per_year, 24);
        assert_eq!(config.grid.nx, 128);
        assert_eq!(config.grid.ny, 33);
        assert_eq!(config.model.co2_ppm, 280.0);
        assert_eq!(config.model.diffusion_ocean, 0.5);
        assert_eq!(config.model.diffusion_land, 0.65);
        assert_eq!(
            config.co2_scenario,
            vec![Co2Change {
                year: 5,
                co2_ppm: 560.0
            }]
        );
    }

    #[test]
    fn test_serialise_round_trip() {
        let mut config = SimulationConfig::default();
        config.spin_up.max_years = 12;
        config.co2_scenario.push(Co2Change {
            year: 3,
            co2_ppm: 400.0,
        });

        let serialised = toml::to_string(&config).unwrap();
        let deserialised = SimulationConfig::from_toml_str(&serialised).unwrap();

        assert_eq!(deserialised, config);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            SimulationConfig::from_toml_str("steps_per_year = \"many\""),
            Err(SimulationError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_scenario() {
        let negative = r#"
            [[co2_scenario]]
            year = 1
            co2_ppm = -5.0
        "#;
        assert!(matches!(
            SimulationConfig::from_toml_str(negative),
            Err(SimulationError::InvalidScenario(_))
        ));

        let duplicate = vec![
            Co2Change {
                year: 2,
                co2_ppm: 400.0,
            },
            Co2Change {
                year: 2,
                co2_ppm: 500.0,
            },
        ];
        assert!(validate_scenario(&duplicate).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            SimulationConfig::from_file("/nonexistent/ebm.toml"),
            Err(SimulationError::Io { .. })
        ));
    }
}
