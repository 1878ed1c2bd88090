//! Multi-year runs of a discretized model
//!
//! A [`Simulation`] advances whole years of the annual cycle, applies scheduled CO2
//! changes between years and records the area-weighted global annual mean
//! temperature of every completed year.

use crate::config::{validate_scenario, Co2Change, SimulationConfig};
use crate::errors::SimulationResult;
use ebm_core::geography::{Geography, SurfaceType};
use ebm_core::mesh::{LatLonGrid, Mesh};
use ebm_core::{Discretization, PhysicalModel};
use log::{info, warn};
use ndarray::Array2;

/// Diagnostics of one completed year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearSummary {
    pub year: usize,
    pub co2_ppm: f64,
    /// Area-weighted global annual mean temperature (°C)
    pub global_mean_temperature: f64,
}

/// Outcome of a spin-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinUp {
    pub years: usize,
    /// Change in global annual mean temperature over the last year run (K)
    pub change: f64,
    pub converged: bool,
}

#[derive(Debug, Clone)]
pub struct Simulation<M: Mesh> {
    discretization: Discretization<M>,
    scenario: Vec<Co2Change>,
    history: Vec<YearSummary>,
}

impl Simulation<LatLonGrid> {
    /// Build a simulation on the configured lat-lon grid.
    ///
    /// `geography` and `albedo` must have the `[nx, ny]` extents of `config.grid`.
    pub fn from_config(
        config: &SimulationConfig,
        geography: &Geography,
        albedo: Array2<f64>,
    ) -> SimulationResult<Self> {
        let mesh = LatLonGrid::new(config.grid.nx, config.grid.ny)?;
        let model = PhysicalModel::new(geography, albedo, &config.model)?;
        let discretization = Discretization::new(mesh, model, config.steps_per_year)?;
        Self::new(discretization).with_co2_scenario(config.co2_scenario.clone())
    }

    /// Build a simulation of a land-covered planet with the configured uniform albedo.
    pub fn uniform_from_config(config: &SimulationConfig) -> SimulationResult<Self> {
        let shape = (config.grid.nx, config.grid.ny);
        Self::from_config(
            config,
            &Geography::uniform(shape.0, shape.1, SurfaceType::Land),
            Array2::from_elem(shape, config.albedo),
        )
    }
}

impl<M: Mesh> Simulation<M> {
    pub fn new(discretization: Discretization<M>) -> Self {
        Self {
            discretization,
            scenario: vec![],
            history: vec![],
        }
    }

    /// Schedule CO2 changes, replacing any previous schedule.
    pub fn with_co2_scenario(mut self, scenario: Vec<Co2Change>) -> SimulationResult<Self> {
        validate_scenario(&scenario)?;
        self.scenario = scenario;
        Ok(self)
    }

    /// Number of years completed so far.
    pub fn years_completed(&self) -> usize {
        self.history.len()
    }

    pub fn history(&self) -> &[YearSummary] {
        &self.history
    }

    pub fn discretization(&self) -> &Discretization<M> {
        &self.discretization
    }

    /// Change the CO2 concentration before the next year.
    pub fn set_co2_concentration(&mut self, co2_ppm: f64) -> SimulationResult<()> {
        self.discretization.set_co2_concentration(co2_ppm)?;
        Ok(())
    }

    /// Area-weighted global mean of the annual mean temperature field.
    pub fn global_mean_temperature(&self) -> f64 {
        let annual_mean = self.discretization.annual_mean_field();
        self.discretization
            .mesh()
            .aggregate_global(annual_mean.view())
    }

    /// Run one year and return its global annual mean temperature.
    pub fn run_year(&mut self) -> SimulationResult<f64> {
        let year = self.years_completed();
        if let Some(change) = self.scenario.iter().find(|c| c.year == year) {
            info!("Year {}: CO2 set to {} ppm", year, change.co2_ppm);
            self.discretization.set_co2_concentration(change.co2_ppm)?;
        }

        self.discretization.run_year()?;

        let global_mean_temperature = self.global_mean_temperature();
        if !global_mean_temperature.is_finite() {
            warn!(
                "Year {}: global mean temperature is not finite ({})",
                year, global_mean_temperature
            );
        }
        match self.history.last() {
            Some(last) => info!(
                "Year {}: global mean temperature {:.4} °C (change {:+.2e} K)",
                year,
                global_mean_temperature,
                global_mean_temperature - last.global_mean_temperature
            ),
            None => info!(
                "Year {}: global mean temperature {:.4} °C",
                year, global_mean_temperature
            ),
        }

        self.history.push(YearSummary {
            year,
            co2_ppm: self.discretization.model().co2_concentration(),
            global_mean_temperature,
        });
        Ok(global_mean_temperature)
    }

    pub fn run_years(&mut self, years: usize) -> SimulationResult<()> {
        for _ in 0..years {
            self.run_year()?;
        }
        Ok(())
    }

    /// Run until the global annual mean changes by less than `tolerance` between
    /// consecutive years, or until `max_years` have been run.
    ///
    /// The first year run only provides a baseline, so at least two years are needed
    /// to detect convergence.
    pub fn run_to_equilibrium(
        &mut self,
        tolerance: f64,
        max_years: usize,
    ) -> SimulationResult<SpinUp> {
        let mut previous = self.history.last().map(|s| s.global_mean_temperature);
        let mut change = f64::INFINITY;

        for years in 1..=max_years {
            let current = self.run_year()?;
            if let Some(previous) = previous {
                change = (current - previous).abs();
                if change < tolerance {
                    info!(
                        "Converged after {} years (change {:.2e} K)",
                        years, change
                    );
                    return Ok(SpinUp {
                        years,
                        change,
                        converged: true,
                    });
                }
            }
            previous = Some(current);
        }

        warn!(
            "No equilibrium after {} years (last change {:.2e} K)",
            max_years, change
        );
        Ok(SpinUp {
            years: max_years,
            change,
            converged: false,
        })
    }

    /// Spin up with the limits of a configuration.
    pub fn spin_up(&mut self, config: &SimulationConfig) -> SimulationResult<SpinUp> {
        self.run_to_equilibrium(config.spin_up.tolerance, config.spin_up.max_years)
    }
}
