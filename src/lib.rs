//! Driver for the seasonal energy balance model
//!
//! Wires a [`ebm_core::LatLonGrid`], a [`ebm_core::PhysicalModel`] and a
//! [`ebm_core::Discretization`] together from a TOML configuration and runs them
//! year after year.

pub mod config;
pub mod errors;
pub mod simulation;

pub use config::{Co2Change, SimulationConfig};
pub use errors::{SimulationError, SimulationResult};
pub use simulation::{Simulation, SpinUp, YearSummary};

pub use ebm_core;
