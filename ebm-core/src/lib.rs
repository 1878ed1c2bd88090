//! Core of a seasonal energy balance climate model
//!
//! Orbital elements feed the insolation engine, insolation and albedo give the
//! seasonal forcing, and the forcing together with per-cell physical parameters forms
//! the [`physical_model::PhysicalModel`]. A [`discretization::Discretization`] factorizes
//! the implicit operator of a [`mesh::Mesh`] once and then advances the annual cycle
//! with triangular solves.

pub mod discretization;
pub mod forcing;
pub mod geography;
pub mod insolation;
pub mod mesh;
pub mod orbital;
pub mod parameters;
pub mod physical_model;
pub mod utils;

pub mod errors;

pub use discretization::Discretization;
pub use errors::{EBMError, EBMResult};
pub use mesh::{LatLonGrid, Mesh};
pub use physical_model::PhysicalModel;
