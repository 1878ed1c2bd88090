//! Surface classification of the model grid
//!
//! The geography table assigns each `(longitude, latitude)` cell one of eight integer
//! codes. Codes outside `1..=8` are rejected when the table is read rather than
//! silently mapped to a zero heat capacity.

use crate::errors::{EBMError, EBMResult};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Surface type of a grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceType {
    Land = 1,
    PerennialSeaIce = 2,
    PermanentSnow = 3,
    /// Inland lake or sea; a third of the ocean mixed layer heat capacity.
    InlandWater = 4,
    PacificOcean = 5,
    AtlanticOcean = 6,
    IndianOcean = 7,
    /// Enclosed sea with an ocean mixed layer but land-like lateral diffusion.
    MediterraneanSea = 8,
}

impl SurfaceType {
    /// Classification code as stored in geography tables.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Whether the cell carries an ocean mixed layer heat capacity.
    pub fn is_ocean_basin(self) -> bool {
        matches!(
            self,
            SurfaceType::PacificOcean
                | SurfaceType::AtlanticOcean
                | SurfaceType::IndianOcean
                | SurfaceType::MediterraneanSea
        )
    }

    /// Whether the cell uses the oceanic diffusion law.
    pub fn diffuses_as_ocean(self) -> bool {
        matches!(
            self,
            SurfaceType::PacificOcean | SurfaceType::AtlanticOcean | SurfaceType::IndianOcean
        )
    }
}

impl TryFrom<i32> for SurfaceType {
    type Error = i32;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(SurfaceType::Land),
            2 => Ok(SurfaceType::PerennialSeaIce),
            3 => Ok(SurfaceType::PermanentSnow),
            4 => Ok(SurfaceType::InlandWater),
            5 => Ok(SurfaceType::PacificOcean),
            6 => Ok(SurfaceType::AtlanticOcean),
            7 => Ok(SurfaceType::IndianOcean),
            8 => Ok(SurfaceType::MediterraneanSea),
            other => Err(other),
        }
    }
}

/// Surface classification for every cell of an `[nx, ny]` grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Geography {
    cells: Array2<SurfaceType>,
}

impl Geography {
    /// Build from an integer classification table indexed `[longitude, latitude]`.
    pub fn from_codes(codes: ArrayView2<i32>) -> EBMResult<Self> {
        let mut cells = Array2::from_elem(codes.dim(), SurfaceType::Land);
        for ((i, j), &code) in codes.indexed_iter() {
            cells[[i, j]] = SurfaceType::try_from(code)
                .map_err(|code| EBMError::UnknownSurfaceType { code, i, j })?;
        }
        Ok(Self { cells })
    }

    /// A grid covered entirely by a single surface type.
    pub fn uniform(nx: usize, ny: usize, surface: SurfaceType) -> Self {
        Self {
            cells: Array2::from_elem((nx, ny), surface),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.cells.dim()
    }

    pub fn get(&self, i: usize, j: usize) -> SurfaceType {
        self.cells[[i, j]]
    }

    pub fn cells(&self) -> ArrayView2<SurfaceType> {
        self.cells.view()
    }
}
