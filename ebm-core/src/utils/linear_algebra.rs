//! Linear algebra utilities.
//!
//! Banded matrices and their LU factorization with partial pivoting. The implicit
//! operator of the model couples each cell only to its grid neighbours, so with a
//! suitable degree-of-freedom ordering its entries stay within a narrow band and the
//! factors inherit that band (widened by `kl` in the upper factor for row interchanges).

use crate::errors::{EBMError, EBMResult};
use nalgebra::{DMatrix, DVector};

/// Relative pivot magnitude below which the operator is treated as singular.
const SINGULARITY_TOLERANCE: f64 = 1e-13;

/// Square matrix with `kl` sub-diagonals and `ku` super-diagonals.
///
/// Entry `(r, c)` is stored at `data[(r, c + kl - r)]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BandMatrix {
    n: usize,
    kl: usize,
    ku: usize,
    data: DMatrix<f64>,
}

impl BandMatrix {
    pub fn zeros(n: usize, kl: usize, ku: usize) -> Self {
        Self {
            n,
            kl,
            ku,
            data: DMatrix::zeros(n, kl + ku + 1),
        }
    }

    pub fn size(&self) -> usize {
        self.n
    }

    /// `(lower, upper)` bandwidths.
    pub fn bandwidths(&self) -> (usize, usize) {
        (self.kl, self.ku)
    }

    fn in_band(&self, row: usize, col: usize) -> bool {
        row < self.n && col < self.n && col + self.kl >= row && col <= row + self.ku
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        if self.in_band(row, col) {
            self.data[(row, col + self.kl - row)]
        } else {
            0.0
        }
    }

    /// Add `value` to entry `(row, col)`.
    pub fn add(&mut self, row: usize, col: usize, value: f64) -> EBMResult<()> {
        if !self.in_band(row, col) {
            return Err(EBMError::OutsideBand {
                row,
                col,
                kl: self.kl,
                ku: self.ku,
            });
        }
        self.data[(row, col + self.kl - row)] += value;
        Ok(())
    }

    /// Matrix-vector product.
    pub fn mul_vec(&self, x: &DVector<f64>) -> DVector<f64> {
        DVector::from_fn(self.n, |row, _| {
            let first = row.saturating_sub(self.kl);
            let last = (row + self.ku).min(self.n - 1);
            (first..=last).map(|col| self.get(row, col) * x[col]).sum()
        })
    }

    /// Largest absolute entry.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0, |acc: f64, v| acc.max(v.abs()))
    }

    /// LU factorization with partial pivoting, `P A = L U`.
    ///
    /// Fails with [`EBMError::SingularOperator`] if a pivot is zero, non-finite or
    /// negligible relative to the largest entry of the matrix.
    pub fn factorize(&self) -> EBMResult<BandLu> {
        let n = self.n;
        let kl = self.kl;
        let ku = self.ku;
        let upper_width = kl + ku + 1;
        let scale = self.max_abs();

        // Column r of the work buffer holds row r over columns r - kl ..= r + kl + ku,
        // leaving room for fill from interchanges
        let at = |r: usize, c: usize| (c + kl - r, r);
        let mut work = DMatrix::zeros(kl + upper_width, n);
        for r in 0..n {
            let first = r.saturating_sub(kl);
            let last = (r + ku).min(n.saturating_sub(1));
            for c in first..=last {
                work[at(r, c)] = self.get(r, c);
            }
        }

        let mut low_mat = DMatrix::zeros(n, kl);
        let mut upp_mat = DMatrix::zeros(n, upper_width);
        let mut pivots = Vec::with_capacity(n);

        for k in 0..n {
            let last_row = (k + kl).min(n - 1);
            let last_col = (k + kl + ku).min(n - 1);

            let mut pivot_row = k;
            let mut pivot_abs = work[at(k, k)].abs();
            for r in k + 1..=last_row {
                let candidate = work[at(r, k)].abs();
                if candidate > pivot_abs {
                    pivot_row = r;
                    pivot_abs = candidate;
                }
            }
            if !(pivot_abs.is_finite() && pivot_abs > scale * SINGULARITY_TOLERANCE) {
                return Err(EBMError::SingularOperator {
                    row: k,
                    pivot: work[at(pivot_row, k)],
                });
            }
            pivots.push(pivot_row);

            if pivot_row != k {
                for c in k..=last_col {
                    let a = work[at(k, c)];
                    work[at(k, c)] = work[at(pivot_row, c)];
                    work[at(pivot_row, c)] = a;
                }
            }

            let pivot = work[at(k, k)];
            for r in k + 1..=last_row {
                let multiplier = work[at(r, k)] / pivot;
                low_mat[(k, r - k - 1)] = multiplier;
                work[at(r, k)] = 0.0;
                if multiplier != 0.0 {
                    for c in k + 1..=last_col {
                        work[at(r, c)] -= multiplier * work[at(k, c)];
                    }
                }
            }

            for c in k..=last_col {
                upp_mat[(k, c - k)] = work[at(k, c)];
            }
        }

        Ok(BandLu {
            n,
            kl,
            ku,
            low_mat,
            upp_mat,
            pivots,
        })
    }
}

/// Banded LU factors.
///
/// - `low_mat[(k, m)]`: multiplier eliminating row `k + 1 + m` with pivot row `k`
/// - `upp_mat[(k, m)]`: entry `(k, k + m)` of the upper factor
/// - `pivots[k]`: row interchanged with row `k` before elimination step `k`
#[derive(Debug, Clone, PartialEq)]
pub struct BandLu {
    n: usize,
    kl: usize,
    ku: usize,
    low_mat: DMatrix<f64>,
    upp_mat: DMatrix<f64>,
    pivots: Vec<usize>,
}

impl BandLu {
    pub fn size(&self) -> usize {
        self.n
    }

    pub fn low_mat(&self) -> &DMatrix<f64> {
        &self.low_mat
    }

    pub fn upp_mat(&self) -> &DMatrix<f64> {
        &self.upp_mat
    }

    pub fn pivots(&self) -> &[usize] {
        &self.pivots
    }

    /// Solve `A x = b` in place; `b` is replaced with the solution.
    ///
    /// # Panics
    ///
    /// Panics if `b` does not have the dimension of the factorized matrix.
    pub fn solve_in_place(&self, b: &mut DVector<f64>) {
        let n = self.n;
        assert_eq!(b.len(), n, "right-hand side must have length {}", n);
        let upper_reach = self.kl + self.ku;

        // Row interchanges and forward substitution through the unit lower factor
        for k in 0..n {
            let p = self.pivots[k];
            if p != k {
                b.as_mut_slice().swap(k, p);
            }
            let bk = b[k];
            for r in k + 1..=(k + self.kl).min(n - 1) {
                b[r] -= self.low_mat[(k, r - k - 1)] * bk;
            }
        }

        // Back substitution through the upper factor
        for k in (0..n).rev() {
            let mut sum = b[k];
            for c in k + 1..=(k + upper_reach).min(n - 1) {
                sum -= self.upp_mat[(k, c - k)] * b[c];
            }
            b[k] = sum / self.upp_mat[(k, 0)];
        }
    }

    pub fn solve(&self, b: &DVector<f64>) -> DVector<f64> {
        let mut x = b.clone();
        self.solve_in_place(&mut x);
        x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tridiagonal(a: &[f64], b: &[f64], c: &[f64]) -> BandMatrix {
        let n = b.len();
        let mut m = BandMatrix::zeros(n, 1, 1);
        for i in 0..n {
            m.add(i, i, b[i]).unwrap();
            if i > 0 {
                m.add(i, i - 1, a[i]).unwrap();
            }
            if i + 1 < n {
                m.add(i, i + 1, c[i]).unwrap();
            }
        }
        m
    }

    #[test]
    fn test_identity() {
        let m = tridiagonal(&[0.0; 3], &[1.0; 3], &[0.0; 3]);
        let d = DVector::from_vec(vec![1.0, 2.0, 3.0]);

        let x = m.factorize().unwrap().solve(&d);
        assert_eq!(x, d);
    }

    #[test]
    fn test_3x3_known_solution() {
        // | 2 -1  0 |   | 1 |
        // |-1  2 -1 | = | 0 |
        // | 0 -1  2 |   | 1 |
        let m = tridiagonal(&[0.0, -1.0, -1.0], &[2.0, 2.0, 2.0], &[-1.0, -1.0, 0.0]);
        let d = DVector::from_vec(vec![1.0, 0.0, 1.0]);

        let x = m.factorize().unwrap().solve(&d);

        for (i, xi) in x.iter().enumerate() {
            assert!((xi - 1.0).abs() < 1e-10, "x[{}] = {} (expected 1.0)", i, xi);
        }
    }

    #[test]
    fn test_two_equations() {
        // | 4  1 |   | x0 |   | 1 |
        // | 1  3 | * | x1 | = | 2 |
        // Solution: x0 = 1/11, x1 = 7/11
        let m = tridiagonal(&[0.0, 1.0], &[4.0, 3.0], &[1.0, 0.0]);
        let x = m
            .factorize()
            .unwrap()
            .solve(&DVector::from_vec(vec![1.0, 2.0]));

        assert!((x[0] - 1.0 / 11.0).abs() < 1e-10);
        assert!((x[1] - 7.0 / 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_pivoting_required() {
        // | 0 1 |       | 2 |
        // | 1 0 | x  =  | 3 |
        let m = tridiagonal(&[0.0, 1.0], &[0.0, 0.0], &[1.0, 0.0]);
        let lu = m.factorize().unwrap();

        assert_eq!(lu.pivots()[0], 1);
        let x = lu.solve(&DVector::from_vec(vec![2.0, 3.0]));
        assert!((x[0] - 3.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_wide_band_residual() {
        // Non-symmetric band (kl=3, ku=2) with entries that force row interchanges
        let n = 40;
        let (kl, ku) = (3, 2);
        let mut m = BandMatrix::zeros(n, kl, ku);
        for r in 0..n {
            for c in r.saturating_sub(kl)..=(r + ku).min(n - 1) {
                let value = ((r * 7 + c * 13) % 11) as f64 - 5.0 + if r == c { 0.5 } else { 0.0 };
                m.add(r, c, value).unwrap();
            }
        }
        let b = DVector::from_fn(n, |i, _| (i as f64 * 0.37).sin());

        let x = m.factorize().unwrap().solve(&b);
        let residual = (m.mul_vec(&x) - &b).amax();

        assert!(residual < 1e-9, "residual = {}", residual);
    }

    #[test]
    fn test_diffusion_like_system() {
        // -u[i-1] + 2u[i] - u[i+1] = h^2 with homogeneous boundaries
        let n = 50;
        let h = 1.0 / (n as f64 + 1.0);
        let h2 = h * h;
        let m = tridiagonal(&vec![-1.0; n], &vec![2.0; n], &vec![-1.0; n]);

        let x = m.factorize().unwrap().solve(&DVector::from_element(n, h2));

        for i in 1..n - 1 {
            let residual = -x[i - 1] + 2.0 * x[i] - x[i + 1];
            assert!(
                (residual - h2).abs() < 1e-10,
                "Residual at {} is {} (expected {})",
                i,
                residual,
                h2
            );
        }
    }

    #[test]
    fn test_singular_matrix() {
        // Second row becomes zero after elimination
        let m = tridiagonal(&[0.0, 1.0], &[1.0, 1.0], &[1.0, 0.0]);
        assert!(matches!(
            m.factorize(),
            Err(EBMError::SingularOperator { row: 1, .. })
        ));
    }

    #[test]
    fn test_outside_band_rejected() {
        let mut m = BandMatrix::zeros(5, 1, 2);
        assert!(m.add(3, 0, 1.0).is_err());
        assert!(m.add(0, 3, 1.0).is_err());
        assert!(m.add(0, 2, 1.0).is_ok());
        assert!(m.add(5, 5, 1.0).is_err());
        assert_eq!(m.get(0, 2), 1.0);
        assert_eq!(m.get(4, 0), 0.0);
    }

    #[test]
    #[should_panic(expected = "right-hand side must have length")]
    fn test_length_mismatch_panics() {
        let m = tridiagonal(&[0.0, 1.0], &[4.0, 3.0], &[1.0, 0.0]);
        let lu = m.factorize().unwrap();
        let _ = lu.solve(&DVector::from_vec(vec![1.0, 2.0, 3.0]));
    }
}
