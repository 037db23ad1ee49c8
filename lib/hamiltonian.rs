//! Finite-difference Hamiltonian for the one-dimensional TISE.
//!
//! With ħ = 1 and the three-point stencil for the second derivative,
//! ```text
//!   1   ∂²            1                        1
//! - -- --- + V  →  ------- (2 ψ[i] - ψ[i - 1] - ψ[i + 1]) + V[i] ψ[i]
//!   2m ∂x²         2 m δx²
//! ```
//! which is a symmetric tridiagonal matrix with diagonal `1 / (m δx²) + V[i]`
//! and constant off-diagonal `-1 / (2 m δx²)`. Wavefunctions are implicitly
//! taken to vanish just outside the grid.

use ndarray as nd;
use crate::{
    error::DomainError,
    interp::DiscretizedPotential,
};

/// A real, symmetric tridiagonal matrix stored as its diagonal and
/// off-diagonal.
#[derive(Clone, Debug, PartialEq)]
pub struct Hamiltonian {
    // main diagonal, length n
    diag: nd::Array1<f64>,
    // sub/super-diagonal, length n - 1
    off: nd::Array1<f64>,
}

impl Hamiltonian {
    /// Create a new `Hamiltonian` from a diagonal of length `n` and an
    /// off-diagonal of length `n - 1`.
    ///
    /// Returns `None` if the lengths are inconsistent or the diagonal is
    /// empty.
    pub fn from_diagonals(diag: nd::Array1<f64>, off: nd::Array1<f64>)
        -> Option<Self>
    {
        (!diag.is_empty() && off.len() + 1 == diag.len())
            .then_some(Self { diag, off })
    }

    /// Get a reference to the main diagonal.
    pub fn get_diag(&self) -> &nd::Array1<f64> { &self.diag }

    /// Get a reference to the off-diagonal.
    pub fn get_off(&self) -> &nd::Array1<f64> { &self.off }

    /// Size of the (square) matrix.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.diag.len() }

    /// Maximum absolute row sum, `‖H‖₁ = ‖H‖∞`.
    pub fn norm1(&self) -> f64 {
        let n = self.diag.len();
        (0..n)
            .map(|i| {
                let left = if i > 0 { self.off[i - 1].abs() } else { 0.0 };
                let right = if i + 1 < n { self.off[i].abs() } else { 0.0 };
                self.diag[i].abs() + left + right
            })
            .fold(0.0, f64::max)
    }

    /// Gershgorin bounds `(lower, upper)` on the spectrum.
    pub fn gershgorin(&self) -> (f64, f64) {
        let n = self.diag.len();
        (0..n)
            .map(|i| {
                let left = if i > 0 { self.off[i - 1].abs() } else { 0.0 };
                let right = if i + 1 < n { self.off[i].abs() } else { 0.0 };
                (self.diag[i] - left - right, self.diag[i] + left + right)
            })
            .fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(lo, hi), (l, h)| (lo.min(l), hi.max(h)),
            )
    }

    /// Compute `H v`.
    ///
    /// *Panics if `v` does not have length [`Self::len`]*.
    pub fn dot<S>(&self, v: &nd::ArrayBase<S, nd::Ix1>) -> nd::Array1<f64>
    where S: nd::Data<Elem = f64>
    {
        let n = self.diag.len();
        assert_eq!(v.len(), n, "vector has the wrong length");
        (0..n)
            .map(|i| {
                let mut acc = self.diag[i] * v[i];
                if i > 0 { acc += self.off[i - 1] * v[i - 1]; }
                if i + 1 < n { acc += self.off[i] * v[i + 1]; }
                acc
            })
            .collect()
    }
}

/// Assemble the finite-difference Hamiltonian for a particle of given `mass`
/// in a discretized potential.
///
/// The grid spacing is taken from the first two grid points and assumed
/// uniform. Fails if the mass or the spacing is not positive, or if the
/// potential is not finite everywhere.
pub fn build(potential: &DiscretizedPotential, mass: f64)
    -> Result<Hamiltonian, DomainError>
{
    DomainError::check_mass(mass)?;
    let dx = potential.get_dx();
    DomainError::check_spacing(dx)?;
    if let Some((index, &value))
        = potential.get_V().iter().enumerate().find(|(_, Vk)| !Vk.is_finite())
    {
        return Err(DomainError::NonFinite { index, value });
    }
    let n = potential.len();
    let t = (mass * dx.powi(2)).recip();
    tracing::debug!(n, mass, dx, "assembling hamiltonian");
    let diag: nd::Array1<f64> = potential.get_V().mapv(|Vk| t + Vk);
    let off: nd::Array1<f64> = nd::Array1::from_elem(n - 1, -0.5 * t);
    Ok(Hamiltonian { diag, off })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn stencil_coefficients() {
        let grid = Grid::new(0.0, 1.0, 11).unwrap();
        let pot = DiscretizedPotential::from_fn(&grid, |x| 3.0 * x);
        let h = build(&pot, 2.0).unwrap();
        assert_eq!(h.len(), 11);
        assert_eq!(h.get_off().len(), 10);
        let t = 1.0 / (2.0 * 0.1_f64.powi(2));
        assert_relative_eq!(h.get_diag()[0], t, max_relative = 1e-12);
        assert_relative_eq!(h.get_diag()[10], t + 3.0, max_relative = 1e-12);
        h.get_off().iter()
            .for_each(|ok| assert_relative_eq!(*ok, -0.5 * t, max_relative = 1e-12));
    }

    #[test]
    fn rejects_bad_mass_and_spacing() {
        let grid = Grid::new(0.0, 1.0, 5).unwrap();
        let pot = DiscretizedPotential::from_fn(&grid, |_| 0.0);
        assert!(matches!(build(&pot, 0.0), Err(DomainError::BadMass(_))));
        assert!(matches!(build(&pot, -1.0), Err(DomainError::BadMass(_))));
        let reversed = DiscretizedPotential::new_arrays(
            nd::array![1.0, 0.5, 0.0], nd::array![0.0, 0.0, 0.0]).unwrap();
        assert!(matches!(build(&reversed, 1.0), Err(DomainError::BadSpacing(_))));
        let nan = DiscretizedPotential::new_arrays(
            nd::array![0.0, 0.5, 1.0], nd::array![0.0, f64::NAN, 0.0]).unwrap();
        assert!(matches!(build(&nan, 1.0), Err(DomainError::NonFinite { index: 1, .. })));
    }

    #[test]
    fn norms_and_bounds() {
        let h = Hamiltonian::from_diagonals(
            nd::array![2.0, -3.0, 1.0], nd::array![-1.0, 0.5]).unwrap();
        assert_eq!(h.norm1(), 4.5);
        assert_eq!(h.gershgorin(), (-4.5, 3.0));
        assert_eq!(h.dot(&nd::array![1.0, 1.0, 1.0]).to_vec(), vec![1.0, -3.5, 1.5]);
        assert!(Hamiltonian::from_diagonals(nd::array![1.0], nd::array![1.0]).is_none());
    }
}
