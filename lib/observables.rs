//! Position expectation values and uncertainties of discrete eigenstates.
//!
//! Eigenvectors are normalized to unit sum of squares over the grid, so
//! expectation values are plain (un-weighted by `δx`) sums:
//! ```text
//! <x>  = Σ ψ[i] x[i] ψ[i]
//! <x²> = Σ ψ[i] x[i]² ψ[i]
//! σ    = √(<x²> - <x>²)
//! ```
//! Sums run in ascending grid order.

use ndarray as nd;
use crate::{
    Arr1,
    Arr2,
    error::{ ComputationWarning, LengthError },
};

/// Position expectation value and uncertainty for a single eigenstate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ObservableRecord {
    /// Expectation value `<x>`.
    pub mean: f64,
    /// Uncertainty `σ = √(<x²> - <x>²)`; never negative.
    pub sigma: f64,
}

/// Observables for a block of eigenstates, along with any non-fatal warnings
/// raised while computing them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Observables {
    records: Vec<ObservableRecord>,
    warnings: Vec<ComputationWarning>,
}

impl Observables {
    /// Get the per-state records, in eigenvector column order.
    pub fn get_records(&self) -> &[ObservableRecord] { &self.records }

    /// Get any warnings raised.
    pub fn get_warnings(&self) -> &[ComputationWarning] { &self.warnings }

    /// Number of records.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.records.len() }

    /// Return the `k × 2` table of `(<x>, σ)` rows.
    pub fn to_table(&self) -> nd::Array2<f64> {
        nd::Array2::from_shape_fn(
            (self.records.len(), 2),
            |(j, c)| {
                let rec = &self.records[j];
                if c == 0 { rec.mean } else { rec.sigma }
            },
        )
    }
}

/// Compute `(<x>, σ)` for a single normalized wavefunction, returning the
/// record and the raw variance `<x²> - <x>²`.
pub fn position_moments<S, T>(x: &Arr1<S>, wf: &Arr1<T>)
    -> Result<(ObservableRecord, f64), LengthError>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    LengthError::check(x, wf)?;
    let (mean, mean2): (f64, f64)
        = x.iter().zip(wf)
        .fold((0.0, 0.0), |(m, m2), (xi, qi)| {
            (m + qi * xi * qi, m2 + qi * xi.powi(2) * qi)
        });
    let var = mean2 - mean.powi(2);
    Ok((ObservableRecord { mean, sigma: var.max(0.0).sqrt() }, var))
}

/// Compute position expectation values and uncertainties for every eigenvector
/// (column) of `wfs`, sampled at grid coordinates `x`.
///
/// A negative variance, which can only arise through floating-point
/// cancellation, is clamped to zero and reported as a [`ComputationWarning`].
pub fn compute<S, T>(x: &Arr1<S>, wfs: &Arr2<T>)
    -> Result<Observables, LengthError>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    if wfs.nrows() != x.len() { return Err(LengthError(x.len(), wfs.nrows())); }
    let mut records: Vec<ObservableRecord> = Vec::with_capacity(wfs.ncols());
    let mut warnings: Vec<ComputationWarning> = Vec::new();
    for (state, wf) in wfs.columns().into_iter().enumerate() {
        let (rec, var) = position_moments(x, &wf)?;
        if var < 0.0 {
            let warning = ComputationWarning { state, radicand: var };
            tracing::warn!("{}", warning);
            warnings.push(warning);
        }
        records.push(rec);
    }
    Ok(Observables { records, warnings })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use super::*;

    #[test]
    fn point_mass_has_zero_width() {
        let x = nd::array![-1.0, 0.0, 2.0];
        let wfs = nd::array![[0.0], [0.0], [1.0]];
        let obs = compute(&x, &wfs).unwrap();
        assert_eq!(obs.len(), 1);
        assert_eq!(obs.get_records()[0], ObservableRecord { mean: 2.0, sigma: 0.0 });
        assert!(obs.get_warnings().is_empty());
    }

    #[test]
    fn two_point_superposition() {
        // equal weight on x = -1 and x = 3: <x> = 1, σ = 2
        let a = 0.5_f64.sqrt();
        let x = nd::array![-1.0, 1.0, 3.0];
        let wfs = nd::array![[a, 1.0], [0.0, 0.0], [-a, 0.0]];
        let obs = compute(&x, &wfs).unwrap();
        let table = obs.to_table();
        assert_eq!(table.dim(), (2, 2));
        assert_abs_diff_eq!(table[[0, 0]], 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(table[[0, 1]], 2.0, epsilon = 1e-14);
        assert_abs_diff_eq!(table[[1, 0]], -1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(table[[1, 1]], 0.0, epsilon = 1e-14);
    }

    #[test]
    fn negative_variance_is_clamped_and_reported() {
        // an over-normalized state gives <x²> - <x>² = 16 - 64
        let x = nd::array![0.0, 2.0];
        let wfs = nd::array![[0.0, 1.0], [2.0, 0.0]];
        let (_, var) = position_moments(&x, &wfs.column(0)).unwrap();
        assert_eq!(var, -48.0);
        let obs = compute(&x, &wfs).unwrap();
        assert_eq!(obs.get_records()[0], ObservableRecord { mean: 8.0, sigma: 0.0 });
        assert_eq!(obs.get_records()[1], ObservableRecord { mean: 0.0, sigma: 0.0 });
        assert_eq!(
            obs.get_warnings(),
            &[ComputationWarning { state: 0, radicand: -48.0 }],
        );
    }

    #[test]
    fn length_mismatch() {
        let x = nd::array![0.0, 1.0];
        let wfs = nd::array![[1.0], [0.0], [0.0]];
        assert!(compute(&x, &wfs).is_err());
    }
}
