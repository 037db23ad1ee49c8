//! Partial eigendecomposition of real symmetric tridiagonal matrices.
//!
//! Eigenvalues are located individually by bisection on Sturm counts, so that
//! only the requested index range is ever computed. Eigenvectors are then
//! found by inverse iteration on each eigenvalue, with vectors belonging to
//! the same cluster of close eigenvalues re-orthogonalized against each other
//! (modified Gram-Schmidt) at every step. This is the scheme of LAPACK's
//! `?stebz` + `?stein` pair.
//!
//! The sign of each eigenvector is fixed so that its first component with
//! magnitude above `1e-6` times its largest magnitude is positive.

use ndarray as nd;
use crate::{
    Arr1,
    error::{ ConvergenceError, EigenError, RangeError },
    hamiltonian::Hamiltonian,
    tridiag::TridiagLu,
};

pub type EigenResult<T> = Result<T, EigenError>;

// relative convergence tolerance for bisection
const REL_TOL: f64 = 2.0 * f64::EPSILON;

// eigenvalues closer than this (relative to ‖H‖) have their eigenvectors
// explicitly orthogonalized against each other
const CLUSTER_GAP: f64 = 1e-3;

// minimum and maximum number of inverse iteration steps per eigenvector; the
// step after the residual bound is first met refines the vector further
const MIN_INVIT_ITERS: usize = 2;
const MAX_INVIT_ITERS: usize = 5;

// threshold, relative to the largest magnitude, below which components are
// ignored when fixing the sign of an eigenvector
const SIGN_THRESHOLD: f64 = 1e-6;

/// A 1-based, inclusive range `lo..=hi` of eigenvalue indices, counted in
/// ascending order of eigenvalue.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EigenRequest {
    lo: usize,
    hi: usize,
}

impl EigenRequest {
    /// Create a new `EigenRequest`.
    ///
    /// The range is validated against the matrix size when it is used.
    pub fn new(lo: usize, hi: usize) -> Self { Self { lo, hi } }

    /// Request the `k` lowest eigenpairs.
    pub fn lowest(k: usize) -> Self { Self { lo: 1, hi: k } }

    /// First requested index (1-based).
    pub fn lo(&self) -> usize { self.lo }

    /// Last requested index (1-based, inclusive).
    pub fn hi(&self) -> usize { self.hi }

    /// Number of requested eigenpairs; zero for an inverted range.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { (self.hi + 1).saturating_sub(self.lo) }

    /// Check that the range lies within `1..=n`.
    pub fn check(&self, n: usize) -> Result<(), RangeError> {
        RangeError::check(self.lo, self.hi, n)
    }
}

/// A single eigenpair borrowed from an [`EigenSpectrum`].
#[derive(Clone, Debug)]
pub struct Eigenstate<'a> {
    /// Index (1-based) of the eigenvalue within the full spectrum.
    pub index: usize,
    /// Energy
    pub e: f64,
    /// Wavefunction, normalized to unit sum of squares.
    pub wf: nd::ArrayView1<'a, f64>,
}

/// A contiguous block of eigenpairs in ascending order of eigenvalue.
#[derive(Clone, Debug)]
pub struct EigenSpectrum {
    // 1-based index of the first eigenvalue
    first: usize,
    // eigenvalues, length k
    values: nd::Array1<f64>,
    // eigenvectors as columns, n × k
    vectors: nd::Array2<f64>,
}

impl EigenSpectrum {
    /// Get a reference to the (ascending) eigenvalues.
    pub fn get_values(&self) -> &nd::Array1<f64> { &self.values }

    /// Get a reference to the eigenvectors, stored as columns.
    pub fn get_vectors(&self) -> &nd::Array2<f64> { &self.vectors }

    /// Index (1-based) of the first eigenvalue within the full spectrum.
    pub fn first_index(&self) -> usize { self.first }

    /// Number of eigenpairs.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.values.len() }

    /// Iterate over the eigenpairs.
    pub fn states(&self) -> impl Iterator<Item = Eigenstate<'_>> + '_ {
        self.values.iter().zip(self.vectors.columns()).enumerate()
            .map(|(j, (e, wf))| Eigenstate { index: self.first + j, e: *e, wf })
    }
}

/// Count the eigenvalues of the symmetric tridiagonal matrix with diagonal
/// `diag` and squared off-diagonal `off2` that are strictly less than
/// `lambda`.
///
/// This is the number of negative pivots in the LDLᵀ factorization of
/// `H - lambda I`; pivots smaller in magnitude than `pivmin` are replaced by
/// `-pivmin`.
pub fn sturm_count<S, T>(diag: &Arr1<S>, off2: &Arr1<T>, lambda: f64, pivmin: f64)
    -> usize
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    let n = diag.len();
    if n == 0 { return 0; }
    let mut count: usize = 0;
    let mut q = diag[0] - lambda;
    if q.abs() <= pivmin { q = -pivmin; }
    if q < 0.0 { count += 1; }
    for i in 1..n {
        q = (diag[i] - lambda) - off2[i - 1] / q;
        if q.abs() <= pivmin { q = -pivmin; }
        if q < 0.0 { count += 1; }
    }
    count
}

// shared quantities for bisection and inverse iteration
struct Prepared<'a> {
    h: &'a Hamiltonian,
    off2: nd::Array1<f64>,
    norm: f64,
    pivmin: f64,
}

impl<'a> Prepared<'a> {
    fn new(h: &'a Hamiltonian) -> Self {
        let off2 = h.get_off().mapv(|ek| ek * ek);
        let norm = h.norm1();
        let pivmin = f64::MIN_POSITIVE * off2.iter().copied().fold(1.0, f64::max);
        Self { h, off2, norm, pivmin }
    }

    fn count(&self, lambda: f64) -> usize {
        sturm_count(self.h.get_diag(), &self.off2, lambda, self.pivmin)
    }

    // absolute bisection tolerance
    fn atol(&self) -> f64 { (f64::EPSILON * self.norm).max(self.pivmin) }

    // Gershgorin interval, widened so that the Sturm counts at its ends are
    // exactly 0 and n
    fn bounds(&self) -> (f64, f64) {
        let (lo, hi) = self.h.gershgorin();
        let n = self.h.len() as f64;
        let margin = 2.0 * f64::EPSILON * self.norm * n + 2.0 * self.pivmin;
        (lo - margin, hi + margin)
    }

    // locate the eigenvalue with 0-based index `k` given `a` and `b` with
    // count(a) <= k < count(b); returns the eigenvalue and the final lower
    // bound
    fn bisect(&self, k: usize, mut a: f64, mut b: f64)
        -> Result<(f64, f64), ConvergenceError>
    {
        let atol = self.atol();
        let itmax = ((b - a) / atol).log2().ceil().max(0.0) as usize + 2;
        let mut mid: f64;
        for _ in 0..itmax {
            if b - a <= atol.max(REL_TOL * a.abs().max(b.abs())) {
                return Ok((0.5 * (a + b), a));
            }
            mid = 0.5 * (a + b);
            if mid <= a || mid >= b { return Ok((mid, a)); }
            if self.count(mid) <= k { a = mid; } else { b = mid; }
        }
        if b - a <= atol.max(REL_TOL * a.abs().max(b.abs())) {
            Ok((0.5 * (a + b), a))
        } else {
            Err(ConvergenceError::Bisection { index: k + 1, iters: itmax })
        }
    }

    // residual ‖H v - λ v‖₂
    fn residual<S>(&self, v: &Arr1<S>, lambda: f64) -> f64
    where S: nd::Data<Elem = f64>
    {
        let hv = self.h.dot(v);
        hv.iter().zip(v)
            .map(|(hvk, vk)| (hvk - lambda * vk).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

/// Compute the eigenvalues with 1-based indices `request.lo..=request.hi`, in
/// ascending order.
pub fn eigenvalues(h: &Hamiltonian, request: EigenRequest)
    -> EigenResult<nd::Array1<f64>>
{
    request.check(h.len())?;
    let prep = Prepared::new(h);
    bisect_range(&prep, request)
}

fn bisect_range(prep: &Prepared, request: EigenRequest)
    -> EigenResult<nd::Array1<f64>>
{
    let (mut a, b) = prep.bounds();
    let mut values: nd::Array1<f64> = nd::Array1::zeros(request.len());
    for (j, k) in (request.lo() - 1..request.hi()).enumerate() {
        let (e, lower) = prep.bisect(k, a, b)?;
        values[j] = e;
        a = lower;
    }
    Ok(values)
}

// deterministic pseudo-random start vectors for inverse iteration
struct StartVector(u64);

impl StartVector {
    fn new(seed: usize) -> Self {
        Self(0x9e37_79b9_7f4a_7c15 ^ (seed as u64 + 1).wrapping_mul(0xbf58_476d_1ce4_e5b9))
    }

    // xorshift64*, mapped to (-1, 1)
    fn next_f64(&mut self) -> f64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        let r = self.0.wrapping_mul(0x2545_f491_4f6c_dd1d);
        (r >> 11) as f64 / (1_u64 << 53) as f64 * 2.0 - 1.0
    }

    fn fill(&mut self, n: usize) -> nd::Array1<f64> {
        let mut v: nd::Array1<f64> = (0..n).map(|_| self.next_f64()).collect();
        let norm = v.dot(&v).sqrt();
        v /= norm;
        v
    }
}

// make the first significant component positive
fn fix_sign<S>(v: &mut nd::ArrayBase<S, nd::Ix1>)
where S: nd::DataMut<Elem = f64>
{
    let vmax = v.iter().fold(0.0_f64, |acc, vk| acc.max(vk.abs()));
    let first
        = v.iter()
        .find(|vk| vk.abs() > SIGN_THRESHOLD * vmax)
        .copied()
        .unwrap_or(0.0);
    if first < 0.0 { v.map_inplace(|vk| { *vk = -*vk; }); }
}

/// Compute the eigenpairs with 1-based indices `request.lo..=request.hi`.
///
/// Eigenvalues are returned in ascending order; eigenvectors are stored as
/// the columns of an `n × k` matrix, each with unit sum of squares.
///
/// ```
/// use ndarray as nd;
/// use seqsolver::{ eigen::{ self, EigenRequest }, hamiltonian::Hamiltonian };
///
/// // [[2, -1], [-1, 2]] has eigenvalues 1 and 3
/// let h = Hamiltonian::from_diagonals(nd::array![2.0, 2.0], nd::array![-1.0])
///     .unwrap();
/// let spec = eigen::solve(&h, EigenRequest::new(1, 2)).unwrap();
/// assert!((spec.get_values()[0] - 1.0).abs() < 1e-12);
/// assert!((spec.get_values()[1] - 3.0).abs() < 1e-12);
/// ```
pub fn solve(h: &Hamiltonian, request: EigenRequest)
    -> EigenResult<EigenSpectrum>
{
    let n = h.len();
    request.check(n)?;
    let prep = Prepared::new(h);
    tracing::debug!(
        n,
        lo = request.lo(),
        hi = request.hi(),
        norm = prep.norm,
        "solving tridiagonal eigenproblem",
    );
    let values = bisect_range(&prep, request)?;
    let k = values.len();

    let tol = 16.0 * (n as f64).sqrt() * f64::EPSILON * prep.norm.max(f64::MIN_POSITIVE);
    let pivot_floor = (f64::EPSILON * prep.norm).max(prep.pivmin);
    let mut vectors: nd::Array2<f64> = nd::Array2::zeros((n, k));
    let mut cluster_start: usize = 0;
    let mut sigma_prev: f64 = f64::NEG_INFINITY;
    for j in 0..k {
        let e = values[j];
        if j > 0 && e - values[j - 1] > CLUSTER_GAP * prep.norm {
            cluster_start = j;
        }
        // separate shifts for (numerically) coincident eigenvalues
        let pert = 10.0 * f64::EPSILON * e.abs().max(prep.norm * f64::EPSILON);
        let sigma
            = if j > cluster_start && e - sigma_prev < pert {
                sigma_prev + pert
            } else {
                e
            };
        sigma_prev = sigma;

        let shifted: nd::Array1<f64> = h.get_diag().mapv(|dk| dk - sigma);
        let lu = TridiagLu::factor(h.get_off(), &shifted, h.get_off(), pivot_floor)?;
        let mut start = StartVector::new(request.lo() - 1 + j);
        let mut v = start.fill(n);
        let mut residual = f64::INFINITY;
        let mut iters: usize = 0;
        while iters < MAX_INVIT_ITERS {
            iters += 1;
            lu.solve_inplace(&mut v);
            for i in cluster_start..j {
                let u = vectors.column(i);
                let proj = u.dot(&v);
                v.scaled_add(-proj, &u);
            }
            let norm = v.dot(&v).sqrt();
            if norm == 0.0 || !norm.is_finite() {
                v = start.fill(n);
                continue;
            }
            v /= norm;
            residual = prep.residual(&v, e);
            if residual <= tol && iters >= MIN_INVIT_ITERS { break; }
        }
        if residual > tol {
            return Err(
                ConvergenceError::InverseIteration {
                    index: request.lo() + j,
                    iters,
                    residual,
                }.into()
            );
        }
        tracing::debug!(index = request.lo() + j, e, iters, residual, "eigenpair found");
        fix_sign(&mut v);
        vectors.column_mut(j).assign(&v);
    }
    Ok(EigenSpectrum { first: request.lo(), values, vectors })
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;
    use approx::assert_abs_diff_eq;
    use super::*;

    // free particle on n points: diagonal 2s, off-diagonal -s
    fn laplacian(n: usize, s: f64) -> Hamiltonian {
        Hamiltonian::from_diagonals(
            nd::Array1::from_elem(n, 2.0 * s),
            nd::Array1::from_elem(n - 1, -s),
        ).unwrap()
    }

    fn laplacian_eigenvalue(n: usize, s: f64, k: usize) -> f64 {
        let theta = k as f64 * PI / (n + 1) as f64;
        4.0 * s * (theta / 2.0).sin().powi(2)
    }

    fn assert_orthonormal(vectors: &nd::Array2<f64>, tol: f64) {
        let k = vectors.ncols();
        for a in 0..k {
            for b in 0..k {
                let dot = vectors.column(a).dot(&vectors.column(b));
                let expected = if a == b { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(dot, expected, epsilon = tol);
            }
        }
    }

    #[test]
    fn sturm_count_2x2() {
        // [[1, -1], [-1, 3]] has eigenvalues 2 ± √2
        let d = nd::array![1.0, 3.0];
        let e2 = nd::array![1.0];
        let pivmin = f64::MIN_POSITIVE;
        assert_eq!(sturm_count(&d, &e2, 0.0, pivmin), 0);
        assert_eq!(sturm_count(&d, &e2, 1.0, pivmin), 1);
        assert_eq!(sturm_count(&d, &e2, 4.0, pivmin), 2);
    }

    #[test]
    fn laplacian_lowest_states() {
        let (n, s) = (200, 50.0);
        let h = laplacian(n, s);
        let spec = solve(&h, EigenRequest::new(1, 5)).unwrap();
        assert_eq!(spec.len(), 5);
        assert_eq!(spec.get_vectors().dim(), (n, 5));
        let amp = (2.0 / (n + 1) as f64).sqrt();
        for state in spec.states() {
            let k = state.index;
            assert_abs_diff_eq!(state.e, laplacian_eigenvalue(n, s, k), epsilon = 1e-10);
            state.wf.iter().enumerate()
                .for_each(|(i, vi)| {
                    let exact = amp * ((i + 1) as f64 * k as f64 * PI / (n + 1) as f64).sin();
                    assert_abs_diff_eq!(*vi, exact, epsilon = 1e-8);
                });
        }
        assert_orthonormal(spec.get_vectors(), 1e-10);
    }

    #[test]
    fn interior_block_matches_full_spectrum() {
        let n = 60;
        let diag: nd::Array1<f64> = (0..n).map(|i| ((i * 7) % 11) as f64 * 0.3).collect();
        let off: nd::Array1<f64> = (0..n - 1).map(|i| -1.0 - 0.01 * i as f64).collect();
        let h = Hamiltonian::from_diagonals(diag, off).unwrap();
        let all = eigenvalues(&h, EigenRequest::new(1, n)).unwrap();
        assert!(all.iter().zip(all.iter().skip(1)).all(|(a, b)| a <= b));
        let block = solve(&h, EigenRequest::new(20, 27)).unwrap();
        assert_eq!(block.first_index(), 20);
        block.get_values().iter().zip(all.slice(nd::s![19..27]))
            .for_each(|(b, a)| assert_abs_diff_eq!(*b, *a, epsilon = 1e-12));
        for state in block.states() {
            let r = h.dot(&state.wf) - &state.wf * state.e;
            assert!(r.dot(&r).sqrt() < 1e-9);
        }
        assert_orthonormal(block.get_vectors(), 1e-10);
    }

    #[test]
    fn degenerate_eigenvalues_get_orthogonal_vectors() {
        let h = Hamiltonian::from_diagonals(
            nd::array![1.0, 1.0, 2.0], nd::array![0.0, 0.0]).unwrap();
        let spec = solve(&h, EigenRequest::new(1, 3)).unwrap();
        assert_abs_diff_eq!(spec.get_values()[0], 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(spec.get_values()[1], 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(spec.get_values()[2], 2.0, epsilon = 1e-14);
        assert_orthonormal(spec.get_vectors(), 1e-12);
        assert_abs_diff_eq!(spec.get_vectors()[[2, 2]], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn single_point() {
        let h = Hamiltonian::from_diagonals(nd::array![-3.5], nd::Array1::zeros(0))
            .unwrap();
        let spec = solve(&h, EigenRequest::lowest(1)).unwrap();
        assert_abs_diff_eq!(spec.get_values()[0], -3.5, epsilon = 1e-14);
        assert_eq!(spec.get_vectors()[[0, 0]], 1.0);
    }

    #[test]
    fn non_finite_matrix_fails_to_converge() {
        let h = Hamiltonian::from_diagonals(
            nd::array![1.0, f64::NAN, 1.0], nd::array![-1.0, -1.0]).unwrap();
        assert!(matches!(
            solve(&h, EigenRequest::new(1, 3)),
            Err(EigenError::Convergence(ConvergenceError::InverseIteration { .. })),
        ));
    }

    #[test]
    fn sign_convention() {
        let mut v = nd::array![1e-12, -0.6, 0.8];
        fix_sign(&mut v);
        assert_eq!(v.to_vec(), vec![-1e-12, 0.6, -0.8]);
        let mut w = nd::array![0.0, 0.6, -0.8];
        fix_sign(&mut w);
        assert_eq!(w.to_vec(), vec![0.0, 0.6, -0.8]);
    }

    #[test]
    fn invalid_ranges() {
        let h = laplacian(10, 1.0);
        for (lo, hi) in [(0, 3), (4, 3), (1, 11), (11, 11)] {
            assert!(matches!(
                solve(&h, EigenRequest::new(lo, hi)),
                Err(EigenError::Range(RangeError { .. })),
            ));
            assert!(eigenvalues(&h, EigenRequest::new(lo, hi)).is_err());
        }
        assert_eq!(EigenRequest::new(4, 3).len(), 0);
        assert_eq!(EigenRequest::new(2, 6).len(), 5);
    }
}
