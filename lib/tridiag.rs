//! LU factorization of general tridiagonal matrices with partial pivoting.
//!
//! This is the same elimination scheme as LAPACK's `?gttrf`/`?gtts2`: row
//! interchanges produce a second superdiagonal in `U`, and `L` is unit lower
//! bidiagonal with its multipliers stored in place of the subdiagonal.

use ndarray as nd;
use crate::{ Arr1, error::LengthError };

/// Factored form `P L U` of a tridiagonal matrix.
#[derive(Clone, Debug)]
pub struct TridiagLu {
    // multipliers of L
    dl: Vec<f64>,
    // diagonal of U
    d: Vec<f64>,
    // first superdiagonal of U
    du: Vec<f64>,
    // second superdiagonal of U
    du2: Vec<f64>,
    // whether rows k and k + 1 were interchanged at step k
    swap: Vec<bool>,
}

impl TridiagLu {
    /// Factor the tridiagonal matrix with subdiagonal `sub`, diagonal `diag`
    /// and superdiagonal `sup`.
    ///
    /// Pivots of `U` smaller in magnitude than `pivot_floor` are replaced by
    /// `±pivot_floor`, which keeps the factorization usable for inverse
    /// iteration at a (numerically) exact eigenvalue. Pass `0.0` to leave
    /// pivots untouched.
    pub fn factor<S, T, U>(
        sub: &Arr1<S>,
        diag: &Arr1<T>,
        sup: &Arr1<U>,
        pivot_floor: f64,
    ) -> Result<Self, LengthError>
    where
        S: nd::Data<Elem = f64>,
        T: nd::Data<Elem = f64>,
        U: nd::Data<Elem = f64>,
    {
        let n = diag.len();
        LengthError::check(sub, sup)?;
        if sub.len() + 1 != n { return Err(LengthError(n, sub.len())); }

        let mut dl: Vec<f64> = sub.to_vec();
        let mut d: Vec<f64> = diag.to_vec();
        let mut du: Vec<f64> = sup.to_vec();
        let mut du2: Vec<f64> = vec![0.0; n.saturating_sub(2)];
        let mut swap: Vec<bool> = vec![false; n.saturating_sub(1)];

        let mut fact: f64;
        let mut temp: f64;
        for i in 0..n.saturating_sub(1) {
            if d[i].abs() >= dl[i].abs() {
                if d[i] != 0.0 {
                    fact = dl[i] / d[i];
                    dl[i] = fact;
                    d[i + 1] -= fact * du[i];
                }
            } else {
                fact = d[i] / dl[i];
                d[i] = dl[i];
                dl[i] = fact;
                temp = du[i];
                du[i] = d[i + 1];
                d[i + 1] = temp - fact * d[i + 1];
                if i + 2 < n {
                    du2[i] = du[i + 1];
                    du[i + 1] *= -fact;
                }
                swap[i] = true;
            }
        }
        if pivot_floor > 0.0 {
            d.iter_mut()
                .filter(|dk| dk.abs() < pivot_floor)
                .for_each(|dk| { *dk = pivot_floor.copysign(*dk); });
        }
        Ok(Self { dl, d, du, du2, swap })
    }

    /// Size of the factored matrix.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.d.len() }

    /// Return `true` if any pivot of `U` is exactly zero.
    pub fn is_singular(&self) -> bool {
        self.d.iter().any(|dk| *dk == 0.0)
    }

    /// Solve `A x = b` in place, overwriting `b` with `x`.
    ///
    /// *Panics if `b` does not have the same size as the factored matrix*.
    pub fn solve_inplace<S>(&self, b: &mut nd::ArrayBase<S, nd::Ix1>)
    where S: nd::DataMut<Elem = f64>
    {
        let n = self.d.len();
        assert_eq!(b.len(), n, "right-hand side has the wrong length");
        if n == 0 { return; }

        let mut temp: f64;
        for i in 0..n - 1 {
            if self.swap[i] {
                temp = b[i] - self.dl[i] * b[i + 1];
                b[i] = b[i + 1];
                b[i + 1] = temp;
            } else {
                b[i + 1] -= self.dl[i] * b[i];
            }
        }

        b[n - 1] /= self.d[n - 1];
        if n > 1 {
            b[n - 2] = (b[n - 2] - self.du[n - 2] * b[n - 1]) / self.d[n - 2];
        }
        for i in (0..n.saturating_sub(2)).rev() {
            b[i] = (
                b[i] - self.du[i] * b[i + 1] - self.du2[i] * b[i + 2]
            ) / self.d[i];
        }
    }

    /// Like [`Self::solve_inplace`], but return the solution as a new array.
    pub fn solve<S>(&self, b: &Arr1<S>) -> nd::Array1<f64>
    where S: nd::Data<Elem = f64>
    {
        let mut x = b.to_owned();
        self.solve_inplace(&mut x);
        x
    }
}
