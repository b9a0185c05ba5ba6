//! Least-squares polynomial fitting.
//!
//! The fit solves the normal equations `(XᵗX) c = Xᵗy` by Gaussian
//! elimination with partial pivoting. `XᵗX` for a polynomial basis becomes
//! badly conditioned as the degree or the magnitude of `x` grows, so each
//! elimination step swaps in the row with the largest pivot candidate.
//!
//! A pivot whose magnitude falls below the configured epsilon, or any
//! non-finite coefficient, is reported as [`AnalyticsError::SingularMatrix`]
//! rather than leaking NaN or infinity to the caller.

use log::debug;

use crate::core::error::{AnalyticsError, AnalyticsResult};

/// Default magnitude below which a pivot counts as zero.
pub const DEFAULT_PIVOT_EPSILON: f64 = 1e-12;

/// Fixed-degree least-squares polynomial fitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialFitter {
    degree: usize,
    pivot_epsilon: f64,
}

impl PolynomialFitter {
    pub fn new(degree: usize) -> Self {
        Self {
            degree,
            pivot_epsilon: DEFAULT_PIVOT_EPSILON,
        }
    }

    pub fn with_pivot_epsilon(mut self, pivot_epsilon: f64) -> Self {
        self.pivot_epsilon = pivot_epsilon;
        self
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Fit coefficients `c` so that `Σ c[i] * x^i` approximates `y`.
    ///
    /// # Returns
    /// * `Ok(coefficients)` of length `degree + 1`, constant term first
    /// * `Err(AnalyticsError::InvalidInput)` if `x` and `y` differ in length
    /// * `Err(AnalyticsError::InsufficientData)` if there are no points
    /// * `Err(AnalyticsError::SingularMatrix)` if the normal equations are singular
    pub fn fit(&self, x: &[f64], y: &[f64]) -> AnalyticsResult<Vec<f64>> {
        if x.len() != y.len() {
            return Err(AnalyticsError::InvalidInput(format!(
                "x and y must have the same length ({} != {})",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(AnalyticsError::InsufficientData {
                required: self.degree + 1,
                available: 0,
            });
        }

        let (xtx, xty) = normal_equations(x, y, self.degree);
        let coefficients = solve_linear_system(xtx, xty, self.pivot_epsilon)?;

        debug!(
            "Fitted degree-{} polynomial over {} points: {:?}",
            self.degree,
            x.len(),
            coefficients
        );
        Ok(coefficients)
    }
}

/// Fit a degree-`degree` polynomial with the default pivot epsilon.
///
/// # Examples
///
/// ```
/// use weather_analytics::algorithms::regression::{fit, predict};
///
/// let coeffs = fit(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0], 1).unwrap();
/// assert!((predict(&coeffs, 6.0) - 12.0).abs() < 1e-9);
/// ```
pub fn fit(x: &[f64], y: &[f64], degree: usize) -> AnalyticsResult<Vec<f64>> {
    PolynomialFitter::new(degree).fit(x, y)
}

/// Evaluate `Σ coefficients[i] * x^i`.
pub fn predict(coefficients: &[f64], x: f64) -> f64 {
    coefficients
        .iter()
        .enumerate()
        .map(|(i, c)| c * x.powi(i as i32))
        .sum()
}

/// Build `XᵗX` and `Xᵗy` for the Vandermonde design matrix with rows
/// `[x^0, x^1, ..., x^degree]`.
fn normal_equations(x: &[f64], y: &[f64], degree: usize) -> (Vec<Vec<f64>>, Vec<f64>) {
    let width = degree + 1;
    let design: Vec<Vec<f64>> = x
        .iter()
        .map(|&xi| (0..width).map(|k| xi.powi(k as i32)).collect())
        .collect();

    let mut xtx = vec![vec![0.0; width]; width];
    let mut xty = vec![0.0; width];
    for (row, &yi) in design.iter().zip(y.iter()) {
        for i in 0..width {
            for j in 0..width {
                xtx[i][j] += row[i] * row[j];
            }
            xty[i] += row[i] * yi;
        }
    }
    (xtx, xty)
}

/// Solve `a · x = b` by Gaussian elimination with partial pivoting.
///
/// At step `i` the row with the largest `|a[k][i]|` among rows `i..n` is
/// swapped into place before eliminating below it. Back substitution then
/// produces the solution.
///
/// # Returns
/// * `Err(AnalyticsError::InvalidInput)` if `a` is not `n x n` with `b` of length `n`
/// * `Err(AnalyticsError::SingularMatrix)` if a pivot is below `pivot_epsilon`
///   in magnitude (or not finite), or the solution is not finite
pub fn solve_linear_system(
    mut a: Vec<Vec<f64>>,
    mut b: Vec<f64>,
    pivot_epsilon: f64,
) -> AnalyticsResult<Vec<f64>> {
    let n = a.len();
    if b.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(AnalyticsError::InvalidInput(format!(
            "expected a square {}x{} system with {} right-hand values",
            n,
            n,
            b.len()
        )));
    }

    for i in 0..n {
        let mut max_row = i;
        for k in (i + 1)..n {
            if a[k][i].abs() > a[max_row][i].abs() {
                max_row = k;
            }
        }
        a.swap(i, max_row);
        b.swap(i, max_row);

        let pivot = a[i][i];
        if !pivot.is_finite() || pivot.abs() < pivot_epsilon {
            return Err(AnalyticsError::SingularMatrix(format!(
                "pivot {} is {:e} after row exchange",
                i, pivot
            )));
        }

        for k in (i + 1)..n {
            let factor = a[k][i] / pivot;
            for j in i..n {
                a[k][j] -= factor * a[i][j];
            }
            b[k] -= factor * b[i];
        }
    }

    let mut solution = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a[i][j] * solution[j];
        }
        solution[i] = sum / a[i][i];
    }

    if let Some(idx) = solution.iter().position(|c| !c.is_finite()) {
        return Err(AnalyticsError::SingularMatrix(format!(
            "coefficient {} is not finite",
            idx
        )));
    }

    Ok(solution)
}
