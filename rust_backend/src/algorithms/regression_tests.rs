#[cfg(test)]
mod tests {
    use crate::algorithms::regression::{fit, predict, solve_linear_system, PolynomialFitter};
    use crate::core::error::{AnalyticsError, ErrorKind};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {} within {}, got {}",
            expected,
            tol,
            actual
        );
    }

    /// Linear data recovers slope and intercept
    #[test]
    fn test_fit_line() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];

        let coeffs = fit(&x, &y, 1).unwrap();
        assert_eq!(coeffs.len(), 2);
        assert_close(coeffs[0], 0.0, 1e-9);
        assert_close(coeffs[1], 2.0, 1e-9);
        assert_close(predict(&coeffs, 6.0), 12.0, 1e-9);
    }

    /// Two distinct points are interpolated exactly by a line
    #[test]
    fn test_two_points_exact() {
        let x = [-3.5, 7.25];
        let y = [10.0, -4.0];

        let coeffs = fit(&x, &y, 1).unwrap();
        for (xi, yi) in x.iter().zip(y.iter()) {
            assert_close(predict(&coeffs, *xi), *yi, 1e-6);
        }
    }

    /// Quadratic over a daily hourly window
    #[test]
    fn test_fit_quadratic_over_24_points() {
        let x: Vec<f64> = (1..=24).map(f64::from).collect();
        let y: Vec<f64> = x.iter().map(|v| 1.5 - 0.25 * v + 0.03 * v * v).collect();

        let coeffs = fit(&x, &y, 2).unwrap();
        assert_eq!(coeffs.len(), 3);
        assert_close(coeffs[0], 1.5, 1e-6);
        assert_close(coeffs[1], -0.25, 1e-6);
        assert_close(coeffs[2], 0.03, 1e-6);
    }

    /// Degree zero is the mean
    #[test]
    fn test_fit_constant() {
        let coeffs = fit(&[1.0, 2.0, 3.0], &[4.0, 5.0, 9.0], 0).unwrap();
        assert_eq!(coeffs.len(), 1);
        assert_close(coeffs[0], 6.0, 1e-12);
    }

    /// Repeated x values leave the normal equations singular
    #[test]
    fn test_duplicate_x_is_singular() {
        let err = fit(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0], 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SingularMatrix);
    }

    /// Fewer points than coefficients is singular
    #[test]
    fn test_underdetermined_is_singular() {
        let err = fit(&[1.0, 2.0], &[1.0, 4.0], 2).unwrap_err();
        assert!(matches!(err, AnalyticsError::SingularMatrix(_)));
    }

    /// NaN observations never become a silent NaN coefficient
    #[test]
    fn test_nan_observation_is_singular() {
        let err = fit(&[1.0, 2.0, 3.0], &[1.0, f64::NAN, 3.0], 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SingularMatrix);
    }

    #[test]
    fn test_mismatched_lengths() {
        let err = fit(&[1.0, 2.0], &[1.0], 1).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_input() {
        let err = fit(&[], &[], 2).unwrap_err();
        assert_eq!(
            err,
            AnalyticsError::InsufficientData {
                required: 3,
                available: 0
            }
        );
    }

    /// A zero leading entry needs a row exchange
    #[test]
    fn test_solver_pivots_past_zero() {
        let a = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
        let b = vec![2.0, 3.0];

        let solution = solve_linear_system(a, b, 1e-12).unwrap();
        assert_close(solution[0], 3.0, 1e-12);
        assert_close(solution[1], 2.0, 1e-12);
    }

    #[test]
    fn test_solver_three_by_three() {
        // 2x + y - z = 8, -3x - y + 2z = -11, -2x + y + 2z = -3  =>  (2, 3, -1)
        let a = vec![
            vec![2.0, 1.0, -1.0],
            vec![-3.0, -1.0, 2.0],
            vec![-2.0, 1.0, 2.0],
        ];
        let b = vec![8.0, -11.0, -3.0];

        let solution = solve_linear_system(a, b, 1e-12).unwrap();
        assert_close(solution[0], 2.0, 1e-9);
        assert_close(solution[1], 3.0, 1e-9);
        assert_close(solution[2], -1.0, 1e-9);
    }

    #[test]
    fn test_solver_rejects_non_square() {
        let a = vec![vec![1.0, 2.0], vec![3.0]];
        let err = solve_linear_system(a, vec![1.0, 2.0], 1e-12).unwrap_err();
        assert!(matches!(err, AnalyticsError::InvalidInput(_)));
    }

    /// A looser epsilon turns a near-singular system into an error
    #[test]
    fn test_custom_pivot_epsilon() {
        let x = [1.0, 1.0 + 1e-7, 2.0];
        let y = [1.0, 1.0, 2.0];

        assert!(PolynomialFitter::new(1).fit(&x, &y).is_ok());
        let err = PolynomialFitter::new(1)
            .with_pivot_epsilon(10.0)
            .fit(&x, &y)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SingularMatrix);
    }

    #[test]
    fn test_predict() {
        assert_eq!(predict(&[], 3.0), 0.0);
        assert_eq!(predict(&[1.0, 2.0, 3.0], 2.0), 17.0);
    }
}
