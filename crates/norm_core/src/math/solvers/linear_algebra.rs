//! Dense linear algebra helpers for small symmetric systems.

/// Pivot magnitude below which a factorisation is treated as singular.
const PIVOT_EPS: f64 = 1e-30;

/// Solve `A x = b` for symmetric positive definite `A` by Cholesky decomposition.
///
/// Returns `None` when `A` is not positive definite (or dimensions disagree).
///
/// # Example
///
/// ```
/// use norm_core::math::solvers::solve_cholesky;
///
/// let a = vec![vec![4.0, 2.0], vec![2.0, 3.0]];
/// let x = solve_cholesky(&a, &[2.0, 1.0]).unwrap();
/// assert!((4.0 * x[0] + 2.0 * x[1] - 2.0).abs() < 1e-12);
/// ```
pub fn solve_cholesky(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n || a.iter().any(|row| row.len() != n) {
        return None;
    }

    // A = L L^T
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let sum = a[i][j] - (0..j).map(|k| l[i][k] * l[j][k]).sum::<f64>();
            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                if l[j][j].abs() < PIVOT_EPS {
                    return None;
                }
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let sum = b[i] - (0..i).map(|j| l[i][j] * y[j]).sum::<f64>();
        y[i] = sum / l[i][i];
    }

    // L^T x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let sum = y[i] - ((i + 1)..n).map(|j| l[j][i] * x[j]).sum::<f64>();
        x[i] = sum / l[i][i];
    }

    Some(x)
}

/// Solve a 2x2 system `[[a, b], [c, d]] x = rhs` by Cramer's rule.
///
/// Returns `None` when the determinant is negligible relative to the entries.
pub fn solve_2x2(m: [[f64; 2]; 2], rhs: [f64; 2]) -> Option<[f64; 2]> {
    let det = m[0][0] * m[1][1] - m[0][1] * m[1][0];
    let scale = m
        .iter()
        .flatten()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if !det.is_finite() || det.abs() <= 1e-14 * scale * scale {
        return None;
    }
    Some([
        (rhs[0] * m[1][1] - m[0][1] * rhs[1]) / det,
        (m[0][0] * rhs[1] - m[1][0] * rhs[0]) / det,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cholesky_identity() {
        let a = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]];
        let x = solve_cholesky(&a, &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(x, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_cholesky_spd_system() {
        let a = vec![
            vec![4.0, 12.0, -16.0],
            vec![12.0, 37.0, -43.0],
            vec![-16.0, -43.0, 98.0],
        ];
        let x = solve_cholesky(&a, &[1.0, 2.0, 3.0]).unwrap();
        for i in 0..3 {
            let lhs: f64 = (0..3).map(|j| a[i][j] * x[j]).sum();
            assert_relative_eq!(lhs, [1.0, 2.0, 3.0][i], epsilon = 1e-9);
        }
    }

    #[test]
    fn test_cholesky_singular_returns_none() {
        let a = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
        assert!(solve_cholesky(&a, &[1.0, 1.0]).is_none());
    }

    #[test]
    fn test_cholesky_dimension_mismatch() {
        let a = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        assert!(solve_cholesky(&a, &[1.0, 1.0, 1.0]).is_none());
    }

    #[test]
    fn test_solve_2x2() {
        let x = solve_2x2([[2.0, 1.0], [1.0, 3.0]], [3.0, 5.0]).unwrap();
        assert_relative_eq!(x[0], 0.8, epsilon = 1e-12);
        assert_relative_eq!(x[1], 1.4, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_2x2_singular() {
        assert!(solve_2x2([[1.0, 2.0], [2.0, 4.0]], [1.0, 2.0]).is_none());
    }
}
