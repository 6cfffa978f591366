// src/vec3.rs

/// 3D vector dot product.
#[inline]
pub fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// 3D vector cross product: a × b.
#[inline]
pub fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Euclidean norm.
#[inline]
pub fn norm(v: [f64; 3]) -> f64 {
    dot(v, v).sqrt()
}

/// Divide a vector by its own Euclidean norm.
///
/// No zero-vector fallback: a zero, infinite or NaN input gives a NaN vector.
#[inline]
pub fn normalize(v: [f64; 3]) -> [f64; 3] {
    let n = norm(v);
    [v[0] / n, v[1] / n, v[2] / n]
}

/// a + s * b
#[inline]
pub fn add_scaled(a: [f64; 3], s: f64, b: [f64; 3]) -> [f64; 3] {
    [a[0] + s * b[0], a[1] + s * b[1], a[2] + s * b[2]]
}

#[inline]
pub fn is_finite(v: [f64; 3]) -> bool {
    v[0].is_finite() && v[1].is_finite() && v[2].is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
        assert_eq!(cross([0.0, 0.0, 1.0], [1.0, 0.0, 0.0]), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn normalize_of_zero_vector_is_nan() {
        let v = normalize([0.0, 0.0, 0.0]);
        assert!(v.iter().all(|c| c.is_nan()));
    }

    #[test]
    fn normalize_of_infinite_vector_is_nan() {
        let v = normalize([f64::INFINITY, 0.0, 0.0]);
        assert!(v[0].is_nan());
        assert!(!is_finite(v));
    }

    #[test]
    fn normalize_gives_unit_length() {
        let v = normalize([3.0, -4.0, 12.0]);
        assert!((norm(v) - 1.0).abs() < 1e-15);
    }
}
