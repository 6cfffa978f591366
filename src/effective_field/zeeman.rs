// src/effective_field/zeeman.rs

use crate::vector_field::VectorField;

/// Per-site external field: intensity_i * axis_i.
pub fn magnetic_field(intensity: &[f64], axes: &[[f64; 3]]) -> VectorField {
    debug_assert_eq!(intensity.len(), axes.len());
    intensity
        .iter()
        .zip(axes)
        .map(|(&h, a)| [h * a[0], h * a[1], h * a[2]])
        .collect::<Vec<_>>()
        .into()
}

/// One global intensity acting along every site's field axis.
///
/// The driver calls this once per sweep point; the result is constant over
/// the iterations of that point.
pub fn uniform_magnetic_field(intensity: f64, axes: &[[f64; 3]]) -> VectorField {
    axes.iter()
        .map(|a| [intensity * a[0], intensity * a[1], intensity * a[2]])
        .collect::<Vec<_>>()
        .into()
}

/// Add a precomputed external field to `h_eff`.
pub fn add_zeeman_field(h_eff: &mut VectorField, field: &VectorField) {
    debug_assert_eq!(h_eff.len(), field.len());
    for (h, f) in h_eff.data.iter_mut().zip(&field.data) {
        h[0] += f[0];
        h[1] += f[1];
        h[2] += f[2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_scales_each_axis() {
        let axes = [[1.0, 0.0, 0.0], [0.0, 0.6, 0.8]];
        let f = magnetic_field(&[2.0, -5.0], &axes);
        assert_eq!(f.data[0], [2.0, 0.0, 0.0]);
        assert_eq!(f.data[1], [0.0, -3.0, -4.0]);
    }

    #[test]
    fn uniform_intensity_matches_broadcast_list() {
        let axes = [[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        assert_eq!(uniform_magnetic_field(1.5, &axes), magnetic_field(&[1.5; 3], &axes));
    }

    #[test]
    fn zeeman_field_accumulates() {
        let mut h = VectorField::uniform(2, [1.0, 1.0, 1.0]);
        add_zeeman_field(&mut h, &VectorField::uniform(2, [0.0, 0.0, 2.0]));
        assert_eq!(h.data[1], [1.0, 1.0, 3.0]);
    }
}
