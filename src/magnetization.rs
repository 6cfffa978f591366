// src/magnetization.rs
//
// Magnetisation observables of a spin configuration.

use crate::vec3::norm;
use crate::vector_field::VectorField;

/// Mean spin vector (1/N) Σ_i S_i.
pub fn magnetization_vector(state: &VectorField) -> [f64; 3] {
    let n = state.len() as f64;
    let mut m = [0.0; 3];
    for s in &state.data {
        m[0] += s[0];
        m[1] += s[1];
        m[2] += s[2];
    }
    [m[0] / n, m[1] / n, m[2] / n]
}

/// |magnetization_vector|
pub fn total_magnetization(state: &VectorField) -> f64 {
    norm(magnetization_vector(state))
}

/// Site kinds in sorted order and, per site, the position of its kind in that order.
pub fn kind_labels(kinds: &[String]) -> (Vec<String>, Vec<usize>) {
    let mut labels: Vec<String> = kinds.to_vec();
    labels.sort();
    labels.dedup();
    let ids = kinds
        .iter()
        .map(|k| labels.binary_search(k).unwrap_or(0))
        .collect();
    (labels, ids)
}

/// Mean spin vector of each kind; `kind_ids[i]` is the kind of site `i`.
pub fn magnetization_vector_by_type(
    state: &VectorField,
    num_kinds: usize,
    kind_ids: &[usize],
) -> Vec<[f64; 3]> {
    let mut sums = vec![[0.0; 3]; num_kinds];
    let mut counts = vec![0usize; num_kinds];
    for (s, &t) in state.data.iter().zip(kind_ids) {
        sums[t][0] += s[0];
        sums[t][1] += s[1];
        sums[t][2] += s[2];
        counts[t] += 1;
    }
    sums.iter()
        .zip(&counts)
        .map(|(m, &c)| {
            let c = c as f64;
            [m[0] / c, m[1] / c, m[2] / c]
        })
        .collect()
}

pub fn magnetization_by_type(state: &VectorField, num_kinds: usize, kind_ids: &[usize]) -> Vec<f64> {
    magnetization_vector_by_type(state, num_kinds, kind_ids)
        .into_iter()
        .map(norm)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saturated_state_has_unit_magnetization() {
        let s = VectorField::uniform(10, [0.0, 1.0, 0.0]);
        assert_eq!(magnetization_vector(&s), [0.0, 1.0, 0.0]);
        assert_eq!(total_magnetization(&s), 1.0);
    }

    #[test]
    fn antiparallel_pair_cancels() {
        let s = VectorField::from_vec(vec![[0.0, 0.0, 1.0], [0.0, 0.0, -1.0]]);
        assert_eq!(total_magnetization(&s), 0.0);
    }

    #[test]
    fn ferrimagnet_sublattices_are_resolved_by_type() {
        let kinds: Vec<String> = ["Fe", "Gd", "Fe", "Gd"].iter().map(|s| s.to_string()).collect();
        let (labels, ids) = kind_labels(&kinds);
        assert_eq!(labels, vec!["Fe".to_string(), "Gd".to_string()]);
        assert_eq!(ids, vec![0, 1, 0, 1]);

        let s = VectorField::from_vec(vec![
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
        ]);
        assert_eq!(total_magnetization(&s), 0.0);
        let by_type = magnetization_vector_by_type(&s, 2, &ids);
        assert_eq!(by_type, vec![[0.0, 0.0, 1.0], [0.0, 0.0, -1.0]]);
        assert_eq!(magnetization_by_type(&s, 2, &ids), vec![1.0, 1.0]);
    }
}
