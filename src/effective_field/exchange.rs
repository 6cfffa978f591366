// src/effective_field/exchange.rs

use crate::effective_field::for_each_site;
use crate::lattice::ExchangeTable;
use crate::vector_field::VectorField;

/// Add the Heisenberg exchange field:
///   H_ex,i = (1/μ_i) Σ_k J_ik S_k
///
/// A site without neighbours gets nothing added.
pub fn add_exchange_field(
    state: &VectorField,
    mu: &[f64],
    exchange: &ExchangeTable,
    h_eff: &mut VectorField,
    parallel: bool,
) {
    debug_assert_eq!(exchange.num_sites(), h_eff.len());
    let s = &state.data;

    for_each_site(&mut h_eff.data, parallel, |i, h_i| {
        let (neighbors, jex) = exchange.row(i);
        if neighbors.is_empty() {
            return;
        }
        let mut sum = [0.0; 3];
        for (&k, &j) in neighbors.iter().zip(jex) {
            sum[0] += j * s[k][0];
            sum[1] += j * s[k][1];
            sum[2] += j * s[k][2];
        }
        h_i[0] += sum[0] / mu[i];
        h_i[1] += sum[1] / mu[i];
        h_i[2] += sum[2] / mu[i];
    });
}

/// Exchange field for every site as a new field.
pub fn exchange_interaction_field(
    state: &VectorField,
    mu: &[f64],
    exchange: &ExchangeTable,
) -> VectorField {
    let mut h = VectorField::zeros(state.len());
    add_exchange_field(state, mu, exchange, &mut h, false);
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::ExchangeInteraction;

    fn rows(r: &[&[(usize, f64)]]) -> Vec<Vec<ExchangeInteraction>> {
        r.iter()
            .map(|row| {
                row.iter()
                    .map(|&(neighbor, jex)| ExchangeInteraction { neighbor, jex })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn isolated_site_has_zero_exchange_field() {
        let table = ExchangeTable::csr(&rows(&[&[(1, 1.0)], &[(0, 1.0)], &[]]));
        let state = VectorField::from_vec(vec![[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.3, 0.4, 0.5]]);
        let h = exchange_interaction_field(&state, &[1.0, 1.0, 1.0], &table);
        assert_eq!(h.data[2], [0.0, 0.0, 0.0]);
        assert_eq!(h.data[0], [0.0, 1.0, 0.0]);
    }

    #[test]
    fn field_sums_weighted_neighbours_over_mu() {
        let table = ExchangeTable::csr(&rows(&[&[(1, 2.0), (2, -1.0)], &[(0, 2.0)], &[(0, -1.0)]]));
        let state = VectorField::from_vec(vec![[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let h = exchange_interaction_field(&state, &[2.0, 1.0, 1.0], &table);
        assert_eq!(h.data[0], [1.0, -0.5, 0.0]);
        assert_eq!(h.data[1], [0.0, 0.0, 2.0]);
        assert_eq!(h.data[2], [0.0, 0.0, -1.0]);
    }

    #[test]
    fn zero_mu_gives_infinite_field() {
        let table = ExchangeTable::csr(&rows(&[&[(1, 1.0)], &[(0, 1.0)]]));
        let state = VectorField::from_vec(vec![[0.0, 0.0, 1.0], [0.0, 0.0, 1.0]]);
        let h = exchange_interaction_field(&state, &[0.0, 1.0], &table);
        assert_eq!(h.data[0][2], f64::INFINITY);
    }

    #[test]
    fn dense_and_csr_layouts_give_same_field() {
        let r = rows(&[&[(1, 1.0), (2, 0.5)], &[(2, 1.0), (0, 1.0)], &[(0, 0.5), (1, 1.0)]]);
        let dense = ExchangeTable::dense(&r).unwrap();
        let csr = ExchangeTable::csr(&r);
        let state = VectorField::from_vec(vec![[0.6, 0.0, 0.8], [0.0, 1.0, 0.0], [0.0, 0.6, -0.8]]);
        let mu = [1.0, 2.0, 3.0];

        let mut a = VectorField::zeros(3);
        add_exchange_field(&state, &mu, &dense, &mut a, true);
        let b = exchange_interaction_field(&state, &mu, &csr);
        assert_eq!(a, b);
    }
}
