// src/sweep.rs
//
// Pairing of the temperature and field-intensity lists into sweep points.
//
// Lists of different lengths are size-matched by cyclic doubling: a shorter
// list is concatenated with itself until it is at least as long as the
// longest one, then truncated. Not zero-padding, not interpolation.

use serde::Serialize;

use crate::error::{LlgError, Result};
use crate::scalar_list::ScalarList;

/// Size-matches any number of named scalar lists.
#[derive(Debug, Clone)]
pub struct ScalarListMatcher {
    size: usize,
    lists: Vec<ScalarList>,
}

impl ScalarListMatcher {
    /// Fails with `EmptySweepList` if any list is empty.
    pub fn new(named: &[(&str, &ScalarList)]) -> Result<Self> {
        if let Some((name, _)) = named.iter().find(|(_, l)| l.is_empty()) {
            return Err(LlgError::EmptySweepList(name.to_string()));
        }
        let size = named.iter().map(|(_, l)| l.len()).max().unwrap_or(0);
        let lists = named
            .iter()
            .map(|(_, l)| complete_size(l.values(), size))
            .collect();
        Ok(Self { size, lists })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn lists(&self) -> &[ScalarList] {
        &self.lists
    }
}

/// Repeat-double then truncate to exactly `size` values.
fn complete_size(values: &[f64], size: usize) -> ScalarList {
    let mut out = values.to_vec();
    while out.len() < size {
        out.extend_from_within(..);
    }
    out.truncate(size);
    ScalarList::new(out)
}

/// One (temperature, field intensity) pair of the scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub index: usize,
    pub temperature: f64,
    pub field: f64,
}

/// The matched temperature/field scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sweep {
    temperatures: Vec<f64>,
    fields: Vec<f64>,
}

impl Sweep {
    pub fn new(temperatures: &ScalarList, fields: &ScalarList) -> Result<Self> {
        let matcher =
            ScalarListMatcher::new(&[("temperature", temperatures), ("field", fields)])?;
        let mut lists = matcher.lists.into_iter();
        let temperatures = lists.next().map(ScalarList::into_inner).unwrap_or_default();
        let fields = lists.next().map(ScalarList::into_inner).unwrap_or_default();
        Ok(Self {
            temperatures,
            fields,
        })
    }

    pub fn len(&self) -> usize {
        self.temperatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperatures.is_empty()
    }

    pub fn temperatures(&self) -> &[f64] {
        &self.temperatures
    }

    pub fn fields(&self) -> &[f64] {
        &self.fields
    }

    pub fn point(&self, index: usize) -> SweepPoint {
        SweepPoint {
            index,
            temperature: self.temperatures[index],
            field: self.fields[index],
        }
    }

    pub fn points(&self) -> impl Iterator<Item = SweepPoint> + '_ {
        (0..self.len()).map(move |i| self.point(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(v: &[f64]) -> ScalarList {
        ScalarList::new(v.to_vec())
    }

    #[test]
    fn shorter_list_wraps_from_its_start() {
        let sweep = Sweep::new(&list(&[1.0, 2.0, 3.0]), &list(&[4.0, 5.0, 6.0, 7.0])).unwrap();
        let pairs: Vec<(f64, f64)> = sweep.points().map(|p| (p.temperature, p.field)).collect();
        assert_eq!(pairs, vec![(1.0, 4.0), (2.0, 5.0), (3.0, 6.0), (1.0, 7.0)]);
    }

    #[test]
    fn single_value_is_broadcast() {
        let sweep = Sweep::new(&list(&[300.0]), &list(&[0.0, 1.0, 2.0])).unwrap();
        assert_eq!(sweep.temperatures(), &[300.0, 300.0, 300.0]);
        assert_eq!(sweep.fields(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn doubling_wraps_when_target_is_not_a_multiple() {
        // [a, b, c] -> [a, b, c, a, b, c] -> truncate to 5
        let m = ScalarListMatcher::new(&[
            ("a", &list(&[1.0, 2.0, 3.0])),
            ("b", &list(&[0.0; 5])),
        ])
        .unwrap();
        assert_eq!(m.lists()[0].values(), &[1.0, 2.0, 3.0, 1.0, 2.0]);
        assert_eq!(m.lists()[1].values()[4], 0.0);
    }

    #[test]
    fn doubling_can_run_several_rounds() {
        let m = ScalarListMatcher::new(&[("a", &list(&[1.0, 2.0])), ("b", &list(&[0.0; 7]))])
            .unwrap();
        assert_eq!(m.len(), 7);
        assert_eq!(m.lists()[0].values(), &[1.0, 2.0, 1.0, 2.0, 1.0, 2.0, 1.0]);
    }

    #[test]
    fn equal_lengths_are_untouched() {
        let sweep = Sweep::new(&list(&[1.0, 2.0]), &list(&[3.0, 4.0])).unwrap();
        assert_eq!(sweep.len(), 2);
        assert_eq!(sweep.point(1), SweepPoint { index: 1, temperature: 2.0, field: 4.0 });
    }

    #[test]
    fn empty_list_is_rejected() {
        let err = Sweep::new(&list(&[1.0]), &list(&[])).unwrap_err();
        assert!(matches!(err, LlgError::EmptySweepList(ref name) if name == "field"));
    }
}
