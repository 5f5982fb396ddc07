//! Dense array materialization
//!
//! Materialization happens in two steps. [`MaterializePlan::build`] maps every
//! sparse record to its integer index on each axis, rejecting labels that are
//! not in the resolved domain and collapsing duplicate tuples (later value
//! wins). [`MaterializePlan::materialize`] then allocates the array, fills it
//! with the kind's default and writes the planned cells. Only the first step
//! can fail, so lazy loading defers nothing but the allocation.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use ndarray::{ArrayD, IxDyn};
use tracing::{debug, warn};

use super::array::{DenseData, LabeledArray};
use crate::catalog::Symbol;
use crate::container::{RawRecord, SymbolKind};
use crate::resolve::{Coordinate, DomainBinding};
use crate::utils::{FormatError, LoadWarning};

/// Validated, index-mapped records of one symbol
#[derive(Debug, Clone)]
pub struct MaterializePlan {
    name: String,
    kind: SymbolKind,
    axes: Vec<Arc<Coordinate>>,
    entries: Vec<(Vec<usize>, f64)>,
}

impl MaterializePlan {
    /// Map `records` onto the axes of `binding`
    pub fn build(
        symbol: &Symbol,
        binding: &DomainBinding,
        records: &[RawRecord],
        warnings: &mut Vec<LoadWarning>,
    ) -> Result<Self, FormatError> {
        let mut entries: Vec<(Vec<usize>, f64)> = Vec::with_capacity(records.len());
        let mut seen: HashMap<Vec<usize>, usize> = HashMap::with_capacity(records.len());

        for record in records {
            let mut index = Vec::with_capacity(binding.axes.len());
            for (dim, (label, axis)) in record.keys.iter().zip(&binding.axes).enumerate() {
                let pos = axis
                    .position(label)
                    .ok_or_else(|| FormatError::LabelOutOfDomain {
                        symbol: symbol.name.clone(),
                        dim,
                        label: label.clone(),
                    })?;
                index.push(pos);
            }

            match seen.entry(index) {
                Entry::Occupied(slot) => {
                    entries[*slot.get()].1 = record.value;
                    let warning = LoadWarning::DuplicateRecord {
                        symbol: symbol.name.clone(),
                        keys: record.keys.clone(),
                    };
                    warn!("{}", warning);
                    warnings.push(warning);
                }
                Entry::Vacant(slot) => {
                    let index = slot.key().clone();
                    slot.insert(entries.len());
                    entries.push((index, record.value));
                }
            }
        }

        Ok(Self {
            name: symbol.name.clone(),
            kind: symbol.kind,
            axes: binding.axes.clone(),
            entries,
        })
    }

    #[inline]
    pub fn axes(&self) -> &[Arc<Coordinate>] {
        &self.axes
    }

    /// Number of distinct cells that will be written
    #[inline]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Value of the single cell of a zero-dimensional symbol
    pub fn scalar(&self) -> f64 {
        self.entries.first().map_or(0.0, |(_, value)| *value)
    }

    /// Allocate and fill the dense array
    pub fn materialize(&self) -> LabeledArray {
        let shape: Vec<usize> = self.axes.iter().map(|a| a.len()).collect();

        let data = match self.kind {
            SymbolKind::Set => {
                let mut array = ArrayD::from_elem(IxDyn(&shape), None);
                for (index, value) in &self.entries {
                    array[IxDyn(index)] = Some(*value != 0.0);
                }
                DenseData::Membership(array)
            }
            _ => {
                let mut array = ArrayD::from_elem(IxDyn(&shape), 0.0);
                for (index, value) in &self.entries {
                    array[IxDyn(index)] = *value;
                }
                DenseData::Numeric(array)
            }
        };

        debug!(
            "Materialized '{}' with shape {:?} ({} records)",
            self.name,
            shape,
            self.entries.len()
        );

        LabeledArray::new(self.name.clone(), self.kind, self.axes.clone(), data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SymbolId;
    use crate::container::SymbolInfo;

    fn axis(name: &str, labels: &[&str]) -> Arc<Coordinate> {
        Arc::new(Coordinate::from_labels(name, labels.iter().copied()))
    }

    fn binding(axes: Vec<Arc<Coordinate>>) -> DomainBinding {
        let dense_size = axes.iter().map(|a| a.len() as u128).product();
        DomainBinding { axes, dense_size }
    }

    fn symbol(name: &str, kind: SymbolKind, domain: &[&str]) -> Symbol {
        let info = SymbolInfo::new(name, kind, domain.iter().copied());
        Symbol::from_info(SymbolId(0), info, None)
    }

    #[test]
    fn test_single_record_parameter() {
        let p = symbol("p", SymbolKind::Parameter, &["s"]);
        let b = binding(vec![axis("s", &["a", "b", "c"])]);
        let records = vec![RawRecord::new(["a"], 5.0)];
        let mut warnings = Vec::new();

        let plan = MaterializePlan::build(&p, &b, &records, &mut warnings).unwrap();
        let array = plan.materialize();

        let values = array.as_numeric().unwrap();
        assert_eq!(values.as_slice().unwrap(), &[5.0, 0.0, 0.0]);
        assert_eq!(array.value(&["a"]), Some(5.0));
        assert_eq!(array.value(&["b"]), Some(0.0));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_round_trip_two_dims() {
        let p = symbol("p", SymbolKind::Parameter, &["*", "*"]);
        let u = axis("*", &["a", "o", "r", "US", "CA", "b"]);
        let b = binding(vec![Arc::clone(&u), Arc::clone(&u)]);
        let records = vec![
            RawRecord::new(["a", "o"], 1.0),
            RawRecord::new(["r", "US"], 2.0),
            RawRecord::new(["CA", "b"], 3.0),
        ];
        let mut warnings = Vec::new();

        let array = MaterializePlan::build(&p, &b, &records, &mut warnings)
            .unwrap()
            .materialize();

        assert_eq!(array.shape(), &[6, 6]);
        for record in &records {
            let keys: Vec<&str> = record.keys.iter().map(String::as_str).collect();
            assert_eq!(array.value(&keys), Some(record.value));
        }
        let nonzero = array.as_numeric().unwrap().iter().filter(|v| **v != 0.0).count();
        assert_eq!(nonzero, 3);
    }

    #[test]
    fn test_set_membership_default() {
        let s = symbol("m", SymbolKind::Set, &["s", "t"]);
        let b = binding(vec![axis("s", &["a", "b"]), axis("t", &["x", "y"])]);
        let records = vec![RawRecord::element(["a", "y"]), RawRecord::new(["b", "x"], 0.0)];
        let mut warnings = Vec::new();

        let array = MaterializePlan::build(&s, &b, &records, &mut warnings)
            .unwrap()
            .materialize();

        assert_eq!(array.membership(&["a", "y"]), Some(Some(true)));
        assert_eq!(array.membership(&["b", "x"]), Some(Some(false)));
        assert_eq!(array.membership(&["a", "x"]), Some(None));
        assert!(array.contains(&["a", "y"]));
        assert!(!array.contains(&["b", "x"]));
    }

    #[test]
    fn test_label_out_of_domain() {
        let p = symbol("p", SymbolKind::Parameter, &["s", "s"]);
        let s = axis("s", &["a", "b"]);
        let b = binding(vec![Arc::clone(&s), s]);
        let records = vec![RawRecord::new(["a", "z"], 1.0)];
        let mut warnings = Vec::new();

        let err = MaterializePlan::build(&p, &b, &records, &mut warnings).unwrap_err();
        assert_eq!(
            err,
            FormatError::LabelOutOfDomain {
                symbol: "p".to_string(),
                dim: 1,
                label: "z".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_keeps_later_value() {
        let p = symbol("p", SymbolKind::Parameter, &["s"]);
        let b = binding(vec![axis("s", &["a", "b"])]);
        let records = vec![RawRecord::new(["a"], 1.0), RawRecord::new(["a"], 7.0)];
        let mut warnings = Vec::new();

        let plan = MaterializePlan::build(&p, &b, &records, &mut warnings).unwrap();

        assert_eq!(plan.nnz(), 1);
        assert_eq!(plan.materialize().value(&["a"]), Some(7.0));
        assert_eq!(
            warnings,
            vec![LoadWarning::DuplicateRecord {
                symbol: "p".to_string(),
                keys: vec!["a".to_string()]
            }]
        );
    }

    #[test]
    fn test_scalar() {
        let pi = symbol("pi", SymbolKind::Parameter, &[]);
        let b = binding(Vec::new());
        let mut warnings = Vec::new();

        let records = [RawRecord::new(Vec::<String>::new(), 2.5)];

        let plan = MaterializePlan::build(&pi, &b, &records, &mut warnings).unwrap();
        assert_eq!(plan.scalar(), 2.5);

        let empty = MaterializePlan::build(&pi, &b, &[], &mut warnings).unwrap();
        assert_eq!(empty.scalar(), 0.0);
    }
}
