//! Labeled dense arrays

use std::sync::{Arc, OnceLock};

use ndarray::{ArrayD, IxDyn};

use super::dense::MaterializePlan;
use crate::container::SymbolKind;
use crate::resolve::Coordinate;

/// Dense cell storage
///
/// Set cells are `None` for "not an element", which is distinct from a
/// present element whose value is "no" (`Some(false)`).
#[derive(Debug, Clone, PartialEq)]
pub enum DenseData {
    Numeric(ArrayD<f64>),
    Membership(ArrayD<Option<bool>>),
}

/// Value of a single cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue {
    Number(f64),
    Membership(Option<bool>),
}

/// A fully materialized symbol indexed by the Cartesian product of its axes
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledArray {
    name: String,
    kind: SymbolKind,
    axes: Vec<Arc<Coordinate>>,
    data: DenseData,
}

impl LabeledArray {
    pub(crate) fn new(
        name: String,
        kind: SymbolKind,
        axes: Vec<Arc<Coordinate>>,
        data: DenseData,
    ) -> Self {
        Self {
            name,
            kind,
            axes,
            data,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    #[inline]
    pub fn axes(&self) -> &[Arc<Coordinate>] {
        &self.axes
    }

    /// Coordinate names of each axis, e.g. `["s", "*"]`
    pub fn dims(&self) -> Vec<&str> {
        self.axes.iter().map(|a| a.name()).collect()
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    pub fn shape(&self) -> &[usize] {
        match &self.data {
            DenseData::Numeric(a) => a.shape(),
            DenseData::Membership(a) => a.shape(),
        }
    }

    #[inline]
    pub fn data(&self) -> &DenseData {
        &self.data
    }

    pub fn as_numeric(&self) -> Option<&ArrayD<f64>> {
        match &self.data {
            DenseData::Numeric(a) => Some(a),
            DenseData::Membership(_) => None,
        }
    }

    pub fn as_membership(&self) -> Option<&ArrayD<Option<bool>>> {
        match &self.data {
            DenseData::Membership(a) => Some(a),
            DenseData::Numeric(_) => None,
        }
    }

    /// Integer index of a label tuple
    pub fn index_of(&self, labels: &[&str]) -> Option<Vec<usize>> {
        if labels.len() != self.axes.len() {
            return None;
        }
        labels
            .iter()
            .zip(&self.axes)
            .map(|(label, axis)| axis.position(label))
            .collect()
    }

    /// Cell at a label tuple; `None` if any label is off its axis
    pub fn get(&self, labels: &[&str]) -> Option<CellValue> {
        let index = self.index_of(labels)?;
        Some(match &self.data {
            DenseData::Numeric(a) => CellValue::Number(a[IxDyn(&index)]),
            DenseData::Membership(a) => CellValue::Membership(a[IxDyn(&index)]),
        })
    }

    /// Numeric cell at a label tuple
    pub fn value(&self, labels: &[&str]) -> Option<f64> {
        match self.get(labels)? {
            CellValue::Number(v) => Some(v),
            CellValue::Membership(_) => None,
        }
    }

    /// Membership cell at a label tuple
    pub fn membership(&self, labels: &[&str]) -> Option<Option<bool>> {
        match self.get(labels)? {
            CellValue::Membership(m) => Some(m),
            CellValue::Number(_) => None,
        }
    }

    /// Whether the tuple is a "yes" element of a Set
    pub fn contains(&self, labels: &[&str]) -> bool {
        self.membership(labels) == Some(Some(true))
    }
}

/// Array whose allocation is deferred until first access
///
/// In eager mode the cell is filled during loading; aliases share the same
/// `Arc<LazyArray>`, so they always observe the same `Arc<LabeledArray>`.
#[derive(Debug)]
pub struct LazyArray {
    plan: MaterializePlan,
    array: OnceLock<Arc<LabeledArray>>,
}

impl LazyArray {
    pub(crate) fn new(plan: MaterializePlan) -> Self {
        Self {
            plan,
            array: OnceLock::new(),
        }
    }

    /// The materialized array, built on first call
    pub fn get(&self) -> &Arc<LabeledArray> {
        self.array.get_or_init(|| Arc::new(self.plan.materialize()))
    }

    /// Axes of the array, available without materializing it
    #[inline]
    pub fn axes(&self) -> &[Arc<Coordinate>] {
        self.plan.axes()
    }

    #[inline]
    pub fn is_materialized(&self) -> bool {
        self.array.get().is_some()
    }
}
