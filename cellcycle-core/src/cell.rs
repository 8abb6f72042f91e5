//! Minimal cell which can be driven by a [Population](crate::population::Population)

use std::collections::{BTreeMap, BTreeSet};

use cellcycle_concepts::{CellEntity, CellLabel, LabelRegistry, ProliferativeType};
use serde::{Deserialize, Serialize};

/// Set of labels carried by a single cell.
///
/// Adding and removing are set operations and thus idempotent.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct CellPropertyCollection {
    labels: BTreeSet<CellLabel>,
}

impl CellPropertyCollection {
    /// Iterates over all labels in a fixed order
    pub fn iter(&self) -> impl Iterator<Item = &CellLabel> {
        self.labels.iter()
    }

    /// Number of distinct labels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// `true` when no label is present
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl LabelRegistry for CellPropertyCollection {
    fn add_label(&mut self, label: CellLabel) {
        self.labels.insert(label);
    }

    fn remove_label(&mut self, label: CellLabel) {
        self.labels.remove(&label);
    }

    fn has_label(&self, label: &CellLabel) -> bool {
        self.labels.contains(label)
    }
}

/// Cell with a proliferative type, scalar data items and labels.
///
/// Scalar data such as `"volume"` or `"oxygen"` is written by external processes (eg. a
/// mechanics solver) and read by the cell-cycle model.
/// ```
/// # use cellcycle_core::cell::SimpleCell;
/// # use cellcycle_concepts::*;
/// let cell = SimpleCell::new(ProliferativeType::Stem).with_data("volume", 0.9);
/// assert_eq!(cell.cell_data("volume"), Some(0.9));
/// assert_eq!(cell.cell_data("oxygen"), None);
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct SimpleCell {
    /// Proliferative classification
    pub proliferative_type: ProliferativeType,
    /// Scalar data items
    pub data: BTreeMap<String, f64>,
    /// Labels of the cell
    pub properties: CellPropertyCollection,
}

impl SimpleCell {
    /// Cell without data or labels
    pub fn new(proliferative_type: ProliferativeType) -> Self {
        Self {
            proliferative_type,
            ..Default::default()
        }
    }

    /// Builder-style setter for a data item
    pub fn with_data(mut self, key: &str, value: f64) -> Self {
        self.set_data(key, value);
        self
    }

    /// Inserts or overwrites a data item.
    pub fn set_data(&mut self, key: &str, value: f64) {
        self.data.insert(key.to_owned(), value);
    }
}

impl CellEntity for SimpleCell {
    fn proliferative_type(&self) -> ProliferativeType {
        self.proliferative_type
    }

    fn cell_data(&self, key: &str) -> Option<f64> {
        self.data.get(key).copied()
    }
}

impl LabelRegistry for SimpleCell {
    fn add_label(&mut self, label: CellLabel) {
        self.properties.add_label(label);
    }

    fn remove_label(&mut self, label: CellLabel) {
        self.properties.remove_label(label);
    }

    fn has_label(&self, label: &CellLabel) -> bool {
        self.properties.has_label(label)
    }
}

#[cfg(test)]
mod test_labels {
    use super::*;

    #[test]
    fn labels_are_idempotent() {
        let mut cell = SimpleCell::default();
        cell.remove_label(CellLabel::Crowded);
        assert!(cell.properties.is_empty());
        cell.add_label(CellLabel::Crowded);
        cell.add_label(CellLabel::Crowded);
        assert_eq!(cell.properties.len(), 1);
        assert!(cell.has_label(&CellLabel::Crowded));
        cell.remove_label(CellLabel::Crowded);
        cell.remove_label(CellLabel::Crowded);
        assert!(!cell.has_label(&CellLabel::Crowded));
    }

    #[test]
    fn labels_are_independent() {
        let mut cell = SimpleCell::default();
        cell.add_label(CellLabel::Apoptotic);
        cell.add_label(CellLabel::Crowded);
        cell.remove_label(CellLabel::Crowded);
        assert_eq!(
            cell.properties.iter().copied().collect::<Vec<_>>(),
            vec![CellLabel::Apoptotic]
        );
    }
}
