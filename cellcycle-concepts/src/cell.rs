use serde::{Deserialize, Serialize};

/// Proliferative classification of a cell.
///
/// Only [ProliferativeType::Differentiated] cells are non-dividing. Every other type progresses
/// through the cell cycle, although with different base G1 durations.
#[derive(Clone, Copy, Debug, Default, Deserialize, Hash, PartialEq, Eq, Serialize)]
pub enum ProliferativeType {
    /// Self-renewing cell with a long G1 phase
    Stem,
    /// Rapidly dividing progenitor cell
    Transit,
    /// Terminally differentiated cell which never divides
    Differentiated,
    /// Generic proliferating cell
    #[default]
    Default,
}

impl ProliferativeType {
    /// Returns `true` if cells of this type never enter the cell cycle.
    pub fn is_non_dividing(&self) -> bool {
        matches!(self, ProliferativeType::Differentiated)
    }
}

/// Labels which a cell-cycle model may attach to or remove from a cell.
#[derive(Clone, Copy, Debug, Deserialize, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum CellLabel {
    /// Visible marker for cells which are currently contact inhibited
    Crowded,
    /// The cell has started apoptosis and will not progress through its cycle any further
    Apoptotic,
}

/// Read-only view on the cell which owns a cell-cycle model.
pub trait CellEntity {
    /// Proliferative classification of the cell
    fn proliferative_type(&self) -> ProliferativeType;

    /// Returns a scalar value stored by the cell under the given key, eg. `"volume"` or
    /// `"oxygen"`. Returns `None` when the cell does not carry the item.
    fn cell_data(&self, key: &str) -> Option<f64>;
}

/// Collection of labels carried by a cell.
///
/// Implementors must make [add_label](LabelRegistry::add_label) and
/// [remove_label](LabelRegistry::remove_label) idempotent such that they can be called every
/// step regardless of the previous state.
pub trait LabelRegistry {
    /// Attaches the label. Adding an already present label does nothing.
    fn add_label(&mut self, label: CellLabel);

    /// Removes the label. Removing a missing label does nothing.
    fn remove_label(&mut self, label: CellLabel);

    /// Checks if the label is currently present.
    fn has_label(&self, label: &CellLabel) -> bool;
}
