use cellcycle_concepts::ProliferativeType;

use serde::{Deserialize, Serialize};

/// Base durations of the individual cell-cycle phases.
///
/// The G1 duration is not stored directly but derived from the [ProliferativeType] of the cell
/// whenever the model is initialised or reset (see [PhaseDurations::g1_duration_for]).
/// ```
/// # use cellcycle_building_blocks::prelude::*;
/// let durations = PhaseDurations {
///     transit_cell_g1_duration: 10.0,
///     ..Default::default()
/// };
/// assert_eq!(durations.g1_duration_for(ProliferativeType::Transit), 10.0);
/// assert_eq!(durations.total_with_g1(10.0), 20.0);
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct PhaseDurations {
    /// Duration of mitosis
    pub m_duration: f64,
    /// Duration of the synthesis phase
    pub s_duration: f64,
    /// Duration of the second gap phase
    pub g2_duration: f64,
    /// Base G1 duration of stem cells
    pub stem_cell_g1_duration: f64,
    /// Base G1 duration of transit and default cells
    pub transit_cell_g1_duration: f64,
    /// Lower bound for any randomly drawn gap duration
    pub minimum_gap_duration: f64,
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            m_duration: 1.0,
            s_duration: 5.0,
            g2_duration: 4.0,
            stem_cell_g1_duration: 14.0,
            transit_cell_g1_duration: 2.0,
            minimum_gap_duration: 0.01,
        }
    }
}

impl PhaseDurations {
    /// Base G1 duration for a cell of the given type.
    /// Differentiated cells never leave G1 and obtain an infinite duration.
    pub fn g1_duration_for(&self, proliferative_type: ProliferativeType) -> f64 {
        match proliferative_type {
            ProliferativeType::Stem => self.stem_cell_g1_duration,
            ProliferativeType::Transit | ProliferativeType::Default => {
                self.transit_cell_g1_duration
            }
            ProliferativeType::Differentiated => f64::INFINITY,
        }
    }

    /// Length of one full cycle given the G1 duration
    pub fn total_with_g1(&self, g1_duration: f64) -> f64 {
        self.m_duration + g1_duration + self.s_duration + self.g2_duration
    }

    /// Parameters in the order in which they are reported to result writers
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("StemCellG1Duration", self.stem_cell_g1_duration),
            ("TransitCellG1Duration", self.transit_cell_g1_duration),
            ("SDuration", self.s_duration),
            ("G2Duration", self.g2_duration),
            ("MDuration", self.m_duration),
            ("MinimumGapDuration", self.minimum_gap_duration),
        ]
    }
}
