//! Phase based cell-cycle models
//!
//! Every model is a [PhaseBasedCellCycleModel] combined with a [DurationStrategy] which decides
//! how the phase durations evolve:
//!
//! | Strategy | Effect |
//! |---|---|
//! | [FixedDurations] | Configured durations are used as they are |
//! | [ContactInhibition] | G1 is extended while the cell is compressed |
//! | [SimpleOxygen] | G1 is extended under low oxygen, hypoxic cells may die |
//! | [StochasticOxygen] | [SimpleOxygen] with a normally distributed G2 duration |
//! | `(A, B)` | Both strategies applied by delegation |

mod contact_inhibition;
mod durations;
mod oxygen;
mod phase_based;

pub use contact_inhibition::*;
pub use durations::*;
pub use oxygen::*;
pub use phase_based::*;
