#![deny(missing_docs)]
//! # cellcycle
//!
//! Phase-based cell-cycle models which decide when a cell in an agent-based tissue simulation
//! progresses through the phases
//! \\[
//!     M \rightarrow G_1 \rightarrow S \rightarrow G_2 \rightarrow \text{division}
//! \\]
//! and when it divides.
//!
//! | Crate | Contents |
//! | --- | --- |
//! | [concepts] | [CellCycleModel](concepts::CellCycleModel) trait, phases, labels, errors |
//! | [building_blocks] | [PhaseBasedCellCycleModel](building_blocks::PhaseBasedCellCycleModel) with duration strategies |
//! | [core] | clock, cells, population driver and [run_simulation](core::simulation::run_simulation) |
//!
//! ## Example
//! ```
//! use cellcycle::prelude::*;
//!
//! let settings = Settings::from_ron_str("(t0: 0.0, dt: 1.0, t_max: 30.0, rng_seed: 0)")?;
//! let clock = settings.clock()?;
//! let durations = PhaseDurations {
//!     transit_cell_g1_duration: 10.0,
//!     ..Default::default()
//! };
//! let cell = SimpleCell::new(ProliferativeType::Transit).with_data("volume", 1.0);
//! let mut model = ContactInhibitionCellCycleModel::contact_inhibited(durations, &clock);
//! model.strategy_mut().set_quiescent_volume_fraction(0.8);
//! model.strategy_mut().set_equilibrium_volume(1.0);
//!
//! let population = run_simulation(&settings, [(cell, model)], |_, _| {})?;
//! // One full cycle lasts 1 + 10 + 5 + 4 = 20 time units
//! assert_eq!(population.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Features
//! - `tracing` instruments updates and divisions with the [tracing](https://docs.rs/tracing)
//!   crate.

pub use cellcycle_building_blocks as building_blocks;

pub use cellcycle_concepts as concepts;

pub use cellcycle_core as core;

/// Re-exports the default simulation types and traits.
pub mod prelude;
