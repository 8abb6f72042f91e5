#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
//! # cellcycle - Building Blocks
//!
//! Building blocks provide ready-made cell-cycle models.
//! A model combines the phase state machine [PhaseBasedCellCycleModel](prelude::PhaseBasedCellCycleModel)
//! with a [DurationStrategy](prelude::DurationStrategy) which controls how the durations of the
//! individual phases are obtained.
//! ```rust
//! # use cellcycle_building_blocks::prelude::*;
//! # struct Clock0;
//! # impl Clock for Clock0 {
//! #     fn now(&self) -> f64 { 0.0 }
//! #     fn time_step(&self) -> f64 { 1.0 }
//! # }
//! # let clock = Clock0;
//! let model = PhaseBasedCellCycleModel::new(
//!     PhaseDurations::default(),
//!     (
//!         ContactInhibition::with_parameters(0.8, 1.0, &clock),
//!         StochasticOxygen::new(&clock),
//!     ),
//!     &clock,
//! );
//! assert_eq!(model.current_phase(), CellCyclePhase::M);
//! ```
//! Models are only live after [initialise](cellcycle_concepts::CellCycleModel::initialise) was
//! called. Updating a model before that or with missing parameters yields a
//! [ConfigurationError](cellcycle_concepts::ConfigurationError).

/// Construct cells from individual components
pub mod cell_building_blocks;

/// Handy re-exports of every building block.
pub mod prelude;
