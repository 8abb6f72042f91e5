#![deny(missing_docs)]
//! # cellcycle - Core
//!
//! Reference implementations of the services consumed by cell-cycle models together with a
//! small sequential driver.
//!
//! - [time::FixedStepClock] advances the simulated time with a fixed step.
//! - [cell::SimpleCell] carries scalar data items and a
//!   [CellPropertyCollection](cell::CellPropertyCollection) of labels.
//! - [population::Population] owns cells and their models and performs divisions.
//! - [simulation::run_simulation] ties everything together given some
//!   [Settings](simulation::Settings).

pub mod cell;
pub mod population;
pub mod simulation;
pub mod time;
