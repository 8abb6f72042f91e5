#![deny(missing_docs)]
//! This crate encapsulates the concepts which govern phase based cell-cycle models as
//! implemented by [cellcycle](https://docs.rs/cellcycle).
//!
//! Cell-cycle models never own the services they depend on. The simulated [Clock], the single
//! [RandomStream], the data of the [CellEntity] and its [LabelRegistry] are handed to every
//! operation of a [CellCycleModel].

mod cell;
mod cycle;
mod errors;
mod random;
mod time;

pub use cell::*;
pub use cycle::*;
pub use errors::*;
pub use random::*;
pub use time::*;
