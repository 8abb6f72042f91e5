pub use cellcycle_building_blocks::prelude::*;
pub use cellcycle_concepts::*;

pub use cellcycle_core::cell::*;
pub use cellcycle_core::population::*;
pub use cellcycle_core::simulation::*;
pub use cellcycle_core::time::*;
