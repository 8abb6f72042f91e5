pub use crate::cell_building_blocks::cycle::*;

pub use cellcycle_concepts::*;
