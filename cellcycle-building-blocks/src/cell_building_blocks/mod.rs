/// Collection of cell cycles
pub mod cycle;
