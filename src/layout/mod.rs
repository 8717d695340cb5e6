//! Layout stages: instantiation, connection graph, coordinate solving,
//! consistency checks and the fallback grid for unreachable maps.

pub mod graph;
pub mod grid;
pub mod instantiate;
pub mod solver;
pub mod validate;

pub use graph::ConnectionGraph;
pub use grid::grid_layout;
pub use instantiate::{instantiate_all, instantiate_map, InstantiateStats};
pub use solver::{apply_placement, neighbor_offset, CoordinateSolver, Placement, PlacementState};
pub use validate::{find_offset_conflicts, OffsetConflict};
