//! D8 hydrological flow routing and upstream accumulation over an
//! elevation grid treated as an implicit directed graph.
pub mod flow_accumulation;
pub mod flow_direction;

pub use flow_accumulation::flow_accumulation;
pub use flow_direction::{flow_direction, FlowDirectionGrid, D8_OFFSETS, SINK};
