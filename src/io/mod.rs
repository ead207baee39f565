//! Instance input.
//!
//! - [`reader`] - GVRP text format (`NODE_COORD_SECTION`, `GVRP_SET_SECTION`, `DEMAND_SECTION`)

pub mod reader;

pub use reader::{parse_instance, read_instance_file, GvrpInstance, ReadError};
