pub mod executor;
pub mod graph;
pub mod memory_graph;
pub mod repositories;
pub mod seed;
pub mod statements;

pub use executor::*;
pub use graph::*;
pub use memory_graph::*;
pub use repositories::*;
pub use seed::*;
