pub mod assignee;
pub mod errors;
pub mod identifiers;
pub mod todo;

pub use assignee::*;
pub use errors::*;
pub use identifiers::*;
pub use todo::*;
