//! The ecomap graph: typed nodes, typed relations, and the builder that
//! derives both from a record-set.

mod builder;
mod node;
mod nodes;
mod relation;
mod relations;

pub use builder::*;
pub use node::*;
pub use nodes::*;
pub use relation::*;
pub use relations::*;
