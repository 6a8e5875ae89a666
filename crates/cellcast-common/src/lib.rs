pub mod location;
pub mod tree;
pub mod value;

pub use location::*;
pub use tree::*;
pub use value::*;
