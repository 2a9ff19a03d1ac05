pub mod config;
pub mod forest;
pub mod group;
pub mod node;
pub mod task;

pub use config::*;
pub use forest::*;
pub use group::*;
pub use node::Node;
pub use task::*;
