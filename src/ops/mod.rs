pub mod check;
pub mod group_ops;
pub mod search;
pub mod tree_ops;
