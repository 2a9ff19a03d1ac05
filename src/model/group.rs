use serde::{Deserialize, Serialize};

use super::node::Node;
use super::task::Task;

/// A root-level container holding its own task tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    /// Rank among all groups
    pub order: usize,
    pub is_open: bool,
    /// Root-level tasks, sorted by `order`
    pub tasks: Vec<Task>,
}

impl Group {
    pub fn new(id: String, name: String, order: usize) -> Self {
        Group {
            id,
            name,
            order,
            is_open: true,
            tasks: Vec::new(),
        }
    }
}

impl Node for Group {
    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> usize {
        self.order
    }

    fn set_order(&mut self, order: usize) {
        self.order = order;
    }

    fn set_open(&mut self, is_open: bool) {
        self.is_open = is_open;
    }

    fn rename(&mut self, name: String) {
        self.name = name;
    }
}
