use std::ops::Range;

use regex::Regex;

use crate::model::forest::Forest;
use crate::model::task::Task;

/// A task whose name matched
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub group_id: String,
    pub task_id: String,
    /// Names from the group down to the task's parent
    pub path: Vec<String>,
    pub name: String,
    pub spans: Vec<Range<usize>>,
}

/// Search task names across every group, in tree order.
pub fn search_tasks(forest: &Forest, re: &Regex) -> Vec<SearchHit> {
    let mut hits = Vec::new();
    for group in &forest.groups {
        let mut path = vec![group.name.clone()];
        search_list(re, &group.id, &group.tasks, &mut path, &mut hits);
    }
    hits
}

fn search_list(
    re: &Regex,
    group_id: &str,
    tasks: &[Task],
    path: &mut Vec<String>,
    hits: &mut Vec<SearchHit>,
) {
    for task in tasks {
        let spans: Vec<Range<usize>> = re
            .find_iter(&task.name)
            .map(|m| m.start()..m.end())
            .collect();
        if !spans.is_empty() {
            hits.push(SearchHit {
                group_id: group_id.to_string(),
                task_id: task.id.clone(),
                path: path.clone(),
                name: task.name.clone(),
                spans,
            });
        }
        path.push(task.name.clone());
        search_list(re, group_id, &task.tasks, path, hits);
        path.pop();
    }
}
