use crate::model::forest::Forest;

/// What kind of node an id argument must name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Group,
    Task,
    Any,
}

impl std::fmt::Display for IdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdKind::Group => write!(f, "group"),
            IdKind::Task => write!(f, "task"),
            IdKind::Any => write!(f, "group or task"),
        }
    }
}

/// Error type for id arguments
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IdError {
    #[error("no {kind} matches '{prefix}'")]
    NoMatch { kind: IdKind, prefix: String },
    #[error("'{prefix}' is ambiguous: matches {count} {kind} ids")]
    Ambiguous {
        kind: IdKind,
        prefix: String,
        count: usize,
    },
}

/// Expand a full id or unique id prefix to the full id.
pub fn resolve_id(forest: &Forest, prefix: &str, kind: IdKind) -> Result<String, IdError> {
    let is_group = |id: &str| forest.group(id).is_some();
    let candidates: Vec<&str> = forest
        .all_ids()
        .into_iter()
        .filter(|id| match kind {
            IdKind::Group => is_group(*id),
            IdKind::Task => !is_group(*id),
            IdKind::Any => true,
        })
        .collect();

    if let Some(exact) = candidates.iter().find(|id| **id == prefix) {
        return Ok(exact.to_string());
    }
    let matches: Vec<&str> = candidates
        .into_iter()
        .filter(|id| !prefix.is_empty() && id.starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [only] => Ok(only.to_string()),
        [] => Err(IdError::NoMatch {
            kind,
            prefix: prefix.to_string(),
        }),
        many => Err(IdError::Ambiguous {
            kind,
            prefix: prefix.to_string(),
            count: many.len(),
        }),
    }
}
