use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier tying a command run to its task.
///
/// The id travels with every outbound request (see
/// [`TASK_ID_HEADER`](crate::TASK_ID_HEADER)) so the counter service's
/// logs can be correlated with the agent's.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ids_are_distinct() {
        assert_ne!(TaskId::random(), TaskId::random());
    }

    #[test]
    fn task_id_serializes_transparently() {
        let id = TaskId::from("task-1");
        let json = serde_json::to_string(&id).unwrap();

        assert_eq!(json, r#""task-1""#);
    }

    #[test]
    fn task_id_displays_raw_value() {
        let id = TaskId::from("task-2");

        assert_eq!(id.to_string(), "task-2");
    }
}
