// Client-side stores
//
// In-memory caches of last-fetched server state. Mutations are mirrored
// optimistically: after a successful call the store patches only the matching
// local record by id and never re-fetches, so the cache can drift from server
// truth when the authoritative result differs. That drift is accepted.

mod habits;
mod tasks;

pub use habits::{HabitsStore, TagBadge};
pub use tasks::{FlatTask, TasksStore};

/// Outcome of a store action: the `{success, error}` contract the web
/// client's UI layer consumes. Failures are also recorded on the store's
/// `last_error`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionResult {
    pub success: bool,
    pub error: Option<String>,
}

impl ActionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}
