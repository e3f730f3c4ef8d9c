//! ID generation utilities.

use uuid::Uuid;

/// Generates a new time-ordered identifier as a string.
///
/// Used for workspace ids, tab ids and editor request ids. None of these
/// are related to each other or to data-store ids.
#[must_use]
pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}
