// About-me section: the backend's plain-text CV, shown exactly as sent.

use super::{Content, Feed};

pub const LOADING: &str = "Retrieving personal data from secure archives...";
pub const FAILURE: &str = "ERROR: Could not retrieve personal data. Access denied.";

pub fn feed() -> Feed<String> {
    Feed {
        name: "about me",
        path: "/api/cv",
        container_id: "about-me-output",
        loading: LOADING,
        failure: FAILURE,
        render: Content::Text,
    }
}
