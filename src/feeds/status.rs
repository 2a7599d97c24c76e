// System status section: a flat JSON object shown as `KEY: value` lines,
// in the order the backend sent the keys.

use std::fmt;

use serde_json::{Map, Value};

use super::markup::escape;
use super::{Content, Feed, Json};

pub const LOADING: &str = "Connecting to neural network...";
pub const FAILURE: &str =
    "ERROR: Could not connect to backend. Is the server running? Check console for details.";

pub type StatusPayload = Json<Map<String, Value>>;

pub fn feed() -> Feed<StatusPayload> {
    Feed {
        name: "system status",
        path: "/api/status",
        container_id: "system-status-output",
        loading: LOADING,
        failure: FAILURE,
        render,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub key: String,
    pub value: String,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.value)
    }
}

pub fn status_lines(status: &Map<String, Value>) -> Vec<StatusLine> {
    status
        .iter()
        .map(|(key, value)| StatusLine {
            key: key.to_uppercase(),
            value: match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            },
        })
        .collect()
}

fn render(Json(status): StatusPayload) -> Content {
    let html = status_lines(&status)
        .iter()
        .map(|line| {
            format!(
                r#"<p><span class="text-neon-green">{}:</span> {}</p>"#,
                escape(&line.key),
                escape(&line.value)
            )
        })
        .collect::<String>();
    Content::Html(html)
}
