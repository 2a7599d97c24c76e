// Projects section: one block per repository the backend lists.

use serde::Deserialize;

use super::markup::{escape, safe_href};
use super::{Content, Feed, Json};

pub const LOADING: &str = "Scanning active contracts database...";
pub const FAILURE: &str =
    "ERROR: Could not retrieve project data from GitHub. Network anomaly detected or API rate limit reached.";
pub const NO_PROJECTS: &str = "No active projects found. Initiate new contracts?";

const MISSING: &str = "N/A";
const NO_DESCRIPTION: &str = "No description available.";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

pub type ProjectsPayload = Json<Vec<Project>>;

pub fn feed() -> Feed<ProjectsPayload> {
    Feed {
        name: "projects",
        path: "/api/projects",
        container_id: "projects-output",
        loading: LOADING,
        failure: FAILURE,
        render,
    }
}

/// Calendar day of an ISO-8601 timestamp, `N/A` when absent or unparseable.
pub fn display_date(last_updated: Option<&str>) -> String {
    let raw = match last_updated.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return MISSING.to_owned(),
    };
    let (day, rest) = match (raw.get(..10), raw.get(10..)) {
        (Some(day), Some(rest)) => (day, rest),
        _ => return MISSING.to_owned(),
    };
    let looks_like_date = day.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    });
    if looks_like_date && (rest.is_empty() || rest.starts_with('T') || rest.starts_with(' ')) {
        day.to_owned()
    } else {
        MISSING.to_owned()
    }
}

fn or_default<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => fallback,
    }
}

pub fn project_block(project: &Project) -> String {
    format!(
        concat!(
            r#"<div class="border-b border-gray-700 pb-2">"#,
            r#"<h4 class="text-xl font-bold text-neon-green">"#,
            r#"Project: <a href="{href}" target="_blank" rel="noopener noreferrer" class="text-electric-blue hover:text-hot-pink no-underline">{title}</a> "#,
            r#"<span class="text-gray-500 text-sm">// Language: {language} // Last Update: {updated}</span>"#,
            r#"</h4>"#,
            r#"<p class="text-base text-gray-400">{description}</p>"#,
            r#"</div>"#
        ),
        href = safe_href(&project.url),
        title = escape(&project.title),
        language = escape(or_default(&project.language, MISSING)),
        updated = display_date(project.last_updated.as_deref()),
        description = escape(or_default(&project.description, NO_DESCRIPTION)),
    )
}

fn render(Json(projects): ProjectsPayload) -> Content {
    if projects.is_empty() {
        return Content::Notice(NO_PROJECTS.to_owned());
    }
    Content::Html(projects.iter().map(project_block).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feeds::markup::text_content;
    use crate::feeds::testing::{run, CannedTransport};

    const TWO_PROJECTS: &str = r#"[
        {"title": "neon-city", "url": "https://github.com/u/neon-city", "language": "Java",
         "description": "Portfolio backend", "last_updated": "2024-05-01T12:34:56Z"},
        {"title": "rain", "url": "https://github.com/u/rain", "language": "Rust",
         "description": "Digital rain"}
    ]"#;

    #[test]
    fn test_empty_listing_shows_exact_notice() {
        let section = run(&CannedTransport::ok(200, "[]"), &feed());
        assert_eq!(section.last(), Content::Notice(NO_PROJECTS.to_owned()));
    }

    #[test]
    fn test_one_block_per_project() {
        let section = run(&CannedTransport::ok(200, TWO_PROJECTS), &feed());
        let html = match section.last() {
            Content::Html(html) => html,
            other => panic!("expected markup, got {:?}", other),
        };
        assert_eq!(html.matches("<div ").count(), 2);
        assert!(html.contains(r#"href="https://github.com/u/neon-city""#));
        assert!(html.contains(r#"target="_blank""#));

        let text = text_content(&html);
        assert!(text.contains("Project: neon-city // Language: Java // Last Update: 2024-05-01"));
        assert!(text.contains("Portfolio backend"));
        assert!(text.contains("Project: rain // Language: Rust // Last Update: N/A"));
        assert!(text.find("neon-city").unwrap() < text.find("Digital rain").unwrap());
    }

    #[test]
    fn test_missing_optional_fields() {
        let project: Project =
            serde_json::from_str(r#"{"title":"t","url":"javascript:void(0)","language":null}"#)
                .unwrap();
        let text = text_content(&project_block(&project));
        assert!(text.contains("Language: N/A"));
        assert!(text.contains(NO_DESCRIPTION));
        assert!(project_block(&project).contains(r##"href="#""##));
    }

    #[test]
    fn test_missing_title_is_failure() {
        let section = run(&CannedTransport::ok(200, r#"[{"url": "https://x"}]"#), &feed());
        assert_eq!(section.last(), Content::Failure(FAILURE.to_owned()));
    }

    #[test]
    fn test_server_error_shows_fixed_message() {
        let section = run(&CannedTransport::ok(500, "[]"), &feed());
        assert_eq!(section.last(), Content::Failure(FAILURE.to_owned()));
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date(Some("2023-11-30T08:00:00Z")), "2023-11-30");
        assert_eq!(display_date(Some("2023-11-30")), "2023-11-30");
        assert_eq!(display_date(Some("2023-11-30 08:00")), "2023-11-30");
        assert_eq!(display_date(Some("")), "N/A");
        assert_eq!(display_date(Some("yesterday")), "N/A");
        assert_eq!(display_date(Some("2023-1-300000")), "N/A");
        assert_eq!(display_date(None), "N/A");
    }
}
