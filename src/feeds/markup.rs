// Escaping for text interpolated into section markup.

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Only http(s) and page-relative links survive; anything else becomes `#`.
pub fn safe_href(url: &str) -> String {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    let allowed = lower.starts_with("https://")
        || lower.starts_with("http://")
        || (trimmed.starts_with('/') && !trimmed.starts_with("//"))
        || trimmed.starts_with('#');
    if allowed {
        escape(trimmed)
    } else {
        "#".to_owned()
    }
}

#[cfg(test)]
pub(crate) fn text_content(html: &str) -> String {
    let mut out = String::new();
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape("plain 12%"), "plain 12%");
    }

    #[test]
    fn test_safe_href() {
        assert_eq!(safe_href("https://github.com/a/b"), "https://github.com/a/b");
        assert_eq!(safe_href("/local?a=1&b=2"), "/local?a=1&amp;b=2");
        assert_eq!(safe_href("#"), "#");
        assert_eq!(safe_href("javascript:alert(1)"), "#");
        assert_eq!(safe_href("//evil.example"), "#");
    }

    #[test]
    fn test_text_content_strips_tags() {
        assert_eq!(text_content("<p><b>A:</b> 1 &amp; 2</p>"), "A: 1 & 2");
    }
}
