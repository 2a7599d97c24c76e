use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, Response, Window};

use super::{Content, Reply, RequestError, Section, Transport};
use crate::utils::describe;

/// `window.fetch` with a plain GET.
pub struct BrowserTransport {
    window: Window,
}

impl BrowserTransport {
    pub fn new(window: Window) -> Self {
        BrowserTransport { window }
    }
}

impl Transport for BrowserTransport {
    async fn get(&self, url: &str) -> Result<Reply, RequestError> {
        let response = JsFuture::from(self.window.fetch_with_str(url))
            .await
            .map_err(|err| RequestError::Network(describe(&err)))?;
        let response: Response = response
            .dyn_into()
            .map_err(|err| RequestError::Network(describe(&err)))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|err| RequestError::Body(describe(&err)))?;
        let body = JsFuture::from(text)
            .await
            .map_err(|err| RequestError::Body(describe(&err)))?
            .as_string()
            .ok_or_else(|| RequestError::Body("response text is not a string".to_owned()))?;

        Ok(Reply { status, body })
    }
}

pub struct ElementSection {
    element: Element,
}

impl ElementSection {
    pub fn new(element: Element) -> Self {
        ElementSection { element }
    }
}

impl Section for ElementSection {
    fn show(&self, content: Content) {
        match content {
            Content::Text(text) => self.element.set_text_content(Some(&text)),
            other => self.element.set_inner_html(&other.to_html()),
        }
    }
}
