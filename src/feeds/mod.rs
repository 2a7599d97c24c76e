// Page sections filled from the backend.
//
// Every section goes through `load_section`: show a loading notice, GET the
// feed's endpoint, decode the body into the feed's payload type, render it.
// Any failure along the way (network, non-2xx status, undecodable body) is
// logged and replaced by the feed's fixed failure message; nothing reaches
// the caller and one feed failing never affects another.

mod browser;
pub mod markup;
pub mod profile;
pub mod projects;
pub mod status;

use serde::de::DeserializeOwned;
use thiserror::Error;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Window};

use crate::config::Config;

pub use browser::{BrowserTransport, ElementSection};

/// Why a request failed. All variants surface as the same "request failed"
/// message to the reader; they only differ in the log.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("network error: {0}")]
    Network(String),
    #[error("HTTP error! status: {0}")]
    Status(u16),
    #[error("unreadable body: {0}")]
    Body(String),
    #[error("malformed payload: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, url: &str) -> Result<Reply, RequestError>;
}

/// What a section currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Plain paragraph: loading and empty-state messages.
    Notice(String),
    /// Error paragraph.
    Failure(String),
    /// Shown verbatim as text, whitespace preserved by the page's styling.
    Text(String),
    /// Markup built by a feed renderer; all interpolated text is escaped.
    Html(String),
}

impl Content {
    pub fn to_html(&self) -> String {
        match self {
            Content::Notice(message) => format!("<p>{}</p>", markup::escape(message)),
            Content::Failure(message) => {
                format!(r#"<p class="text-red-500">{}</p>"#, markup::escape(message))
            }
            Content::Text(text) => markup::escape(text),
            Content::Html(html) => html.clone(),
        }
    }
}

/// A page container a feed writes into.
pub trait Section {
    fn show(&self, content: Content);
}

/// Expected body shape of a feed.
pub trait Payload: Sized {
    fn decode(body: &str) -> Result<Self, RequestError>;
}

impl Payload for String {
    fn decode(body: &str) -> Result<Self, RequestError> {
        Ok(body.to_owned())
    }
}

/// JSON body deserialized into `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct Json<T>(pub T);

impl<T: DeserializeOwned> Payload for Json<T> {
    fn decode(body: &str) -> Result<Self, RequestError> {
        Ok(Json(serde_json::from_str(body)?))
    }
}

pub struct Feed<P> {
    pub name: &'static str,
    pub path: &'static str,
    /// Id of the page element the feed renders into.
    pub container_id: &'static str,
    pub loading: &'static str,
    pub failure: &'static str,
    pub render: fn(P) -> Content,
}

pub async fn load_section<T, S, P>(transport: &T, section: &S, url: &str, feed: &Feed<P>)
where
    T: Transport,
    S: Section,
    P: Payload,
{
    section.show(Content::Notice(feed.loading.to_owned()));
    match fetch_payload::<T, P>(transport, url).await {
        Ok(payload) => {
            log::debug!("{} feed loaded from {}", feed.name, url);
            section.show((feed.render)(payload));
        }
        Err(err) => {
            log::error!("Error fetching {}: {}", feed.name, err);
            section.show(Content::Failure(feed.failure.to_owned()));
        }
    }
}

async fn fetch_payload<T: Transport, P: Payload>(
    transport: &T,
    url: &str,
) -> Result<P, RequestError> {
    let reply = transport.get(url).await?;
    if !reply.is_success() {
        return Err(RequestError::Status(reply.status));
    }
    P::decode(&reply.body)
}

/// Starts all three feeds; each runs on its own and never blocks the page.
pub fn spawn_all(window: &Window, document: &Document, config: &Config) {
    spawn_feed(window, document, config, status::feed());
    spawn_feed(window, document, config, profile::feed());
    spawn_feed(window, document, config, projects::feed());
}

fn spawn_feed<P: Payload + 'static>(
    window: &Window,
    document: &Document,
    config: &Config,
    feed: Feed<P>,
) {
    let element = match document.get_element_by_id(feed.container_id) {
        Some(element) => element,
        None => {
            log::warn!("no #{} on this page, skipping {} feed", feed.container_id, feed.name);
            return;
        }
    };
    let transport = BrowserTransport::new(window.clone());
    let section = ElementSection::new(element);
    let url = config.endpoint(feed.path);

    spawn_local(async move {
        load_section(&transport, &section, &url, &feed).await;
    });
}
