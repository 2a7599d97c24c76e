use wasm_bindgen::JsValue;
use web_sys::{console, Document};

use crate::config::Config;

/// Element holding optional JSON overrides for [`Config`].
pub const CONFIG_ELEMENT_ID: &str = "rain-config";

pub fn set_panic_hook() {
    // When the `console_error_panic_hook` feature is enabled, we can call the
    // `set_panic_hook` function at least once during initialization, and then
    // we will get better error messages if our code ever panics.
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// Everything is let through here, `Config::log_level` narrows it afterwards
pub fn init_logging() {
    if console_log::init_with_level(log::Level::Trace).is_err() {
        log::warn!("logger already initialised");
    }
}

/// Reads `<script type="application/json" id="rain-config">`. A missing
/// element means defaults; a malformed one is reported and ignored.
pub fn load_config(document: &Document) -> Config {
    let json = match document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|element| element.text_content())
    {
        Some(json) if !json.trim().is_empty() => json,
        _ => return Config::default(),
    };
    match Config::from_json(&json) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("ignoring #{}: {}", CONFIG_ELEMENT_ID, err);
            Config::default()
        }
    }
}

pub fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

pub struct Timer<'a> {
    name: &'a str,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        console::time_with_label(name);
        Timer { name }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        console::time_end_with_label(self.name);
    }
}
