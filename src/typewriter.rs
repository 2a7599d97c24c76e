// Headline typing effect: the `.typing-text` element is emptied and its
// initial text typed back one character at a time.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

use crate::utils::describe;

pub const SELECTOR: &str = ".typing-text";
pub const CHAR_DELAY_MS: i32 = 100;
pub const START_DELAY_MS: i32 = 500;
const CURSOR_CLASS: &str = "animate-typing";

pub struct Typewriter {
    chars: Vec<char>,
    typed: usize,
}

impl Typewriter {
    pub fn new(text: &str) -> Typewriter {
        Typewriter {
            chars: text.chars().collect(),
            typed: 0,
        }
    }

    /// Text to show after typing one more character, `None` once complete.
    pub fn next_frame(&mut self) -> Option<String> {
        if self.is_done() {
            return None;
        }
        self.typed += 1;
        Some(self.chars[..self.typed].iter().collect())
    }

    pub fn is_done(&self) -> bool {
        self.typed >= self.chars.len()
    }
}

/// Clears the headline and schedules the effect; a page without the
/// element is left untouched.
pub fn start(window: &Window, document: &Document) {
    let element = match document.query_selector(SELECTOR) {
        Ok(Some(element)) => element,
        Ok(None) => return,
        Err(err) => {
            log::warn!("bad selector {}: {}", SELECTOR, describe(&err));
            return;
        }
    };
    let element = match element.dyn_into::<HtmlElement>() {
        Ok(element) => element,
        Err(_) => {
            log::warn!("{} is not an HTML element, skipping typing effect", SELECTOR);
            return;
        }
    };

    let text = element.text_content().unwrap_or_default();
    element.set_text_content(Some(""));
    let mut typewriter = Typewriter::new(&text);

    // The step closure re-schedules itself through `f` until the text is out
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let step_window = window.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        match typewriter.next_frame() {
            Some(shown) => {
                element.set_text_content(Some(&shown));
                if let Some(step) = f.borrow().as_ref() {
                    schedule(&step_window, step, CHAR_DELAY_MS);
                }
            }
            None => finish(&element),
        }
    }) as Box<dyn FnMut()>));

    let first = g.borrow();
    if let Some(step) = first.as_ref() {
        schedule(window, step, START_DELAY_MS);
    }
    drop(first);
}

fn schedule(window: &Window, step: &Closure<dyn FnMut()>, delay_ms: i32) {
    let callback = step.as_ref().unchecked_ref();
    let scheduled =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(callback, delay_ms);
    if let Err(err) = scheduled {
        log::error!("setTimeout failed: {}", describe(&err));
    }
}

fn finish(element: &HtmlElement) {
    if let Err(err) = element.class_list().remove_1(CURSOR_CLASS) {
        log::warn!("could not remove {}: {}", CURSOR_CLASS, describe(&err));
    }
    if let Err(err) = element.style().set_property("border-right", "none") {
        log::warn!("could not clear cursor border: {}", describe(&err));
    }
}
