use wasm_bindgen::prelude::*;
use web_sys::HtmlImageElement;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use crate::element::{Element, approx_text_width, ElementKind};
use crate::input::DragState;
use crate::types::{Tool, CANVAS_WIDTH, CANVAS_HEIGHT};

/// Decoded-bitmap cache keyed by image source (URL or data URL). `pending`
/// holds sources whose decode has been kicked off but not completed;
/// `failed` holds sources whose decode errored and must not be retried.
#[derive(Default)]
pub struct ImageCache {
    pub loaded: HashMap<String, HtmlImageElement>,
    pub pending: HashSet<String>,
    pub failed: HashSet<String>,
}

#[wasm_bindgen]
pub struct DesignEngine {
    pub(crate) elements: Vec<Element>,
    pub(crate) next_id: u32,
    pub(crate) selected_id: Option<u32>,
    pub(crate) template_id: String,
    pub(crate) template_name: String,
    pub(crate) category: String,
    pub(crate) tool: Tool,
    pub(crate) drag: DragState,
    pub(crate) touch_input: bool,
    pub(crate) canvas_width: f64,
    pub(crate) canvas_height: f64,
    /// Measured string widths from the last render pass, by element id.
    pub(crate) text_widths: HashMap<u32, f64>,
    pub(crate) images: Rc<RefCell<ImageCache>>,
    /// Host callback invoked when an async image decode completes, so the
    /// page can schedule a repaint.
    pub(crate) on_image_loaded: Option<js_sys::Function>,
    /// Backend project id once the design has been saved; reused on update.
    pub(crate) project_id: Option<String>,
}

#[wasm_bindgen]
impl DesignEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> DesignEngine {
        console_error_panic_hook::set_once();
        #[cfg(target_arch = "wasm32")]
        let _ = console_log::init_with_level(log::Level::Info);

        DesignEngine {
            elements: Vec::new(),
            next_id: 1,
            selected_id: None,
            template_id: String::new(),
            template_name: String::new(),
            category: String::new(),
            tool: Tool::Select,
            drag: DragState::Idle,
            touch_input: false,
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            text_widths: HashMap::new(),
            images: Rc::new(RefCell::new(ImageCache::default())),
            on_image_loaded: None,
            project_id: None,
        }
    }

    pub fn canvas_width(&self) -> f64 { self.canvas_width }
    pub fn canvas_height(&self) -> f64 { self.canvas_height }

    pub fn element_count(&self) -> usize { self.elements.len() }

    pub fn selected_id(&self) -> Option<u32> { self.selected_id }

    pub fn select(&mut self, id: u32) -> bool {
        if self.elements.iter().any(|el| el.id == id) {
            self.selected_id = Some(id);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_id = None;
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn tool(&self) -> Tool { self.tool }

    /// Pointer precision hint from the host; widens hit-test padding.
    pub fn set_touch_input(&mut self, touch: bool) {
        self.touch_input = touch;
    }

    pub fn set_on_image_loaded(&mut self, callback: js_sys::Function) {
        self.on_image_loaded = Some(callback);
    }

    pub fn set_project_id(&mut self, id: String) {
        self.project_id = Some(id);
    }

    pub fn project_id(&self) -> Option<String> {
        self.project_id.clone()
    }

    pub fn template_id(&self) -> String { self.template_id.clone() }
    pub fn template_name(&self) -> String { self.template_name.clone() }
    pub fn category(&self) -> String { self.category.clone() }

    pub fn get_elements_json(&self) -> String {
        serde_json::to_string(&self.elements).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn get_selected_json(&self) -> String {
        self.selected_element()
            .and_then(|el| serde_json::to_string(el).ok())
            .unwrap_or_else(|| "null".to_string())
    }
}

impl DesignEngine {
    pub(crate) fn selected_element(&self) -> Option<&Element> {
        self.selected_id.and_then(|id| self.elements.iter().find(|el| el.id == id))
    }

    pub(crate) fn fresh_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Measured width of a text element's content, falling back to the glyph
    /// estimate before the first render has run.
    pub(crate) fn text_width(&self, el: &Element) -> f64 {
        match &el.kind {
            ElementKind::Text { content, font_size, .. } => self
                .text_widths
                .get(&el.id)
                .copied()
                .unwrap_or_else(|| approx_text_width(content, *font_size)),
            _ => 0.0,
        }
    }
}

impl Default for DesignEngine {
    fn default() -> Self {
        Self::new()
    }
}
