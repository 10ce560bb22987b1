use wasm_bindgen::prelude::*;
use serde::Serialize;
use crate::engine::DesignEngine;
use crate::types::Template;

/// Save/update payload for the project persistence backend. `elements` is the
/// wholesale collection; no partial persistence.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload<'a> {
    pub title: &'a str,
    #[serde(rename = "type")]
    pub project_type: &'static str,
    pub template_id: &'a str,
    pub elements: &'a [crate::element::Element],
    pub user_id: &'a str,
}

#[wasm_bindgen]
impl DesignEngine {
    /// Replaces the document with a template's elements, assigning generated
    /// ids, and clears selection. Returns `{"success": …}` with the element
    /// count or an error object for malformed JSON.
    pub fn load_template(&mut self, template_json: &str) -> String {
        let template: Template = match serde_json::from_str(template_json) {
            Ok(t) => t,
            Err(e) => return format!("{{\"error\": \"Invalid template: {}\"}}", e),
        };
        self.elements.clear();
        self.selected_id = None;
        self.text_widths.clear();
        self.template_id = template.id;
        self.template_name = template.name;
        self.category = template.category;
        for mut el in template.elements {
            el.id = 0; // template seeds never carry authoritative ids
            self.add_element(el);
        }
        format!("{{\"success\": true, \"elements\": {}}}", self.elements.len())
    }

    /// Serialized save/update payload for the backend.
    pub fn save_payload(&self, title: &str, user_id: &str) -> String {
        let payload = ProjectPayload {
            title,
            project_type: "invitation",
            template_id: &self.template_id,
            elements: &self.elements,
            user_id,
        };
        serde_json::to_string(&payload).unwrap_or_else(|_| "{}".to_string())
    }

    /// Download filename derived from the template name.
    pub fn export_filename(&self) -> String {
        let slug: Vec<String> = self
            .template_name
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        format!("wedding-invitation-{}.png", slug.join("-"))
    }

    /// Snapshots the canvas as a PNG and offers it as a download through a
    /// synthesized anchor click.
    pub fn export_png(&self, canvas: &web_sys::HtmlCanvasElement) -> Result<(), JsValue> {
        use wasm_bindgen::JsCast;

        let url = canvas.to_data_url()?;
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let anchor: web_sys::HtmlAnchorElement =
            document.create_element("a")?.unchecked_into();
        anchor.set_download(&self.export_filename());
        anchor.set_href(&url);
        anchor.click();
        Ok(())
    }
}
