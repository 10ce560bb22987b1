use wasm_bindgen::prelude::*;
use serde::Deserialize;
use crate::engine::DesignEngine;
use crate::element::{Element, ElementKind};
use crate::types::{ShapeKind, BorderStyle, TextAlign, Tool};

/// Offset applied to a duplicated element so the copy is visibly distinct.
pub const DUPLICATE_OFFSET: f64 = 20.0;

#[wasm_bindgen]
impl DesignEngine {
    /// JSON command surface for the host page. Commands mirror the store
    /// operations; replies are `{"success": …}` / `{"error": …}` objects.
    pub fn execute_command(&mut self, cmd_json: &str) -> String {
        #[derive(Deserialize)]
        struct Command {
            action: String,
            #[serde(default)]
            params: serde_json::Value,
        }

        let cmd: Command = match serde_json::from_str(cmd_json) {
            Ok(c) => c,
            Err(e) => return format!("{{\"error\": \"Invalid JSON: {}\"}}", e),
        };

        match cmd.action.as_str() {
            "add" => match serde_json::from_value::<Element>(cmd.params.clone()) {
                Ok(el) => {
                    let id = self.add_element(el);
                    self.selected_id = Some(id);
                    self.tool = Tool::Select;
                    format!("{{\"success\": true, \"id\": {}}}", id)
                }
                Err(e) => format!("{{\"error\": \"Invalid element: {}\"}}", e),
            },
            "add_text" => {
                let x = cmd.params["x"].as_f64().unwrap_or(self.canvas_width / 2.0);
                let y = cmd.params["y"].as_f64().unwrap_or(self.canvas_height / 2.0);
                let id = self.fresh_id();
                self.add_element(Element::new_text(id, x, y));
                self.selected_id = Some(id);
                self.tool = Tool::Select;
                format!("{{\"success\": true, \"id\": {}}}", id)
            }
            "add_shape" => {
                let shape = match cmd.params["shapeType"].as_str() {
                    Some("circle") => ShapeKind::Circle,
                    Some("ellipse") => ShapeKind::Ellipse,
                    Some("triangle") => ShapeKind::Triangle,
                    Some("diamond") => ShapeKind::Diamond,
                    Some("heart") => ShapeKind::Heart,
                    Some("star") => ShapeKind::Star,
                    Some("hexagon") => ShapeKind::Hexagon,
                    _ => ShapeKind::Rectangle,
                };
                let x = cmd.params["x"].as_f64().unwrap_or(self.canvas_width / 2.0);
                let y = cmd.params["y"].as_f64().unwrap_or(self.canvas_height / 2.0);
                let id = self.fresh_id();
                self.add_element(Element::new_shape(id, shape, x, y));
                self.selected_id = Some(id);
                self.tool = Tool::Select;
                format!("{{\"success\": true, \"id\": {}}}", id)
            }
            "add_border" => {
                let x = cmd.params["x"].as_f64().unwrap_or(self.canvas_width / 2.0);
                let y = cmd.params["y"].as_f64().unwrap_or(self.canvas_height / 2.0);
                let id = self.fresh_id();
                self.add_element(Element::new_border(id, x, y));
                self.selected_id = Some(id);
                self.tool = Tool::Select;
                format!("{{\"success\": true, \"id\": {}}}", id)
            }
            "update" => {
                let id = cmd.params["id"].as_u64().map(|v| v as u32).unwrap_or(0);
                if self.update_element(id, &cmd.params) {
                    "{ \"success\": true }".to_string()
                } else {
                    "{ \"error\": \"Element not found\" }".to_string()
                }
            }
            "delete" => {
                let id = cmd.params["id"].as_u64().map(|v| v as u32).unwrap_or(0);
                if self.remove_element(id) {
                    "{ \"success\": true }".to_string()
                } else {
                    "{ \"error\": \"Element not found\" }".to_string()
                }
            }
            "duplicate" => {
                let id = cmd.params["id"].as_u64().map(|v| v as u32).unwrap_or(0);
                match self.duplicate_element(id) {
                    Some(new_id) => format!("{{\"success\": true, \"id\": {}}}", new_id),
                    None => "{ \"error\": \"Element not found\" }".to_string(),
                }
            }
            "select" => {
                match cmd.params["id"].as_u64() {
                    Some(id) if self.select(id as u32) => {}
                    _ => self.clear_selection(),
                }
                "{ \"success\": true }".to_string()
            }
            "set_tool" => {
                self.tool = match cmd.params["tool"].as_str() {
                    Some("text") => Tool::Text,
                    _ => Tool::Select,
                };
                "{ \"success\": true }".to_string()
            }
            "clear" => {
                self.elements.clear();
                self.selected_id = None;
                self.text_widths.clear();
                "{ \"success\": true }".to_string()
            }
            "get_elements" => self.get_elements_json(),
            _ => format!("{{\"error\": \"Unknown action: {}\"}}", cmd.action),
        }
    }
}

impl DesignEngine {
    /// Appends the element (topmost, highest hit-test priority) and returns
    /// its id. An element arriving with id 0 gets a generated one.
    pub fn add_element(&mut self, mut element: Element) -> u32 {
        if element.id == 0 || self.elements.iter().any(|el| el.id == element.id) {
            element.id = self.fresh_id();
        } else {
            self.next_id = self.next_id.max(element.id + 1);
        }
        let id = element.id;
        self.elements.push(element);
        id
    }

    /// Merges kind-appropriate fields from `params` into the element. Unknown
    /// id is a no-op (`false`); the `type` tag of an element never changes.
    pub fn update_element(&mut self, id: u32, params: &serde_json::Value) -> bool {
        let Some(el) = self.elements.iter_mut().find(|el| el.id == id) else {
            return false;
        };
        if let Some(v) = params["x"].as_f64() { el.x = v; }
        if let Some(v) = params["y"].as_f64() { el.y = v; }

        match &mut el.kind {
            ElementKind::Text { content, font_size, font_family, color, bold, italic, underline, align } => {
                if let Some(v) = params["content"].as_str() { *content = v.to_string(); }
                if let Some(v) = params["fontSize"].as_f64() { *font_size = v; }
                if let Some(v) = params["fontFamily"].as_str() { *font_family = v.to_string(); }
                if let Some(v) = params["color"].as_str() { *color = v.to_string(); }
                if let Some(v) = params["bold"].as_bool() { *bold = v; }
                if let Some(v) = params["italic"].as_bool() { *italic = v; }
                if let Some(v) = params["underline"].as_bool() { *underline = v; }
                if let Some(v) = params["align"].as_str() {
                    *align = match v {
                        "left" => TextAlign::Left,
                        "right" => TextAlign::Right,
                        _ => TextAlign::Center,
                    };
                }
                // Content or font edits invalidate the cached measurement.
                self.text_widths.remove(&id);
            }
            ElementKind::Image { src, width, height } => {
                if let Some(v) = params["src"].as_str() { *src = v.to_string(); }
                if let Some(v) = params["width"].as_f64() { *width = v; }
                if let Some(v) = params["height"].as_f64() { *height = v; }
            }
            ElementKind::Shape { shape, width, height, fill, border_color, border_width, border_style } => {
                if let Some(v) = params["shapeType"].as_str() {
                    if let Ok(kind) = serde_json::from_value::<ShapeKind>(serde_json::Value::String(v.to_string())) {
                        *shape = kind;
                    }
                }
                if let Some(v) = params["width"].as_f64() { *width = v; }
                if let Some(v) = params["height"].as_f64() { *height = v; }
                if let Some(v) = params["fillColor"].as_str() { *fill = v.to_string(); }
                if let Some(v) = params["borderColor"].as_str() { *border_color = v.to_string(); }
                if let Some(v) = params["borderWidth"].as_f64() { *border_width = v; }
                if let Some(v) = params["borderStyle"].as_str() {
                    *border_style = if v == "dashed" { BorderStyle::Dashed } else { BorderStyle::Solid };
                }
            }
            ElementKind::Border { width, height, border_color, border_width, border_style, corner_radius, fill } => {
                if let Some(v) = params["width"].as_f64() { *width = v; }
                if let Some(v) = params["height"].as_f64() { *height = v; }
                if let Some(v) = params["borderColor"].as_str() { *border_color = v.to_string(); }
                if let Some(v) = params["borderWidth"].as_f64() { *border_width = v; }
                if let Some(v) = params["borderStyle"].as_str() {
                    *border_style = if v == "dashed" { BorderStyle::Dashed } else { BorderStyle::Solid };
                }
                if let Some(v) = params["borderRadius"].as_f64() { *corner_radius = v; }
                if let Some(v) = params["color"].as_str() { *fill = v.to_string(); }
            }
        }
        true
    }

    /// Removes the element; clears the selection if it pointed at it.
    pub fn remove_element(&mut self, id: u32) -> bool {
        let before = self.elements.len();
        self.elements.retain(|el| el.id != id);
        if self.selected_id == Some(id) {
            self.selected_id = None;
        }
        self.text_widths.remove(&id);
        self.elements.len() < before
    }

    /// Clones the element with a fresh id at a (+20, +20) offset, appended on
    /// top, and makes it the selection.
    pub fn duplicate_element(&mut self, id: u32) -> Option<u32> {
        let source = self.elements.iter().find(|el| el.id == id)?.clone();
        let new_id = self.fresh_id();
        let mut copy = source;
        copy.id = new_id;
        copy.x += DUPLICATE_OFFSET;
        copy.y += DUPLICATE_OFFSET;
        self.elements.push(copy);
        self.selected_id = Some(new_id);
        Some(new_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn engine_with_text(content: &str, x: f64, y: f64) -> (DesignEngine, u32) {
        let mut engine = DesignEngine::new();
        let id = engine.fresh_id();
        let mut el = Element::new_text(id, x, y);
        if let ElementKind::Text { content: c, .. } = &mut el.kind {
            *c = content.to_string();
        }
        engine.add_element(el);
        (engine, id)
    }

    #[test]
    fn add_generates_unique_ids() {
        let mut engine = DesignEngine::new();
        let a = engine.add_element(Element::new_text(0, 10.0, 10.0));
        let b = engine.add_element(Element::new_text(0, 20.0, 20.0));
        let c = engine.add_element(Element::new_border(0, 30.0, 30.0));
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(engine.element_count(), 3);
    }

    #[test]
    fn update_merges_fields_and_selection_observes_it() {
        let (mut engine, id) = engine_with_text("Hello", 50.0, 50.0);
        engine.select(id);
        assert!(engine.update_element(id, &json!({ "content": "Hi", "bold": true })));
        let selected = engine.selected_element().unwrap();
        match &selected.kind {
            ElementKind::Text { content, bold, .. } => {
                assert_eq!(content, "Hi");
                assert!(*bold);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn update_unknown_id_is_noop() {
        let (mut engine, _) = engine_with_text("Hello", 50.0, 50.0);
        assert!(!engine.update_element(999, &json!({ "content": "Hi" })));
        assert_eq!(engine.element_count(), 1);
    }

    #[test]
    fn remove_selected_clears_selection() {
        let (mut engine, id) = engine_with_text("Hello", 50.0, 50.0);
        engine.select(id);
        assert!(engine.remove_element(id));
        assert_eq!(engine.selected_id(), None);
        assert_eq!(engine.element_count(), 0);
    }

    #[test]
    fn duplicate_offsets_by_twenty_and_selects_copy() {
        let (mut engine, id) = engine_with_text("Hello", 50.0, 60.0);
        let copy_id = engine.duplicate_element(id).unwrap();
        assert_ne!(copy_id, id);
        assert_eq!(engine.selected_id(), Some(copy_id));
        let copy = engine.elements.iter().find(|el| el.id == copy_id).unwrap();
        assert_eq!(copy.x, 70.0);
        assert_eq!(copy.y, 80.0);
    }

    #[test]
    fn command_surface_add_update_delete() {
        let mut engine = DesignEngine::new();
        let reply = engine.execute_command(
            r#"{"action":"add","params":{"type":"text","content":"Hello","x":50,"y":50,"fontSize":16}}"#,
        );
        assert!(reply.contains("\"success\""), "{}", reply);
        let id = engine.selected_id().unwrap();

        let reply = engine.execute_command(&format!(
            r#"{{"action":"update","params":{{"id":{},"content":"Hi"}}}}"#, id
        ));
        assert!(reply.contains("\"success\""), "{}", reply);

        let reply = engine.execute_command(&format!(
            r#"{{"action":"delete","params":{{"id":{}}}}}"#, id
        ));
        assert!(reply.contains("\"success\""), "{}", reply);
        assert_eq!(engine.element_count(), 0);

        let reply = engine.execute_command(
            r#"{"action":"explode","params":{}}"#,
        );
        assert!(reply.contains("Unknown action"));
    }

    #[test]
    fn add_hit_update_remove_scenario() {
        let mut engine = DesignEngine::new();
        assert_eq!(engine.element_count(), 0);

        let el: Element = serde_json::from_str(
            r#"{"type":"text","content":"Hello","x":50,"y":50,"fontSize":16}"#,
        ).unwrap();
        let id = engine.add_element(el);
        assert_eq!(engine.element_count(), 1);
        assert_eq!(engine.hit_test(50.0, 50.0), Some(id));

        assert!(engine.update_element(id, &json!({ "content": "Hi" })));
        let json = engine.get_elements_json();
        assert!(json.contains("\"content\":\"Hi\""));
        assert!(!json.contains("Hello"));

        assert!(engine.remove_element(id));
        assert_eq!(engine.element_count(), 0);
        assert_eq!(engine.hit_test(50.0, 50.0), None);
    }
}
