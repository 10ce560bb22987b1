use wasm_bindgen::prelude::*;
use crate::element::Element;
use crate::engine::DesignEngine;
use crate::types::Tool;

/// Pointer interaction state. The offset is pointer-minus-anchor at the
/// moment the drag started, so the grabbed point stays under the pointer.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { offset_x: f64, offset_y: f64 },
}

/// Maps a client-space pointer position into logical canvas units, given the
/// canvas element's bounding rect. The single place display scaling is
/// accounted for; everything downstream works in logical units.
pub fn to_canvas(
    client_x: f64,
    client_y: f64,
    rect_left: f64,
    rect_top: f64,
    rect_width: f64,
    rect_height: f64,
    canvas_width: f64,
    canvas_height: f64,
) -> (f64, f64) {
    let sx = if rect_width > 0.0 { canvas_width / rect_width } else { 1.0 };
    let sy = if rect_height > 0.0 { canvas_height / rect_height } else { 1.0 };
    ((client_x - rect_left) * sx, (client_y - rect_top) * sy)
}

#[wasm_bindgen]
impl DesignEngine {
    /// Pointer-down in logical coordinates. Returns the selected id, if any,
    /// after the transition.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Option<u32> {
        let hit = self.hit_test(x, y);
        match (self.tool, hit) {
            (Tool::Select, Some(id)) => {
                self.selected_id = Some(id);
                if let Some(el) = self.elements.iter().find(|el| el.id == id) {
                    self.drag = DragState::Dragging { offset_x: x - el.x, offset_y: y - el.y };
                }
            }
            (Tool::Text, None) => {
                let id = self.fresh_id();
                self.add_element(Element::new_text(id, x, y));
                self.selected_id = Some(id);
                self.tool = Tool::Select;
            }
            (_, None) => {
                self.selected_id = None;
            }
            _ => {}
        }
        self.selected_id
    }

    /// Pointer-move: while dragging, the selected anchor follows the pointer
    /// minus the recorded grab offset.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let DragState::Dragging { offset_x, offset_y } = self.drag else { return };
        let Some(id) = self.selected_id else { return };
        if let Some(el) = self.elements.iter_mut().find(|el| el.id == id) {
            el.x = x - offset_x;
            el.y = y - offset_y;
        }
    }

    /// Pointer-up or pointer-leave ends any drag.
    pub fn pointer_up(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Client-space variants: normalize against the canvas bounding rect,
    /// then run the logical-space handler.
    pub fn pointer_down_client(
        &mut self,
        client_x: f64,
        client_y: f64,
        rect_left: f64,
        rect_top: f64,
        rect_width: f64,
        rect_height: f64,
    ) -> Option<u32> {
        let (x, y) = to_canvas(
            client_x, client_y, rect_left, rect_top, rect_width, rect_height,
            self.canvas_width, self.canvas_height,
        );
        self.pointer_down(x, y)
    }

    pub fn pointer_move_client(
        &mut self,
        client_x: f64,
        client_y: f64,
        rect_left: f64,
        rect_top: f64,
        rect_width: f64,
        rect_height: f64,
    ) {
        let (x, y) = to_canvas(
            client_x, client_y, rect_left, rect_top, rect_width, rect_height,
            self.canvas_width, self.canvas_height,
        );
        self.pointer_move(x, y);
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::types::ShapeKind;

    #[test]
    fn down_on_element_selects_and_starts_drag() {
        let mut engine = DesignEngine::new();
        let id = engine.add_element(Element::new_shape(0, ShapeKind::Rectangle, 200.0, 300.0));
        assert_eq!(engine.pointer_down(210.0, 310.0), Some(id));
        assert!(engine.is_dragging());
        assert_eq!(engine.drag, DragState::Dragging { offset_x: 10.0, offset_y: 10.0 });
    }

    #[test]
    fn drag_moves_anchor_by_pointer_delta() {
        let mut engine = DesignEngine::new();
        let id = engine.add_element(Element::new_shape(0, ShapeKind::Rectangle, 200.0, 300.0));
        engine.pointer_down(210.0, 310.0);
        engine.pointer_move(260.0, 340.0);
        let el = engine.elements.iter().find(|el| el.id == id).unwrap();
        assert_eq!((el.x, el.y), (250.0, 330.0));
        // Still dragging until the pointer lifts.
        assert!(engine.is_dragging());
        engine.pointer_up();
        assert!(!engine.is_dragging());
    }

    #[test]
    fn move_without_drag_is_noop() {
        let mut engine = DesignEngine::new();
        engine.add_element(Element::new_shape(0, ShapeKind::Rectangle, 200.0, 300.0));
        engine.pointer_move(10.0, 10.0);
        assert_eq!((engine.elements[0].x, engine.elements[0].y), (200.0, 300.0));
    }

    #[test]
    fn text_tool_places_element_and_reverts_to_select() {
        let mut engine = DesignEngine::new();
        engine.set_tool(Tool::Text);
        let id = engine.pointer_down(120.0, 80.0).unwrap();
        assert_eq!(engine.tool(), Tool::Select);
        let el = engine.elements.iter().find(|el| el.id == id).unwrap();
        assert_eq!((el.x, el.y), (120.0, 80.0));
        match &el.kind {
            ElementKind::Text { content, font_size, .. } => {
                assert_eq!(content, "New Text");
                assert_eq!(*font_size, 16.0);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn text_tool_over_existing_element_does_not_place() {
        let mut engine = DesignEngine::new();
        let id = engine.add_element(Element::new_shape(0, ShapeKind::Rectangle, 200.0, 300.0));
        engine.set_tool(Tool::Text);
        engine.pointer_down(200.0, 300.0);
        assert_eq!(engine.element_count(), 1);
        // Existing element is left as-is and not grabbed by the text tool.
        assert_ne!(engine.selected_id(), Some(id + 1));
    }

    #[test]
    fn down_on_empty_clears_selection() {
        let mut engine = DesignEngine::new();
        let id = engine.add_element(Element::new_shape(0, ShapeKind::Rectangle, 200.0, 300.0));
        engine.select(id);
        assert_eq!(engine.pointer_down(10.0, 10.0), None);
        assert_eq!(engine.selected_id(), None);
    }

    #[test]
    fn client_coords_normalize_against_display_scaling() {
        // Canvas displayed at 2x: an 800x1200 CSS rect over 400x600 logical.
        let (x, y) = to_canvas(120.0, 240.0, 20.0, 40.0, 800.0, 1200.0, 400.0, 600.0);
        assert_eq!((x, y), (50.0, 100.0));

        let mut engine = DesignEngine::new();
        let id = engine.add_element(Element::new_shape(0, ShapeKind::Rectangle, 50.0, 100.0));
        assert_eq!(
            engine.pointer_down_client(120.0, 240.0, 20.0, 40.0, 800.0, 1200.0),
            Some(id)
        );
    }
}
