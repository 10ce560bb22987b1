use serde::{Serialize, Deserialize};
use kurbo::Rect;
use crate::types::{ShapeKind, BorderStyle, TextAlign};

/// One visual object on the design canvas. `(x, y)` is the anchor: the text
/// baseline point for text elements, the center of the box for everything
/// else. JSON field names match the template catalog (camelCase, tagged by
/// `type`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Element {
    #[serde(default)]
    pub id: u32,
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub kind: ElementKind,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ElementKind {
    Text {
        #[serde(default)]
        content: String,
        #[serde(default = "default_font_size")]
        font_size: f64,
        #[serde(default = "default_font_family")]
        font_family: String,
        #[serde(default = "default_black")]
        color: String,
        #[serde(default)]
        bold: bool,
        #[serde(default)]
        italic: bool,
        #[serde(default)]
        underline: bool,
        #[serde(default)]
        align: TextAlign,
    },
    Image {
        #[serde(default)]
        src: String,
        #[serde(default = "default_box_dim")]
        width: f64,
        #[serde(default = "default_box_dim")]
        height: f64,
    },
    Shape {
        #[serde(rename = "shapeType")]
        shape: ShapeKind,
        #[serde(default = "default_box_dim")]
        width: f64,
        #[serde(default = "default_box_dim")]
        height: f64,
        #[serde(rename = "fillColor", default = "default_shape_fill")]
        fill: String,
        #[serde(default = "default_black")]
        border_color: String,
        #[serde(default = "default_border_width")]
        border_width: f64,
        #[serde(default)]
        border_style: BorderStyle,
    },
    Border {
        #[serde(default = "default_border_box_width")]
        width: f64,
        #[serde(default = "default_border_box_height")]
        height: f64,
        #[serde(default = "default_black")]
        border_color: String,
        #[serde(default = "default_border_width")]
        border_width: f64,
        #[serde(default)]
        border_style: BorderStyle,
        #[serde(rename = "borderRadius", default)]
        corner_radius: f64,
        #[serde(rename = "color", default = "default_transparent")]
        fill: String,
    },
}

fn default_font_size() -> f64 { 16.0 }
fn default_font_family() -> String { "serif".to_string() }
fn default_black() -> String { "#000000".to_string() }
fn default_box_dim() -> f64 { 100.0 }
fn default_shape_fill() -> String { "#f3f4f6".to_string() }
fn default_border_width() -> f64 { 2.0 }
fn default_border_box_width() -> f64 { 200.0 }
fn default_border_box_height() -> f64 { 150.0 }
fn default_transparent() -> String { "transparent".to_string() }

/// Width estimate used until the render pass has measured the string against
/// the real font. Half an em per glyph tracks canvas serif metrics closely
/// enough for hit testing.
pub fn approx_text_width(content: &str, font_size: f64) -> f64 {
    content.chars().count() as f64 * font_size * 0.5
}

impl Element {
    pub fn new_text(id: u32, x: f64, y: f64) -> Element {
        Element {
            id, x, y,
            kind: ElementKind::Text {
                content: "New Text".to_string(),
                font_size: default_font_size(),
                font_family: default_font_family(),
                color: default_black(),
                bold: false,
                italic: false,
                underline: false,
                align: TextAlign::default(),
            },
        }
    }

    pub fn new_shape(id: u32, shape: ShapeKind, x: f64, y: f64) -> Element {
        Element {
            id, x, y,
            kind: ElementKind::Shape {
                shape,
                width: default_box_dim(),
                height: default_box_dim(),
                fill: default_shape_fill(),
                border_color: default_black(),
                border_width: default_border_width(),
                border_style: BorderStyle::Solid,
            },
        }
    }

    pub fn new_border(id: u32, x: f64, y: f64) -> Element {
        Element {
            id, x, y,
            kind: ElementKind::Border {
                width: default_border_box_width(),
                height: default_border_box_height(),
                border_color: default_black(),
                border_width: default_border_width(),
                border_style: BorderStyle::Solid,
                corner_radius: 0.0,
                fill: default_transparent(),
            },
        }
    }

    pub fn new_image(id: u32, x: f64, y: f64, src: String, width: f64, height: f64) -> Element {
        Element { id, x, y, kind: ElementKind::Image { src, width, height } }
    }

    /// Unpadded bounding box in logical canvas units. `text_width` is the
    /// measured (or estimated) string width, ignored for non-text kinds.
    /// Text boxes extend one font size above the baseline anchor and sideways
    /// according to the alignment; all other kinds are centered on the anchor.
    pub fn bounds(&self, text_width: f64) -> Rect {
        match &self.kind {
            ElementKind::Text { font_size, align, .. } => {
                let (x0, x1) = match align {
                    TextAlign::Left => (self.x, self.x + text_width),
                    TextAlign::Center => (self.x - text_width / 2.0, self.x + text_width / 2.0),
                    TextAlign::Right => (self.x - text_width, self.x),
                };
                Rect::new(x0, self.y - font_size, x1, self.y)
            }
            ElementKind::Image { width, height, .. }
            | ElementKind::Shape { width, height, .. }
            | ElementKind::Border { width, height, .. } => Rect::new(
                self.x - width / 2.0,
                self.y - height / 2.0,
                self.x + width / 2.0,
                self.y + height / 2.0,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_text_json_fills_defaults() {
        let el: Element = serde_json::from_str(
            r#"{"type":"text","content":"Hello","x":50,"y":50}"#,
        ).unwrap();
        match &el.kind {
            ElementKind::Text { content, font_size, font_family, color, align, bold, .. } => {
                assert_eq!(content, "Hello");
                assert_eq!(*font_size, 16.0);
                assert_eq!(font_family, "serif");
                assert_eq!(color, "#000000");
                assert_eq!(*align, TextAlign::Center);
                assert!(!*bold);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn shape_json_uses_catalog_field_names() {
        let el: Element = serde_json::from_str(
            r##"{"type":"shape","x":0,"y":0,"shapeType":"heart","fillColor":"#ff0000","borderStyle":"dashed"}"##,
        ).unwrap();
        match &el.kind {
            ElementKind::Shape { shape, fill, border_style, width, .. } => {
                assert_eq!(*shape, ShapeKind::Heart);
                assert_eq!(fill, "#ff0000");
                assert_eq!(*border_style, BorderStyle::Dashed);
                assert_eq!(*width, 100.0);
            }
            other => panic!("expected shape, got {:?}", other),
        }
    }

    #[test]
    fn border_round_trip_preserves_radius_and_fill() {
        let el = Element {
            id: 7,
            x: 200.0,
            y: 300.0,
            kind: ElementKind::Border {
                width: 220.0,
                height: 160.0,
                border_color: "#aa33bb".to_string(),
                border_width: 3.0,
                border_style: BorderStyle::Dashed,
                corner_radius: 12.0,
                fill: "#fffbe6".to_string(),
            },
        };
        let json = serde_json::to_string(&el).unwrap();
        assert!(json.contains("\"borderRadius\":12.0"));
        assert!(json.contains("\"color\":\"#fffbe6\""));
        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(back, el);
    }

    #[test]
    fn text_bounds_follow_alignment() {
        let mut el = Element::new_text(1, 100.0, 50.0);
        let w = 60.0;
        assert_eq!(el.bounds(w), Rect::new(70.0, 34.0, 130.0, 50.0));

        if let ElementKind::Text { align, .. } = &mut el.kind {
            *align = TextAlign::Left;
        }
        assert_eq!(el.bounds(w), Rect::new(100.0, 34.0, 160.0, 50.0));

        if let ElementKind::Text { align, .. } = &mut el.kind {
            *align = TextAlign::Right;
        }
        assert_eq!(el.bounds(w), Rect::new(40.0, 34.0, 100.0, 50.0));
    }

    #[test]
    fn box_kinds_are_centered_on_anchor() {
        let el = Element::new_shape(1, ShapeKind::Rectangle, 200.0, 300.0);
        assert_eq!(el.bounds(0.0), Rect::new(150.0, 250.0, 250.0, 350.0));

        let b = Element::new_border(2, 200.0, 300.0);
        assert_eq!(b.bounds(0.0), Rect::new(100.0, 225.0, 300.0, 375.0));
    }
}
