use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Path2d};
use kurbo::BezPath;
use crate::element::{Element, ElementKind};
use crate::engine::DesignEngine;
use crate::geometry::{shape_path, border_path};
use crate::types::BorderStyle;

const BACKGROUND: &str = "#ffffff";
const FRAME_COLOR: &str = "#e5e7eb";
const SELECTION_COLOR: &str = "#3b82f6";
const SELECTION_PADDING: f64 = 5.0;
const DASH_PATTERN: [f64; 2] = [5.0, 5.0];

/// CSS shorthand for the 2D context font property: style, weight, size,
/// family.
pub fn font_string(bold: bool, italic: bool, font_size: f64, font_family: &str) -> String {
    let mut font = format!("{}px {}", font_size, font_family);
    if bold {
        font = format!("bold {}", font);
    }
    if italic {
        font = format!("italic {}", font);
    }
    font
}

fn has_color(color: &str) -> bool {
    !color.is_empty() && color != "transparent"
}

#[wasm_bindgen]
impl DesignEngine {
    /// Full-surface redraw from the current element collection and selection.
    /// Also refreshes text measurements and kicks off any image decodes that
    /// have not started yet; pending images are skipped this frame.
    pub fn render(&mut self, ctx: &CanvasRenderingContext2d) {
        self.refresh_text_widths(ctx);
        self.queue_image_decodes();

        ctx.save();
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, self.canvas_width, self.canvas_height);
        ctx.set_stroke_style_str(FRAME_COLOR);
        ctx.set_line_width(2.0);
        self.set_dash(ctx, false);
        ctx.stroke_rect(0.0, 0.0, self.canvas_width, self.canvas_height);

        for (i, highlight) in paint_plan(&self.elements, self.selected_id) {
            let el = &self.elements[i];
            self.draw_element(ctx, el);
            if highlight {
                self.draw_selection(ctx, el);
            }
        }
        ctx.restore();
    }
}

/// Paint order with the selection highlight attached to its own element's
/// step, so elements above a selected one paint over the highlight too.
pub(crate) fn paint_plan(elements: &[Element], selected: Option<u32>) -> Vec<(usize, bool)> {
    elements
        .iter()
        .enumerate()
        .map(|(i, el)| (i, selected == Some(el.id)))
        .collect()
}

impl DesignEngine {
    fn refresh_text_widths(&mut self, ctx: &CanvasRenderingContext2d) {
        let mut measured = Vec::new();
        for el in &self.elements {
            if let ElementKind::Text { content, font_size, font_family, bold, italic, .. } = &el.kind {
                ctx.set_font(&font_string(*bold, *italic, *font_size, font_family));
                if let Ok(metrics) = ctx.measure_text(content) {
                    measured.push((el.id, metrics.width()));
                }
            }
        }
        self.text_widths.extend(measured);
    }

    fn draw_element(&self, ctx: &CanvasRenderingContext2d, el: &Element) {
        match &el.kind {
            ElementKind::Text { content, font_size, font_family, color, bold, italic, underline, align } => {
                ctx.save();
                ctx.set_font(&font_string(*bold, *italic, *font_size, font_family));
                ctx.set_fill_style_str(color);
                ctx.set_text_align(align.as_canvas());
                let _ = ctx.fill_text(content, el.x, el.y);
                if *underline {
                    let width = self.text_width(el);
                    let start_x = match align {
                        crate::types::TextAlign::Left => el.x,
                        crate::types::TextAlign::Center => el.x - width / 2.0,
                        crate::types::TextAlign::Right => el.x - width,
                    };
                    ctx.set_stroke_style_str(color);
                    ctx.set_line_width(1.0);
                    ctx.begin_path();
                    ctx.move_to(start_x, el.y + 2.0);
                    ctx.line_to(start_x + width, el.y + 2.0);
                    ctx.stroke();
                }
                ctx.restore();
            }
            ElementKind::Image { src, width, height } => {
                // Skipped silently while the decode is in flight; the load
                // callback triggers another render.
                let cache = self.images.borrow();
                if let Some(img) = cache.loaded.get(src) {
                    let _ = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        img,
                        el.x - width / 2.0,
                        el.y - height / 2.0,
                        *width,
                        *height,
                    );
                }
            }
            ElementKind::Shape { shape, width, height, fill, border_color, border_width, border_style } => {
                let path = shape_path(*shape, el.x, el.y, *width, *height);
                self.paint_path(ctx, &path, fill, border_color, *border_width, *border_style);
            }
            ElementKind::Border { width, height, border_color, border_width, border_style, corner_radius, fill } => {
                let path = border_path(el.x, el.y, *width, *height, *corner_radius);
                self.paint_path(ctx, &path, fill, border_color, *border_width, *border_style);
            }
        }
    }

    /// Shared fill-then-stroke rule for shape and border paths.
    fn paint_path(
        &self,
        ctx: &CanvasRenderingContext2d,
        path: &BezPath,
        fill: &str,
        border_color: &str,
        border_width: f64,
        border_style: BorderStyle,
    ) {
        let Ok(path2d) = Path2d::new_with_path_string(&path.to_svg()) else {
            return;
        };
        ctx.save();
        if has_color(fill) {
            ctx.set_fill_style_str(fill);
            ctx.fill_with_path_2d(&path2d);
        }
        if has_color(border_color) && border_width > 0.0 {
            ctx.set_stroke_style_str(border_color);
            ctx.set_line_width(border_width);
            self.set_dash(ctx, border_style == BorderStyle::Dashed);
            ctx.stroke_with_path(&path2d);
        }
        ctx.restore();
    }

    fn draw_selection(&self, ctx: &CanvasRenderingContext2d, el: &Element) {
        let b = el.bounds(self.text_width(el)).inflate(SELECTION_PADDING, SELECTION_PADDING);
        ctx.save();
        ctx.set_stroke_style_str(SELECTION_COLOR);
        ctx.set_line_width(2.0);
        self.set_dash(ctx, true);
        ctx.stroke_rect(b.x0, b.y0, b.width(), b.height());
        ctx.restore();
    }

    fn set_dash(&self, ctx: &CanvasRenderingContext2d, dashed: bool) {
        let pattern = js_sys::Array::new();
        if dashed {
            for d in DASH_PATTERN {
                pattern.push(&JsValue::from_f64(d));
            }
        }
        let _ = ctx.set_line_dash(&pattern);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_string_orders_style_weight_size_family() {
        assert_eq!(font_string(false, false, 16.0, "serif"), "16px serif");
        assert_eq!(font_string(true, false, 16.0, "serif"), "bold 16px serif");
        assert_eq!(font_string(false, true, 24.0, "cursive"), "italic 24px cursive");
        assert_eq!(font_string(true, true, 12.0, "sans-serif"), "italic bold 12px sans-serif");
    }

    #[test]
    fn transparent_and_empty_colors_are_not_painted() {
        assert!(!has_color("transparent"));
        assert!(!has_color(""));
        assert!(has_color("#f3f4f6"));
    }

    #[test]
    fn selected_highlight_paints_with_its_element_not_last() {
        let lower = Element::new_text(1, 100.0, 100.0);
        let upper = Element::new_text(2, 110.0, 110.0);
        let plan = paint_plan(&[lower, upper], Some(1));
        // The lower element's highlight step comes before the upper element,
        // which may then paint over it.
        assert_eq!(plan, vec![(0, true), (1, false)]);
    }
}
