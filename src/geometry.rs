use kurbo::{BezPath, Ellipse, Point, Rect, RoundedRect, Shape};
use std::f64::consts::PI;
use crate::types::ShapeKind;

/// Path for a shape variant centered on `(x, y)` in a `w`×`h` box. All
/// geometry is explicit so each variant can be asserted on literally.
pub fn shape_path(kind: ShapeKind, x: f64, y: f64, w: f64, h: f64) -> BezPath {
    match kind {
        ShapeKind::Rectangle => Rect::new(x - w / 2.0, y - h / 2.0, x + w / 2.0, y + h / 2.0).to_path(0.1),
        ShapeKind::Circle => {
            let r = w.min(h) / 2.0;
            Ellipse::new(Point::new(x, y), (r, r), 0.0).to_path(0.1)
        }
        ShapeKind::Ellipse => Ellipse::new(Point::new(x, y), (w / 2.0, h / 2.0), 0.0).to_path(0.1),
        ShapeKind::Triangle => {
            let mut path = BezPath::new();
            path.move_to((x, y - h / 2.0));
            path.line_to((x - w / 2.0, y + h / 2.0));
            path.line_to((x + w / 2.0, y + h / 2.0));
            path.close_path();
            path
        }
        ShapeKind::Diamond => {
            let mut path = BezPath::new();
            path.move_to((x, y - h / 2.0));
            path.line_to((x + w / 2.0, y));
            path.line_to((x, y + h / 2.0));
            path.line_to((x - w / 2.0, y));
            path.close_path();
            path
        }
        ShapeKind::Heart => heart_path(x, y, w, h),
        ShapeKind::Star => star_path(x, y, w, h),
        ShapeKind::Hexagon => hexagon_path(x, y, w, h),
    }
}

/// Rectangle outline for border elements, optionally rounded.
pub fn border_path(x: f64, y: f64, w: f64, h: f64, corner_radius: f64) -> BezPath {
    let rect = Rect::new(x - w / 2.0, y - h / 2.0, x + w / 2.0, y + h / 2.0);
    if corner_radius > 0.0 {
        let r = corner_radius.min(w / 2.0).min(h / 2.0);
        RoundedRect::from_rect(rect, r).to_path(0.1)
    } else {
        rect.to_path(0.1)
    }
}

/// Two lobes and a tip from four cubic Béziers, drawn over the half-extent
/// box like the catalog's templates expect.
fn heart_path(x: f64, y: f64, w: f64, h: f64) -> BezPath {
    let hw = w / 2.0;
    let hh = h / 2.0;
    let mut path = BezPath::new();
    path.move_to((x, y + hh / 4.0));
    path.curve_to((x, y - hh / 2.0), (x - hw, y - hh / 2.0), (x - hw, y));
    path.curve_to((x - hw, y + hh / 4.0), (x, y + hh / 2.0), (x, y + hh));
    path.curve_to((x, y + hh / 2.0), (x + hw, y + hh / 4.0), (x + hw, y));
    path.curve_to((x + hw, y - hh / 2.0), (x, y - hh / 2.0), (x, y + hh / 4.0));
    path.close_path();
    path
}

/// Five-pointed star: vertices alternate between the outer radius and 0.4 of
/// it at 36° steps, starting from the top spike.
fn star_path(x: f64, y: f64, w: f64, h: f64) -> BezPath {
    const SPIKES: u32 = 5;
    let outer = w.min(h) / 2.0;
    let inner = outer * 0.4;
    let step = PI / SPIKES as f64;
    let mut path = BezPath::new();
    path.move_to((x, y - outer));
    for i in 1..(SPIKES * 2) {
        let r = if i % 2 == 0 { outer } else { inner };
        let angle = i as f64 * step - PI / 2.0;
        path.line_to((x + r * angle.cos(), y + r * angle.sin()));
    }
    path.close_path();
    path
}

/// Six vertices at 60° steps around the inscribed radius, first vertex at
/// angle zero (due east).
fn hexagon_path(x: f64, y: f64, w: f64, h: f64) -> BezPath {
    let r = w.min(h) / 2.0;
    let mut path = BezPath::new();
    for i in 0..6 {
        let angle = i as f64 * PI / 3.0;
        let p = (x + r * angle.cos(), y + r * angle.sin());
        if i == 0 { path.move_to(p); } else { path.line_to(p); }
    }
    path.close_path();
    path
}
