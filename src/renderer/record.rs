//! Recording painter
//!
//! Captures draw calls as data so frames can be inspected without a canvas.

use glam::Vec2;

use super::{ColorStop, Painter};

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Alpha(f32),
    Fill(String),
    Stroke(String, f32),
    LinearGradient(f32, f32, Vec<(f32, String)>),
    RadialGradient(Vec2, f32, Vec<(f32, String)>),
    Glow(String, f32),
    Clear(f32, f32),
    Rect(f32, f32, f32, f32),
    StrokeRect(f32, f32, f32, f32),
    Circle(Vec2, f32),
    StrokeCircle(Vec2, f32),
    Ellipse(Vec2, Vec2),
    Polygon(Vec<Vec2>),
    StrokePolygon(Vec<Vec2>),
    Line(Vec2, Vec2),
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub ops: Vec<DrawOp>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    /// Every `Save` has a matching `Restore`
    pub fn is_balanced(&self) -> bool {
        let mut depth = 0i32;
        for op in &self.ops {
            match op {
                DrawOp::Save => depth += 1,
                DrawOp::Restore => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }

    /// Fill styles in the order they were set
    pub fn fills(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Fill(c) => Some(c.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn owned(stops: &[ColorStop<'_>]) -> Vec<(f32, String)> {
    stops.iter().map(|(o, c)| (*o, c.to_string())).collect()
}

impl Painter for Recorder {
    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ops.push(DrawOp::Alpha(alpha));
    }

    fn set_fill(&mut self, color: &str) {
        self.ops.push(DrawOp::Fill(color.to_string()));
    }

    fn set_stroke(&mut self, color: &str, width: f32) {
        self.ops.push(DrawOp::Stroke(color.to_string(), width));
    }

    fn set_fill_linear(&mut self, y0: f32, y1: f32, stops: &[ColorStop<'_>]) {
        self.ops.push(DrawOp::LinearGradient(y0, y1, owned(stops)));
    }

    fn set_fill_radial(&mut self, center: Vec2, radius: f32, stops: &[ColorStop<'_>]) {
        self.ops
            .push(DrawOp::RadialGradient(center, radius, owned(stops)));
    }

    fn set_glow(&mut self, color: &str, blur: f32) {
        self.ops.push(DrawOp::Glow(color.to_string(), blur));
    }

    fn clear(&mut self, width: f32, height: f32) {
        self.ops.push(DrawOp::Clear(width, height));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ops.push(DrawOp::Rect(x, y, w, h));
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.ops.push(DrawOp::StrokeRect(x, y, w, h));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32) {
        self.ops.push(DrawOp::Circle(center, radius));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32) {
        self.ops.push(DrawOp::StrokeCircle(center, radius));
    }

    fn fill_ellipse(&mut self, center: Vec2, radii: Vec2) {
        self.ops.push(DrawOp::Ellipse(center, radii));
    }

    fn fill_polygon(&mut self, points: &[Vec2]) {
        self.ops.push(DrawOp::Polygon(points.to_vec()));
    }

    fn stroke_polygon(&mut self, points: &[Vec2]) {
        self.ops.push(DrawOp::StrokePolygon(points.to_vec()));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2) {
        self.ops.push(DrawOp::Line(from, to));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance() {
        let mut rec = Recorder::new();
        rec.save();
        rec.fill_rect(0.0, 0.0, 1.0, 1.0);
        assert!(!rec.is_balanced());
        rec.restore();
        assert!(rec.is_balanced());
        rec.restore();
        assert!(!rec.is_balanced());
    }
}
