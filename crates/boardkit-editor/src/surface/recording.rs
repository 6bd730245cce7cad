use super::{Affine, FontSpec, Hole, StrokeStyle, Surface};
use boardkit_core::{Bounds, Position, Rgba};
use image::RgbaImage;

/// One recorded draw call together with the transform active at the time.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Rgba),
    FillRect {
        rect: Bounds,
        color: Rgba,
        transform: Affine,
    },
    StrokeRect {
        rect: Bounds,
        stroke: StrokeStyle,
        transform: Affine,
    },
    Polyline {
        points: Vec<Position>,
        closed: bool,
        stroke: StrokeStyle,
        transform: Affine,
    },
    FillCircle {
        center: Position,
        radius: f64,
        color: Rgba,
        transform: Affine,
    },
    StrokeCircle {
        center: Position,
        radius: f64,
        stroke: StrokeStyle,
        transform: Affine,
    },
    Arc {
        center: Position,
        radius: f64,
        start: f64,
        end: f64,
        transform: Affine,
    },
    FillOutside {
        outer: Bounds,
        hole: Hole,
        color: Rgba,
        transform: Affine,
    },
    Image {
        width: u32,
        height: u32,
        dest: Bounds,
        transform: Affine,
    },
    Text {
        text: String,
        origin: Position,
        font: FontSpec,
        color: Rgba,
        transform: Affine,
    },
}

/// A [`Surface`] that only records what would have been drawn.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    transform: Affine,
    stack: Vec<Affine>,
    ops: Vec<DrawOp>,
    max_stack_depth: usize,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            transform: Affine::identity(),
            stack: Vec::new(),
            ops: Vec::new(),
            max_stack_depth: 0,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    /// Number of unmatched `save` calls.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    pub fn max_stack_depth(&self) -> usize {
        self.max_stack_depth
    }

    /// Texts drawn so far, in call order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.transform = Affine::identity();
        self.stack.clear();
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
        self.max_stack_depth = self.max_stack_depth.max(self.stack.len());
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    fn clear(&mut self, color: Rgba) {
        self.ops.push(DrawOp::Clear(color));
    }

    fn fill_rect(&mut self, rect: Bounds, color: Rgba) {
        self.ops.push(DrawOp::FillRect {
            rect,
            color,
            transform: self.transform,
        });
    }

    fn stroke_rect(&mut self, rect: Bounds, stroke: &StrokeStyle) {
        self.ops.push(DrawOp::StrokeRect {
            rect,
            stroke: *stroke,
            transform: self.transform,
        });
    }

    fn stroke_polyline(&mut self, points: &[Position], closed: bool, stroke: &StrokeStyle) {
        self.ops.push(DrawOp::Polyline {
            points: points.to_vec(),
            closed,
            stroke: *stroke,
            transform: self.transform,
        });
    }

    fn fill_circle(&mut self, center: Position, radius: f64, color: Rgba) {
        self.ops.push(DrawOp::FillCircle {
            center,
            radius,
            color,
            transform: self.transform,
        });
    }

    fn stroke_circle(&mut self, center: Position, radius: f64, stroke: &StrokeStyle) {
        self.ops.push(DrawOp::StrokeCircle {
            center,
            radius,
            stroke: *stroke,
            transform: self.transform,
        });
    }

    fn stroke_arc(&mut self, center: Position, radius: f64, start: f64, end: f64, _stroke: &StrokeStyle) {
        self.ops.push(DrawOp::Arc {
            center,
            radius,
            start,
            end,
            transform: self.transform,
        });
    }

    fn fill_outside(&mut self, outer: Bounds, hole: Hole, color: Rgba) {
        self.ops.push(DrawOp::FillOutside {
            outer,
            hole,
            color,
            transform: self.transform,
        });
    }

    fn draw_image(&mut self, image: &RgbaImage, dest: Bounds) {
        self.ops.push(DrawOp::Image {
            width: image.width(),
            height: image.height(),
            dest,
            transform: self.transform,
        });
    }

    fn fill_text(&mut self, text: &str, origin: Position, font: &FontSpec, color: Rgba) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            origin,
            font: font.clone(),
            color,
            transform: self.transform,
        });
    }
}
