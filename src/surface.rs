//! Immediate-mode 2D drawing seam. Renderers only ever talk to a `Surface`,
//! so the browser canvas and the headless recorder used by tests are
//! interchangeable.

use web_sys::CanvasRenderingContext2d;

pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    fn save(&mut self);
    fn restore(&mut self);
    fn set_alpha(&mut self, alpha: f64);
    fn set_fill(&mut self, color: &str);
    fn set_stroke(&mut self, color: &str, line_width: f64);

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn fill_circle(&mut self, x: f64, y: f64, r: f64);
    fn stroke_circle(&mut self, x: f64, y: f64, r: f64);
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);
    fn fill_polygon(&mut self, points: &[(f64, f64)]);
    fn text(&mut self, text: &str, x: f64, y: f64, size_px: f64);
    /// Soft radial glow: `inner` colour at the centre fading to `outer` at `r`.
    fn glow(&mut self, x: f64, y: f64, r: f64, inner: &str, outer: &str);

    /// Move the origin to (x, y) and rotate by `angle` radians. Pair with save/restore.
    fn transform(&mut self, x: f64, y: f64, angle: f64);
}

/// Browser canvas backend.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d, width: f64, height: f64) -> Self {
        Self { ctx, width, height }
    }
}

impl Surface for CanvasSurface {
    fn width(&self) -> f64 {
        self.width
    }
    fn height(&self) -> f64 {
        self.height
    }

    fn save(&mut self) {
        self.ctx.save();
    }
    fn restore(&mut self) {
        self.ctx.restore();
    }
    fn set_alpha(&mut self, alpha: f64) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0));
    }
    fn set_fill(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }
    fn set_stroke(&mut self, color: &str, line_width: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width);
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.fill_rect(x, y, w, h);
    }
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.stroke_rect(x, y, w, h);
    }
    fn fill_circle(&mut self, x: f64, y: f64, r: f64) {
        self.ctx.begin_path();
        self.ctx.arc(x, y, r.max(0.0), 0.0, std::f64::consts::TAU).ok();
        self.ctx.fill();
    }
    fn stroke_circle(&mut self, x: f64, y: f64, r: f64) {
        self.ctx.begin_path();
        self.ctx.arc(x, y, r.max(0.0), 0.0, std::f64::consts::TAU).ok();
        self.ctx.stroke();
    }
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.ctx.begin_path();
        self.ctx.move_to(x1, y1);
        self.ctx.line_to(x2, y2);
        self.ctx.stroke();
    }
    fn fill_polygon(&mut self, points: &[(f64, f64)]) {
        let Some(&(x0, y0)) = points.first() else {
            return;
        };
        self.ctx.begin_path();
        self.ctx.move_to(x0, y0);
        for &(x, y) in &points[1..] {
            self.ctx.line_to(x, y);
        }
        self.ctx.close_path();
        self.ctx.fill();
    }
    fn text(&mut self, text: &str, x: f64, y: f64, size_px: f64) {
        self.ctx
            .set_font(&format!("bold {}px 'Fira Code', monospace", size_px.round()));
        self.ctx.set_text_align("center");
        self.ctx.fill_text(text, x, y).ok();
    }
    fn glow(&mut self, x: f64, y: f64, r: f64, inner: &str, outer: &str) {
        let r = r.max(0.5);
        match self.ctx.create_radial_gradient(x, y, 0.0, x, y, r) {
            Ok(g) => {
                g.add_color_stop(0.0, inner).ok();
                g.add_color_stop(1.0, outer).ok();
                self.ctx.set_fill_style_canvas_gradient(&g);
            }
            Err(_) => self.ctx.set_fill_style_str(inner),
        }
        self.fill_circle(x, y, r);
    }

    fn transform(&mut self, x: f64, y: f64, angle: f64) {
        self.ctx.translate(x, y).ok();
        self.ctx.rotate(angle).ok();
    }
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Save,
    Restore,
    Alpha(f64),
    Fill(String),
    Stroke(String, f64),
    Rect { x: f64, y: f64, w: f64, h: f64, filled: bool },
    Circle { x: f64, y: f64, r: f64, filled: bool },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Polygon(usize),
    Text { text: String, x: f64, y: f64 },
    Glow { x: f64, y: f64, r: f64 },
    Transform { x: f64, y: f64, angle: f64 },
}

/// Headless surface that records every call; used by tests and for
/// inspecting a frame without a browser.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub width: f64,
    pub height: f64,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    pub fn alphas(&self) -> Vec<f64> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Alpha(a) => Some(*a),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }
    fn height(&self) -> f64 {
        self.height
    }

    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }
    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }
    fn set_alpha(&mut self, alpha: f64) {
        self.ops.push(DrawOp::Alpha(alpha.clamp(0.0, 1.0)));
    }
    fn set_fill(&mut self, color: &str) {
        self.ops.push(DrawOp::Fill(color.to_string()));
    }
    fn set_stroke(&mut self, color: &str, line_width: f64) {
        self.ops.push(DrawOp::Stroke(color.to_string(), line_width));
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(DrawOp::Rect { x, y, w, h, filled: true });
    }
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ops.push(DrawOp::Rect { x, y, w, h, filled: false });
    }
    fn fill_circle(&mut self, x: f64, y: f64, r: f64) {
        self.ops.push(DrawOp::Circle { x, y, r, filled: true });
    }
    fn stroke_circle(&mut self, x: f64, y: f64, r: f64) {
        self.ops.push(DrawOp::Circle { x, y, r, filled: false });
    }
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.ops.push(DrawOp::Line { x1, y1, x2, y2 });
    }
    fn fill_polygon(&mut self, points: &[(f64, f64)]) {
        self.ops.push(DrawOp::Polygon(points.len()));
    }
    fn text(&mut self, text: &str, x: f64, y: f64, _size_px: f64) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
        });
    }
    fn glow(&mut self, x: f64, y: f64, r: f64, _inner: &str, _outer: &str) {
        self.ops.push(DrawOp::Glow { x, y, r });
    }
    fn transform(&mut self, x: f64, y: f64, angle: f64) {
        self.ops.push(DrawOp::Transform { x, y, angle });
    }
}
