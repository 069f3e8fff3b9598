//! Presentation layer. Nothing in here feeds back into the model.
//!
//! Drawing goes through the [`Surface`] trait so the asteroid renderer and HUD
//! can be exercised without a browser; the canvas implementation is a thin
//! forwarding layer over `CanvasRenderingContext2d`.

use web_sys::CanvasRenderingContext2d;

use super::session::{GamePhase, Session};

pub const HUD_FONT: &str = "20px monospace";
pub const LABEL_FONT: &str = "bold 16px monospace";
pub const TARGET_GREEN: &str = "#4ade80";

/// Minimal 2D drawing backend.
pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f64, y: f64);
    fn rotate(&mut self, angle: f64);

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64);
    fn arc(&mut self, x: f64, y: f64, radius: f64);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);

    fn set_fill_color(&mut self, color: &str);
    /// Radial gradient centred on the origin, `inner` at `r0` fading to `outer` at `r1`.
    fn set_fill_radial(&mut self, r0: f64, r1: f64, inner: &str, outer: &str);
    fn set_stroke_color(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    fn set_shadow(&mut self, blur: f64, color: &str);

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn set_font(&mut self, font: &str);
    fn set_text_align(&mut self, align: &str);
    fn set_text_baseline(&mut self, baseline: &str);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
}

/// Canvas-backed surface.
pub struct CanvasSurface<'a> {
    pub ctx: &'a CanvasRenderingContext2d,
    pub width: f64,
    pub height: f64,
}

impl Surface for CanvasSurface<'_> {
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
    fn translate(&mut self, x: f64, y: f64) {
        self.ctx.translate(x, y).ok();
    }
    fn rotate(&mut self, angle: f64) {
        self.ctx.rotate(angle).ok();
    }
    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }
    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }
    fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.ctx.quadratic_curve_to(cpx, cpy, x, y);
    }
    fn arc(&mut self, x: f64, y: f64, radius: f64) {
        self.ctx.arc(x, y, radius, 0.0, std::f64::consts::TAU).ok();
    }
    fn close_path(&mut self) {
        self.ctx.close_path();
    }
    fn fill(&mut self) {
        self.ctx.fill();
    }
    fn stroke(&mut self) {
        self.ctx.stroke();
    }
    fn set_fill_color(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }
    fn set_fill_radial(&mut self, r0: f64, r1: f64, inner: &str, outer: &str) {
        match self.ctx.create_radial_gradient(0.0, 0.0, r0, 0.0, 0.0, r1) {
            Ok(gradient) => {
                gradient.add_color_stop(0.0, inner).ok();
                gradient.add_color_stop(1.0, outer).ok();
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
            Err(_) => self.ctx.set_fill_style_str(inner),
        }
    }
    fn set_stroke_color(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }
    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }
    fn set_shadow(&mut self, blur: f64, color: &str) {
        self.ctx.set_shadow_blur(blur);
        self.ctx.set_shadow_color(color);
    }
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.ctx.fill_rect(x, y, w, h);
    }
    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }
    fn set_text_align(&mut self, align: &str) {
        self.ctx.set_text_align(align);
    }
    fn set_text_baseline(&mut self, baseline: &str) {
        self.ctx.set_text_baseline(baseline);
    }
    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.ctx.fill_text(text, x, y).ok();
    }
}

/// Translucent black wash that leaves short motion trails.
pub fn fade(surface: &mut dyn Surface) {
    let (w, h) = (surface.width(), surface.height());
    surface.set_fill_color("rgba(0, 0, 0, 0.2)");
    surface.fill_rect(0.0, 0.0, w, h);
}

/// Draw one frame of the current session: asteroids, HUD, and the game-over
/// overlay once the run has ended.
pub fn draw_frame(session: &Session, surface: &mut dyn Surface) {
    fade(surface);
    for asteroid in session.asteroids() {
        asteroid.draw(surface);
    }
    draw_hud(session, surface);
    if session.phase() == GamePhase::GameOver {
        draw_game_over(session, surface);
    }
}

pub fn draw_hud(session: &Session, surface: &mut dyn Surface) {
    let h = surface.height();
    surface.set_text_align("left");
    surface.set_text_baseline("alphabetic");
    surface.set_fill_color("white");
    surface.set_font(HUD_FONT);
    surface.fill_text(&format!("Score: {}", session.score()), 20.0, 30.0);
    surface.fill_text(&format!("Level: {}", session.level()), 20.0, 60.0);
    surface.fill_text(&format!("Lives: {}", session.lives().max(0)), 20.0, 90.0);

    // Only the typed prefix, never the target's full word.
    if session.target().is_some() {
        surface.set_fill_color(TARGET_GREEN);
    }
    surface.fill_text(&format!("> {}", session.current_word()), 20.0, h - 20.0);
}

fn draw_game_over(session: &Session, surface: &mut dyn Surface) {
    let (w, h) = (surface.width(), surface.height());
    let summary = session.summary();
    surface.set_fill_color("rgba(0,0,0,0.7)");
    surface.fill_rect(0.0, 0.0, w, h);

    let (cx, cy) = (w / 2.0, h / 2.0);
    surface.set_text_align("center");
    surface.set_text_baseline("middle");
    surface.set_fill_color("#ffffff");
    surface.set_font("bold 48px monospace");
    surface.fill_text("GAME OVER", cx, cy - 60.0);
    surface.set_font("24px monospace");
    surface.fill_text(&format!("Final Score: {}", summary.score), cx, cy);
    surface.fill_text(&format!("Level Reached: {}", summary.level), cx, cy + 32.0);
    surface.set_fill_color("#9ca3af");
    surface.set_font("16px monospace");
    surface.fill_text(summary.rank_message(), cx, cy + 64.0);
}
