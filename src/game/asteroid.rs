//! Falling word target.

use std::f64::consts::TAU;

use rand::Rng;

use super::render::{LABEL_FONT, Surface, TARGET_GREEN};

/// Stable handle into the session's asteroid collection. Ids are never reused
/// within a session, so a stale id simply stops resolving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AsteroidId(pub u64);

const OUTLINE_POINTS: usize = 8;

#[derive(Clone, Debug)]
pub struct Asteroid {
    pub id: AsteroidId,
    pub x: f64,
    pub y: f64,
    pub word: String,
    /// px per frame
    pub speed: f64,
    pub size: f64,
    pub rotation: f64,
    pub rotation_speed: f64,
    pub targeted: bool,
    /// Letters of `word` already typed; always `<= word.len()`.
    pub typed_len: usize,
    hue_jitter: u32,
}

impl Asteroid {
    pub fn new<R: Rng + ?Sized>(
        id: AsteroidId,
        x: f64,
        y: f64,
        word: impl Into<String>,
        speed: f64,
        rng: &mut R,
    ) -> Self {
        let word = word.into();
        Self {
            id,
            x,
            y,
            size: 30.0 + word.len() as f64 * 3.0,
            rotation: rng.gen_range(0.0..TAU),
            rotation_speed: (rng.r#gen::<f64>() - 0.5) * 0.02,
            hue_jitter: rng.gen_range(0..30),
            word,
            speed,
            targeted: false,
            typed_len: 0,
        }
    }

    /// Advance one frame.
    pub fn update(&mut self) {
        self.y += self.speed;
        self.rotation += self.rotation_speed;
    }

    pub fn len(&self) -> usize {
        self.word.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.word.is_empty()
    }

    /// Letter expected after `typed` letters, if any.
    pub fn letter_at(&self, typed: usize) -> Option<char> {
        self.word.chars().nth(typed)
    }

    pub fn starts_with(&self, key: char) -> bool {
        self.word
            .chars()
            .next()
            .is_some_and(|c| c.eq_ignore_ascii_case(&key))
    }

    /// The untyped suffix, which is all the label ever shows.
    pub fn label(&self) -> &str {
        let start = self
            .word
            .char_indices()
            .nth(self.typed_len)
            .map_or(self.word.len(), |(i, _)| i);
        &self.word[start..]
    }

    pub fn set_progress(&mut self, typed: usize) {
        self.typed_len = typed.min(self.len());
    }

    pub fn release(&mut self) {
        self.targeted = false;
        self.typed_len = 0;
    }

    pub fn hue(&self) -> u32 {
        (self.len() as u32 * 20 + self.hue_jitter) % 360
    }

    /// Radius of outline point `i`; the sine term gives the lumpy silhouette.
    fn outline_radius(&self, i: usize) -> f64 {
        self.size * (0.8 + (i as f64 * 3.0).sin() * 0.2)
    }

    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.save();
        surface.translate(self.x, self.y);
        surface.rotate(self.rotation);

        let hue = self.hue();
        let (sat, light) = if self.targeted { (80, 60) } else { (60, 50) };
        let fill = format!("hsla({hue}, {sat}%, {light}%, 0.6)");
        let edge = format!("hsla({}, {sat}%, {}%, 0.6)", (hue + 30) % 360, light - 20);

        surface.begin_path();
        let step = TAU / OUTLINE_POINTS as f64;
        for i in 0..=OUTLINE_POINTS {
            let r = self.outline_radius(i);
            let (px, py) = ((i as f64 * step).cos() * r, (i as f64 * step).sin() * r);
            let next_angle = (i + 1) as f64 * step;
            let next_r = r * (0.8 + ((i + 1) as f64 * 3.0).sin() * 0.2);
            let (nx, ny) = (next_angle.cos() * next_r, next_angle.sin() * next_r);
            if i == 0 {
                surface.move_to(px, py);
            } else {
                let cpx = (px + nx) / 2.0 * 1.1;
                let cpy = (py + ny) / 2.0 * 1.1;
                surface.quadratic_curve_to(cpx, cpy, nx, ny);
            }
        }
        surface.close_path();

        surface.set_fill_radial(self.size * 0.3, self.size, &fill, &edge);
        if self.targeted {
            surface.set_stroke_color(TARGET_GREEN);
            surface.set_shadow(10.0, "rgba(74, 222, 128, 0.6)");
        } else {
            surface.set_stroke_color(&format!("hsla({hue}, {}%, {}%, 0.9)", sat + 10, light + 20));
            surface.set_shadow(10.0, &format!("hsla({hue}, 70%, 60%, 0.6)"));
        }
        surface.set_line_width(3.0);
        surface.fill();
        surface.stroke();
        surface.set_shadow(0.0, "transparent");

        // inner ring
        surface.begin_path();
        surface.arc(0.0, 0.0, self.size * 0.4);
        surface.set_stroke_color(&format!(
            "hsla({}, {sat}%, {}%, 0.4)",
            (hue + 60) % 360,
            light + 10
        ));
        surface.set_line_width(2.0);
        surface.stroke();

        // label stays upright
        surface.rotate(-self.rotation);
        let remaining = self.label();
        if !remaining.is_empty() {
            surface.set_text_align("center");
            surface.set_text_baseline("middle");
            surface.set_fill_color("#ffffff");
            surface.set_font(LABEL_FONT);
            surface.set_shadow(4.0, "rgba(0, 0, 0, 0.8)");
            surface.fill_text(remaining, 0.0, 0.0);
            surface.set_shadow(0.0, "transparent");
        }

        surface.restore();
    }

    /// Whether the asteroid has fallen past the bottom edge.
    pub fn is_below(&self, height: f64) -> bool {
        self.y > height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::render::recording::RecordingSurface;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rock(word: &str) -> Asteroid {
        let mut rng = StdRng::seed_from_u64(3);
        Asteroid::new(AsteroidId(1), 200.0, -50.0, word, 1.5, &mut rng)
    }

    #[test]
    fn fresh_asteroid_is_untouched() {
        let a = rock("nebula");
        assert!(!a.targeted);
        assert_eq!(a.typed_len, 0);
        assert_eq!(a.size, 48.0);
        assert!(a.rotation_speed.abs() <= 0.01);
        assert_eq!(a.label(), "nebula");
    }

    #[test]
    fn update_is_linear_per_frame() {
        let mut a = rock("comet");
        let (y0, r0) = (a.y, a.rotation);
        for _ in 0..10 {
            a.update();
        }
        assert!((a.y - (y0 + 15.0)).abs() < 1e-9);
        assert!((a.rotation - (r0 + 10.0 * a.rotation_speed)).abs() < 1e-9);
        assert_eq!(a.x, 200.0);
    }

    #[test]
    fn progress_is_clamped_and_label_follows() {
        let mut a = rock("orbit");
        a.set_progress(2);
        assert_eq!(a.label(), "bit");
        a.set_progress(99);
        assert_eq!(a.typed_len, 5);
        assert_eq!(a.label(), "");
        a.release();
        assert_eq!(a.typed_len, 0);
        assert_eq!(a.label(), "orbit");
    }

    #[test]
    fn hue_depends_on_length_and_is_stable() {
        let a = rock("star");
        let h = a.hue();
        assert!((80..110).contains(&h));
        assert_eq!(a.hue(), h);
    }

    #[test]
    fn draw_shows_only_remaining_letters() {
        let mut a = rock("galaxy");
        a.targeted = true;
        a.set_progress(3);
        let mut surface = RecordingSurface::default();
        a.draw(&mut surface);
        assert_eq!(surface.texts.len(), 1);
        assert_eq!(surface.texts[0].0, "axy");
        assert_eq!(surface.fills, 1);
    }

    #[test]
    fn finished_word_draws_no_label() {
        let mut a = rock("key");
        a.set_progress(3);
        let mut surface = RecordingSurface::default();
        a.draw(&mut surface);
        assert!(surface.texts.is_empty());
    }

    #[test]
    fn below_edge() {
        let mut a = rock("ship");
        a.y = 600.0;
        assert!(!a.is_below(600.0));
        a.y = 600.1;
        assert!(a.is_below(600.0));
    }
}
