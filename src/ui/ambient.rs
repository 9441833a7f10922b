//! Ambient background colour with exponential ease-out.
//!
//! When the active card changes, the backdrop doesn't jump to the new
//! accent.  Each frame the remaining colour distance decays toward zero,
//! giving a short crossfade.

/// Backdrop used when no card (or no accent) is active.
pub const NEUTRAL: (u8, u8, u8) = (40, 42, 54);

/// Crossfading backdrop colour.
#[derive(Debug, Clone)]
pub struct AmbientFade {
    current: [f64; 3],
    target: [f64; 3],
    /// Damping: `distance *= (1 - speed)` each tick.
    /// Good range: 0.08–0.2 at 60 fps.
    speed: f64,
}

fn channels((r, g, b): (u8, u8, u8)) -> [f64; 3] {
    [f64::from(r), f64::from(g), f64::from(b)]
}

impl AmbientFade {
    pub fn new(initial: Option<(u8, u8, u8)>, speed: f64) -> Self {
        let start = channels(initial.unwrap_or(NEUTRAL));
        Self {
            current: start,
            target: start,
            speed: speed.clamp(0.02, 0.95),
        }
    }

    /// Point the fade at a new accent (or the neutral backdrop).
    pub fn set_target(&mut self, accent: Option<(u8, u8, u8)>) {
        self.target = channels(accent.unwrap_or(NEUTRAL));
    }

    /// Decay the distance to the target.  Call once per frame.
    pub fn tick(&mut self) {
        for (c, t) in self.current.iter_mut().zip(self.target) {
            *c += (t - *c) * self.speed;
            if (t - *c).abs() < 0.5 {
                *c = t;
            }
        }
    }

    /// Current colour, rounded.
    pub fn color(&self) -> (u8, u8, u8) {
        let [r, g, b] = self.current.map(|c| c.round().clamp(0.0, 255.0) as u8);
        (r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_converges_to_target() {
        let mut fade = AmbientFade::new(Some((0, 0, 0)), 0.2);
        fade.set_target(Some((200, 100, 50)));
        fade.tick();
        let (r, _, _) = fade.color();
        assert!(r > 0 && r < 200);
        for _ in 0..200 {
            fade.tick();
        }
        assert_eq!(fade.color(), (200, 100, 50));
        assert_eq!(fade.current, fade.target);
    }

    #[test]
    fn test_missing_accent_uses_neutral() {
        let mut fade = AmbientFade::new(None, 0.5);
        assert_eq!(fade.color(), NEUTRAL);
        fade.set_target(Some((255, 255, 255)));
        fade.set_target(None);
        fade.tick();
        assert_eq!(fade.color(), NEUTRAL);
    }
}
