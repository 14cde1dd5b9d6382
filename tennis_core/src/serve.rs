//! Serve direction sources.
//!
//! Every serve draws two signs, x first, then y.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::types::{Config, Vec2};

/// Source of serve directions
pub trait ServeSource {
    /// Return `1` or `-1`
    fn next_sign(&mut self) -> i32;

    /// Diagonal velocity with each axis independently signed
    fn serve_velocity(&mut self, speed: Vec2) -> Vec2 {
        let sx = self.next_sign();
        let sy = self.next_sign();
        Vec2::new(speed.x * sx, speed.y * sy)
    }
}

impl<S: ServeSource + ?Sized> ServeSource for Box<S> {
    fn next_sign(&mut self) -> i32 {
        (**self).next_sign()
    }
}

/// Serve directions from a random number generator
#[derive(Debug, Clone)]
pub struct RngServe<R>(pub R);

impl RngServe<Pcg32> {
    /// Seeded PCG source, the default for `Game`
    pub fn seeded(seed: u64) -> Self {
        RngServe(Pcg32::seed_from_u64(seed))
    }

    pub fn from_config(config: &Config) -> Self {
        Self::seeded(config.seed)
    }
}

impl<R: Rng> ServeSource for RngServe<R> {
    fn next_sign(&mut self) -> i32 {
        if self.0.random_bool(0.5) { 1 } else { -1 }
    }
}

/// Replays a fixed cycle of signs
#[derive(Debug, Clone)]
pub struct ScriptedServe {
    signs: Vec<i32>,
    cursor: usize,
}

impl ScriptedServe {
    /// Any non-negative entry counts as `+1`, negative as `-1`. An empty
    /// script always yields `+1`.
    pub fn new(signs: impl IntoIterator<Item = i32>) -> Self {
        let signs = signs
            .into_iter()
            .map(|s| if s < 0 { -1 } else { 1 })
            .collect();
        ScriptedServe { signs, cursor: 0 }
    }

    /// Parse a `+`/`-` string such as `"+-+-"`. Returns `None` on any other
    /// character.
    pub fn parse(script: &str) -> Option<Self> {
        script
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '+' => Some(1),
                '-' => Some(-1),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Self::new)
    }
}

impl ServeSource for ScriptedServe {
    fn next_sign(&mut self) -> i32 {
        if self.signs.is_empty() {
            return 1;
        }
        let sign = self.signs[self.cursor];
        self.cursor = (self.cursor + 1) % self.signs.len();
        sign
    }
}
