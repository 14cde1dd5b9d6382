//! Core types and constants for the tennis simulation.
//!
//! All coordinates are integer pixels with the origin at the top-left corner
//! of the court and y growing downward.

use std::time::Duration;

/// Tick counter type
pub type Tick = u32;

/// Which paddle a value belongs to
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Side {
    /// Human-controlled paddle on the left
    Player,
    /// Computer-controlled paddle on the right
    Ai,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(self) -> Side {
        match self {
            Side::Player => Side::Ai,
            Side::Ai => Side::Player,
        }
    }

    /// Banner shown on the game-over screen
    pub fn winner_label(self) -> &'static str {
        match self {
            Side::Player => "Player Wins!",
            Side::Ai => "AI Wins!",
        }
    }
}

/// Match status
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    /// Active gameplay
    Playing,
    /// Ball re-centered after a point, frozen for the remaining ticks
    ServePending(u16),
    /// Match over (winner). Absorbing.
    GameOver(Side),
}

/// How the pause after a point is carried out
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ServePause {
    /// Count the pause down in simulation ticks
    #[default]
    Ticks,
    /// Ask the host to block the thread for the pause duration
    Blocking,
}

/// Game configuration
#[derive(Debug, Copy, Clone)]
pub struct Config {
    pub court_width: i32,
    pub court_height: i32,
    pub paddle_width: i32,
    pub paddle_height: i32,
    /// Distance between a side wall and the outer face of its paddle
    pub paddle_inset: i32,
    /// Player paddle movement per tick
    pub player_speed: i32,
    /// AI paddle movement per tick
    pub ai_speed: i32,
    pub ball_radius: i32,
    /// Ball velocity magnitude per axis
    pub ball_speed: Vec2,
    /// Score to win
    pub winning_score: u8,
    /// Tick frequency (Hz)
    pub tick_hz: u16,
    /// Pause after each non-final point
    pub serve_pause_ms: u32,
    pub serve_pause: ServePause,
    /// Random seed for serve directions
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            court_width: 800,
            court_height: 600,
            paddle_width: 15,
            paddle_height: 100,
            paddle_inset: 50,
            player_speed: 8,
            ai_speed: 4,
            ball_radius: 10,
            ball_speed: Vec2::new(5, 5),
            winning_score: 7,
            tick_hz: 60,
            serve_pause_ms: 500,
            serve_pause: ServePause::Ticks,
            seed: 0xC0FFEE,
        }
    }
}

impl Config {
    /// Length of the serve pause as wall-clock time
    pub fn serve_pause_duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.serve_pause_ms))
    }

    /// Length of the serve pause in ticks, rounded down
    pub fn serve_pause_ticks(&self) -> u16 {
        let ticks = u64::from(self.serve_pause_ms) * u64::from(self.tick_hz) / 1000;
        ticks.min(u64::from(u16::MAX)) as u16
    }

    /// Highest legal paddle top
    pub fn paddle_max_y(&self) -> i32 {
        self.court_height - self.paddle_height
    }

    /// Paddle top that centers a paddle vertically
    pub fn paddle_start_y(&self) -> i32 {
        self.court_height / 2 - self.paddle_height / 2
    }

    pub fn court_center(&self) -> Vec2 {
        Vec2::new(self.court_width / 2, self.court_height / 2)
    }

    /// Fixed x of a paddle's left edge
    pub fn paddle_x(&self, side: Side) -> i32 {
        match side {
            Side::Player => self.paddle_inset,
            Side::Ai => self.court_width - self.paddle_inset - self.paddle_width,
        }
    }
}

/// 2D integer vector
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

impl Vec2 {
    pub const fn new(x: i32, y: i32) -> Self {
        Vec2 { x, y }
    }

    pub const fn zero() -> Self {
        Vec2 { x: 0, y: 0 }
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Strict overlap test. Rectangles that only share an edge do not
    /// intersect, and empty rectangles never intersect anything.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.width <= 0 || self.height <= 0 || other.width <= 0 || other.height <= 0 {
            return false;
        }
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Paddle state. Only `y` moves.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Paddle {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Paddle {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Paddle {
            x,
            y,
            width,
            height,
        }
    }

    /// Paddle for `side`, vertically centered in the court
    pub fn for_side(side: Side, config: &Config) -> Self {
        Paddle::new(
            config.paddle_x(side),
            config.paddle_start_y(),
            config.paddle_width,
            config.paddle_height,
        )
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center_y(&self) -> i32 {
        self.y + self.height / 2
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Ball state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Ball {
    /// Center
    pub pos: Vec2,
    /// Velocity in pixels per tick
    pub vel: Vec2,
    pub radius: i32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, radius: i32) -> Self {
        Ball { pos, vel, radius }
    }

    pub fn left(&self) -> i32 {
        self.pos.x - self.radius
    }

    pub fn right(&self) -> i32 {
        self.pos.x + self.radius
    }

    pub fn top(&self) -> i32 {
        self.pos.y - self.radius
    }

    pub fn bottom(&self) -> i32 {
        self.pos.y + self.radius
    }

    /// Bounding box used for paddle collisions
    pub fn rect(&self) -> Rect {
        Rect::new(self.left(), self.top(), self.radius * 2, self.radius * 2)
    }
}

/// Score for both sides
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Score {
    pub player: u8,
    pub ai: u8,
}

impl Score {
    pub fn get(&self, side: Side) -> u8 {
        match side {
            Side::Player => self.player,
            Side::Ai => self.ai,
        }
    }

    /// Add one point for `side` and return the new count
    pub fn award(&mut self, side: Side) -> u8 {
        let slot = match side {
            Side::Player => &mut self.player,
            Side::Ai => &mut self.ai,
        };
        *slot = slot.saturating_add(1);
        *slot
    }
}

/// Derived outcome of the match
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub is_over: bool,
    pub winner: Option<Side>,
}

/// Movement request for one paddle on one tick
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Intent {
    Up,
    Down,
    #[default]
    Hold,
}

impl Intent {
    /// Decode a one-byte intent code (`U`, `D`, `-`, case-insensitive).
    /// Anything else is treated as no movement.
    pub fn from_code(code: u8) -> Intent {
        match code {
            b'U' | b'u' => Intent::Up,
            b'D' | b'd' => Intent::Down,
            b'-' | b'.' => Intent::Hold,
            other => {
                log::warn!("unrecognized intent code {other:#04x}, holding");
                Intent::Hold
            }
        }
    }
}

/// Player input for one tick, straight from held-key state
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Input {
    pub up: bool,
    pub down: bool,
}

impl Input {
    pub fn new(up: bool, down: bool) -> Self {
        Input { up, down }
    }

    pub fn zero() -> Self {
        Input::default()
    }

    /// Resolve to a single intent. Up wins when both are held.
    pub fn intent(&self) -> Intent {
        if self.up {
            Intent::Up
        } else if self.down {
            Intent::Down
        } else {
            Intent::Hold
        }
    }
}

impl From<Intent> for Input {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::Up => Input::new(true, false),
            Intent::Down => Input::new(false, true),
            Intent::Hold => Input::zero(),
        }
    }
}

/// View data for rendering
#[derive(Debug, Copy, Clone)]
pub struct View {
    pub tick: Tick,
    pub status: Status,
    pub court_width: i32,
    pub court_height: i32,
    pub player_paddle: Rect,
    pub ai_paddle: Rect,
    pub ball_pos: Vec2,
    pub ball_radius: i32,
    pub score: Score,
    pub is_over: bool,
    pub winner_label: Option<&'static str>,
}

/// Game events that can occur during a tick
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Event {
    WallBounce,
    PaddleBounce,
    Scored {
        scorer: Side,
        score: Score, // New score after this point
    },
    MatchOver {
        winner: Side,
    },
    /// The host should block for this long before the next tick
    ServePause(Duration),
}
