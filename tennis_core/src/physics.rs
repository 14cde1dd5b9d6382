//! Per-tick physics for paddles and the ball.

use crate::serve::ServeSource;
use crate::types::*;

/// Physics calculations for game simulation
pub struct Physics;

impl Physics {
    /// Move the player paddle by one step.
    ///
    /// The edge guard runs before the move: a paddle already touching the
    /// top (or bottom) ignores further up (or down) input. The step itself is
    /// capped at the edge.
    pub fn update_player_paddle(paddle: &mut Paddle, input: &Input, config: &Config) {
        match input.intent() {
            Intent::Up if paddle.top() > 0 => {
                paddle.y = (paddle.y - config.player_speed).max(0);
            }
            Intent::Down if paddle.bottom() < config.court_height => {
                paddle.y = (paddle.y + config.player_speed).min(config.paddle_max_y());
            }
            _ => {}
        }
    }

    /// Move the AI paddle by one step, then clamp it back into the court.
    pub fn update_ai_paddle(paddle: &mut Paddle, intent: Intent, config: &Config) {
        match intent {
            Intent::Up => paddle.y -= config.ai_speed,
            Intent::Down => paddle.y += config.ai_speed,
            Intent::Hold => {}
        }

        if paddle.top() < 0 {
            paddle.y = 0;
        }
        if paddle.bottom() > config.court_height {
            paddle.y = config.paddle_max_y();
        }
    }

    /// Integrate ball position by one tick
    pub fn update_ball(ball: &mut Ball) {
        ball.pos.x += ball.vel.x;
        ball.pos.y += ball.vel.y;
    }

    /// Reverse vertical velocity on contact with the top or bottom wall.
    /// Position is left as is.
    pub fn bounce_walls(ball: &mut Ball, config: &Config) -> bool {
        if ball.top() <= 0 || ball.bottom() >= config.court_height {
            ball.vel.y = -ball.vel.y;
            return true;
        }
        false
    }

    /// Reverse horizontal velocity once if the ball overlaps any paddle
    pub fn bounce_paddles(ball: &mut Ball, paddles: &[Paddle]) -> bool {
        let ball_rect = ball.rect();
        if paddles.iter().any(|p| ball_rect.intersects(&p.rect())) {
            ball.vel.x = -ball.vel.x;
            return true;
        }
        false
    }

    /// Whether the ball has reached the goal line that scores for `scorer`.
    /// The AI scores on the left wall, the player on the right.
    pub fn check_goal(ball: &Ball, scorer: Side, config: &Config) -> bool {
        match scorer {
            Side::Ai => ball.left() <= 0,
            Side::Player => ball.right() >= config.court_width,
        }
    }

    /// Put the ball back at the court center with a fresh diagonal velocity
    pub fn serve_ball<S: ServeSource + ?Sized>(ball: &mut Ball, config: &Config, source: &mut S) {
        ball.pos = config.court_center();
        ball.vel = source.serve_velocity(config.ball_speed);
    }

    /// Put the ball back at the court center and stop it
    pub fn park_ball(ball: &mut Ball, config: &Config) {
        ball.pos = config.court_center();
        ball.vel = Vec2::zero();
    }
}
