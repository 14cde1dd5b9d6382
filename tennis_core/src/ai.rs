//! Reactive AI paddle controller.

use crate::types::{Ball, Intent, Paddle};

/// Track the ball's vertical center with a dead-band of `ai_speed / 2`.
///
/// No prediction and no randomness: the paddle moves toward the ball when
/// its center is outside the band and holds otherwise. The comparison runs
/// on doubled values so odd speeds keep the half-pixel band exact.
pub fn ai_intent(paddle: &Paddle, ball: &Ball, ai_speed: i32) -> Intent {
    let paddle_cy = 2 * paddle.center_y();
    let ball_cy = 2 * ball.pos.y;

    if paddle_cy < ball_cy - ai_speed {
        Intent::Down
    } else if paddle_cy > ball_cy + ai_speed {
        Intent::Up
    } else {
        Intent::Hold
    }
}
