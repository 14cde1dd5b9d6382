//! Main game logic and state management.

use rand_pcg::Pcg32;

use crate::ai::ai_intent;
use crate::physics::Physics;
use crate::serve::{RngServe, ServeSource};
use crate::types::*;

/// Main game state and logic
pub struct Game<S = RngServe<Pcg32>> {
    pub config: Config,
    pub tick: Tick,
    pub status: Status,
    pub player: Paddle,
    pub ai: Paddle,
    pub ball: Ball,
    pub score: Score,
    serve: S,
}

impl Game {
    /// Create a new game with the given configuration, serving from a PCG
    /// generator seeded with `config.seed`
    pub fn new(config: Config) -> Self {
        Game::with_serve(config, RngServe::from_config(&config))
    }
}

impl<S: ServeSource> Game<S> {
    /// Create a new game that draws serve directions from `serve`
    pub fn with_serve(config: Config, serve: S) -> Self {
        let mut game = Game {
            config,
            tick: 0,
            status: Status::Playing,
            player: Paddle::for_side(Side::Player, &config),
            ai: Paddle::for_side(Side::Ai, &config),
            ball: Ball::new(config.court_center(), Vec2::zero(), config.ball_radius),
            score: Score::default(),
            serve,
        };

        Physics::serve_ball(&mut game.ball, &game.config, &mut game.serve);
        game
    }

    /// Step the game simulation forward by one tick.
    ///
    /// A finished match ignores the call entirely.
    pub fn step(&mut self, input: Input) -> Vec<Event> {
        let mut events = Vec::new();

        match self.status {
            Status::GameOver(_) => return events,

            Status::ServePending(ticks_remaining) => {
                self.status = if ticks_remaining <= 1 {
                    Status::Playing
                } else {
                    Status::ServePending(ticks_remaining - 1)
                };
            }

            Status::Playing => {
                Physics::update_player_paddle(&mut self.player, &input, &self.config);

                // AI reacts to where the ball is before it moves this tick
                let intent = ai_intent(&self.ai, &self.ball, self.config.ai_speed);
                Physics::update_ai_paddle(&mut self.ai, intent, &self.config);

                self.update_ball(&mut events);
            }
        }

        self.tick = self.tick.wrapping_add(1);
        events
    }

    /// Move the ball, then resolve walls, paddles and goals in that order
    fn update_ball(&mut self, events: &mut Vec<Event>) {
        Physics::update_ball(&mut self.ball);

        if Physics::bounce_walls(&mut self.ball, &self.config) {
            log::debug!("tick {}: wall bounce at {:?}", self.tick, self.ball.pos);
            events.push(Event::WallBounce);
        }

        if Physics::bounce_paddles(&mut self.ball, &[self.player, self.ai]) {
            log::debug!("tick {}: paddle bounce at {:?}", self.tick, self.ball.pos);
            events.push(Event::PaddleBounce);
        }

        // Left goal first, then right, each checked on its own
        for scorer in [Side::Ai, Side::Player] {
            if Physics::check_goal(&self.ball, scorer, &self.config) {
                self.handle_score(scorer, events);
            }
        }
    }

    /// Handle a scoring event
    fn handle_score(&mut self, scorer: Side, events: &mut Vec<Event>) {
        let count = self.score.award(scorer);
        log::info!(
            "{:?} scores: {} - {}",
            scorer,
            self.score.player,
            self.score.ai
        );
        events.push(Event::Scored {
            scorer,
            score: self.score,
        });

        if !self.is_over() && count >= self.config.winning_score {
            log::info!("match over: {}", scorer.winner_label());
            self.status = Status::GameOver(scorer);
            events.push(Event::MatchOver { winner: scorer });
        }

        self.reset_ball(events);
    }

    /// Re-center the ball. Serves again with a pause unless the match is over.
    fn reset_ball(&mut self, events: &mut Vec<Event>) {
        if self.is_over() {
            Physics::park_ball(&mut self.ball, &self.config);
            return;
        }

        Physics::serve_ball(&mut self.ball, &self.config, &mut self.serve);

        match self.config.serve_pause {
            ServePause::Ticks => {
                let ticks = self.config.serve_pause_ticks();
                if ticks > 0 {
                    self.status = Status::ServePending(ticks);
                }
            }
            ServePause::Blocking => {
                let pause = self.config.serve_pause_duration();
                if !pause.is_zero() {
                    events.push(Event::ServePause(pause));
                }
            }
        }
    }

    /// Generate a view of the current game state for rendering
    pub fn view(&self) -> View {
        let result = self.result();
        View {
            tick: self.tick,
            status: self.status,
            court_width: self.config.court_width,
            court_height: self.config.court_height,
            player_paddle: self.player.rect(),
            ai_paddle: self.ai.rect(),
            ball_pos: self.ball.pos,
            ball_radius: self.ball.radius,
            score: self.score,
            is_over: result.is_over,
            winner_label: result.winner.map(Side::winner_label),
        }
    }

    /// Reset the game for a new match. The serve source keeps its sequence.
    pub fn reset_match(&mut self) {
        self.tick = 0;
        self.status = Status::Playing;
        self.score = Score::default();
        self.player = Paddle::for_side(Side::Player, &self.config);
        self.ai = Paddle::for_side(Side::Ai, &self.config);
        Physics::serve_ball(&mut self.ball, &self.config, &mut self.serve);
        log::info!("new match started");
    }

    /// Outcome of the match so far
    pub fn result(&self) -> MatchResult {
        MatchResult {
            is_over: self.is_over(),
            winner: self.winner(),
        }
    }

    /// Get the current winner (if game is over)
    pub fn winner(&self) -> Option<Side> {
        match self.status {
            Status::GameOver(winner) => Some(winner),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.status, Status::GameOver(_))
    }

    /// Check if the game is active (accepting inputs)
    pub fn is_active(&self) -> bool {
        matches!(self.status, Status::Playing)
    }

    /// Get a human-readable status string
    pub fn status_string(&self) -> &'static str {
        match self.status {
            Status::Playing => "Playing",
            Status::ServePending(_) => "Point scored!",
            Status::GameOver(_) => "Game over",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serve::ScriptedServe;
    use std::time::Duration;

    fn scripted(config: Config, signs: &[i32]) -> Game<ScriptedServe> {
        Game::with_serve(config, ScriptedServe::new(signs.iter().copied()))
    }

    #[test]
    fn test_game_creation() {
        let config = Config::default();
        let game = Game::new(config);

        assert_eq!(game.tick, 0);
        assert_eq!(game.status, Status::Playing);
        assert_eq!(game.score, Score::default());
        assert_eq!(game.ball.pos, Vec2::new(400, 300));
        assert_eq!(game.ball.vel.x.abs(), 5);
        assert_eq!(game.ball.vel.y.abs(), 5);
        assert_eq!(game.player.y, 250);
        assert_eq!(game.ai.y, 250);
        assert_eq!(game.player.x, 50);
        assert_eq!(game.ai.x, 735);
    }

    #[test]
    fn test_scripted_initial_serve() {
        let game = scripted(Config::default(), &[-1, 1]);

        assert_eq!(game.ball.vel, Vec2::new(-5, 5));
    }

    #[test]
    fn test_one_tick_from_center() {
        let mut game = scripted(Config::default(), &[1, 1]);

        let events = game.step(Input::zero());

        assert_eq!(game.ball.pos, Vec2::new(405, 305));
        assert_eq!(game.ball.vel, Vec2::new(5, 5));
        assert!(events.is_empty());
        assert_eq!(game.tick, 1);
    }

    #[test]
    fn test_player_both_keys_moves_up() {
        let mut game = scripted(Config::default(), &[1, 1]);

        game.step(Input::new(true, true));

        assert_eq!(game.player.y, 250 - game.config.player_speed);
    }

    #[test]
    fn test_ai_holds_when_aligned() {
        let mut game = scripted(Config::default(), &[1, 1]);
        // Ball and AI paddle both centered at y = 300
        assert_eq!(game.ai.center_y(), game.ball.pos.y);

        game.step(Input::zero());

        assert_eq!(game.ai.y, 250);
    }

    #[test]
    fn test_ai_follows_ball() {
        let mut game = scripted(Config::default(), &[1, 1]);
        game.ball.pos.y = 100;

        game.step(Input::zero());

        assert_eq!(game.ai.y, 250 - game.config.ai_speed);
    }

    #[test]
    fn test_wall_and_paddle_flip_same_tick() {
        let mut game = scripted(Config::default(), &[1, 1]);
        game.player.y = 0;
        // Moves to (70, 7): top edge past the wall and inside the paddle face
        game.ball.pos = Vec2::new(75, 12);
        game.ball.vel = Vec2::new(-5, -5);

        let events = game.step(Input::zero());

        assert_eq!(game.ball.vel, Vec2::new(5, 5));
        assert_eq!(events, vec![Event::WallBounce, Event::PaddleBounce]);
    }

    #[test]
    fn test_ai_scores_on_left_wall() {
        let mut game = scripted(Config::default(), &[1, 1, -1, 1]);
        game.ball.pos = Vec2::new(12, 300);
        game.ball.vel = Vec2::new(-5, 5);

        let events = game.step(Input::zero());

        assert_eq!(game.score, Score { player: 0, ai: 1 });
        assert_eq!(
            events,
            vec![Event::Scored {
                scorer: Side::Ai,
                score: Score { player: 0, ai: 1 },
            }]
        );
        assert_eq!(game.ball.pos, Vec2::new(400, 300));
        assert_eq!(game.ball.vel, Vec2::new(-5, 5));
        assert_eq!(game.status, Status::ServePending(30));
    }

    #[test]
    fn test_serve_pause_freezes_thirty_ticks() {
        let mut game = scripted(Config::default(), &[1, 1]);
        game.ball.pos = Vec2::new(788, 300);
        game.ball.vel = Vec2::new(5, 5);
        game.step(Input::zero());
        assert_eq!(game.score.player, 1);

        let player_y = game.player.y;
        for _ in 0..30 {
            assert!(!game.is_active());
            assert!(game.step(Input::new(true, false)).is_empty());
            assert_eq!(game.ball.pos, Vec2::new(400, 300));
            assert_eq!(game.player.y, player_y);
        }

        assert_eq!(game.status, Status::Playing);
        game.step(Input::zero());
        assert_eq!(game.ball.pos, Vec2::new(405, 305));
    }

    #[test]
    fn test_blocking_pause_reported_to_host() {
        let config = Config {
            serve_pause: ServePause::Blocking,
            ..Config::default()
        };
        let mut game = scripted(config, &[1, 1]);
        game.ball.pos = Vec2::new(788, 300);

        let events = game.step(Input::zero());

        assert_eq!(
            events.last(),
            Some(&Event::ServePause(Duration::from_millis(500)))
        );
        assert_eq!(game.status, Status::Playing);
    }

    #[test]
    fn test_zero_pause_keeps_playing() {
        let config = Config {
            serve_pause_ms: 0,
            ..Config::default()
        };
        let mut game = scripted(config, &[1, 1]);
        game.ball.pos = Vec2::new(788, 300);

        let events = game.step(Input::zero());

        assert_eq!(events.len(), 1);
        assert_eq!(game.status, Status::Playing);
    }

    #[test]
    fn test_player_wins_from_six() {
        let mut game = scripted(Config::default(), &[1, 1]);
        game.score.player = 6;
        game.ball.pos = Vec2::new(786, 300);
        game.ball.vel = Vec2::new(5, 5);

        let events = game.step(Input::zero());

        assert_eq!(game.score.player, 7);
        assert_eq!(game.status, Status::GameOver(Side::Player));
        assert_eq!(
            game.result(),
            MatchResult {
                is_over: true,
                winner: Some(Side::Player),
            }
        );
        assert_eq!(game.ball.pos, Vec2::new(400, 300));
        assert_eq!(game.ball.vel, Vec2::zero());
        assert!(events.contains(&Event::MatchOver {
            winner: Side::Player
        }));
    }

    #[test]
    fn test_ai_wins_at_threshold() {
        let mut game = scripted(Config::default(), &[1, 1]);
        game.score.ai = 6;
        game.ball.pos = Vec2::new(14, 300);
        game.ball.vel = Vec2::new(-5, 5);

        game.step(Input::zero());

        assert_eq!(game.winner(), Some(Side::Ai));
        assert_eq!(game.view().winner_label, Some("AI Wins!"));
    }

    #[test]
    fn test_game_over_is_frozen() {
        let mut game = scripted(Config::default(), &[1, 1]);
        game.score.player = 6;
        game.ball.pos = Vec2::new(786, 300);
        game.step(Input::zero());
        assert!(game.is_over());

        let before = (game.tick, game.ball, game.player, game.ai, game.score);
        for _ in 0..100 {
            assert!(game.step(Input::new(false, true)).is_empty());
        }

        assert_eq!(before, (game.tick, game.ball, game.player, game.ai, game.score));
        assert_eq!(game.winner(), Some(Side::Player));
    }

    #[test]
    fn test_reset_match() {
        let mut game = scripted(Config::default(), &[1, 1, -1, -1]);
        game.tick = 1000;
        game.score = Score { player: 7, ai: 3 };
        game.status = Status::GameOver(Side::Player);
        game.player.y = 0;

        game.reset_match();

        assert_eq!(game.tick, 0);
        assert_eq!(game.status, Status::Playing);
        assert_eq!(game.score, Score::default());
        assert_eq!(game.player.y, 250);
        assert_eq!(game.ai.y, 250);
        assert_eq!(game.ball.pos, Vec2::new(400, 300));
        assert_eq!(game.ball.vel, Vec2::new(-5, -5));
    }

    #[test]
    fn test_view_generation() {
        let game = Game::new(Config::default());
        let view = game.view();

        assert_eq!(view.tick, game.tick);
        assert_eq!(view.status, game.status);
        assert_eq!(view.player_paddle, Rect::new(50, 250, 15, 100));
        assert_eq!(view.ai_paddle, Rect::new(735, 250, 15, 100));
        assert_eq!(view.ball_pos, game.ball.pos);
        assert_eq!(view.ball_radius, 10);
        assert_eq!(view.score, game.score);
        assert!(!view.is_over);
        assert_eq!(view.winner_label, None);
    }

    #[test]
    fn test_deterministic_simulation() {
        let config = Config::default();
        let mut game1 = Game::new(config);
        let mut game2 = Game::new(config);

        for i in 0..2000 {
            let input = Input::new(i % 7 < 3, i % 5 == 0);
            assert_eq!(game1.step(input), game2.step(input));
        }

        assert_eq!(game1.tick, game2.tick);
        assert_eq!(game1.status, game2.status);
        assert_eq!(game1.player, game2.player);
        assert_eq!(game1.ai, game2.ai);
        assert_eq!(game1.ball, game2.ball);
        assert_eq!(game1.score, game2.score);
    }

    #[test]
    fn test_tick_counter_wraps() {
        let mut game = scripted(Config::default(), &[1, 1]);
        game.tick = Tick::MAX;

        game.step(Input::zero());

        assert_eq!(game.tick, 0);
        assert_eq!(game.ball.pos, Vec2::new(405, 305));
    }

    #[test]
    fn test_status_string() {
        let mut game = Game::new(Config::default());

        assert_eq!(game.status_string(), "Playing");

        game.status = Status::ServePending(3);
        assert_eq!(game.status_string(), "Point scored!");

        game.status = Status::GameOver(Side::Ai);
        assert_eq!(game.status_string(), "Game over");
    }
}
