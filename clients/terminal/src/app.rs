use crate::event::{AppEvent, Event, EventHandler};
use ratatui::{
    crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    DefaultTerminal,
};
use std::thread;
use std::time::Instant;
use tennis_core::{Config, Event as GameEvent, Game, Input};

/// Game key mapping for cleaner input handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameKey {
    Up,
    Down,
}

fn map_keycode_to_game_key(code: KeyCode) -> Option<GameKey> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(GameKey::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(GameKey::Down),
        _ => None,
    }
}

/// Common trait for player input handling
trait PlayerInput {
    fn handle_key(&mut self, key: GameKey, kind: KeyEventKind);
    fn to_game_input(&self) -> Input;
    fn reset(&mut self);
    fn update(&mut self) {} // Default no-op, overridden by latching input
}

/// Held-key input for terminals that report key releases
#[derive(Default)]
struct EnhancedPlayerInput {
    up_held: bool,
    down_held: bool,
}

impl PlayerInput for EnhancedPlayerInput {
    fn handle_key(&mut self, key: GameKey, kind: KeyEventKind) {
        let held = matches!(kind, KeyEventKind::Press | KeyEventKind::Repeat);
        match key {
            GameKey::Up => self.up_held = held,
            GameKey::Down => self.down_held = held,
        }
    }

    fn to_game_input(&self) -> Input {
        Input::new(self.up_held, self.down_held)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Ticks a key press counts as held when releases are not reported.
/// Keyboard auto-repeat refreshes it while the key stays down.
const LATCH_TICKS: u8 = 12;

/// Latching input for terminals without release events
#[derive(Default)]
struct LatchedPlayerInput {
    up_ticks: u8,
    down_ticks: u8,
}

impl PlayerInput for LatchedPlayerInput {
    fn handle_key(&mut self, key: GameKey, kind: KeyEventKind) {
        if kind == KeyEventKind::Release {
            return;
        }
        // A new direction cancels the other one immediately
        match key {
            GameKey::Up => {
                self.up_ticks = LATCH_TICKS;
                self.down_ticks = 0;
            }
            GameKey::Down => {
                self.down_ticks = LATCH_TICKS;
                self.up_ticks = 0;
            }
        }
    }

    fn to_game_input(&self) -> Input {
        Input::new(self.up_ticks > 0, self.down_ticks > 0)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn update(&mut self) {
        self.up_ticks = self.up_ticks.saturating_sub(1);
        self.down_ticks = self.down_ticks.saturating_sub(1);
    }
}

/// Input system that adapts to terminal capabilities
struct InputSystem {
    player: Box<dyn PlayerInput>,
    is_enhanced: bool,
}

impl InputSystem {
    fn new(is_enhanced: bool) -> Self {
        let player: Box<dyn PlayerInput> = if is_enhanced {
            Box::new(EnhancedPlayerInput::default())
        } else {
            Box::new(LatchedPlayerInput::default())
        };
        Self {
            player,
            is_enhanced,
        }
    }

    fn get_mode_description(&self) -> &'static str {
        if self.is_enhanced {
            "Enhanced (hold keys)"
        } else {
            "Latched (key repeat)"
        }
    }

    fn get_input(&self) -> Input {
        self.player.to_game_input()
    }

    fn reset(&mut self) {
        self.player.reset();
    }

    fn handle_key_event(&mut self, event: KeyEvent) {
        if let Some(game_key) = map_keycode_to_game_key(event.code) {
            self.player.handle_key(game_key, event.kind);
        }
    }

    /// Called once per simulation tick, after the input was consumed
    fn update(&mut self) {
        self.player.update();
    }
}

/// Drops ticks that were sent before a blocking pause ended
#[derive(Debug, Default)]
struct TickGate {
    resume_at: Option<Instant>,
}

impl TickGate {
    /// Whether a tick sent at `sent_at` should advance the game
    fn accept(&mut self, sent_at: Instant) -> bool {
        match self.resume_at {
            Some(resume_at) if sent_at < resume_at => false,
            _ => {
                self.resume_at = None;
                true
            }
        }
    }

    /// Ignore every tick sent before `at`
    fn hold_until(&mut self, at: Instant) {
        self.resume_at = Some(at);
    }

    fn clear(&mut self) {
        self.resume_at = None;
    }
}

/// Game board size constants
pub const MIN_GAME_WIDTH: u16 = 60;
pub const MIN_GAME_HEIGHT: u16 = 20;
const FIXED_GAME_WIDTH: u16 = 84;
const FIXED_GAME_HEIGHT: u16 = 30;

/// Main application
pub struct App {
    /// Is the application running?
    pub running: bool,
    /// Game instance
    pub game: Game,
    /// Input system
    input_system: InputSystem,
    /// Discards ticks queued during a blocking serve pause
    tick_gate: TickGate,
    /// Event handler
    pub events: EventHandler,
    /// Current terminal size
    pub terminal_size: (u16, u16),
    /// Whether UI is paused due to small terminal
    pub ui_paused: bool,
}

impl App {
    /// Constructs a new instance of App
    pub fn new(config: Config) -> color_eyre::Result<Self> {
        let events = EventHandler::new(config.tick_hz)?;
        let input_system = InputSystem::new(events.keyboard_enhanced());

        log::info!(
            "input mode: {}, seed: {}, pause: {:?}",
            input_system.get_mode_description(),
            config.seed,
            config.serve_pause
        );

        Ok(Self {
            running: true,
            game: Game::new(config),
            input_system,
            tick_gate: TickGate::default(),
            events,
            terminal_size: (80, 24), // Default size
            ui_paused: false,
        })
    }

    /// Run the application's main loop
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let size = terminal.size()?;
        self.handle_resize(size.width, size.height);

        while self.running {
            terminal.draw(|frame| frame.render_widget(&self, frame.area()))?;
            self.handle_events()?;
        }
        Ok(())
    }

    pub fn handle_events(&mut self) -> color_eyre::Result<()> {
        match self.events.next()? {
            Event::Tick(sent_at) => self.tick(sent_at),
            Event::Crossterm(crossterm::event::Event::Key(key_event)) => {
                self.handle_key_event(key_event)
            }
            Event::Crossterm(_) => {}
            Event::App(app_event) => self.handle_app_event(app_event),
        }
        Ok(())
    }

    /// Handle key events and convert to app events
    pub fn handle_key_event(&mut self, key_event: KeyEvent) {
        let pressed = key_event.kind == KeyEventKind::Press;

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc if pressed => {
                self.events.send(AppEvent::Quit);
            }
            KeyCode::Char('c') | KeyCode::Char('C')
                if pressed && key_event.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.events.send(AppEvent::Quit);
            }
            KeyCode::Char('r') | KeyCode::Char('R') if pressed && self.game.is_over() => {
                self.events.send(AppEvent::Restart);
            }
            _ => self.input_system.handle_key_event(key_event),
        }
    }

    /// Handle application events
    fn handle_app_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::Quit => self.quit(),
            AppEvent::Restart => self.restart(),
            AppEvent::TerminalResize(width, height) => self.handle_resize(width, height),
        }
    }

    /// Handle tick event for game updates
    fn tick(&mut self, sent_at: Instant) {
        if !self.tick_gate.accept(sent_at) {
            return;
        }

        if self.ui_paused {
            return;
        }

        let input = self.input_system.get_input();
        for event in self.game.step(input) {
            if let GameEvent::ServePause(pause) = event {
                thread::sleep(pause);
                self.tick_gate.hold_until(Instant::now());
            }
        }
        self.input_system.update();
    }

    fn quit(&mut self) {
        log::info!("quit requested");
        self.running = false;
    }

    fn restart(&mut self) {
        self.game.reset_match();
        self.input_system.reset();
        self.tick_gate.clear();
    }

    // Terminal size management
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);

        // Check if terminal is large enough for game
        self.ui_paused = width < MIN_GAME_WIDTH || height < MIN_GAME_HEIGHT;
    }

    pub fn input_mode(&self) -> &'static str {
        self.input_system.get_mode_description()
    }

    pub fn calculate_centered_game_area(
        &self,
        area: ratatui::layout::Rect,
    ) -> Option<ratatui::layout::Rect> {
        if self.ui_paused {
            return None; // Too small
        }

        // Calculate centered position for fixed-size game field
        let game_width = FIXED_GAME_WIDTH.min(area.width);
        let game_height = FIXED_GAME_HEIGHT.min(area.height);

        let x_offset = area.width.saturating_sub(game_width) / 2;
        let y_offset = area.height.saturating_sub(game_height) / 2;

        Some(ratatui::layout::Rect {
            x: area.x + x_offset,
            y: area.y + y_offset,
            width: game_width,
            height: game_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_key_mapping() {
        assert_eq!(map_keycode_to_game_key(KeyCode::Up), Some(GameKey::Up));
        assert_eq!(map_keycode_to_game_key(KeyCode::Char('s')), Some(GameKey::Down));
        assert_eq!(map_keycode_to_game_key(KeyCode::Char('x')), None);
    }

    #[test]
    fn test_enhanced_input_holds_until_release() {
        let mut input = EnhancedPlayerInput::default();

        input.handle_key(GameKey::Up, KeyEventKind::Press);
        input.handle_key(GameKey::Down, KeyEventKind::Press);
        assert_eq!(input.to_game_input(), Input::new(true, true));

        input.handle_key(GameKey::Up, KeyEventKind::Repeat);
        input.handle_key(GameKey::Down, KeyEventKind::Release);
        assert_eq!(input.to_game_input(), Input::new(true, false));

        input.handle_key(GameKey::Up, KeyEventKind::Release);
        assert_eq!(input.to_game_input(), Input::zero());
    }

    #[test]
    fn test_latched_input_expires() {
        let mut input = LatchedPlayerInput::default();

        input.handle_key(GameKey::Down, KeyEventKind::Press);
        for _ in 0..LATCH_TICKS {
            assert_eq!(input.to_game_input(), Input::new(false, true));
            input.update();
        }
        assert_eq!(input.to_game_input(), Input::zero());
    }

    #[test]
    fn test_tick_gate_accepts_every_tick_without_pause() {
        let mut gate = TickGate::default();
        let start = Instant::now();

        // Jittered spacing below the nominal interval still steps
        assert!(gate.accept(start));
        assert!(gate.accept(start + Duration::from_micros(15_900)));
        assert!(gate.accept(start + Duration::from_micros(16_000)));
    }

    #[test]
    fn test_tick_gate_drops_ticks_queued_during_pause() {
        let mut gate = TickGate::default();
        let start = Instant::now();
        let tick = Duration::from_millis(17);
        let resumed = start + Duration::from_millis(500);

        gate.hold_until(resumed);

        let accepted = (1..=31)
            .map(|i| start + tick * i)
            .filter(|&sent_at| gate.accept(sent_at))
            .count();
        assert_eq!(accepted, 2); // sent at 510 ms and 527 ms
        assert!(gate.accept(resumed + tick * 2));
    }

    #[test]
    fn test_tick_gate_clear_lifts_hold() {
        let mut gate = TickGate::default();
        let start = Instant::now();

        gate.hold_until(start + Duration::from_secs(1));
        gate.clear();

        assert!(gate.accept(start));
    }

    #[test]
    fn test_latched_input_switches_direction() {
        let mut input = LatchedPlayerInput::default();

        input.handle_key(GameKey::Down, KeyEventKind::Press);
        input.handle_key(GameKey::Up, KeyEventKind::Press);

        assert_eq!(input.to_game_input(), Input::new(true, false));
    }
}
