use color_eyre::eyre::WrapErr;
use crossterm::{
    event::{
        self, Event as CrosstermEvent, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use std::{
    io::stdout,
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

/// Representation of all possible events.
#[derive(Clone, Debug)]
pub enum Event {
    /// An event that is emitted on a regular schedule.
    /// Drives the simulation at the configured tick rate and carries the
    /// time it was sent
    Tick(Instant),
    /// Crossterm events (keyboard, mouse, etc.)
    Crossterm(CrosstermEvent),
    /// Application events
    App(AppEvent),
}

/// Application events for game control
#[derive(Clone, Debug)]
pub enum AppEvent {
    /// Quit the application
    Quit,
    /// Start a new match after game over
    Restart,
    /// Terminal resize event
    TerminalResize(u16, u16), // width, height
}

/// Terminal event handler with enhanced keyboard support
pub struct EventHandler {
    /// Event sender channel
    sender: mpsc::Sender<Event>,
    /// Event receiver channel
    receiver: mpsc::Receiver<Event>,
    /// Whether key release events are reported
    keyboard_enhanced: bool,
}

impl EventHandler {
    /// Spawn the event thread. Raw mode is expected to be on already.
    pub fn new(tick_hz: u16) -> color_eyre::Result<Self> {
        let (sender, receiver) = mpsc::channel();

        let keyboard_enhanced = matches!(supports_keyboard_enhancement(), Ok(true));

        // Release events are what make "held key" input possible
        if keyboard_enhanced {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )
            .wrap_err("failed to enable keyboard enhancement")?;
        }

        let actor = EventThread::new(sender.clone(), tick_hz);
        thread::spawn(move || {
            if let Err(e) = actor.run() {
                log::error!("event thread error: {e}");
            }
        });

        Ok(Self {
            sender,
            receiver,
            keyboard_enhanced,
        })
    }

    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }

    /// Receives an event from the sender (blocking)
    pub fn next(&self) -> color_eyre::Result<Event> {
        Ok(self.receiver.recv()?)
    }

    /// Queue an app event
    pub fn send(&mut self, app_event: AppEvent) {
        let _ = self.sender.send(Event::App(app_event));
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
    }
}

/// A thread that handles reading crossterm events and emitting tick events
struct EventThread {
    sender: mpsc::Sender<Event>,
    tick_interval: Duration,
}

impl EventThread {
    fn new(sender: mpsc::Sender<Event>, tick_hz: u16) -> Self {
        Self {
            sender,
            tick_interval: Duration::from_secs_f64(1.0 / f64::from(tick_hz.max(1))),
        }
    }

    fn run(self) -> color_eyre::Result<()> {
        let mut last_tick = Instant::now();

        loop {
            let timeout = self.tick_interval.saturating_sub(last_tick.elapsed());
            if timeout == Duration::ZERO {
                last_tick = Instant::now();
                if !self.send(Event::Tick(last_tick)) {
                    return Ok(()); // receiver gone, app is shutting down
                }
                continue;
            }

            if event::poll(timeout).wrap_err("failed to poll for crossterm events")? {
                let event = event::read().wrap_err("failed to read crossterm event")?;

                let forwarded = match event {
                    CrosstermEvent::Resize(width, height) => {
                        Event::App(AppEvent::TerminalResize(width, height))
                    }
                    other => Event::Crossterm(other),
                };
                if !self.send(forwarded) {
                    return Ok(());
                }
            }
        }
    }

    fn send(&self, event: Event) -> bool {
        self.sender.send(event).is_ok()
    }
}
