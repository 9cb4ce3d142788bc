use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::info;

use crate::game::{Action, Direction, GameConfig, GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::render::Renderer;
use crate::tracking::{HandSignalSource, TrackerConfig};

/// The interactive mode: hand-tracked steering, terminal board, 4 Hz tick
pub struct PlayMode {
    engine: GameEngine,
    state: GameState,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    signals: mpsc::Receiver<Direction>,
    shutdown: Arc<AtomicBool>,
    tracker: Option<JoinHandle<()>>,
    should_quit: bool,
}

impl PlayMode {
    /// Start the hand tracker and set up a fresh round.
    ///
    /// Camera and detector failures surface here, before the terminal is
    /// touched, so the error lands on a usable screen.
    pub fn new(config: GameConfig, tracker_config: TrackerConfig) -> Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let (source, signals) = HandSignalSource::open(&tracker_config, Arc::clone(&shutdown))?;
        let tracker = source.spawn();

        let renderer = Renderer::new(&config);
        let mut engine = GameEngine::new(config);
        let state = engine.reset(Instant::now());

        Ok(Self {
            engine,
            state,
            metrics: SessionMetrics::new(),
            renderer,
            input_handler: InputHandler::new(),
            signals,
            shutdown,
            tracker: Some(tracker),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(out);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor().context("failed to hide cursor")?;
        terminal.clear().context("failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;
        self.stop_tracker();

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut ticker = interval(Duration::from_millis(self.engine.config().tick_ms));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = ticker.tick() => {
                    self.tick();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &self.metrics);
                    }).context("failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// One simulation tick: drain at most one pending direction signal,
    /// step the engine, fold the score into the session high score.
    /// Skipped entirely once the round is over.
    fn tick(&mut self) {
        if self.state.is_over() {
            return;
        }

        let action = next_action(&mut self.signals);
        let outcome = self.engine.step(&mut self.state, action, Instant::now());
        self.metrics.observe_score(self.state.score);

        if let Some(cause) = outcome.game_over {
            self.metrics.on_round_over();
            info!(?cause, score = self.state.score, "round over");
        }
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Restart if self.state.is_over() => self.restart(),
                KeyAction::Restart => {} // ignored mid-round
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
    }

    /// Replace the whole round state; the high score survives in the
    /// session metrics
    fn restart(&mut self) {
        self.state = self.engine.reset(Instant::now());
        info!(round = self.metrics.rounds_played + 1, "new round");
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<()> {
        disable_raw_mode().context("failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("failed to leave alternate screen")?;
        terminal.show_cursor().context("failed to show cursor")?;
        Ok(())
    }

    /// Cooperative shutdown: raise the flag, then join so the camera is
    /// released before the process exits
    fn stop_tracker(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.tracker.take() {
            let _ = handle.join();
        }
    }
}

/// At most one signal is consumed per tick; an empty channel simply means
/// no new input
fn next_action(signals: &mut mpsc::Receiver<Direction>) -> Action {
    match signals.try_recv() {
        Ok(direction) => Action::Turn(direction),
        Err(_) => Action::Continue,
    }
}
