//! Dashboard runtime: owns the terminal, runs the event loop, executes effects.
//!
//! This is the only place side effects happen. The reducer in `update`
//! returns effects; this module spawns them and feeds their results back
//! through the inbox.
//!
//! Structure:
//! - `mod.rs`: `TuiRuntime`, event loop, effect dispatch
//! - `inbox.rs`: inbox channel types
//! - `handlers/`: fetch, refresh timer and todo writer implementations

mod handlers;
mod inbox;

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use dashgrid_core::config::Dashboard;
use handlers::{PersistJob, TodoWriter};
use inbox::{UiEventReceiver, UiEventSender};
use tokio::sync::mpsc;

use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::terminal::DashboardTerminal;
use crate::{render, terminal, update};

/// Poll interval right after user input, so scrolling feels immediate.
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll interval when the user is idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen dashboard runtime.
///
/// The terminal is restored when the runtime is dropped, including on
/// error returns from [`TuiRuntime::run`].
pub struct TuiRuntime {
    terminal: DashboardTerminal,
    pub state: AppState,
    /// Handlers send their results here.
    inbox_tx: UiEventSender,
    /// Drained once per loop iteration.
    inbox_rx: UiEventReceiver,
    todo_writer: TodoWriter,
    last_tick: Instant,
    last_terminal_event: Instant,
}

impl TuiRuntime {
    /// Takes over the terminal. Must be called inside a tokio runtime.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(dashboard: Dashboard) -> Result<Self> {
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let state = AppState::new(dashboard);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let todo_writer = TodoWriter::spawn(inbox_tx.clone());

        let now = Instant::now();
        Ok(Self {
            terminal,
            state,
            inbox_tx,
            inbox_rx,
            todo_writer,
            last_tick: now,
            last_terminal_event: now,
        })
    }

    /// Runs until the user quits.
    ///
    /// # Errors
    /// Returns an error if terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_mouse_capture()?;

        tracing::info!(components = self.state.order.len(), "Dashboard started");
        let effects = update::init(&self.state);
        self.execute_effects(effects);

        let result = self.event_loop();

        let _ = terminal::disable_mouse_capture();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            let mut events = self.collect_events()?;

            // Layout must be current before input is hit-tested against it.
            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = Instant::now();
                }
                // Renders are batched to the tick cadence.
                if matches!(&event, UiEvent::Tick) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty && !self.state.should_quit {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        tracing::info!("Dashboard stopped");
        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let tick_interval = if self.last_terminal_event.elapsed() < IDLE_POLL_DURATION {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        // Block until the next tick unless results are already waiting.
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async handler and sends its result event to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::Fetch {
                component_id,
                request,
            } => {
                tracing::debug!(id = %component_id, ?request, "Fetch");
                self.spawn_effect(move || handlers::fetch_component(component_id, request));
            }
            UiEffect::ScheduleRefresh {
                component_id,
                interval,
            } => {
                self.spawn_effect(move || handlers::refresh_timer(component_id, interval));
            }
            UiEffect::PersistTodos {
                component_id,
                path,
                items,
            } => {
                self.todo_writer.submit(PersistJob {
                    component_id,
                    path,
                    items,
                });
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
