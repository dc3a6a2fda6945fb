use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use color_eyre::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use esg_core::{AnalysisEngine, DashboardConfig, Theme};
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use tracing::{error, info, trace, warn};

use crate::controls::{EditOutcome, KeyAction};
use crate::ui::{draw_ui, UiState};

pub struct DashboardApp {
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    ui_state: UiState,
    engine: AnalysisEngine,
    log_receiver: Receiver<String>,
}

enum Flow {
    Continue,
    Exit,
}

impl DashboardApp {
    pub fn new(
        engine: AnalysisEngine,
        config: &DashboardConfig,
        theme: Theme,
        log_receiver: Receiver<String>,
    ) -> Result<Self> {
        let stdout = std::io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        crossterm::terminal::enable_raw_mode()?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        Ok(Self {
            terminal,
            ui_state: UiState::new(config, theme),
            engine,
            log_receiver,
        })
    }

    pub fn run(mut self) -> Result<()> {
        let result = self.event_loop();
        self.terminal.show_cursor()?;
        self.terminal.clear()?;
        crossterm::terminal::disable_raw_mode()?;
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut last_draw = Instant::now() - Duration::from_secs(1);

        loop {
            while let Ok(line) = self.log_receiver.try_recv() {
                self.ui_state.push_log(line);
            }

            if last_draw.elapsed() >= Duration::from_millis(80) {
                self.ui_state.advance_frame();
                self.terminal.draw(|frame| draw_ui(frame, &self.ui_state))?;
                last_draw = Instant::now();
            }

            if event::poll(Duration::from_millis(40))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if let Flow::Exit = self.handle_key(key) {
                        break;
                    }
                }
            }
        }

        info!("Dashboard closed");
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let outcome = match self.ui_state.inputs.apply_key(key.code) {
            KeyAction::Quit => return Flow::Exit,
            KeyAction::Analyze => {
                self.analyze();
                return Flow::Continue;
            }
            KeyAction::Reset => {
                info!("Controls reset to defaults");
                return Flow::Continue;
            }
            KeyAction::Edit(outcome) => outcome,
        };

        match outcome {
            EditOutcome::Rejected(reason) => warn!("{}", reason),
            EditOutcome::Changed => {
                let current = self.ui_state.inputs.current();
                trace!(
                    control = ?self.ui_state.inputs.focus(),
                    governance = current.governance,
                    social = current.social,
                    environmental = current.environmental,
                    "controls.changed"
                );
            }
            EditOutcome::Unchanged => {}
        }
        Flow::Continue
    }

    fn analyze(&mut self) {
        let (input, outcome) = self.ui_state.inputs.collect();
        if let EditOutcome::Rejected(reason) = outcome {
            warn!("{}", reason);
        }
        match self.engine.analyze(&input) {
            Ok(outcome) => {
                info!(
                    "Result: {} ({})",
                    outcome.prediction.label,
                    outcome.presentation.treatment.as_str()
                );
                self.ui_state.record_outcome(outcome, Instant::now());
            }
            Err(err) => {
                error!(error = %err, "analysis.failed");
                self.ui_state.record_failure(err.to_string());
            }
        }
    }
}
