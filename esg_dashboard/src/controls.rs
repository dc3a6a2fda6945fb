use crossterm::event::KeyCode;
use esg_core::dashboard_config::ControlsConfig;
use esg_core::{Pillar, SimulationInput, PILLAR_MAX, PILLAR_MIN};

/// The five input controls, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlId {
    Governance,
    Social,
    Environmental,
    CarbonFootprint,
    EnergyConsumption,
}

impl ControlId {
    pub const ALL: [ControlId; 5] = [
        ControlId::Governance,
        ControlId::Social,
        ControlId::Environmental,
        ControlId::CarbonFootprint,
        ControlId::EnergyConsumption,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ControlId::Governance => "Governance Score",
            ControlId::Social => "Social Score",
            ControlId::Environmental => "Environmental Score",
            ControlId::CarbonFootprint => "Carbon Footprint (Tons)",
            ControlId::EnergyConsumption => "Energy Consumption (MWh)",
        }
    }

    pub fn pillar(self) -> Option<Pillar> {
        match self {
            ControlId::Governance => Some(Pillar::Governance),
            ControlId::Social => Some(Pillar::Social),
            ControlId::Environmental => Some(Pillar::Environmental),
            ControlId::CarbonFootprint | ControlId::EnergyConsumption => None,
        }
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|id| *id == self)
            .unwrap_or_default()
    }

    fn offset(self, delta: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let idx = (self.index() as isize + delta).rem_euclid(len);
        Self::ALL[idx as usize]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    Unchanged,
    Changed,
    Rejected(String),
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    Quit,
    Analyze,
    Reset,
    Edit(EditOutcome),
}

/// Slider and numeric-field state for one analysis request.
///
/// Sliders saturate at `[0, 100]`. Numeric fields take typed text into a
/// draft that is committed on `Enter`, on focus change, or when the input is
/// collected; a draft that is not a finite number is dropped.
#[derive(Debug, Clone)]
pub struct InputPanel {
    values: SimulationInput,
    defaults: SimulationInput,
    steps: ControlsConfig,
    focus: ControlId,
    draft: Option<String>,
}

impl InputPanel {
    pub fn new(defaults: SimulationInput, steps: ControlsConfig) -> Self {
        Self {
            values: defaults,
            defaults,
            steps,
            focus: ControlId::Governance,
            draft: None,
        }
    }

    pub fn focus(&self) -> ControlId {
        self.focus
    }

    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }

    /// Committed control values. Pending drafts are not included.
    pub fn current(&self) -> SimulationInput {
        self.values
    }

    /// Commit any pending draft, then read every control.
    pub fn collect(&mut self) -> (SimulationInput, EditOutcome) {
        let outcome = self.commit();
        (self.values, outcome)
    }

    pub fn focus_next(&mut self) -> EditOutcome {
        self.move_focus(1)
    }

    pub fn focus_prev(&mut self) -> EditOutcome {
        self.move_focus(-1)
    }

    fn move_focus(&mut self, delta: isize) -> EditOutcome {
        let outcome = self.commit();
        self.focus = self.focus.offset(delta);
        outcome
    }

    /// Step the focused control up (`direction > 0`) or down.
    pub fn nudge(&mut self, direction: i8, coarse: bool) -> EditOutcome {
        if direction == 0 {
            return EditOutcome::Unchanged;
        }
        if let EditOutcome::Rejected(reason) = self.commit() {
            return EditOutcome::Rejected(reason);
        }
        let sign = direction.signum();
        match self.focus.pillar() {
            Some(pillar) => {
                let step = if coarse {
                    self.steps.slider_coarse_step
                } else {
                    self.steps.slider_step
                };
                let current = self.values.pillar(pillar) as i64;
                self.set_pillar(pillar, current + sign as i64 * step as i64)
            }
            None => {
                let step = self.steps.metric_step * sign as f64;
                let field = self.metric_mut();
                *field += step;
                EditOutcome::Changed
            }
        }
    }

    /// Jump the focused slider to its lower or upper bound.
    pub fn jump(&mut self, to_max: bool) -> EditOutcome {
        match self.focus.pillar() {
            Some(pillar) => {
                let target = if to_max { PILLAR_MAX } else { PILLAR_MIN };
                self.set_pillar(pillar, target as i64)
            }
            None => EditOutcome::Unchanged,
        }
    }

    pub fn type_char(&mut self, ch: char) -> EditOutcome {
        if self.focus.pillar().is_some() {
            return EditOutcome::Unchanged;
        }
        let current = self.draft.as_deref().unwrap_or_default();
        let accepted = ch.is_ascii_digit()
            || (ch == '.' && !current.contains('.'))
            || (ch == '-' && current.is_empty());
        if !accepted {
            return EditOutcome::Unchanged;
        }
        self.draft.get_or_insert_with(String::new).push(ch);
        EditOutcome::Changed
    }

    pub fn backspace(&mut self) -> EditOutcome {
        match self.draft.as_mut() {
            Some(draft) => {
                draft.pop();
                EditOutcome::Changed
            }
            None => EditOutcome::Unchanged,
        }
    }

    /// Parse and apply the pending draft, if any.
    pub fn commit(&mut self) -> EditOutcome {
        let Some(draft) = self.draft.take() else {
            return EditOutcome::Unchanged;
        };
        match draft.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => {
                *self.metric_mut() = value;
                EditOutcome::Changed
            }
            _ => EditOutcome::Rejected(format!(
                "'{}' is not a number; keeping {}",
                draft,
                self.metric_value()
            )),
        }
    }

    /// Route a key press. `Enter` commits a pending draft and otherwise
    /// requests analysis.
    pub fn apply_key(&mut self, code: KeyCode) -> KeyAction {
        let outcome = match code {
            KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
            KeyCode::Char('a') | KeyCode::Char('A') => return KeyAction::Analyze,
            KeyCode::Enter if self.draft.is_none() => return KeyAction::Analyze,
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.reset();
                return KeyAction::Reset;
            }
            KeyCode::Enter => self.commit(),
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Right => self.nudge(1, false),
            KeyCode::Left => self.nudge(-1, false),
            KeyCode::PageUp => self.nudge(1, true),
            KeyCode::PageDown => self.nudge(-1, true),
            KeyCode::Home => self.jump(false),
            KeyCode::End => self.jump(true),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Char(ch) => self.type_char(ch),
            _ => EditOutcome::Unchanged,
        };
        KeyAction::Edit(outcome)
    }

    pub fn reset(&mut self) {
        self.values = self.defaults;
        self.draft = None;
    }

    /// Text shown for a control: the draft for the focused field being edited,
    /// otherwise the committed value.
    pub fn display_value(&self, id: ControlId) -> String {
        if id == self.focus {
            if let Some(draft) = &self.draft {
                return format!("{draft}_");
            }
        }
        match id {
            ControlId::CarbonFootprint => format!("{}", self.values.carbon_footprint),
            ControlId::EnergyConsumption => format!("{}", self.values.energy_consumption),
            _ => id
                .pillar()
                .map(|pillar| self.values.pillar(pillar).to_string())
                .unwrap_or_default(),
        }
    }

    fn set_pillar(&mut self, pillar: Pillar, value: i64) -> EditOutcome {
        let before = self.values.pillar(pillar);
        self.values = self.values.with_pillar(pillar, value);
        if self.values.pillar(pillar) == before {
            EditOutcome::Unchanged
        } else {
            EditOutcome::Changed
        }
    }

    fn metric_value(&self) -> f64 {
        match self.focus {
            ControlId::EnergyConsumption => self.values.energy_consumption,
            _ => self.values.carbon_footprint,
        }
    }

    fn metric_mut(&mut self) -> &mut f64 {
        match self.focus {
            ControlId::EnergyConsumption => &mut self.values.energy_consumption,
            _ => &mut self.values.carbon_footprint,
        }
    }
}
