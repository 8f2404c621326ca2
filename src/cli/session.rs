//! Simulated-clock combo session for the command line.
//!
//! A terminal cannot report key holds, so the session owns a synthetic
//! clock: every press advances it by [`INPUT_INTERVAL`], a finisher is held
//! for an explicit duration, and a detected combo waits out the freeze.

use colored::Colorize;
use std::time::{Duration, Instant};

use crate::combo::{sequence_display, ComboController, ComboInput, ControllerEvent};

/// Clock advance between two presses
pub const INPUT_INTERVAL: Duration = Duration::from_millis(100);

/// Default finisher hold (a normal, uncharged release)
pub const DEFAULT_HOLD: Duration = Duration::from_millis(100);

/// A combo controller driven by a synthetic clock
pub struct ComboSession {
    controller: ComboController,
    clock: Instant,
}

impl ComboSession {
    /// Start a session at the current instant
    pub fn new(controller: ComboController) -> Self {
        Self {
            controller,
            clock: Instant::now(),
        }
    }

    /// The wrapped controller
    pub fn controller(&self) -> &ComboController {
        &self.controller
    }

    /// Press and release one input.
    ///
    /// `hold` only matters for the finisher. An empty result means the
    /// input was ignored.
    pub fn press(&mut self, input: ComboInput, hold: Duration) -> Vec<ControllerEvent> {
        let mut events = self.controller.update(self.clock);

        if input.is_finisher() {
            events.extend(self.controller.key_down(input, self.clock));
            if !self.controller.is_space_held() {
                return events;
            }
            self.clock += hold;
            events.extend(
                self.controller
                    .update(self.clock)
                    .into_iter()
                    .filter(|e| !matches!(e, ControllerEvent::ChargeProgress(_))),
            );
            events.extend(self.controller.key_up(input, self.clock));
        } else {
            events.extend(self.controller.key_down(input, self.clock));
        }

        self.clock += INPUT_INTERVAL;
        if self.controller.is_frozen() {
            self.clock += self.controller.timing().freeze;
            events.extend(self.controller.update(self.clock));
        }
        events
    }

    /// Let the inter-input timeout expire
    pub fn wait(&mut self, duration: Duration) -> Vec<ControllerEvent> {
        self.clock += duration;
        self.controller.update(self.clock)
    }

    /// Drop the current attempt
    pub fn reset(&mut self) {
        self.controller.reset();
    }

    /// Inputs of the current attempt
    pub fn history(&self) -> String {
        let history = self.controller.display_history();
        if history.is_empty() {
            "-".to_string()
        } else {
            sequence_display(history)
        }
    }

    /// Progress of the current attempt as a percentage
    pub fn progress_percent(&self) -> u32 {
        (self.controller.current_progress() * 100.0).round() as u32
    }
}

/// Render one controller event, or `None` for events not worth printing.
pub fn render_event(event: &ControllerEvent) -> Option<String> {
    match event {
        ControllerEvent::InputAccepted(input) => {
            Some(format!("{} {}", input.glyph(), input.name().dimmed()))
        }
        ControllerEvent::StateChanged { possible, .. } => {
            let next = if possible.is_empty() {
                "-".to_string()
            } else {
                sequence_display(possible)
            };
            Some(format!("  next: {}", next.cyan()))
        }
        ControllerEvent::ComboDetected { name, charged: true } => {
            Some(format!("  {} {}", "COMBO".yellow().bold(), name.yellow().bold()))
        }
        ControllerEvent::ComboDetected { name, charged: false } => {
            Some(format!("  {} {}", "COMBO".green().bold(), name.green().bold()))
        }
        ControllerEvent::TimedOut => Some("  timed out, attempt reset".yellow().to_string()),
        ControllerEvent::ComboCancelled => Some(
            "  finisher held too long, attempt cancelled"
                .red()
                .to_string(),
        ),
        ControllerEvent::FreezeEnded | ControllerEvent::ChargeProgress(_) => None,
    }
}

/// Render a press, noting ignored inputs.
pub fn render_press(input: ComboInput, events: &[ControllerEvent]) -> Vec<String> {
    let lines: Vec<String> = events.iter().filter_map(render_event).collect();
    if lines.is_empty() {
        vec![format!("{} {}", input.glyph(), "ignored".dimmed())]
    } else {
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combo::{ComboCatalogue, TimingConfig};

    fn session() -> ComboSession {
        let controller =
            ComboController::new(&ComboCatalogue::builtin(), TimingConfig::default()).unwrap();
        ComboSession::new(controller)
    }

    fn detected(events: &[ControllerEvent]) -> Option<(String, bool)> {
        events.iter().find_map(|e| match e {
            ControllerEvent::ComboDetected { name, charged } => Some((name.clone(), *charged)),
            _ => None,
        })
    }

    #[test]
    fn test_hadoken() {
        let mut s = session();
        for _ in 0..3 {
            s.press(ComboInput::Right, DEFAULT_HOLD);
        }
        let events = s.press(ComboInput::Space, DEFAULT_HOLD);
        assert_eq!(detected(&events), Some(("Hadoken".to_string(), false)));
        assert!(!s.controller().is_frozen());
        assert_eq!(s.history(), "-");
    }

    #[test]
    fn test_charged_hold() {
        let mut s = session();
        for _ in 0..3 {
            s.press(ComboInput::Right, DEFAULT_HOLD);
        }
        let events = s.press(ComboInput::Space, Duration::from_millis(2500));
        assert_eq!(detected(&events), Some(("SUPER Hadoken".to_string(), true)));
    }

    #[test]
    fn test_overheld_finisher_cancels() {
        let mut s = session();
        for _ in 0..3 {
            s.press(ComboInput::Right, DEFAULT_HOLD);
        }
        let events = s.press(ComboInput::Space, Duration::from_millis(3500));
        assert!(events.contains(&ControllerEvent::ComboCancelled));
        assert_eq!(detected(&events), None);
    }

    #[test]
    fn test_unavailable_finisher_is_ignored() {
        let mut s = session();
        let events = s.press(ComboInput::Space, DEFAULT_HOLD);
        assert!(events.is_empty());
        assert_eq!(render_press(ComboInput::Space, &events).len(), 1);
    }

    #[test]
    fn test_wait_times_out() {
        let mut s = session();
        s.press(ComboInput::Right, DEFAULT_HOLD);
        assert_eq!(s.history(), "→");
        let events = s.wait(Duration::from_secs(2));
        assert!(events.contains(&ControllerEvent::TimedOut));
        assert_eq!(s.progress_percent(), 0);
    }
}
