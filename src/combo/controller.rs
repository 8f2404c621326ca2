//! Wall-clock scheduler around the combo matcher.
//!
//! The matcher is purely symbol-driven. Everything time-related lives here:
//! the inter-input timeout, the finisher hold classification and the
//! cooldown after a detected combo. Callers pass the current [`Instant`] to
//! every call, which keeps the controller deterministic under test.

use std::fmt;
use std::time::{Duration, Instant};

use log::debug;

use super::catalogue::ComboCatalogue;
use super::error::Result;
use super::input::ComboInput;
use crate::trie::{NodeId, TrieMatcher};

/// Timing thresholds for a [`ComboController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct TimingConfig {
    /// Maximum gap between inputs before the attempt resets
    pub timeout: Duration,
    /// Holds shorter than this show as a normal finish
    pub normal_max: Duration,
    /// Shortest hold that charges the combo
    pub charge_min: Duration,
    /// Longest hold that charges; anything longer cancels
    pub charge_max: Duration,
    /// Input lockout after a detected combo
    pub freeze: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(1000),
            normal_max: Duration::from_millis(1900),
            charge_min: Duration::from_millis(2000),
            charge_max: Duration::from_millis(3000),
            freeze: Duration::from_millis(1000),
        }
    }
}

impl TimingConfig {
    /// Replace the inter-input timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the post-combo freeze.
    pub fn with_freeze(mut self, freeze: Duration) -> Self {
        self.freeze = freeze;
        self
    }
}

/// Hold-duration band of the finisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeZone {
    /// Finisher not held
    None,
    /// Releasing now gives a normal combo
    Normal,
    /// Between normal and charged; releasing still gives a normal combo
    Charging,
    /// Releasing now gives a charged combo
    Super,
    /// Held too long; the attempt is cancelled
    Cancel,
}

impl fmt::Display for ChargeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Normal => "normal",
            Self::Charging => "charging",
            Self::Super => "super",
            Self::Cancel => "cancel",
        };
        f.write_str(name)
    }
}

/// Notification produced by a controller call.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// An input reached the matcher
    InputAccepted(ComboInput),
    /// Matcher cursor after a change
    StateChanged {
        /// Node under the cursor
        node: NodeId,
        /// Valid next inputs
        possible: Vec<ComboInput>,
    },
    /// A combo completed
    ComboDetected {
        /// Label, prefixed `SUPER ` when charged
        name: String,
        /// True if the finisher was held into the charge band
        charged: bool,
    },
    /// The inter-input timeout expired and the attempt reset
    TimedOut,
    /// The finisher was held past the charge band
    ComboCancelled,
    /// The post-combo freeze ended
    FreezeEnded,
    /// Charge progress while the finisher is held
    ChargeProgress(f64),
}

/// Timing controller for combo input.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use libautomata::combo::{ComboCatalogue, ComboController, ComboInput, ControllerEvent, TimingConfig};
///
/// let mut controller =
///     ComboController::new(&ComboCatalogue::builtin(), TimingConfig::default()).unwrap();
/// let t0 = Instant::now();
/// let step = Duration::from_millis(100);
///
/// for i in 0..3 {
///     controller.key_down(ComboInput::Right, t0 + step * i);
/// }
/// controller.key_down(ComboInput::Space, t0 + step * 3);
/// let events = controller.key_up(ComboInput::Space, t0 + step * 4);
///
/// assert!(events.contains(&ControllerEvent::ComboDetected {
///     name: "Hadoken".to_string(),
///     charged: false,
/// }));
/// assert!(controller.is_frozen());
/// ```
#[derive(Debug, Clone)]
pub struct ComboController {
    matcher: TrieMatcher<ComboInput>,
    timing: TimingConfig,
    last_input: Option<Instant>,
    space_pressed: Option<Instant>,
    frozen_since: Option<Instant>,
    frozen_history: Vec<ComboInput>,
    display_history: Vec<ComboInput>,
}

impl ComboController {
    /// Compile `catalogue` and wrap it with `timing`.
    pub fn new(catalogue: &ComboCatalogue, timing: TimingConfig) -> Result<Self> {
        Ok(Self::with_matcher(catalogue.matcher()?, timing))
    }

    /// Wrap an existing matcher.
    pub fn with_matcher(matcher: TrieMatcher<ComboInput>, timing: TimingConfig) -> Self {
        Self {
            matcher,
            timing,
            last_input: None,
            space_pressed: None,
            frozen_since: None,
            frozen_history: Vec::new(),
            display_history: Vec::new(),
        }
    }

    /// The wrapped matcher.
    pub fn matcher(&self) -> &TrieMatcher<ComboInput> {
        &self.matcher
    }

    /// Timing thresholds.
    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    /// True during the post-combo freeze.
    pub fn is_frozen(&self) -> bool {
        self.frozen_since.is_some()
    }

    /// True while the finisher is held.
    pub fn is_space_held(&self) -> bool {
        self.space_pressed.is_some()
    }

    /// True if the finisher would be accepted now.
    pub fn is_space_available(&self) -> bool {
        !self.is_frozen() && self.matcher.has_transition(&ComboInput::Space)
    }

    fn state_changed(&self) -> ControllerEvent {
        ControllerEvent::StateChanged {
            node: self.matcher.current_node_id(),
            possible: self.matcher.possible_transitions(),
        }
    }

    fn clear_attempt(&mut self) {
        self.matcher.reset();
        self.display_history.clear();
        self.last_input = None;
    }

    fn start_freeze(&mut self, now: Instant) {
        self.frozen_since = Some(now);
        self.frozen_history = self.display_history.clone();
    }

    fn end_freeze(&mut self, events: &mut Vec<ControllerEvent>) {
        self.frozen_since = None;
        self.frozen_history.clear();
        self.clear_attempt();
        events.push(ControllerEvent::FreezeEnded);
        events.push(self.state_changed());
    }

    fn timed_out(&self, now: Instant) -> bool {
        self.last_input
            .is_some_and(|last| now.saturating_duration_since(last) > self.timing.timeout)
    }

    /// Feed an input into the matcher and report what happened.
    fn feed(&mut self, input: ComboInput, now: Instant, charged: bool) -> Vec<ControllerEvent> {
        self.last_input = Some(now);
        self.display_history.push(input);

        let mut events = vec![ControllerEvent::InputAccepted(input)];
        let detected = self.matcher.process_input(&input);
        events.push(self.state_changed());

        if let Some(label) = detected {
            let name = if charged {
                format!("SUPER {}", label)
            } else {
                label
            };
            debug!("Combo detected: {}", name);
            self.start_freeze(now);
            events.push(ControllerEvent::ComboDetected { name, charged });
        }
        events
    }

    /// Handle a key press.
    ///
    /// The finisher only starts its hold timer when it is a valid next
    /// input; it reaches the matcher on release.
    pub fn key_down(&mut self, input: ComboInput, now: Instant) -> Vec<ControllerEvent> {
        if self.is_frozen() {
            return Vec::new();
        }

        if input.is_finisher() {
            if self.is_space_available() && self.space_pressed.is_none() {
                self.space_pressed = Some(now);
            }
            return Vec::new();
        }

        let mut events = Vec::new();
        if self.timed_out(now) {
            self.clear_attempt();
            events.push(ControllerEvent::TimedOut);
            events.push(self.state_changed());
        }
        events.extend(self.feed(input, now, false));
        events
    }

    /// Handle a key release.
    ///
    /// Releasing the finisher classifies its hold: within the charge band
    /// the combo is charged, beyond it the attempt is cancelled.
    pub fn key_up(&mut self, input: ComboInput, now: Instant) -> Vec<ControllerEvent> {
        if self.is_frozen() {
            self.space_pressed = None;
            return Vec::new();
        }
        if !input.is_finisher() {
            return Vec::new();
        }
        let Some(pressed) = self.space_pressed.take() else {
            return Vec::new();
        };

        let hold = now.saturating_duration_since(pressed);
        if hold > self.timing.charge_max {
            self.clear_attempt();
            return vec![ControllerEvent::ComboCancelled, self.state_changed()];
        }

        let charged = self.timing.charge_min <= hold && hold <= self.timing.charge_max;
        self.feed(input, now, charged)
    }

    /// Advance timers. Call once per frame.
    pub fn update(&mut self, now: Instant) -> Vec<ControllerEvent> {
        let mut events = Vec::new();

        if let Some(since) = self.frozen_since {
            if now.saturating_duration_since(since) >= self.timing.freeze {
                self.end_freeze(&mut events);
            }
        }

        if let Some(pressed) = self.space_pressed {
            if now.saturating_duration_since(pressed) > self.timing.charge_max {
                self.space_pressed = None;
                self.clear_attempt();
                events.push(ControllerEvent::ComboCancelled);
                events.push(self.state_changed());
            }
        }

        if !self.is_frozen() && !self.is_space_held() && self.timed_out(now) {
            self.clear_attempt();
            events.push(ControllerEvent::TimedOut);
            events.push(self.state_changed());
        }

        if self.is_space_held() {
            events.push(ControllerEvent::ChargeProgress(self.charge_progress(now)));
        }
        events
    }

    /// Drop the attempt, the freeze and any held finisher.
    pub fn reset(&mut self) {
        self.frozen_since = None;
        self.frozen_history.clear();
        self.space_pressed = None;
        self.clear_attempt();
    }

    fn hold_duration(&self, now: Instant) -> Option<Duration> {
        if self.is_frozen() {
            return None;
        }
        self.space_pressed
            .map(|pressed| now.saturating_duration_since(pressed))
    }

    /// Hold time over `charge_max`, capped at 1.
    pub fn charge_progress(&self, now: Instant) -> f64 {
        match self.hold_duration(now) {
            Some(hold) if !self.timing.charge_max.is_zero() => {
                (hold.as_secs_f64() / self.timing.charge_max.as_secs_f64()).min(1.0)
            }
            Some(_) => 1.0,
            None => 0.0,
        }
    }

    /// Band the current hold falls in.
    pub fn charge_zone(&self, now: Instant) -> ChargeZone {
        match self.hold_duration(now) {
            None => ChargeZone::None,
            Some(hold) if hold < self.timing.normal_max => ChargeZone::Normal,
            Some(hold) if hold < self.timing.charge_min => ChargeZone::Charging,
            Some(hold) if hold <= self.timing.charge_max => ChargeZone::Super,
            Some(_) => ChargeZone::Cancel,
        }
    }

    /// True if releasing now would charge the combo.
    pub fn is_in_charge_zone(&self, now: Instant) -> bool {
        self.charge_zone(now) == ChargeZone::Super
    }

    /// Time left before the attempt times out.
    ///
    /// The full timeout while idle, frozen or holding the finisher.
    pub fn time_until_timeout(&self, now: Instant) -> Duration {
        match self.last_input {
            Some(last) if !self.is_frozen() && !self.is_space_held() => self
                .timing
                .timeout
                .saturating_sub(now.saturating_duration_since(last)),
            _ => self.timing.timeout,
        }
    }

    /// Time left in the post-combo freeze.
    pub fn freeze_time_remaining(&self, now: Instant) -> Duration {
        self.frozen_since.map_or(Duration::ZERO, |since| {
            self.timing
                .freeze
                .saturating_sub(now.saturating_duration_since(since))
        })
    }

    /// Progress toward the longest combo extending the current inputs.
    ///
    /// Reports 1.0 during the freeze.
    pub fn current_progress(&self) -> f64 {
        if self.is_frozen() {
            return 1.0;
        }
        self.matcher.progress_fraction()
    }

    /// Inputs of the current attempt, or of the detected combo while frozen.
    pub fn display_history(&self) -> &[ComboInput] {
        if self.is_frozen() {
            &self.frozen_history
        } else {
            &self.display_history
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ComboInput::{Down, Right, Space, Up};

    fn controller() -> ComboController {
        ComboController::new(&ComboCatalogue::builtin(), TimingConfig::default()).unwrap()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn detected(events: &[ControllerEvent]) -> Option<(String, bool)> {
        events.iter().find_map(|e| match e {
            ControllerEvent::ComboDetected { name, charged } => Some((name.clone(), *charged)),
            _ => None,
        })
    }

    fn press_hadoken(c: &mut ComboController, t0: Instant, hold: Duration) -> Vec<ControllerEvent> {
        c.key_down(Right, t0);
        c.key_down(Right, t0 + ms(100));
        c.key_down(Right, t0 + ms(200));
        c.key_down(Space, t0 + ms(300));
        c.key_up(Space, t0 + ms(300) + hold)
    }

    #[test]
    fn test_normal_combo() {
        let mut c = controller();
        let events = press_hadoken(&mut c, Instant::now(), ms(200));
        assert_eq!(detected(&events), Some(("Hadoken".to_string(), false)));
        assert_eq!(c.current_progress(), 1.0);
        assert_eq!(c.display_history(), &[Right, Right, Right, Space]);
    }

    #[test]
    fn test_charged_combo() {
        let mut c = controller();
        let events = press_hadoken(&mut c, Instant::now(), ms(2500));
        assert_eq!(detected(&events), Some(("SUPER Hadoken".to_string(), true)));
    }

    #[test]
    fn test_dead_zone_is_normal() {
        let mut c = controller();
        let events = press_hadoken(&mut c, Instant::now(), ms(1950));
        assert_eq!(detected(&events), Some(("Hadoken".to_string(), false)));
    }

    #[test]
    fn test_overhold_cancels() {
        let mut c = controller();
        let events = press_hadoken(&mut c, Instant::now(), ms(3500));
        assert!(events.contains(&ControllerEvent::ComboCancelled));
        assert_eq!(detected(&events), None);
        assert_eq!(c.matcher().current_node_id(), 0);
    }

    #[test]
    fn test_space_ignored_when_not_valid() {
        let mut c = controller();
        let t0 = Instant::now();
        assert!(c.key_down(Space, t0).is_empty());
        assert!(!c.is_space_held());
        assert!(c.key_up(Space, t0 + ms(100)).is_empty());
    }

    #[test]
    fn test_timeout_resets_before_next_input() {
        let mut c = controller();
        let t0 = Instant::now();
        c.key_down(Up, t0);
        c.key_down(Down, t0 + ms(200));
        let events = c.key_down(Up, t0 + ms(1500));
        assert_eq!(events[0], ControllerEvent::TimedOut);
        assert_eq!(c.display_history(), &[Up]);
    }

    #[test]
    fn test_update_times_out() {
        let mut c = controller();
        let t0 = Instant::now();
        c.key_down(Right, t0);
        assert!(c.update(t0 + ms(500)).is_empty());
        let events = c.update(t0 + ms(1100));
        assert!(events.contains(&ControllerEvent::TimedOut));
        assert!(c.display_history().is_empty());
    }

    #[test]
    fn test_held_space_freezes_timeout() {
        let mut c = controller();
        let t0 = Instant::now();
        c.key_down(Right, t0);
        c.key_down(Right, t0 + ms(100));
        c.key_down(Right, t0 + ms(200));
        c.key_down(Space, t0 + ms(300));
        let events = c.update(t0 + ms(2000));
        assert!(!events.contains(&ControllerEvent::TimedOut));
        assert_eq!(c.time_until_timeout(t0 + ms(2000)), ms(1000));
        assert_eq!(c.charge_zone(t0 + ms(2000)), ChargeZone::Normal);
        assert_eq!(c.charge_zone(t0 + ms(2250)), ChargeZone::Charging);
        assert!(c.is_in_charge_zone(t0 + ms(2800)));
        assert_eq!(c.charge_zone(t0 + ms(3400)), ChargeZone::Cancel);
    }

    #[test]
    fn test_update_cancels_overheld_space() {
        let mut c = controller();
        let t0 = Instant::now();
        c.key_down(Right, t0);
        c.key_down(Right, t0 + ms(100));
        c.key_down(Right, t0 + ms(200));
        c.key_down(Space, t0 + ms(300));
        let events = c.update(t0 + ms(3400));
        assert!(events.contains(&ControllerEvent::ComboCancelled));
        assert!(!c.is_space_held());
    }

    #[test]
    fn test_freeze_blocks_input_then_ends() {
        let mut c = controller();
        let t0 = Instant::now();
        press_hadoken(&mut c, t0, ms(100));
        let frozen_at = t0 + ms(400);
        assert!(c.key_down(Right, frozen_at + ms(100)).is_empty());
        assert_eq!(c.freeze_time_remaining(frozen_at + ms(400)), ms(600));

        let events = c.update(frozen_at + ms(1000));
        assert!(events.contains(&ControllerEvent::FreezeEnded));
        assert!(!c.is_frozen());
        assert!(c.display_history().is_empty());
    }

    #[test]
    fn test_charge_progress() {
        let mut c = controller();
        let t0 = Instant::now();
        assert_eq!(c.charge_progress(t0), 0.0);
        c.key_down(Right, t0);
        c.key_down(Right, t0);
        c.key_down(Right, t0);
        c.key_down(Space, t0);
        assert!((c.charge_progress(t0 + ms(1500)) - 0.5).abs() < 1e-9);
        assert_eq!(c.charge_progress(t0 + ms(9000)), 1.0);
    }

    #[test]
    fn test_reset() {
        let mut c = controller();
        let t0 = Instant::now();
        press_hadoken(&mut c, t0, ms(100));
        c.reset();
        assert!(!c.is_frozen());
        assert_eq!(c.current_progress(), 0.0);
    }
}
