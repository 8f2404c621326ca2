//! Integration tests for combo timing and catalogues

use std::time::{Duration, Instant};

use libautomata::combo::*;
use tempfile::TempDir;

use libautomata::combo::ComboInput::{Down as D, Left as L, Right as R, Space as S, Up as U};

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn controller() -> ComboController {
    ComboController::new(&ComboCatalogue::builtin(), TimingConfig::default()).unwrap()
}

fn detections(events: &[ControllerEvent]) -> Vec<(String, bool)> {
    events
        .iter()
        .filter_map(|e| match e {
            ControllerEvent::ComboDetected { name, charged } => Some((name.clone(), *charged)),
            _ => None,
        })
        .collect()
}

/// Press R R R then hold the finisher for `hold`, returning release events.
fn hadoken(c: &mut ComboController, t0: Instant, hold: Duration) -> Vec<ControllerEvent> {
    for i in 0..3 {
        c.key_down(R, t0 + ms(100) * i);
    }
    c.key_down(S, t0 + ms(300));
    c.key_up(S, t0 + ms(300) + hold)
}

#[test]
fn test_normal_combo() {
    let mut c = controller();
    let t0 = Instant::now();
    let events = hadoken(&mut c, t0, ms(100));

    assert_eq!(detections(&events), vec![("Hadoken".to_string(), false)]);
    assert!(c.is_frozen());
    assert_eq!(c.display_history(), &[R, R, R, S]);
    assert_eq!(c.current_progress(), 1.0);
}

#[test]
fn test_charged_combo() {
    let mut c = controller();
    let t0 = Instant::now();
    let events = hadoken(&mut c, t0, ms(2500));
    assert_eq!(detections(&events), vec![("SUPER Hadoken".to_string(), true)]);
}

#[test]
fn test_charge_band_edges() {
    let t0 = Instant::now();

    let mut c = controller();
    let events = hadoken(&mut c, t0, ms(1950));
    assert_eq!(detections(&events), vec![("Hadoken".to_string(), false)]);

    let mut c = controller();
    let events = hadoken(&mut c, t0, ms(2000));
    assert_eq!(detections(&events), vec![("SUPER Hadoken".to_string(), true)]);

    let mut c = controller();
    let events = hadoken(&mut c, t0, ms(3000));
    assert_eq!(detections(&events), vec![("SUPER Hadoken".to_string(), true)]);
}

#[test]
fn test_overheld_finisher_cancels() {
    let mut c = controller();
    let t0 = Instant::now();
    let events = hadoken(&mut c, t0, ms(3100));

    assert_eq!(events[0], ControllerEvent::ComboCancelled);
    assert!(detections(&events).is_empty());
    assert!(!c.is_frozen());
    assert!(c.display_history().is_empty());
}

#[test]
fn test_update_cancels_long_hold() {
    let mut c = controller();
    let t0 = Instant::now();
    c.key_down(R, t0);
    c.key_down(R, t0 + ms(100));
    c.key_down(R, t0 + ms(200));
    c.key_down(S, t0 + ms(300));

    let during = c.update(t0 + ms(1800));
    assert!(matches!(during.last(), Some(ControllerEvent::ChargeProgress(p)) if *p > 0.4 && *p < 0.6));
    assert!(!during.contains(&ControllerEvent::TimedOut));

    let after = c.update(t0 + ms(3400));
    assert!(after.contains(&ControllerEvent::ComboCancelled));
    assert!(!c.is_space_held());
    assert!(c.key_up(S, t0 + ms(3500)).is_empty());
}

#[test]
fn test_charge_zones() {
    let mut c = controller();
    let t0 = Instant::now();
    c.key_down(R, t0);
    c.key_down(R, t0);
    c.key_down(R, t0);
    assert_eq!(c.charge_zone(t0), ChargeZone::None);

    c.key_down(S, t0);
    assert_eq!(c.charge_zone(t0 + ms(500)), ChargeZone::Normal);
    assert_eq!(c.charge_zone(t0 + ms(1950)), ChargeZone::Charging);
    assert_eq!(c.charge_zone(t0 + ms(2500)), ChargeZone::Super);
    assert!(c.is_in_charge_zone(t0 + ms(2500)));
    assert_eq!(c.charge_zone(t0 + ms(3500)), ChargeZone::Cancel);
    assert_eq!(c.charge_progress(t0 + ms(1500)), 0.5);
    assert_eq!(c.charge_progress(t0 + ms(9000)), 1.0);
}

#[test]
fn test_finisher_ignored_when_not_a_valid_next_input() {
    let mut c = controller();
    let t0 = Instant::now();
    assert!(!c.is_space_available());
    assert!(c.key_down(S, t0).is_empty());
    assert!(!c.is_space_held());
    assert!(c.key_up(S, t0 + ms(50)).is_empty());
}

#[test]
fn test_timeout_on_next_input() {
    let mut c = controller();
    let t0 = Instant::now();
    c.key_down(R, t0);
    c.key_down(R, t0 + ms(100));

    let events = c.key_down(U, t0 + ms(1200));
    assert_eq!(events[0], ControllerEvent::TimedOut);
    assert!(events.contains(&ControllerEvent::InputAccepted(U)));
    assert_eq!(c.display_history(), &[U]);
}

#[test]
fn test_timeout_via_update() {
    let mut c = controller();
    let t0 = Instant::now();
    c.key_down(R, t0);

    assert_eq!(c.time_until_timeout(t0 + ms(300)), ms(700));
    assert!(c.update(t0 + ms(1000)).is_empty());

    let events = c.update(t0 + ms(1001));
    assert_eq!(events[0], ControllerEvent::TimedOut);
    assert!(c.display_history().is_empty());
    assert_eq!(c.time_until_timeout(t0 + ms(1001)), ms(1000));
}

#[test]
fn test_freeze_blocks_input_until_it_ends() {
    let mut c = controller();
    let t0 = Instant::now();
    hadoken(&mut c, t0, ms(100));
    let detected_at = t0 + ms(400);

    assert!(c.key_down(R, detected_at + ms(10)).is_empty());
    assert_eq!(c.freeze_time_remaining(detected_at + ms(400)), ms(600));
    assert!(c.update(detected_at + ms(999)).is_empty());

    let events = c.update(detected_at + ms(1000));
    assert_eq!(events[0], ControllerEvent::FreezeEnded);
    assert!(!c.is_frozen());
    assert!(c.display_history().is_empty());

    let events = c.key_down(R, detected_at + ms(1100));
    assert_eq!(events[0], ControllerEvent::InputAccepted(R));
}

#[test]
fn test_state_changed_lists_next_inputs() {
    let mut c = controller();
    let t0 = Instant::now();
    let events = c.key_down(L, t0);
    assert!(events.contains(&ControllerEvent::StateChanged {
        node: c.matcher().current_node_id(),
        possible: vec![R, U],
    }));
}

#[test]
fn test_reset_clears_everything() {
    let mut c = controller();
    let t0 = Instant::now();
    hadoken(&mut c, t0, ms(100));
    c.reset();
    assert!(!c.is_frozen());
    assert!(c.display_history().is_empty());
    assert_eq!(c.current_progress(), 0.0);
}

#[test]
fn test_longer_combo_sharing_prefix() {
    let mut c = controller();
    let t0 = Instant::now();
    for (i, input) in [R, R, R, D, U, R].into_iter().enumerate() {
        c.key_down(input, t0 + ms(100) * i as u32);
    }
    assert!(c.is_space_available());
    c.key_down(S, t0 + ms(700));
    let events = c.key_up(S, t0 + ms(800));
    assert_eq!(detections(&events), vec![("Giga Hadoken".to_string(), false)]);
}

#[test]
fn test_custom_timing() {
    let timing = TimingConfig::default()
        .with_timeout(ms(200))
        .with_freeze(ms(50));
    let mut c = ComboController::new(&ComboCatalogue::builtin(), timing).unwrap();
    let t0 = Instant::now();
    c.key_down(R, t0);
    let events = c.key_down(R, t0 + ms(300));
    assert_eq!(events[0], ControllerEvent::TimedOut);
}

#[test]
fn test_catalogue_lookup_and_table() {
    let catalogue = ComboCatalogue::builtin();
    assert_eq!(catalogue.len(), 10);
    assert_eq!(
        catalogue.find("dragon punch").map(|c| c.sequence.clone()),
        Some(vec![U, U, D, R, S])
    );
    assert!(catalogue.find("Sonic Boom").is_none());

    let table = catalogue.render_table();
    assert!(table.contains("→ → → ␣"));
    assert!(table.ends_with("Total: 10 combos"));
}

#[test]
fn test_catalogue_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("combos.json");

    let catalogue = ComboCatalogue::new(vec![
        ComboDefinition::new("Jump Kick", vec![U, U, S]),
        ComboDefinition::new("Sweep", vec![D, L, S]),
    ]);
    catalogue.save(&path).unwrap();

    let loaded = ComboCatalogue::load(&path).unwrap();
    assert_eq!(loaded, catalogue);

    let mut c = ComboController::new(&loaded, TimingConfig::default()).unwrap();
    let t0 = Instant::now();
    c.key_down(U, t0);
    c.key_down(U, t0 + ms(100));
    c.key_down(S, t0 + ms(200));
    let events = c.key_up(S, t0 + ms(300));
    assert_eq!(detections(&events), vec![("Jump Kick".to_string(), false)]);
}

#[test]
fn test_catalogue_json_format() {
    let json = r#"{"combos": [{"name": "Dash", "sequence": ["RIGHT", "RIGHT", "SPACE"]}]}"#;
    let catalogue = ComboCatalogue::from_json(json).unwrap();
    assert_eq!(catalogue.combos()[0].sequence, vec![R, R, S]);

    let bad = r#"{"combos": [{"name": "Dash", "sequence": ["JUMP"]}]}"#;
    assert!(matches!(
        ComboCatalogue::from_json(bad),
        Err(CatalogueError::Json(_))
    ));
}

#[test]
fn test_missing_catalogue_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.json");
    let err = ComboCatalogue::load(&path).unwrap_err();
    assert!(matches!(err, CatalogueError::Io { .. }));
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn test_empty_combo_sequence_fails_to_compile() {
    let catalogue = ComboCatalogue::new(vec![ComboDefinition::new("Nothing", Vec::new())]);
    assert!(matches!(
        ComboController::new(&catalogue, TimingConfig::default()),
        Err(CatalogueError::Trie(_))
    ));
}
