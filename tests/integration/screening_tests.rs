//! Screening station: ranger → presence → thermometer → fever outputs.

use embedded_hal::digital::PinState;
use rangewatch::app::events::{AppEvent, ScreeningStatus};
use rangewatch::app::ports::OutputLine;
use rangewatch::app::service::{AppService, StationState};
use rangewatch::config::{StationConfig, StationMode, ToneLength};
use rangewatch::error::Error;
use rangewatch::fsm::fever::FeverClass;
use rangewatch::fsm::presence::{PresenceEdge, PresenceState};

use crate::mock_hw::{ActuatorCall, Rig};

fn rig(config: StationConfig) -> Rig {
    let mut rig = Rig::new(AppService::new(config).expect("valid config"));
    rig.start().expect("start");
    rig
}

fn sampled_temperature(e: &AppEvent) -> bool {
    matches!(e, AppEvent::Screening(r) if r.temperature_sampled)
}

fn last_status(rig: &Rig) -> Option<ScreeningStatus> {
    rig.sink.events.iter().rev().find_map(|e| match e {
        AppEvent::Screening(r) => Some(r.status),
        _ => None,
    })
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_drives_outputs_low_and_reports_mode() {
    let rig = rig(StationConfig::default());

    assert_eq!(rig.hw.line(OutputLine::Presence), Some(PinState::Low));
    assert_eq!(rig.hw.line(OutputLine::Temperature), Some(PinState::Low));
    assert_eq!(rig.hw.calls.last(), Some(&ActuatorCall::Silence));
    assert!(matches!(
        rig.sink.events.first(),
        Some(AppEvent::Started(StationMode::Screening))
    ));
}

#[test]
fn missing_thermometer_fails_start() {
    let mut rig = Rig::new(AppService::new(StationConfig::default()).unwrap());
    rig.hw.probe_ok = false;

    assert!(matches!(rig.start(), Err(Error::Init(_))));
    assert!(rig.sink.events.is_empty());
    assert_eq!(rig.app.poll(&mut rig.hw, &mut rig.clock, &mut rig.sink), Ok(0));
    assert_eq!(rig.hw.pings, 0, "loop must not run after a failed start");
}

// ── Presence ──────────────────────────────────────────────────

#[test]
fn empty_scene_keeps_waiting() {
    let mut rig = rig(StationConfig::default());
    rig.hw.subject_at(120.0);
    rig.run_until(1000);

    assert_eq!(rig.app.state(), StationState::Screening(PresenceState::Absent));
    assert_eq!(rig.count(sampled_temperature), 0);
    assert_eq!(last_status(&rig), Some(ScreeningStatus::Waiting));
    // One tick every 200 ms, three pings each.
    assert_eq!(rig.hw.pings, 5 * 3);
}

#[test]
fn normal_subject_raises_both_lines() {
    let mut rig = rig(StationConfig::default());
    rig.hw.subject_at(10.0);
    rig.hw.temp_fallback = 36.6;
    rig.run_until(1000);

    assert_eq!(rig.app.state(), StationState::Screening(PresenceState::Present));
    assert_eq!(rig.hw.line(OutputLine::Presence), Some(PinState::High));
    assert_eq!(rig.hw.line(OutputLine::Temperature), Some(PinState::High));
    assert_eq!(rig.hw.tones(), 0);
    assert_eq!(rig.count(|e| matches!(e, AppEvent::Presence(PresenceEdge::Arrived))), 1);
    // Temperature is taken once, on arrival.
    assert_eq!(rig.count(sampled_temperature), 1);
    assert_eq!(last_status(&rig), Some(ScreeningStatus::PresentNormal));
    assert!(rig.app.context().sensors.ambient_c.is_some());
}

#[test]
fn later_reports_carry_the_arrival_temperature() {
    let mut rig = rig(StationConfig::default());
    rig.hw.subject_at(10.0);
    rig.hw.temp_fallback = 36.6;
    rig.run_until(1000);

    let last = rig.sink.events.iter().rev().find_map(|e| match e {
        AppEvent::Screening(r) => Some(*r),
        _ => None,
    });
    let r = last.expect("screening report");
    assert!(!r.temperature_sampled);
    let t = r.temperature.expect("temperature on record");
    assert_eq!(t.class, FeverClass::Normal);
    assert!((t.object_c.expect("valid") - 36.6).abs() < 1e-4);
}

#[test]
fn subject_is_held_through_the_timeout() {
    let mut rig = rig(StationConfig::default());
    rig.hw.subject_at(10.0);
    rig.hw.temp_fallback = 36.6;
    rig.run_for(100);
    rig.hw.nobody();

    // Last detection at t=0; the 3000 ms hold-over keeps the subject.
    rig.run_until(2900);
    assert_eq!(rig.app.state(), StationState::Screening(PresenceState::Present));
    assert_eq!(rig.hw.line(OutputLine::Presence), Some(PinState::High));

    rig.run_until(3100);
    assert_eq!(rig.app.state(), StationState::Screening(PresenceState::Absent));
    assert_eq!(rig.hw.line(OutputLine::Presence), Some(PinState::Low));
    assert_eq!(rig.hw.line(OutputLine::Temperature), Some(PinState::Low));
    assert_eq!(rig.count(|e| matches!(e, AppEvent::Presence(PresenceEdge::Departed))), 1);
    assert!(rig.app.context().sensors.object_temp.is_none());
}

#[test]
fn returning_subject_is_measured_again() {
    let mut rig = rig(StationConfig::default());
    rig.hw.subject_at(10.0);
    rig.hw.temp_fallback = 36.6;
    rig.run_for(100);
    rig.hw.nobody();
    rig.run_until(3500);
    rig.hw.subject_at(12.0);
    rig.run_until(4000);

    assert_eq!(rig.count(|e| matches!(e, AppEvent::Presence(PresenceEdge::Arrived))), 2);
    assert_eq!(rig.count(sampled_temperature), 2);
}

// ── Fever ─────────────────────────────────────────────────────

#[test]
fn fever_sounds_a_timed_alert_once() {
    let mut rig = rig(StationConfig::default());
    rig.hw.subject_at(10.0);
    rig.hw.temp_fallback = 38.4;
    rig.run_for(100);

    assert!(rig.hw.buzzer_on());
    assert!(rig.app.alert_active());
    assert_eq!(rig.hw.line(OutputLine::Temperature), Some(PinState::Low));
    assert!(rig.hw.calls.contains(&ActuatorCall::Tone {
        frequency_hz: 349,
        length: ToneLength::Millis(500),
    }));

    // Tone applied at t=120, silenced by the loop 500 ms later.
    rig.run_until(700);
    assert!(!rig.hw.buzzer_on());
    assert_eq!(rig.hw.tones(), 1);
    assert_eq!(rig.count(|e| matches!(e, AppEvent::FeverAlert { .. })), 1);
    assert_eq!(last_status(&rig), Some(ScreeningStatus::PresentFever));
}

#[test]
fn per_tick_screening_resounds_but_alerts_once() {
    let mut rig = rig(StationConfig::screening());
    rig.hw.subject_at(10.0);
    rig.hw.temp_fallback = 38.4;
    rig.run_until(1000);

    // Ticks at 0, 200, 400, 600, 800.
    assert_eq!(rig.count(sampled_temperature), 5);
    assert_eq!(rig.hw.tones(), 5);
    assert_eq!(rig.count(|e| matches!(e, AppEvent::FeverAlert { .. })), 1);
}

#[test]
fn unreadable_pass_does_not_clear_a_fever() {
    let mut rig = rig(StationConfig::screening());
    rig.hw.subject_at(10.0);
    // Tick 0 febrile, tick 200 unreadable, tick 400 febrile again.
    rig.hw.temps.extend([38.4, 38.4, 38.4, f32::NAN, f32::NAN, f32::NAN]);
    rig.hw.temp_fallback = 38.4;
    rig.run_until(500);

    assert_eq!(rig.count(|e| matches!(e, AppEvent::FeverAlert { .. })), 1);
    let unreadable = rig.sink.events.iter().find_map(|e| match e {
        AppEvent::Screening(r)
            if r.temperature_sampled
                && r.temperature.map(|t| t.class) == Some(FeverClass::Indeterminate) =>
        {
            Some(*r)
        }
        _ => None,
    });
    let r = unreadable.expect("unreadable tick reported");
    assert_eq!(r.status, ScreeningStatus::PresentFever);
    // Silenced for the unreadable pass, sounded again after it.
    assert_eq!(rig.hw.tones(), 2);
    assert!(rig.hw.buzzer_on());
    assert!(rig.app.alert_active());
}

#[test]
fn unreadable_thermometer_is_indeterminate() {
    let mut rig = rig(StationConfig::screening());
    rig.hw.subject_at(10.0);
    // NaN from every read.
    rig.run_until(500);

    assert_eq!(rig.hw.line(OutputLine::Temperature), Some(PinState::Low));
    assert!(!rig.hw.buzzer_on());
    assert!(!rig.app.alert_active());
    let temp = rig.app.context().sensors.object_temp.expect("sampled");
    assert_eq!(temp.valid_count, 0);
    assert_eq!(temp.value, 0.0);
}

#[test]
fn one_bad_sample_is_excluded_from_the_mean() {
    let mut rig = rig(StationConfig::default());
    rig.hw.subject_at(10.0);
    rig.hw.temps.extend([36.0, f32::NAN, 37.0]);
    rig.run_for(100);

    let temp = rig.app.context().sensors.object_temp.expect("sampled");
    assert_eq!(temp.valid_count, 2);
    assert!((temp.value - 36.5).abs() < 1e-4);
    assert_eq!(rig.hw.line(OutputLine::Temperature), Some(PinState::High));
}

// ── Legacy policy ─────────────────────────────────────────────

#[test]
fn legacy_penalty_pushes_subject_out_of_range() {
    let mut rig = rig(StationConfig::legacy_screening());
    // 580 µs / 58 = 10 cm.  One missed echo scores 50 cm: (4·10 + 50) / 5 = 18.
    rig.hw.echoes.extend([Some(580), None, Some(580), Some(580), Some(580)]);
    rig.hw.echo_fallback = Some(580);
    rig.hw.temp_fallback = 31.0;
    rig.run_for(100);

    let d = rig.app.context().sensors.distance.expect("ranged");
    assert!((d.value - 18.0).abs() < 1e-4);
    assert_eq!(d.valid_count, 4);
    assert_eq!(rig.app.state(), StationState::Screening(PresenceState::Absent));

    // Clean pass at t=500: present, 31 °C is fever under the 30 °C rule.
    rig.run_until(600);
    assert_eq!(rig.app.state(), StationState::Screening(PresenceState::Present));
    assert!(rig.hw.calls.contains(&ActuatorCall::Tone {
        frequency_hz: 349,
        length: ToneLength::Continuous,
    }));

    // Continuous tone is never timed out.
    rig.run_until(1400);
    assert!(rig.hw.buzzer_on());

    // No hold-over: the first empty tick ends the presence and the tone.
    rig.hw.nobody();
    rig.run_until(1600);
    assert_eq!(rig.app.state(), StationState::Screening(PresenceState::Absent));
    assert!(!rig.hw.buzzer_on());
}
