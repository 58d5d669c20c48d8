//! Sweep radar: servo stepping, scan/hold, trace output.

use rangewatch::app::events::AppEvent;
use rangewatch::app::service::{AppService, StationState};
use rangewatch::config::{StationConfig, StationMode};
use rangewatch::fsm::scan::{ScanEdge, ScanMode};

use crate::mock_hw::{ActuatorCall, Rig};

fn rig(config: StationConfig) -> Rig {
    let mut rig = Rig::new(AppService::new(config).expect("valid config"));
    rig.start().expect("start");
    rig
}

fn hold_edges(rig: &Rig) -> Vec<(ScanEdge, i16)> {
    rig.sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Hold { edge, angle } => Some((*edge, *angle)),
            _ => None,
        })
        .collect()
}

fn scans(rig: &Rig) -> usize {
    rig.count(|e| matches!(e, AppEvent::Scan(_)))
}

#[test]
fn start_homes_servo_and_settles() {
    let rig = rig(StationConfig::radar_hold());

    assert_eq!(rig.hw.angles(), vec![15]);
    assert_eq!(rig.clock.now, 200);
    assert!(matches!(
        rig.sink.events.first(),
        Some(AppEvent::Started(StationMode::Radar))
    ));
    // No thermometer in radar mode.
    assert!(!rig.hw.calls.iter().any(|c| matches!(c, ActuatorCall::Tone { .. })));
}

#[test]
fn empty_room_keeps_sweeping() {
    let mut rig = rig(StationConfig::radar_hold());
    rig.run_until(1200);

    assert_eq!(rig.app.state(), StationState::Radar(ScanMode::Sweeping));
    assert!(hold_edges(&rig).is_empty());
    // Steps every 25 ms from t=200, measurements every 60 ms.
    assert_eq!(rig.hw.angles().len(), 1 + 40);
    assert_eq!(scans(&rig), 17);
    assert!(rig.sink.events.iter().all(|e| match e {
        AppEvent::Scan(r) => r.distance_cm.is_none() && r.point.is_none(),
        _ => true,
    }));
}

#[test]
fn confirmed_object_stops_the_servo() {
    let mut rig = rig(StationConfig::radar_hold());
    rig.hw.subject_at(6.0);
    rig.run_until(1000);

    // Detections at t=200, 260, 320; steps at 200, 225, 250, 275, 300.
    assert_eq!(rig.hw.angles(), vec![15, 19, 23, 27, 31, 35]);
    assert_eq!(hold_edges(&rig), vec![(ScanEdge::HoldEntered, 35)]);
    assert_eq!(rig.app.state(), StationState::Radar(ScanMode::Holding));
    assert_eq!(rig.app.angle(), Some(35));

    // Measurements continue while holding.
    let held_scan = rig.sink.events.iter().rev().find_map(|e| match e {
        AppEvent::Scan(r) => Some(*r),
        _ => None,
    });
    let r = held_scan.expect("scan report");
    assert_eq!(r.mode, ScanMode::Holding);
    let (x, y) = r.point.expect("point");
    assert!((x - 4.915).abs() < 0.01 && (y - 3.441).abs() < 0.01, "({x}, {y})");
}

#[test]
fn clear_readings_release_the_hold() {
    let mut rig = rig(StationConfig::radar_hold());
    rig.hw.subject_at(6.0);
    rig.run_until(1000);
    rig.hw.nobody();

    // Five clear measurements: t=1040 … 1280.
    rig.run_until(1250);
    assert_eq!(rig.app.state(), StationState::Radar(ScanMode::Holding));
    rig.run_until(1400);
    assert_eq!(rig.app.state(), StationState::Radar(ScanMode::Sweeping));

    assert_eq!(
        hold_edges(&rig),
        vec![(ScanEdge::HoldEntered, 35), (ScanEdge::HoldReleased, 35)]
    );
    // Sweep resumes from where it stopped.
    let angles = rig.hw.angles();
    assert_eq!(&angles[6..], &[39, 43, 47, 51]);
}

#[test]
fn flicker_does_not_confirm() {
    let mut rig = rig(StationConfig::radar_hold());
    let near = Some(350);
    rig.hw.echoes.extend([near, near, None, near, near, None, near, near]);
    rig.run_until(800);

    assert!(hold_edges(&rig).is_empty());
    assert_eq!(rig.app.state(), StationState::Radar(ScanMode::Sweeping));
}

#[test]
fn trace_sweeps_end_to_end_without_holding() {
    let mut rig = rig(StationConfig::radar_trace());
    rig.hw.subject_at(6.0);
    rig.run_until(200 + 40 * 160);

    let angles = rig.hw.angles();
    assert_eq!(angles.len(), 1 + 160);
    assert_eq!(*angles.iter().max().unwrap(), 165);
    assert_eq!(*angles.iter().min().unwrap(), 15);
    assert_eq!(*angles.last().unwrap(), 155);
    assert!(angles.windows(2).all(|w| (w[0] - w[1]).abs() == 1));

    assert!(hold_edges(&rig).is_empty());
    // One measurement per step.
    assert_eq!(scans(&rig), 160);
}
