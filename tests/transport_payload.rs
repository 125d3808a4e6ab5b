use tempfile::TempDir;

use scoutlog::{
    core::{session::Session, store::MatchStore},
    record::{AutoSection, Counters, Record, RobotCoords, TeleopSection},
    transport::{self, TransportError},
    types::{Alliance, ClimbState, MatchId, YesNo},
};

fn sample() -> Record {
    Record {
        match_number: MatchId::new("Match 12"),
        team_number: "1114".to_string(),
        alliance: Some(Alliance::Blue),
        scouter_name: Some("Ada".to_string()),
        auto: AutoSection {
            counters: Counters::from([("L1", 3), ("Algae Removed", -1)]),
            moved_state: YesNo::Yes,
            robot_coords: Some(RobotCoords::new(12.5, 0.0, 52.5, 40.0)),
            comment: "left start".to_string(),
        },
        teleop: TeleopSection {
            counters: Counters::from([("L4", 6), ("Algae Netted", 2)]),
            climb_state: ClimbState::ShallowClimb,
            teleop_broken_state: YesNo::No,
            comment: String::new(),
        },
    }
}

#[test]
fn encode_decode_round_trips_field_for_field() {
    let rec = sample();
    let payload = transport::encode(&rec).unwrap();
    assert_eq!(transport::decode(&payload).unwrap(), rec);
    assert_eq!(transport::encode(&rec).unwrap(), payload);
}

#[test]
fn payload_uses_wire_field_names() {
    let payload = transport::encode(&sample()).unwrap();
    let v: serde_json::Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(v["selected_color"], "Blue");
    assert_eq!(v["match_number"], "Match 12");
    assert_eq!(v["auto"]["counters"]["Algae Removed"], -1);
    assert_eq!(v["auto"]["robot_coords"].as_array().map(Vec::len), Some(4));
    assert_eq!(v["teleop"]["climb_state"], "Shallow climb");
    assert_eq!(v["teleop"]["teleop_broken_state"], "No");
}

#[test]
fn absent_scouter_and_alliance_encode_as_missing_and_null() {
    let rec = Record {
        match_number: MatchId::new("Match 1"),
        ..Record::default()
    };
    let v: serde_json::Value = serde_json::from_str(&transport::encode(&rec).unwrap()).unwrap();
    assert!(v.get("scouter_name").is_none());
    assert!(v["selected_color"].is_null());
    assert!(v["auto"]["robot_coords"].is_null());
}

#[test]
fn older_payloads_decode_onto_canonical_values() {
    let payload = r#"{
        "match_number": 7,
        "team_number": "254",
        "selected_color": "Red",
        "auto": {
            "counters": {"L1": 1, "Algae": 2},
            "moved_state": "YES",
            "robot_coords": [1, 2, 41, 42]
        },
        "teleop": {"counters": {"L2": 4}, "climb_state": "PARK", "teleop_broken_state": "NO"}
    }"#;
    let rec = transport::decode(payload).unwrap();

    assert_eq!(rec.match_number, MatchId::new("7"));
    assert_eq!(rec.auto.moved_state, YesNo::Yes);
    assert_eq!(rec.auto.counters.get("Algae"), Some(2));
    assert_eq!(rec.auto.counters.get("L2"), Some(0));
    assert_eq!(rec.auto.counters.get("Algae Removed"), Some(0));
    assert_eq!(rec.teleop.counters.get("L2"), Some(4));
    assert_eq!(rec.teleop.counters.get("L1"), Some(0));
    assert_eq!(rec.auto.robot_coords, Some(RobotCoords::new(1.0, 2.0, 41.0, 42.0)));
    assert_eq!(rec.auto.comment, "");
    assert_eq!(rec.teleop.climb_state, ClimbState::Barge);
    assert_eq!(rec.teleop.teleop_broken_state, YesNo::No);
}

#[test]
fn legacy_climb_labels_map_to_canonical_set() {
    for (label, expected) in [
        ("NONE", ClimbState::NoBarge),
        ("None", ClimbState::NoBarge),
        ("No", ClimbState::NoBarge),
        ("Yes", ClimbState::Barge),
        ("SHALLOW", ClimbState::ShallowClimb),
        ("DEEP", ClimbState::DeepClimb),
        ("Deep climb", ClimbState::DeepClimb),
    ] {
        assert_eq!(ClimbState::from_label(label), Some(expected), "{label}");
    }
    assert_eq!(ClimbState::from_label("Hanging"), None);
}

#[test]
fn malformed_payloads_are_errors() {
    for bad in ["", "not json", r#"{"teleop": {"climb_state": "Hanging"}}"#, "[1,2]"] {
        assert!(matches!(transport::decode(bad), Err(TransportError::Malformed(_))), "{bad}");
    }
}

#[test]
fn draft_snapshot_encodes_without_touching_the_store() {
    let store = MatchStore::new();
    let mut session = Session::default();
    session.select_match(&store, MatchId::new("Match 4")).unwrap();
    session.set_team_number("33").unwrap();
    session.start().unwrap();

    let first = transport::encode(&session.snapshot().unwrap()).unwrap();
    let second = transport::encode(&session.snapshot().unwrap()).unwrap();
    assert_eq!(first, second);
    assert!(store.is_empty());
}

#[test]
fn export_writes_named_file_or_does_nothing() {
    let rec = sample();
    assert_eq!(transport::export_file_name(&rec), "1114_Match 12.json");
    assert_eq!(transport::export_to_dir(None, &rec).unwrap(), None);

    let tmp = TempDir::new().expect("tmp");
    let path = transport::export_to_dir(Some(tmp.path()), &rec)
        .unwrap()
        .expect("path");
    assert_eq!(path, tmp.path().join("1114_Match 12.json"));
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(transport::decode(&text).unwrap(), rec);
}
