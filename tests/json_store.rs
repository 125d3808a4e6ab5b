use std::fs;

use tempfile::TempDir;

use scoutlog::{
    core::{session::Session, store::MatchStore},
    persist::{StoreSink, json_file::JsonFileStore},
    record::Record,
    types::{Alliance, MatchId},
};

fn commit_match(
    session: &mut Session,
    store: &mut MatchStore,
    sink: &mut JsonFileStore,
    id: &str,
    team: &str,
) -> Record {
    session.select_match(store, MatchId::new(id)).unwrap();
    if session.is_locked() {
        session.edit().unwrap();
    }
    session.set_team_number(team).unwrap();
    session.set_alliance(Alliance::Red).unwrap();
    session.start().unwrap();
    session.begin_auto().unwrap();
    session.increment("L1").unwrap();
    session.begin_teleop().unwrap();
    session.commit(store, sink).unwrap()
}

#[test]
fn missing_empty_and_malformed_files_load_as_empty() {
    let tmp = TempDir::new().expect("tmp");

    let missing = JsonFileStore::new(tmp.path().join("none.json"));
    assert!(missing.load().unwrap().is_empty());

    let empty_path = tmp.path().join("empty.json");
    fs::write(&empty_path, "").unwrap();
    assert!(JsonFileStore::new(&empty_path).load().unwrap().is_empty());

    let bad_path = tmp.path().join("bad.json");
    fs::write(&bad_path, "{ \"Match 1\": ").unwrap();
    assert!(JsonFileStore::new(&bad_path).load().unwrap().is_empty());

    let list_path = tmp.path().join("list.json");
    fs::write(&list_path, "[1, 2, 3]").unwrap();
    assert!(JsonFileStore::new(&list_path).load().unwrap().is_empty());
}

#[test]
fn every_commit_rewrites_the_whole_store() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("data").join("match_data.json");
    let mut sink = JsonFileStore::new(&path);
    let mut store = sink.load().unwrap();
    let mut session = Session::default();

    commit_match(&mut session, &mut store, &mut sink, "Match 2", "254");
    commit_match(&mut session, &mut store, &mut sink, "Match 1", "1114");
    let last = commit_match(&mut session, &mut store, &mut sink, "Match 2", "2056");

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains('\n'), "store file is pretty-printed");
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["Match 2", "Match 1"]);
    assert!(!tmp.path().join("data").join("match_data.json.tmp").exists());

    let reloaded = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.ordered_ids(), store.ordered_ids());
    assert_eq!(reloaded.get(&MatchId::new("Match 2")), Some(&last));
}

#[test]
fn undecodable_entries_are_skipped_on_load() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("match_data.json");
    fs::write(
        &path,
        r#"{
            "Match 1": {"match_number": "Match 1", "team_number": "254", "selected_color": "Red"},
            "Match 2": {"match_number": "Match 2", "auto": {"counters": "oops"}},
            "Match 3": {"team_number": "33"}
        }"#,
    )
    .unwrap();

    let store = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(store.ordered_ids(), [MatchId::new("Match 1"), MatchId::new("Match 3")]);
    assert_eq!(store.get(&MatchId::new("Match 3")).unwrap().team_number, "33");
}

#[test]
fn upsert_keeps_one_entry_per_match() {
    let mut store = MatchStore::new();
    let first = Record {
        match_number: MatchId::new("Match 5"),
        team_number: "1".to_string(),
        ..Record::default()
    };
    let second = Record {
        team_number: "2".to_string(),
        ..first.clone()
    };
    assert!(store.upsert(first.clone()).is_none());
    assert_eq!(store.upsert(second.clone()), Some(first));
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&MatchId::new("Match 5")), Some(&second));
}
