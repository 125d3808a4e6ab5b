use std::fs;

use tempfile::TempDir;

use scoutlog::{
    core::session::ValidationPolicy,
    runtime::handle::RelayMode,
    settings::ScoutSettings,
    types::MatchId,
};

#[test]
fn defaults_cover_a_full_event() {
    let settings = ScoutSettings::default();
    assert_eq!(settings.match_count, 58);
    assert_eq!(settings.event_names, ["Newmarket", "Durham College"]);
    assert_eq!(settings.validation, ValidationPolicy::Permissive);
    assert_eq!(settings.relay_mode, RelayMode::Immediate);
    assert_eq!(settings.sheet.section, "Raw");

    let ids = settings.match_ids();
    assert_eq!(ids.len(), 58);
    assert_eq!(ids[0], MatchId::new("Match 1"));
    assert_eq!(ids[57], MatchId::new("Match 58"));
}

#[test]
fn file_values_override_defaults() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("scout.toml");
    fs::write(
        &path,
        r#"
match_count = 12
validation = "strict"
relay_mode = "on_quit"
export_dir = "exports"

[sheet]
section = "Qualifiers"
"#,
    )
    .unwrap();

    let settings = ScoutSettings::load(Some(path.as_path())).expect("load");
    assert_eq!(settings.match_count, 12);
    assert_eq!(settings.validation, ValidationPolicy::Strict);
    assert_eq!(settings.relay_mode, RelayMode::OnQuit);
    assert_eq!(settings.export_dir.as_deref(), Some(std::path::Path::new("exports")));
    assert_eq!(settings.sheet.section, "Qualifiers");
    assert_eq!(settings.sheet.database, std::path::PathBuf::from("scout_sheet.db"));
    assert_eq!(settings.field_width, 600.0);

    let session = settings.session_config();
    assert_eq!(session.validation, ValidationPolicy::Strict);
    assert_eq!(settings.scanner_config().relay_mode, RelayMode::OnQuit);
}

#[test]
fn missing_required_file_is_an_error() {
    let tmp = TempDir::new().expect("tmp");
    assert!(ScoutSettings::load(Some(tmp.path().join("absent.toml").as_path())).is_err());
}
