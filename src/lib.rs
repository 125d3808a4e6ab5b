//! Match-scouting records: capture sessions, a JSON match store, QR payloads,
//! and an append-only sheet relay with scan-session dedup.
//!
//! # Examples
//!
//! Capturing and committing one match with [`core::session::Session`]:
//! ```
//! use scoutlog::{
//!     core::{session::Session, store::MatchStore},
//!     persist::NullStoreSink,
//!     transport,
//!     types::{Alliance, ClimbState, MatchId},
//! };
//!
//! let mut store = MatchStore::new();
//! let mut session = Session::default();
//! session.select_match(&store, MatchId::new("Match 1")).expect("select");
//! session.set_team_number("254").expect("team");
//! session.set_alliance(Alliance::Red).expect("alliance");
//! session.start().expect("start");
//! session.begin_auto().expect("auto");
//! session.increment("L1").expect("L1");
//! session.begin_teleop().expect("teleop");
//! session.set_climb_state(ClimbState::Barge).expect("climb");
//! let record = session.commit(&mut store, &mut NullStoreSink).expect("commit");
//!
//! let payload = transport::encode(&record).expect("encode");
//! assert_eq!(transport::decode(&payload).expect("decode"), record);
//! ```
//!
//! Relaying scanned payloads into a sheet:
//! ```no_run
//! use scoutlog::{
//!     persist::sqlite::SqliteSheetSink,
//!     runtime::handle::{spawn_scanner, ScannerConfig},
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let sink = SqliteSheetSink::open("scout_sheet.db", "Raw").expect("open sqlite");
//! let handle = spawn_scanner(Box::new(sink), ScannerConfig::default());
//! let payload = r#"{"match_number":"Match 1","team_number":"254"}"#.to_string();
//! handle.submit_frame(vec![payload]).await.expect("frame");
//! let summary = handle.quit().await.expect("quit");
//! assert_eq!(summary.appended, 1);
//! # }
//! ```

/// Capture session, undo log, and in-memory match store.
pub mod core;
/// Sheet projection, sink trait, and scan dedup.
pub mod engine;
/// Line log of the click-to-score prototype.
pub mod legacy;
/// Undo log entry model.
pub mod op;
/// Store-file and sheet persistence.
pub mod persist;
/// Match record model.
pub mod record;
/// Scanner relay runtime and events.
pub mod runtime;
/// Layered configuration.
pub mod settings;
/// QR, clipboard, and export payload encoding.
pub mod transport;
/// Shared primitive types and enums.
pub mod types;
