use tracing::info;

use crate::{
    record::{Counters, Record},
    types::{Alliance, COUNTER_KEYS},
};

use super::traits::{Cell, SheetRow, SheetSink, SinkError};

/// Number of columns in a projected row.
pub const COLUMN_COUNT: usize = 24;

/// Second header row: one name per column.
pub const COLUMN_NAMES: [&str; COLUMN_COUNT] = [
    "Match",
    "Team",
    "Alliance",
    "Scout Name",
    "L1",
    "L2",
    "L3",
    "L4",
    "Algae Removed",
    "Algae Processed",
    "Algae Netted",
    "Move State",
    "Starting Pos",
    "Comment",
    "L1",
    "L2",
    "L3",
    "L4",
    "Algae Removed",
    "Algae Processed",
    "Algae Netted",
    "Climb State",
    "Broken",
    "Comment",
];

const INFO_COL: usize = 0;
const AUTO_COL: usize = 4;
const TELEOP_COL: usize = 14;

/// First header row: group labels over the Info, Auto, and TeleOp columns.
pub fn group_header() -> SheetRow {
    let mut row = vec![Cell::text(""); COLUMN_COUNT];
    row[INFO_COL] = Cell::text("Info");
    row[AUTO_COL] = Cell::text("Auto");
    row[TELEOP_COL] = Cell::text("TeleOp");
    row
}

/// Both header rows, in sheet order.
pub fn header_rows() -> [SheetRow; 2] {
    [
        group_header(),
        COLUMN_NAMES.iter().map(|n| Cell::text(*n)).collect(),
    ]
}

/// Flattens a record into the fixed column order.
pub fn project(record: &Record) -> SheetRow {
    let mut row = Vec::with_capacity(COLUMN_COUNT);

    row.push(Cell::text(record.match_number.as_str()));
    row.push(Cell::text(record.team_number.as_str()));
    row.push(Cell::text(record.alliance.map(Alliance::as_str).unwrap_or("")));
    row.push(Cell::text(record.scouter_name.clone().unwrap_or_default()));

    push_counters(&mut row, &record.auto.counters);
    row.push(Cell::text(record.auto.moved_state.as_str()));
    row.push(Cell::text(
        record.auto.robot_coords.map(|c| c.joined()).unwrap_or_default(),
    ));
    row.push(Cell::text(record.auto.comment.as_str()));

    push_counters(&mut row, &record.teleop.counters);
    row.push(Cell::text(record.teleop.climb_state.as_str()));
    row.push(Cell::text(record.teleop.teleop_broken_state.as_str()));
    row.push(Cell::text(record.teleop.comment.as_str()));

    debug_assert_eq!(row.len(), COLUMN_COUNT);
    row
}

fn push_counters(row: &mut SheetRow, counters: &Counters) {
    for key in COUNTER_KEYS {
        row.push(Cell::Int(counters.get_or_zero(key)));
    }
}

/// Appends projected records to a sheet, writing headers on first use.
pub struct SheetWriter<S: SheetSink> {
    sink: S,
}

impl<S: SheetSink> SheetWriter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Projects `record` and appends it; an empty sheet gets the header rows first.
    pub fn append(&mut self, record: &Record) -> Result<SheetRow, SinkError> {
        if self.sink.is_empty()? {
            self.sink.write_header(&header_rows())?;
        }
        let row = project(record);
        self.sink.append_row(&row)?;
        info!(
            match_id = %record.match_number,
            team = %record.team_number,
            "row appended to sheet"
        );
        Ok(row)
    }
}
