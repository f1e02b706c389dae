use std::fs;

use convene_tools::{ToolError, flatten, sync};
use tempfile::tempdir;

const SOURCE: &str = r#"
/* Demo gear plan — hand maintained.
   Rooms carry defaultItems unless a day overrides them. */
const EVENT_DATA = {
  event: {
    name: 'Demo',
    venue: 'Hall',
    address: '1 St',
    days: ['2/12', '2/13'],
    dayLabels: { '2/12': 'Day 1' }, // only the first day is labelled
    defaultDay: '2/12',
  },
  rooms: {
    r1: {
      name: 'Room 1',
      defaultItems: {
        audio: [
          { name: 'Mic', qty: 2 },
        ],
      },
      schedule: {
        '2/12': { notes: 'setup' },
        '2/13': { items: {} },
      },
    },
  },
};
"#;

#[test]
fn seed_writes_all_four_tables() {
    let dir = tempdir().expect("temporary directory");
    let input = dir.path().join("event-data.js");
    fs::write(&input, SOURCE).expect("input written");

    let report = sync::seed(&input, dir.path(), "EVENT_DATA").expect("seed run");

    assert_eq!(report.rooms, 1);
    assert_eq!(report.days, 2);
    let counts: Vec<(&str, usize)> = report
        .tables
        .iter()
        .map(|table| (table.file.as_str(), table.rows))
        .collect();
    assert_eq!(
        counts,
        vec![
            (flatten::EVENT_FILE, 1),
            (flatten::ROOMS_FILE, 1),
            (flatten::ITEMS_FILE, 1),
            (flatten::SCHEDULE_FILE, 2),
        ]
    );

    let event = fs::read_to_string(dir.path().join(flatten::EVENT_FILE)).expect("event table");
    assert_eq!(
        event,
        "event_name\tvenue\taddress\tdays\tday_labels\tdefault_day\n\
         Demo\tHall\t1 St\t2/12|2/13\t2/12:Day 1\t2/12\n"
    );

    let rooms = fs::read_to_string(dir.path().join(flatten::ROOMS_FILE)).expect("rooms table");
    assert_eq!(rooms, "room_id\tname\ttype\tcrew\ttags\nr1\tRoom 1\t\t\t\n");

    let items = fs::read_to_string(dir.path().join(flatten::ITEMS_FILE)).expect("items table");
    assert_eq!(
        items,
        "room_id\tday\tcategory\tname\tqty\tlocation\tsource\tnote\tflag\tsort_order\n\
         r1\t*\taudio\tMic\t2\t\t\t\t\t0\n"
    );

    let schedule =
        fs::read_to_string(dir.path().join(flatten::SCHEDULE_FILE)).expect("schedule table");
    assert_eq!(
        schedule,
        "room_id\tday\tnotes\tuse_default_items\tactive\n\
         r1\t2/12\tsetup\tY\tY\n\
         r1\t2/13\t\tN\tN\n"
    );
}

#[test]
fn reruns_are_byte_identical() {
    let dir = tempdir().expect("temporary directory");
    let input = dir.path().join("event-data.js");
    fs::write(&input, SOURCE).expect("input written");

    sync::seed(&input, dir.path(), "EVENT_DATA").expect("first run");
    let first: Vec<String> = table_files(dir.path());

    sync::seed(&input, dir.path(), "EVENT_DATA").expect("second run");
    let second: Vec<String> = table_files(dir.path());

    assert_eq!(first, second);
}

#[test]
fn unterminated_input_writes_nothing() {
    let dir = tempdir().expect("temporary directory");
    let input = dir.path().join("broken.js");
    fs::write(&input, "const EVENT_DATA = { rooms: { ").expect("input written");

    let err = sync::seed(&input, dir.path(), "EVENT_DATA").expect_err("parse fails");
    assert!(matches!(err, ToolError::UnterminatedObject(_)));
    assert_eq!(file_names(dir.path()), vec!["broken.js".to_string()]);
}

#[test]
fn undecodable_input_writes_nothing() {
    let dir = tempdir().expect("temporary directory");
    let input = dir.path().join("broken.js");
    fs::write(&input, "const EVENT_DATA = { rooms: [1:2] };").expect("input written");

    let err = sync::seed(&input, dir.path(), "EVENT_DATA").expect_err("decode fails");
    assert!(matches!(err, ToolError::Decode { .. }));
    assert_eq!(file_names(dir.path()), vec!["broken.js".to_string()]);
}

#[test]
fn bound_name_is_configurable() {
    let dir = tempdir().expect("temporary directory");
    let input = dir.path().join("setup.js");
    fs::write(&input, "const SETUP = { event: {}, rooms: {} };").expect("input written");

    let report = sync::seed(&input, dir.path(), "SETUP").expect("seed run");
    assert_eq!(report.rooms, 0);
    assert_eq!(report.tables.len(), 4);
}

fn table_files(dir: &std::path::Path) -> Vec<String> {
    [
        flatten::EVENT_FILE,
        flatten::ROOMS_FILE,
        flatten::ITEMS_FILE,
        flatten::SCHEDULE_FILE,
    ]
    .iter()
    .map(|file| fs::read_to_string(dir.join(file)).expect("table read"))
    .collect()
}

fn file_names(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("directory listed")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
