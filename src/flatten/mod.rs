//! Flattens the decoded event document into row-oriented tables.
//!
//! Four independent passes over the same read-only document: event metadata
//! (one row), rooms (one row per room), items (one row per room, day,
//! category, and item), and schedule (one row per declared room/day). The
//! items and schedule passes share one three-way rule for how a schedule day
//! relates to the room's default items, captured in [`DayItems`].

use serde_json::{Map, Value};

use crate::error::{Result, ToolError};

/// File name of the event metadata table.
pub const EVENT_FILE: &str = "event.tsv";
/// File name of the rooms table.
pub const ROOMS_FILE: &str = "rooms.tsv";
/// File name of the flattened items table.
pub const ITEMS_FILE: &str = "items.tsv";
/// File name of the per-day schedule table.
pub const SCHEDULE_FILE: &str = "schedule.tsv";

/// Day value marking item rows sourced from a room's default collection
/// rather than tied to one specific day.
pub const DEFAULT_DAY_SENTINEL: &str = "*";

/// A flat table that will be materialised as one TSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Disposition of a schedule day with respect to the room's default items.
///
/// The distinction between an absent `items` key and an empty one is load
/// bearing: absent means "inherit the defaults", empty means "explicitly no
/// gear this day".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayItems<'a> {
    /// No `items` key: the day inherits the room's default items.
    Inherit,
    /// An `items` key with no content: explicitly no gear this day.
    Empty,
    /// A non-empty `items` key supersedes the defaults for this day.
    Explicit(&'a Map<String, Value>),
}

fn day_items(entry: &Value) -> DayItems<'_> {
    match entry.get("items") {
        None => DayItems::Inherit,
        Some(Value::Object(categories)) if !categories.is_empty() => {
            DayItems::Explicit(categories)
        }
        Some(_) => DayItems::Empty,
    }
}

/// Builds the single-row event metadata table.
pub fn event_table(document: &Value) -> Result<Table> {
    let event = entry(document, "event")?;

    let days = event
        .get("days")
        .and_then(Value::as_array)
        .map(|days| {
            days.iter()
                .map(|day| cell(Some(day)))
                .collect::<Vec<_>>()
                .join("|")
        })
        .unwrap_or_default();
    let labels = event
        .get("dayLabels")
        .and_then(Value::as_object)
        .map(|labels| {
            labels
                .iter()
                .map(|(day, label)| format!("{day}:{}", cell(Some(label))))
                .collect::<Vec<_>>()
                .join("|")
        })
        .unwrap_or_default();

    let row = vec![
        field(event, "name"),
        field(event, "venue"),
        field(event, "address"),
        days,
        labels,
        field(event, "defaultDay"),
    ];

    Ok(table(
        EVENT_FILE,
        &[
            "event_name",
            "venue",
            "address",
            "days",
            "day_labels",
            "default_day",
        ],
        vec![row],
    ))
}

/// Builds the rooms table, one row per room in document order.
pub fn rooms_table(document: &Value) -> Result<Table> {
    let mut rows = Vec::new();
    for (room_id, room) in rooms(document)? {
        rows.push(vec![
            room_id.clone(),
            field(room, "name"),
            field(room, "type"),
            field(room, "crew"),
            format_tags(room.get("tags")),
        ]);
    }

    Ok(table(
        ROOMS_FILE,
        &["room_id", "name", "type", "crew", "tags"],
        rows,
    ))
}

/// Builds the flattened items table.
///
/// Default items appear under the `*` sentinel day. A schedule day
/// contributes rows only when it carries a non-empty explicit `items`
/// collection; absent or empty `items` emit nothing here (the `*` rows or
/// the schedule table carry the signal instead).
pub fn items_table(document: &Value) -> Result<Table> {
    let mut rows = Vec::new();
    for (room_id, room) in rooms(document)? {
        if let Some(defaults) = room.get("defaultItems").and_then(Value::as_object) {
            push_item_rows(&mut rows, room_id, DEFAULT_DAY_SENTINEL, defaults);
        }

        let schedule = room.get("schedule").and_then(Value::as_object);
        for (day, day_entry) in schedule.into_iter().flatten() {
            if let DayItems::Explicit(categories) = day_items(day_entry) {
                push_item_rows(&mut rows, room_id, day, categories);
            }
        }
    }

    Ok(table(
        ITEMS_FILE,
        &[
            "room_id",
            "day",
            "category",
            "name",
            "qty",
            "location",
            "source",
            "note",
            "flag",
            "sort_order",
        ],
        rows,
    ))
}

/// Builds the schedule table, one row per (room, day) pair a room declares.
pub fn schedule_table(document: &Value) -> Result<Table> {
    let mut rows = Vec::new();
    for (room_id, room) in rooms(document)? {
        let has_defaults = room
            .get("defaultItems")
            .and_then(Value::as_object)
            .is_some_and(|defaults| !defaults.is_empty());

        let schedule = room.get("schedule").and_then(Value::as_object);
        for (day, day_entry) in schedule.into_iter().flatten() {
            let disposition = day_items(day_entry);
            let use_defaults = matches!(disposition, DayItems::Inherit) && has_defaults;
            let active = use_defaults || matches!(disposition, DayItems::Explicit(_));
            rows.push(vec![
                room_id.clone(),
                day.clone(),
                field(day_entry, "notes"),
                flag(use_defaults),
                flag(active),
            ]);
        }
    }

    Ok(table(
        SCHEDULE_FILE,
        &["room_id", "day", "notes", "use_default_items", "active"],
        rows,
    ))
}

fn push_item_rows(
    rows: &mut Vec<Vec<String>>,
    room_id: &str,
    day: &str,
    categories: &Map<String, Value>,
) {
    for (category, items) in categories {
        let items = items.as_array().map(Vec::as_slice).unwrap_or_default();
        // sort_order restarts for every category
        for (sort_order, item) in items.iter().enumerate() {
            rows.push(vec![
                room_id.to_string(),
                day.to_string(),
                category.clone(),
                field(item, "name"),
                quantity(item),
                field(item, "loc"),
                field(item, "src"),
                field(item, "note"),
                field(item, "flag"),
                sort_order.to_string(),
            ]);
        }
    }
}

/// Serializes a room's tag pairs as `type:value` joined by `|`.
fn format_tags(tags: Option<&Value>) -> String {
    let Some(tags) = tags.and_then(Value::as_array) else {
        return String::new();
    };
    tags.iter()
        .filter_map(Value::as_array)
        .map(|pair| format!("{}:{}", cell(pair.first()), cell(pair.get(1))))
        .collect::<Vec<_>>()
        .join("|")
}

fn quantity(item: &Value) -> String {
    match item.get("qty") {
        Some(qty) if !qty.is_null() => cell(Some(qty)),
        _ => "1".to_string(),
    }
}

fn flag(value: bool) -> String {
    if value { "Y" } else { "N" }.to_string()
}

fn rooms(document: &Value) -> Result<&Map<String, Value>> {
    document
        .get("rooms")
        .and_then(Value::as_object)
        .ok_or(ToolError::MissingEntry("rooms"))
}

fn entry<'a>(document: &'a Value, name: &'static str) -> Result<&'a Value> {
    document
        .get(name)
        .filter(|value| value.is_object())
        .ok_or(ToolError::MissingEntry(name))
}

fn field(object: &Value, key: &str) -> String {
    cell(object.get(key))
}

fn cell(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(value)) => value.to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn table(name: &str, columns: &[&str], rows: Vec<Vec<String>>) -> Table {
    Table {
        name: name.to_string(),
        columns: columns.iter().map(|column| (*column).to_string()).collect(),
        rows,
    }
}
