use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use tracing::{debug, info};

use crate::{
    error::ScheduleError,
    models::menu::{DayMenu, MealSlot, ScheduleRow, ScheduleTable, PLACEHOLDER},
};

const WEEK: &str = "Week";
const DAY: &str = "Day";
const REQUIRED_COLUMNS: [&str; 6] = [WEEK, DAY, "Breakfast", "Lunch", "Snacks", "Dinner"];
/// Largest magnitude a float cell may have and still be read as a whole number.
const MAX_WHOLE_FLOAT: f64 = 1e15;

fn whole_number(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f.abs() < MAX_WHOLE_FLOAT).then(|| f as i64)
}

/// A cell as read from either a workbook or a CSV file.
#[derive(Debug, Clone, PartialEq)]
enum RawCell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawCell {
    fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed text form. Integral floats drop their `.0`.
    fn text(&self) -> String {
        match self {
            RawCell::Empty => String::new(),
            RawCell::Int(n) => n.to_string(),
            RawCell::Float(f) => match whole_number(*f) {
                Some(n) => n.to_string(),
                None => f.to_string(),
            },
            RawCell::Text(s) => s.trim().to_string(),
        }
    }

    fn week(&self) -> Option<i64> {
        match self {
            RawCell::Int(n) => Some(*n),
            RawCell::Float(f) => whole_number(*f),
            RawCell::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole_number))
            }
            _ => None,
        }
    }
}

impl From<&Data> for RawCell {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => RawCell::Empty,
            Data::Int(n) => RawCell::Int(*n),
            Data::Float(f) => RawCell::Float(*f),
            Data::String(s) => RawCell::Text(s.clone()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
            other => RawCell::Text(other.to_string()),
        }
    }
}

/// Loads a weekly rotation schedule from `.xlsx`/`.xlsm`/`.xls`/`.ods` or `.csv`.
///
/// The first row is the header. Header names are matched after trimming and
/// capitalizing, so `" week "` and `"WEEK"` both satisfy `Week`.
pub fn load_schedule(path: &Path) -> Result<ScheduleTable, ScheduleError> {
    std::fs::metadata(path).map_err(|source| ScheduleError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let rows = match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path)?,
        "csv" => read_csv(path)?,
        _ => return Err(ScheduleError::UnsupportedFormat(path.display().to_string())),
    };

    let table = normalize(rows)?;
    info!("Loaded {} schedule rows from {}", table.len(), path.display());
    Ok(table)
}

fn read_workbook(path: &Path) -> Result<Vec<Vec<RawCell>>, ScheduleError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ScheduleError::Workbook(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ScheduleError::Empty)?
        .map_err(|e| ScheduleError::Workbook(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(RawCell::from).collect())
        .collect())
}

fn read_csv(path: &Path) -> Result<Vec<Vec<RawCell>>, ScheduleError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        RawCell::Empty
                    } else {
                        RawCell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(rows)
}

fn normalize(rows: Vec<Vec<RawCell>>) -> Result<ScheduleTable, ScheduleError> {
    let mut rows = rows.into_iter();
    let header: Vec<String> = rows
        .next()
        .ok_or(ScheduleError::Empty)?
        .iter()
        .map(|cell| capitalize(&cell.text()))
        .collect();

    let position = |name: &str| header.iter().position(|h| h == name);
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| position(*name).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(ScheduleError::MissingColumns {
            missing: missing.join(", "),
            found: header.join(", "),
        });
    }

    // All present, checked above.
    let column = |name: &str| position(name).unwrap_or_default();
    let week_col = column(WEEK);
    let day_col = column(DAY);
    let meal_cols = MealSlot::ALL.map(|slot| column(slot.as_str()));

    let mut table = Vec::new();
    for (index, row) in rows.enumerate() {
        // Header is spreadsheet row 1.
        let row_number = index + 2;
        if row.iter().all(RawCell::is_blank) {
            debug!("Skipping blank row {}", row_number);
            continue;
        }
        let cell = |col: usize| row.get(col).cloned().unwrap_or(RawCell::Empty);

        let week_cell = cell(week_col);
        let week = week_cell.week().ok_or_else(|| ScheduleError::InvalidWeek {
            row: row_number,
            value: week_cell.text(),
        })?;

        let day = capitalize(&cell(day_col).text());
        if day.is_empty() {
            return Err(ScheduleError::MissingDay { row: row_number });
        }

        let [breakfast, lunch, snacks, dinner] = meal_cols.map(|col| meal_text(&cell(col)));
        table.push(ScheduleRow {
            week,
            day,
            menu: DayMenu {
                breakfast,
                lunch,
                snacks,
                dinner,
            },
        });
    }

    Ok(ScheduleTable::new(table))
}

/// Empty and whitespace-only cells both become the placeholder.
fn meal_text(cell: &RawCell) -> String {
    let text = cell.text();
    if text.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        text
    }
}

/// Trims, then upper-cases the first character and lower-cases the rest.
pub fn capitalize(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
