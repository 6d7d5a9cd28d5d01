use chrono::NaiveDate;
use tracing::debug;

use crate::models::menu::{ResolvedMenu, ScheduleTable};

/// Full English weekday name, e.g. "Monday".
pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

pub struct MenuService;

impl MenuService {
    /// First row whose week equals `week_index` and whose day matches the
    /// weekday of `today`, ignoring case.
    pub fn resolve(table: &ScheduleTable, week_index: u8, today: NaiveDate) -> ResolvedMenu {
        let day = weekday_name(today);
        table
            .rows()
            .iter()
            .find(|row| row.week == i64::from(week_index) && row.day.eq_ignore_ascii_case(&day))
            .map(|row| ResolvedMenu::Found(row.menu.clone()))
            .unwrap_or_else(|| {
                debug!("No row for week {} {}", week_index, day);
                ResolvedMenu::NotFound { day }
            })
    }
}
