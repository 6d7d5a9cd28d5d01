use chrono::NaiveDate;

use crate::models::{
    menu::{MealSlot, ResolvedMenu},
    message::MenuMessage,
};

pub const DISCLAIMER: &str = "(This is an automated message — do not reply.)";

pub fn compose_subject(today: NaiveDate, week_index: u8) -> String {
    format!(
        "Mess Menu — {} (Week {week_index}/4)",
        today.format("%A, %Y-%m-%d")
    )
}

pub fn compose_body(today: NaiveDate, week_index: u8, menu: &ResolvedMenu) -> String {
    match menu {
        ResolvedMenu::Found(menu) => {
            let mut lines = vec![
                format!("Date: {}", today.format("%A, %B %d, %Y")),
                format!("Cycle week: {week_index} of 4"),
                String::new(),
            ];
            lines.extend(
                MealSlot::ALL
                    .iter()
                    .map(|slot| format!("{slot}: {}", menu.get(*slot))),
            );
            lines.push(String::new());
            lines.push(DISCLAIMER.to_string());
            lines.join("\n")
        }
        ResolvedMenu::NotFound { day } => format!(
            "Date: {}\nWeek: {week_index}/4\n\nMenu for {day} not found in schedule.",
            today.format("%Y-%m-%d")
        ),
    }
}

pub fn compose(today: NaiveDate, week_index: u8, menu: &ResolvedMenu) -> MenuMessage {
    MenuMessage {
        subject: compose_subject(today, week_index),
        body: compose_body(today, week_index, menu),
    }
}
