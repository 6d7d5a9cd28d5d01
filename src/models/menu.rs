/// Sentinel stored in any meal slot the spreadsheet leaves blank.
pub const PLACEHOLDER: &str = "TBD";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Snacks,
    Dinner,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Snacks,
        MealSlot::Dinner,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Snacks => "Snacks",
            MealSlot::Dinner => "Dinner",
        }
    }
}

impl std::fmt::Display for MealSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four meals served on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayMenu {
    pub breakfast: String,
    pub lunch: String,
    pub snacks: String,
    pub dinner: String,
}

impl DayMenu {
    pub fn get(&self, slot: MealSlot) -> &str {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Snacks => &self.snacks,
            MealSlot::Dinner => &self.dinner,
        }
    }
}

/// One spreadsheet row after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleRow {
    pub week: i64,
    /// Capitalized weekday name, e.g. "Monday".
    pub day: String,
    pub menu: DayMenu,
}

/// Rows in file order. Duplicate (week, day) pairs are kept; lookups take the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleTable {
    rows: Vec<ScheduleRow>,
}

impl ScheduleTable {
    pub fn new(rows: Vec<ScheduleRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ScheduleRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Result of looking up today's row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedMenu {
    Found(DayMenu),
    /// No row matched; carries the weekday name that was looked up.
    NotFound { day: String },
}
