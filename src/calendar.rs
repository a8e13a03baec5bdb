//! Month navigation and the calendar grid
//!
//! The cursor tracks the visible month; the grid lays its days out Sunday-first with
//! leading blank cells, each day cell carrying the decoration flags the renderer needs.

use std::fmt::{Display, Formatter};

use bitflags::bitflags;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::date_key::DateKey;
use crate::indicator::IndicatorCache;

/// The month names of the original application
static MESES: [&str; 12] = [
    "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho",
    "Julho", "Agosto", "Setembro", "Outubro", "Novembro", "Dezembro",
];

/// The (year, month) pair currently displayed in the calendar grid.
///
/// `month` is 1-based, like everywhere else in this crate. Navigation is the only thing
/// that mutates it; selecting a day does not move the cursor, and moving the cursor does
/// not change the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCursor {
    year: i32,
    month: u32,
}

impl MonthCursor {
    /// `month` is 1-based; values outside `1..=12` are clamped into the year
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month: month.min(12).max(1) }
    }

    /// The month containing the given day
    pub fn containing(key: &DateKey) -> Self {
        Self { year: key.year(), month: key.month() }
    }

    pub fn year(&self) -> i32 { self.year }
    /// 1-based month
    pub fn month(&self) -> u32 { self.month }

    /// One month later, carrying into the next year after December
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// One month earlier, carrying into the previous year before January
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn contains(&self, key: &DateKey) -> bool {
        key.year() == self.year && key.month() == self.month
    }

    /// Weekday index of day 1, Sunday = 0. This is the number of blank cells the grid
    /// starts with
    pub fn first_weekday(&self) -> u32 {
        match chrono::NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            None => 0,
            Some(first) => first.weekday().num_days_from_sunday(),
        }
    }

    /// Number of days in this month (the "day 0 of the following month" trick)
    pub fn day_count(&self) -> u32 {
        let next = self.next();
        match chrono::NaiveDate::from_ymd_opt(next.year, next.month, 1).and_then(|d| d.pred_opt()) {
            None => 0,
            Some(last) => last.day(),
        }
    }

    /// The month/year label, e.g. "Janeiro 2024"
    pub fn label(&self) -> String {
        format!("{} {}", MESES[(self.month - 1) as usize], self.year)
    }
}

impl Display for MonthCursor {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

bitflags! {
    /// The decorations of one day cell. Independent: one cell may carry all three
    #[derive(Serialize, Deserialize)]
    pub struct CellFlags: u8 {
        /// This day has at least one task
        const HAS_TASK = 1;
        /// This day is the selected one
        const SELECTED = 2;
        /// This day is today
        const TODAY = 4;
    }
}

/// One in-month cell of the calendar grid
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayCell {
    day: u32,
    key: DateKey,
    flags: CellFlags,
}

impl DayCell {
    /// 1-based day of month
    pub fn day(&self) -> u32 { self.day }
    pub fn key(&self) -> &DateKey { &self.key }
    pub fn flags(&self) -> CellFlags { self.flags }
}

/// The grid of one month: leading blank cells, then one cell per day
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthGrid {
    leading_blanks: u32,
    cells: Vec<DayCell>,
}

impl MonthGrid {
    /// Lay out the cursor's month and annotate each cell from the indicator cache, the
    /// selection, and today's date.
    ///
    /// `today` is passed in rather than computed here, so that one consistent "now" is
    /// used for a whole render
    pub fn build(
        cursor: MonthCursor,
        indicators: &IndicatorCache,
        selected: &DateKey,
        today: &DateKey,
    ) -> Self {
        let mut cells = Vec::with_capacity(cursor.day_count() as usize);

        for day in 1..=cursor.day_count() {
            let key = match DateKey::from_ymd(cursor.year(), cursor.month(), day) {
                None => continue,
                Some(key) => key,
            };

            let mut flags = CellFlags::empty();
            if indicators.has_tasks(&key) {
                flags.insert(CellFlags::HAS_TASK);
            }
            if &key == selected {
                flags.insert(CellFlags::SELECTED);
            }
            if &key == today {
                flags.insert(CellFlags::TODAY);
            }

            cells.push(DayCell { day, key, flags });
        }

        Self {
            leading_blanks: cursor.first_weekday(),
            cells,
        }
    }

    pub fn leading_blanks(&self) -> u32 {
        self.leading_blanks
    }

    pub fn cells(&self) -> &[DayCell] {
        &self.cells
    }
}
