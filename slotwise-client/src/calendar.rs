//! Calendar Navigator
//!
//! Month grid with a cursor month tracked independently of the selection.
//! Navigation moves only the cursor; selecting a date never moves the
//! cursor back. Days before `min_date` are disabled and selecting one is a
//! no-op. Pure render decisions, no failure modes.

use chrono::{Datelike, NaiveDate};

/// Calendar month navigator
#[derive(Debug, Clone)]
pub struct CalendarNavigator {
    selected: NaiveDate,
    /// First day of the displayed month
    cursor: NaiveDate,
    min_date: Option<NaiveDate>,
}

impl CalendarNavigator {
    pub fn new(selected: NaiveDate) -> Self {
        Self {
            selected,
            cursor: first_of_month(selected.year(), selected.month()),
            min_date: None,
        }
    }

    /// Disable days strictly before `min_date`
    pub fn with_min_date(mut self, min_date: NaiveDate) -> Self {
        self.min_date = Some(min_date);
        self
    }

    pub fn selected(&self) -> NaiveDate {
        self.selected
    }

    /// Displayed (year, month), independent of the selection
    pub fn cursor_month(&self) -> (i32, u32) {
        (self.cursor.year(), self.cursor.month())
    }

    pub fn previous_month(&mut self) {
        let (year, month) = match self.cursor.month() {
            1 => (self.cursor.year() - 1, 12),
            m => (self.cursor.year(), m - 1),
        };
        self.cursor = first_of_month(year, month);
    }

    pub fn next_month(&mut self) {
        let (year, month) = match self.cursor.month() {
            12 => (self.cursor.year() + 1, 1),
            m => (self.cursor.year(), m + 1),
        };
        self.cursor = first_of_month(year, month);
    }

    /// Whether a day renders muted and non-clickable
    pub fn is_disabled(&self, date: NaiveDate) -> bool {
        self.min_date.is_some_and(|min| date < min)
    }

    /// Select a date; returns false (no-op) for disabled days
    ///
    /// Does not move the cursor: after navigating away, the selection keeps
    /// pointing at its original month.
    pub fn select(&mut self, date: NaiveDate) -> bool {
        if self.is_disabled(date) {
            return false;
        }
        self.selected = date;
        true
    }

    /// The displayed month as grid cells: leading `None` padding before the
    /// 1st (Sunday-first weeks), then the days of the month
    pub fn month_grid(&self) -> Vec<Option<u32>> {
        let leading = self.cursor.weekday().num_days_from_sunday() as usize;
        let days = days_in_month(self.cursor.year(), self.cursor.month());
        let mut cells = vec![None; leading];
        cells.extend((1..=days).map(Some));
        cells
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or_default()
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let next = match month {
        12 => first_of_month(year + 1, 1),
        m => first_of_month(year, m + 1),
    };
    (next - first_of_month(year, month)).num_days() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_month_grid_padding() {
        // 2025-03-01 is a Saturday: six leading blanks, 31 days.
        let nav = CalendarNavigator::new(date("2025-03-15"));
        let grid = nav.month_grid();
        assert_eq!(grid.len(), 6 + 31);
        assert!(grid[..6].iter().all(Option::is_none));
        assert_eq!(grid[6], Some(1));
        assert_eq!(grid[36], Some(31));
    }

    #[test]
    fn test_grid_starts_flush_on_sunday() {
        // 2025-06-01 is a Sunday: no padding.
        let nav = CalendarNavigator::new(date("2025-06-01"));
        assert_eq!(nav.month_grid()[0], Some(1));
        assert_eq!(nav.month_grid().len(), 30);
    }

    #[test]
    fn test_navigation_is_independent_of_selection() {
        let mut nav = CalendarNavigator::new(date("2025-03-15"));
        nav.next_month();
        nav.next_month();
        assert_eq!(nav.cursor_month(), (2025, 5));
        assert_eq!(nav.selected(), date("2025-03-15"));

        nav.previous_month();
        assert_eq!(nav.cursor_month(), (2025, 4));

        // Selecting does not snap the cursor back.
        assert!(nav.select(date("2025-03-20")));
        assert_eq!(nav.cursor_month(), (2025, 4));
        assert_eq!(nav.selected(), date("2025-03-20"));
    }

    #[test]
    fn test_year_boundaries() {
        let mut nav = CalendarNavigator::new(date("2025-01-10"));
        nav.previous_month();
        assert_eq!(nav.cursor_month(), (2024, 12));
        nav.next_month();
        assert_eq!(nav.cursor_month(), (2025, 1));
    }

    #[test]
    fn test_min_date_disables_selection() {
        let mut nav =
            CalendarNavigator::new(date("2025-03-15")).with_min_date(date("2025-03-10"));
        assert!(nav.is_disabled(date("2025-03-09")));
        assert!(!nav.is_disabled(date("2025-03-10")));

        assert!(!nav.select(date("2025-03-09")));
        assert_eq!(nav.selected(), date("2025-03-15"));
        assert!(nav.select(date("2025-03-10")));
        assert_eq!(nav.selected(), date("2025-03-10"));
    }

    #[test]
    fn test_leap_february() {
        let nav = CalendarNavigator::new(date("2024-02-10"));
        let days: Vec<u32> = nav.month_grid().into_iter().flatten().collect();
        assert_eq!(days.len(), 29);
    }
}
