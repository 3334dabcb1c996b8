//! A life in weeks, one dot per week, 52 weeks per row.

use chrono::{Datelike, Duration, NaiveDate, TimeDelta};
use colored::Colorize;

pub const WEEKS_PER_ROW: i64 = 52;
pub const MAX_ROWS: i64 = 100;
pub const DEFAULT_TARGET_AGE: u32 = 82;

const PAST: &str = "●";
const CURRENT: &str = "●";
const FUTURE: &str = "○";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekState {
    Past,
    Current,
    Future,
}

#[derive(Debug, Clone)]
pub struct LifeInWeeks {
    pub birth: NaiveDate,
    pub target_age: u32,
    pub total_weeks: i64,
    pub current_week: i64,
}

fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

impl LifeInWeeks {
    /// All dates are snapped back to the Monday of their week before
    /// counting, so partial weeks never shift the grid.
    ///
    /// Returns `None` when the end date falls outside the supported calendar.
    pub fn new(birth: NaiveDate, target_age: u32, today: NaiveDate) -> Option<Self> {
        let span = TimeDelta::try_weeks(WEEKS_PER_ROW * target_age as i64)?;
        let end = birth.checked_add_signed(span)?;

        let start_monday = monday_of(birth);
        let total_weeks = (monday_of(end) - start_monday).num_days() / 7;
        let current_week = (monday_of(today) - start_monday).num_days() / 7;

        Some(Self {
            birth,
            target_age,
            total_weeks,
            current_week,
        })
    }

    pub fn week_state(&self, week: i64) -> WeekState {
        if week + 1 == self.current_week {
            WeekState::Current
        } else if week >= self.current_week {
            WeekState::Future
        } else {
            WeekState::Past
        }
    }

    /// `(row, column)` of a week in the grid.
    pub fn grid_position(week: i64) -> (i64, i64) {
        (week / WEEKS_PER_ROW, week % WEEKS_PER_ROW)
    }

    /// Number of weeks drawn, capped at [`MAX_ROWS`] rows.
    pub fn visible_weeks(&self) -> i64 {
        self.total_weeks.clamp(0, WEEKS_PER_ROW * MAX_ROWS)
    }

    pub fn render(&self, title: &str) -> String {
        let mut out = String::new();
        out.push_str(&format!("{}\n\n", title.bold()));

        for week in 0..self.visible_weeks() {
            let (_, col) = Self::grid_position(week);
            if col > 0 {
                out.push(' ');
            }

            let cell = match self.week_state(week) {
                WeekState::Past => PAST.truecolor(100, 100, 100).to_string(),
                WeekState::Current => CURRENT.truecolor(8, 143, 143).bold().to_string(),
                WeekState::Future => FUTURE.truecolor(100, 100, 100).to_string(),
            };
            out.push_str(&cell);

            if col == WEEKS_PER_ROW - 1 {
                out.push('\n');
            }
        }

        if !out.ends_with('\n') {
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn counts_weeks_between_mondays() {
        // 1991-01-29 is a Tuesday
        let life = LifeInWeeks::new(date(1991, 1, 29), 82, date(1991, 2, 12)).unwrap();
        assert_eq!(life.total_weeks, 52 * 82);
        assert_eq!(life.current_week, 2);
    }

    #[test]
    fn same_week_is_week_zero() {
        let life = LifeInWeeks::new(date(2024, 1, 1), 1, date(2024, 1, 7)).unwrap();
        assert_eq!(life.current_week, 0);
        assert_eq!(life.total_weeks, 52);
    }

    #[test]
    fn week_states_around_today() {
        let life = LifeInWeeks::new(date(2024, 1, 1), 1, date(2024, 1, 29)).unwrap();
        assert_eq!(life.current_week, 4);
        assert_eq!(life.week_state(0), WeekState::Past);
        assert_eq!(life.week_state(2), WeekState::Past);
        assert_eq!(life.week_state(3), WeekState::Current);
        assert_eq!(life.week_state(4), WeekState::Future);
        assert_eq!(life.week_state(51), WeekState::Future);
    }

    #[test]
    fn grid_wraps_every_52_weeks() {
        assert_eq!(LifeInWeeks::grid_position(0), (0, 0));
        assert_eq!(LifeInWeeks::grid_position(51), (0, 51));
        assert_eq!(LifeInWeeks::grid_position(52), (1, 0));
        assert_eq!(LifeInWeeks::grid_position(105), (2, 1));
    }

    #[test]
    fn visible_weeks_are_capped() {
        let life = LifeInWeeks::new(date(1900, 1, 1), 120, date(1950, 1, 1)).unwrap();
        assert_eq!(life.visible_weeks(), 52 * 100);
    }

    #[test]
    fn render_draws_one_row_per_year() {
        let life = LifeInWeeks::new(date(2024, 1, 1), 2, date(2024, 3, 4)).unwrap();
        let out = life.render("A LIFE IN WEEKS");

        assert!(out.contains("A LIFE IN WEEKS"));
        assert_eq!(out.matches(FUTURE).count() as i64, 104 - life.current_week);
        assert_eq!(out.matches(PAST).count() as i64, life.current_week);
        // title, blank line, then one line per row
        assert_eq!(out.lines().count(), 2 + 2);
    }

    #[test]
    fn unrepresentable_target_age_is_rejected() {
        assert!(LifeInWeeks::new(date(2000, 1, 1), 300_000, date(2024, 1, 1)).is_none());
        assert!(LifeInWeeks::new(date(2000, 1, 1), u32::MAX, date(2024, 1, 1)).is_none());
    }

    #[test]
    fn zero_target_age_draws_nothing() {
        let life = LifeInWeeks::new(date(2000, 1, 1), 0, date(2024, 1, 1)).unwrap();
        assert_eq!(life.total_weeks, 0);
        assert_eq!(life.visible_weeks(), 0);
    }
}
