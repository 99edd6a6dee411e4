use chrono::{Datelike, Local, Months, NaiveDate};

/// A month being browsed, Sunday-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    first: NaiveDate,
}

impl MonthCursor {
    /// `None` when `month` is outside 1..=12 or the year is out of range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn today() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn prev(&self) -> Self {
        Self {
            first: self
                .first
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            first: self
                .first
                .checked_add_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    /// e.g. `October 2026`
    pub fn label(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    pub fn days_in_month(&self) -> u32 {
        match self.first.checked_add_months(Months::new(1)) {
            Some(next) => next.signed_duration_since(self.first).num_days() as u32,
            None => 31,
        }
    }

    /// Empty cells before day 1 in a Sunday-first week row.
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    pub fn date(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Week rows of day numbers, `None` for padding cells.
    pub fn weeks(&self) -> Vec<[Option<u32>; 7]> {
        let blanks = self.leading_blanks();
        let days = self.days_in_month();
        let cells = (blanks + days).div_ceil(7) * 7;
        let mut weeks = Vec::new();
        let mut row = [None; 7];
        for cell in 0..cells {
            let day = cell.checked_sub(blanks).map(|d| d + 1).filter(|d| *d <= days);
            row[(cell % 7) as usize] = day;
            if cell % 7 == 6 {
                weeks.push(row);
                row = [None; 7];
            }
        }
        weeks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_and_shape_of_october_2026() {
        let m = MonthCursor::new(2026, 10).unwrap();
        assert_eq!(m.label(), "October 2026");
        assert_eq!(m.days_in_month(), 31);
        // 2026-10-01 is a Thursday
        assert_eq!(m.leading_blanks(), 4);
        let weeks = m.weeks();
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0], [None, None, None, None, Some(1), Some(2), Some(3)]);
        assert_eq!(weeks[4][6], Some(31));
    }

    #[test]
    fn navigation_wraps_years() {
        let jan = MonthCursor::new(2026, 1).unwrap();
        assert_eq!(jan.prev(), MonthCursor::new(2025, 12).unwrap());
        let dec = MonthCursor::new(2026, 12).unwrap();
        assert_eq!(dec.next(), MonthCursor::new(2027, 1).unwrap());
        assert_eq!(dec.next().prev(), dec);
    }

    #[test]
    fn february_lengths() {
        assert_eq!(MonthCursor::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(MonthCursor::new(2026, 2).unwrap().days_in_month(), 28);
    }

    #[test]
    fn dates_within_month() {
        let m = MonthCursor::new(2026, 4).unwrap();
        assert_eq!(m.date(30), NaiveDate::from_ymd_opt(2026, 4, 30));
        assert_eq!(m.date(31), None);
        assert!(m.contains(NaiveDate::from_ymd_opt(2026, 4, 15).unwrap()));
        assert!(!m.contains(NaiveDate::from_ymd_opt(2025, 4, 15).unwrap()));
        assert_eq!(MonthCursor::new(2026, 13), None);
    }

    #[test]
    fn containing_snaps_to_first() {
        let d = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(MonthCursor::containing(d).first_day().day(), 1);
    }
}
