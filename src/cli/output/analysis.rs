use chrono::{NaiveDate, Weekday};

use crate::store::entities::ActivityPeriod;

/// Per-category minute total. Totals keep first-encountered order so ties
/// resolve deterministically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMinutes {
    pub category: String,
    pub minutes: i64,
}

/// The multi-day figures shown on the summary panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_hours: f64,
    pub days_tracked: usize,
    pub avg_daily_hours: f64,
    pub top_category: String,
}

/// Periods whose start falls on `day`.
pub fn day_activities(all: &[ActivityPeriod], day: NaiveDate) -> Vec<ActivityPeriod> {
    all.iter().filter(|p| p.day() == day).cloned().collect()
}

/// Minutes on `day` outside the untracked category.
pub fn day_total_minutes(all: &[ActivityPeriod], day: NaiveDate, untracked: &str) -> i64 {
    all.iter()
        .filter(|p| p.day() == day && p.category != untracked)
        .map(|p| p.duration_minutes())
        .sum()
}

/// Per-category minute totals for the Monday-based week containing
/// `reference_day`. The untracked category is counted here: the weekly view
/// shows where the whole week went, only the long-term summary filters it.
pub fn weekly_category_totals(
    all: &[ActivityPeriod],
    reference_day: NaiveDate,
) -> Vec<CategoryMinutes> {
    let week = reference_day.week(Weekday::Mon);
    let mut totals: Vec<CategoryMinutes> = Vec::new();
    for period in all {
        let day = period.day();
        if day < week.first_day() || day > week.last_day() {
            continue;
        }
        accumulate(&mut totals, &period.category, period.duration_minutes());
    }
    totals
}

/// Rolls every recorded day except today into the four summary figures. The
/// untracked category is skipped entirely, so a day holding nothing else
/// does not count as tracked.
pub fn summarize(all: &[ActivityPeriod], today: NaiveDate, untracked: &str) -> Summary {
    let mut totals: Vec<CategoryMinutes> = Vec::new();
    let mut days: Vec<NaiveDate> = Vec::new();
    let mut total_minutes = 0i64;

    for period in all {
        if period.category == untracked || period.day() == today {
            continue;
        }
        let minutes = period.duration_minutes();
        total_minutes += minutes;
        if !days.contains(&period.day()) {
            days.push(period.day());
        }
        accumulate(&mut totals, &period.category, minutes);
    }

    // Strictly-greater comparison: the first category to reach the top
    // minute count keeps the title on ties.
    let mut top_category = "-".to_string();
    let mut top_minutes = 0i64;
    for entry in &totals {
        if entry.minutes > top_minutes {
            top_minutes = entry.minutes;
            top_category = entry.category.clone();
        }
    }

    let total_hours = total_minutes as f64 / 60.0;
    let days_tracked = days.len();
    let avg_daily_hours = if days_tracked == 0 {
        0.0
    } else {
        total_hours / days_tracked as f64
    };

    Summary {
        total_hours,
        days_tracked,
        avg_daily_hours,
        top_category,
    }
}

fn accumulate(totals: &mut Vec<CategoryMinutes>, category: &str, minutes: i64) {
    match totals.iter_mut().find(|c| c.category == category) {
        Some(entry) => entry.minutes += minutes,
        None => totals.push(CategoryMinutes {
            category: category.to_string(),
            minutes,
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::store::entities::ActivityPeriod;

    use super::*;

    const UNTRACKED: &str = "Free Time";

    fn period(y: i32, m: u32, d: u32, from: (u32, u32), to: (u32, u32), cat: &str) -> ActivityPeriod {
        let day = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        ActivityPeriod::new(
            cat,
            day.and_hms_opt(from.0, from.1, 0).unwrap(),
            day.and_hms_opt(to.0, to.1, 0).unwrap(),
            "",
        )
        .unwrap()
    }

    #[test]
    fn test_day_activities_filters_by_start_day() {
        let all = vec![
            period(2025, 3, 15, (9, 0), (10, 0), "Work"),
            period(2025, 3, 16, (9, 0), (10, 0), "Work"),
        ];
        let day = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let subset = day_activities(&all, day);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].day(), day);
    }

    #[test]
    fn test_day_total_excludes_untracked() {
        let all = vec![
            period(2025, 3, 15, (9, 0), (10, 0), "Work"),
            period(2025, 3, 15, (10, 0), (12, 0), UNTRACKED),
        ];
        let day = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(day_total_minutes(&all, day, UNTRACKED), 60);
    }

    #[test]
    fn test_weekly_totals_monday_bounded() {
        // 2025-03-17 is a Monday.
        let all = vec![
            period(2025, 3, 16, (9, 0), (10, 0), "Work"),  // Sunday before
            period(2025, 3, 17, (9, 0), (10, 30), "Work"), // Monday
            period(2025, 3, 23, (9, 0), (9, 45), "Rest"),  // Sunday of same week
            period(2025, 3, 24, (9, 0), (10, 0), "Work"),  // next Monday
        ];
        let wednesday = NaiveDate::from_ymd_opt(2025, 3, 19).unwrap();
        let totals = weekly_category_totals(&all, wednesday);
        assert_eq!(
            totals,
            vec![
                CategoryMinutes {
                    category: "Work".into(),
                    minutes: 90,
                },
                CategoryMinutes {
                    category: "Rest".into(),
                    minutes: 45,
                },
            ]
        );
    }

    #[test]
    fn test_weekly_totals_include_untracked() {
        let all = vec![
            period(2025, 3, 18, (9, 0), (10, 0), "Work"),
            period(2025, 3, 18, (12, 0), (13, 0), UNTRACKED),
        ];
        let totals = weekly_category_totals(&all, NaiveDate::from_ymd_opt(2025, 3, 18).unwrap());
        assert!(totals.iter().any(|c| c.category == UNTRACKED && c.minutes == 60));
    }

    #[test]
    fn test_summary_skips_today_entirely() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let all = vec![
            period(2025, 3, 15, (9, 0), (12, 0), "Work"),
            period(2025, 3, 15, (13, 0), (15, 0), "Rest"),
        ];
        let summary = summarize(&all, today, UNTRACKED);
        assert_eq!(summary.days_tracked, 0);
        assert_eq!(summary.total_hours, 0.0);
        assert_eq!(summary.avg_daily_hours, 0.0);
        assert_eq!(summary.top_category, "-");
    }

    #[test]
    fn test_summary_untracked_only_day_not_tracked() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        let all = vec![
            period(2025, 3, 14, (9, 0), (11, 0), UNTRACKED),
            period(2025, 3, 15, (9, 0), (11, 0), "Work"),
        ];
        let summary = summarize(&all, today, UNTRACKED);
        assert_eq!(summary.days_tracked, 1);
        assert_eq!(summary.total_hours, 2.0);
        assert_eq!(summary.top_category, "Work");
    }

    #[test]
    fn test_summary_figures_and_top_category_tie() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
        let all = vec![
            period(2025, 3, 14, (9, 0), (10, 0), "Alpha"),
            period(2025, 3, 15, (9, 0), (10, 0), "Beta"),
            period(2025, 3, 15, (10, 0), (11, 0), "Alpha"),
            period(2025, 3, 15, (11, 0), (12, 0), "Beta"),
        ];
        let summary = summarize(&all, today, UNTRACKED);
        assert_eq!(summary.days_tracked, 2);
        assert_eq!(summary.total_hours, 4.0);
        assert_eq!(summary.avg_daily_hours, 2.0);
        // Alpha and Beta both hold 120 minutes; first encountered wins.
        assert_eq!(summary.top_category, "Alpha");
    }
}
