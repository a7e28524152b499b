use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    cli::{
        output::{format_minutes, paint_category},
        read_or_empty,
    },
    store::{
        entities::ActivityPeriod,
        record_store::RecordStore,
    },
    utils::time::day_key,
};

use super::output::analysis::day_total_minutes;

/// Prints one day's periods in time order with the day total (untracked
/// category excluded) and any reflections written that day.
pub async fn show_day(store: &impl RecordStore, day: NaiveDate, untracked: &str) -> Result<()> {
    let periods = read_or_empty(store.read_activities(Some(day)).await)?;
    let palette = read_or_empty(store.read_categories().await)?;

    println!("{}", day_key(day));
    if periods.is_empty() {
        println!("  no activity recorded");
    }
    for period in &periods {
        let details = if period.details.is_empty() {
            String::new()
        } else {
            format!("  {}", period.details)
        };
        println!(
            "  {}-{}  {}  {}{}",
            period.start.format("%H:%M"),
            period.end.format("%H:%M"),
            format_minutes(period.duration_minutes()),
            paint_category(&period.category, &palette),
            details
        );
    }

    let total = day_total_minutes(&periods, day, untracked);
    println!("  total: {}", format_minutes(total));

    let ideas = read_or_empty(store.read_ideas(Some(day)).await)?;
    if !ideas.is_empty() {
        println!();
        for idea in &ideas {
            println!("  » {}", idea.idea);
        }
    }
    Ok(())
}

/// Records a period. The store refuses overlaps and keeps the file ordered
/// by start time.
pub async fn add_period(
    store: &impl RecordStore,
    category: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    details: String,
) -> Result<()> {
    let period = ActivityPeriod::new(category, start, end, details)?;
    store.save_activity(&period).await?;
    println!(
        "Saved {} ({})",
        period.category,
        format_minutes(period.duration_minutes())
    );
    Ok(())
}
