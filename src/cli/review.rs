use anyhow::Result;
use chrono::{NaiveDate, Weekday};

use crate::{
    cli::{
        output::{
            analysis::{summarize, weekly_category_totals},
            format_minutes, paint_category,
        },
        read_or_empty,
    },
    store::record_store::RecordStore,
    utils::time::day_key,
};

/// Per-category totals for the Monday-based week containing `reference_day`.
pub async fn show_week(store: &impl RecordStore, reference_day: NaiveDate) -> Result<()> {
    let periods = read_or_empty(store.read_activities(None).await)?;
    let palette = read_or_empty(store.read_categories().await)?;

    let week = reference_day.week(Weekday::Mon);
    println!(
        "Week {} .. {}",
        day_key(week.first_day()),
        day_key(week.last_day())
    );

    let totals = weekly_category_totals(&periods, reference_day);
    if totals.is_empty() {
        println!("  no data this week");
        return Ok(());
    }
    for entry in &totals {
        println!(
            "  {}  {}",
            format_minutes(entry.minutes),
            paint_category(&entry.category, &palette)
        );
    }
    Ok(())
}

/// The long-term figures: everything on record except today and the
/// untracked category.
pub async fn show_summary(
    store: &impl RecordStore,
    today: NaiveDate,
    untracked: &str,
) -> Result<()> {
    let periods = read_or_empty(store.read_activities(None).await)?;
    let summary = summarize(&periods, today, untracked);

    println!("Total time     {:.1} hours", summary.total_hours);
    println!("Days tracked   {}", summary.days_tracked);
    println!("Average daily  {:.1} hours", summary.avg_daily_hours);
    println!("Top category   {}", summary.top_category);
    Ok(())
}
