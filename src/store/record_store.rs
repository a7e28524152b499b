use std::{future::Future, io::ErrorKind, ops::Deref, path::PathBuf};

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{
    store::{
        csv::{parse_csv, serialize_row},
        entities::{ActivityPeriod, CategoryDef, DailyReflection, ValidationReport},
        error::StoreError,
        schema::{TableSchema, ACTIVITIES, CATEGORIES_FILE, IDEAS, TODOS},
    },
    utils::time::{day_key, format_local, parse_local},
};

/// Interface for abstracting storage of the three collections plus the
/// category palette. Views and tests consume the store through this trait.
pub trait RecordStore {
    /// Reads activity periods in file order, optionally narrowed to the
    /// periods starting on `day`.
    fn read_activities(
        &self,
        day: Option<NaiveDate>,
    ) -> impl Future<Output = Result<Vec<ActivityPeriod>, StoreError>>;

    fn read_ideas(
        &self,
        day: Option<NaiveDate>,
    ) -> impl Future<Output = Result<Vec<DailyReflection>, StoreError>>;

    fn read_todos(&self) -> impl Future<Output = Result<Vec<String>, StoreError>>;

    fn read_categories(&self) -> impl Future<Output = Result<Vec<CategoryDef>, StoreError>>;

    /// Inserts a period, refusing any overlap with the existing set. The
    /// collection is kept sorted ascending by start on disk, so this is a
    /// whole-file rewrite rather than a plain append.
    fn save_activity(
        &self,
        period: &ActivityPeriod,
    ) -> impl Future<Output = Result<(), StoreError>>;

    fn save_idea(
        &self,
        date: NaiveDate,
        idea: &str,
    ) -> impl Future<Output = Result<(), StoreError>>;

    /// Replaces the todo collection wholesale. The format has no row
    /// identity besides position, so deletion works by rewriting the rest.
    fn save_todos(&self, todos: &[String]) -> impl Future<Output = Result<(), StoreError>>;

    /// Checks every backing file and reports user-readable problems.
    fn validate_root(&self) -> impl Future<Output = Result<ValidationReport, StoreError>>;
}

impl<T: Deref> RecordStore for T
where
    T::Target: RecordStore,
{
    fn read_activities(
        &self,
        day: Option<NaiveDate>,
    ) -> impl Future<Output = Result<Vec<ActivityPeriod>, StoreError>> {
        self.deref().read_activities(day)
    }

    fn read_ideas(
        &self,
        day: Option<NaiveDate>,
    ) -> impl Future<Output = Result<Vec<DailyReflection>, StoreError>> {
        self.deref().read_ideas(day)
    }

    fn read_todos(&self) -> impl Future<Output = Result<Vec<String>, StoreError>> {
        self.deref().read_todos()
    }

    fn read_categories(&self) -> impl Future<Output = Result<Vec<CategoryDef>, StoreError>> {
        self.deref().read_categories()
    }

    fn save_activity(
        &self,
        period: &ActivityPeriod,
    ) -> impl Future<Output = Result<(), StoreError>> {
        self.deref().save_activity(period)
    }

    fn save_idea(
        &self,
        date: NaiveDate,
        idea: &str,
    ) -> impl Future<Output = Result<(), StoreError>> {
        self.deref().save_idea(date, idea)
    }

    fn save_todos(&self, todos: &[String]) -> impl Future<Output = Result<(), StoreError>> {
        self.deref().save_todos(todos)
    }

    fn validate_root(&self) -> impl Future<Output = Result<ValidationReport, StoreError>> {
        self.deref().validate_root()
    }
}

/// The main realization of [RecordStore] over a directory of flat files.
pub struct LocalStore {
    root: PathBuf,
}

/// One parsed table: the header as declared by the file, plus data rows.
/// Column order comes from the header, never from fixed positions.
struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl LocalStore {
    pub fn new(root: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Reads a whole backing file. An absent file is an empty collection,
    /// not an error.
    async fn read_file(&self, name: &str) -> Result<Option<String>, StoreError> {
        let path = self.root.join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{path:?} absent, treating as empty collection");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, name: &str, content: &str) -> Result<(), StoreError> {
        tokio::fs::write(self.root.join(name), content).await?;
        Ok(())
    }

    /// Parses and header-validates one collection. Empty or absent files
    /// yield the default header and no rows.
    async fn load_table(&self, schema: TableSchema) -> Result<Table, StoreError> {
        let Some(text) = self.read_file(schema.file_name).await? else {
            return Ok(Table {
                header: schema.default_header(),
                rows: vec![],
            });
        };
        let mut rows = parse_csv(&text);
        if rows.is_empty() {
            return Ok(Table {
                header: schema.default_header(),
                rows: vec![],
            });
        }
        let header = rows.remove(0);
        schema.validate(&header)?;
        Ok(Table { header, rows })
    }

    /// Renders a table back to text, one row per line, exactly one trailing
    /// newline.
    fn render_table(table: &Table) -> String {
        let mut out = serialize_row(&table.header);
        out.push('\n');
        for row in &table.rows {
            out.push_str(&serialize_row(row));
            out.push('\n');
        }
        out
    }

    fn row_to_period(header: &[String], row: &[String]) -> Option<ActivityPeriod> {
        let field = |name: &str| {
            TableSchema::column_index(header, name)
                .and_then(|i| row.get(i))
                .cloned()
                .unwrap_or_default()
        };
        let start_text = field("Start");
        let end_text = field("End");
        let (Some(start), Some(end)) = (parse_local(&start_text), parse_local(&end_text)) else {
            warn!("skipping activity row with unreadable times {start_text:?}..{end_text:?}");
            return None;
        };
        Some(ActivityPeriod {
            category: field("Category"),
            start,
            end,
            details: field("Details"),
        })
    }

    /// Builds a row following the column order the file dictates. Columns
    /// the store doesn't know about are written empty.
    fn period_to_row(header: &[String], period: &ActivityPeriod) -> Vec<String> {
        header
            .iter()
            .map(|column| match column.as_str() {
                "Start" => format_local(period.start),
                "End" => format_local(period.end),
                "Category" => period.category.clone(),
                "Details" => period.details.clone(),
                _ => String::new(),
            })
            .collect()
    }
}

impl RecordStore for LocalStore {
    async fn read_activities(
        &self,
        day: Option<NaiveDate>,
    ) -> Result<Vec<ActivityPeriod>, StoreError> {
        let table = self.load_table(ACTIVITIES).await?;
        let periods = table
            .rows
            .iter()
            .filter(|row| row.len() >= 3)
            .filter_map(|row| Self::row_to_period(&table.header, row))
            .filter(|p| day.map_or(true, |d| p.day() == d))
            .collect();
        Ok(periods)
    }

    async fn read_ideas(
        &self,
        day: Option<NaiveDate>,
    ) -> Result<Vec<DailyReflection>, StoreError> {
        let table = self.load_table(IDEAS).await?;
        let date_idx = TableSchema::column_index(&table.header, "Date")
            .expect("validated header carries Date");
        let idea_idx = TableSchema::column_index(&table.header, "Idea")
            .expect("validated header carries Idea");
        let wanted = day.map(day_key);
        let ideas = table
            .rows
            .iter()
            .filter(|row| row.len() > date_idx.max(idea_idx))
            .map(|row| DailyReflection {
                date: row[date_idx].clone(),
                idea: row[idea_idx].clone(),
            })
            .filter(|r| !r.idea.trim().is_empty())
            .filter(|r| wanted.as_deref().map_or(true, |d| r.date == d))
            .collect();
        Ok(ideas)
    }

    async fn read_todos(&self) -> Result<Vec<String>, StoreError> {
        let table = self.load_table(TODOS).await?;
        let text_idx = TableSchema::column_index(&table.header, "Text")
            .expect("validated header carries Text");
        let todos = table
            .rows
            .iter()
            .filter_map(|row| row.get(text_idx))
            .filter(|t| !t.trim().is_empty())
            .cloned()
            .collect();
        Ok(todos)
    }

    async fn read_categories(&self) -> Result<Vec<CategoryDef>, StoreError> {
        let Some(text) = self.read_file(CATEGORIES_FILE).await? else {
            return Ok(vec![]);
        };
        if text.trim().is_empty() {
            return Ok(vec![]);
        }
        serde_json::from_str(&text)
            .map_err(|e| StoreError::Palette(format!("Not valid JSON format: {e}")))
    }

    async fn save_activity(&self, period: &ActivityPeriod) -> Result<(), StoreError> {
        if period.end <= period.start {
            return Err(StoreError::InvalidPeriod);
        }
        let mut table = self.load_table(ACTIVITIES).await?;

        for row in &table.rows {
            if let Some(existing) = Self::row_to_period(&table.header, row) {
                if existing.overlaps(period) {
                    return Err(StoreError::Overlap);
                }
            }
        }

        table.rows.push(Self::period_to_row(&table.header, period));

        // On-disk order is time order, not append order. Rows the parser
        // can't read sort first and keep their relative order.
        let start_idx = TableSchema::column_index(&table.header, "Start")
            .expect("validated header carries Start");
        let mut keyed: Vec<(Option<chrono::NaiveDateTime>, Vec<String>)> = table
            .rows
            .drain(..)
            .map(|row| (row.get(start_idx).and_then(|s| parse_local(s)), row))
            .collect();
        keyed.sort_by(|a, b| a.0.cmp(&b.0));
        table.rows = keyed.into_iter().map(|(_, row)| row).collect();

        self.write_file(ACTIVITIES.file_name, &Self::render_table(&table))
            .await
    }

    async fn save_idea(&self, date: NaiveDate, idea: &str) -> Result<(), StoreError> {
        let table = self.load_table(IDEAS).await?;
        // Lossy comma escaping keeps reflection rows greppable plain text.
        let safe_idea = idea.replace(',', ";");
        let row: Vec<String> = table
            .header
            .iter()
            .map(|column| match column.as_str() {
                "Date" => day_key(date),
                "Idea" => safe_idea.clone(),
                _ => String::new(),
            })
            .collect();

        let mut content = match self.read_file(IDEAS.file_name).await? {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                let mut h = serialize_row(&table.header);
                h.push('\n');
                h
            }
        };
        if !content.ends_with('\n') {
            content.push('\n');
        }
        content.push_str(&row.join(","));
        content.push('\n');
        self.write_file(IDEAS.file_name, &content).await
    }

    async fn save_todos(&self, todos: &[String]) -> Result<(), StoreError> {
        let mut content = String::from("Text\n");
        for todo in todos {
            content.push_str(&todo.replace(',', ";"));
            content.push('\n');
        }
        self.write_file(TODOS.file_name, &content).await
    }

    async fn validate_root(&self) -> Result<ValidationReport, StoreError> {
        let mut report = ValidationReport::default();

        for schema in [ACTIVITIES, IDEAS, TODOS] {
            match self.load_table(schema).await {
                Ok(_) => {}
                Err(e @ StoreError::Schema { .. }) => report.errors.push(e.to_string()),
                Err(e) => {
                    warn!("couldn't check {}: {e}", schema.file_name);
                    report
                        .errors
                        .push(format!("Unable to access {}: {e}", schema.file_name));
                }
            }
        }

        match self.read_categories().await {
            Ok(categories) => {
                for (i, cat) in categories.iter().enumerate() {
                    if cat.name.trim().is_empty() || cat.color.trim().is_empty() {
                        report.errors.push(format!(
                            "categories.json format is incorrect. Category {} is missing name or color field",
                            i + 1
                        ));
                        break;
                    }
                }
            }
            Err(e) => report.errors.push(e.to_string()),
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::tempdir;

    use super::*;

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn period(day: u32, from: (u32, u32), to: (u32, u32), category: &str) -> ActivityPeriod {
        ActivityPeriod::new(category, at(day, from.0, from.1), at(day, to.0, to.1), "")
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_files_read_as_empty() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path().to_owned()).unwrap();

        assert!(store.read_activities(None).await.unwrap().is_empty());
        assert!(store.read_ideas(None).await.unwrap().is_empty());
        assert!(store.read_todos().await.unwrap().is_empty());
        assert!(store.read_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_first_activity_bootstraps_header() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path().to_owned()).unwrap();

        store
            .save_activity(&period(15, (9, 0), (10, 0), "Work"))
            .await
            .unwrap();

        let text = std::fs::read_to_string(dir.path().join("activities.csv")).unwrap();
        assert!(text.starts_with("Start,End,Category,Details\n"));
        assert!(text.ends_with('\n'));
        assert!(!text.ends_with("\n\n"));

        let read = store.read_activities(None).await.unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].category, "Work");
    }

    #[tokio::test]
    async fn test_sorted_insertion_orders_by_start() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path().to_owned()).unwrap();

        for p in [
            period(15, (9, 0), (9, 30), "B"),
            period(15, (8, 0), (8, 30), "A"),
            period(15, (10, 0), (10, 30), "C"),
        ] {
            store.save_activity(&p).await.unwrap();
        }

        let read = store.read_activities(None).await.unwrap();
        let starts: Vec<_> = read.iter().map(|p| p.start).collect();
        assert_eq!(starts, vec![at(15, 8, 0), at(15, 9, 0), at(15, 10, 0)]);
    }

    #[tokio::test]
    async fn test_overlap_refused_touching_allowed() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path().to_owned()).unwrap();

        store
            .save_activity(&period(15, (10, 0), (11, 0), "A"))
            .await
            .unwrap();
        store
            .save_activity(&period(15, (11, 0), (12, 0), "B"))
            .await
            .unwrap();

        let err = store
            .save_activity(&period(15, (10, 30), (10, 45), "C"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Overlap));

        // Refused insert wrote nothing.
        assert_eq!(store.read_activities(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_day_filter() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path().to_owned()).unwrap();

        store
            .save_activity(&period(15, (9, 0), (10, 0), "A"))
            .await
            .unwrap();
        store
            .save_activity(&period(16, (9, 0), (10, 0), "B"))
            .await
            .unwrap();

        let day = NaiveDate::from_ymd_opt(2025, 3, 16).unwrap();
        let read = store.read_activities(Some(day)).await.unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].category, "B");
    }

    #[tokio::test]
    async fn test_reordered_header_respected_on_write() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("activities.csv"),
            "Category,Start,End,Details\nOld,2025/03/15 08:00,2025/03/15 09:00,x\n",
        )
        .unwrap();
        let store = LocalStore::new(dir.path().to_owned()).unwrap();

        store
            .save_activity(&period(15, (9, 0), (10, 0), "New"))
            .await
            .unwrap();

        let text = std::fs::read_to_string(dir.path().join("activities.csv")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Category,Start,End,Details");
        assert_eq!(lines[2], "New,2025/03/15 09:00,2025/03/15 10:00,");
    }

    #[tokio::test]
    async fn test_schema_error_names_missing_columns() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("activities.csv"),
            "Start,End,Details\n2025/03/15 08:00,2025/03/15 09:00,x\n",
        )
        .unwrap();
        let store = LocalStore::new(dir.path().to_owned()).unwrap();

        let err = store.read_activities(None).await.unwrap_err();
        match err {
            StoreError::Schema { missing, .. } => {
                assert_eq!(missing, vec!["Category".to_string()])
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_comma_details_survive_round_trip() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path().to_owned()).unwrap();

        let p = ActivityPeriod::new(
            "Work",
            at(15, 9, 0),
            at(15, 10, 0),
            "emails, standup, \"review\"",
        )
        .unwrap();
        store.save_activity(&p).await.unwrap();

        let read = store.read_activities(None).await.unwrap();
        assert_eq!(read[0].details, "emails, standup, \"review\"");
    }

    #[tokio::test]
    async fn test_idea_append_and_filter() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path().to_owned()).unwrap();

        let day_a = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let day_b = NaiveDate::from_ymd_opt(2025, 3, 16).unwrap();
        store.save_idea(day_a, "slow morning, good focus").await.unwrap();
        store.save_idea(day_b, "shipped it").await.unwrap();
        store.save_idea(day_b, "second thought").await.unwrap();

        let all = store.read_ideas(None).await.unwrap();
        assert_eq!(all.len(), 3);
        // Lossy comma escaping.
        assert_eq!(all[0].idea, "slow morning; good focus");

        let only_b = store.read_ideas(Some(day_b)).await.unwrap();
        assert_eq!(only_b.len(), 2);
        assert!(only_b.iter().all(|r| r.date == "2025-03-16"));
    }

    #[tokio::test]
    async fn test_todo_rewrite_removes_by_index() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path().to_owned()).unwrap();

        let todos = vec!["first".to_string(), "second".to_string(), "third".to_string()];
        store.save_todos(&todos).await.unwrap();

        let mut current = store.read_todos().await.unwrap();
        assert_eq!(current, todos);

        current.remove(1);
        store.save_todos(&current).await.unwrap();

        assert_eq!(
            store.read_todos().await.unwrap(),
            vec!["first".to_string(), "third".to_string()]
        );
    }

    #[tokio::test]
    async fn test_categories_parse_and_palette_error() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("categories.json"),
            r##"[{"name": "Work", "color": "#4a90d9"}, {"name": "Free Time", "color": "#ccc"}]"##,
        )
        .unwrap();
        let store = LocalStore::new(dir.path().to_owned()).unwrap();

        let categories = store.read_categories().await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].name, "Work");

        std::fs::write(dir.path().join("categories.json"), "{not json").unwrap();
        assert!(matches!(
            store.read_categories().await.unwrap_err(),
            StoreError::Palette(_)
        ));
    }

    #[tokio::test]
    async fn test_validate_root_reports_all_problems() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("activities.csv"), "Start,End,Details\n").unwrap();
        std::fs::write(dir.path().join("daily_ideas.csv"), "When,What\n").unwrap();
        std::fs::write(dir.path().join("categories.json"), "[oops").unwrap();
        let store = LocalStore::new(dir.path().to_owned()).unwrap();

        let report = store.validate_root().await.unwrap();
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 3);
        assert!(report.errors[0].contains("Category"));
        assert!(report.errors[1].contains("Date"));
        assert!(report.errors[2].contains("categories.json"));
    }

    #[tokio::test]
    async fn test_validate_root_clean_dir_is_valid() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path().to_owned()).unwrap();
        let report = store.validate_root().await.unwrap();
        assert!(report.is_valid());
    }

    #[tokio::test]
    async fn test_unreadable_row_skipped_not_fatal() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("activities.csv"),
            "Start,End,Category,Details\n\
             garbage,also garbage,X,\n\
             2025/03/15 09:00,2025/03/15 10:00,Work,\n",
        )
        .unwrap();
        let store = LocalStore::new(dir.path().to_owned()).unwrap();

        let read = store.read_activities(None).await.unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read[0].category, "Work");
    }
}
