use async_trait::async_trait;
use chrono::{Utc, Weekday};
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::db::{BookingRepository, Table, ensure_references};
use crate::error::AppError;
use crate::models::timetable::{TimetableEntryRow, TimetableRow};
use crate::models::{Timetable, TimetableEntry, TimetableEntryDraft};
use crate::scheduling::interval::{format_hhmm, weekday_name};
use crate::scheduling::{ResourceClaim, ResourceKind};

const ENTRY_COLUMNS: &str =
    "id, timetable_id, module_id, classroom_id, faculty_id, day_of_week, start_time, end_time";

const DUPLICATE: &str = "A timetable with this title already exists";

fn into_entries(rows: Vec<TimetableEntryRow>) -> Result<Vec<TimetableEntry>, AppError> {
    rows.into_iter()
        .map(|row| TimetableEntry::try_from(row).map_err(AppError::from))
        .collect()
}

pub async fn fetch_titles(db: &SqlitePool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT title FROM timetables ORDER BY created_at, rowid")
        .fetch_all(db)
        .await
}

pub async fn title_exists(db: &SqlitePool, title: &str) -> Result<bool, sqlx::Error> {
    let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM timetables WHERE title = ?1")
        .bind(title)
        .fetch_one(db)
        .await?;
    Ok(found > 0)
}

async fn fetch_entries_of(db: &SqlitePool, timetable_id: &str) -> Result<Vec<TimetableEntry>, AppError> {
    let rows = sqlx::query_as::<_, TimetableEntryRow>(
        r#"
        SELECT e.id, e.timetable_id, e.module_id, e.classroom_id, e.faculty_id,
               e.day_of_week, e.start_time, e.end_time,
               m.title AS module_title, c.room_number AS room_number, f.name AS faculty_name
        FROM timetable_entries e
        LEFT JOIN modules m ON m.id = e.module_id
        LEFT JOIN classrooms c ON c.id = e.classroom_id
        LEFT JOIN faculty f ON f.id = e.faculty_id
        WHERE e.timetable_id = ?1
        ORDER BY e.position
        "#,
    )
    .bind(timetable_id)
    .fetch_all(db)
    .await?;
    into_entries(rows)
}

pub async fn fetch_timetables(db: &SqlitePool) -> Result<Vec<Timetable>, AppError> {
    let rows = sqlx::query_as::<_, TimetableRow>(
        "SELECT id, title, created_at, updated_at FROM timetables ORDER BY created_at, rowid"
    )
    .fetch_all(db)
    .await?;

    let mut timetables = Vec::with_capacity(rows.len());
    for row in rows {
        let entries = fetch_entries_of(db, &row.id).await?;
        timetables.push(row.with_entries(entries));
    }
    Ok(timetables)
}

pub async fn find_timetable_by_title(db: &SqlitePool, title: &str) -> Result<Option<Timetable>, AppError> {
    let row = sqlx::query_as::<_, TimetableRow>(
        "SELECT id, title, created_at, updated_at FROM timetables WHERE title = ?1"
    )
    .bind(title)
    .fetch_optional(db)
    .await?;

    match row {
        Some(row) => {
            let entries = fetch_entries_of(db, &row.id).await?;
            Ok(Some(row.with_entries(entries)))
        }
        None => Ok(None),
    }
}

/// Persists the timetable and all of its entries in one transaction.
pub async fn insert_timetable(
    db: &SqlitePool,
    id: &str,
    title: &str,
    entries: Vec<TimetableEntry>,
) -> Result<Timetable, AppError> {
    let now = Utc::now();
    let mut tx = db.begin().await?;

    sqlx::query("INSERT INTO timetables (id, title, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)")
        .bind(id)
        .bind(title)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::unique(e, DUPLICATE))?;

    for (position, entry) in entries.iter().enumerate() {
        insert_entry(&mut tx, entry, position as i64).await?;
    }

    tx.commit().await?;

    Ok(Timetable {
        id: id.to_string(),
        title: title.to_string(),
        entries,
        created_at: now,
        updated_at: now,
    })
}

async fn insert_entry(
    tx: &mut Transaction<'_, Sqlite>,
    entry: &TimetableEntry,
    position: i64,
) -> Result<(), sqlx::Error> {
    let interval = entry.time_slot.interval();
    sqlx::query(
        r#"
        INSERT INTO timetable_entries
            (id, timetable_id, position, module_id, classroom_id, faculty_id,
            day_of_week, start_time, end_time)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&entry.id)
    .bind(&entry.timetable_id)
    .bind(position)
    .bind(&entry.module_id)
    .bind(&entry.classroom_id)
    .bind(&entry.faculty_id)
    .bind(weekday_name(entry.time_slot.weekday()))
    .bind(format_hhmm(interval.start()))
    .bind(format_hhmm(interval.end()))
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn touch(db: &SqlitePool, timetable_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE timetables SET updated_at = ?1 WHERE id = ?2")
        .bind(Utc::now())
        .bind(timetable_id)
        .execute(db)
        .await?;
    Ok(())
}

/// Timetable entries viewed as bookings. Resource scans span every timetable.
#[derive(Clone)]
pub struct TimetableEntryRepository {
    db: SqlitePool,
}

impl TimetableEntryRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn list_on_weekday(&self, day: Weekday) -> Result<Vec<TimetableEntry>, AppError> {
        let rows = sqlx::query_as::<_, TimetableEntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM timetable_entries WHERE day_of_week = ?1 ORDER BY rowid"
        ))
        .bind(weekday_name(day))
        .fetch_all(&self.db)
        .await?;
        into_entries(rows)
    }
}

#[async_trait]
impl BookingRepository for TimetableEntryRepository {
    type Booking = TimetableEntry;
    type Draft = TimetableEntryDraft;
    const KIND: &'static str = "Timetable entry";

    async fn list(&self) -> Result<Vec<TimetableEntry>, AppError> {
        let rows = sqlx::query_as::<_, TimetableEntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM timetable_entries ORDER BY rowid"
        ))
        .fetch_all(&self.db)
        .await?;
        into_entries(rows)
    }

    async fn find(&self, id: &str) -> Result<Option<TimetableEntry>, AppError> {
        let row = sqlx::query_as::<_, TimetableEntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM timetable_entries WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        row.map(|r| TimetableEntry::try_from(r).map_err(AppError::from)).transpose()
    }

    async fn list_by_resource(
        &self,
        claim: &ResourceClaim,
        exclude: Option<&str>,
    ) -> Result<Vec<TimetableEntry>, AppError> {
        if claim.kind != ResourceKind::Classroom {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, TimetableEntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM timetable_entries WHERE classroom_id = ?1 AND (?2 IS NULL OR id != ?2) ORDER BY rowid"
        ))
        .bind(&claim.id)
        .bind(exclude)
        .fetch_all(&self.db)
        .await?;
        into_entries(rows)
    }

    async fn insert(&self, draft: TimetableEntryDraft) -> Result<TimetableEntry, AppError> {
        let entry = TimetableEntry::from_draft(Uuid::new_v4().to_string(), draft);

        let mut tx = self.db.begin().await?;
        let position: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM timetable_entries WHERE timetable_id = ?1",
        )
        .bind(&entry.timetable_id)
        .fetch_one(&mut *tx)
        .await?;
        insert_entry(&mut tx, &entry, position).await?;
        tx.commit().await?;

        touch(&self.db, &entry.timetable_id).await?;
        Ok(entry)
    }

    /// Only rewrites the entry when it belongs to the draft's timetable.
    async fn update(
        &self,
        id: &str,
        draft: TimetableEntryDraft,
    ) -> Result<Option<TimetableEntry>, AppError> {
        let interval = *draft.time_slot.interval();
        let updated = sqlx::query(
            r#"
            UPDATE timetable_entries
            SET module_id = ?1,
                classroom_id = ?2,
                faculty_id = ?3,
                day_of_week = ?4,
                start_time = ?5,
                end_time = ?6
            WHERE id = ?7 AND timetable_id = ?8
            "#,
        )
        .bind(&draft.module_id)
        .bind(&draft.classroom_id)
        .bind(&draft.faculty_id)
        .bind(weekday_name(draft.time_slot.weekday()))
        .bind(format_hhmm(interval.start()))
        .bind(format_hhmm(interval.end()))
        .bind(id)
        .bind(&draft.timetable_id)
        .execute(&self.db)
        .await?
        .rows_affected();

        if updated == 0 {
            return Ok(None);
        }

        touch(&self.db, &draft.timetable_id).await?;
        Ok(Some(TimetableEntry::from_draft(id.to_string(), draft)))
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let timetable_id: Option<String> =
            sqlx::query_scalar("DELETE FROM timetable_entries WHERE id = ?1 RETURNING timetable_id")
                .bind(id)
                .fetch_optional(&self.db)
                .await?;

        match timetable_id {
            Some(timetable_id) => {
                touch(&self.db, &timetable_id).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn exists(&self, id: &str) -> Result<bool, AppError> {
        let found: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM timetable_entries WHERE id = ?1")
            .bind(id)
            .fetch_one(&self.db)
            .await?;
        Ok(found > 0)
    }

    async fn check_references(&self, draft: &TimetableEntryDraft) -> Result<(), AppError> {
        ensure_references(
            &self.db,
            &[
                (Table::Modules, draft.module_id.as_str()),
                (Table::Classrooms, draft.classroom_id.as_str()),
                (Table::Faculty, draft.faculty_id.as_str()),
            ],
        )
        .await
    }
}
