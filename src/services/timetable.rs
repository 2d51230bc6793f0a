use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::db::{BookingRepository, TimetableEntryRepository, timetables};
use crate::error::AppError;
use crate::models::{
    MIN_TIMETABLE_ENTRIES, NewTimetableRequest, Timetable, TimetableEntry, TimetableEntryDraft,
    TimetableEntryRequest,
};
use crate::scheduling::{Candidate, Conflict, ResourceClaim, ResourceLocks, find_conflict};
use crate::services::BookingService;

/// Named timetables and their entries. Entry conflicts are checked against
/// every timetable, not only the one being edited.
pub struct TimetableService {
    db: SqlitePool,
    entries: BookingService<TimetableEntryRepository>,
    locks: Arc<ResourceLocks>,
}

impl TimetableService {
    pub fn new(db: SqlitePool, locks: Arc<ResourceLocks>) -> Self {
        let entries = BookingService::new(TimetableEntryRepository::new(db.clone()), locks.clone());
        Self { db, entries, locks }
    }

    pub async fn list(&self) -> Result<Vec<Timetable>, AppError> {
        timetables::fetch_timetables(&self.db).await
    }

    pub async fn titles(&self) -> Result<Vec<String>, AppError> {
        Ok(timetables::fetch_titles(&self.db).await?)
    }

    pub async fn get(&self, title: &str) -> Result<Timetable, AppError> {
        timetables::find_timetable_by_title(&self.db, title)
            .await?
            .ok_or_else(|| AppError::not_found("Timetable"))
    }

    /// Creates the timetable with all of its entries, or nothing at all.
    pub async fn create_timetable(&self, req: NewTimetableRequest) -> Result<Timetable, AppError> {
        let title = req.title.trim().to_string();
        if title.is_empty() || req.entries.len() < MIN_TIMETABLE_ENTRIES {
            return Err(AppError::validation(format!(
                "Title and at least {MIN_TIMETABLE_ENTRIES} entries are required."
            )));
        }
        if timetables::title_exists(&self.db, &title).await? {
            return Err(AppError::Uniqueness(
                "A timetable with this title already exists.".to_string(),
            ));
        }

        let timetable_id = Uuid::new_v4().to_string();
        let mut drafts = Vec::with_capacity(req.entries.len());
        for (index, entry) in req.entries.into_iter().enumerate() {
            let draft = TimetableEntryDraft::new(&timetable_id, entry).map_err(|e| match e {
                AppError::Validation(msg) => AppError::Validation(format!("entry {}: {}", index + 1, msg)),
                other => other,
            })?;
            self.entries.repository().check_references(&draft).await?;
            drafts.push(draft);
        }

        let claims: Vec<ResourceClaim> = drafts.iter().flat_map(|d| d.claims()).collect();
        let _guard = self.locks.acquire(&claims).await;

        let repo = self.entries.repository();
        let mut accepted: Vec<TimetableEntry> = Vec::with_capacity(drafts.len());
        for draft in drafts {
            for claim in draft.claims() {
                let existing = repo.list_by_resource(&claim, None).await?;
                let blocking = find_conflict(draft.interval(), &existing, None).map(|b| Conflict::new(&claim, b));

                // entries earlier in the same request count as booked too
                let pending: Vec<TimetableEntry> = accepted
                    .iter()
                    .filter(|e| e.classroom_id == claim.id)
                    .cloned()
                    .collect();
                let blocking = blocking.or_else(|| {
                    find_conflict(draft.interval(), &pending, None).map(|b| Conflict::new(&claim, b))
                });

                if let Some(conflict) = blocking {
                    info!("timetable '{}' rejected: {}", title, conflict);
                    return Err(AppError::Conflict(conflict));
                }
            }
            accepted.push(TimetableEntry::from_draft(Uuid::new_v4().to_string(), draft));
        }

        let timetable = timetables::insert_timetable(&self.db, &timetable_id, &title, accepted).await?;
        info!("timetable '{}' created with {} entries", timetable.title, timetable.entries.len());
        self.get(&timetable.title).await
    }

    pub async fn add_entry(&self, title: &str, req: TimetableEntryRequest) -> Result<Timetable, AppError> {
        let timetable = self.get(title).await?;
        let draft = TimetableEntryDraft::new(&timetable.id, req)?;
        self.entries.create(draft).await?;
        self.get(title).await
    }

    pub async fn update_entry(
        &self,
        title: &str,
        entry_id: &str,
        req: TimetableEntryRequest,
    ) -> Result<Timetable, AppError> {
        let timetable = self.get(title).await?;
        let draft = TimetableEntryDraft::new(&timetable.id, req)?;
        self.entries.update(entry_id, draft).await?;
        self.get(title).await
    }

    pub async fn delete_entry(&self, title: &str, entry_id: &str) -> Result<Timetable, AppError> {
        let timetable = self.get(title).await?;
        if !timetable.entries.iter().any(|e| e.id == entry_id) {
            return Err(AppError::not_found("Timetable entry"));
        }
        self.entries.delete(entry_id).await?;
        self.get(title).await
    }
}
