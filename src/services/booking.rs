use std::sync::Arc;

use tracing::{debug, info};

use crate::db::BookingRepository;
use crate::error::AppError;
use crate::scheduling::{Booked, Candidate, Conflict, ResourceClaim, ResourceLocks, find_conflict};

/// Validate → lock → scan → persist, for one booking kind.
///
/// Stateless across calls; every mutation takes the locks of the resources it
/// claims so two requests for the same room cannot both pass the scan.
pub struct BookingService<R> {
    repo: R,
    locks: Arc<ResourceLocks>,
}

impl<R: BookingRepository> BookingService<R> {
    pub fn new(repo: R, locks: Arc<ResourceLocks>) -> Self {
        Self { repo, locks }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub async fn list(&self) -> Result<Vec<R::Booking>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: &str) -> Result<R::Booking, AppError> {
        self.repo
            .find(id)
            .await?
            .ok_or_else(|| AppError::not_found(R::KIND))
    }

    pub async fn create(&self, draft: R::Draft) -> Result<R::Booking, AppError> {
        self.repo.check_references(&draft).await?;

        let claims = draft.claims();
        let _guard = self.locks.acquire(&claims).await;

        self.ensure_free(&draft, &claims, None).await?;
        let booking = self.repo.insert(draft).await?;

        info!("booking {} created for {}", booking.booking_id(), booking.interval());
        Ok(booking)
    }

    pub async fn update(&self, id: &str, draft: R::Draft) -> Result<R::Booking, AppError> {
        self.repo.check_references(&draft).await?;

        let claims = draft.claims();
        let _guard = self.locks.acquire(&claims).await;

        self.ensure_free(&draft, &claims, Some(id)).await?;
        if !self.repo.exists(id).await? {
            return Err(AppError::not_found(R::KIND));
        }
        let booking = self
            .repo
            .update(id, draft)
            .await?
            .ok_or_else(|| AppError::not_found(R::KIND))?;

        info!("booking {} moved to {}", booking.booking_id(), booking.interval());
        Ok(booking)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        if self.repo.delete(id).await? {
            info!("booking {} deleted", id);
            Ok(())
        } else {
            Err(AppError::not_found(R::KIND))
        }
    }

    /// Runs the conflict scan once per claimed resource; the first hit is reported.
    async fn ensure_free(
        &self,
        draft: &R::Draft,
        claims: &[ResourceClaim],
        exclude: Option<&str>,
    ) -> Result<(), AppError> {
        for claim in claims {
            let existing = self.repo.list_by_resource(claim, exclude).await?;
            debug!("{} {}: {} existing bookings", claim.kind, claim.id, existing.len());

            if let Some(blocking) = find_conflict(draft.interval(), &existing, exclude) {
                let conflict = Conflict::new(claim, blocking);
                info!("rejected {}: {}", draft.interval(), conflict);
                return Err(AppError::Conflict(conflict));
            }
        }
        Ok(())
    }
}
