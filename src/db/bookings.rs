//! Uniform storage contract shared by the three booking kinds.

use async_trait::async_trait;

use crate::error::AppError;
use crate::scheduling::{Booked, Candidate, ResourceClaim};

#[async_trait]
pub trait BookingRepository: Send + Sync {
    type Booking: Booked + Send + Sync;
    type Draft: Candidate + Send + Sync;

    /// Human name used in not-found messages.
    const KIND: &'static str;

    async fn list(&self) -> Result<Vec<Self::Booking>, AppError>;

    async fn find(&self, id: &str) -> Result<Option<Self::Booking>, AppError>;

    /// Every booking currently holding `claim`, in insertion order, minus `exclude`.
    async fn list_by_resource(
        &self,
        claim: &ResourceClaim,
        exclude: Option<&str>,
    ) -> Result<Vec<Self::Booking>, AppError>;

    async fn insert(&self, draft: Self::Draft) -> Result<Self::Booking, AppError>;

    async fn update(&self, id: &str, draft: Self::Draft) -> Result<Option<Self::Booking>, AppError>;

    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    async fn exists(&self, id: &str) -> Result<bool, AppError>;

    /// Fails with a validation error when the draft points at a missing resource.
    async fn check_references(&self, draft: &Self::Draft) -> Result<(), AppError>;
}
