use sqlx::SqlitePool;
use tracing::debug;

use crate::db::{classrooms, faculty, modules};
use crate::error::AppError;
use crate::models::{Allocation, AllocationRequest};

/// Proposes a room and a lecturer for each module. Nothing is written.
///
/// Rooms are taken first-fit by room number; lecturers rotate round-robin in
/// the order given. This is a proposal only, not an optimiser.
pub async fn propose_allocations(
    db: &SqlitePool,
    req: AllocationRequest,
) -> Result<Vec<Allocation>, AppError> {
    if req.faculty_ids.is_empty() {
        return Err(AppError::validation("At least one faculty member is required"));
    }

    let mut staff = Vec::with_capacity(req.faculty_ids.len());
    for id in &req.faculty_ids {
        match faculty::find_faculty_by_id(db, id).await? {
            Some(f) => staff.push(f),
            None => return Err(AppError::validation("Some faculties not found")),
        }
    }

    let rooms = classrooms::fetch_classrooms(db).await?;

    let mut plan = Vec::with_capacity(req.modules.len());
    for demand in req.modules {
        let module = modules::find_module_by_id(db, &demand.module_id)
            .await?
            .ok_or_else(|| AppError::validation(format!("Module {} not found", demand.module_id)))?;

        let room = rooms
            .iter()
            .find(|room| room.capacity >= demand.student_count)
            .ok_or_else(|| {
                AppError::validation(format!(
                    "No classroom found for {} with sufficient capacity",
                    module.title
                ))
            })?;

        let lecturer = &staff[plan.len() % staff.len()];
        debug!("{} -> {} / {}", module.title, room.room_number, lecturer.name);

        plan.push(Allocation {
            module_id: module.id,
            module_name: module.title,
            faculty_id: lecturer.id.clone(),
            faculty_name: lecturer.name.clone(),
            classroom_id: room.id.clone(),
            room_number: room.room_number.clone(),
            capacity: room.capacity,
        });
    }

    Ok(plan)
}
