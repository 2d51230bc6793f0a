use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Module {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub course_id: String,
    pub faculty_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleRequest {
    pub title: String,
    pub description: Option<String>,
    pub course_id: String,
    pub faculty_id: String,
}

impl ModuleRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::validation("Module title is required"));
        }
        if self.course_id.is_empty() || self.faculty_id.is_empty() {
            return Err(AppError::validation("Module requires a course and a faculty member"));
        }
        Ok(())
    }
}
