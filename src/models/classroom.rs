use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

use crate::error::AppError;
use crate::scheduling::Resource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum ClassroomType {
    Lab,
    #[serde(rename = "Lecture Hall")]
    #[sqlx(rename = "Lecture Hall")]
    LectureHall,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassroomTool {
    #[serde(rename = "Smart Board")]
    SmartBoard,
    #[serde(rename = "Document Camera")]
    DocumentCamera,
    #[serde(rename = "Sound System")]
    SoundSystem,
    Whiteboard,
    Blackboard,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Classroom {
    pub id: String,
    pub room_number: String,
    pub capacity: i64,
    pub classroom_type: ClassroomType,
    pub has_projector: bool,
    pub additional_tools: Json<Vec<ClassroomTool>>,
}

impl Resource for Classroom {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassroomRequest {
    pub room_number: String,
    pub capacity: i64,
    pub classroom_type: ClassroomType,
    pub has_projector: bool,
    #[serde(default)]
    pub additional_tools: Vec<ClassroomTool>,
}

impl ClassroomRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.room_number.trim().is_empty() {
            return Err(AppError::validation("Room number is required"));
        }
        if self.capacity < 1 {
            return Err(AppError::validation("Capacity must be at least 1"));
        }
        Ok(())
    }
}
