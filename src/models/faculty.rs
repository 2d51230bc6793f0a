use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;
use crate::scheduling::Resource;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Faculty {
    pub id: String,
    pub name: String,
    pub email: String,
    pub department: String,
    pub designation: String,
    pub is_available: bool,
}

impl Resource for Faculty {
    fn resource_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacultyRequest {
    pub name: String,
    pub email: String,
    pub department: String,
    pub designation: String,
    pub is_available: Option<bool>,
}

impl FacultyRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let fields = [&self.name, &self.email, &self.department, &self.designation];
        if fields.iter().any(|field| field.trim().is_empty()) {
            return Err(AppError::validation("All fields are required"));
        }
        if !self.email.contains('@') {
            return Err(AppError::validation(format!("Invalid email '{}'", self.email)));
        }
        Ok(())
    }
}
