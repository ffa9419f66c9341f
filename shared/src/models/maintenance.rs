//! Stock maintenance scheduling models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Progress of a maintenance window
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "scheduled",
            MaintenanceStatus::InProgress => "in_progress",
            MaintenanceStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaintenanceStatus::Scheduled => write!(f, "Scheduled"),
            MaintenanceStatus::InProgress => write!(f, "In Progress"),
            MaintenanceStatus::Completed => write!(f, "Completed"),
        }
    }
}

impl FromStr for MaintenanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(MaintenanceStatus::Scheduled),
            "in_progress" => Ok(MaintenanceStatus::InProgress),
            "completed" => Ok(MaintenanceStatus::Completed),
            other => Err(format!("Unknown maintenance status: {}", other)),
        }
    }
}

/// A scheduled stock maintenance window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockMaintenanceRecord {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    pub status: MaintenanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for scheduling maintenance
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMaintenanceInput {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    pub status: MaintenanceStatus,
}

/// Partial update for a maintenance window
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMaintenanceInput {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub status: Option<MaintenanceStatus>,
}

impl UpdateMaintenanceInput {
    pub fn apply(self, existing: &StockMaintenanceRecord) -> CreateMaintenanceInput {
        CreateMaintenanceInput {
            start_date: self.start_date.unwrap_or(existing.start_date),
            end_date: self.end_date.unwrap_or(existing.end_date),
            description: self
                .description
                .or_else(|| existing.description.clone())
                .unwrap_or_default(),
            status: self.status.unwrap_or(existing.status),
        }
    }
}
