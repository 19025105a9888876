// src/standups/types.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::users::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standup {
    pub id: String,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    pub team_id: String,
    pub date: NaiveDate,
    pub yesterday: String,
    pub today: String,
    pub blockers: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitStandupRequest {
    pub team_id: String,
    pub date: NaiveDate,
    pub yesterday: String,
    pub today: String,
    pub blockers: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StandupsQuery {
    pub team_id: String,
    pub date: Option<NaiveDate>,
}
