use crate::models::RoleResponse;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated principal. Holds zero or more role references; the
/// access evaluator expands customer → roles → permissions → module on
/// every call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
    pub email: String,
    pub phone: Vec<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub company: Option<String>,
    pub profile_url: Option<String>,
    pub about: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Customer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        username: Option<String>,
        email: String,
        phone: Vec<String>,
        password_hash: String,
        company: Option<String>,
        profile_url: Option<String>,
        about: Option<String>,
    ) -> Self {
        let now = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap();

        Self {
            id: Uuid::new_v4().to_string(),
            name,
            username,
            email,
            phone,
            password_hash,
            company,
            profile_url,
            about,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

// DTOs for API
#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    pub name: String,
    pub username: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Vec<String>,
    pub password: String,
    pub company: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub profile_url: Option<String>,
    pub about: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Vec<String>>,
    pub password: Option<String>,
    pub company: Option<String>,
    pub roles: Option<Vec<String>>,
    pub profile_url: Option<String>,
    pub about: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
    pub email: String,
    pub phone: Vec<String>,
    pub company: Option<String>,
    pub profile_url: Option<String>,
    pub about: Option<String>,
    pub roles: Vec<RoleResponse>,
    pub created_at: String,
    pub updated_at: String,
}
