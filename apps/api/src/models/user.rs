use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Self-declared at registration; gates which routes a user may reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Jobseeker,
    Employer,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Jobseeker, Role::Employer, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Jobseeker => "jobseeker",
            Role::Employer => "employer",
            Role::Admin => "admin",
        }
    }

    pub fn parse(raw: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.as_str() == raw)
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2id PHC string. Never leaves the process.
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub active: bool,
}

impl User {
    pub fn is(&self, role: Role) -> bool {
        self.role == role
    }
}
