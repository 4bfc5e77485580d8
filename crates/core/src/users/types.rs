use serde::{Deserialize, Serialize};

/// Privilege level of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserLevel {
    #[default]
    Regular,
    Trusted,
    Moderator,
    Superadmin,
}

impl UserLevel {
    pub fn as_i64(self) -> i64 {
        match self {
            UserLevel::Regular => 0,
            UserLevel::Trusted => 1,
            UserLevel::Moderator => 2,
            UserLevel::Superadmin => 3,
        }
    }

    /// Unknown stored levels are treated as regular users.
    pub fn from_i64(value: i64) -> Self {
        match value {
            1 => UserLevel::Trusted,
            2 => UserLevel::Moderator,
            3 => UserLevel::Superadmin,
            _ => UserLevel::Regular,
        }
    }
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub level: UserLevel,
}

impl User {
    pub fn is_moderator(&self) -> bool {
        self.level >= UserLevel::Moderator
    }

    pub fn is_superadmin(&self) -> bool {
        self.level == UserLevel::Superadmin
    }
}
