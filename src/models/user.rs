use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use super::wire;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Teacher => "TEACHER",
            Role::Student => "STUDENT",
        }
    }

    /// Display form used in headers ("Teacher", "Student").
    pub fn label(self) -> &'static str {
        match self {
            Role::Teacher => "Teacher",
            Role::Student => "Student",
        }
    }

    pub fn is_teacher(self) -> bool {
        self == Role::Teacher
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {:?}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("teacher") {
            Ok(Role::Teacher)
        } else if trimmed.eq_ignore_ascii_case("student") {
            Ok(Role::Student)
        } else {
            Err(UnknownRole(s.to_string()))
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawUser")]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUser {
    #[serde(deserialize_with = "wire::id")]
    id: i64,
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: String,
    role: Role,
}

impl From<RawUser> for User {
    fn from(raw: RawUser) -> Self {
        User {
            id: raw.id,
            user_name: raw.user_name.or(raw.username).or(raw.name).unwrap_or_default(),
            email: raw.email,
            role: raw.role,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserRequest {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// What gets persisted after a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// `/login` answers either with `{ "user": {...}, "token": "..." }` or with
/// the user object itself (optionally carrying a token alongside).
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LoginResponse {
    Wrapped {
        user: User,
        #[serde(default)]
        token: Option<String>,
        #[serde(default, rename = "accessToken")]
        access_token: Option<String>,
    },
    Bare {
        #[serde(flatten)]
        user: User,
        #[serde(default)]
        token: Option<String>,
        #[serde(default, rename = "accessToken")]
        access_token: Option<String>,
    },
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        match resp {
            LoginResponse::Wrapped { user, token, access_token }
            | LoginResponse::Bare { user, token, access_token } => Session {
                user,
                token: token.or(access_token),
            },
        }
    }
}
