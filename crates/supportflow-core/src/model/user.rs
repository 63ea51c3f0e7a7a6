use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The two access roles. Admins can additionally delete tickets, mutate the
/// knowledge base, and change user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Agent,
}

impl Role {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Agent => "AGENT",
        }
    }

    /// Returns `true` for the admin role.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an enum value from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    pub expected: &'static str,
    pub got: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: '{}'", self.expected, self.got)
    }
}

impl std::error::Error for ParseEnumError {}

pub(crate) fn normalize(input: &str) -> String {
    input.trim().to_ascii_lowercase()
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize(s);
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "agent" => Ok(Self::Agent),
            _ => Err(ParseEnumError {
                expected: "role",
                got: s.to_string(),
            }),
        }
    }
}

/// A provisioned workspace member. Identity is the numeric id; the email is
/// the case-insensitive login key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl User {
    /// Case-insensitive email match used by the auth provider.
    #[must_use]
    pub fn matches_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::{Role, User};
    use std::str::FromStr;

    #[test]
    fn role_json_roundtrips() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"ADMIN\"");
        assert_eq!(
            serde_json::from_str::<Role>("\"AGENT\"").unwrap(),
            Role::Agent
        );
    }

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("  AGENT ").unwrap(), Role::Agent);
        assert!(Role::from_str("superuser").is_err());
    }

    #[test]
    fn email_match_ignores_case_and_whitespace() {
        let user = User {
            id: 1,
            email: "admin@supportflow.com".to_string(),
            name: "Alex Admin".to_string(),
            role: Role::Admin,
        };
        assert!(user.matches_email(" Admin@SupportFlow.com "));
        assert!(!user.matches_email("agent@supportflow.com"));
    }
}
