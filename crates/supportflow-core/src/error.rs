use std::fmt;

use crate::model::Role;

/// Machine-readable error codes for UI and agent-friendly decision making.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Validation,
    Authorization,
    NotFound,
    Enrichment,
    NotInitialized,
    ConfigParseError,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Validation => "E1001",
            Self::Authorization => "E1002",
            Self::NotFound => "E2001",
            Self::Enrichment => "E3001",
            Self::NotInitialized => "E4001",
            Self::ConfigParseError => "E4002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Validation => "Required field missing or empty",
            Self::Authorization => "Operation requires a higher role",
            Self::NotFound => "Record not found",
            Self::Enrichment => "AI enrichment unavailable",
            Self::NotInitialized => "Workspace not initialized",
            Self::ConfigParseError => "Config file parse error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::Validation => Some("Fill in every required field and retry."),
            Self::Authorization => Some("Ask an admin to perform this operation."),
            Self::NotFound => None,
            Self::Enrichment => Some("Check the API key and network; the fallback text was used."),
            Self::NotInitialized => Some("Run `sf init` to create a workspace here."),
            Self::ConfigParseError => Some("Fix syntax in .supportflow/config.toml and retry."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The kind of record an operation failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Ticket,
    Article,
    Notification,
}

impl Entity {
    const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ticket => "ticket",
            Self::Article => "article",
            Self::Notification => "notification",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain errors surfaced by the store and its collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A required field was empty or missing; the store is left unchanged.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The acting role is not allowed to perform the operation. Strict no-op.
    #[error("{action} requires the {required} role")]
    Authorization {
        action: &'static str,
        required: Role,
    },

    /// An explicit lookup referenced an id absent from the store.
    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: u64 },

    /// An enrichment call failed; callers degrade to the static fallback.
    #[error("enrichment failed: {0}")]
    Enrichment(String),
}

impl Error {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::Validation,
            Self::Authorization { .. } => ErrorCode::Authorization,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Enrichment(_) => ErrorCode::Enrichment,
        }
    }

    pub(crate) fn not_found(entity: Entity, id: u64) -> Self {
        Self::NotFound { entity, id }
    }

    pub(crate) fn admin_required(action: &'static str) -> Self {
        Self::Authorization {
            action,
            required: Role::Admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Entity, Error, ErrorCode};
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::Validation,
            ErrorCode::Authorization,
            ErrorCode::NotFound,
            ErrorCode::Enrichment,
            ErrorCode::NotInitialized,
            ErrorCode::ConfigParseError,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::Authorization.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn error_maps_to_code() {
        assert_eq!(
            Error::Validation("subject is required".into()).code(),
            ErrorCode::Validation
        );
        assert_eq!(
            Error::not_found(Entity::Ticket, 999).code(),
            ErrorCode::NotFound
        );
        assert_eq!(
            Error::admin_required("delete ticket").code(),
            ErrorCode::Authorization
        );
    }

    #[test]
    fn not_found_names_the_entity() {
        let err = Error::not_found(Entity::Ticket, 42);
        assert_eq!(err.to_string(), "ticket 42 not found");
    }
}
