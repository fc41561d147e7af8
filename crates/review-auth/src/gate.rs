//! Administrator gate for moderation operations.

use thiserror::Error;
use tracing::debug;

use crate::identity::Identity;

/// Returned when a caller is not a verified administrator.
///
/// Carries no reason: a missing session and a non-admin session are
/// reported identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("administrator access denied")]
pub struct Denied;

/// A verified administrator.
///
/// Only [`AdminGate::authorize`] constructs this, so any function taking an
/// `&AdminIdentity` can rely on the check having happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    subject: String,
    username: Option<String>,
}

impl AdminIdentity {
    /// External account identifier of the administrator.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Display name, if known.
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

/// Checks the administrator flag of a verified identity.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdminGate;

impl AdminGate {
    /// Grants administrator capability to a verified admin identity.
    pub fn authorize(identity: Option<&Identity>) -> Result<AdminIdentity, Denied> {
        match identity {
            Some(identity) if identity.is_admin => Ok(AdminIdentity {
                subject: identity.subject.clone(),
                username: identity.username.clone(),
            }),
            _ => {
                debug!("Administrator access denied");
                Err(Denied)
            }
        }
    }
}
