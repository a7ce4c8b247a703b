use std::fmt;

use crate::error::ApiError;

pub const ANONYMOUS_CALLER: &str = "anonymous";

/// What to do when the authorizer attached no usable `sub` claim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentityPolicy {
    /// Reject the request with 401.
    #[default]
    Required,
    /// Proceed as the shared `anonymous` caller. Every anonymous caller sees
    /// the same runs, so this is only meant for local and test stacks.
    AnonymousFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS_CALLER
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn resolve_caller(
    subject_claim: Option<&str>,
    policy: IdentityPolicy,
) -> Result<CallerIdentity, ApiError> {
    match subject_claim.map(str::trim) {
        Some(subject) if !subject.is_empty() => Ok(CallerIdentity(subject.to_string())),
        _ => match policy {
            IdentityPolicy::Required => Err(ApiError::Unauthorized("Unauthorized".to_string())),
            IdentityPolicy::AnonymousFallback => {
                Ok(CallerIdentity(ANONYMOUS_CALLER.to_string()))
            }
        },
    }
}
