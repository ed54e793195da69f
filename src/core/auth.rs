// src/core/auth.rs — Session authorization seam

/// Decides whether a session may begin.
pub trait Authorizer: Send + Sync {
    fn is_authorized(&self) -> bool;

    /// Identity attached to the saved profile, if any.
    fn user_id(&self) -> Option<String> {
        None
    }
}

/// Local single-user mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn is_authorized(&self) -> bool {
        true
    }
}

/// Fixed answer, with an optional user id.
#[derive(Debug, Clone)]
pub struct StaticAuthorizer {
    authorized: bool,
    user_id: Option<String>,
}

impl StaticAuthorizer {
    pub fn new(authorized: bool) -> Self {
        Self {
            authorized,
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

impl Authorizer for StaticAuthorizer {
    fn is_authorized(&self) -> bool {
        self.authorized
    }

    fn user_id(&self) -> Option<String> {
        if self.authorized {
            self.user_id.clone()
        } else {
            None
        }
    }
}
