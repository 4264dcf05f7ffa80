/// Identity handed to the pipeline by the authentication collaborator.
///
/// Passed explicitly into every call that needs it; nothing in the pipeline reads
/// ambient session state.
#[derive(Clone)]
pub struct UserContext {
    pub owner_id: String,
    pub token: Option<String>,
}

impl UserContext {
    pub fn new(owner_id: impl Into<String>, token: Option<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            token,
        }
    }

    /// Bearer token, if one is present and non-blank
    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

impl std::fmt::Debug for UserContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserContext")
            .field("owner_id", &self.owner_id)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
