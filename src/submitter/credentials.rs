use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("credential list must not be empty")]
    Empty,
}

/// A single Save Page Now credential, stored as the authorization header
/// value it will be sent with. The pairing is fixed at construction; the
/// token itself is never inspected again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    authorization: String,
}

impl Credential {
    fn new(token: &str) -> Self {
        Self {
            authorization: format!("LOW {token}"),
        }
    }

    /// The `Authorization` header value for this credential.
    #[must_use]
    pub fn authorization(&self) -> &str {
        &self.authorization
    }
}

/// Round-robin rotation over a fixed set of credentials.
///
/// Spreads submissions across the token pool so no single token absorbs the
/// service's per-account limits alone. Once constructed it never fails and
/// never blocks; the cursor wraps after the last credential.
#[derive(Debug)]
pub struct CredentialRotator {
    credentials: Vec<Credential>,
    cursor: usize,
}

impl CredentialRotator {
    /// Build a rotator from raw tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if `tokens` is empty. Misconfiguration surfaces here,
    /// at startup, rather than at first use.
    pub fn new(tokens: &[String]) -> Result<Self, CredentialError> {
        if tokens.is_empty() {
            return Err(CredentialError::Empty);
        }
        Ok(Self {
            credentials: tokens.iter().map(|t| Credential::new(t)).collect(),
            cursor: 0,
        })
    }

    /// Return the next credential in round-robin order.
    pub fn next_credential(&mut self) -> Credential {
        let credential = self.credentials[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.credentials.len();
        credential
    }

    /// Number of credentials in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}
