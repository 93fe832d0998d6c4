use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::{from_value, ApiBody, ApiClient};
use crate::error::ApiError;
use crate::model::{Role, UserProfile};

/// The one slice that outlives a page session. Every domain cache is
/// rebuilt from the server after a reload; this is not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<UserProfile>,
    pub token: Option<String>,
    pub role: Option<Role>,
    pub is_authenticated: bool,
}

/// Cheap shared read handle. The HTTP client holds one so it can attach
/// credentials without owning the session store.
#[derive(Clone, Default)]
pub struct SessionHandle(Arc<Mutex<AuthState>>);

impl SessionHandle {
    pub fn token(&self) -> Option<String> {
        self.0.lock().expect("auth state poisoned").token.clone()
    }

    pub fn snapshot(&self) -> AuthState {
        self.0.lock().expect("auth state poisoned").clone()
    }
}

/// Durable storage for the auth slice: one JSON document, written
/// atomically (temp file in the same directory, then rename).
pub struct SessionVault {
    path: PathBuf,
}

impl SessionVault {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing or unreadable file restores nothing; the caller falls
    /// back to a logged-out default rather than failing startup.
    pub fn load(&self) -> Option<AuthState> {
        let bytes = std::fs::read(&self.path).ok()?;
        match serde_json::from_slice(&bytes) {
            Ok(state) => Some(state),
            Err(e) => {
                warn!(
                    "session file {} unreadable, starting logged out: {e}",
                    self.path.display()
                );
                None
            }
        }
    }

    pub fn save(&self, state: &AuthState) -> anyhow::Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).with_context(|| {
            format!("failed to create directory {}", parent.display())
        })?;
        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .context("failed to create session temp file")?;
        serde_json::to_writer_pretty(&mut tmp, state)
            .context("failed to serialize session state")?;
        tmp.persist(&self.path).map_err(|e| e.error).with_context(|| {
            format!("failed to replace session file {}", self.path.display())
        })?;
        Ok(())
    }
}

/// Verdict the page renderer acts on for a guarded route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RouteAccess {
    Granted,
    RedirectLogin,
    RedirectUnauthorized,
}

#[derive(Debug, Deserialize)]
struct LoginGrant {
    user: UserProfile,
    token: String,
    role: Role,
}

/// Tracks the authenticated principal, gates routes, and writes every
/// change through to the vault so a reload does not force re-login.
pub struct SessionStore {
    handle: SessionHandle,
    vault: Option<SessionVault>,
}

impl SessionStore {
    /// Rehydrates from the vault before anything renders. A vault that
    /// is absent, empty, or corrupt yields the logged-out defaults.
    pub fn open(vault: Option<SessionVault>) -> Self {
        let restored = vault
            .as_ref()
            .and_then(SessionVault::load)
            .unwrap_or_default();
        Self {
            handle: SessionHandle(Arc::new(Mutex::new(restored))),
            vault,
        }
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    pub fn snapshot(&self) -> AuthState {
        self.handle.snapshot()
    }

    pub fn is_authenticated(&self) -> bool {
        self.handle.snapshot().is_authenticated
    }

    pub fn role(&self) -> Option<Role> {
        self.handle.snapshot().role
    }

    /// Exchanges credentials for a grant and records it. The login call
    /// itself goes out without a bearer header.
    pub async fn login(
        &self,
        client: &ApiClient,
        email: &str,
        password: &str,
    ) -> Result<AuthState, ApiError> {
        let body = json!({ "email": email, "password": password });
        let value = client.post("/auth/login", ApiBody::Json(body)).await?;
        let grant: LoginGrant = from_value(value)?;
        self.login_success(grant.user, grant.token, grant.role);
        Ok(self.snapshot())
    }

    /// Overwrites the whole slice; calling again with a new grant simply
    /// replaces the old one.
    pub fn login_success(&self, user: UserProfile, token: String, role: Role) {
        {
            let mut state = self.handle.0.lock().expect("auth state poisoned");
            *state = AuthState {
                user: Some(user),
                token: Some(token),
                role: Some(role),
                is_authenticated: true,
            };
        }
        self.persist();
    }

    pub fn logout(&self) {
        {
            let mut state = self.handle.0.lock().expect("auth state poisoned");
            *state = AuthState::default();
        }
        self.persist();
    }

    /// Route gate: unauthenticated goes to login, a role outside the
    /// permitted set goes to unauthorized, everything else renders.
    pub fn route_access(&self, allowed_roles: &[Role]) -> RouteAccess {
        let state = self.handle.snapshot();
        if !state.is_authenticated {
            return RouteAccess::RedirectLogin;
        }
        match state.role {
            Some(role) if allowed_roles.contains(&role) => RouteAccess::Granted,
            _ => RouteAccess::RedirectUnauthorized,
        }
    }

    fn persist(&self) {
        if let Some(vault) = &self.vault {
            if let Err(e) = vault.save(&self.handle.snapshot()) {
                warn!("failed to persist session state: {e:#}");
            }
        }
    }
}
