//! The boundary with the identity collaborator
//!
//! Sign-in, sign-up and session persistence belong to an external provider (Firebase Auth
//! in the original application). This crate only consumes "the current user identifier, or
//! none", plus a change stream it turns into [`UiEvent::AuthChanged`](crate::app::UiEvent)
//! events.

use async_trait::async_trait;

/// An opaque user identifier, as handed out by the identity provider
pub type UserId = String;

/// See [`auth_channel`]
pub type AuthSender = tokio::sync::watch::Sender<Option<UserId>>;
/// See [`auth_channel`]
pub type AuthReceiver = tokio::sync::watch::Receiver<Option<UserId>>;

/// Create the channel an identity provider publishes sign-in/sign-out changes on.
/// The initial value is "signed out".
pub fn auth_channel() -> (AuthSender, AuthReceiver) {
    tokio::sync::watch::channel(None)
}

/// The failures an identity provider can report.
///
/// These are surfaced verbatim as user-facing text (the original application is in
/// Portuguese), which is why `Display` speaks to the end user rather than to a log file.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum AuthError {
    #[error("Email ou senha incorretos.")]
    InvalidCredentials,
    #[error("Email já está em uso.")]
    EmailInUse,
    #[error("A senha deve ter pelo menos 6 caracteres.")]
    WeakPassword,
    #[error("Erro ao criar conta.")]
    Unknown,
}

/// What this crate needs from an identity provider
#[async_trait]
pub trait IdentityProvider {
    /// The currently signed-in user, if any
    fn current_user(&self) -> Option<UserId>;

    /// Watch sign-in/sign-out changes. Fires once per change with the new state
    fn subscribe(&self) -> AuthReceiver;

    async fn sign_in(&self, email: &str, password: &str) -> Result<UserId, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<UserId, AuthError>;
}
