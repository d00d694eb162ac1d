use crate::{AuthApi, SessionUser};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<SessionUser>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Session state seen by the UI. Every mutation goes through `&mut self`, so
/// the caller decides the order of updates.
pub struct AuthStore<A> {
    api: A,
    state: AuthState,
}

impl<A: AuthApi> AuthStore<A> {
    /// A fresh store is loading until [`AuthStore::init`] has run.
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: AuthState {
                user: None,
                loading: true,
                error: None,
            },
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.state.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.user.is_some()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Restore the session from the server. Failures leave the store signed
    /// out without an error message.
    pub async fn init(&mut self) {
        self.state.loading = true;

        match self.api.me().await {
            Ok(user) => self.state.user = Some(user),
            Err(err) => {
                tracing::debug!(err = %err, "no active session");
                self.state.user = None;
            }
        }

        self.state.loading = false;
    }

    pub async fn login(&mut self, email: &str, password: &str) {
        self.state.loading = true;
        self.state.error = None;

        match self.api.login(email, password).await {
            Ok(user) => self.state.user = Some(user),
            Err(err) => self.state.error = Some(err.to_string()),
        }

        self.state.loading = false;
    }

    pub async fn register(&mut self, email: &str, username: &str, password: &str) {
        self.state.loading = true;
        self.state.error = None;

        match self.api.register(email, username, password).await {
            Ok(user) => self.state.user = Some(user),
            Err(err) => self.state.error = Some(err.to_string()),
        }

        self.state.loading = false;
    }

    /// Sign out locally even when the server cannot be reached.
    pub async fn logout(&mut self) {
        self.state.loading = true;

        if let Err(err) = self.api.logout().await {
            tracing::warn!(err = %err, "logout request failed");
        }

        self.state.user = None;
        self.state.loading = false;
    }

    pub fn clear_error(&mut self) {
        self.state.error = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::ClientError;

    fn john() -> SessionUser {
        SessionUser {
            id: "01JA".to_owned(),
            email: "john@peerstake.localhost".to_owned(),
            username: "john".to_owned(),
            display_name: Some("john".to_owned()),
            avatar: None,
        }
    }

    fn rejected(status: u16, message: &str) -> ClientError {
        ClientError::Api {
            status,
            message: message.to_owned(),
        }
    }

    #[derive(Default)]
    struct FakeApi {
        session: Mutex<Option<SessionUser>>,
        offline: bool,
    }

    #[async_trait::async_trait]
    impl AuthApi for FakeApi {
        async fn me(&self) -> Result<SessionUser, ClientError> {
            self.session
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| rejected(401, "Authentication required"))
        }

        async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ClientError> {
            if email != "john@peerstake.localhost" || password != "my_password" {
                return Err(rejected(401, "Invalid credentials"));
            }

            *self.session.lock().unwrap() = Some(john());
            Ok(john())
        }

        async fn register(
            &self,
            email: &str,
            _username: &str,
            _password: &str,
        ) -> Result<SessionUser, ClientError> {
            if email == "john@peerstake.localhost" {
                return Err(rejected(400, "User already exists"));
            }

            Err(rejected(400, "Please provide a valid email"))
        }

        async fn logout(&self) -> Result<(), ClientError> {
            if self.offline {
                return Err(rejected(503, "Service unavailable"));
            }

            *self.session.lock().unwrap() = None;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_new_store_is_loading() {
        let store = AuthStore::new(FakeApi::default());
        assert!(store.state().loading);
        assert!(store.user().is_none());
        assert!(store.state().error.is_none());
    }

    #[tokio::test]
    async fn test_init_without_session() {
        let mut store = AuthStore::new(FakeApi::default());
        store.init().await;

        assert_eq!(store.state(), &AuthState::default());
    }

    #[tokio::test]
    async fn test_init_restores_session() {
        let api = FakeApi {
            session: Mutex::new(Some(john())),
            offline: false,
        };
        let mut store = AuthStore::new(api);
        store.init().await;

        assert_eq!(store.user(), Some(&john()));
        assert!(!store.state().loading);
    }

    #[tokio::test]
    async fn test_login_sets_user_or_error() {
        let mut store = AuthStore::new(FakeApi::default());
        store.init().await;

        store.login("john@peerstake.localhost", "wrong").await;
        assert_eq!(store.state().error.as_deref(), Some("Invalid credentials"));
        assert!(!store.is_authenticated());

        store.login("john@peerstake.localhost", "my_password").await;
        assert!(store.state().error.is_none());
        assert_eq!(store.user(), Some(&john()));
    }

    #[tokio::test]
    async fn test_register_error_keeps_server_message() {
        let mut store = AuthStore::new(FakeApi::default());
        store
            .register("john@peerstake.localhost", "john", "my_password")
            .await;

        assert_eq!(store.state().error.as_deref(), Some("User already exists"));
        assert!(!store.state().loading);

        store.clear_error();
        assert!(store.state().error.is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_user_even_when_offline() {
        let api = FakeApi {
            session: Mutex::new(Some(john())),
            offline: true,
        };
        let mut store = AuthStore::new(api);
        store.init().await;
        assert!(store.is_authenticated());

        store.logout().await;
        assert!(!store.is_authenticated());
        assert!(!store.state().loading);
    }
}
