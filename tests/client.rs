use peerstake_client::{AuthStore, HttpAuthApi};

mod helpers;

#[tokio::test]
async fn test_auth_store_against_server() -> anyhow::Result<()> {
    let app = helpers::setup("development").await?;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let router = app.router.clone();
    tokio::spawn(async move { axum::serve(listener, router).await });

    let mut store = AuthStore::new(HttpAuthApi::new(&format!("http://{addr}"))?);
    assert!(store.state().loading);

    store.init().await;
    assert!(!store.state().loading);
    assert!(!store.is_authenticated());

    store
        .register("john@peerstake.localhost", "john", "my_password")
        .await;
    assert!(store.is_authenticated());
    assert_eq!(store.user().map(|u| u.username.as_str()), Some("john"));

    // A fresh store on the same cookie jar picks up the session.
    let mut restored = AuthStore::new(store.api().clone());
    restored.init().await;
    assert_eq!(
        restored.user().map(|u| u.email.as_str()),
        Some("john@peerstake.localhost")
    );

    store.logout().await;
    assert!(!store.is_authenticated());

    store.login("john@peerstake.localhost", "nope_nope").await;
    assert!(!store.is_authenticated());
    assert_eq!(store.state().error.as_deref(), Some("Invalid credentials"));

    store.login("john@peerstake.localhost", "my_password").await;
    assert!(store.is_authenticated());
    assert_eq!(store.state().error, None);

    Ok(())
}
