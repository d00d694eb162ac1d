use peerstake_shared::Error;
use peerstake_user::{LoginInput, ProviderProfile};
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_login_failure() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = peerstake_user::Command(state);

    let resp = cmd
        .login(LoginInput {
            email: "john.doe@peerstake.localhost".to_owned(),
            password: "my_password".to_owned(),
        })
        .await;
    assert_eq!(resp.unwrap_err().to_string(), "Invalid credentials");

    let user = helpers::create_user(&cmd, "john.doe").await?;

    let resp = cmd
        .login(LoginInput {
            email: "john.doe@peerstake.localhost".to_owned(),
            password: "my_password3".to_owned(),
        })
        .await;
    assert!(matches!(resp, Err(Error::Unauthorized(_))));

    let resp = cmd
        .login(LoginInput {
            email: "".to_owned(),
            password: "my_password".to_owned(),
        })
        .await;
    assert!(matches!(resp, Err(Error::Validate(_))));

    let resp = cmd
        .login(LoginInput {
            email: "John.Doe@peerstake.localhost".to_owned(),
            password: "my_password".to_owned(),
        })
        .await?;
    assert_eq!(resp.id, user.id);

    Ok(())
}

#[tokio::test]
async fn test_login_rejects_passwordless_account() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = peerstake_user::Command(state);

    cmd.federate(ProviderProfile {
        id: "42".to_owned(),
        username: "octo".to_owned(),
        email: Some("octo@github.localhost".to_owned()),
        ..Default::default()
    })
    .await?;

    let resp = cmd
        .login(LoginInput {
            email: "octo@github.localhost".to_owned(),
            password: "anything".to_owned(),
        })
        .await;
    assert!(matches!(resp, Err(Error::Unauthorized(msg)) if msg == "Invalid credentials"));

    Ok(())
}
