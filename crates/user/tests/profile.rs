use peerstake_shared::Error;
use peerstake_user::UpdateProfileInput;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
async fn test_update_profile() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = peerstake_user::Command(state);

    let user = helpers::create_user(&cmd, "john").await?;

    let updated = cmd
        .update_profile(
            &user.id,
            UpdateProfileInput {
                username: Some(" johnny ".to_owned()),
                display_name: Some("John Doe".to_owned()),
            },
        )
        .await?;
    assert_eq!(updated.username, "johnny");
    assert_eq!(updated.display_name.as_deref(), Some("John Doe"));
    assert_eq!(updated.name(), "John Doe");

    let updated = cmd
        .update_profile(&user.id, UpdateProfileInput::default())
        .await?;
    assert_eq!(updated.username, "johnny");
    assert_eq!(updated.display_name.as_deref(), Some("John Doe"));

    Ok(())
}

#[tokio::test]
async fn test_update_profile_username_taken() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = peerstake_user::Command(state);

    let john = helpers::create_user(&cmd, "john").await?;
    helpers::create_user(&cmd, "jane").await?;

    let resp = cmd
        .update_profile(
            &john.id,
            UpdateProfileInput {
                username: Some("jane".to_owned()),
                display_name: None,
            },
        )
        .await;
    assert!(matches!(resp, Err(Error::User(msg)) if msg == "Username already taken"));

    // Keeping your own username is not a conflict.
    let same = cmd
        .update_profile(
            &john.id,
            UpdateProfileInput {
                username: Some("john".to_owned()),
                display_name: None,
            },
        )
        .await?;
    assert_eq!(same.username, "john");

    Ok(())
}

#[tokio::test]
async fn test_update_profile_unknown_user() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let cmd = peerstake_user::Command(state);

    let resp = cmd
        .update_profile("01JUNKNOWN", UpdateProfileInput::default())
        .await;
    assert!(matches!(resp, Err(Error::NotFound(_))));

    Ok(())
}
