use peerstake_goal::{CreateGoalInput, GoalStatus, UpdateGoalInput};
use peerstake_shared::Error;
use temp_dir::TempDir;
use time::OffsetDateTime;

mod helpers;

fn input() -> anyhow::Result<CreateGoalInput> {
    Ok(CreateGoalInput {
        title: "Read a book".to_owned(),
        description: "One chapter a day".to_owned(),
        deadline: OffsetDateTime::from_unix_timestamp(1_900_000_000)?,
        stake_amount: 0.0,
        peer_group_id: None,
    })
}

#[tokio::test]
async fn test_delete() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let john = helpers::create_user(&state, "john").await?;
    let jane = helpers::create_user(&state, "jane").await?;
    let cmd = peerstake_goal::Command(state);

    let goal = cmd.create(&john, input()?).await?;

    let resp = cmd.delete(&jane, &goal.id).await;
    assert!(
        matches!(resp, Err(Error::NotFound(msg)) if msg == "Goal not found or cannot be deleted")
    );

    cmd.delete(&john, &goal.id).await?;
    assert!(cmd.list(&john).await?.is_empty());

    let resp = cmd.delete(&john, &goal.id).await;
    assert!(matches!(resp, Err(Error::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_delete_completed_goal() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let john = helpers::create_user(&state, "john").await?;
    let cmd = peerstake_goal::Command(state);

    let goal = cmd.create(&john, input()?).await?;
    cmd.update(
        &john,
        &goal.id,
        UpdateGoalInput {
            status: Some(GoalStatus::Completed),
            ..Default::default()
        },
    )
    .await?;

    let resp = cmd.delete(&john, &goal.id).await;
    assert!(matches!(resp, Err(Error::NotFound(_))));
    assert_eq!(cmd.list(&john).await?.len(), 1);

    Ok(())
}
