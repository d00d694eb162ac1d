use peerstake_goal::CreateGoalInput;
use peerstake_shared::Error;
use temp_dir::TempDir;
use time::OffsetDateTime;

mod helpers;

fn input(title: &str) -> anyhow::Result<CreateGoalInput> {
    Ok(CreateGoalInput {
        title: title.to_owned(),
        description: "Ship something".to_owned(),
        deadline: OffsetDateTime::from_unix_timestamp(1_900_000_000)?,
        stake_amount: 10.0,
        peer_group_id: None,
    })
}

#[tokio::test]
async fn test_list_is_owner_scoped_and_newest_first() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let john = helpers::create_user(&state, "john").await?;
    let jane = helpers::create_user(&state, "jane").await?;
    let cmd = peerstake_goal::Command(state);

    let first = cmd.create(&john, input("first")?).await?;
    let second = cmd.create(&john, input("second")?).await?;
    cmd.create(&jane, input("jane's")?).await?;

    let goals = cmd.list(&john).await?;
    let ids = goals.iter().map(|g| g.id.to_owned()).collect::<Vec<_>>();
    assert_eq!(ids, vec![second.id, first.id]);

    assert_eq!(cmd.list(&jane).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_find_other_users_goal() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let path = dir.child("db.sqlite3");
    let state = helpers::setup_test_state(path).await?;
    let john = helpers::create_user(&state, "john").await?;
    let jane = helpers::create_user(&state, "jane").await?;
    let cmd = peerstake_goal::Command(state);

    let goal = cmd.create(&john, input("mine")?).await?;

    assert_eq!(cmd.find(&john, &goal.id).await?.title, "mine");

    let resp = cmd.find(&jane, &goal.id).await;
    assert!(matches!(resp, Err(Error::NotFound(msg)) if msg == "Goal not found"));

    Ok(())
}
