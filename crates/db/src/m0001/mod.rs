mod goal;
mod peer_group;
mod peer_group_member;
mod user;

use sqlx_migrator::vec_box;

pub struct Migration;

sqlx_migrator::sqlite_migration!(
    Migration,
    "peerstake",
    "m0001",
    vec_box![],
    vec_box![
        user::CreateTable,
        user::CreateUk1,
        user::CreateUk2,
        user::CreateUk3,
        peer_group::CreateTable,
        peer_group::CreateIdx1,
        peer_group_member::CreateTable,
        peer_group_member::CreateIdx1,
        goal::CreateTable,
        goal::CreateIdx1
    ]
);
