use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum User {
    Table,
    Id,
    Email,
    Username,
    Password,
    DisplayName,
    Avatar,
    GithubId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum Goal {
    Table,
    Id,
    UserId,
    PeerGroupId,
    Title,
    Description,
    Deadline,
    StakeAmount,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum PeerGroup {
    Table,
    Id,
    CreatorId,
    Name,
    Description,
    MaxMembers,
    IsPublic,
    Category,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum PeerGroupMember {
    Table,
    PeerGroupId,
    UserId,
    JoinedAt,
}
