#![allow(dead_code)]

use std::collections::HashMap;

use chrono::{NaiveDate, TimeZone, Utc};
use crudlist::{
    EntitySchema, ListAction, ListContext, ResourceConfig, SearchConfig, SeaOrmExecutor,
    SortConfig,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, Database, DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;

pub mod event_entity;
pub mod team_entity;
pub mod user_entity;

pub type UserList = ListAction<SeaOrmExecutor<user_entity::Entity>>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    init_tracing();
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Two teams, five users. Dave has no team, Carol has no bio.
pub async fn setup_seeded_db() -> Result<DatabaseConnection, DbErr> {
    let db = setup_test_db().await?;

    for (id, name) in [(1, "red"), (2, "blue")] {
        team_entity::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
        }
        .insert(&db)
        .await?;
    }

    let users = [
        (1, "alice", Some("likes rust"), 30, Some(1)),
        (2, "bob", Some("gardener"), 25, Some(2)),
        (3, "carol", None, 41, Some(1)),
        (4, "dave", Some("rust and go"), 30, None),
        (5, "erin", Some("painter"), 19, Some(2)),
    ];
    for (id, name, bio, age, team_id) in users {
        user_entity::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            bio: Set(bio.map(str::to_string)),
            age: Set(age),
            created_at: Set(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()),
            team_id: Set(team_id),
        }
        .insert(&db)
        .await?;
    }

    Ok(db)
}

/// Two events stored in naive date/time columns.
pub async fn setup_event_db() -> Result<DatabaseConnection, DbErr> {
    let db = setup_test_db().await?;

    for (id, title, day, hour) in [(1, "launch", 1, 12), (2, "retro", 2, 9)] {
        let date = NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        event_entity::ActiveModel {
            id: Set(id),
            title: Set(title.to_string()),
            at: Set(date.and_hms_opt(hour, 0, 0).unwrap()),
            day: Set(date),
        }
        .insert(&db)
        .await?;
    }

    Ok(db)
}

pub fn user_config() -> ResourceConfig {
    ResourceConfig::new(["id", "name", "bio", "age", "team_id"])
        .with_search([SearchConfig::new("q").attributes(["name", "bio", "age"])])
        .with_sort(SortConfig::default().attributes(["id", "name", "age"]))
}

pub fn user_list(db: DatabaseConnection, config: ResourceConfig) -> UserList {
    ListAction::new(
        config,
        EntitySchema::from_entity::<user_entity::Entity>(),
        SeaOrmExecutor::new(db),
    )
}

pub fn query(pairs: &[(&str, &str)]) -> ListContext {
    ListContext::new(
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<HashMap<_, _>>(),
    )
}

/// Names of the listed rows, in order.
pub fn names(ctx: &ListContext) -> Vec<String> {
    ctx.instance
        .iter()
        .flatten()
        .filter_map(|row| row.get("name").and_then(|v| v.as_str()).map(str::to_string))
        .collect()
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(CreateTeamTable),
            Box::new(CreateUserTable),
            Box::new(CreateEventTable),
        ]
    }
}

pub struct CreateTeamTable;

#[async_trait::async_trait]
impl MigrationName for CreateTeamTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_team_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateTeamTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(TeamEntity)
            .if_not_exists()
            .col(
                ColumnDef::new(TeamColumn::Id)
                    .integer()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(TeamColumn::Name).string().not_null())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TeamEntity).to_owned())
            .await?;
        Ok(())
    }
}

pub struct CreateUserTable;

#[async_trait::async_trait]
impl MigrationName for CreateUserTable {
    fn name(&self) -> &'static str {
        "m20240101_000002_create_user_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateUserTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(UserEntity)
            .if_not_exists()
            .col(
                ColumnDef::new(UserColumn::Id)
                    .integer()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(UserColumn::Name).string().not_null())
            .col(ColumnDef::new(UserColumn::Bio).text().null())
            .col(ColumnDef::new(UserColumn::Age).integer().not_null())
            .col(
                ColumnDef::new(UserColumn::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(ColumnDef::new(UserColumn::TeamId).integer().null())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserEntity).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum TeamColumn {
    Id,
    Name,
}

impl Iden for TeamColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Name => "name",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct TeamEntity;

impl Iden for TeamEntity {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "teams").unwrap();
    }
}

#[derive(Debug)]
pub enum UserColumn {
    Id,
    Name,
    Bio,
    Age,
    CreatedAt,
    TeamId,
}

impl Iden for UserColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Name => "name",
                Self::Bio => "bio",
                Self::Age => "age",
                Self::CreatedAt => "created_at",
                Self::TeamId => "team_id",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct UserEntity;

impl Iden for UserEntity {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "users").unwrap();
    }
}

pub struct CreateEventTable;

#[async_trait::async_trait]
impl MigrationName for CreateEventTable {
    fn name(&self) -> &'static str {
        "m20240101_000003_create_event_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateEventTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(EventEntity)
            .if_not_exists()
            .col(
                ColumnDef::new(EventColumn::Id)
                    .integer()
                    .not_null()
                    .primary_key(),
            )
            .col(ColumnDef::new(EventColumn::Title).string().not_null())
            .col(ColumnDef::new(EventColumn::At).date_time().not_null())
            .col(ColumnDef::new(EventColumn::Day).date().not_null())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventEntity).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum EventColumn {
    Id,
    Title,
    At,
    Day,
}

impl Iden for EventColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Title => "title",
                Self::At => "at",
                Self::Day => "day",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct EventEntity;

impl Iden for EventEntity {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "events").unwrap();
    }
}
