// src/teams/store.rs

use chrono::{NaiveDateTime, TimeZone, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::error::{Result, TeamdeckError};
use crate::teams::types::{Team, TeamMember};
use crate::users::store::joined_user;
use crate::users::UserRole;

#[derive(Clone)]
pub struct TeamStore {
    pool: SqlitePool,
}

impl TeamStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Teams the given user belongs to, members populated.
    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Team>> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT t.id, t.name, t.description, t.owner_id, t.created_at, t.updated_at
            FROM teams t
            INNER JOIN team_members tm ON t.id = tm.team_id
            WHERE tm.user_id = ?
            ORDER BY t.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut teams: Vec<Team> = rows.into_iter().map(row_to_team).collect();
        for team in &mut teams {
            team.members = Some(self.members(&team.id).await?);
        }

        Ok(teams)
    }

    pub async fn get(&self, team_id: &str) -> Result<Option<Team>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, owner_id, created_at, updated_at
            FROM teams
            WHERE id = ?
            "#,
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let mut team = row_to_team(row);
                team.members = Some(self.members(team_id).await?);
                Ok(Some(team))
            }
            None => Ok(None),
        }
    }

    /// Creates the team and its owner membership in one transaction.
    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
        owner_id: &str,
    ) -> Result<Team> {
        let team_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO teams (id, name, description, owner_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&team_id)
        .bind(&name)
        .bind(&description)
        .bind(owner_id)
        .bind(now.naive_utc())
        .bind(now.naive_utc())
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO team_members (id, team_id, user_id, role, joined_at)
            VALUES (?, ?, ?, 'owner', ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&team_id)
        .bind(owner_id)
        .bind(now.naive_utc())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Team {
            id: team_id,
            name,
            description,
            owner_id: owner_id.to_string(),
            members: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Members ordered by user display name (SQLite BINARY collation).
    pub async fn members(&self, team_id: &str) -> Result<Vec<TeamMember>> {
        let rows = sqlx::query(
            r#"
            SELECT tm.id, tm.team_id, tm.user_id AS member_user_id, tm.role, tm.joined_at,
                   u.id AS user_id, u.name AS user_name, u.email AS user_email,
                   u.avatar AS user_avatar, u.role AS user_role, u.created_at AS user_created_at
            FROM team_members tm
            INNER JOIN users u ON tm.user_id = u.id
            WHERE tm.team_id = ?
            ORDER BY u.name
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let role: String = row.get("role");
                let joined_at: NaiveDateTime = row.get("joined_at");
                let user = joined_user(&row);

                TeamMember {
                    id: row.get("id"),
                    team_id: row.get("team_id"),
                    user_id: row.get("member_user_id"),
                    role: role.parse().unwrap_or(UserRole::Member),
                    joined_at: Utc.from_utc_datetime(&joined_at),
                    user,
                }
            })
            .collect())
    }

    pub async fn add_member(
        &self,
        team_id: &str,
        user_id: &str,
        role: UserRole,
    ) -> Result<TeamMember> {
        let member_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO team_members (id, team_id, user_id, role, joined_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (team_id, user_id) DO NOTHING
            "#,
        )
        .bind(&member_id)
        .bind(team_id)
        .bind(user_id)
        .bind(role.to_string())
        .bind(now.naive_utc())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(TeamdeckError::Conflict(
                "User is already a team member".to_string(),
            ));
        }

        Ok(TeamMember {
            id: member_id,
            team_id: team_id.to_string(),
            user_id: user_id.to_string(),
            role,
            joined_at: now,
            user: None,
        })
    }

    pub async fn is_member(&self, team_id: &str, user_id: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM team_members WHERE team_id = ? AND user_id = ?",
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }
}

fn row_to_team(row: sqlx::sqlite::SqliteRow) -> Team {
    let created_at: NaiveDateTime = row.get("created_at");
    let updated_at: NaiveDateTime = row.get("updated_at");

    Team {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        owner_id: row.get("owner_id"),
        members: None,
        created_at: Utc.from_utc_datetime(&created_at),
        updated_at: Utc.from_utc_datetime(&updated_at),
    }
}
