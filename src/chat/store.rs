// src/chat/store.rs

use chrono::{NaiveDateTime, TimeZone, Utc};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::chat::types::{ChannelType, ChatChannel, ChatMessage, CreateChannelRequest};
use crate::error::Result;
use crate::users::store::{joined_user, row_to_user};
use crate::users::User;

pub const DEFAULT_MESSAGE_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct ChatStore {
    pool: SqlitePool,
}

impl ChatStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Channels the user participates in, with participants and unread
    /// counts populated.
    pub async fn channels_for_user(&self, user_id: &str) -> Result<Vec<ChatChannel>> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT c.id, c.name, c.type, c.team_id, c.project_id, c.created_at
            FROM chat_channels c
            INNER JOIN chat_channel_participants cp ON c.id = cp.channel_id
            WHERE cp.user_id = ?
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut channels: Vec<ChatChannel> = rows.into_iter().map(row_to_channel).collect();
        for channel in &mut channels {
            channel.participants = Some(self.participants(&channel.id).await?);
            channel.unread_count = Some(self.unread_count(&channel.id, user_id).await?);
        }

        Ok(channels)
    }

    pub async fn get_channel(&self, channel_id: &str) -> Result<Option<ChatChannel>> {
        let row = sqlx::query(
            "SELECT id, name, type, team_id, project_id, created_at FROM chat_channels WHERE id = ?",
        )
        .bind(channel_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let mut channel = row_to_channel(row);
                channel.participants = Some(self.participants(channel_id).await?);
                Ok(Some(channel))
            }
            None => Ok(None),
        }
    }

    /// Creates the channel and its participant rows in one transaction.
    pub async fn create_channel(&self, req: CreateChannelRequest) -> Result<ChatChannel> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO chat_channels (id, name, type, team_id, project_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&req.name)
        .bind(req.channel_type.to_string())
        .bind(&req.team_id)
        .bind(&req.project_id)
        .bind(now.naive_utc())
        .execute(&mut *tx)
        .await?;

        for user_id in &req.participant_ids {
            sqlx::query(
                r#"
                INSERT INTO chat_channel_participants (channel_id, user_id)
                VALUES (?, ?)
                ON CONFLICT (channel_id, user_id) DO NOTHING
                "#,
            )
            .bind(&id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(ChatChannel {
            id,
            name: req.name,
            channel_type: req.channel_type,
            team_id: req.team_id,
            project_id: req.project_id,
            participants: None,
            unread_count: None,
            created_at: now,
        })
    }

    /// The newest `limit` messages, returned oldest-first.
    pub async fn messages(&self, channel_id: &str, limit: i64) -> Result<Vec<ChatMessage>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.content, m.sender_id, m.channel_id, m.is_read, m.created_at,
                   u.id AS user_id, u.name AS user_name, u.email AS user_email,
                   u.avatar AS user_avatar, u.role AS user_role, u.created_at AS user_created_at
            FROM chat_messages m
            INNER JOIN users u ON m.sender_id = u.id
            WHERE m.channel_id = ?
            ORDER BY m.created_at DESC
            LIMIT ?
            "#,
        )
        .bind(channel_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut messages: Vec<ChatMessage> = rows.into_iter().map(row_to_message).collect();
        messages.reverse();

        Ok(messages)
    }

    pub async fn send_message(
        &self,
        channel_id: &str,
        sender_id: &str,
        content: &str,
    ) -> Result<ChatMessage> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, channel_id, sender_id, content, is_read, created_at)
            VALUES (?, ?, ?, ?, FALSE, ?)
            "#,
        )
        .bind(&id)
        .bind(channel_id)
        .bind(sender_id)
        .bind(content)
        .bind(now.naive_utc())
        .execute(&self.pool)
        .await?;

        let sender = sqlx::query(
            "SELECT id, name, email, avatar, role, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(sender_id)
        .fetch_optional(&self.pool)
        .await?
        .map(row_to_user);

        Ok(ChatMessage {
            id,
            content: content.to_string(),
            sender_id: sender_id.to_string(),
            sender,
            channel_id: channel_id.to_string(),
            is_read: false,
            created_at: now,
        })
    }

    /// Marks everyone else's messages in the channel as read.
    pub async fn mark_read(&self, channel_id: &str, user_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE chat_messages SET is_read = TRUE
            WHERE channel_id = ? AND sender_id != ? AND is_read = FALSE
            "#,
        )
        .bind(channel_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn is_participant(&self, channel_id: &str, user_id: &str) -> Result<bool> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM chat_channel_participants WHERE channel_id = ? AND user_id = ?",
        )
        .bind(channel_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    async fn participants(&self, channel_id: &str) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id AS user_id, u.name AS user_name, u.email AS user_email,
                   u.avatar AS user_avatar, u.role AS user_role, u.created_at AS user_created_at
            FROM users u
            INNER JOIN chat_channel_participants cp ON u.id = cp.user_id
            WHERE cp.channel_id = ?
            ORDER BY u.name
            "#,
        )
        .bind(channel_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().filter_map(joined_user).collect())
    }

    async fn unread_count(&self, channel_id: &str, user_id: &str) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM chat_messages
            WHERE channel_id = ? AND sender_id != ? AND is_read = FALSE
            "#,
        )
        .bind(channel_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0)
    }
}

fn row_to_channel(row: sqlx::sqlite::SqliteRow) -> ChatChannel {
    let channel_type: String = row.get("type");
    let created_at: NaiveDateTime = row.get("created_at");

    ChatChannel {
        id: row.get("id"),
        name: row.get("name"),
        channel_type: channel_type.parse().unwrap_or(ChannelType::Direct),
        team_id: row.get("team_id"),
        project_id: row.get("project_id"),
        participants: None,
        unread_count: None,
        created_at: Utc.from_utc_datetime(&created_at),
    }
}

fn row_to_message(row: sqlx::sqlite::SqliteRow) -> ChatMessage {
    let created_at: NaiveDateTime = row.get("created_at");

    ChatMessage {
        id: row.get("id"),
        content: row.get("content"),
        sender_id: row.get("sender_id"),
        sender: joined_user(&row),
        channel_id: row.get("channel_id"),
        is_read: row.get("is_read"),
        created_at: Utc.from_utc_datetime(&created_at),
    }
}
