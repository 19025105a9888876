// src/db/migration.rs
//! Handles migrations for SQLite: ensures all teamdeck tables match the
//! latest schema. Run this at startup to guarantee schema compatibility.

use anyhow::Result;
use sqlx::{Executor, SqlitePool};

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    avatar TEXT,
    role TEXT NOT NULL CHECK (role IN ('owner', 'admin', 'member')) DEFAULT 'member',
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;

const CREATE_TEAMS: &str = r#"
CREATE TABLE IF NOT EXISTS teams (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    owner_id TEXT NOT NULL,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (owner_id) REFERENCES users(id)
);
"#;

const CREATE_TEAM_MEMBERS: &str = r#"
CREATE TABLE IF NOT EXISTS team_members (
    id TEXT PRIMARY KEY,
    team_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    role TEXT NOT NULL CHECK (role IN ('owner', 'admin', 'member')) DEFAULT 'member',
    joined_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (team_id, user_id),
    FOREIGN KEY (team_id) REFERENCES teams(id) ON DELETE CASCADE,
    FOREIGN KEY (user_id) REFERENCES users(id)
);
"#;

const CREATE_PROJECTS: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    team_id TEXT NOT NULL,
    status TEXT NOT NULL CHECK (status IN ('active', 'completed', 'on-hold', 'archived')) DEFAULT 'active',
    progress INTEGER NOT NULL DEFAULT 0,
    due_date DATETIME,
    task_count INTEGER NOT NULL DEFAULT 0,
    completed_task_count INTEGER NOT NULL DEFAULT 0,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (team_id) REFERENCES teams(id) ON DELETE CASCADE
);
"#;

const CREATE_TASKS: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    project_id TEXT NOT NULL,
    assignee_id TEXT,
    status TEXT NOT NULL CHECK (status IN ('backlog', 'todo', 'in-progress', 'review', 'done')) DEFAULT 'backlog',
    priority TEXT NOT NULL CHECK (priority IN ('low', 'medium', 'high', 'urgent')) DEFAULT 'medium',
    due_date DATETIME,
    tags TEXT,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
    FOREIGN KEY (assignee_id) REFERENCES users(id)
);
"#;

const CREATE_CHAT_CHANNELS: &str = r#"
CREATE TABLE IF NOT EXISTS chat_channels (
    id TEXT PRIMARY KEY,
    name TEXT,
    type TEXT NOT NULL CHECK (type IN ('team', 'project', 'direct')),
    team_id TEXT,
    project_id TEXT,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#;

const CREATE_CHAT_CHANNEL_PARTICIPANTS: &str = r#"
CREATE TABLE IF NOT EXISTS chat_channel_participants (
    channel_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    UNIQUE (channel_id, user_id),
    FOREIGN KEY (channel_id) REFERENCES chat_channels(id) ON DELETE CASCADE,
    FOREIGN KEY (user_id) REFERENCES users(id)
);
"#;

const CREATE_CHAT_MESSAGES: &str = r#"
CREATE TABLE IF NOT EXISTS chat_messages (
    id TEXT PRIMARY KEY,
    channel_id TEXT NOT NULL,
    sender_id TEXT NOT NULL,
    content TEXT NOT NULL,
    is_read BOOLEAN NOT NULL DEFAULT FALSE,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (channel_id) REFERENCES chat_channels(id) ON DELETE CASCADE,
    FOREIGN KEY (sender_id) REFERENCES users(id)
);
"#;

const CREATE_STANDUPS: &str = r#"
CREATE TABLE IF NOT EXISTS standups (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    team_id TEXT NOT NULL,
    date TEXT NOT NULL,
    yesterday TEXT NOT NULL,
    today TEXT NOT NULL,
    blockers TEXT,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    UNIQUE (user_id, team_id, date),
    FOREIGN KEY (user_id) REFERENCES users(id),
    FOREIGN KEY (team_id) REFERENCES teams(id) ON DELETE CASCADE
);
"#;

const CREATE_PROJECT_INSIGHTS: &str = r#"
CREATE TABLE IF NOT EXISTS project_insights (
    id TEXT PRIMARY KEY,
    project_id TEXT NOT NULL,
    type TEXT NOT NULL CHECK (type IN ('risk', 'health', 'suggestion')),
    severity TEXT NOT NULL CHECK (severity IN ('low', 'medium', 'high')),
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);
"#;

/// Indices for the common lookup paths
const CREATE_INDICES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_team_members_team_id ON team_members(team_id);
CREATE INDEX IF NOT EXISTS idx_team_members_user_id ON team_members(user_id);
CREATE INDEX IF NOT EXISTS idx_projects_team_id ON projects(team_id);
CREATE INDEX IF NOT EXISTS idx_tasks_project_id ON tasks(project_id);
CREATE INDEX IF NOT EXISTS idx_tasks_assignee_id ON tasks(assignee_id);
CREATE INDEX IF NOT EXISTS idx_chat_messages_channel_id ON chat_messages(channel_id);
CREATE INDEX IF NOT EXISTS idx_chat_participants_user_id ON chat_channel_participants(user_id);
CREATE INDEX IF NOT EXISTS idx_standups_team_date ON standups(team_id, date);
CREATE INDEX IF NOT EXISTS idx_insights_project_id ON project_insights(project_id);
"#;

/// Runs all required migrations for the SQLite backend.
/// Safe to call at every startup (idempotent).
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    pool.execute(CREATE_USERS).await?;
    pool.execute(CREATE_TEAMS).await?;
    pool.execute(CREATE_TEAM_MEMBERS).await?;
    pool.execute(CREATE_PROJECTS).await?;
    pool.execute(CREATE_TASKS).await?;
    pool.execute(CREATE_CHAT_CHANNELS).await?;
    pool.execute(CREATE_CHAT_CHANNEL_PARTICIPANTS).await?;
    pool.execute(CREATE_CHAT_MESSAGES).await?;
    pool.execute(CREATE_STANDUPS).await?;
    pool.execute(CREATE_PROJECT_INSIGHTS).await?;
    pool.execute(CREATE_INDICES).await?;

    Ok(())
}
