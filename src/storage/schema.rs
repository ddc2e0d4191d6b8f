//! SQL schema definitions as const strings.
//!
//! Stats and activities are the only state that outlives a batch run; the
//! schema mirrors that: one stats row per user, an append-only (pruned)
//! activity log, and one row per user/domain pair for unsubscribe
//! groupings.

/// SQL to create the users table.
pub const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// SQL to create the user_stats table.
pub const CREATE_USER_STATS: &str = r#"
CREATE TABLE IF NOT EXISTS user_stats (
    user_id TEXT PRIMARY KEY REFERENCES users(user_id),
    total_scanned INTEGER NOT NULL DEFAULT 0,
    total_unsubscribed INTEGER NOT NULL DEFAULT 0,
    time_saved_minutes INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL
)
"#;

/// SQL to create the user_activities table.
pub const CREATE_USER_ACTIVITIES: &str = r#"
CREATE TABLE IF NOT EXISTS user_activities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL REFERENCES users(user_id),
    kind TEXT NOT NULL,
    message TEXT NOT NULL,
    metadata TEXT,
    created_at TEXT NOT NULL
)
"#;

/// SQL to create activity indexes.
pub const CREATE_ACTIVITY_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_activities_user ON user_activities(user_id, id DESC)
"#;

/// SQL to create the domains_unsubscribed table.
///
/// The `emails` column holds the domain's distinct sender addresses as a
/// sorted JSON array.
pub const CREATE_DOMAINS_UNSUBSCRIBED: &str = r#"
CREATE TABLE IF NOT EXISTS domains_unsubscribed (
    user_id TEXT NOT NULL REFERENCES users(user_id),
    domain TEXT NOT NULL,
    count INTEGER NOT NULL DEFAULT 0,
    sender_name TEXT NOT NULL DEFAULT '',
    emails TEXT NOT NULL DEFAULT '[]',
    updated_at TEXT NOT NULL,
    PRIMARY KEY (user_id, domain)
)
"#;

/// Returns all migrations in execution order.
pub fn all_migrations() -> &'static [&'static str] {
    &[
        CREATE_USERS,
        CREATE_USER_STATS,
        CREATE_USER_ACTIVITIES,
        CREATE_ACTIVITY_INDEXES,
        CREATE_DOMAINS_UNSUBSCRIBED,
    ]
}
