//! Activity log persistence operations.

use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::domain::{Activity, ActivityKind, UserId, ACTIVITY_WINDOW};
use crate::storage::database::{Database, Result};

fn kind_to_str(kind: ActivityKind) -> &'static str {
    match kind {
        ActivityKind::Info => "info",
        ActivityKind::Warning => "warning",
        ActivityKind::Success => "success",
        ActivityKind::Error => "error",
    }
}

fn kind_from_str(kind: &str) -> ActivityKind {
    match kind {
        "warning" => ActivityKind::Warning,
        "success" => ActivityKind::Success,
        "error" => ActivityKind::Error,
        _ => ActivityKind::Info,
    }
}

/// Appends one activity and prunes the user's log to the newest
/// [`ACTIVITY_WINDOW`] entries.
pub async fn append(db: &Database, user: &UserId, activity: &Activity) -> Result<()> {
    let user = user.clone();
    let activity = activity.clone();

    db.with_conn(move |conn| {
        let now = Utc::now().to_rfc3339();
        conn.execute(
            r#"
            INSERT INTO users (user_id, created_at, updated_at)
            VALUES (?1, ?2, ?2)
            ON CONFLICT(user_id) DO UPDATE SET updated_at = ?2
            "#,
            params![user.0, now],
        )?;

        let metadata = activity
            .metadata
            .as_ref()
            .map(|m| m.to_string());

        conn.execute(
            r#"
            INSERT INTO user_activities (user_id, kind, message, metadata, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                user.0,
                kind_to_str(activity.kind),
                activity.message,
                metadata,
                activity.timestamp.to_rfc3339(),
            ],
        )?;

        // Older entries beyond the window are discarded, not archived.
        conn.execute(
            r#"
            DELETE FROM user_activities
            WHERE user_id = ?1
              AND id NOT IN (
                  SELECT id FROM user_activities
                  WHERE user_id = ?1
                  ORDER BY id DESC
                  LIMIT ?2
              )
            "#,
            params![user.0, ACTIVITY_WINDOW as i64],
        )?;

        Ok(())
    })
    .await
}

/// Returns the user's retained activities, newest first.
pub async fn recent(db: &Database, user: &UserId) -> Result<Vec<Activity>> {
    let user = user.clone();

    db.with_conn(move |conn| {
        let mut stmt = conn.prepare(
            r#"
            SELECT kind, message, metadata, created_at
            FROM user_activities
            WHERE user_id = ?1
            ORDER BY id DESC
            LIMIT ?2
            "#,
        )?;

        let rows = stmt.query_map(params![user.0, ACTIVITY_WINDOW as i64], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut activities = Vec::new();
        for row in rows {
            let (kind, message, metadata, created_at) = row?;

            let timestamp = DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
            let metadata = metadata.and_then(|m| serde_json::from_str(&m).ok());

            activities.push(Activity {
                kind: kind_from_str(&kind),
                message,
                timestamp,
                metadata,
            });
        }

        Ok(activities)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_and_read_newest_first() {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserId::from("alice@example.com");

        append(&db, &user, &Activity::info("first")).await.unwrap();
        append(&db, &user, &Activity::success("second"))
            .await
            .unwrap();

        let activities = recent(&db, &user).await.unwrap();
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].message, "second");
        assert_eq!(activities[0].kind, ActivityKind::Success);
        assert_eq!(activities[1].message, "first");
    }

    #[tokio::test]
    async fn log_is_pruned_to_window() {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserId::from("alice@example.com");

        for i in 0..60 {
            append(&db, &user, &Activity::info(format!("activity {}", i)))
                .await
                .unwrap();
        }

        let activities = recent(&db, &user).await.unwrap();
        assert_eq!(activities.len(), ACTIVITY_WINDOW);
        assert_eq!(activities[0].message, "activity 59");
        assert_eq!(activities[ACTIVITY_WINDOW - 1].message, "activity 10");
    }

    #[tokio::test]
    async fn logs_are_isolated_per_user() {
        let db = Database::open_in_memory().await.unwrap();
        let alice = UserId::from("alice@example.com");
        let bob = UserId::from("bob@example.com");

        append(&db, &alice, &Activity::info("for alice"))
            .await
            .unwrap();
        append(&db, &bob, &Activity::info("for bob")).await.unwrap();

        let activities = recent(&db, &alice).await.unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].message, "for alice");
    }

    #[tokio::test]
    async fn metadata_round_trips() {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserId::from("alice@example.com");

        let activity =
            Activity::error("failed").with_metadata(serde_json::json!({"message_id": "msg-3"}));
        append(&db, &user, &activity).await.unwrap();

        let activities = recent(&db, &user).await.unwrap();
        assert_eq!(activities[0].metadata.as_ref().unwrap()["message_id"], "msg-3");
    }
}
