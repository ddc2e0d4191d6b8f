//! Stats persistence operations.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use crate::domain::{DomainStat, UserId, UserStats};
use crate::storage::database::{Database, DatabaseError, Result};

/// Ensures a user row exists, creating it on first sight.
pub async fn ensure_user(db: &Database, user: &UserId) -> Result<()> {
    let user = user.clone();

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
        Ok(())
    })
    .await
}

/// Loads a user's stats, or `None` when the user has none yet.
pub async fn load(db: &Database, user: &UserId) -> Result<Option<UserStats>> {
    let user = user.clone();

    db.with_conn(move |conn| {
        let counters = conn
            .query_row(
                r#"
                SELECT total_scanned, total_unsubscribed, time_saved_minutes
                FROM user_stats
                WHERE user_id = ?1
                "#,
                [&user.0],
                |row| {
                    Ok((
                        row.get::<_, u32>(0)?,
                        row.get::<_, u32>(1)?,
                        row.get::<_, u32>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((total_scanned, total_unsubscribed, time_saved_minutes)) = counters else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT domain, count, sender_name, emails
            FROM domains_unsubscribed
            WHERE user_id = ?1
            "#,
        )?;

        let rows = stmt.query_map([&user.0], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut domains_unsubscribed = HashMap::new();
        for row in rows {
            let (domain, count, sender_name, emails_json) = row?;
            let emails: BTreeSet<String> = serde_json::from_str(&emails_json)
                .map_err(|e| DatabaseError::Encoding(format!("bad emails column: {}", e)))?;

            domains_unsubscribed.insert(
                domain,
                DomainStat {
                    count,
                    sender_name,
                    emails,
                },
            );
        }

        Ok(Some(UserStats {
            total_scanned,
            total_unsubscribed,
            time_saved_minutes,
            domains_unsubscribed,
        }))
    })
    .await
}

/// Saves a user's stats, replacing any previous state.
///
/// Counter row and domain rows are written in one transaction so a crash
/// cannot leave them out of step. Email sets are materialized as sorted
/// JSON arrays; the set type never reaches the database.
pub async fn save(db: &Database, user: &UserId, stats: &UserStats) -> Result<()> {
    let user = user.clone();
    let stats = stats.clone();

    db.transaction(move |tx| {
        let now = Utc::now().to_rfc3339();

        tx.execute(
            r#"
            INSERT INTO users (user_id, created_at, updated_at)
            VALUES (?1, ?2, ?2)
            ON CONFLICT(user_id) DO UPDATE SET updated_at = ?2
            "#,
            params![user.0, now],
        )?;

        tx.execute(
            r#"
            INSERT INTO user_stats (
                user_id, total_scanned, total_unsubscribed, time_saved_minutes, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(user_id) DO UPDATE SET
                total_scanned = ?2,
                total_unsubscribed = ?3,
                time_saved_minutes = ?4,
                updated_at = ?5
            "#,
            params![
                user.0,
                stats.total_scanned,
                stats.total_unsubscribed,
                stats.time_saved_minutes,
                now,
            ],
        )?;

        tx.execute(
            "DELETE FROM domains_unsubscribed WHERE user_id = ?1",
            [&user.0],
        )?;

        for (domain, stat) in &stats.domains_unsubscribed {
            let emails: Vec<&String> = stat.emails.iter().collect();
            let emails_json = serde_json::to_string(&emails)
                .map_err(|e| DatabaseError::Encoding(format!("serialize emails: {}", e)))?;

            tx.execute(
                r#"
                INSERT INTO domains_unsubscribed (
                    user_id, domain, count, sender_name, emails, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![user.0, domain, stat.count, stat.sender_name, emails_json, now],
            )?;
        }

        Ok(())
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SenderMetadata;

    fn sender(email: &str, domain: &str) -> SenderMetadata {
        SenderMetadata {
            sender_name: "Shop".to_string(),
            sender_email: email.to_string(),
            domain: domain.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn load_returns_none_for_unknown_user() {
        let db = Database::open_in_memory().await.unwrap();
        let loaded = load(&db, &UserId::from("nobody@example.com")).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserId::from("alice@example.com");

        let mut stats = UserStats::default();
        stats.record_scan();
        stats.record_scan();
        stats.record_unsubscribe(&sender("deals@shop.com", "shop.com"));
        stats.record_unsubscribe(&sender("promo@shop.com", "shop.com"));

        save(&db, &user, &stats).await.unwrap();
        let loaded = load(&db, &user).await.unwrap().unwrap();

        assert_eq!(loaded, stats);
        assert_eq!(loaded.domains_unsubscribed["shop.com"].emails.len(), 2);
    }

    #[tokio::test]
    async fn save_replaces_previous_state() {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserId::from("alice@example.com");

        let mut stats = UserStats::default();
        stats.record_scan();
        stats.record_unsubscribe(&sender("a@one.com", "one.com"));
        save(&db, &user, &stats).await.unwrap();

        stats.record_scan();
        stats.record_unsubscribe(&sender("b@two.com", "two.com"));
        save(&db, &user, &stats).await.unwrap();

        let loaded = load(&db, &user).await.unwrap().unwrap();
        assert_eq!(loaded.total_unsubscribed, 2);
        assert_eq!(loaded.domains_unsubscribed.len(), 2);
    }

    #[tokio::test]
    async fn ensure_user_is_idempotent() {
        let db = Database::open_in_memory().await.unwrap();
        let user = UserId::from("alice@example.com");

        ensure_user(&db, &user).await.unwrap();
        ensure_user(&db, &user).await.unwrap();

        let count: i64 = db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?))
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
