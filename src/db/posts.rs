use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::PostView;
use crate::db::{StoreError, StoreResult};
use crate::state::DbPool;

// ?1 is always the viewing user; filters bind from ?2.
const ENRICHED_SELECT: &str = "
    SELECT p.id, p.user_id, p.content, p.edited, p.created_at,
           u.username, u.f_name, u.m_name, u.l_name, u.initials, u.profile_color,
           COUNT(l.id) AS like_count,
           COALESCE(SUM(CASE WHEN l.user_id = ?1 THEN 1 ELSE 0 END), 0) > 0
               AS liked_by_current_user
    FROM posts p
    JOIN users u ON u.id = p.user_id
    LEFT JOIN post_likes l ON l.post_id = p.id";

const NEWEST_FIRST: &str = "GROUP BY p.id ORDER BY p.created_at DESC, p.id DESC";

fn post_view_from_row(row: &Row<'_>) -> rusqlite::Result<PostView> {
    Ok(PostView {
        id: row.get(0)?,
        user_id: row.get(1)?,
        content: row.get(2)?,
        edited: row.get(3)?,
        created_at: row.get(4)?,
        username: row.get(5)?,
        f_name: row.get(6)?,
        m_name: row.get(7)?,
        l_name: row.get(8)?,
        initials: row.get(9)?,
        profile_color: row.get(10)?,
        like_count: row.get(11)?,
        liked_by_current_user: row.get(12)?,
    })
}

pub fn create(pool: &DbPool, user_id: i64, content: &str) -> StoreResult<i64> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO posts (user_id, content) VALUES (?1, ?2)",
        params![user_id, content],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Every post, newest first, optionally leaving out one author's posts.
pub fn list(
    pool: &DbPool,
    viewer_id: i64,
    exclude_user_id: Option<i64>,
) -> StoreResult<Vec<PostView>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(&format!(
        "{ENRICHED_SELECT} WHERE (?2 IS NULL OR p.user_id != ?2) {NEWEST_FIRST}"
    ))?;
    let posts = stmt
        .query_map(params![viewer_id, exclude_user_id], post_view_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

pub fn list_by_author(pool: &DbPool, author_id: i64, viewer_id: i64) -> StoreResult<Vec<PostView>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(&format!(
        "{ENRICHED_SELECT} WHERE p.user_id = ?2 {NEWEST_FIRST}"
    ))?;
    let posts = stmt
        .query_map(params![viewer_id, author_id], post_view_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(posts)
}

/// Replace a post's content and mark it edited. Only the owner may edit.
pub fn edit(pool: &DbPool, post_id: i64, caller_id: i64, content: &str) -> StoreResult<()> {
    let conn = pool.get()?;
    let changed = conn.execute(
        "UPDATE posts SET content = ?1, edited = 1 WHERE id = ?2 AND user_id = ?3",
        params![content, post_id, caller_id],
    )?;
    if changed == 0 {
        return Err(ownership_failure(&conn, post_id, caller_id));
    }
    Ok(())
}

/// Remove a post owned by the caller. Its likes cascade.
pub fn delete(pool: &DbPool, post_id: i64, caller_id: i64) -> StoreResult<()> {
    let conn = pool.get()?;
    let changed = conn.execute(
        "DELETE FROM posts WHERE id = ?1 AND user_id = ?2",
        params![post_id, caller_id],
    )?;
    if changed == 0 {
        return Err(ownership_failure(&conn, post_id, caller_id));
    }
    Ok(())
}

/// Work out why a guarded write touched no rows.
fn ownership_failure(conn: &Connection, post_id: i64, caller_id: i64) -> StoreError {
    let owner: rusqlite::Result<Option<i64>> = conn
        .query_row(
            "SELECT user_id FROM posts WHERE id = ?1",
            params![post_id],
            |row| row.get(0),
        )
        .optional();
    match owner {
        Ok(None) => StoreError::PostMissing(post_id),
        Ok(Some(_)) => StoreError::PostNotOwned {
            post_id,
            user_id: caller_id,
        },
        Err(e) => StoreError::Sql(e),
    }
}
