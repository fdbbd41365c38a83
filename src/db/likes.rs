use rusqlite::params;

use crate::db::StoreResult;
use crate::state::DbPool;

/// Record that `user_id` likes `post_id`.
///
/// A second like of the same post hits the (post_id, user_id) UNIQUE index and
/// comes back as an SQL error rather than a silent no-op.
pub fn like(pool: &DbPool, post_id: i64, user_id: i64) -> StoreResult<()> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO post_likes (post_id, user_id) VALUES (?1, ?2)",
        params![post_id, user_id],
    )?;
    Ok(())
}

/// Remove a like. Returns the number of rows removed; zero is not an error.
pub fn unlike(pool: &DbPool, post_id: i64, user_id: i64) -> StoreResult<usize> {
    let conn = pool.get()?;
    Ok(conn.execute(
        "DELETE FROM post_likes WHERE post_id = ?1 AND user_id = ?2",
        params![post_id, user_id],
    )?)
}
