use rand::Rng;
use rusqlite::{params, OptionalExtension};

use crate::config::AuthConfig;
use crate::db::StoreResult;
use crate::state::DbPool;

/// Create a new session for a user. Returns the session token.
pub fn create_session(pool: &DbPool, user_id: i64, hours: u64) -> StoreResult<String> {
    let conn = pool.get()?;

    let token = generate_token();
    let id = uuid::Uuid::now_v7().to_string();

    conn.execute(
        "INSERT INTO sessions (id, user_id, token, expires_at) VALUES (?1, ?2, ?3, datetime('now', ?4))",
        params![id, user_id, token, format!("+{} hours", hours)],
    )?;

    Ok(token)
}

/// User id bound to an unexpired session, if any.
pub fn resolve_session(pool: &DbPool, token: &str) -> StoreResult<Option<i64>> {
    let conn = pool.get()?;
    let user_id = conn
        .query_row(
            "SELECT user_id FROM sessions WHERE token = ?1 AND expires_at > datetime('now')",
            params![token],
            |row| row.get(0),
        )
        .optional()?;
    Ok(user_id)
}

/// Delete a session by token. Deleting an unknown token is not an error.
pub fn delete_session(pool: &DbPool, token: &str) -> StoreResult<()> {
    let conn = pool.get()?;
    conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
    Ok(())
}

pub fn purge_expired(pool: &DbPool) -> StoreResult<usize> {
    let conn = pool.get()?;
    Ok(conn.execute(
        "DELETE FROM sessions WHERE expires_at <= datetime('now')",
        [],
    )?)
}

/// Generate a cryptographically random 32-byte hex token.
fn generate_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    hex::encode(bytes)
}

// -- Cookie helpers --

fn cookie_attributes(auth: &AuthConfig) -> String {
    let mut attrs = String::new();
    if let Some(ref domain) = auth.cookie_domain {
        attrs.push_str(&format!("; Domain={}", domain));
    }
    attrs.push_str("; Path=/; HttpOnly");
    // Browsers drop SameSite=None cookies that are not also Secure
    if auth.secure_cookies {
        attrs.push_str("; Secure; SameSite=None");
    } else {
        attrs.push_str("; SameSite=Lax");
    }
    attrs
}

pub fn session_cookie(auth: &AuthConfig, token: &str) -> String {
    format!(
        "{}={}{}; Max-Age={}",
        auth.cookie_name,
        token,
        cookie_attributes(auth),
        auth.session_hours * 3600
    )
}

pub fn clear_session_cookie(auth: &AuthConfig) -> String {
    format!("{}={}; Max-Age=0", auth.cookie_name, cookie_attributes(auth))
}
