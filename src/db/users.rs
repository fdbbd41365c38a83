use rusqlite::{params, OptionalExtension, Row};

use crate::db::models::User;
use crate::db::{is_unique_violation, StoreError, StoreResult};
use crate::state::DbPool;

const USER_COLUMNS: &str =
    "id, username, f_name, m_name, l_name, initials, profile_color, password";

/// Row to insert at registration. The password is already hashed.
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub f_name: &'a str,
    pub m_name: Option<&'a str>,
    pub l_name: &'a str,
    pub initials: &'a str,
    pub profile_color: &'a str,
    pub password_hash: &'a str,
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        f_name: row.get(2)?,
        m_name: row.get(3)?,
        l_name: row.get(4)?,
        initials: row.get(5)?,
        profile_color: row.get(6)?,
        password_hash: row.get(7)?,
    })
}

fn map_username_conflict(err: rusqlite::Error) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::UsernameTaken
    } else {
        StoreError::Sql(err)
    }
}

/// Insert a user and return the new id. Fails with `UsernameTaken` on a duplicate username.
pub fn insert(pool: &DbPool, user: &NewUser<'_>) -> StoreResult<i64> {
    let conn = pool.get()?;
    conn.execute(
        "INSERT INTO users (username, f_name, m_name, l_name, initials, profile_color, password)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user.username,
            user.f_name,
            user.m_name,
            user.l_name,
            user.initials,
            user.profile_color,
            user.password_hash
        ],
    )
    .map_err(map_username_conflict)?;
    Ok(conn.last_insert_rowid())
}

pub fn find_by_username(pool: &DbPool, username: &str) -> StoreResult<Option<User>> {
    let conn = pool.get()?;
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"),
            params![username],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

pub fn find_by_id(pool: &DbPool, id: i64) -> StoreResult<Option<User>> {
    let conn = pool.get()?;
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

/// Rename a user. The UNIQUE index arbitrates concurrent claims on the same name,
/// so there is no separate existence check. Renaming to one's own name succeeds.
pub fn update_username(pool: &DbPool, id: i64, username: &str) -> StoreResult<()> {
    let conn = pool.get()?;
    conn.execute(
        "UPDATE users SET username = ?1 WHERE id = ?2",
        params![username, id],
    )
    .map_err(map_username_conflict)?;
    Ok(())
}

pub fn update_initials(pool: &DbPool, id: i64, initials: &str) -> StoreResult<usize> {
    let conn = pool.get()?;
    Ok(conn.execute(
        "UPDATE users SET initials = ?1 WHERE id = ?2",
        params![initials, id],
    )?)
}

pub fn update_profile_color(pool: &DbPool, id: i64, color: &str) -> StoreResult<usize> {
    let conn = pool.get()?;
    Ok(conn.execute(
        "UPDATE users SET profile_color = ?1 WHERE id = ?2",
        params![color, id],
    )?)
}

/// Used by the demo fixture routes, which address users by name.
pub fn update_profile_color_by_username(
    pool: &DbPool,
    username: &str,
    color: &str,
) -> StoreResult<usize> {
    let conn = pool.get()?;
    Ok(conn.execute(
        "UPDATE users SET profile_color = ?1 WHERE username = ?2",
        params![color, username],
    )?)
}

/// Delete a user. Posts, likes and sessions go with it via ON DELETE CASCADE.
pub fn delete(pool: &DbPool, id: i64) -> StoreResult<usize> {
    let conn = pool.get()?;
    Ok(conn.execute("DELETE FROM users WHERE id = ?1", params![id])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::migrated_pool;

    fn new_user(username: &str) -> NewUser<'_> {
        NewUser {
            username,
            f_name: "Alice",
            m_name: None,
            l_name: "Alphabet",
            initials: "AA",
            profile_color: "red",
            password_hash: "hash",
        }
    }

    #[test]
    fn insert_then_find() {
        let (_tmp, pool) = migrated_pool();
        let id = insert(&pool, &new_user("alice")).unwrap();

        let by_name = find_by_username(&pool, "alice").unwrap().unwrap();
        assert_eq!(by_name.id, id);
        assert_eq!(by_name.initials, "AA");
        assert!(by_name.m_name.is_none());

        let by_id = find_by_id(&pool, id).unwrap().unwrap();
        assert_eq!(by_id.username, "alice");
    }

    #[test]
    fn lookups_of_missing_users_are_none() {
        let (_tmp, pool) = migrated_pool();
        assert!(find_by_username(&pool, "ghost").unwrap().is_none());
        assert!(find_by_id(&pool, 42).unwrap().is_none());
    }

    #[test]
    fn duplicate_username_is_conflict() {
        let (_tmp, pool) = migrated_pool();
        insert(&pool, &new_user("alice")).unwrap();
        let err = insert(&pool, &new_user("alice")).unwrap_err();
        assert!(matches!(err, StoreError::UsernameTaken));
    }

    #[test]
    fn update_username_rejects_taken_name() {
        let (_tmp, pool) = migrated_pool();
        insert(&pool, &new_user("alice")).unwrap();
        let bob = insert(&pool, &new_user("bob")).unwrap();

        let err = update_username(&pool, bob, "alice").unwrap_err();
        assert!(matches!(err, StoreError::UsernameTaken));

        update_username(&pool, bob, "bob").unwrap();
        update_username(&pool, bob, "robert").unwrap();
        assert_eq!(find_by_id(&pool, bob).unwrap().unwrap().username, "robert");
    }

    #[test]
    fn field_updates_touch_only_the_target_row() {
        let (_tmp, pool) = migrated_pool();
        let alice = insert(&pool, &new_user("alice")).unwrap();
        let bob = insert(&pool, &new_user("bob")).unwrap();

        assert_eq!(update_initials(&pool, alice, "AX").unwrap(), 1);
        assert_eq!(update_profile_color(&pool, alice, "navy").unwrap(), 1);

        let a = find_by_id(&pool, alice).unwrap().unwrap();
        let b = find_by_id(&pool, bob).unwrap().unwrap();
        assert_eq!((a.initials.as_str(), a.profile_color.as_str()), ("AX", "navy"));
        assert_eq!((b.initials.as_str(), b.profile_color.as_str()), ("AA", "red"));
    }

    #[test]
    fn color_by_username_reports_missing_user() {
        let (_tmp, pool) = migrated_pool();
        insert(&pool, &new_user("alice")).unwrap();
        assert_eq!(update_profile_color_by_username(&pool, "alice", "pink").unwrap(), 1);
        assert_eq!(update_profile_color_by_username(&pool, "ghost", "pink").unwrap(), 0);
    }

    #[test]
    fn delete_removes_user() {
        let (_tmp, pool) = migrated_pool();
        let id = insert(&pool, &new_user("alice")).unwrap();
        assert_eq!(delete(&pool, id).unwrap(), 1);
        assert!(find_by_id(&pool, id).unwrap().is_none());
    }
}
