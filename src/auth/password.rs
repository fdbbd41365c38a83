//! Password hashing. bcrypt work runs on the blocking pool.

use crate::error::AppResult;

pub async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hashed)
}

/// Compare a plaintext password with a stored bcrypt hash.
/// A malformed stored hash is logged and counts as a mismatch.
pub async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await?;
    match outcome {
        Ok(matches) => Ok(matches),
        Err(e) => {
            tracing::warn!("Stored password hash is unusable: {}", e);
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_then_verify() {
        let hash = hash_password("pw1".into(), 4).await.unwrap();
        assert_ne!(hash, "pw1");
        assert!(verify_password("pw1".into(), hash.clone()).await.unwrap());
        assert!(!verify_password("pw2".into(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_hashes_differently() {
        let a = hash_password("pw".into(), 4).await.unwrap();
        let b = hash_password("pw".into(), 4).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn garbage_hash_never_matches() {
        assert!(!verify_password("pw".into(), "not-a-hash".into()).await.unwrap());
    }
}
