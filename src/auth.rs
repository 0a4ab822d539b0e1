use crate::error::{AppError, AppResult};
use chrono::{Duration, NaiveDateTime, Utc};
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "casaflow_session";

/// Sessions live for 30 days
pub const SESSION_TTL_DAYS: i64 = 30;

/// Hash a password for storage. Never store the clear text.
pub fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::Message(format!("Password hashing failed: {}", e)))
}

/// Verify a password against its stored hash
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    bcrypt::verify(password, password_hash).unwrap_or(false)
}

/// Generate an opaque session token
pub fn new_session_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Expiry timestamp for a session issued now
pub fn session_expiry() -> NaiveDateTime {
    Utc::now().naive_utc() + Duration::days(SESSION_TTL_DAYS)
}

/// Set-Cookie value that installs the session cookie
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        SESSION_TTL_DAYS * 24 * 60 * 60
    )
}

/// Set-Cookie value that removes the session cookie
pub fn clear_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}

/// Extract the session token from a Cookie header value
pub fn token_from_cookie_header(header: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("s3cret").unwrap();
        assert_ne!(hash, "s3cret");
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_verify_garbage_hash_fails_closed() {
        assert!(!verify_password("s3cret", "not-a-hash"));
    }

    #[test]
    fn test_session_tokens_are_unique() {
        assert_ne!(new_session_token(), new_session_token());
    }

    #[test]
    fn test_token_from_cookie_header() {
        let header = format!("theme=dark; {}=abc123; lang=it", SESSION_COOKIE);
        assert_eq!(token_from_cookie_header(&header).as_deref(), Some("abc123"));
        assert_eq!(token_from_cookie_header("theme=dark"), None);
        assert_eq!(
            token_from_cookie_header(&format!("{}=", SESSION_COOKIE)),
            None
        );
    }

    #[test]
    fn test_cookie_round_trip() {
        let cookie = session_cookie("tok");
        let token = token_from_cookie_header(cookie.split(';').next().unwrap());
        assert_eq!(token.as_deref(), Some("tok"));
    }
}
