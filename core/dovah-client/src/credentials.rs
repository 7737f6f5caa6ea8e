//! Explicit credential context.
//!
//! The backend authenticates with a session cookie. Instead of an ambient
//! cookie jar, every API call receives a [`CredentialContext`]: cookies set
//! by responses are absorbed into it and replayed as a `Cookie` header on
//! the next request.

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, SET_COOKIE};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Cookies carried between requests of one client session.
#[derive(Debug, Clone, Default)]
pub struct CredentialContext {
    cookies: Arc<RwLock<BTreeMap<String, String>>>,
}

/// Outcome of parsing one `Set-Cookie` header.
#[derive(Debug, PartialEq, Eq)]
enum CookieUpdate {
    Set(String, String),
    Remove(String),
}

fn parse_set_cookie(raw: &str, now: DateTime<Utc>) -> Option<CookieUpdate> {
    let mut parts = raw.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches('"');

    let mut expired = value.is_empty();
    for attr in parts {
        let Some((key, val)) = attr.split_once('=') else {
            continue;
        };
        let val = val.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "max-age" => {
                if val.parse::<i64>().is_ok_and(|secs| secs <= 0) {
                    expired = true;
                }
            }
            "expires" => {
                if DateTime::parse_from_rfc2822(val).is_ok_and(|at| at.with_timezone(&Utc) <= now) {
                    expired = true;
                }
            }
            _ => {}
        }
    }

    Some(if expired {
        CookieUpdate::Remove(name.to_string())
    } else {
        CookieUpdate::Set(name.to_string(), value.to_string())
    })
}

impl CredentialContext {
    /// Creates an empty context (anonymous).
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a cookie, e.g. a session restored by the caller.
    pub async fn insert(&self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.write().await.insert(name.into(), value.into());
    }

    /// Returns the value of a stored cookie.
    pub async fn get(&self, name: &str) -> Option<String> {
        self.cookies.read().await.get(name).cloned()
    }

    /// Returns whether any cookie is currently held.
    pub async fn has_credentials(&self) -> bool {
        !self.cookies.read().await.is_empty()
    }

    /// Value for the `Cookie` request header, if any cookie is held.
    pub async fn cookie_header(&self) -> Option<String> {
        let cookies = self.cookies.read().await;
        if cookies.is_empty() {
            return None;
        }
        Some(
            cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// Applies every `Set-Cookie` header of a response.
    pub async fn absorb(&self, headers: &HeaderMap) {
        let now = Utc::now();
        let updates: Vec<CookieUpdate> = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|raw| parse_set_cookie(raw, now))
            .collect();
        if updates.is_empty() {
            return;
        }

        let mut cookies = self.cookies.write().await;
        for update in updates {
            match update {
                CookieUpdate::Set(name, value) => {
                    debug!("Storing cookie {}", name);
                    cookies.insert(name, value);
                }
                CookieUpdate::Remove(name) => {
                    debug!("Server expired cookie {}", name);
                    cookies.remove(&name);
                }
            }
        }
    }

    /// Drops all credentials.
    pub async fn clear(&self) {
        self.cookies.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn parses_plain_session_cookie() {
        let update = parse_set_cookie("session=abc.def; HttpOnly; Path=/", now());
        assert_eq!(update, Some(CookieUpdate::Set("session".into(), "abc.def".into())));
    }

    #[test]
    fn max_age_zero_removes() {
        let update = parse_set_cookie("session=abc; Max-Age=0; Path=/", now());
        assert_eq!(update, Some(CookieUpdate::Remove("session".into())));
    }

    #[test]
    fn flask_delete_cookie_removes() {
        let raw = "session=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; HttpOnly; Path=/";
        assert_eq!(parse_set_cookie(raw, now()), Some(CookieUpdate::Remove("session".into())));
    }

    #[test]
    fn future_expiry_keeps_cookie() {
        let raw = "session=abc; Expires=Wed, 01 Jan 2200 00:00:00 GMT";
        assert_eq!(
            parse_set_cookie(raw, now()),
            Some(CookieUpdate::Set("session".into(), "abc".into()))
        );
    }

    #[test]
    fn malformed_header_ignored() {
        assert_eq!(parse_set_cookie("garbage", now()), None);
        assert_eq!(parse_set_cookie("=value", now()), None);
    }
}
