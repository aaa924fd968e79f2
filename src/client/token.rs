use anyhow::Result;

use super::env::Environment;

/// Resolve the effective bearer token: persisted store first, then the
/// cookie entry. None means anonymous, which is a valid state and not
/// an error.
pub fn resolve_token(env: &dyn Environment) -> Option<String> {
    if let Some(token) = env.stored_token() {
        return Some(token);
    }
    let line = env.cookie_line()?;
    parse_cookie_token(&line)
}

/// Pull the `token=` entry out of a semicolon-delimited cookie line and
/// return its URL-decoded, trimmed value. Attribute entries like
/// `Max-Age=...` don't match. The first `token=` entry wins; an empty
/// value counts as absent.
pub fn parse_cookie_token(line: &str) -> Option<String> {
    for part in line.split(';') {
        let part = part.trim();
        let value = match part.strip_prefix("token=") {
            Some(value) => value,
            None => continue,
        };
        let value = match urlencoding::decode(value) {
            Ok(decoded) => decoded.trim().to_string(),
            Err(_) => value.trim().to_string(),
        };
        if value.is_empty() {
            return None;
        }
        return Some(value);
    }
    None
}

/// Make both credential slots agree before authenticated calls go out.
/// The persisted store wins when the two disagree, matching the resolver
/// precedence in [`resolve_token`].
pub fn sync_credentials(env: &dyn Environment) -> Result<()> {
    let stored = env.stored_token();
    let cookie = env.cookie_line().and_then(|line| parse_cookie_token(&line));

    match (stored, cookie) {
        (Some(token), None) => env.store_cookie_token(&token),
        (None, Some(token)) => env.store_token(&token),
        (Some(stored), Some(cookie)) if stored != cookie => env.store_cookie_token(&stored),
        _ => Ok(()),
    }
}
