//! User agent handling for HTTP requests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::DEFAULT_USER_AGENT;

/// Real browser user agents for impersonate mode.
pub const IMPERSONATE_USER_AGENTS: &[&str] = &[
    // Chrome on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    // Chrome on Mac
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    // Firefox on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
    // Safari on iPhone (many local sites serve a lighter mobile layout)
    "Mozilla/5.0 (iPhone; CPU iPhone OS 18_1 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/18.1 Mobile/15E148 Safari/604.1",
    // Edge on Windows
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36 Edg/131.0.0.0",
];

static NEXT_AGENT: AtomicUsize = AtomicUsize::new(0);

/// Next impersonation user agent; successive clients take successive entries.
pub fn rotating_user_agent() -> &'static str {
    let i = NEXT_AGENT.fetch_add(1, Ordering::Relaxed);
    IMPERSONATE_USER_AGENTS[i % IMPERSONATE_USER_AGENTS.len()]
}

/// Resolve user agent from config value.
/// - None or empty => default desktop user agent
/// - "impersonate" => next real browser user agent in rotation
/// - other => custom user agent string
pub fn resolve_user_agent(config: Option<&str>) -> String {
    match config.map(str::trim) {
        None | Some("") => DEFAULT_USER_AGENT.to_string(),
        Some("impersonate") => rotating_user_agent().to_string(),
        Some(custom) => custom.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_user_agent_default() {
        assert_eq!(resolve_user_agent(None), DEFAULT_USER_AGENT);
        assert_eq!(resolve_user_agent(Some("  ")), DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_resolve_user_agent_impersonate() {
        let ua = resolve_user_agent(Some("impersonate"));
        assert!(IMPERSONATE_USER_AGENTS.contains(&ua.as_str()));
    }

    #[test]
    fn test_resolve_user_agent_custom() {
        assert_eq!(resolve_user_agent(Some("KazokuBot/1.0")), "KazokuBot/1.0");
    }

    #[test]
    fn test_impersonation_rotates() {
        let picked: std::collections::HashSet<&str> = (0..IMPERSONATE_USER_AGENTS.len())
            .map(|_| rotating_user_agent())
            .collect();
        assert!(picked.len() > 1);
        assert!(picked.iter().all(|ua| IMPERSONATE_USER_AGENTS.contains(ua)));
    }
}
