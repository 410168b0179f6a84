//! Query-string and cookie lookups. Values come back raw, without
//! percent-decoding.

/// First `key=value` pair in `a=b&c=d` whose key matches exactly.
pub fn query_get<'a>(query: &'a str, key: &str) -> Option<&'a str> {
    query
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

/// First cookie in a `Cookie: a=b; c=d` header whose name matches exactly.
pub fn cookie_get<'a>(header: &'a str, key: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|part| part.trim_start().split_once('='))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_lookup() {
        assert_eq!(query_get("a=1&b=2&a=3", "a"), Some("1"));
        assert_eq!(query_get("a=1&b=2", "b"), Some("2"));
        assert_eq!(query_get("flag&b=2", "flag"), Some(""));
        assert_eq!(query_get("a=1", "A"), None);
        assert_eq!(query_get("", "a"), None);
        assert_eq!(query_get("q=a%20b", "q"), Some("a%20b"));
    }

    #[test]
    fn cookie_lookup() {
        assert_eq!(cookie_get("sid=abc; theme=dark", "theme"), Some("dark"));
        assert_eq!(cookie_get("sid=abc;theme=dark", "sid"), Some("abc"));
        assert_eq!(cookie_get("sid=abc", "si"), None);
        assert_eq!(cookie_get("", "sid"), None);
        assert_eq!(cookie_get("t=a=b", "t"), Some("a=b"));
    }
}
