pub const DEFAULT_PROVIDER_HOST: &str = "hypestat.com";

/// Statistics page for `domain` on `host`.
///
/// The domain is interpolated verbatim: no URL-encoding and no validation.
/// Inputs containing `/`, `?`, `#` or spaces yield a malformed or different
/// request. A `host` that already carries a scheme is used as-is.
pub fn target_url(host: &str, domain: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{}/info/{}", host, domain)
    } else {
        format!("https://{}/info/{}", host, domain)
    }
}

/// Domains from line-delimited text: lines trimmed, blank lines dropped.
pub fn parse_domain_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_provider_url() {
        assert_eq!(
            target_url(DEFAULT_PROVIDER_HOST, "google.com"),
            "https://hypestat.com/info/google.com"
        );
        assert_eq!(
            target_url("http://127.0.0.1:8080/", "a.com"),
            "http://127.0.0.1:8080/info/a.com"
        );
    }

    #[test]
    fn domain_is_not_encoded() {
        assert_eq!(
            target_url("hypestat.com", "a b.com/x?y"),
            "https://hypestat.com/info/a b.com/x?y"
        );
    }

    #[test]
    fn parses_lines() {
        let domains = parse_domain_lines("google.com\n\n  detik.com  \r\n\t\nkompas.com");
        assert_eq!(domains, vec!["google.com", "detik.com", "kompas.com"]);
    }
}
