//! Token extraction for the metrics aggregator
//!
//! - [`minute_bucket`]: timestamp truncated to minute resolution
//! - [`error_code`]: first HTTP-style status token in a message
//! - [`source_address`]: first IP address token in a message
//!
//! None of these fail; an unrecognized input yields the `unknown` bucket or
//! no token at all.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use chrono::{DateTime, NaiveDateTime};

use crate::models::UNKNOWN_BUCKET;

const BUCKET_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Date-bearing layouts tried in order (after RFC 3339)
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S%.f",
];

/// Apache/nginx access-log layout: `03/Aug/2025:12:45:12 +0000`
const CLF_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

const ADDRESS_SEPARATORS: &[char] = &['"', '\'', '(', ')', '[', ']', '<', '>', ',', ';', '='];

/// Minute bucket key for a raw timestamp.
///
/// Date-bearing timestamps normalize to `YYYY-MM-DD HH:MM` using the wall-clock
/// fields as written (offsets are not applied). Timestamps without a date but
/// with an `HH:MM:SS` clock keep their text up to the minute, so syslog's
/// `Aug  3 12:45:12` becomes `Aug  3 12:45`. Anything else is `unknown`.
pub fn minute_bucket(timestamp: &str) -> String {
    let ts = timestamp.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return dt.naive_local().format(BUCKET_FORMAT).to_string();
    }
    if let Ok(dt) = DateTime::parse_from_str(ts, CLF_FORMAT) {
        return dt.naive_local().format(BUCKET_FORMAT).to_string();
    }
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(ts, format) {
            return dt.format(BUCKET_FORMAT).to_string();
        }
    }

    match find_clock(ts) {
        Some(seconds_colon) => ts[..seconds_colon].trim_end().to_string(),
        None => UNKNOWN_BUCKET.to_string(),
    }
}

/// Byte offset of the `:SS` colon in the first `HH:MM:SS` run
fn find_clock(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.len() < 8 {
        return None;
    }
    (0..=bytes.len() - 8).find_map(|i| {
        let w = &bytes[i..i + 8];
        let digits = [0, 1, 3, 4, 6, 7].iter().all(|&j| w[j].is_ascii_digit());
        let starts_clean = i == 0 || !bytes[i - 1].is_ascii_digit();
        (digits && w[2] == b':' && w[5] == b':' && starts_clean).then_some(i + 5)
    })
}

/// Status code of an HTTP log message.
///
/// Only messages mentioning `HTTP` carry one. The code is the first
/// whitespace-delimited token made of exactly three ASCII digits, so request
/// ids, ports and durations in other messages never count.
pub fn error_code(message: &str) -> Option<&str> {
    if !message.contains("HTTP") {
        return None;
    }
    message
        .split_whitespace()
        .find(|token| token.len() == 3 && token.bytes().all(|b| b.is_ascii_digit()))
}

/// First source address in a message: IPv4, IPv4 with `:port`, or IPv6.
///
/// Returned in canonical form, so `010.0.0.1`-style spellings are rejected
/// and IPv6 is compressed.
pub fn source_address(message: &str) -> Option<String> {
    message
        .split(|c: char| c.is_whitespace() || ADDRESS_SEPARATORS.contains(&c))
        .map(|token| token.trim_end_matches(['.', ':']))
        .find_map(parse_address)
        .map(|ip| ip.to_string())
}

fn parse_address(token: &str) -> Option<IpAddr> {
    if token.is_empty() {
        return None;
    }
    if let Ok(v4) = token.parse::<Ipv4Addr>() {
        return Some(IpAddr::V4(v4));
    }
    if let Some((host, port)) = token.rsplit_once(':') {
        if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(v4) = host.parse::<Ipv4Addr>() {
                return Some(IpAddr::V4(v4));
            }
        }
    }
    if token.matches(':').count() >= 2 {
        if let Ok(v6) = token.parse::<Ipv6Addr>() {
            return Some(IpAddr::V6(v6));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_iso_forms_agree() {
        for ts in [
            "2025-08-03 12:45:12",
            "2025-08-03T12:45:59",
            "2025-08-03 12:45:12.123",
            "2025-08-03T12:45:12Z",
            "2025-08-03T12:45:12.5+02:00",
            "2025/08/03 12:45:00",
            "03/Aug/2025:12:45:12 +0000",
        ] {
            assert_eq!(minute_bucket(ts), "2025-08-03 12:45", "timestamp {ts}");
        }
    }

    #[test]
    fn test_bucket_keeps_wall_clock_of_offset_timestamps() {
        assert_eq!(minute_bucket("2025-08-03T23:59:00-05:00"), "2025-08-03 23:59");
    }

    #[test]
    fn test_bucket_syslog_fallback() {
        assert_eq!(minute_bucket("Aug  3 12:45:12"), "Aug  3 12:45");
        assert_eq!(minute_bucket("12:45:12"), "12:45");
        assert_eq!(minute_bucket("Sun Aug 3 12:45:12 2025"), "Sun Aug 3 12:45");
    }

    #[test]
    fn test_bucket_unknown() {
        assert_eq!(minute_bucket(""), UNKNOWN_BUCKET);
        assert_eq!(minute_bucket("yesterday"), UNKNOWN_BUCKET);
        assert_eq!(minute_bucket("12:45"), UNKNOWN_BUCKET);
        assert_eq!(minute_bucket("1712:45:12"), UNKNOWN_BUCKET);
    }

    #[test]
    fn test_error_code() {
        assert_eq!(error_code("GET /index.html HTTP/1.1 404 512"), Some("404"));
        assert_eq!(error_code("HTTP 502 from upstream"), Some("502"));
        assert_eq!(error_code("HTTP status=500"), None);
        assert_eq!(error_code("HTTP took 1234 ms"), None);
        assert_eq!(error_code("HTTP upstream returned (502)"), None);
        assert_eq!(error_code("HTTP no numbers here"), None);
    }

    #[test]
    fn test_error_code_needs_http_context() {
        assert_eq!(error_code("request 123 failed with 500"), None);
        assert_eq!(error_code("listening on port 443"), None);
        assert_eq!(error_code("request 123 failed HTTP 500"), Some("123"));
    }

    #[test]
    fn test_error_code_first_match_wins() {
        assert_eq!(error_code("HTTP 200 then 503"), Some("200"));
    }

    #[test]
    fn test_source_address_ipv4() {
        assert_eq!(
            source_address("Failed password from 192.168.1.20 port 22"),
            Some("192.168.1.20".to_string())
        );
        assert_eq!(
            source_address("client=(10.0.0.7:51234) connected"),
            Some("10.0.0.7".to_string())
        );
        assert_eq!(
            source_address("ip=172.16.0.1, user=bob"),
            Some("172.16.0.1".to_string())
        );
        assert_eq!(
            source_address("request from 8.8.8.8."),
            Some("8.8.8.8".to_string())
        );
    }

    #[test]
    fn test_source_address_rejects_non_addresses() {
        assert_eq!(source_address("version 1.2.3 released"), None);
        assert_eq!(source_address("value 300.1.1.1"), None);
        assert_eq!(source_address("at 12:45:12 sharp"), None);
        assert_eq!(source_address(""), None);
    }

    #[test]
    fn test_source_address_ipv6() {
        assert_eq!(
            source_address("peer [2001:db8:0:0:0:0:0:1] reset"),
            Some("2001:db8::1".to_string())
        );
        assert_eq!(source_address("from ::1 local"), Some("::1".to_string()));
    }
}
