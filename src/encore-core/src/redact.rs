//! Redaction of secret-bearing request parameters before logging.
//!
//! Scrobble API requests carry the API key, signature, session key, and (for
//! authentication) the account password as plain query/form parameters, so any
//! request that gets logged must pass through here first.

use std::borrow::Cow;

/// Parameter names whose values must never reach a log line.
const SENSITIVE_PARAMS: &[&str] = &["api_key", "api_sig", "sk", "password", "authToken", "token"];

/// Redact known secret-bearing `name=value` pairs from a string.
pub fn redact_params(input: &str) -> Cow<'_, str> {
    let needs_work = SENSITIVE_PARAMS
        .iter()
        .any(|name| input.contains(&format!("{name}=")));
    if !needs_work {
        return Cow::Borrowed(input);
    }

    let mut result = input.to_owned();
    for name in SENSITIVE_PARAMS {
        result = redact_value(&result, name);
    }
    Cow::Owned(result)
}

fn redact_value(input: &str, name: &str) -> String {
    let pattern = format!("{name}=");
    let mut result = String::with_capacity(input.len());
    let mut remaining = input;

    while let Some(pos) = remaining.find(&pattern) {
        // Only match at the start of a parameter, not inside another name.
        let at_boundary = pos == 0
            || matches!(
                remaining.as_bytes()[pos - 1],
                b'?' | b'&' | b' ' | b'\t' | b'\n'
            );
        let after = pos + pattern.len();
        if !at_boundary {
            result.push_str(&remaining[..after]);
            remaining = &remaining[after..];
            continue;
        }

        result.push_str(&remaining[..after]);
        result.push_str("[REDACTED]");
        let rest = &remaining[after..];
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '&')
            .unwrap_or(rest.len());
        remaining = &rest[end..];
    }

    result.push_str(remaining);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_session_key() {
        let input = "method=track.scrobble&sk=abcdef123456&artist%5B0%5D=X";
        let output = redact_params(input);
        assert!(!output.contains("abcdef123456"));
        assert!(output.contains("sk=[REDACTED]"));
        assert!(output.contains("artist%5B0%5D=X"));
    }

    #[test]
    fn redacts_password_and_signature() {
        let input = "username=u&password=hunter2&api_sig=deadbeef";
        let output = redact_params(input);
        assert!(!output.contains("hunter2"));
        assert!(!output.contains("deadbeef"));
    }

    #[test]
    fn leaves_clean_strings_borrowed() {
        let input = "method=track.search&artist=Low&track=Especially Me";
        assert!(matches!(redact_params(input), Cow::Borrowed(_)));
    }

    #[test]
    fn does_not_match_inside_other_names() {
        let input = "not_a_token=visible&token=secret";
        let output = redact_params(input);
        assert!(output.contains("not_a_token=visible"));
        assert!(output.contains("token=[REDACTED]"));
    }
}
