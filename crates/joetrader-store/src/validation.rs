// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

const MAX_USERNAME_LEN: usize = 64;

/// Usernames become directory names, so they must stay a single plain path
/// segment. Returns the trimmed name.
pub fn validate_username(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        bail!("username must not be empty");
    }
    if name.chars().count() > MAX_USERNAME_LEN {
        bail!("username {name:?} is longer than {MAX_USERNAME_LEN} characters");
    }
    if name == "." || name == ".." {
        bail!("username {name:?} is reserved; pick another name");
    }
    if name.contains(['/', '\\']) {
        bail!("username {name:?} contains a path separator; use letters, digits, '-' or '_'");
    }
    if name.chars().any(char::is_control) {
        bail!("username {name:?} contains control characters");
    }
    Ok(name.to_owned())
}

#[cfg(test)]
mod tests {
    use super::validate_username;

    #[test]
    fn accepts_plain_names_and_trims() {
        assert_eq!(validate_username("  duke_fan ").ok().as_deref(), Some("duke_fan"));
        assert!(validate_username("Lady Jaye").is_ok());
    }

    #[test]
    fn rejects_names_that_escape_the_users_directory() {
        for bad in ["", "   ", "..", ".", "a/b", "a\\b", "tab\there"] {
            assert!(validate_username(bad).is_err(), "{bad:?} should be rejected");
        }
        assert!(validate_username(&"x".repeat(65)).is_err());
    }
}
