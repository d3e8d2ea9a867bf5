//! Zone and nameserver names.
//!
//! Both are normalized on construction (trimmed, lower-cased, trailing dot)
//! so that sets of names compare the way the DNS compares them.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use hickory_proto::rr::Name;

use crate::config::{MAX_LABEL_LENGTH, MAX_NAME_LENGTH};
use crate::error_handling::ZoneError;

/// A fully-qualified, lower-cased zone name ending in a dot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Zone(String);

impl Zone {
    /// The root zone (`.`).
    pub fn root() -> Self {
        Zone(".".to_string())
    }

    /// Validates and normalizes a zone name.
    ///
    /// `Example.COM` and `example.com.` both become `example.com.`.
    ///
    /// # Errors
    ///
    /// Returns a [`ZoneError`] for empty names, empty labels, over-long labels
    /// or names, and characters outside letters, digits, `-`, `_` and `*`.
    pub fn new(name: &str) -> Result<Self, ZoneError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ZoneError::Empty);
        }
        if trimmed == "." {
            return Ok(Self::root());
        }

        let lowered = trimmed.to_ascii_lowercase();
        let body = lowered.strip_suffix('.').unwrap_or(&lowered);
        if body.len() > MAX_NAME_LENGTH {
            return Err(ZoneError::NameTooLong(trimmed.to_string()));
        }

        for label in body.split('.') {
            if label.is_empty() {
                return Err(ZoneError::EmptyLabel(trimmed.to_string()));
            }
            if label.len() > MAX_LABEL_LENGTH {
                return Err(ZoneError::LabelTooLong {
                    name: trimmed.to_string(),
                    label: label.to_string(),
                });
            }
            if !label
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'*'))
            {
                return Err(ZoneError::InvalidCharacter(trimmed.to_string()));
            }
        }

        Ok(Zone(format!("{body}.")))
    }

    /// The normalized name, with trailing dot.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the zone, returning the normalized name.
    pub fn into_string(self) -> String {
        self.0
    }

    /// True for `.`.
    pub fn is_root(&self) -> bool {
        self.0 == "."
    }

    /// Number of labels, not counting the root. `example.com.` has 2.
    pub fn label_count(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.0.trim_end_matches('.').split('.').count()
        }
    }

    /// The enclosing zone: the name with its leftmost label removed.
    ///
    /// Single-label names (and the root itself) have the root as parent.
    pub fn parent(&self) -> Zone {
        match self.0.split_once('.') {
            Some((_, rest)) if !rest.is_empty() => Zone(rest.to_string()),
            _ => Zone::root(),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Zone {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Zone::new(s)
    }
}

/// A DNS server: either a hostname (normalized like a [`Zone`]) or a literal
/// IPv4/IPv6 address.
///
/// Ordering is plain string ordering, which keeps sets of nameservers and
/// therefore reports deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nameserver(String);

impl Nameserver {
    /// # Errors
    ///
    /// Returns a [`ZoneError`] when the value is neither an IP address nor a
    /// valid hostname.
    pub fn new(value: &str) -> Result<Self, ZoneError> {
        let trimmed = value.trim();
        if let Ok(ip) = trimmed.parse::<IpAddr>() {
            return Ok(Nameserver(ip.to_string()));
        }
        Zone::new(trimmed).map(|zone| Nameserver(zone.into_string()))
    }

    /// Builds a nameserver from a name found in a DNS message.
    pub fn from_name(name: &Name) -> Self {
        let mut ascii = name.to_lowercase().to_ascii();
        if !ascii.ends_with('.') {
            ascii.push('.');
        }
        Nameserver(ascii)
    }

    /// The literal address, when this nameserver was given as an IP.
    pub fn ip(&self) -> Option<IpAddr> {
        self.0.parse().ok()
    }

    /// Hostname with trailing dot, or the address literal.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the nameserver, returning [`Nameserver::as_str`] owned.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Nameserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Nameserver {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Nameserver::new(s)
    }
}
