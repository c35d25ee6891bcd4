//! Registry of known protocol versions.
//!
//! Proxy platforms map each backend server to the protocol it speaks. Users
//! tend to write release names (`"1.16.4"`) rather than numeric protocol
//! ids (`754`), so normalisation resolves free-text labels against this
//! table via [`ProtocolVersion::closest`].
//!
//! The table is sorted by release (and therefore by id) ascending.

use std::cmp::Ordering;
use std::fmt;

/// A released protocol: numeric id plus the release name it shipped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolVersion {
    pub id: i32,
    pub name: &'static str,
}

const fn v(id: i32, name: &'static str) -> ProtocolVersion {
    ProtocolVersion { id, name }
}

static KNOWN: &[ProtocolVersion] = &[
    v(47, "1.8"),
    v(107, "1.9"),
    v(108, "1.9.1"),
    v(109, "1.9.2"),
    v(110, "1.9.3"),
    v(210, "1.10"),
    v(315, "1.11"),
    v(316, "1.11.1"),
    v(335, "1.12"),
    v(338, "1.12.1"),
    v(340, "1.12.2"),
    v(393, "1.13"),
    v(401, "1.13.1"),
    v(404, "1.13.2"),
    v(477, "1.14"),
    v(480, "1.14.1"),
    v(485, "1.14.2"),
    v(490, "1.14.3"),
    v(498, "1.14.4"),
    v(573, "1.15"),
    v(575, "1.15.1"),
    v(578, "1.15.2"),
    v(735, "1.16"),
    v(736, "1.16.1"),
    v(751, "1.16.2"),
    v(753, "1.16.3"),
    v(754, "1.16.4"),
];

impl ProtocolVersion {
    /// Every known version, oldest first.
    pub fn all() -> &'static [ProtocolVersion] {
        KNOWN
    }

    /// The oldest known version.
    pub fn lowest() -> ProtocolVersion {
        KNOWN[0]
    }

    /// The newest known version.
    pub fn highest() -> ProtocolVersion {
        KNOWN[KNOWN.len() - 1]
    }

    /// Looks up a version by numeric protocol id.
    pub fn by_id(id: i32) -> Option<ProtocolVersion> {
        KNOWN.iter().copied().find(|p| p.id == id)
    }

    /// Resolves a free-text label to the nearest known version.
    ///
    /// In order of precedence:
    ///
    /// 1. an exact release name (`"1.12.2"`);
    /// 2. a family wildcard (`"1.14.x"`) resolves to the newest release in
    ///    that family;
    /// 3. a numeric string equal to a known id (`"340"`);
    /// 4. a dotted release number resolves to the newest known release not
    ///    newer than it within the same `major.minor` family, so `"1.16.5"`
    ///    maps to `1.16.4` but `"1.7.10"` maps to nothing.
    ///
    /// Returns `None` when nothing matches.
    pub fn closest(label: &str) -> Option<ProtocolVersion> {
        let label = label.trim();

        if let Some(exact) = KNOWN.iter().copied().find(|p| p.name == label) {
            return Some(exact);
        }

        if let Some(family) = label.strip_suffix(".x") {
            let prefix = format!("{family}.");
            return KNOWN
                .iter()
                .copied()
                .filter(|p| p.name == family || p.name.starts_with(&prefix))
                .last();
        }

        if let Ok(id) = label.parse::<i32>() {
            return Self::by_id(id);
        }

        let wanted = release_components(label)?;
        let mut best = None;
        for known in KNOWN {
            let Some(have) = release_components(known.name) else {
                continue;
            };
            if have[..2] != wanted[..2] {
                continue;
            }
            match have.cmp(&wanted) {
                Ordering::Less | Ordering::Equal => best = Some(*known),
                Ordering::Greater => break,
            }
        }
        best
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Parses `"1.16.4"` into `[1, 16, 4]`; a missing patch number is zero.
fn release_components(name: &str) -> Option<[u32; 3]> {
    let mut parts = name.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = match parts.next() {
        Some(p) => p.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }
    Some([major, minor, patch])
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_versions_are_sorted_by_id() {
        for pair in KNOWN.windows(2) {
            assert!(pair[0].id < pair[1].id, "{} must precede {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_closest_exact_name() {
        assert_eq!(ProtocolVersion::closest("1.16.4").map(|p| p.id), Some(754));
        assert_eq!(ProtocolVersion::closest(" 1.8 ").map(|p| p.id), Some(47));
    }

    #[test]
    fn test_closest_family_wildcard_picks_newest_in_family() {
        assert_eq!(ProtocolVersion::closest("1.14.x").map(|p| p.id), Some(498));
        assert_eq!(ProtocolVersion::closest("1.10.x").map(|p| p.id), Some(210));
    }

    #[test]
    fn test_closest_numeric_id_string() {
        assert_eq!(ProtocolVersion::closest("340").map(|p| p.name), Some("1.12.2"));
        assert!(ProtocolVersion::closest("12345").is_none());
    }

    #[test]
    fn test_closest_floors_unknown_patch_within_family() {
        // Arrange: 1.9.4 shares a protocol with 1.9.3; 1.16.5 with 1.16.4
        // Act / Assert
        assert_eq!(ProtocolVersion::closest("1.9.4").map(|p| p.id), Some(110));
        assert_eq!(ProtocolVersion::closest("1.16.5").map(|p| p.id), Some(754));
        assert_eq!(ProtocolVersion::closest("1.8.9").map(|p| p.id), Some(47));
    }

    #[test]
    fn test_closest_rejects_unknown_family_and_garbage() {
        assert!(ProtocolVersion::closest("1.7.10").is_none());
        assert!(ProtocolVersion::closest("1.17").is_none());
        assert!(ProtocolVersion::closest("not-a-version").is_none());
        assert!(ProtocolVersion::closest("").is_none());
    }

    #[test]
    fn test_lowest_and_highest() {
        assert_eq!(ProtocolVersion::lowest().id, 47);
        assert_eq!(ProtocolVersion::highest().id, 754);
    }
}
