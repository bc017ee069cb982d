use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Version reported by `exiftool -ver`, e.g. `12.40`.
///
/// Keeps the trimmed text as printed and compares by its dot-separated numeric
/// components, so `9.36 < 12.4`.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Version {
    raw: String,
    #[serde(skip)]
    components: Vec<u32>,
}

impl Version {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into().trim().to_string();
        let components = raw
            .split('.')
            .map_while(|part| {
                let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().ok()
            })
            .collect();
        Self { raw, components }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Numeric components; empty when the text does not start with a number.
    pub fn components(&self) -> &[u32] {
        &self.components
    }

    pub fn at_least(&self, other: &str) -> bool {
        self.cmp_components(&Version::new(other)).is_ge()
    }

    fn cmp_components(&self, other: &Version) -> Ordering {
        let len = self.components.len().max(other.components.len());
        let pad = |v: &[u32], i: usize| v.get(i).copied().unwrap_or(0);
        (0..len)
            .map(|i| pad(&self.components, i).cmp(&pad(&other.components, i)))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_components(other)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialEq<str> for Version {
    fn eq(&self, other: &str) -> bool {
        self.raw == other
    }
}

impl PartialEq<&str> for Version {
    fn eq(&self, other: &&str) -> bool {
        self.raw == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_components() {
        let v = Version::new(" 12.40\n");
        assert_eq!(v.as_str(), "12.40");
        assert_eq!(v.components(), &[12, 40]);
        assert_eq!(v, "12.40");

        let odd = Version::new("13.01-beta");
        assert_eq!(odd.components(), &[13, 1]);

        assert!(Version::new("unknown").components().is_empty());
    }

    #[test]
    fn test_ordering() {
        assert!(Version::new("9.36") < Version::new("12.4"));
        assert!(Version::new("12.40") > Version::new("12.4"));
        assert!(Version::new("8.36").at_least("8.36"));
        assert!(!Version::new("8.35").at_least("8.36"));
        assert!(Version::new("12.4").at_least("12.4.0"));
    }
}
