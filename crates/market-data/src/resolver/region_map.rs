//! ISO country code to region mappings.

use std::borrow::Cow;
use std::collections::HashMap;

pub const REGION_ASIA: &str = "Asia";
pub const REGION_EUROPE: &str = "Europe";
pub const REGION_NORTH_AMERICA: &str = "North America";
pub const REGION_OTHER: &str = "Other";

/// Maps a location code to a region label.
///
/// Implementations may return labels outside the four built-in regions; the
/// aggregator reports those as errors instead of counting them.
pub trait RegionLookup: Send + Sync {
    fn region_for(&self, location_code: &str) -> Cow<'static, str>;
}

const ASIA: &[&str] = &[
    "AE", "AF", "AM", "AZ", "BD", "BH", "BN", "BT", "CN", "CY", "GE", "HK", "ID", "IL", "IN",
    "IQ", "IR", "JO", "JP", "KG", "KH", "KP", "KR", "KW", "KZ", "LA", "LB", "LK", "MM", "MN",
    "MO", "MV", "MY", "NP", "OM", "PH", "PK", "PS", "QA", "SA", "SG", "SY", "TH", "TJ", "TL",
    "TM", "TR", "TW", "UZ", "VN", "YE",
];

const EUROPE: &[&str] = &[
    "AD", "AL", "AT", "AX", "BA", "BE", "BG", "BY", "CH", "CZ", "DE", "DK", "EE", "ES", "FI",
    "FO", "FR", "GB", "GG", "GI", "GR", "HR", "HU", "IE", "IM", "IS", "IT", "JE", "LI", "LT",
    "LU", "LV", "MC", "MD", "ME", "MK", "MT", "NL", "NO", "PL", "PT", "RO", "RS", "RU", "SE",
    "SI", "SJ", "SK", "SM", "UA", "VA", "XK",
];

const NORTH_AMERICA: &[&str] = &[
    "AG", "AI", "AW", "BB", "BL", "BM", "BQ", "BS", "BZ", "CA", "CR", "CU", "CW", "DM", "DO",
    "GD", "GL", "GP", "GT", "HN", "HT", "JM", "KN", "KY", "LC", "MF", "MQ", "MS", "MX", "NI",
    "PA", "PM", "PR", "SV", "SX", "TC", "TT", "US", "VC", "VG", "VI",
];

/// Static ISO 3166-1 alpha-2 → region table.
///
/// Codes are matched case-insensitively; anything not listed maps to
/// [`REGION_OTHER`].
pub struct RegionMap {
    regions: HashMap<&'static str, &'static str>,
}

impl Default for RegionMap {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionMap {
    /// Create a map with the default continent assignments.
    pub fn new() -> Self {
        let mut map = Self {
            regions: HashMap::new(),
        };
        map.add(ASIA, REGION_ASIA);
        map.add(EUROPE, REGION_EUROPE);
        map.add(NORTH_AMERICA, REGION_NORTH_AMERICA);
        map
    }

    fn add(&mut self, codes: &[&'static str], region: &'static str) {
        for code in codes {
            self.regions.insert(*code, region);
        }
    }
}

impl RegionLookup for RegionMap {
    fn region_for(&self, location_code: &str) -> Cow<'static, str> {
        let code = location_code.trim().to_ascii_uppercase();
        let region = self
            .regions
            .get(code.as_str())
            .copied()
            .unwrap_or(REGION_OTHER);
        Cow::Borrowed(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        let map = RegionMap::new();
        assert_eq!(map.region_for("CN"), REGION_ASIA);
        assert_eq!(map.region_for("DE"), REGION_EUROPE);
        assert_eq!(map.region_for("US"), REGION_NORTH_AMERICA);
        assert_eq!(map.region_for("CA"), REGION_NORTH_AMERICA);
    }

    #[test]
    fn test_case_and_whitespace() {
        let map = RegionMap::new();
        assert_eq!(map.region_for(" sg "), REGION_ASIA);
    }

    #[test]
    fn test_unlisted_codes_are_other() {
        let map = RegionMap::new();
        assert_eq!(map.region_for("BR"), REGION_OTHER);
        assert_eq!(map.region_for("AU"), REGION_OTHER);
        assert_eq!(map.region_for("ZZ"), REGION_OTHER);
        assert_eq!(map.region_for(""), REGION_OTHER);
    }

    #[test]
    fn test_tables_do_not_overlap() {
        for code in ASIA {
            assert!(!EUROPE.contains(code), "{} in Asia and Europe", code);
            assert!(!NORTH_AMERICA.contains(code), "{} in Asia and North America", code);
        }
        for code in EUROPE {
            assert!(!NORTH_AMERICA.contains(code), "{} in Europe and North America", code);
        }
    }
}
