//! App Store storefront catalog: region codes and display names.

use std::fmt;
use thiserror::Error;

/// One App Store storefront, keyed by its 2-letter country code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// 2-letter storefront code (upper case).
    pub code: &'static str,
    /// Human-readable country name.
    pub name: &'static str,
}

impl Region {
    /// Returns the full storefront catalog, in sweep order.
    pub fn all() -> &'static [Region] {
        CATALOG
    }

    /// Looks up a region by code, case-insensitively.
    pub fn find(code: &str) -> Option<&'static Region> {
        CATALOG.iter().find(|r| r.code.eq_ignore_ascii_case(code))
    }

    /// Parses a user-supplied region code, validating it against the catalog.
    pub fn parse(code: &str) -> Result<&'static Region, UnknownRegionError> {
        Self::find(code).ok_or_else(|| UnknownRegionError(code.to_string()))
    }

    /// Returns the storefront code lower-cased, as used in product page URLs.
    pub fn url_code(&self) -> String {
        self.code.to_lowercase()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// Raised when a region code is not in the storefront catalog.
#[derive(Debug, Clone, Error)]
#[error("Unknown region '{0}'. Use a 2-letter storefront code such as US, GB or DE.")]
pub struct UnknownRegionError(String);

const CATALOG: &[Region] = &[
    Region { code: "US", name: "United States" },
    Region { code: "CA", name: "Canada" },
    Region { code: "MX", name: "Mexico" },
    Region { code: "BR", name: "Brazil" },
    Region { code: "AR", name: "Argentina" },
    Region { code: "CL", name: "Chile" },
    Region { code: "CO", name: "Colombia" },
    Region { code: "PE", name: "Peru" },
    Region { code: "EC", name: "Ecuador" },
    Region { code: "UY", name: "Uruguay" },
    Region { code: "PY", name: "Paraguay" },
    Region { code: "BO", name: "Bolivia" },
    Region { code: "VE", name: "Venezuela" },
    Region { code: "CR", name: "Costa Rica" },
    Region { code: "PA", name: "Panama" },
    Region { code: "GT", name: "Guatemala" },
    Region { code: "HN", name: "Honduras" },
    Region { code: "SV", name: "El Salvador" },
    Region { code: "NI", name: "Nicaragua" },
    Region { code: "DO", name: "Dominican Republic" },
    Region { code: "JM", name: "Jamaica" },
    Region { code: "TT", name: "Trinidad and Tobago" },
    Region { code: "GB", name: "United Kingdom" },
    Region { code: "IE", name: "Ireland" },
    Region { code: "FR", name: "France" },
    Region { code: "DE", name: "Germany" },
    Region { code: "IT", name: "Italy" },
    Region { code: "ES", name: "Spain" },
    Region { code: "PT", name: "Portugal" },
    Region { code: "NL", name: "Netherlands" },
    Region { code: "BE", name: "Belgium" },
    Region { code: "LU", name: "Luxembourg" },
    Region { code: "AT", name: "Austria" },
    Region { code: "CH", name: "Switzerland" },
    Region { code: "DK", name: "Denmark" },
    Region { code: "SE", name: "Sweden" },
    Region { code: "NO", name: "Norway" },
    Region { code: "FI", name: "Finland" },
    Region { code: "IS", name: "Iceland" },
    Region { code: "PL", name: "Poland" },
    Region { code: "CZ", name: "Czechia" },
    Region { code: "SK", name: "Slovakia" },
    Region { code: "HU", name: "Hungary" },
    Region { code: "RO", name: "Romania" },
    Region { code: "BG", name: "Bulgaria" },
    Region { code: "GR", name: "Greece" },
    Region { code: "HR", name: "Croatia" },
    Region { code: "SI", name: "Slovenia" },
    Region { code: "EE", name: "Estonia" },
    Region { code: "LV", name: "Latvia" },
    Region { code: "LT", name: "Lithuania" },
    Region { code: "MT", name: "Malta" },
    Region { code: "CY", name: "Cyprus" },
    Region { code: "TR", name: "Turkey" },
    Region { code: "UA", name: "Ukraine" },
    Region { code: "IL", name: "Israel" },
    Region { code: "SA", name: "Saudi Arabia" },
    Region { code: "AE", name: "United Arab Emirates" },
    Region { code: "QA", name: "Qatar" },
    Region { code: "KW", name: "Kuwait" },
    Region { code: "BH", name: "Bahrain" },
    Region { code: "OM", name: "Oman" },
    Region { code: "EG", name: "Egypt" },
    Region { code: "ZA", name: "South Africa" },
    Region { code: "NG", name: "Nigeria" },
    Region { code: "KE", name: "Kenya" },
    Region { code: "GH", name: "Ghana" },
    Region { code: "IN", name: "India" },
    Region { code: "PK", name: "Pakistan" },
    Region { code: "LK", name: "Sri Lanka" },
    Region { code: "NP", name: "Nepal" },
    Region { code: "CN", name: "China mainland" },
    Region { code: "HK", name: "Hong Kong" },
    Region { code: "TW", name: "Taiwan" },
    Region { code: "JP", name: "Japan" },
    Region { code: "KR", name: "South Korea" },
    Region { code: "SG", name: "Singapore" },
    Region { code: "MY", name: "Malaysia" },
    Region { code: "TH", name: "Thailand" },
    Region { code: "VN", name: "Vietnam" },
    Region { code: "PH", name: "Philippines" },
    Region { code: "ID", name: "Indonesia" },
    Region { code: "KH", name: "Cambodia" },
    Region { code: "AU", name: "Australia" },
    Region { code: "NZ", name: "New Zealand" },
];
