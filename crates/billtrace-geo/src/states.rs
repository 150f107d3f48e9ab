//! US state abbreviation expansion.
//!
//! IP geolocation providers commonly report the 2-letter USPS code in
//! their region field. The resolver expands those to full names exactly
//! once, after whichever provider succeeds; anything that is not a known
//! 2-letter code passes through unchanged (non-US regions, already-full
//! names, free-form strings).

/// The 50 US states plus the District of Columbia.
const US_STATES: [(&str, &str); 51] = [
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Expand a 2-letter US state/DC abbreviation to the full name.
///
/// Unrecognized regions pass through unchanged.
#[must_use]
pub fn normalize_region(region: &str) -> String {
    let trimmed = region.trim();
    if trimmed.len() == 2 {
        for (code, name) in US_STATES {
            if code.eq_ignore_ascii_case(trimmed) {
                return name.to_string();
            }
        }
    }
    region.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_known_abbreviations() {
        assert_eq!(normalize_region("CA"), "California");
        assert_eq!(normalize_region("NY"), "New York");
        assert_eq!(normalize_region("DC"), "District of Columbia");
    }

    #[test]
    fn is_case_insensitive() {
        assert_eq!(normalize_region("tx"), "Texas");
        assert_eq!(normalize_region("Wa"), "Washington");
    }

    #[test]
    fn unrecognized_regions_pass_through() {
        assert_eq!(normalize_region("Texas"), "Texas");
        assert_eq!(normalize_region("Ontario"), "Ontario");
        assert_eq!(normalize_region("ZZ"), "ZZ");
        assert_eq!(normalize_region(""), "");
    }
}
