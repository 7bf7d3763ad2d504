//! Input validation functions
//!
//! Field-level checks live on the request types as `validator` derives.
//! The functions here cover rules a derive cannot express.

use crate::types::BoundingBox;
use regex_lite::Regex;
use std::sync::OnceLock;

fn username_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.\-]{3,64}$").expect("username pattern is valid"))
}

/// Validate username format
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username cannot be empty".to_string());
    }
    if !username_pattern().is_match(username) {
        return Err(
            "Username must be 3-64 characters of letters, digits, '.', '_' or '-'".to_string(),
        );
    }
    Ok(())
}

/// Validate longitude in degrees
pub fn validate_longitude(lon: f64) -> Result<(), String> {
    if !lon.is_finite() {
        return Err("Longitude must be a valid number".to_string());
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err("Longitude must be between -180 and 180".to_string());
    }
    Ok(())
}

/// Validate latitude in degrees
pub fn validate_latitude(lat: f64) -> Result<(), String> {
    if !lat.is_finite() {
        return Err("Latitude must be a valid number".to_string());
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err("Latitude must be between -90 and 90".to_string());
    }
    Ok(())
}

/// Validate a bounding box: coordinates in range and a non-empty area
pub fn validate_bounds(bbox: &BoundingBox) -> Result<(), String> {
    validate_longitude(bbox.west)?;
    validate_longitude(bbox.east)?;
    validate_latitude(bbox.south)?;
    validate_latitude(bbox.north)?;

    if bbox.west >= bbox.east {
        return Err("West bound must be less than east bound".to_string());
    }
    if bbox.south >= bbox.north {
        return Err("South bound must be less than north bound".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("alice", true)]
    #[case("bob.smith", true)]
    #[case("user_01-x", true)]
    #[case("ab", false)]
    #[case("", false)]
    #[case("has space", false)]
    #[case("émile", false)]
    fn test_validate_username(#[case] username: &str, #[case] valid: bool) {
        assert_eq!(validate_username(username).is_ok(), valid);
    }

    #[test]
    fn test_validate_bounds() {
        let valid = BoundingBox::from_array([72.8, 18.9, 73.0, 19.1]);
        assert!(validate_bounds(&valid).is_ok());

        let inverted = BoundingBox::from_array([73.0, 18.9, 72.8, 19.1]);
        assert!(validate_bounds(&inverted).is_err());

        let out_of_range = BoundingBox::from_array([72.8, 18.9, 190.0, 19.1]);
        assert!(validate_bounds(&out_of_range).is_err());

        let nan = BoundingBox::from_array([f64::NAN, 18.9, 73.0, 19.1]);
        assert!(validate_bounds(&nan).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_valid_longitude_range(lon in -180.0f64..=180.0) {
            prop_assert!(validate_longitude(lon).is_ok());
        }

        #[test]
        fn prop_invalid_latitude_above_max(lat in 90.001f64..1000.0) {
            prop_assert!(validate_latitude(lat).is_err());
        }

        #[test]
        fn prop_username_charset_accepted(username in "[A-Za-z0-9_.-]{3,64}") {
            prop_assert!(validate_username(&username).is_ok());
        }
    }
}
