//! Scaling bounds from node-group annotations
//!
//! The minimum is fully resolved (presence, integer parse, sign) before the
//! maximum is read, so a group with neither annotation reports a missing
//! minimum.

use crate::error::{Bound, BoundsError, InvalidBound};
use crate::keys::AnnotationKeys;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minimum and maximum replica counts for a node group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalingBounds {
    pub min: i32,
    pub max: i32,
}

/// Read and validate the min/max size annotations
pub fn parse_scaling_bounds(
    keys: &AnnotationKeys,
    annotations: &BTreeMap<String, String>,
) -> Result<ScalingBounds, BoundsError> {
    let min = parse_bound(annotations, &keys.node_group_min_size, Bound::Min)?;
    let max = parse_bound(annotations, &keys.node_group_max_size, Bound::Max)?;

    if max < min {
        return Err(BoundsError::Invalid {
            bound: Bound::Max,
            reason: InvalidBound::BelowMinimum { min, max },
        });
    }

    Ok(ScalingBounds { min, max })
}

fn parse_bound(
    annotations: &BTreeMap<String, String>,
    key: &str,
    bound: Bound,
) -> Result<i32, BoundsError> {
    let raw = annotations.get(key).ok_or(BoundsError::Missing(bound))?;

    let invalid = |reason| BoundsError::Invalid { bound, reason };

    let wide: i64 = raw.parse().map_err(|_| {
        invalid(InvalidBound::NotAnInteger {
            key: key.to_string(),
            value: raw.clone(),
        })
    })?;
    let value = i32::try_from(wide).map_err(|_| {
        invalid(InvalidBound::OutOfRange {
            key: key.to_string(),
            value: raw.clone(),
        })
    })?;

    if value < 0 {
        return Err(BoundsError::Invalid {
            bound,
            reason: InvalidBound::Negative(value),
        });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotations(min: Option<&str>, max: Option<&str>) -> BTreeMap<String, String> {
        let keys = AnnotationKeys::default();
        let mut map = BTreeMap::new();
        if let Some(v) = min {
            map.insert(keys.node_group_min_size.clone(), v.to_string());
        }
        if let Some(v) = max {
            map.insert(keys.node_group_max_size.clone(), v.to_string());
        }
        map
    }

    fn parse(min: Option<&str>, max: Option<&str>) -> Result<ScalingBounds, BoundsError> {
        parse_scaling_bounds(&AnnotationKeys::default(), &annotations(min, max))
    }

    #[test]
    fn test_valid_bounds() {
        assert_eq!(
            parse(Some("1"), Some("10")).unwrap(),
            ScalingBounds { min: 1, max: 10 }
        );
        assert_eq!(
            parse(Some("0"), Some("0")).unwrap(),
            ScalingBounds { min: 0, max: 0 }
        );
    }

    #[test]
    fn test_round_trip_valid_pairs() {
        for (min, max) in [(0, 0), (0, 1), (1, 1), (3, 7), (5, 100), (0, i32::MAX)] {
            let bounds = parse(Some(&min.to_string()), Some(&max.to_string())).unwrap();
            assert_eq!(bounds, ScalingBounds { min, max });
        }
    }

    #[test]
    fn test_missing_both_reports_min_first() {
        assert_eq!(parse(None, None), Err(BoundsError::Missing(Bound::Min)));
    }

    #[test]
    fn test_missing_min_takes_precedence_over_invalid_max() {
        assert_eq!(
            parse(None, Some("abc")),
            Err(BoundsError::Missing(Bound::Min))
        );
    }

    #[test]
    fn test_missing_max() {
        let err = parse(Some("1"), None).unwrap_err();
        assert_eq!(err, BoundsError::Missing(Bound::Max));
        assert!(err.is_missing());
    }

    #[test]
    fn test_max_below_min() {
        assert_eq!(
            parse(Some("3"), Some("1")),
            Err(BoundsError::Invalid {
                bound: Bound::Max,
                reason: InvalidBound::BelowMinimum { min: 3, max: 1 },
            })
        );
    }

    #[test]
    fn test_negative_min() {
        assert_eq!(
            parse(Some("-1"), Some("5")),
            Err(BoundsError::Invalid {
                bound: Bound::Min,
                reason: InvalidBound::Negative(-1),
            })
        );
    }

    #[test]
    fn test_negative_min_checked_before_max_presence() {
        let err = parse(Some("-1"), None).unwrap_err();
        assert_eq!(err.bound(), Bound::Min);
        assert!(!err.is_missing());
    }

    #[test]
    fn test_negative_max() {
        assert_eq!(
            parse(Some("0"), Some("-2")),
            Err(BoundsError::Invalid {
                bound: Bound::Max,
                reason: InvalidBound::Negative(-2),
            })
        );
    }

    #[test]
    fn test_non_integer_min_names_key_and_value() {
        let keys = AnnotationKeys::default();
        let err = parse(Some("abc"), Some("5")).unwrap_err();
        assert_eq!(
            err,
            BoundsError::Invalid {
                bound: Bound::Min,
                reason: InvalidBound::NotAnInteger {
                    key: keys.node_group_min_size.clone(),
                    value: "abc".to_string(),
                },
            }
        );
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_non_integer_forms_rejected() {
        for raw in ["1.5", "", " 1", "1e3", "0x10", "99999999999999999999"] {
            let err = parse(Some(raw), Some("5")).unwrap_err();
            assert_eq!(err.bound(), Bound::Min, "input {:?}", raw);
            assert!(!err.is_missing(), "input {:?}", raw);
        }
    }

    #[test]
    fn test_integer_outside_i32_is_out_of_range() {
        let keys = AnnotationKeys::default();
        let err = parse(Some("1"), Some("3000000000")).unwrap_err();
        assert_eq!(
            err,
            BoundsError::Invalid {
                bound: Bound::Max,
                reason: InvalidBound::OutOfRange {
                    key: keys.node_group_max_size.clone(),
                    value: "3000000000".to_string(),
                },
            }
        );
        assert!(err.to_string().contains("out of range"));
        assert!(!err.to_string().contains("not an integer"));

        let err = parse(Some("-3000000000"), Some("5")).unwrap_err();
        assert!(matches!(
            err,
            BoundsError::Invalid {
                bound: Bound::Min,
                reason: InvalidBound::OutOfRange { .. },
            }
        ));
    }

    #[test]
    fn test_explicit_plus_sign_accepted() {
        assert_eq!(
            parse(Some("+2"), Some("4")).unwrap(),
            ScalingBounds { min: 2, max: 4 }
        );
    }

    #[test]
    fn test_custom_group_keys_are_used() {
        let keys = AnnotationKeys::new("infra.example.com");
        let mut map = BTreeMap::new();
        map.insert(keys.node_group_min_size.clone(), "2".to_string());
        map.insert(keys.node_group_max_size.clone(), "4".to_string());

        assert_eq!(
            parse_scaling_bounds(&keys, &map).unwrap(),
            ScalingBounds { min: 2, max: 4 }
        );
        assert_eq!(
            parse_scaling_bounds(&AnnotationKeys::default(), &map),
            Err(BoundsError::Missing(Bound::Min))
        );
    }
}
