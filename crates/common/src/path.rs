//! Dotted/indexed field paths over JSON trees
//!
//! `ecommerce.items[0].item_id` parses into
//! `[Field("ecommerce"), Field("items"), Index(0), Field("item_id")]` and is
//! resolved step by step. A missing step is an error, never `null`.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// One step of a [`FieldPath`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Index(idx) => write!(f, "[{}]", idx),
        }
    }
}

/// A parsed field path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The path minus its final segment, and that segment
    pub fn split_last(&self) -> Option<(FieldPath, &PathSegment)> {
        let (last, parent) = self.segments.split_last()?;
        Some((
            FieldPath {
                segments: parent.to_vec(),
            },
            last,
        ))
    }

    /// Walk `root` along this path
    pub fn resolve<'a>(&self, root: &'a Value) -> Result<&'a Value> {
        let mut current = root;
        for segment in &self.segments {
            current = match (segment, current) {
                (PathSegment::Field(name), Value::Object(map)) => {
                    map.get(name).ok_or_else(|| self.unresolved(segment, "key is absent"))?
                }
                (PathSegment::Index(idx), Value::Array(items)) => {
                    items.get(*idx).ok_or_else(|| {
                        self.unresolved(
                            segment,
                            format!("index out of range (length {})", items.len()),
                        )
                    })?
                }
                (PathSegment::Field(_), other) => {
                    return Err(self.unresolved(
                        segment,
                        format!("expected an object, found {}", kind_of(other)),
                    ))
                }
                (PathSegment::Index(_), other) => {
                    return Err(self.unresolved(
                        segment,
                        format!("expected an array, found {}", kind_of(other)),
                    ))
                }
            };
        }
        Ok(current)
    }

    fn unresolved(&self, segment: &PathSegment, reason: impl Into<String>) -> Error {
        Error::PathResolution {
            path: self.to_string(),
            segment: segment.to_string(),
            reason: reason.into(),
        }
    }
}

impl FromStr for FieldPath {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.trim().is_empty() {
            return Err(invalid("empty path"));
        }

        let mut segments = Vec::new();
        for part in raw.split('.') {
            let (name, mut rest) = match part.find('[') {
                Some(pos) => part.split_at(pos),
                None => (part, ""),
            };

            if !name.is_empty() {
                segments.push(PathSegment::Field(name.to_string()));
            } else if rest.is_empty() {
                return Err(invalid("empty segment"));
            }

            while !rest.is_empty() {
                let close = rest.find(']').ok_or_else(|| invalid("unclosed '['"))?;
                let digits = &rest[1..close];
                let idx = digits
                    .parse::<usize>()
                    .map_err(|_| invalid("index must be a non-negative integer"))?;
                segments.push(PathSegment::Index(idx));

                rest = &rest[close + 1..];
                if !rest.is_empty() && !rest.starts_with('[') {
                    return Err(invalid("unexpected characters after ']'"));
                }
            }
        }

        Ok(Self { segments })
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && matches!(segment, PathSegment::Field(_)) {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "event": "add_to_cart",
            "ecommerce": {
                "value": 150.0,
                "items": [
                    {"item_id": "PROD-001"},
                    {"item_id": "PROD-002", "tags": [["a", "b"]]}
                ]
            }
        })
    }

    #[test]
    fn test_parse_segments() {
        let path: FieldPath = "ecommerce.items[0].item_id".parse().unwrap();
        assert_eq!(
            path.segments(),
            &[
                PathSegment::Field("ecommerce".into()),
                PathSegment::Field("items".into()),
                PathSegment::Index(0),
                PathSegment::Field("item_id".into()),
            ]
        );
        assert_eq!(path.to_string(), "ecommerce.items[0].item_id");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for raw in ["", "a..b", "items[", "items[x]", "items[-1]", "items[0]x", ".a"] {
            let err = raw.parse::<FieldPath>().unwrap_err();
            assert!(matches!(err, Error::InvalidPath { .. }), "{raw} -> {err}");
        }
    }

    #[test]
    fn test_resolve() {
        let event = sample();
        let path: FieldPath = "ecommerce.items[1].item_id".parse().unwrap();
        assert_eq!(path.resolve(&event).unwrap(), &json!("PROD-002"));

        let nested: FieldPath = "ecommerce.items[1].tags[0][1]".parse().unwrap();
        assert_eq!(nested.resolve(&event).unwrap(), &json!("b"));

        let top: FieldPath = "event".parse().unwrap();
        assert_eq!(top.resolve(&event).unwrap(), &json!("add_to_cart"));
    }

    #[test]
    fn test_split_last() {
        let path: FieldPath = "ecommerce.items[0].item_id".parse().unwrap();
        let (parent, last) = path.split_last().unwrap();
        assert_eq!(parent.to_string(), "ecommerce.items[0]");
        assert_eq!(last, &PathSegment::Field("item_id".into()));

        let top: FieldPath = "event".parse().unwrap();
        let (root, _) = top.split_last().unwrap();
        assert!(root.segments().is_empty());
        assert_eq!(root.resolve(&sample()).unwrap(), &sample());
    }

    #[test]
    fn test_resolve_out_of_range() {
        let path: FieldPath = "ecommerce.items[5].item_id".parse().unwrap();
        let err = path.resolve(&sample()).unwrap_err();
        match err {
            Error::PathResolution { segment, .. } => assert_eq!(segment, "[5]"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_missing_and_mismatched() {
        let event = sample();
        let missing: FieldPath = "ecommerce.transaction_id".parse().unwrap();
        assert!(missing.resolve(&event).unwrap_err().is_path_resolution());

        let through_scalar: FieldPath = "ecommerce.value.amount".parse().unwrap();
        assert!(through_scalar.resolve(&event).unwrap_err().is_path_resolution());

        let index_object: FieldPath = "ecommerce[0]".parse().unwrap();
        assert!(index_object.resolve(&event).unwrap_err().is_path_resolution());
    }
}
