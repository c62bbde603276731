use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("point ({x}, {y}) must have finite coordinates")]
pub struct InvalidPointError {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn validate(&self) -> Result<(), InvalidPointError> {
        if self.x.is_finite() && self.y.is_finite() {
            Ok(())
        } else {
            Err(InvalidPointError {
                x: self.x,
                y: self.y,
            })
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Points drained from a drawing buffer once it reached the completion threshold.
/// Serialized as a plain array of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon(Vec<Point>);

impl Polygon {
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

/// Identifies a drawing session. Author and name are kept apart so that
/// ("ab", "c") and ("a", "bc") never share a buffer or a channel.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct SessionKey {
    author: String,
    name: String,
}

impl SessionKey {
    pub fn new(author: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            name: name.into(),
        }
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.author, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn it_rejects_non_finite_coordinates() {
        assert!(Point::new(1.0, -2.5).validate().is_ok());
        assert!(Point::new(f64::NAN, 0.0).validate().is_err());
        assert!(Point::new(0.0, f64::INFINITY).validate().is_err());
        assert!(Point::new(f64::NEG_INFINITY, 0.0).validate().is_err());
    }

    #[test]
    fn it_keeps_concatenation_lookalikes_apart() {
        let a = SessionKey::new("ab", "c");
        let b = SessionKey::new("a", "bc");
        assert_ne!(a, b);

        let keys: HashSet<_> = vec![a, b].into_iter().collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn polygon_serializes_as_array() {
        let polygon = Polygon::from(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.5)]);
        let json = serde_json::to_string(&polygon).expect("");
        assert_eq!(json, r#"[{"x":0.0,"y":0.0},{"x":1.0,"y":0.5}]"#);
    }
}
