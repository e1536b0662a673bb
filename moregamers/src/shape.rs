//! Banner shapes.

use std::fmt;
use std::str::FromStr;

/// The two ad aspect categories the SDK serves.
///
/// Each shape prefers one image orientation and prefetches the other one
/// for the opposite shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BannerShape {
    #[default]
    Square,
    Rectangle,
}

impl BannerShape {
    /// The other shape.
    pub fn opposite(self) -> Self {
        match self {
            BannerShape::Square => BannerShape::Rectangle,
            BannerShape::Rectangle => BannerShape::Square,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BannerShape::Square => "square",
            BannerShape::Rectangle => "rectangle",
        }
    }
}

impl fmt::Display for BannerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BannerShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "square" => Ok(BannerShape::Square),
            "rectangle" => Ok(BannerShape::Rectangle),
            other => Err(format!(
                "unknown banner shape '{}' (expected 'square' or 'rectangle')",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_square() {
        assert_eq!(BannerShape::default(), BannerShape::Square);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(BannerShape::Square.opposite(), BannerShape::Rectangle);
        assert_eq!(BannerShape::Rectangle.opposite(), BannerShape::Square);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Square".parse(), Ok(BannerShape::Square));
        assert_eq!("rectangle".parse(), Ok(BannerShape::Rectangle));
        assert!("circle".parse::<BannerShape>().is_err());
    }
}
