use std::fmt;
use std::str::FromStr;

use crate::validation::ValidationError;

/// Aspect ratios accepted by the image generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AspectRatio {
    #[default]
    Square,
    Widescreen,
    Vertical,
    Landscape,
    Portrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [
        AspectRatio::Square,
        AspectRatio::Widescreen,
        AspectRatio::Vertical,
        AspectRatio::Landscape,
        AspectRatio::Portrait,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Vertical => "9:16",
            AspectRatio::Landscape => "4:3",
            AspectRatio::Portrait => "3:4",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim().replace('/', ":");
        AspectRatio::ALL
            .into_iter()
            .find(|ratio| ratio.as_str() == value)
            .ok_or_else(|| ValidationError::UnsupportedAspectRatio(raw.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::AspectRatio;

    #[test]
    fn parses_tokens_and_slash_form() {
        assert_eq!("16:9".parse::<AspectRatio>().ok(), Some(AspectRatio::Widescreen));
        assert_eq!(" 3/4 ".parse::<AspectRatio>().ok(), Some(AspectRatio::Portrait));
        assert_eq!(AspectRatio::default().as_str(), "1:1");
    }

    #[test]
    fn rejects_ratios_outside_the_enumeration() {
        assert!("21:9".parse::<AspectRatio>().is_err());
        assert!("".parse::<AspectRatio>().is_err());
    }
}
