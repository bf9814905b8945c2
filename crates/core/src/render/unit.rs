use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// An RGB color. Values are stored as floats between 0 and 1 (inclusive).
/// This uses f32 because the extra precision from f64 is pointless.
///
/// Serializes as an HTML color code (`#rrggbb`), which is also what
/// [FromStr] accepts.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color3 {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color3 {
    /// Create a new RGB color with components in the range [0.0, 1.0].
    /// Returns an error if any of the components are out of range
    pub fn new(red: f32, green: f32, blue: f32) -> anyhow::Result<Self> {
        fn check_component(component_name: &str, value: f32) -> anyhow::Result<f32> {
            if (0.0..=1.0).contains(&value) {
                Ok(value)
            } else {
                Err(anyhow!(
                    "Color component {} must be in [0, 1], but was {}",
                    component_name,
                    value
                ))
            }
        }

        Ok(Self {
            red: check_component("red", red)?,
            green: check_component("green", green)?,
            blue: check_component("blue", blue)?,
        })
    }

    /// Create a new RGB color from integer components in the [0,255] range.
    pub fn new_int(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
        }
    }

    /// Convert this number to a set of 3 bytes: `(red, green, blue)`
    pub fn to_ints(self) -> (u8, u8, u8) {
        (
            (self.red * 255.0).round() as u8,
            (self.green * 255.0).round() as u8,
            (self.blue * 255.0).round() as u8,
        )
    }

    /// Convert this color to an HTML color code: `#rrggbb`
    pub fn to_html(self) -> String {
        let (r, g, b) = self.to_ints();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }
}

impl fmt::Display for Color3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_html())
    }
}

impl FromStr for Color3 {
    type Err = anyhow::Error;

    /// Parse an HTML color code: `#rrggbb`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| anyhow!("color {:?} must start with #", s))?;
        if hex.len() != 6 || !hex.is_ascii() {
            bail!("color {:?} must have the form #rrggbb", s);
        }
        let component = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .with_context(|| format!("invalid color {:?}", s))
        };
        Ok(Self::new_int(component(0..2)?, component(2..4)?, component(4..6)?))
    }
}

impl TryFrom<String> for Color3 {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color3> for String {
    fn from(color: Color3) -> Self {
        color.to_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_test::{assert_de_tokens_error, assert_tokens, Token};

    #[test]
    fn test_new() {
        assert!(Color3::new(0.0, 0.5, 1.0).is_ok());
        assert!(Color3::new(1.1, 0.5, 1.0).is_err());
        assert!(Color3::new(0.0, -0.1, 1.0).is_err());
    }

    #[test]
    fn test_html() {
        assert_eq!(Color3::new_int(255, 0, 16).to_html(), "#ff0010");
        assert_eq!(
            "#c8a0ff".parse::<Color3>().unwrap(),
            Color3::new_int(200, 160, 255)
        );
        assert_eq!("#C8A0FF".parse::<Color3>().unwrap().to_html(), "#c8a0ff");
        for bad in ["c8a0ff", "#c8a0f", "#c8a0ffff", "#gg0000", "#ééé"] {
            assert!(bad.parse::<Color3>().is_err(), "{:?} parsed", bad);
        }
    }

    #[test]
    fn test_serde() {
        assert_tokens(&Color3::new_int(0, 128, 255), &[Token::Str("#0080ff")]);
        assert_de_tokens_error::<Color3>(
            &[Token::Str("blue")],
            "color \"blue\" must start with #",
        );
    }
}
