//! Color handling for cohort flow diagrams.
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, plus the palette helpers used to derive per-step box
//! fills: hex canonicalization, linear gradient palettes, and override
//! resolution with an optional hex-only policy.
//!
//! All resolved colors are canonical lowercase `#rrggbb` strings. Alpha
//! channels are accepted on input (`#rrggbbaa`) and dropped.

use std::str::FromStr;

use color::{DynamicColor, Srgb};
use thiserror::Error;

/// Errors produced while parsing or resolving colors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// The string is not a recognized hex or CSS named color.
    #[error("unsupported color `{value}`: use hex or CSS named colors (see named_colors())")]
    Unsupported { value: String },

    /// A named color was given while the hex-only policy is active.
    #[error(
        "unsupported color `{value}` when allow_named_colors is false: use hex colors like `#88ccff`"
    )]
    NamedColorsDisabled { value: String },
}

/// Wrapper around the `DynamicColor` type from the color crate.
///
/// Parsing accepts any CSS color syntax. Rendering always emits the
/// canonical lowercase hex form, which keeps SVG output stable regardless
/// of how a color was spelled in the input.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a string.
    ///
    /// This will parse CSS color strings such as "#88ccff", "rgb(255, 0, 0)",
    /// "steelblue", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use cohortflow_core::color::Color;
    ///
    /// let fill = Color::new("#88ccff").unwrap();
    /// let named = Color::new("steelblue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, ColorError> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(_) => Err(ColorError::Unsupported {
                value: color_str.to_string(),
            }),
        }
    }

    /// Returns the canonical lowercase `#rrggbb` form of this color.
    ///
    /// Any alpha component is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use cohortflow_core::color::Color;
    ///
    /// let red = Color::new("red").unwrap();
    /// assert_eq!(red.to_canonical_hex(), "#ff0000");
    /// ```
    pub fn to_canonical_hex(&self) -> String {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_canonical_hex())
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}

/// Canonicalizes any supported color spec into lowercase `#rrggbb`.
pub fn to_canonical_hex(spec: &str) -> Result<String, ColorError> {
    Ok(Color::new(spec)?.to_canonical_hex())
}

/// Parses a hex color string into `(r, g, b)` components.
///
/// A leading `#` is optional, and an 8-digit `rrggbbaa` value has its
/// alpha digits stripped.
fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    let digits = if digits.len() == 8 {
        &digits[..6]
    } else {
        digits
    };
    if digits.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Formats `(r, g, b)` components as lowercase `#rrggbb`.
fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Linearly interpolates a single color component at position `t` in `[0, 1]`.
fn interpolate_component(start: u8, end: u8, t: f32) -> u8 {
    (f32::from(start) + (f32::from(end) - f32::from(start)) * t).round() as u8
}

/// Builds a linear gradient palette of `n` colors between two endpoints.
///
/// Both endpoints may be any supported color spec; entries come out as
/// canonical lowercase hex. With `n <= 1` the start spec is returned
/// unchanged as the only entry, without canonicalization.
///
/// # Examples
///
/// ```
/// use cohortflow_core::color::gradient_palette;
///
/// let palette = gradient_palette("#000000", "#ffffff", 3).unwrap();
/// assert_eq!(palette, vec!["#000000", "#808080", "#ffffff"]);
/// ```
pub fn gradient_palette(
    start_spec: &str,
    end_spec: &str,
    n: usize,
) -> Result<Vec<String>, ColorError> {
    if n <= 1 {
        return Ok(vec![start_spec.to_string()]);
    }

    let start_hex = to_canonical_hex(start_spec)?;
    let end_hex = to_canonical_hex(end_spec)?;
    let (start_r, start_g, start_b) = hex_to_rgb(&start_hex).ok_or(ColorError::Unsupported {
        value: start_spec.to_string(),
    })?;
    let (end_r, end_g, end_b) = hex_to_rgb(&end_hex).ok_or(ColorError::Unsupported {
        value: end_spec.to_string(),
    })?;

    let palette = (0..n)
        .map(|i| {
            let t = i as f32 / (n - 1) as f32;
            rgb_to_hex(
                interpolate_component(start_r, end_r, t),
                interpolate_component(start_g, end_g, t),
                interpolate_component(start_b, end_b, t),
            )
        })
        .collect();
    Ok(palette)
}

/// Resolves an optional color override against a default.
///
/// `None` falls back to `default`. When `allow_named` is false, any value
/// that is not `#`-prefixed is rejected before parsing. The result is
/// canonical lowercase hex.
///
/// # Examples
///
/// ```
/// use cohortflow_core::color::resolve_color;
///
/// let fill = resolve_color(Some("steelblue"), "#ffffff", true).unwrap();
/// assert_eq!(fill, "#4682b4");
///
/// let fallback = resolve_color(None, "#88ccff", true).unwrap();
/// assert_eq!(fallback, "#88ccff");
/// ```
pub fn resolve_color(
    value: Option<&str>,
    default: &str,
    allow_named: bool,
) -> Result<String, ColorError> {
    let chosen = value.unwrap_or(default);
    if !allow_named && !chosen.starts_with('#') {
        return Err(ColorError::NamedColorsDisabled {
            value: chosen.to_string(),
        });
    }
    to_canonical_hex(chosen)
}

/// Returns the recognized CSS color names, sorted alphabetically.
///
/// Every name in this list parses with [`Color::new`] and is accepted by
/// [`resolve_color`] whenever named colors are allowed.
pub fn named_colors() -> &'static [&'static str] {
    &NAMED_COLORS
}

static NAMED_COLORS: [&str; 148] = [
    "aliceblue",
    "antiquewhite",
    "aqua",
    "aquamarine",
    "azure",
    "beige",
    "bisque",
    "black",
    "blanchedalmond",
    "blue",
    "blueviolet",
    "brown",
    "burlywood",
    "cadetblue",
    "chartreuse",
    "chocolate",
    "coral",
    "cornflowerblue",
    "cornsilk",
    "crimson",
    "cyan",
    "darkblue",
    "darkcyan",
    "darkgoldenrod",
    "darkgray",
    "darkgreen",
    "darkgrey",
    "darkkhaki",
    "darkmagenta",
    "darkolivegreen",
    "darkorange",
    "darkorchid",
    "darkred",
    "darksalmon",
    "darkseagreen",
    "darkslateblue",
    "darkslategray",
    "darkslategrey",
    "darkturquoise",
    "darkviolet",
    "deeppink",
    "deepskyblue",
    "dimgray",
    "dimgrey",
    "dodgerblue",
    "firebrick",
    "floralwhite",
    "forestgreen",
    "fuchsia",
    "gainsboro",
    "ghostwhite",
    "gold",
    "goldenrod",
    "gray",
    "green",
    "greenyellow",
    "grey",
    "honeydew",
    "hotpink",
    "indianred",
    "indigo",
    "ivory",
    "khaki",
    "lavender",
    "lavenderblush",
    "lawngreen",
    "lemonchiffon",
    "lightblue",
    "lightcoral",
    "lightcyan",
    "lightgoldenrodyellow",
    "lightgray",
    "lightgreen",
    "lightgrey",
    "lightpink",
    "lightsalmon",
    "lightseagreen",
    "lightskyblue",
    "lightslategray",
    "lightslategrey",
    "lightsteelblue",
    "lightyellow",
    "lime",
    "limegreen",
    "linen",
    "magenta",
    "maroon",
    "mediumaquamarine",
    "mediumblue",
    "mediumorchid",
    "mediumpurple",
    "mediumseagreen",
    "mediumslateblue",
    "mediumspringgreen",
    "mediumturquoise",
    "mediumvioletred",
    "midnightblue",
    "mintcream",
    "mistyrose",
    "moccasin",
    "navajowhite",
    "navy",
    "oldlace",
    "olive",
    "olivedrab",
    "orange",
    "orangered",
    "orchid",
    "palegoldenrod",
    "palegreen",
    "paleturquoise",
    "palevioletred",
    "papayawhip",
    "peachpuff",
    "peru",
    "pink",
    "plum",
    "powderblue",
    "purple",
    "rebeccapurple",
    "red",
    "rosybrown",
    "royalblue",
    "saddlebrown",
    "salmon",
    "sandybrown",
    "seagreen",
    "seashell",
    "sienna",
    "silver",
    "skyblue",
    "slateblue",
    "slategray",
    "slategrey",
    "snow",
    "springgreen",
    "steelblue",
    "tan",
    "teal",
    "thistle",
    "tomato",
    "turquoise",
    "violet",
    "wheat",
    "white",
    "whitesmoke",
    "yellow",
    "yellowgreen",
];


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn rgb_strategy() -> impl Strategy<Value = (u8, u8, u8)> {
        (any::<u8>(), any::<u8>(), any::<u8>())
    }

    fn palette_len_strategy() -> impl Strategy<Value = usize> {
        2usize..40
    }

    /// Formatting then parsing a component triple is lossless.
    fn check_hex_roundtrip(r: u8, g: u8, b: u8) -> Result<(), TestCaseError> {
        let hex = rgb_to_hex(r, g, b);
        prop_assert_eq!(hex_to_rgb(&hex), Some((r, g, b)));
        Ok(())
    }

    /// Palettes have the requested length and hex endpoints.
    fn check_gradient_palette_shape(
        start: (u8, u8, u8),
        end: (u8, u8, u8),
        n: usize,
    ) -> Result<(), TestCaseError> {
        let start_hex = rgb_to_hex(start.0, start.1, start.2);
        let end_hex = rgb_to_hex(end.0, end.1, end.2);
        let palette = gradient_palette(&start_hex, &end_hex, n)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert_eq!(palette.len(), n);
        prop_assert_eq!(&palette[0], &start_hex);
        prop_assert_eq!(&palette[n - 1], &end_hex);
        for entry in &palette {
            prop_assert!(hex_to_rgb(entry).is_some());
        }
        Ok(())
    }

    /// Resolved colors are always canonical lowercase hex.
    fn check_resolve_color_canonical(r: u8, g: u8, b: u8) -> Result<(), TestCaseError> {
        let spec = format!("#{:02X}{:02X}{:02X}", r, g, b);
        let resolved = resolve_color(Some(&spec), "#ffffff", false)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;

        prop_assert_eq!(resolved, spec.to_lowercase());
        Ok(())
    }

    proptest! {
        #[test]
        fn hex_roundtrip((r, g, b) in rgb_strategy()) {
            check_hex_roundtrip(r, g, b)?;
        }

        #[test]
        fn gradient_palette_shape(start in rgb_strategy(), end in rgb_strategy(), n in palette_len_strategy()) {
            check_gradient_palette_shape(start, end, n)?;
        }

        #[test]
        fn resolve_color_canonical((r, g, b) in rgb_strategy()) {
            check_resolve_color_canonical(r, g, b)?;
        }
    }
}
