//! Presentation settings attached to a collection
//!
//! A style is a plain struct with typed fields. Changes coming from outside
//! (CLI, API) go through [`CollectionStyle::set`], which only accepts the known
//! field names and validates each value before it is applied.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Smallest and largest accepted thumbnail dimension, in pixels
pub const MIN_DIMENSION: u32 = 1;
pub const MAX_DIMENSION: u32 = 1024;

/// Names accepted by [`CollectionStyle::set`] and [`CollectionStyle::get`]
pub const FIELDS: &[&str] = &[
    "name",
    "thumbstyle",
    "background",
    "view",
    "default_image",
    "width",
    "height",
];

/// Errors raised when changing a style field
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StyleError {
    /// The field is not part of a collection style
    #[error("Unknown style field '{0}'")]
    UnknownField(String),

    /// The value is not valid for the field
    #[error("Invalid value '{value}' for style field '{field}'")]
    InvalidValue { field: String, value: String },
}

/// How thumbnails are decorated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbStyle {
    #[default]
    Thumb,
    PrettyThumb,
    ShadowSharpThumb,
    PolaroidThumb,
}

impl ThumbStyle {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::PrettyThumb => "pretty_thumb",
            Self::ShadowSharpThumb => "shadow_sharp_thumb",
            Self::PolaroidThumb => "polaroid_thumb",
        }
    }
}

impl FromStr for ThumbStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thumb" => Ok(Self::Thumb),
            "pretty_thumb" => Ok(Self::PrettyThumb),
            "shadow_sharp_thumb" => Ok(Self::ShadowSharpThumb),
            "polaroid_thumb" => Ok(Self::PolaroidThumb),
            _ => Err(s.to_string()),
        }
    }
}

/// Background behind thumbnails
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Background {
    #[default]
    None,
    /// Hex color in `#rgb` or `#rrggbb` form
    Color(String),
}

impl fmt::Display for Background {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Color(c) => f.write_str(c),
        }
    }
}

impl FromStr for Background {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "none" {
            return Ok(Self::None);
        }
        let hex = s.strip_prefix('#').ok_or_else(|| s.to_string())?;
        if matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self::Color(s.to_lowercase()))
        } else {
            Err(s.to_string())
        }
    }
}

/// Layout used when a collection is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Gallery,
    Lightbox,
}

impl ViewMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Gallery => "gallery",
            Self::Lightbox => "lightbox",
        }
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gallery" => Ok(Self::Gallery),
            "lightbox" => Ok(Self::Lightbox),
            _ => Err(s.to_string()),
        }
    }
}

/// Image shown as the collection's key image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultImage {
    /// Use the first item as-is
    #[default]
    Plain,
    /// Render a stack of the first items using the thumb style
    Stack,
}

impl DefaultImage {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Stack => "stack",
        }
    }
}

impl FromStr for DefaultImage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Self::Plain),
            "stack" => Ok(Self::Stack),
            _ => Err(s.to_string()),
        }
    }
}

/// Presentation settings of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStyle {
    pub name: String,
    pub thumbstyle: ThumbStyle,
    pub background: Background,
    pub view: ViewMode,
    pub default_image: DefaultImage,
    pub width: u32,
    pub height: u32,
}

impl Default for CollectionStyle {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            thumbstyle: ThumbStyle::default(),
            background: Background::default(),
            view: ViewMode::default(),
            default_image: DefaultImage::default(),
            width: 150,
            height: 150,
        }
    }
}

impl CollectionStyle {
    /// Set a single field from its textual form
    ///
    /// # Errors
    ///
    /// Returns `StyleError::UnknownField` for names outside [`FIELDS`] and
    /// `StyleError::InvalidValue` when the value does not parse or is out of range.
    /// The style is left unchanged on error.
    pub fn set(&mut self, field: &str, value: &str) -> Result<(), StyleError> {
        let value = value.trim();
        match field {
            "name" => {
                if value.is_empty() {
                    return Err(invalid(field, value));
                }
                self.name = value.to_string();
            }
            "thumbstyle" => self.thumbstyle = parse(field, value)?,
            "background" => self.background = parse(field, value)?,
            "view" => self.view = parse(field, value)?,
            "default_image" => self.default_image = parse(field, value)?,
            "width" => self.width = parse_dimension(field, value)?,
            "height" => self.height = parse_dimension(field, value)?,
            _ => return Err(StyleError::UnknownField(field.to_string())),
        }
        Ok(())
    }

    /// Read a single field in the same textual form `set` accepts
    ///
    /// # Errors
    ///
    /// Returns `StyleError::UnknownField` for names outside [`FIELDS`].
    pub fn get(&self, field: &str) -> Result<String, StyleError> {
        Ok(match field {
            "name" => self.name.clone(),
            "thumbstyle" => self.thumbstyle.as_str().to_string(),
            "background" => self.background.to_string(),
            "view" => self.view.as_str().to_string(),
            "default_image" => self.default_image.as_str().to_string(),
            "width" => self.width.to_string(),
            "height" => self.height.to_string(),
            _ => return Err(StyleError::UnknownField(field.to_string())),
        })
    }
}

fn invalid(field: &str, value: &str) -> StyleError {
    StyleError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn parse<T: FromStr>(field: &str, value: &str) -> Result<T, StyleError> {
    value.parse().map_err(|_| invalid(field, value))
}

fn parse_dimension(field: &str, value: &str) -> Result<u32, StyleError> {
    let n: u32 = parse(field, value)?;
    if (MIN_DIMENSION..=MAX_DIMENSION).contains(&n) {
        Ok(n)
    } else {
        Err(invalid(field, value))
    }
}
