//! Static registry of the tags this crate knows how to query.
//!
//! A [`Tag`] is a plain `Copy` handle; its external name and value kind live in
//! a single table indexed by the variant, so lookups never allocate.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// The shape of a tag's value once ExifTool has rendered it as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    String,
    Integer,
    Real,
    Boolean,
    DateTime,
}

/// A tag value converted from ExifTool's text according to its [`TagKind`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    String(String),
    Integer(i64),
    Real(f64),
    Boolean(bool),
    DateTime(ExifDateTime),
}

/// ExifTool timestamps come with or without a UTC offset, and sometimes without a time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExifDateTime {
    Zoned(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
    Date(NaiveDate),
}

macro_rules! registry {
    ($($variant:ident => $name:literal, $kind:ident;)+) => {
        /// A metadata field known to the registry.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Tag {
            $($variant,)+
        }

        const REGISTRY: &[(&str, TagKind)] = &[
            $(($name, TagKind::$kind),)+
        ];

        impl Tag {
            /// Every registered tag, in declaration order.
            pub const ALL: &'static [Tag] = &[$(Tag::$variant,)+];
        }
    };
}

registry! {
    Aperture => "ApertureValue", Real;
    Artist => "Artist", String;
    Author => "Author", String;
    BitsPerSample => "BitsPerSample", Integer;
    CaptionAbstract => "Caption-Abstract", String;
    ColorSpace => "ColorSpace", Integer;
    Comment => "Comment", String;
    Copyright => "Copyright", String;
    CopyrightNotice => "CopyrightNotice", String;
    CreateDate => "CreateDate", DateTime;
    Creator => "Creator", String;
    DateTimeOriginal => "DateTimeOriginal", DateTime;
    ExposureCompensation => "ExposureCompensation", Real;
    ExposureProgram => "ExposureProgram", Integer;
    ExposureTime => "ExposureTime", Real;
    Flash => "Flash", Integer;
    FNumber => "FNumber", Real;
    FocalLength => "FocalLength", Real;
    FocalLength35mm => "FocalLengthIn35mmFormat", Integer;
    GpsAltitude => "GPSAltitude", Real;
    GpsAltitudeRef => "GPSAltitudeRef", Integer;
    GpsBearing => "GPSDestBearing", Real;
    GpsDateStamp => "GPSDateStamp", String;
    GpsLatitude => "GPSLatitude", Real;
    GpsLatitudeRef => "GPSLatitudeRef", String;
    GpsLongitude => "GPSLongitude", Real;
    GpsLongitudeRef => "GPSLongitudeRef", String;
    GpsProcessingMethod => "GPSProcessingMethod", String;
    GpsSpeed => "GPSSpeed", Real;
    GpsSpeedRef => "GPSSpeedRef", String;
    GpsTimeStamp => "GPSTimeStamp", String;
    ImageDescription => "ImageDescription", String;
    ImageHeight => "ImageHeight", Integer;
    ImageWidth => "ImageWidth", Integer;
    Iso => "ISO", Integer;
    Keywords => "Keywords", String;
    LensMake => "LensMake", String;
    LensModel => "LensModel", String;
    Make => "Make", String;
    MeteringMode => "MeteringMode", Integer;
    MimeType => "MIMEType", String;
    Model => "Model", String;
    ModifyDate => "ModifyDate", DateTime;
    Orientation => "Orientation", Integer;
    OwnerName => "OwnerName", String;
    Rating => "Rating", Integer;
    RatingPercent => "RatingPercent", Integer;
    Rotation => "Rotation", Integer;
    SceneCaptureType => "SceneCaptureType", Integer;
    ShutterSpeed => "ShutterSpeedValue", Real;
    Software => "Software", String;
    SubSecTimeOriginal => "SubSecTimeOriginal", Integer;
    Title => "XPTitle", String;
    UserComment => "UserComment", String;
    WhiteBalance => "WhiteBalance", Integer;
    XResolution => "XResolution", Real;
    YResolution => "YResolution", Real;
    ThumbnailImage => "ThumbnailImage", Boolean;
}

static BY_NAME: Lazy<HashMap<&'static str, Tag>> =
    Lazy::new(|| Tag::ALL.iter().map(|tag| (tag.name(), *tag)).collect());

impl Tag {
    /// Name ExifTool uses for this tag on the command line and in its output.
    pub fn name(self) -> &'static str {
        REGISTRY[self as usize].0
    }

    pub fn kind(self) -> TagKind {
        REGISTRY[self as usize].1
    }

    /// Reverse lookup by ExifTool name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Tag> {
        BY_NAME.get(name).copied()
    }

    /// Converts ExifTool's text for this tag into a typed value.
    ///
    /// Returns `None` when the text does not fit the tag's kind, which is normal
    /// for print-converted output like `Orientation: Horizontal (normal)`.
    pub fn parse_value(self, raw: &str) -> Option<TagValue> {
        let raw = raw.trim();
        match self.kind() {
            TagKind::String => Some(TagValue::String(raw.to_string())),
            TagKind::Integer => raw.parse().ok().map(TagValue::Integer),
            TagKind::Real => parse_real(raw).map(TagValue::Real),
            TagKind::Boolean => parse_bool(raw).map(TagValue::Boolean),
            TagKind::DateTime => parse_datetime(raw).map(TagValue::DateTime),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Tag::from_name(&name)
            .ok_or_else(|| de::Error::custom(format!("unknown ExifTool tag '{}'", name)))
    }
}

// Accepts "1/250" as well as "0.004"; print-converted reals may carry a unit suffix.
fn parse_real(raw: &str) -> Option<f64> {
    if let Some((num, den)) = raw.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        return if den == 0.0 { None } else { Some(num / den) };
    }
    raw.parse()
        .ok()
        .or_else(|| raw.split_whitespace().next()?.parse().ok())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Some(true),
        "no" | "false" | "0" => Some(false),
        // Binary tags render as "(Binary data 1234 bytes, use -b option to extract)".
        s if s.starts_with("(binary data") => Some(true),
        _ => None,
    }
}

fn parse_datetime(raw: &str) -> Option<ExifDateTime> {
    for format in ["%Y:%m:%d %H:%M:%S%.f%:z", "%Y:%m:%d %H:%M:%S%.f%#z"] {
        if let Ok(zoned) = DateTime::parse_from_str(raw, format) {
            return Some(ExifDateTime::Zoned(zoned));
        }
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y:%m:%d %H:%M:%S%.f") {
        return Some(ExifDateTime::Naive(naive));
    }
    NaiveDate::parse_from_str(raw, "%Y:%m:%d")
        .ok()
        .map(ExifDateTime::Date)
}
