//! Poster collages: a named grid of media references a user arranges and
//! exports as an image on the client.
//!
//! Rendering happens in the browser; the backend only stores the layout.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MediaRef, Username};

/// Trending collages returned when the caller gives no limit.
pub const DEFAULT_TRENDING_COLLAGES: usize = 10;

/// Upper bound on a trending page.
pub const MAX_TRENDING_COLLAGES: usize = 50;

/// Stable collage identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollageId(Uuid);

impl CollageId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CollageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CollageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Square grid layouts offered by the collage editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridSize {
    #[serde(rename = "3x3")]
    Three,
    #[serde(rename = "4x4")]
    Four,
    #[serde(rename = "5x5")]
    Five,
}

impl GridSize {
    pub const ALL: [Self; 3] = [Self::Three, Self::Four, Self::Five];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Three => "3x3",
            Self::Four => "4x4",
            Self::Five => "5x5",
        }
    }

    /// Number of tiles the grid holds.
    pub const fn cells(self) -> usize {
        match self {
            Self::Three => 9,
            Self::Four => 16,
            Self::Five => 25,
        }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GridSize {
    type Err = CollageValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CollageValidationError::UnknownGridSize(wanted.to_owned()))
    }
}

/// Image format the client exports to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = CollageValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            other => Err(CollageValidationError::UnknownExportFormat(other.to_owned())),
        }
    }
}

/// Validation errors for collage drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollageValidationError {
    #[error("Missing required fields")]
    MissingFields,
    #[error("unknown grid size: {0}")]
    UnknownGridSize(String),
    #[error("unknown export format: {0}")]
    UnknownExportFormat(String),
    #[error("a {grid} collage holds at most {max} items")]
    TooManyItems { grid: GridSize, max: usize },
}

/// Raw values for [`CollageLayout::try_new`].
#[derive(Debug, Clone, Default)]
pub struct CollageDraft<'a> {
    pub name: &'a str,
    pub grid_size: &'a str,
    pub items: Vec<MediaRef>,
    pub show_titles: bool,
    pub export_format: Option<&'a str>,
}

/// The editable part of a collage, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollageLayout {
    pub name: String,
    pub grid_size: GridSize,
    pub items: Vec<MediaRef>,
    pub show_titles: bool,
    pub export_format: ExportFormat,
}

impl CollageLayout {
    /// Validate a layout.
    ///
    /// Name, grid and at least one item are required. The grid caps the item
    /// count; the export format defaults to PNG.
    pub fn try_new(draft: CollageDraft<'_>) -> Result<Self, CollageValidationError> {
        let name = draft.name.trim();
        if name.is_empty() || draft.grid_size.trim().is_empty() || draft.items.is_empty() {
            return Err(CollageValidationError::MissingFields);
        }
        let grid_size = draft.grid_size.parse::<GridSize>()?;
        if draft.items.len() > grid_size.cells() {
            return Err(CollageValidationError::TooManyItems {
                grid: grid_size,
                max: grid_size.cells(),
            });
        }
        let export_format = draft
            .export_format
            .filter(|raw| !raw.trim().is_empty())
            .map(str::parse::<ExportFormat>)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            name: name.to_owned(),
            grid_size,
            items: draft.items,
            show_titles: draft.show_titles,
            export_format,
        })
    }
}

/// A stored collage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collage {
    pub id: CollageId,
    pub owner: Username,
    pub name: String,
    pub grid_size: GridSize,
    pub items: Vec<MediaRef>,
    pub show_titles: bool,
    pub export_format: ExportFormat,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Collage {
    pub fn create(owner: Username, layout: CollageLayout, now: DateTime<Utc>) -> Self {
        Self {
            id: CollageId::random(),
            owner,
            name: layout.name,
            grid_size: layout.grid_size,
            items: layout.items,
            show_titles: layout.show_titles,
            export_format: layout.export_format,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the layout wholesale and bump `updated_at`.
    pub fn replace_layout(&mut self, layout: CollageLayout, now: DateTime<Utc>) {
        self.name = layout.name;
        self.grid_size = layout.grid_size;
        self.items = layout.items;
        self.show_titles = layout.show_titles;
        self.export_format = layout.export_format;
        self.updated_at = now;
    }
}

/// Clamp a requested trending page size.
pub fn trending_limit(requested: Option<usize>) -> usize {
    requested
        .unwrap_or(DEFAULT_TRENDING_COLLAGES)
        .clamp(1, MAX_TRENDING_COLLAGES)
}
