use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Family a component kind belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComponentFamily {
    /// Containers that arrange an ordered list of children
    Layout,
    /// Leaf elements, never carry children
    Atomic,
}

/// Closed set of component kinds a layout document may declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    /// Vertical stack
    Column,
    /// Horizontal stack
    Row,
    /// Overlapping stack (children drawn on top of each other)
    Box,
    /// Vertically scrolling list
    LazyColumn,
    /// Horizontally scrolling list
    LazyRow,
    /// Text label
    Text,
    /// Image loaded from a url or resource name
    Image,
    /// Clickable button
    Button,
    /// Editable text field
    Input,
    /// Fixed-size gap
    Spacer,
    /// Horizontal or vertical rule
    Divider,
    /// Image scaled to fit its bounds; the fallback for unrecognized types
    Fit,
}

impl ComponentType {
    /// Kind used when a document declares no type or an unknown one
    pub const DEFAULT: Self = Self::Fit;

    /// Every kind, layout kinds first, in declaration order
    pub const ALL: [Self; 12] = [
        Self::Column,
        Self::Row,
        Self::Box,
        Self::LazyColumn,
        Self::LazyRow,
        Self::Text,
        Self::Image,
        Self::Button,
        Self::Input,
        Self::Spacer,
        Self::Divider,
        Self::Fit,
    ];

    /// Resolve an exact, case-sensitive tag
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }

    /// Tag as written in layout documents
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Column => "column",
            Self::Row => "row",
            Self::Box => "box",
            Self::LazyColumn => "lazy_column",
            Self::LazyRow => "lazy_row",
            Self::Text => "text",
            Self::Image => "image",
            Self::Button => "button",
            Self::Input => "input",
            Self::Spacer => "spacer",
            Self::Divider => "divider",
            Self::Fit => "fit",
        }
    }

    #[must_use]
    pub const fn family(self) -> ComponentFamily {
        match self {
            Self::Column | Self::Row | Self::Box | Self::LazyColumn | Self::LazyRow => {
                ComponentFamily::Layout
            }
            Self::Text
            | Self::Image
            | Self::Button
            | Self::Input
            | Self::Spacer
            | Self::Divider
            | Self::Fit => ComponentFamily::Atomic,
        }
    }

    #[must_use]
    pub const fn is_layout(self) -> bool {
        matches!(self.family(), ComponentFamily::Layout)
    }

    #[must_use]
    pub const fn is_atomic(self) -> bool {
        matches!(self.family(), ComponentFamily::Atomic)
    }
}

impl Default for ComponentType {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
