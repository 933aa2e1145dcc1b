use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Palette entry for category coloring. The symbolic name is what gets
/// persisted; the display attributes are resolved per presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Gray,
    Blue,
    Green,
    Yellow,
    Red,
    Violet,
    Orange,
    Pink,
}

/// Display attributes of a palette entry (CSS class fragments)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSpec {
    pub label: &'static str,
    pub fill: &'static str,
    pub text: &'static str,
    pub ring: &'static str,
}

impl Palette {
    pub const ALL: [Palette; 8] = [
        Palette::Gray,
        Palette::Blue,
        Palette::Green,
        Palette::Yellow,
        Palette::Red,
        Palette::Violet,
        Palette::Orange,
        Palette::Pink,
    ];

    /// The symbolic name stored at the persistence boundary
    pub fn name(self) -> &'static str {
        match self {
            Palette::Gray => "gray",
            Palette::Blue => "blue",
            Palette::Green => "green",
            Palette::Yellow => "yellow",
            Palette::Red => "red",
            Palette::Violet => "violet",
            Palette::Orange => "orange",
            Palette::Pink => "pink",
        }
    }

    /// Parse a symbolic name back into a palette entry
    pub fn from_name(name: &str) -> Option<Palette> {
        match name {
            "gray" => Some(Palette::Gray),
            "blue" => Some(Palette::Blue),
            "green" => Some(Palette::Green),
            "yellow" => Some(Palette::Yellow),
            "red" => Some(Palette::Red),
            "violet" => Some(Palette::Violet),
            "orange" => Some(Palette::Orange),
            "pink" => Some(Palette::Pink),
            _ => None,
        }
    }

    pub fn display(self) -> ColorSpec {
        match self {
            Palette::Gray => ColorSpec {
                label: "Classic Gray",
                fill: "bg-gray-50 border-gray-200",
                text: "text-gray-700",
                ring: "ring-gray-400",
            },
            Palette::Blue => ColorSpec {
                label: "Ocean Blue",
                fill: "bg-blue-50 border-blue-200",
                text: "text-blue-700",
                ring: "ring-blue-400",
            },
            Palette::Green => ColorSpec {
                label: "Sage Green",
                fill: "bg-emerald-50 border-emerald-200",
                text: "text-emerald-700",
                ring: "ring-emerald-400",
            },
            Palette::Yellow => ColorSpec {
                label: "Sunny Yellow",
                fill: "bg-amber-50 border-amber-200",
                text: "text-amber-700",
                ring: "ring-amber-400",
            },
            Palette::Red => ColorSpec {
                label: "Rose Red",
                fill: "bg-rose-50 border-rose-200",
                text: "text-rose-700",
                ring: "ring-rose-400",
            },
            Palette::Violet => ColorSpec {
                label: "Lavender",
                fill: "bg-violet-50 border-violet-200",
                text: "text-violet-700",
                ring: "ring-violet-400",
            },
            Palette::Orange => ColorSpec {
                label: "Peach",
                fill: "bg-orange-50 border-orange-200",
                text: "text-orange-700",
                ring: "ring-orange-400",
            },
            Palette::Pink => ColorSpec {
                label: "Blush Pink",
                fill: "bg-pink-50 border-pink-200",
                text: "text-pink-700",
                ring: "ring-pink-400",
            },
        }
    }
}

/// A board row: an ordered grouping of tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub title: String,
    pub color: Palette,
    /// Collapsed rows render as a single strip in the matrix view
    pub collapsed: bool,
    /// Render-order key. Reorders reassign dense zero-based values;
    /// ties break by insertion order.
    pub position: u32,
}

impl Category {
    pub fn new(title: impl Into<String>, color: Palette, position: u32) -> Self {
        Category {
            id: Uuid::new_v4(),
            title: title.into(),
            color,
            collapsed: false,
            position,
        }
    }
}
