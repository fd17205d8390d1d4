//! Gallery filter bar.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WidgetError;
use crate::tween::TweenSpec;

pub const FILTER_BUTTON_SELECTOR: &str = ".filter-btn";
pub const FILTER_ATTR: &str = "data-filter";
const FILTER_FADE_SECS: f64 = 0.5;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Video,
    Design,
    ThreeD,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Video, Section::Design, Section::ThreeD];

    pub fn element_id(&self) -> &'static str {
        match self {
            Section::Video => "video-gallery",
            Section::Design => "design-gallery",
            Section::ThreeD => "3d-section",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filter {
    All,
    Only(Section),
}

impl Filter {
    pub fn shows(&self, section: Section) -> bool {
        match self {
            Filter::All => true,
            Filter::Only(only) => *only == section,
        }
    }

    /// Every section paired with the tween that brings it to its filtered state.
    pub fn transitions(&self) -> Vec<(Section, TweenSpec)> {
        Section::ALL
            .iter()
            .map(|section| {
                let vars = if self.shows(*section) {
                    TweenSpec::new(FILTER_FADE_SECS)
                        .opacity(1.0)
                        .display("block")
                        .height("auto")
                } else {
                    TweenSpec::new(FILTER_FADE_SECS)
                        .opacity(0.0)
                        .display("none")
                        .height("0")
                };
                (*section, vars)
            })
            .collect()
    }
}

impl FromStr for Filter {
    type Err = WidgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(Filter::All),
            "video" => Ok(Filter::Only(Section::Video)),
            "design" => Ok(Filter::Only(Section::Design)),
            "3d" => Ok(Filter::Only(Section::ThreeD)),
            other => Err(WidgetError::UnknownFilter(other.to_string())),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Filter::All => "all",
            Filter::Only(Section::Video) => "video",
            Filter::Only(Section::Design) => "design",
            Filter::Only(Section::ThreeD) => "3d",
        };
        f.write_str(s)
    }
}
