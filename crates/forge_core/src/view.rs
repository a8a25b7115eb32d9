//! Presentation view state the session keeps in step with builds.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Preview,
    Code,
    Logs,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Mobile,
    Desktop,
}

impl FromStr for Device {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mobile" | "phone" => Ok(Self::Mobile),
            "desktop" => Ok(Self::Desktop),
            other => Err(CoreError::Validation(format!("Unknown device: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn toggled(self) -> Self {
        match self {
            Self::Portrait => Self::Landscape,
            Self::Landscape => Self::Portrait,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewState {
    pub tab: Tab,
    pub device: Device,
    pub orientation: Orientation,
    /// Bumped whenever the preview must be re-rendered from scratch.
    pub preview_revision: u64,
}

impl ViewState {
    /// Emulated viewport in CSS pixels; `None` means fill the window.
    pub fn frame_size(&self) -> Option<(u32, u32)> {
        match (self.device, self.orientation) {
            (Device::Desktop, _) => None,
            (Device::Mobile, Orientation::Portrait) => Some((375, 667)),
            (Device::Mobile, Orientation::Landscape) => Some((667, 375)),
        }
    }

    pub fn rotate(&mut self) {
        self.orientation = self.orientation.toggled();
    }

    pub(crate) fn on_build_started(&mut self, first_fresh_build: bool) {
        if first_fresh_build {
            self.tab = Tab::Logs;
        }
    }

    pub(crate) fn on_build_succeeded(&mut self) {
        if self.tab == Tab::Logs {
            self.tab = Tab::Preview;
        }
        self.preview_revision += 1;
    }

    pub(crate) fn on_version_changed(&mut self) {
        self.preview_revision += 1;
    }
}
