// Copyright 2025 HEM Sp. z o.o.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;
use std::str::FromStr;

use crate::tally::TallyState;

/// 24-bit RGB color packed as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub const fn from_packed(value: u32) -> Self {
        Color(value & 0x00ff_ffff)
    }

    pub const fn packed(&self) -> u32 {
        self.0
    }
}

pub const DEFAULT_FOREGROUND: Color = Color::rgb(255, 255, 255);
pub const DEFAULT_BACKGROUND: Color = Color::rgb(0, 255, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackKind {
    InputPreview,
    InputLive,
}

impl FeedbackKind {
    pub const ALL: [FeedbackKind; 2] = [FeedbackKind::InputPreview, FeedbackKind::InputLive];

    pub fn id(&self) -> &'static str {
        match self {
            FeedbackKind::InputPreview => "input_preview",
            FeedbackKind::InputLive => "input_live",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeedbackKind::InputPreview => "Change colors based on previewed input",
            FeedbackKind::InputLive => "Change colors based on live input",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FeedbackKind::InputPreview => "If the specified input is previewed, change colors of the bank",
            FeedbackKind::InputLive => "If the specified input is live, change colors of the bank",
        }
    }
}

impl FromStr for FeedbackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "input_preview" => Ok(FeedbackKind::InputPreview),
            "input_live" => Ok(FeedbackKind::InputLive),
            _ => Err(format!("Unknown feedback: {}", s)),
        }
    }
}

impl fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Color override returned to the host when a feedback matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackStyle {
    pub color: Color,
    pub bgcolor: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackRequest {
    pub kind: FeedbackKind,
    /// 1-based input number.
    pub index: i64,
    pub fg: Color,
    pub bg: Color,
}

impl FeedbackRequest {
    pub fn new(kind: FeedbackKind, index: i64) -> Self {
        Self {
            kind,
            index,
            fg: DEFAULT_FOREGROUND,
            bg: DEFAULT_BACKGROUND,
        }
    }

    pub fn with_colors(mut self, fg: Color, bg: Color) -> Self {
        self.fg = fg;
        self.bg = bg;
        self
    }
}

pub fn input_preview(tally: &TallyState, index: i64, fg: Color, bg: Color) -> Option<FeedbackStyle> {
    tally
        .is_previewed(index)
        .then_some(FeedbackStyle { color: fg, bgcolor: bg })
}

pub fn input_live(tally: &TallyState, index: i64, fg: Color, bg: Color) -> Option<FeedbackStyle> {
    tally
        .is_live(index)
        .then_some(FeedbackStyle { color: fg, bgcolor: bg })
}

pub fn evaluate(tally: &TallyState, request: &FeedbackRequest) -> Option<FeedbackStyle> {
    match request.kind {
        FeedbackKind::InputPreview => input_preview(tally, request.index, request.fg, request.bg),
        FeedbackKind::InputLive => input_live(tally, request.index, request.fg, request.bg),
    }
}
