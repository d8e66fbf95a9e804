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

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::config::InputAddressing;
use crate::definitions::*;
use crate::errors::EncodingError;

/// Option values keyed by option id, as delivered by the host.
pub type ActionOptions = HashMap<String, String>;

/// Accepted shape of a free-text option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Free,
    /// Digits only, possibly empty.
    Digits,
    /// Digits not starting with `0`, possibly empty.
    Milliseconds,
    /// `hh:mm:ss`.
    ClockTime,
}

impl TextFormat {
    pub fn accepts(&self, value: &str) -> bool {
        let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        match self {
            TextFormat::Free => true,
            TextFormat::Digits => digits(value),
            TextFormat::Milliseconds => digits(value) && !value.starts_with('0'),
            TextFormat::ClockTime => {
                let parts: Vec<&str> = value.split(':').collect();
                parts.len() == 3 && parts.iter().all(|p| p.len() == 2 && digits(*p))
            }
        }
    }

    /// Regular expression a host can use to validate the value before sending it.
    pub fn pattern(&self) -> Option<&'static str> {
        match self {
            TextFormat::Free => None,
            TextFormat::Digits => Some("^[0-9]*$"),
            TextFormat::Milliseconds => Some("^(?!0)[0-9]*$"),
            TextFormat::ClockTime => Some("^[0-9]{2}:[0-9]{2}:[0-9]{2}$"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionField {
    /// Reference to a vMix input, checked against the configured [`InputAddressing`].
    Input { default: Option<&'static str> },
    Text { default: Option<&'static str>, format: TextFormat },
    /// Closed set of `(id, label)` pairs.
    Choice { choices: &'static [(&'static str, &'static str)] },
}

/// Describes one option of an action, for hosts that render action forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub field: OptionField,
}

const fn input(id: &'static str, default: Option<&'static str>) -> OptionDefinition {
    OptionDefinition { id, label: "Input", field: OptionField::Input { default } }
}

const fn text(id: &'static str, label: &'static str, default: Option<&'static str>, format: TextFormat) -> OptionDefinition {
    OptionDefinition { id, label, field: OptionField::Text { default, format } }
}

const fn choice(id: &'static str, label: &'static str, choices: &'static [(&'static str, &'static str)]) -> OptionDefinition {
    OptionDefinition { id, label, field: OptionField::Choice { choices } }
}

const PROGRAM_INPUT: &[OptionDefinition] = &[input("pgmId", None)];
const PREVIEW_INPUT: &[OptionDefinition] = &[input("prwId", None)];
const TRANSITION: &[OptionDefinition] = &[choice("transId", "Select transition", Transition::CHOICES)];
const TOGGLE: &[OptionDefinition] = &[choice("toggleID", "Toggle Function", ToggleFunction::CHOICES)];
const PLAYLIST: &[OptionDefinition] = &[choice("plfId", "Playlist Function", PlaylistFunction::CHOICES)];
const OPEN_PLAYLIST: &[OptionDefinition] = &[text("plName", "Playlist name", None, TextFormat::Free)];
const OVERLAY_PROGRAM: &[OptionDefinition] = &[
    choice("overlayId", "Select Overlay", ProgramOverlay::CHOICES),
    input("pgmId", None),
];
const OVERLAY_PREVIEW: &[OptionDefinition] = &[
    choice("overlayId", "Select Overlay", PreviewOverlay::CHOICES),
    input("prwId", None),
];
const OVERLAY_FUNCTIONS: &[OptionDefinition] = &[
    choice("overlayFunc", "Select Overlay Function", OverlayFunction::CHOICES),
    input("inputId", None),
];
const OUTPUT_SET: &[OptionDefinition] = &[
    choice("outputId", "Select Output", OutputChannel::CHOICES),
    choice("outputType", "Select Input Type", OutputSource::CHOICES),
    input("outputInputId", None),
];
const VOLUME_FADE: &[OptionDefinition] = &[
    text("fade_Min", "Fade to volume", Some("000"), TextFormat::Digits),
    text("fade_Time", "Fade time in ms", Some("2000"), TextFormat::Milliseconds),
    input("fade_Input", Some("1")),
];
const START_COUNTDOWN: &[OptionDefinition] = &[input("countdownStartInput", Some("1"))];
const STOP_COUNTDOWN: &[OptionDefinition] = &[input("countdownStopInput", Some("1"))];
const SET_COUNTDOWN_TIME: &[OptionDefinition] = &[
    text("countdownTime", "Time (00:00:00)", Some("00:10:00"), TextFormat::ClockTime),
    input("countdownSetInput", Some("1")),
];
const NEXT_PICTURE: &[OptionDefinition] = &[input("nPictureInput", Some("1"))];
const PREVIOUS_PICTURE: &[OptionDefinition] = &[input("pPictureInput", Some("1"))];
const KEY_PRESS: &[OptionDefinition] = &[text("key", "key", None, TextFormat::Free)];
const SCRIPT: &[OptionDefinition] = &[text("script", "Script name", None, TextFormat::Free)];
const CUSTOM_COMMAND: &[OptionDefinition] = &[text("command", "Command", Some(""), TextFormat::Free)];

/// Actions exposed to the host, identified by their host-facing id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    QuickPlay,
    ProgramSelect,
    PreviewSelect,
    PreviewNext,
    PreviewPrevious,
    Transition,
    ToggleFunctions,
    PlaylistFunctions,
    OpenPlaylist,
    OverlayProgram,
    OverlayPreview,
    OverlayFunctions,
    OutputSet,
    VolumeFade,
    StartCountdown,
    StopCountdown,
    SetCountdownTime,
    NextPicture,
    PreviousPicture,
    KeyPress,
    ScriptStart,
    ScriptStop,
    ScriptStopAll,
    Command,
}

impl ActionKind {
    pub const ALL: [ActionKind; 24] = [
        ActionKind::QuickPlay,
        ActionKind::ProgramSelect,
        ActionKind::PreviewSelect,
        ActionKind::PreviewNext,
        ActionKind::PreviewPrevious,
        ActionKind::Transition,
        ActionKind::ToggleFunctions,
        ActionKind::PlaylistFunctions,
        ActionKind::OpenPlaylist,
        ActionKind::OverlayProgram,
        ActionKind::OverlayPreview,
        ActionKind::OverlayFunctions,
        ActionKind::OutputSet,
        ActionKind::VolumeFade,
        ActionKind::StartCountdown,
        ActionKind::StopCountdown,
        ActionKind::SetCountdownTime,
        ActionKind::NextPicture,
        ActionKind::PreviousPicture,
        ActionKind::KeyPress,
        ActionKind::ScriptStart,
        ActionKind::ScriptStop,
        ActionKind::ScriptStopAll,
        ActionKind::Command,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ActionKind::QuickPlay => "quickPlay",
            ActionKind::ProgramSelect => "pgmSel",
            ActionKind::PreviewSelect => "prwSel",
            ActionKind::PreviewNext => "prwNext",
            ActionKind::PreviewPrevious => "prwPrv",
            ActionKind::Transition => "transition",
            ActionKind::ToggleFunctions => "toggle_functions",
            ActionKind::PlaylistFunctions => "playList_Functions",
            ActionKind::OpenPlaylist => "open_pl",
            ActionKind::OverlayProgram => "overlayPgm",
            ActionKind::OverlayPreview => "overlayPrw",
            ActionKind::OverlayFunctions => "overlayFunctions",
            ActionKind::OutputSet => "outputSet",
            ActionKind::VolumeFade => "volumeFade",
            ActionKind::StartCountdown => "startCountdown",
            ActionKind::StopCountdown => "stopCountdown",
            ActionKind::SetCountdownTime => "setCountdownTime",
            ActionKind::NextPicture => "nextPicture",
            ActionKind::PreviousPicture => "previousPicture",
            ActionKind::KeyPress => "keyPress",
            ActionKind::ScriptStart => "scriptStart",
            ActionKind::ScriptStop => "scriptStop",
            ActionKind::ScriptStopAll => "scriptStopAll",
            ActionKind::Command => "command",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::QuickPlay => "Quick Play input to Program",
            ActionKind::ProgramSelect => "Send Input to Program",
            ActionKind::PreviewSelect => "Send Input to Preview",
            ActionKind::PreviewNext => "Send Next input to Preview",
            ActionKind::PreviewPrevious => "Send Previous input to Preview",
            ActionKind::Transition => "Auto Transition",
            ActionKind::ToggleFunctions => "Toggle Functions",
            ActionKind::PlaylistFunctions => "Play List Functions",
            ActionKind::OpenPlaylist => "Open Play list",
            ActionKind::OverlayProgram => "Toggle Overlay on Program",
            ActionKind::OverlayPreview => "Set Overlay on Preview",
            ActionKind::OverlayFunctions => "Overlay Functions",
            ActionKind::OutputSet => "Set Output Source",
            ActionKind::VolumeFade => "Set Volume Fade",
            ActionKind::StartCountdown => "Start Countdown",
            ActionKind::StopCountdown => "Stop Countdown",
            ActionKind::SetCountdownTime => "Set Countdown Time",
            ActionKind::NextPicture => "Next Picture/Slide",
            ActionKind::PreviousPicture => "Previous Picture/Slide",
            ActionKind::KeyPress => "KeyPress",
            ActionKind::ScriptStart => "Script start",
            ActionKind::ScriptStop => "Script stop",
            ActionKind::ScriptStopAll => "Script stop all",
            ActionKind::Command => "Run custom command",
        }
    }

    /// Options the action reads, in template order.
    pub fn options(&self) -> &'static [OptionDefinition] {
        match self {
            ActionKind::QuickPlay | ActionKind::ProgramSelect => PROGRAM_INPUT,
            ActionKind::PreviewSelect => PREVIEW_INPUT,
            ActionKind::PreviewNext | ActionKind::PreviewPrevious | ActionKind::ScriptStopAll => &[],
            ActionKind::Transition => TRANSITION,
            ActionKind::ToggleFunctions => TOGGLE,
            ActionKind::PlaylistFunctions => PLAYLIST,
            ActionKind::OpenPlaylist => OPEN_PLAYLIST,
            ActionKind::OverlayProgram => OVERLAY_PROGRAM,
            ActionKind::OverlayPreview => OVERLAY_PREVIEW,
            ActionKind::OverlayFunctions => OVERLAY_FUNCTIONS,
            ActionKind::OutputSet => OUTPUT_SET,
            ActionKind::VolumeFade => VOLUME_FADE,
            ActionKind::StartCountdown => START_COUNTDOWN,
            ActionKind::StopCountdown => STOP_COUNTDOWN,
            ActionKind::SetCountdownTime => SET_COUNTDOWN_TIME,
            ActionKind::NextPicture => NEXT_PICTURE,
            ActionKind::PreviousPicture => PREVIOUS_PICTURE,
            ActionKind::KeyPress => KEY_PRESS,
            ActionKind::ScriptStart | ActionKind::ScriptStop => SCRIPT,
            ActionKind::Command => CUSTOM_COMMAND,
        }
    }
}

impl FromStr for ActionKind {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionKind::ALL
            .iter()
            .find(|kind| kind.id() == s)
            .copied()
            .ok_or_else(|| EncodingError::UnsupportedAction(s.to_string()))
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// A single user trigger as received from the host: the action id and its raw option values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionRequest {
    pub kind: String,
    pub options: ActionOptions,
}

impl ActionRequest {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            options: ActionOptions::new(),
        }
    }

    pub fn with_option(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(id.into(), value.into());
        self
    }

    /// Check the supplied free-text values against their formats. Input references are checked
    /// against `addressing`. Missing options and dropdowns are left to encoding.
    pub fn validate(&self, addressing: InputAddressing) -> Result<(), EncodingError> {
        let kind: ActionKind = self.kind.parse()?;
        for definition in kind.options() {
            let Some(value) = self.options.get(definition.id) else {
                continue;
            };
            let accepted = match definition.field {
                OptionField::Input { .. } => addressing.accepts(value),
                OptionField::Text { format, .. } => format.accepts(value),
                OptionField::Choice { .. } => true,
            };
            if !accepted {
                return Err(EncodingError::InvalidValue {
                    option: definition.id,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Typed form of an action. Dropdown options are closed sets, free-text options are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    QuickPlay { input: String },
    ProgramSelect { input: String },
    PreviewSelect { input: String },
    PreviewNext,
    PreviewPrevious,
    Transition(Transition),
    Toggle(ToggleFunction),
    Playlist(PlaylistFunction),
    OpenPlaylist { name: String },
    OverlayProgram { overlay: ProgramOverlay, input: String },
    OverlayPreview { overlay: PreviewOverlay, input: String },
    OverlayFunction { function: OverlayFunction, input: String },
    OutputSet { output: OutputChannel, source: OutputSource, input: String },
    VolumeFade { volume: String, duration_ms: String, input: String },
    StartCountdown { input: String },
    StopCountdown { input: String },
    SetCountdownTime { time: String, input: String },
    NextPicture { input: String },
    PreviousPicture { input: String },
    KeyPress { key: String },
    ScriptStart { script: String },
    ScriptStop { script: String },
    ScriptStopAll,
    Custom { function: String },
}

struct OptionReader<'a> {
    kind: ActionKind,
    options: &'a ActionOptions,
}

impl<'a> OptionReader<'a> {
    fn text(&self, option: &'static str) -> Result<String, EncodingError> {
        self.options
            .get(option)
            .cloned()
            .ok_or(EncodingError::MissingOption {
                action: self.kind.id(),
                option,
            })
    }

    fn choice<T: FromStr>(&self, option: &'static str) -> Result<T, EncodingError> {
        let value = self.text(option)?;
        value
            .parse()
            .map_err(|_| EncodingError::InvalidChoice { option, value })
    }
}

impl Action {
    pub fn parse(kind: ActionKind, options: &ActionOptions) -> Result<Self, EncodingError> {
        let opt = OptionReader { kind, options };
        let action = match kind {
            ActionKind::QuickPlay => Action::QuickPlay { input: opt.text("pgmId")? },
            ActionKind::ProgramSelect => Action::ProgramSelect { input: opt.text("pgmId")? },
            ActionKind::PreviewSelect => Action::PreviewSelect { input: opt.text("prwId")? },
            ActionKind::PreviewNext => Action::PreviewNext,
            ActionKind::PreviewPrevious => Action::PreviewPrevious,
            ActionKind::Transition => Action::Transition(opt.choice("transId")?),
            ActionKind::ToggleFunctions => Action::Toggle(opt.choice("toggleID")?),
            ActionKind::PlaylistFunctions => Action::Playlist(opt.choice("plfId")?),
            ActionKind::OpenPlaylist => Action::OpenPlaylist { name: opt.text("plName")? },
            ActionKind::OverlayProgram => Action::OverlayProgram {
                overlay: opt.choice("overlayId")?,
                input: opt.text("pgmId")?,
            },
            ActionKind::OverlayPreview => Action::OverlayPreview {
                overlay: opt.choice("overlayId")?,
                input: opt.text("prwId")?,
            },
            ActionKind::OverlayFunctions => Action::OverlayFunction {
                function: opt.choice("overlayFunc")?,
                input: opt.text("inputId")?,
            },
            ActionKind::OutputSet => Action::OutputSet {
                output: opt.choice("outputId")?,
                source: opt.choice("outputType")?,
                input: opt.text("outputInputId")?,
            },
            ActionKind::VolumeFade => Action::VolumeFade {
                volume: opt.text("fade_Min")?,
                duration_ms: opt.text("fade_Time")?,
                input: opt.text("fade_Input")?,
            },
            ActionKind::StartCountdown => Action::StartCountdown { input: opt.text("countdownStartInput")? },
            ActionKind::StopCountdown => Action::StopCountdown { input: opt.text("countdownStopInput")? },
            ActionKind::SetCountdownTime => Action::SetCountdownTime {
                time: opt.text("countdownTime")?,
                input: opt.text("countdownSetInput")?,
            },
            ActionKind::NextPicture => Action::NextPicture { input: opt.text("nPictureInput")? },
            ActionKind::PreviousPicture => Action::PreviousPicture { input: opt.text("pPictureInput")? },
            ActionKind::KeyPress => Action::KeyPress { key: opt.text("key")? },
            ActionKind::ScriptStart => Action::ScriptStart { script: opt.text("script")? },
            ActionKind::ScriptStop => Action::ScriptStop { script: opt.text("script")? },
            ActionKind::ScriptStopAll => Action::ScriptStopAll,
            ActionKind::Command => Action::Custom { function: opt.text("command")? },
        };
        Ok(action)
    }

    pub fn from_request(request: &ActionRequest) -> Result<Self, EncodingError> {
        let kind: ActionKind = request.kind.parse()?;
        Self::parse(kind, &request.options)
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::QuickPlay { .. } => ActionKind::QuickPlay,
            Action::ProgramSelect { .. } => ActionKind::ProgramSelect,
            Action::PreviewSelect { .. } => ActionKind::PreviewSelect,
            Action::PreviewNext => ActionKind::PreviewNext,
            Action::PreviewPrevious => ActionKind::PreviewPrevious,
            Action::Transition(_) => ActionKind::Transition,
            Action::Toggle(_) => ActionKind::ToggleFunctions,
            Action::Playlist(_) => ActionKind::PlaylistFunctions,
            Action::OpenPlaylist { .. } => ActionKind::OpenPlaylist,
            Action::OverlayProgram { .. } => ActionKind::OverlayProgram,
            Action::OverlayPreview { .. } => ActionKind::OverlayPreview,
            Action::OverlayFunction { .. } => ActionKind::OverlayFunctions,
            Action::OutputSet { .. } => ActionKind::OutputSet,
            Action::VolumeFade { .. } => ActionKind::VolumeFade,
            Action::StartCountdown { .. } => ActionKind::StartCountdown,
            Action::StopCountdown { .. } => ActionKind::StopCountdown,
            Action::SetCountdownTime { .. } => ActionKind::SetCountdownTime,
            Action::NextPicture { .. } => ActionKind::NextPicture,
            Action::PreviousPicture { .. } => ActionKind::PreviousPicture,
            Action::KeyPress { .. } => ActionKind::KeyPress,
            Action::ScriptStart { .. } => ActionKind::ScriptStart,
            Action::ScriptStop { .. } => ActionKind::ScriptStop,
            Action::ScriptStopAll => ActionKind::ScriptStopAll,
            Action::Custom { .. } => ActionKind::Command,
        }
    }
}
