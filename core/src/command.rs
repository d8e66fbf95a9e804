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

//! Encoding of actions into vMix TCP API command lines.
//!
//! Commands follow the `FUNCTION <Name> [Key=Value[&Key=Value...]]` form. Option values are
//! inserted verbatim; vMix parses the line literally, so nothing is escaped or quoted.

use std::fmt;

use crate::action::{Action, ActionKind, ActionOptions, ActionRequest};
use crate::errors::EncodingError;

pub const LINE_TERMINATOR: &str = "\r\n";

const FUNCTION_VERB: &str = "FUNCTION";
const SUBSCRIBE_TALLY: &str = "SUBSCRIBE TALLY";

/// A single command line, stored without its terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command(String);

impl Command {
    pub fn subscribe_tally() -> Self {
        Command(SUBSCRIBE_TALLY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The command as written to the socket, CRLF terminated.
    pub fn to_wire(&self) -> String {
        let mut line = String::with_capacity(self.0.len() + LINE_TERMINATOR.len());
        line.push_str(&self.0);
        line.push_str(LINE_TERMINATOR);
        line
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct FunctionCall {
    line: String,
    has_params: bool,
}

impl FunctionCall {
    fn new(name: &str) -> Self {
        Self {
            line: format!("{FUNCTION_VERB} {name}"),
            has_params: false,
        }
    }

    fn param(mut self, key: &str, value: &str) -> Self {
        self.line.push(if self.has_params { '&' } else { ' ' });
        self.line.push_str(key);
        self.line.push('=');
        self.line.push_str(value);
        self.has_params = true;
        self
    }

    /// Positional argument, used by functions that take a bare value after the name.
    fn argument(mut self, value: &str) -> Self {
        self.line.push(' ');
        self.line.push_str(value);
        self
    }

    fn build(self) -> Command {
        Command(self.line)
    }
}

pub struct CommandEncoder;

impl CommandEncoder {
    /// Encode an action given by its host id and raw options.
    pub fn encode(kind: &str, options: &ActionOptions) -> Result<Command, EncodingError> {
        let kind: ActionKind = kind.parse()?;
        let action = Action::parse(kind, options)?;
        Ok(Self::encode_action(&action))
    }

    pub fn encode_request(request: &ActionRequest) -> Result<Command, EncodingError> {
        Self::encode(&request.kind, &request.options)
    }

    pub fn encode_action(action: &Action) -> Command {
        let call = match action {
            Action::QuickPlay { input } => FunctionCall::new("QuickPlay").param("Input", input),
            Action::ProgramSelect { input } => FunctionCall::new("CutDirect").param("Input", input),
            Action::PreviewSelect { input } => FunctionCall::new("PreviewInput").param("Input", input),
            Action::PreviewNext => FunctionCall::new("PreviewInputNext"),
            Action::PreviewPrevious => FunctionCall::new("PreviewInputPrevious"),
            Action::Transition(transition) => FunctionCall::new(transition.id()),
            Action::Toggle(function) => FunctionCall::new(function.id()),
            Action::Playlist(function) => FunctionCall::new(function.id()),
            Action::OpenPlaylist { name } => FunctionCall::new("SelectPlayList").argument(name),
            Action::OverlayProgram { overlay, input } => FunctionCall::new(overlay.id()).param("Input", input),
            Action::OverlayPreview { overlay, input } => FunctionCall::new(overlay.id()).param("Input", input),
            Action::OverlayFunction { function, input } => FunctionCall::new(function.id()).param("Input", input),
            Action::OutputSet { output, source, input } => FunctionCall::new(output.id())
                .param("Value", source.id())
                .param("Input", input),
            // vMix expects lower-case keys and a "volume,duration" pair for this one
            Action::VolumeFade { volume, duration_ms, input } => FunctionCall::new("SetVolumeFade")
                .param("value", &format!("{volume},{duration_ms}"))
                .param("input", input),
            Action::StartCountdown { input } => FunctionCall::new("StartCountdown").param("Input", input),
            Action::StopCountdown { input } => FunctionCall::new("StopCountdown").param("Input", input),
            Action::SetCountdownTime { time, input } => FunctionCall::new("SetCountdown")
                .param("Value", time)
                .param("Input", input),
            Action::NextPicture { input } => FunctionCall::new("NextPicture").param("Input", input),
            Action::PreviousPicture { input } => FunctionCall::new("PreviousPicture").param("Input", input),
            Action::KeyPress { key } => FunctionCall::new("KeyPress").param("Value", key),
            Action::ScriptStart { script } => FunctionCall::new("ScriptStart").param("Value", script),
            Action::ScriptStop { script } => FunctionCall::new("ScriptStop").param("Value", script),
            Action::ScriptStopAll => FunctionCall::new("ScriptStopAll"),
            Action::Custom { function } => FunctionCall::new(function),
        };
        call.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(kind: &str, options: &[(&str, &str)]) -> Result<String, EncodingError> {
        let options: ActionOptions = options
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CommandEncoder::encode(kind, &options).map(|c| c.as_str().to_string())
    }

    #[test]
    fn encodes_every_action_kind() {
        let cases: &[(&str, &[(&str, &str)], &str)] = &[
            ("quickPlay", &[("pgmId", "3")], "FUNCTION QuickPlay Input=3"),
            ("pgmSel", &[("pgmId", "4")], "FUNCTION CutDirect Input=4"),
            ("prwSel", &[("prwId", "Camera 2")], "FUNCTION PreviewInput Input=Camera 2"),
            ("prwNext", &[], "FUNCTION PreviewInputNext"),
            ("prwPrv", &[], "FUNCTION PreviewInputPrevious"),
            ("transition", &[("transId", "Stinger1")], "FUNCTION Stinger1"),
            ("toggle_functions", &[("toggleID", "StartStopStreaming")], "FUNCTION StartStopStreaming"),
            ("playList_Functions", &[("plfId", "NextPlayListEntry")], "FUNCTION NextPlayListEntry"),
            ("open_pl", &[("plName", "Morning")], "FUNCTION SelectPlayList Morning"),
            (
                "overlayPgm",
                &[("overlayId", "OverlayInput2"), ("pgmId", "7")],
                "FUNCTION OverlayInput2 Input=7",
            ),
            (
                "overlayPrw",
                &[("overlayId", "PreviewOverlayInput3"), ("prwId", "8")],
                "FUNCTION PreviewOverlayInput3 Input=8",
            ),
            (
                "overlayFunctions",
                &[("overlayFunc", "OverlayInput1Zoom"), ("inputId", "2")],
                "FUNCTION OverlayInput1Zoom Input=2",
            ),
            (
                "outputSet",
                &[("outputId", "SetOutputFullscreen2"), ("outputType", "Input"), ("outputInputId", "9")],
                "FUNCTION SetOutputFullscreen2 Value=Input&Input=9",
            ),
            (
                "volumeFade",
                &[("fade_Min", "000"), ("fade_Time", "2000"), ("fade_Input", "1")],
                "FUNCTION SetVolumeFade value=000,2000&input=1",
            ),
            ("startCountdown", &[("countdownStartInput", "5")], "FUNCTION StartCountdown Input=5"),
            ("stopCountdown", &[("countdownStopInput", "5")], "FUNCTION StopCountdown Input=5"),
            (
                "setCountdownTime",
                &[("countdownTime", "00:10:00"), ("countdownSetInput", "5")],
                "FUNCTION SetCountdown Value=00:10:00&Input=5",
            ),
            ("nextPicture", &[("nPictureInput", "6")], "FUNCTION NextPicture Input=6"),
            ("previousPicture", &[("pPictureInput", "6")], "FUNCTION PreviousPicture Input=6"),
            ("keyPress", &[("key", "F5")], "FUNCTION KeyPress Value=F5"),
            ("scriptStart", &[("script", "Intro")], "FUNCTION ScriptStart Value=Intro"),
            ("scriptStop", &[("script", "Intro")], "FUNCTION ScriptStop Value=Intro"),
            ("scriptStopAll", &[], "FUNCTION ScriptStopAll"),
            ("command", &[("command", "Fade Duration=500")], "FUNCTION Fade Duration=500"),
        ];

        assert_eq!(cases.len(), ActionKind::ALL.len());
        for (kind, options, expected) in cases {
            assert_eq!(encode(kind, options).as_deref(), Ok(*expected), "action {kind}");
        }
    }

    #[test]
    fn output_set_scenario() {
        let request = ActionRequest::new("outputSet")
            .with_option("outputId", "SetOutput2")
            .with_option("outputType", "Output")
            .with_option("outputInputId", "5");
        let command = CommandEncoder::encode_request(&request).unwrap();
        assert_eq!(command.as_str(), "FUNCTION SetOutput2 Value=Output&Input=5");
        assert_eq!(command.to_wire(), "FUNCTION SetOutput2 Value=Output&Input=5\r\n");
    }

    #[test]
    fn unknown_kind_fails_loudly() {
        assert_eq!(
            encode("cutToBlack", &[]),
            Err(EncodingError::UnsupportedAction("cutToBlack".to_string()))
        );
    }

    #[test]
    fn options_are_not_escaped() {
        // A title containing '&' corrupts the parameter list; vMix receives it as-is.
        assert_eq!(
            encode("pgmSel", &[("pgmId", "Intro & Outro")]).as_deref(),
            Ok("FUNCTION CutDirect Input=Intro & Outro")
        );
    }

    #[test]
    fn fixed_commands_ignore_extra_options() {
        assert_eq!(
            encode("scriptStopAll", &[("script", "Intro")]).as_deref(),
            Ok("FUNCTION ScriptStopAll")
        );
    }

    #[test]
    fn subscribe_tally_wire_form() {
        assert_eq!(Command::subscribe_tally().to_wire(), "SUBSCRIBE TALLY\r\n");
    }
}
