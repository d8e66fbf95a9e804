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

//! Closed choice sets used by vMix actions.
//!
//! Every variant maps to the exact function name (or parameter value) vMix expects on the wire,
//! plus a human readable label for host UIs.

use std::fmt;
use std::str::FromStr;

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => ($id:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// `(id, label)` pairs in display order, as offered to host dropdowns.
            pub const CHOICES: &'static [(&'static str, &'static str)] = &[$(($id, $label)),+];

            /// Value sent to vMix.
            pub fn id(&self) -> &'static str {
                match self {
                    $($name::$variant => $id),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($id => Ok($name::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($name), s)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.id())
            }
        }
    };
}

choice_enum! {
    /// Auto transitions, sent as bare function names.
    pub enum Transition {
        Transition1 => ("Transition1", "Transition 1"),
        Transition2 => ("Transition2", "Transition 2"),
        Transition3 => ("Transition3", "Transition 3"),
        Transition4 => ("Transition4", "Transition 4"),
        Stinger1 => ("Stinger1", "Stinger 1"),
        Stinger2 => ("Stinger2", "Stinger 2"),
    }
}

choice_enum! {
    pub enum ToggleFunction {
        StartStopMultiCorder => ("StartStopMultiCorder", "Start / Stop MultiCorder"),
        StartStopRecording => ("StartStopRecording", "Start / Stop Recording"),
        StartStopStreaming => ("StartStopStreaming", "Start / Stop Stream"),
        StartStopExternal => ("StartStopExternal", "Start / Stop External"),
        Fullscreen => ("Fullscreen", "Start / Stop Fullscreen"),
        FadeToBlack => ("FadeToBlack", "Fade To Black"),
    }
}

choice_enum! {
    pub enum PlaylistFunction {
        StartPlayList => ("StartPlayList", "Start Play List"),
        StopPlayList => ("StopPlayList", "Stop Play List"),
        NextPlayListEntry => ("NextPlayListEntry", "Next Item in Play List"),
        PreviousPlayListEntry => ("PreviousPlayListEntry", "Previous Item in Play List"),
    }
}

choice_enum! {
    /// Overlay channels toggled on program.
    pub enum ProgramOverlay {
        OverlayInput1 => ("OverlayInput1", "Overlay nr 1"),
        OverlayInput2 => ("OverlayInput2", "Overlay nr 2"),
        OverlayInput3 => ("OverlayInput3", "Overlay nr 3"),
        OverlayInput4 => ("OverlayInput4", "Overlay nr 4"),
    }
}

choice_enum! {
    /// Overlay channels set on preview.
    pub enum PreviewOverlay {
        PreviewOverlayInput1 => ("PreviewOverlayInput1", "Overlay nr 1"),
        PreviewOverlayInput2 => ("PreviewOverlayInput2", "Overlay nr 2"),
        PreviewOverlayInput3 => ("PreviewOverlayInput3", "Overlay nr 3"),
        PreviewOverlayInput4 => ("PreviewOverlayInput4", "Overlay nr 4"),
    }
}

choice_enum! {
    pub enum OverlayFunction {
        OverlayInput1 => ("OverlayInput1", "Toggle Overlay 1 on program"),
        OverlayInput2 => ("OverlayInput2", "Toggle Overlay 2 on program"),
        OverlayInput3 => ("OverlayInput3", "Toggle Overlay 3 on program"),
        OverlayInput4 => ("OverlayInput4", "Toggle Overlay 4 on program"),
        PreviewOverlayInput1 => ("PreviewOverlayInput1", "Toggle Overlay 1 on preview"),
        PreviewOverlayInput2 => ("PreviewOverlayInput2", "Toggle Overlay 2 on preview"),
        PreviewOverlayInput3 => ("PreviewOverlayInput3", "Toggle Overlay 3 on preview"),
        PreviewOverlayInput4 => ("PreviewOverlayInput4", "Toggle Overlay 4 on preview"),
        OverlayInput1In => ("OverlayInput1In", "Transition Overlay 1 on"),
        OverlayInput2In => ("OverlayInput2In", "Transition Overlay 2 on"),
        OverlayInput3In => ("OverlayInput3In", "Transition Overlay 3 on"),
        OverlayInput4In => ("OverlayInput4In", "Transition Overlay 4 on"),
        OverlayInput1Out => ("OverlayInput1Out", "Transition Overlay 1 off"),
        OverlayInput2Out => ("OverlayInput2Out", "Transition Overlay 2 off"),
        OverlayInput3Out => ("OverlayInput3Out", "Transition Overlay 3 off"),
        OverlayInput4Out => ("OverlayInput4Out", "Transition Overlay 4 off"),
        OverlayInput1Off => ("OverlayInput1Off", "Set Overlay 1 off"),
        OverlayInput2Off => ("OverlayInput2Off", "Set Overlay 2 off"),
        OverlayInput3Off => ("OverlayInput3Off", "Set Overlay 3 off"),
        OverlayInput4Off => ("OverlayInput4Off", "Set Overlay 4 off"),
        OverlayAllOff => ("OverlayAllOff", "Set All Overlays off"),
        OverlayInput1Zoom => ("OverlayInput1Zoom", "Zoom PIP Overlay 1 to/from fullscreen"),
        OverlayInput2Zoom => ("OverlayInput2Zoom", "Zoom PIP Overlay 2 to/from fullscreen"),
        OverlayInput3Zoom => ("OverlayInput3Zoom", "Zoom PIP Overlay 3 to/from fullscreen"),
        OverlayInput4Zoom => ("OverlayInput4Zoom", "Zoom PIP Overlay 4 to/from fullscreen"),
    }
}

choice_enum! {
    /// Output selected by the `outputSet` action. The id doubles as the function name.
    pub enum OutputChannel {
        SetOutput2 => ("SetOutput2", "Output 2"),
        SetOutput3 => ("SetOutput3", "Output 3"),
        SetOutput4 => ("SetOutput4", "Output 4"),
        SetOutputExternal2 => ("SetOutputExternal2", "Output External 2"),
        SetOutputFullscreen => ("SetOutputFullscreen", "Output Fullscreen 1"),
        SetOutputFullscreen2 => ("SetOutputFullscreen2", "Output Fullscreen 2"),
    }
}

choice_enum! {
    /// Source routed to an output, sent as the `Value` parameter.
    pub enum OutputSource {
        Output => ("Output", "Output (Program)"),
        Preview => ("Preview", "Preview"),
        MultiView => ("MultiView", "Multiview"),
        Input => ("Input", "Input"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_choice() {
        assert_eq!("Stinger2".parse::<Transition>(), Ok(Transition::Stinger2));
        assert_eq!("MultiView".parse::<OutputSource>(), Ok(OutputSource::MultiView));
    }

    #[test]
    fn choice_ids_are_case_sensitive() {
        assert!("stinger2".parse::<Transition>().is_err());
        assert!("".parse::<ToggleFunction>().is_err());
    }

    #[test]
    fn overlay_function_set_is_complete() {
        assert_eq!(OverlayFunction::ALL.len(), 25);
        for function in OverlayFunction::ALL {
            assert_eq!(function.id().parse::<OverlayFunction>(), Ok(*function));
        }
    }

    #[test]
    fn display_uses_wire_id() {
        assert_eq!(OutputChannel::SetOutputFullscreen.to_string(), "SetOutputFullscreen");
    }

    #[test]
    fn choices_follow_variant_order() {
        assert_eq!(OutputChannel::CHOICES.len(), OutputChannel::ALL.len());
        assert_eq!(OutputChannel::CHOICES[4], ("SetOutputFullscreen", "Output Fullscreen 1"));
        for (choice, variant) in Transition::CHOICES.iter().zip(Transition::ALL) {
            assert_eq!(choice.0, variant.id());
        }
    }
}
