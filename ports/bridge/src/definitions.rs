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

//! Action and feedback forms, so a host can render them without its own copy of the tables.

use serde::Serialize;
use vmix_core::feedback::{DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};
use vmix_core::{ActionKind, Color, FeedbackKind, InputAddressing, OptionDefinition, OptionField};

#[derive(Debug, Serialize, PartialEq)]
pub struct Choice {
    pub id: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptionView {
    Text {
        id: &'static str,
        label: &'static str,
        default: Option<&'static str>,
        pattern: Option<&'static str>,
    },
    Dropdown {
        id: &'static str,
        label: &'static str,
        choices: Vec<Choice>,
    },
    Color {
        id: &'static str,
        label: &'static str,
        default: u32,
    },
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ActionView {
    pub id: &'static str,
    pub label: &'static str,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FeedbackView {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub options: Vec<OptionView>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Definitions {
    pub input_type: &'static str,
    pub actions: Vec<ActionView>,
    pub feedbacks: Vec<FeedbackView>,
}

fn option_view(definition: &OptionDefinition, addressing: InputAddressing) -> OptionView {
    let OptionDefinition { id, label, field } = *definition;
    match field {
        OptionField::Input { default } => OptionView::Text { id, label, default, pattern: addressing.pattern() },
        OptionField::Text { default, format } => OptionView::Text { id, label, default, pattern: format.pattern() },
        OptionField::Choice { choices } => OptionView::Dropdown {
            id,
            label,
            choices: choices.iter().map(|&(id, label)| Choice { id, label }).collect(),
        },
    }
}

fn color(id: &'static str, label: &'static str, default: Color) -> OptionView {
    OptionView::Color { id, label, default: default.packed() }
}

fn feedback_view(kind: FeedbackKind, addressing: InputAddressing) -> FeedbackView {
    FeedbackView {
        id: kind.id(),
        label: kind.label(),
        description: kind.description(),
        options: vec![
            color("fg", "Foreground color", DEFAULT_FOREGROUND),
            color("bg", "Background color", DEFAULT_BACKGROUND),
            OptionView::Text {
                id: "index",
                label: addressing.label(),
                default: Some("0"),
                pattern: InputAddressing::Id.pattern(),
            },
        ],
    }
}

/// Forms for the given addressing mode. Input fields carry the mode's pattern.
pub fn definitions(addressing: InputAddressing) -> Definitions {
    Definitions {
        input_type: addressing.id(),
        actions: ActionKind::ALL
            .iter()
            .map(|kind| ActionView {
                id: kind.id(),
                label: kind.label(),
                options: kind.options().iter().map(|o| option_view(o, addressing)).collect(),
            })
            .collect(),
        feedbacks: FeedbackKind::ALL.iter().map(|kind| feedback_view(*kind, addressing)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_action_and_feedback() {
        let defs = definitions(InputAddressing::Id);
        assert_eq!(defs.actions.len(), 24);
        assert_eq!(defs.feedbacks.len(), 2);
        assert_eq!(defs.actions[0].label, "Quick Play input to Program");
        assert_eq!(defs.feedbacks[1].description, "If the specified input is live, change colors of the bank");
    }

    #[test]
    fn input_fields_follow_addressing() {
        let by_id = definitions(InputAddressing::Id);
        assert_eq!(
            by_id.actions[1].options[0],
            OptionView::Text { id: "pgmId", label: "Input", default: None, pattern: Some("^[0-9]+$") }
        );
        let by_title = definitions(InputAddressing::Title);
        assert_eq!(
            by_title.actions[1].options[0],
            OptionView::Text { id: "pgmId", label: "Input", default: None, pattern: None }
        );
        let OptionView::Text { label, .. } = &by_title.feedbacks[0].options[2] else {
            panic!("index is a text field");
        };
        assert_eq!(*label, "Input Title");
    }

    #[test]
    fn serializes_dropdowns_and_colors() {
        let defs = definitions(InputAddressing::Id);
        let transition = serde_json::to_value(&defs.actions[5]).unwrap();
        assert_eq!(transition["id"], "transition");
        assert_eq!(transition["options"][0]["type"], "dropdown");
        assert_eq!(transition["options"][0]["choices"][0]["id"], "Transition1");

        let live = serde_json::to_value(&defs.feedbacks[1]).unwrap();
        assert_eq!(live["options"][1]["type"], "color");
        assert_eq!(live["options"][1]["default"], 0x00ff00);
    }
}
