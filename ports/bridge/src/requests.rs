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

//! JSON line protocol spoken on stdin/stdout.

use anyhow::{anyhow, Context};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use vmix_core::config::DEFAULT_PORT;
use vmix_core::feedback::{DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};
use vmix_core::{
    ActionOutcome, ActionRequest, AdapterConfig, AdapterHandle, Color, FeedbackKind, FeedbackRequest,
    InputAddressing,
};

use crate::definitions::{self, Definitions};

#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BridgeRequest {
    Action {
        action: String,
        #[serde(default)]
        options: Map<String, Value>,
    },
    Feedback {
        feedback: String,
        #[serde(deserialize_with = "input_index")]
        index: i64,
        /// Packed `0xRRGGBB` overrides.
        #[serde(default)]
        color: Option<u32>,
        #[serde(default)]
        bgcolor: Option<u32>,
    },
    Config {
        config: ConfigRequest,
    },
    /// Any value, e.g. `{"definitions":true}`.
    Definitions {
        definitions: IgnoredAny,
    },
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct ConfigRequest {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default, rename = "inputType")]
    pub input_type: Option<String>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Feedback indexes arrive from text fields as often as numbers.
fn input_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Index {
        Number(i64),
        Text(String),
    }

    match Index::deserialize(deserializer)? {
        Index::Number(index) => Ok(index),
        Index::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid input index '{}'", text))),
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum BridgeResponse {
    Sent { command: String },
    Dropped { command: String },
    Feedback { feedback: String, index: i64, matched: bool, color: Option<u32>, bgcolor: Option<u32> },
    Configured { address: String },
    Definitions(Definitions),
    Error { message: String },
}

/// Host UIs send numbers and strings alike; vMix only ever sees text.
fn option_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

impl BridgeRequest {
    pub fn parse(line: &str) -> anyhow::Result<Self> {
        serde_json::from_str(line).with_context(|| format!("Malformed request: {}", line))
    }
}

fn action_request(action: String, options: Map<String, Value>) -> ActionRequest {
    options
        .iter()
        .filter_map(|(id, value)| option_text(value).map(|text| (id, text)))
        .fold(ActionRequest::new(action), |request, (id, text)| request.with_option(id.as_str(), text))
}

async fn dispatch(handle: &AdapterHandle, request: BridgeRequest) -> anyhow::Result<BridgeResponse> {
    match request {
        BridgeRequest::Action { action, options } => {
            let outcome = handle.run_action(action_request(action, options)).await?;
            Ok(match outcome {
                ActionOutcome::Sent(command) => BridgeResponse::Sent { command: command.to_string() },
                ActionOutcome::Dropped(command) => BridgeResponse::Dropped { command: command.to_string() },
            })
        }
        BridgeRequest::Feedback { feedback, index, color, bgcolor } => {
            let kind: FeedbackKind = feedback.parse().map_err(|e: String| anyhow!(e))?;
            let request = FeedbackRequest::new(kind, index).with_colors(
                color.map_or(DEFAULT_FOREGROUND, Color::from_packed),
                bgcolor.map_or(DEFAULT_BACKGROUND, Color::from_packed),
            );
            let style = handle.feedback(request).await?;
            Ok(BridgeResponse::Feedback {
                feedback,
                index,
                matched: style.is_some(),
                color: style.map(|s| s.color.packed()),
                bgcolor: style.map(|s| s.bgcolor.packed()),
            })
        }
        BridgeRequest::Config { config } => {
            let input_addressing = match config.input_type.as_deref() {
                Some(input_type) => input_type.parse::<InputAddressing>().map_err(|e| anyhow!(e))?,
                None => InputAddressing::default(),
            };
            let config = AdapterConfig::new(config.host, config.port).with_input_addressing(input_addressing);
            let address = config.address();
            handle.update_config(config).await?;
            Ok(BridgeResponse::Configured { address })
        }
        BridgeRequest::Definitions { .. } => {
            let config = handle.config().await?;
            Ok(BridgeResponse::Definitions(definitions::definitions(config.input_addressing)))
        }
    }
}

/// Handle one input line. Failures become an error response so the session keeps going.
pub async fn handle_line(handle: &AdapterHandle, line: &str) -> BridgeResponse {
    let result = match BridgeRequest::parse(line) {
        Ok(request) => dispatch(handle, request).await,
        Err(e) => Err(e),
    };
    result.unwrap_or_else(|e| BridgeResponse::Error { message: format!("{:#}", e) })
}
