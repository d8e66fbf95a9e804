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

pub const DEFAULT_HOST: &str = "127.0.0.1";
/// vMix TCP API port.
pub const DEFAULT_PORT: u16 = 8099;

/// How actions refer to inputs: by number or by title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputAddressing {
    #[default]
    Id,
    Title,
}

impl InputAddressing {
    pub fn id(&self) -> &'static str {
        match self {
            InputAddressing::Id => "id",
            InputAddressing::Title => "title",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InputAddressing::Id => "Input Number",
            InputAddressing::Title => "Input Title",
        }
    }

    /// Whether `value` is acceptable as an input reference in this mode.
    ///
    /// The adapter checks action inputs with this before encoding; the encoder itself sends
    /// whatever it gets.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            InputAddressing::Id => !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
            InputAddressing::Title => true,
        }
    }

    pub fn pattern(&self) -> Option<&'static str> {
        match self {
            InputAddressing::Id => Some("^[0-9]+$"),
            InputAddressing::Title => None,
        }
    }
}

impl FromStr for InputAddressing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(InputAddressing::Id),
            "title" => Ok(InputAddressing::Title),
            _ => Err(format!("Invalid input type: {}", s)),
        }
    }
}

impl fmt::Display for InputAddressing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    pub host: String,
    pub port: u16,
    pub input_addressing: InputAddressing,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            input_addressing: InputAddressing::default(),
        }
    }
}

impl AdapterConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_input_addressing(mut self, input_addressing: InputAddressing) -> Self {
        self.input_addressing = input_addressing;
        self
    }

    /// A blank host means the user has not configured the instance yet.
    pub fn has_host(&self) -> bool {
        !self.host.trim().is_empty()
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
