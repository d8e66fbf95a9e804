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

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Unsupported action: {0}")]
    UnsupportedAction(String),

    #[error("Action {action} requires option '{option}'")]
    MissingOption {
        action: &'static str,
        option: &'static str,
    },

    #[error("Invalid value '{value}' for option '{option}'")]
    InvalidChoice {
        option: &'static str,
        value: String,
    },

    #[error("Value '{value}' has the wrong format for option '{option}'")]
    InvalidValue {
        option: &'static str,
        value: String,
    },
}

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Socket not connected")]
    NotConnected,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("Failed to encode action: {0}")]
    Encoding(#[from] EncodingError),

    /// The adapter service task has stopped and no longer accepts requests.
    #[error("Adapter service is not running")]
    ServiceStopped,
}
