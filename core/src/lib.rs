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

pub mod action;
pub mod adapter;
pub mod command;
pub mod config;
pub mod connection;
pub mod definitions;
pub mod errors;
pub mod feedback;
pub mod host;
pub mod tally;
pub mod tcp_connection;

mod adapter_service;
mod service;

#[cfg(test)]
mod test_utils;

pub use action::{Action, ActionKind, ActionOptions, ActionRequest, OptionDefinition, OptionField, TextFormat};
pub use adapter::{ActionOutcome, Adapter};
pub use adapter_service::{spawn_adapter, AdapterHandle};
pub use command::{Command, CommandEncoder};
pub use config::{AdapterConfig, InputAddressing};
pub use connection::{Connection, ConnectionEvent, ConnectionEvents, ConnectionFactory, ConnectionState};
pub use errors::{AdapterError, ConnectionError, EncodingError};
pub use feedback::{Color, FeedbackKind, FeedbackRequest, FeedbackStyle};
pub use host::{HostListener, InstanceStatus, NoopHostListener};
pub use service::{spawn_service, ServiceHandle, StopHandle};
pub use tally::{TallyState, TallyStatus};
pub use tcp_connection::{TcpConnection, TcpConnectionOptions, TcpConnector};
