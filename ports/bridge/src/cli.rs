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

use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use vmix_core::config::DEFAULT_PORT;
use vmix_core::{AdapterConfig, InputAddressing, TcpConnectionOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputType {
    /// Address inputs by number
    Id,
    /// Address inputs by title
    Title,
}

impl From<InputType> for InputAddressing {
    fn from(value: InputType) -> Self {
        match value {
            InputType::Id => InputAddressing::Id,
            InputType::Title => InputAddressing::Title,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// vMix host name or IP address
    #[arg(long, env = "VMIX_HOST", default_value = vmix_core::config::DEFAULT_HOST)]
    pub host: String,

    /// vMix TCP API port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// How actions refer to inputs
    #[arg(short, long, value_enum, default_value_t = InputType::Id)]
    pub input_type: InputType,

    /// Set the log level
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Delay between reconnect attempts in milliseconds, 0 disables reconnecting
    #[arg(short, long, default_value_t = 2000)]
    pub reconnect_ms: u64,
}

impl Cli {
    pub fn adapter_config(&self) -> AdapterConfig {
        AdapterConfig::new(self.host.clone(), self.port).with_input_addressing(self.input_type.into())
    }

    pub fn connection_options(&self) -> TcpConnectionOptions {
        let reconnect_interval = (self.reconnect_ms > 0).then(|| Duration::from_millis(self.reconnect_ms));
        TcpConnectionOptions { reconnect_interval }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_vmix() {
        let cli = Cli::try_parse_from(["vmix_bridge", "--host", "10.0.0.7"]).unwrap();
        assert_eq!(cli.adapter_config().address(), "10.0.0.7:8099");
        assert_eq!(cli.adapter_config().input_addressing, InputAddressing::Id);
        assert_eq!(cli.connection_options(), TcpConnectionOptions::default());
        assert_eq!(cli.log_level, LogLevel::Info);
    }

    #[test]
    fn zero_reconnect_disables_retry() {
        let cli = Cli::try_parse_from(["vmix_bridge", "--reconnect-ms", "0", "--input-type", "title"]).unwrap();
        assert_eq!(cli.connection_options().reconnect_interval, None);
        assert_eq!(cli.adapter_config().input_addressing, InputAddressing::Title);
    }

    #[test]
    fn log_level_flag_sets_the_filter() {
        let cli = Cli::try_parse_from(["vmix_bridge", "-l", "warn"]).unwrap();
        assert_eq!(cli.log_level.to_level_filter(), LevelFilter::Warn);
        assert!(Cli::try_parse_from(["vmix_bridge", "--log-level", "verbose"]).is_err());
    }
}
