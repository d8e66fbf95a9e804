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

mod cli;
mod definitions;
mod listener;
mod requests;

use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use vmix_core::{spawn_adapter, Adapter, TcpConnector};

use crate::cli::Cli;
use crate::listener::StdoutHostListener;

async fn write_json_line<T: Serialize>(out: &mut tokio::io::Stdout, value: &T) -> anyhow::Result<()> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    out.write_all(&line).await?;
    out.flush().await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().write_style("VMIX_LOG_STYLE"))
        .filter_level(cli.log_level.to_level_filter())
        .init();

    let config = cli.adapter_config();
    info!("Starting vMix bridge for {} ({} addressing)", config.address(), config.input_addressing);

    let (listener, mut events) = StdoutHostListener::new();
    let connector = Arc::new(TcpConnector::new(cli.connection_options()));
    let handle = spawn_adapter(Adapter::new(connector, Arc::new(listener), config));

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Received Ctrl+C signal, exiting...");
                break;
            }
            Some(event) = events.recv() => write_json_line(&mut stdout, &event).await?,
            line = stdin.next_line() => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => {
                    let response = requests::handle_line(&handle, line.trim()).await;
                    write_json_line(&mut stdout, &response).await?;
                }
                Ok(None) => {
                    info!("Input closed, exiting...");
                    break;
                }
                Err(e) => {
                    error!("Failed to read input: {}", e);
                    break;
                }
            },
        }
    }

    if let Err(e) = handle.shutdown().await {
        error!("Adapter task failed: {}", e);
    }
    info!("vMix bridge exited");
    Ok(())
}
