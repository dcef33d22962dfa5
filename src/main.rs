// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use the_ringwood::backends::local::AccumulatorCommand;
use the_ringwood::buffer::{CommandWriter, SharedCommandBuffer};
use the_ringwood::config::{load_and_validate_config, EngineConfig, RuntimeBuilder};
use the_ringwood::errors::CommandBufferError;
use the_ringwood::traits::CommandBuffer;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Commands written by the demo producer.
const DEMO_ITERATIONS: u32 = 1000;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() > 2 {
        eprintln!("Usage: {} [config.yaml]", args[0]);
        std::process::exit(1);
    }

    let cfg = match args.get(1) {
        Some(path) => load_and_validate_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => EngineConfig::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level)),
        )
        .init();

    println!("🚀 Ringwood Command Processor");
    println!("═════════════════════════════");
    println!("Handler: {}", cfg.handler);
    println!("Ring buffer: {} bytes", cfg.ring_buffer_size);
    println!("Commands per update: {}", cfg.commands_per_update);
    println!();

    let (command_buffer, scheduler) = RuntimeBuilder::from_config(&cfg)?;
    let shutdown = CancellationToken::new();
    let driver = tokio::spawn(scheduler.run(shutdown.clone()));

    let start = Instant::now();
    let result_buffer = command_buffer.create_transfer_buffer(4)?;
    let producer = tokio::spawn(produce(command_buffer.clone(), result_buffer));
    let token = producer.await??;
    let elapsed = start.elapsed();

    shutdown.cancel();
    let processor = driver.await?;

    let state = command_buffer.get_state();
    println!("📊 Final state (token {} after {:?}):", token, elapsed);
    println!("{}", serde_json::to_string_pretty(&state)?);
    println!("Processor: {:?}", processor.state());
    if let Some(result) = command_buffer
        .get_transfer_buffer(result_buffer)
        .memory
        .and_then(|memory| memory.get(0))
    {
        println!("Stored result: {}", result as i32);
    }

    Ok(())
}

/// Writes the demo workload, then waits until the processor has reached the
/// final token or stopped on a fatal error.
async fn produce(command_buffer: Arc<SharedCommandBuffer>, result_buffer: u32) -> Result<i32> {
    let mut writer = CommandWriter::new(command_buffer.clone());

    write(&mut writer, AccumulatorCommand::Clear.opcode(), &[]).await?;
    for value in 1..=DEMO_ITERATIONS {
        write(&mut writer, AccumulatorCommand::Add.opcode(), &[value]).await?;
    }
    write(&mut writer, AccumulatorCommand::Multiply.opcode(), &[2]).await?;
    write(
        &mut writer,
        AccumulatorCommand::StoreResult.opcode(),
        &[result_buffer, 0],
    )
    .await?;

    let token = loop {
        match writer.insert_token() {
            Ok(token) => break token,
            Err(CommandBufferError::RingFull { .. }) => wait_for_space(&mut writer).await?,
            Err(e) => return Err(e.into()),
        }
    };
    writer.flush();

    while !writer.has_token_passed(token) && !command_buffer.get_error_status() {
        tokio::task::yield_now().await;
    }
    Ok(token)
}

async fn write(writer: &mut CommandWriter, command: u32, args: &[u32]) -> Result<()> {
    loop {
        match writer.write_command(command, args) {
            Ok(()) => return Ok(()),
            Err(CommandBufferError::RingFull { .. }) => wait_for_space(writer).await?,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Publishes what is written so far and lets the processor catch up.
async fn wait_for_space(writer: &mut CommandWriter) -> Result<()> {
    let state = writer.flush();
    if state.error_status {
        anyhow::bail!("Command processing stopped: {}", state.error);
    }
    tokio::task::yield_now().await;
    Ok(())
}
