// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod accumulator;
pub mod tracing_decoder;

pub use accumulator::{AccumulatorCommand, AccumulatorDecoder};
pub use tracing_decoder::TracingDecoder;
