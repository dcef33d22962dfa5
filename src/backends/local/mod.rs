// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod handlers;
pub mod factory;

pub use handlers::*;
pub use factory::LocalHandlerFactory;
