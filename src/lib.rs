// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod detection;
pub mod version;
pub mod vision;

pub use config::{log_filter, NodeConfig};
