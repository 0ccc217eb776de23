// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Road-damage detection core
//!
//! One pipeline type, instantiated once per expert:
//! - `reducer` - best-confidence reduction of a detector's candidates
//! - `pipeline` - readiness/payload checks, decode, infer, reduce
//! - `response` - verdict shaping with per-expert labels
//! - `registry` - both experts addressed by [`ExpertId`]
//! - `triage` - pothole-first cascade with general-damage fallback

pub mod error;
pub mod expert;
pub mod pipeline;
pub mod reducer;
pub mod registry;
pub mod response;
pub mod triage;

pub use error::DetectError;
pub use expert::{ExpertId, ExpertProfile};
pub use pipeline::{DetectionPipeline, ModelHandle};
pub use reducer::{reduce, Verdict, PLACEHOLDER_LABEL};
pub use registry::{ExpertRegistry, ExpertStatus};
pub use response::DetectionResponse;
pub use triage::{ReportStatus, Severity, TriageReport};
