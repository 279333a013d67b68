//
// lib.rs
//
// Copyright (C) 2024 Posit Software, PBC. All rights reserved.
//
//

pub mod config;
pub mod context;
pub mod engine;
pub mod filter;
pub mod pipe;
pub mod session;
pub mod store;

#[cfg(any(test, feature = "testing"))]
pub mod fixtures;

pub use crate::config::OmniConfig;
pub use crate::context::Context;
pub use crate::context::ContextKind;
pub use crate::engine::CompletionResponse;
pub use crate::engine::Engine;
pub use crate::session::OfflineSession;
pub use crate::session::Session;
pub use crate::store::CandidateStore;
