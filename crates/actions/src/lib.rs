// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ranger-actions: small actions composed on the public ranger-core contract
//!
//! - [`Delay`]: wait a fixed time, then react
//! - [`Await`]: poll a condition every update, react once it holds
//! - [`Post`] / [`Signal`]: instant named announcements visible in the
//!   termination log

mod delay;
mod post;
mod wait;

pub use delay::Delay;
pub use post::{Post, Signal};
pub use wait::Await;

use ranger_core::ActionContext;

/// One-shot callback run from an action hook
pub type Reaction = Box<dyn FnOnce(&mut ActionContext) + Send>;
