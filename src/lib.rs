// Copyright 2025 Logship Developers
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

//! Logship is a fail-safe client SDK for shipping application log events to a
//! cloud log collector over HTTPS.
//!
//! # Overview
//!
//! The SDK resolves its configuration from explicit overrides, environment
//! variables (`LOGSHIP_*`), and built-in defaults, derives the collector
//! endpoint from a resource reference, and forwards each qualifying event
//! with a single best-effort POST. Delivery is fire and forget: missing
//! credentials, missing targets, and network failures all degrade to a
//! skipped send and are never surfaced to the caller.
//!
//! # Examples
//!
//! Send events directly:
//!
//! ```no_run
//! logship::configure()
//!     .api_key("key")
//!     .resource("https://cloud.logship.dev/u/alice/resources/r-123/")
//!     .apply();
//!
//! let log = logship::logger();
//! log.info("service started");
//! log.event(logship::CloudLevel::Error, "payment failed")
//!     .extra("order", "o-7")
//!     .send();
//! ```
//!
//! Or forward records from the `log` crate facade:
//!
//! ```no_run
//! logship::attach();
//!
//! log::warn!("cache miss rate above threshold");
//! ```

mod bridge;
mod config;
mod error;
mod event;
mod level;
mod logger;
mod resource;
mod transport;

pub use bridge::CloudHandler;
pub use bridge::attach;
pub use bridge::handler;
pub use bridge::try_attach;
pub use config::Config;
pub use config::Configure;
pub use config::DEFAULT_BASE_URL;
pub use config::ENV_API_KEY;
pub use config::ENV_BASE_URL;
pub use config::ENV_CLOUD_LEVEL;
pub use config::ENV_DEBUG;
pub use config::ENV_PORTAL_PREFIX;
pub use config::ENV_RESOURCE;
pub use config::ENV_RESOURCE_ID;
pub use config::ENV_RESOURCE_URL;
pub use config::ENV_USERNAME;
pub use config::configure;
pub use config::get_config;
pub use config::set_enabled;
pub use error::InvalidCloudLevel;
pub use error::SetupError;
pub use event::Event;
pub use level::CloudLevel;
pub use level::CloudLevelFilter;
pub use logger::CloudLogger;
pub use logger::logger;
pub use transport::API_KEY_HEADER;
pub use transport::USERNAME_HEADER;
