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

//! The cloud logger surface.

use crate::event::Event;
use crate::level::CloudLevel;

/// Returns a handle for sending events to the cloud collector.
pub fn logger() -> CloudLogger {
    CloudLogger(())
}

/// A handle for sending log events directly to the cloud collector.
///
/// Every method is fail-safe: missing credentials, missing targets, and
/// delivery problems all degrade to a skipped send, never an error or panic
/// in the caller.
///
/// # Examples
///
/// ```no_run
/// let log = logship::logger();
/// log.info("service started");
/// log.error("database unreachable");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudLogger(());

impl CloudLogger {
    /// Starts an event at the given level. Extend and [`send`][Event::send]
    /// it.
    pub fn event(&self, level: CloudLevel, message: impl Into<String>) -> Event {
        Event::new(level, message)
    }

    /// Sends a debug-level event.
    pub fn debug(&self, message: impl Into<String>) {
        self.event(CloudLevel::Debug, message).send();
    }

    /// Sends an info-level event.
    pub fn info(&self, message: impl Into<String>) {
        self.event(CloudLevel::Info, message).send();
    }

    /// Sends a warning-level event.
    pub fn warning(&self, message: impl Into<String>) {
        self.event(CloudLevel::Warning, message).send();
    }

    /// Sends an error-level event.
    pub fn error(&self, message: impl Into<String>) {
        self.event(CloudLevel::Error, message).send();
    }

    /// Sends an alert-level event.
    pub fn alert(&self, message: impl Into<String>) {
        self.event(CloudLevel::Alert, message).send();
    }

    /// Sends an exception event carrying the error and its source chain.
    ///
    /// The event has error severity and is tagged `exception` on the wire.
    pub fn exception(&self, message: impl Into<String>, error: &dyn std::error::Error) {
        Event::exception(render_error(&message.into(), error)).send();
    }
}

fn render_error(message: &str, error: &dyn std::error::Error) -> String {
    let mut combined = if message.is_empty() {
        String::new()
    } else {
        format!("{message}\n")
    };
    combined.push_str(&error.to_string());
    let mut source = error.source();
    while let Some(cause) = source {
        combined.push_str(&format!("\ncaused by: {cause}"));
        source = cause.source();
    }
    combined
}
