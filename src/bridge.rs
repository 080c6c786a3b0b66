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

//! Bridge to the `log` crate facade.
//!
//! [`CloudHandler`] implements [`log::Log`], so records emitted through
//! `log::info!` and friends can be forwarded to the collector. Use
//! [`attach`] to install it as the global logger, or compose a
//! [`handler`] into a multi-logger setup of your own.

use log::Metadata;
use log::Record;
use serde_json::Map;
use serde_json::Value;

use crate::config;
use crate::error::SetupError;
use crate::event::Event;
use crate::level::CloudLevel;

/// Returns a handler that forwards qualifying `log` records to the collector.
pub fn handler() -> CloudHandler {
    CloudHandler(())
}

/// A [`log::Log`] implementation that forwards qualifying records to the
/// cloud collector.
///
/// The record's target, module path, file, line, and key-value pairs travel
/// in the event's `extra` fields.
#[derive(Debug, Default)]
pub struct CloudHandler(());

impl log::Log for CloudHandler {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let cfg = config::get_config();
        cfg.enabled && cfg.cloud_level.forwards(CloudLevel::from(metadata.level()))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut extra = Map::new();
        extra.insert("target".to_owned(), record.target().into());
        if let Some(module_path) = record.module_path() {
            extra.insert("module_path".to_owned(), module_path.into());
        }
        if let Some(file) = record.file() {
            extra.insert("file".to_owned(), file.into());
        }
        if let Some(line) = record.line() {
            extra.insert("line".to_owned(), line.into());
        }
        let mut visitor = KvCollector { extra: &mut extra };
        let _ = record.key_values().visit(&mut visitor);

        Event::new(CloudLevel::from(record.level()), record.args().to_string())
            .extra_map(extra)
            .send();
    }

    fn flush(&self) {}
}

struct KvCollector<'a> {
    extra: &'a mut Map<String, Value>,
}

impl<'kvs> log::kv::VisitSource<'kvs> for KvCollector<'_> {
    fn visit_pair(
        &mut self,
        key: log::kv::Key<'kvs>,
        value: log::kv::Value<'kvs>,
    ) -> Result<(), log::kv::Error> {
        self.extra.insert(key.to_string(), value.to_string().into());
        Ok(())
    }
}

/// Installs a [`CloudHandler`] as the `log` crate's global logger.
///
/// This sets the global maximum log level to `Trace`; level decisions belong
/// to the configured cloud level. To override, call [`log::set_max_level`]
/// afterwards.
///
/// # Errors
///
/// Returns an error if a global logger has already been set.
pub fn try_attach() -> Result<(), SetupError> {
    static HANDLER: CloudHandler = CloudHandler(());
    log::set_logger(&HANDLER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

/// Fail-safe variant of [`try_attach`]: attaching when a global logger is
/// already installed is a no-op, so repeated calls are harmless.
pub fn attach() {
    let _ = try_attach();
}

#[cfg(test)]
mod tests {
    use log::Log;

    use super::*;
    use crate::level::CloudLevelFilter;

    #[test]
    fn enabled_follows_cloud_level() {
        crate::configure()
            .cloud_level(CloudLevelFilter::Min(CloudLevel::Error))
            .apply();
        let handler = handler();

        let warn = Metadata::builder().level(log::Level::Warn).build();
        let error = Metadata::builder().level(log::Level::Error).build();
        assert!(!handler.enabled(&warn));
        assert!(handler.enabled(&error));

        crate::set_enabled(false);
        assert!(!handler.enabled(&error));
        crate::set_enabled(true);
        crate::configure().cloud_level(CloudLevel::Info).apply();
    }
}
