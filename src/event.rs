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

//! Log events and their wire representation.

use jiff::Timestamp;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::level::CloudLevel;

/// A single cloud log event, created per call site and sent immediately.
///
/// Obtained from [`CloudLogger::event`][crate::CloudLogger::event]; extend it
/// with structured fields or a per-event resource override, then [`send`]
/// it.
///
/// [`send`]: Event::send
///
/// # Examples
///
/// ```no_run
/// use logship::CloudLevel;
///
/// logship::logger()
///     .event(CloudLevel::Warning, "disk almost full")
///     .extra("mount", "/var")
///     .extra("used_pct", 93)
///     .send();
/// ```
#[derive(Debug, Clone)]
pub struct Event {
    pub(crate) level: CloudLevel,
    pub(crate) wire_level: &'static str,
    pub(crate) message: String,
    pub(crate) ts: Timestamp,
    pub(crate) extra: Map<String, Value>,
    pub(crate) resource_id: Option<String>,
}

impl Event {
    pub(crate) fn new(level: CloudLevel, message: impl Into<String>) -> Self {
        Event {
            level,
            wire_level: level.as_str(),
            message: message.into(),
            ts: Timestamp::now(),
            extra: Map::new(),
            resource_id: None,
        }
    }

    /// An error-severity event tagged `exception` on the wire.
    pub(crate) fn exception(message: impl Into<String>) -> Self {
        let mut event = Event::new(CloudLevel::Error, message);
        event.wire_level = "exception";
        event
    }

    /// Adds a structured field to the event.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub(crate) fn extra_map(mut self, extra: Map<String, Value>) -> Self {
        self.extra.extend(extra);
        self
    }

    /// Targets a specific resource for this event only, overriding the
    /// configured resource.
    pub fn resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Sends the event, best effort. Events below the configured cloud level
    /// are dropped; delivery failures are swallowed.
    pub fn send(self) {
        let cfg = crate::config::get_config();
        if !cfg.cloud_level.forwards(self.level) {
            return;
        }
        crate::transport::send(&cfg, &self);
    }
}

#[derive(Serialize)]
pub(crate) struct Payload<'a> {
    logs: [LogLine<'a>; 1],
}

#[derive(Serialize)]
struct LogLine<'a> {
    level: &'a str,
    message: &'a str,
    #[serde(serialize_with = "serialize_timestamp")]
    ts: &'a Timestamp,
    #[serde(skip_serializing_if = "Map::is_empty")]
    extra: &'a Map<String, Value>,
}

impl<'a> Payload<'a> {
    pub(crate) fn new(event: &'a Event) -> Self {
        Payload {
            logs: [LogLine {
                level: event.wire_level,
                message: &event.message,
                ts: &event.ts,
                extra: &event.extra,
            }],
        }
    }
}

fn serialize_timestamp<S>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&format_args!("{ts:.6}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_shape() {
        let event = Event::new(CloudLevel::Info, "hello").extra("answer", 42);
        let value = serde_json::to_value(Payload::new(&event)).unwrap();

        let line = &value["logs"][0];
        assert_eq!(line["level"], "info");
        assert_eq!(line["message"], "hello");
        assert_eq!(line["extra"]["answer"], 42);
        let ts = line["ts"].as_str().unwrap();
        assert!(ts.ends_with('Z'), "timestamp should be UTC: {ts}");
    }

    #[test]
    fn empty_extra_is_omitted() {
        let event = Event::new(CloudLevel::Error, "boom");
        let value = serde_json::to_value(Payload::new(&event)).unwrap();
        assert!(value["logs"][0].get("extra").is_none());
    }

    #[test]
    fn exception_events_keep_error_severity() {
        let event = Event::exception("boom");
        assert_eq!(event.level, CloudLevel::Error);
        assert_eq!(event.wire_level, "exception");
    }
}
