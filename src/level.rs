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

//! Severity levels for cloud forwarding.

use std::fmt;
use std::str::FromStr;

use crate::error::InvalidCloudLevel;

/// Severity of a cloud log event.
///
/// Levels are ordered from least to most severe. `Alert` ranks above `Error`
/// and marks events that should page someone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CloudLevel {
    Debug,
    Info,
    Warning,
    Error,
    Alert,
}

impl CloudLevel {
    /// The lowercase wire name of this level.
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudLevel::Debug => "debug",
            CloudLevel::Info => "info",
            CloudLevel::Warning => "warning",
            CloudLevel::Error => "error",
            CloudLevel::Alert => "alert",
        }
    }
}

impl fmt::Display for CloudLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<log::Level> for CloudLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => CloudLevel::Error,
            log::Level::Warn => CloudLevel::Warning,
            log::Level::Info => CloudLevel::Info,
            // The cloud side has no severity below debug.
            log::Level::Debug | log::Level::Trace => CloudLevel::Debug,
        }
    }
}

impl FromStr for CloudLevel {
    type Err = InvalidCloudLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(CloudLevel::Debug),
            "info" => Ok(CloudLevel::Info),
            "warning" | "warn" => Ok(CloudLevel::Warning),
            "error" => Ok(CloudLevel::Error),
            "alert" | "alerts" => Ok(CloudLevel::Alert),
            _ => Err(InvalidCloudLevel(s.to_owned())),
        }
    }
}

/// The minimum severity threshold for forwarding events, or `Off` to disable
/// forwarding entirely. Mirrors the shape of [`log::LevelFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudLevelFilter {
    /// Cloud forwarding is disabled.
    Off,
    /// Forward events at or above this level.
    Min(CloudLevel),
}

impl CloudLevelFilter {
    /// Whether an event of the given level qualifies for forwarding.
    pub fn forwards(&self, level: CloudLevel) -> bool {
        match self {
            CloudLevelFilter::Off => false,
            CloudLevelFilter::Min(min) => level >= *min,
        }
    }
}

impl From<CloudLevel> for CloudLevelFilter {
    fn from(level: CloudLevel) -> Self {
        CloudLevelFilter::Min(level)
    }
}

impl FromStr for CloudLevelFilter {
    type Err = InvalidCloudLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "false" | "off" | "no" | "disabled" => Ok(CloudLevelFilter::Off),
            _ => s.parse::<CloudLevel>().map(CloudLevelFilter::Min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(CloudLevel::Debug < CloudLevel::Info);
        assert!(CloudLevel::Info < CloudLevel::Warning);
        assert!(CloudLevel::Warning < CloudLevel::Error);
        assert!(CloudLevel::Error < CloudLevel::Alert);
    }

    #[test]
    fn parse_level_names_and_aliases() {
        assert_eq!("INFO".parse::<CloudLevel>().unwrap(), CloudLevel::Info);
        assert_eq!(" warn ".parse::<CloudLevel>().unwrap(), CloudLevel::Warning);
        assert_eq!("ALERTS".parse::<CloudLevel>().unwrap(), CloudLevel::Alert);
        assert!("verbose".parse::<CloudLevel>().is_err());
    }

    #[test]
    fn parse_filter_disable_tokens() {
        for token in ["none", "False", "OFF", "no", "disabled"] {
            assert_eq!(
                token.parse::<CloudLevelFilter>().unwrap(),
                CloudLevelFilter::Off,
                "token {token:?} should disable forwarding"
            );
        }
        assert_eq!(
            "error".parse::<CloudLevelFilter>().unwrap(),
            CloudLevelFilter::Min(CloudLevel::Error)
        );
        assert!("loud".parse::<CloudLevelFilter>().is_err());
    }

    #[test]
    fn filter_forwards_at_or_above_minimum() {
        let filter = CloudLevelFilter::Min(CloudLevel::Warning);
        assert!(!filter.forwards(CloudLevel::Info));
        assert!(filter.forwards(CloudLevel::Warning));
        assert!(filter.forwards(CloudLevel::Alert));
        assert!(!CloudLevelFilter::Off.forwards(CloudLevel::Alert));
    }

    #[test]
    fn log_levels_map_onto_cloud_levels() {
        assert_eq!(CloudLevel::from(log::Level::Error), CloudLevel::Error);
        assert_eq!(CloudLevel::from(log::Level::Warn), CloudLevel::Warning);
        assert_eq!(CloudLevel::from(log::Level::Trace), CloudLevel::Debug);
    }
}
