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

//! Configuration resolution.
//!
//! Values resolve with the precedence: explicit override > environment
//! variable > built-in default. The resolved configuration is a process-wide
//! object, initialized from the environment on first use and updated through
//! [`configure`].

use std::fmt;
use std::sync::OnceLock;
use std::sync::RwLock;
use std::time::Duration;

use crate::level::CloudLevel;
use crate::level::CloudLevelFilter;
use crate::resource::ParsedResource;
use crate::resource::normalize_portal_prefix;

/// Environment variable for the acting username.
pub const ENV_USERNAME: &str = "LOGSHIP_USERNAME";
/// Environment variable for the API key.
pub const ENV_API_KEY: &str = "LOGSHIP_API_KEY";
/// Environment variable for a full resource URL.
pub const ENV_RESOURCE: &str = "LOGSHIP_RESOURCE";
/// Alias for [`ENV_RESOURCE`].
pub const ENV_RESOURCE_URL: &str = "LOGSHIP_RESOURCE_URL";
/// Environment variable for a discrete resource identifier.
pub const ENV_RESOURCE_ID: &str = "LOGSHIP_RESOURCE_ID";
/// Environment variable for the collector base URL.
pub const ENV_BASE_URL: &str = "LOGSHIP_BASE_URL";
/// Environment variable for an explicit portal path prefix.
pub const ENV_PORTAL_PREFIX: &str = "LOGSHIP_PORTAL_PREFIX";
/// Environment variable for the minimum cloud level.
pub const ENV_CLOUD_LEVEL: &str = "LOGSHIP_CLOUD_LEVEL";
/// Environment variable for SDK debug mode.
pub const ENV_DEBUG: &str = "LOGSHIP_DEBUG";

/// The collector used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://cloud.logship.dev";

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// The resolved SDK configuration.
///
/// Obtain a snapshot of the process-wide configuration with [`get_config`];
/// update it with [`configure`].
#[derive(Clone)]
pub struct Config {
    /// The acting username, sent as an identity header with each event.
    pub username: Option<String>,
    /// The API key. Without one, no delivery is attempted.
    pub api_key: Option<String>,
    /// `scheme://host[:port]`, possibly with a portal path, no trailing slash.
    pub base_url: String,
    /// Explicit portal prefix override. `None` derives it from `base_url`.
    pub portal_prefix: Option<String>,
    /// Owner route kind parsed from a resource URL (`u` or `team`).
    pub route_kind: Option<String>,
    /// Owner route value parsed from a resource URL.
    pub route_value: Option<String>,
    /// Logs path prefix parsed from a resource URL.
    pub logs_prefix: Option<String>,
    /// The target resource identifier.
    pub resource_id: Option<String>,
    /// Kill switch for all cloud forwarding.
    pub enabled: bool,
    /// Minimum severity for forwarding an event.
    pub cloud_level: CloudLevelFilter,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Whether to verify the collector's TLS certificate.
    pub verify_tls: bool,
    /// When set, the SDK reports transport and skip diagnostics on stderr.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            username: None,
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            portal_prefix: None,
            route_kind: None,
            route_value: None,
            logs_prefix: None,
            resource_id: None,
            enabled: true,
            cloud_level: CloudLevelFilter::Min(CloudLevel::Info),
            timeout: DEFAULT_TIMEOUT,
            verify_tls: true,
            debug: false,
        }
    }
}

impl Config {
    /// Resolves a configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let debug = lookup(ENV_DEBUG).is_some_and(|value| truthy(&value));
        let default_level = if debug {
            CloudLevelFilter::Min(CloudLevel::Debug)
        } else {
            CloudLevelFilter::Min(CloudLevel::Info)
        };

        let resource = lookup(ENV_RESOURCE)
            .or_else(|| lookup(ENV_RESOURCE_URL))
            .and_then(|raw| ParsedResource::parse(&raw));

        // A resource URL is authoritative for routing; this avoids
        // mixed-domain mismatches between the base-URL variable and the
        // resource's own host.
        let (base_url, portal_prefix) = match &resource {
            Some(parsed) => (parsed.base_url.clone(), Some(parsed.portal_prefix.clone())),
            None => (
                lookup(ENV_BASE_URL)
                    .map(|value| value.trim().trim_end_matches('/').to_owned())
                    .filter(|value| !value.is_empty())
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
                lookup(ENV_PORTAL_PREFIX).map(|value| normalize_portal_prefix(&value)),
            ),
        };

        Config {
            username: lookup(ENV_USERNAME),
            api_key: lookup(ENV_API_KEY),
            base_url,
            portal_prefix,
            route_kind: resource.as_ref().and_then(|parsed| parsed.route_kind.clone()),
            route_value: resource.as_ref().and_then(|parsed| parsed.route_value.clone()),
            logs_prefix: resource.as_ref().map(|parsed| parsed.logs_prefix.clone()),
            resource_id: resource
                .as_ref()
                .map(|parsed| parsed.resource_id.clone())
                .or_else(|| lookup(ENV_RESOURCE_ID)),
            enabled: true,
            // Fail-safe: a malformed level falls back to the default.
            cloud_level: lookup(ENV_CLOUD_LEVEL)
                .filter(|value| !value.trim().is_empty())
                .and_then(|value| value.parse().ok())
                .unwrap_or(default_level),
            timeout: DEFAULT_TIMEOUT,
            verify_tls: true,
            debug,
        }
    }

    /// Derives the log-ingestion endpoint for the given resource id override,
    /// if a target can be resolved.
    pub fn logs_endpoint(&self, resource_id: Option<&str>) -> Option<url::Url> {
        crate::resource::logs_endpoint(self, resource_id)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("username", &self.username)
            .field("api_key", if self.api_key.is_some() { &"set" } else { &"unset" })
            .field("base_url", &self.base_url)
            .field("portal_prefix", &self.portal_prefix)
            .field("resource_id", &self.resource_id)
            .field("enabled", &self.enabled)
            .field("cloud_level", &self.cloud_level)
            .field("timeout", &self.timeout)
            .field("verify_tls", &self.verify_tls)
            .field("debug", &self.debug)
            .finish()
    }
}

pub(crate) fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "t" | "yes" | "y" | "on"
    )
}

fn state() -> &'static RwLock<Config> {
    static STATE: OnceLock<RwLock<Config>> = OnceLock::new();
    STATE.get_or_init(|| RwLock::new(Config::from_env()))
}

/// Returns a snapshot of the process-wide configuration.
pub fn get_config() -> Config {
    state()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone()
}

/// Enables or disables all cloud forwarding.
pub fn set_enabled(enabled: bool) {
    state()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .enabled = enabled;
}

/// Create a builder that overrides parts of the process-wide configuration.
///
/// # Examples
///
/// ```
/// use logship::CloudLevel;
///
/// logship::configure()
///     .api_key("key")
///     .resource("https://cloud.logship.dev/u/alice/resources/r-123/")
///     .cloud_level(CloudLevel::Warning)
///     .apply();
/// ```
pub fn configure() -> Configure {
    Configure::default()
}

/// A builder of configuration overrides. See [`configure`].
///
/// Only the fields set on the builder change; everything else keeps its
/// current resolved value.
#[must_use = "call `apply` to update the process-wide configuration"]
#[derive(Default)]
pub struct Configure {
    username: Option<String>,
    api_key: Option<String>,
    resource: Option<String>,
    resource_id: Option<String>,
    base_url: Option<String>,
    portal_prefix: Option<String>,
    enabled: Option<bool>,
    cloud_level: Option<CloudLevelFilter>,
    timeout: Option<Duration>,
    verify_tls: Option<bool>,
    debug: Option<bool>,
}

impl fmt::Debug for Configure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configure")
            .field("username", &self.username)
            .field("api_key", if self.api_key.is_some() { &"set" } else { &"unset" })
            .field("resource", &self.resource)
            .field("resource_id", &self.resource_id)
            .field("base_url", &self.base_url)
            .field("portal_prefix", &self.portal_prefix)
            .field("enabled", &self.enabled)
            .field("cloud_level", &self.cloud_level)
            .field("timeout", &self.timeout)
            .field("verify_tls", &self.verify_tls)
            .field("debug", &self.debug)
            .finish()
    }
}

impl Configure {
    /// Sets the acting username.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the target resource by its full portal URL.
    ///
    /// The URL is authoritative for routing: unless overridden on the same
    /// builder, the base URL and portal prefix derive from it.
    pub fn resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Sets the target resource by its identifier alone.
    pub fn resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    /// Sets the collector base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the portal path prefix.
    pub fn portal_prefix(mut self, portal_prefix: impl Into<String>) -> Self {
        self.portal_prefix = Some(portal_prefix.into());
        self
    }

    /// Enables or disables cloud forwarding.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Sets the minimum cloud level. Accepts a [`CloudLevel`] or a
    /// [`CloudLevelFilter`].
    pub fn cloud_level(mut self, level: impl Into<CloudLevelFilter>) -> Self {
        self.cloud_level = Some(level.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Controls TLS certificate verification.
    pub fn verify_tls(mut self, verify_tls: bool) -> Self {
        self.verify_tls = Some(verify_tls);
        self
    }

    /// Enables SDK debug mode: diagnostics on stderr, and, unless a cloud
    /// level is set explicitly, debug-level forwarding.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Applies the overrides to the process-wide configuration.
    pub fn apply(self) {
        let mut cfg = state()
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.apply_to(&mut cfg);
    }

    pub(crate) fn apply_to(self, cfg: &mut Config) {
        if let Some(raw) = &self.resource {
            match ParsedResource::parse(raw) {
                Some(parsed) => {
                    if self.base_url.is_none() {
                        cfg.base_url = parsed.base_url;
                    }
                    if self.portal_prefix.is_none() {
                        cfg.portal_prefix = Some(parsed.portal_prefix);
                    }
                    cfg.route_kind = parsed.route_kind;
                    cfg.route_value = parsed.route_value;
                    cfg.logs_prefix = Some(parsed.logs_prefix);
                    cfg.resource_id = Some(parsed.resource_id);
                }
                None => {
                    cfg.route_kind = None;
                    cfg.route_value = None;
                    cfg.logs_prefix = None;
                    cfg.resource_id = None;
                }
            }
        }

        if let Some(username) = self.username {
            cfg.username = Some(username);
        }
        if let Some(api_key) = self.api_key {
            cfg.api_key = Some(api_key);
        }
        if let Some(resource_id) = self.resource_id {
            cfg.resource_id = Some(resource_id);
        }
        if let Some(base_url) = self.base_url {
            cfg.base_url = base_url.trim().trim_end_matches('/').to_owned();
        }
        if let Some(portal_prefix) = self.portal_prefix {
            cfg.portal_prefix = Some(normalize_portal_prefix(&portal_prefix));
        }
        if let Some(enabled) = self.enabled {
            cfg.enabled = enabled;
        }
        if let Some(cloud_level) = self.cloud_level {
            cfg.cloud_level = cloud_level;
        } else if self.debug == Some(true) && cfg.cloud_level != CloudLevelFilter::Off {
            // In debug mode, forward debug-level events unless the caller
            // pinned a level explicitly.
            cfg.cloud_level = CloudLevelFilter::Min(CloudLevel::Debug);
        }
        if let Some(timeout) = self.timeout {
            cfg.timeout = timeout;
        }
        if let Some(verify_tls) = self.verify_tls {
            cfg.verify_tls = verify_tls;
        }
        if let Some(debug) = self.debug {
            cfg.debug = debug;
        }
    }
}
