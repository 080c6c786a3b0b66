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

//! Resource references and log-ingestion endpoint derivation.
//!
//! A resource is a remote log-collection destination. It can be referenced by
//! its full portal URL, for example
//! `https://cloud.logship.dev/u/alice/resources/7f3a.../logs/`, or by discrete
//! base-URL + owner + resource-id fields.

use percent_encoding::AsciiSet;
use percent_encoding::CONTROLS;
use percent_encoding::percent_decode_str;
use percent_encoding::utf8_percent_encode;
use url::Url;

use crate::config::Config;
use crate::config::DEFAULT_BASE_URL;

/// Percent-encoding set for a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Routing fields extracted from a full resource URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResource {
    /// `scheme://host[:port]`, no trailing slash.
    pub base_url: String,
    /// Leading path segments before the owner route, `/`-prefixed or empty.
    pub portal_prefix: String,
    /// `u` for user-owned resources, `team` for team-owned ones.
    pub route_kind: Option<String>,
    /// The owner username or team name, percent-decoded.
    pub route_value: Option<String>,
    /// The path up to and including the `resources` segment.
    pub logs_prefix: String,
    /// The resource identifier, percent-decoded.
    pub resource_id: String,
}

impl ParsedResource {
    /// Parses a full resource URL into its routing fields.
    ///
    /// Returns `None` for anything that is not an absolute URL containing a
    /// `resources/<id>` path pair. A trailing `logs` segment is tolerated.
    pub fn parse(raw: &str) -> Option<ParsedResource> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let url = Url::parse(raw).ok()?;
        let host = url.host_str()?;

        let mut segments: Vec<&str> = url
            .path_segments()
            .map(|split| split.filter(|segment| !segment.is_empty()).collect())
            .unwrap_or_default();
        if segments
            .last()
            .is_some_and(|segment| segment.eq_ignore_ascii_case("logs"))
        {
            segments.pop();
        }

        let index = (0..segments.len()).find(|&index| {
            segments[index].eq_ignore_ascii_case("resources") && index + 1 < segments.len()
        })?;

        let resource_id = decode_segment(segments[index + 1])?;
        let logs_prefix = format!("/{}", segments[..=index].join("/"));

        // An owner route like `/u/alice/` or `/team/devops/` directly ahead of
        // the `resources` segment identifies the resource owner.
        let mut prefix_end = index;
        let mut route_kind = None;
        let mut route_value = None;
        if index >= 2 {
            let kind = segments[index - 2].to_ascii_lowercase();
            if kind == "u" || kind == "team" {
                if let Some(value) = decode_segment(segments[index - 1]) {
                    route_kind = Some(kind);
                    route_value = Some(value);
                    prefix_end = index - 2;
                }
            }
        }

        let portal_prefix = if prefix_end == 0 {
            String::new()
        } else {
            format!("/{}", segments[..prefix_end].join("/"))
        };

        Some(ParsedResource {
            base_url: origin(&url, host),
            portal_prefix,
            route_kind,
            route_value,
            logs_prefix,
            resource_id,
        })
    }
}

fn decode_segment(segment: &str) -> Option<String> {
    let decoded = percent_decode_str(segment).decode_utf8().ok()?;
    let trimmed = decoded.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn origin(url: &Url, host: &str) -> String {
    match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    }
}

/// Collapses a portal prefix to either empty or `/`-prefixed,
/// no-trailing-slash form.
pub(crate) fn normalize_portal_prefix(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let cleaned = format!("/{}", trimmed.trim_matches('/'));
    if cleaned == "/" { String::new() } else { cleaned }
}

/// The portal prefix in effect: explicit override > path component of the
/// base URL > empty.
pub(crate) fn resolved_portal_prefix(cfg: &Config) -> String {
    if let Some(prefix) = &cfg.portal_prefix {
        return prefix.clone();
    }
    Url::parse(&cfg.base_url)
        .ok()
        .map(|url| normalize_portal_prefix(url.path()))
        .unwrap_or_default()
}

/// Derives the log-ingestion endpoint for an event, honoring a per-event
/// resource id override.
///
/// Returns `None` when no resource target can be resolved; the caller skips
/// the send in that case.
pub(crate) fn logs_endpoint(cfg: &Config, resource_id: Option<&str>) -> Option<Url> {
    let resource = resource_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .or_else(|| cfg.resource_id.clone())?;
    let base = base_origin(&cfg.base_url)?;
    let safe_resource = utf8_percent_encode(&resource, SEGMENT).to_string();

    let path = match cfg.logs_prefix.as_deref().filter(|prefix| !prefix.is_empty()) {
        Some(prefix) => format!("{prefix}/{safe_resource}/logs/"),
        None => {
            let owner = cfg
                .route_value
                .clone()
                .or_else(|| cfg.username.clone())
                .map(|owner| owner.trim().to_owned())
                .filter(|owner| !owner.is_empty())?;
            let kind = match cfg.route_kind.as_deref() {
                Some("team") => "team",
                _ => "u",
            };
            let portal = resolved_portal_prefix(cfg);
            let safe_owner = utf8_percent_encode(&owner, SEGMENT).to_string();
            format!("{portal}/{kind}/{safe_owner}/resources/{safe_resource}/logs/")
        }
    };

    Url::parse(&format!("{base}{path}")).ok()
}

fn base_origin(base_url: &str) -> Option<String> {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return base_origin(DEFAULT_BASE_URL);
    }
    // Tolerate a bare host by assuming https.
    let url = Url::parse(trimmed)
        .or_else(|_| Url::parse(&format!("https://{trimmed}")))
        .ok()?;
    let host = url.host_str()?;
    Some(origin(&url, host))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::default()
    }

    #[test]
    fn parse_user_route_with_portal_prefix() {
        let parsed =
            ParsedResource::parse("https://portal.example/DevTools/u/alice/resources/abc-123/")
                .unwrap();
        assert_eq!(parsed.base_url, "https://portal.example");
        assert_eq!(parsed.portal_prefix, "/DevTools");
        assert_eq!(parsed.route_kind.as_deref(), Some("u"));
        assert_eq!(parsed.route_value.as_deref(), Some("alice"));
        assert_eq!(parsed.logs_prefix, "/DevTools/u/alice/resources");
        assert_eq!(parsed.resource_id, "abc-123");
    }

    #[test]
    fn parse_strips_trailing_logs_segment() {
        let parsed =
            ParsedResource::parse("https://cloud.logship.dev/u/alice/resources/r-123/logs/")
                .unwrap();
        assert_eq!(parsed.base_url, "https://cloud.logship.dev");
        assert_eq!(parsed.logs_prefix, "/u/alice/resources");
        assert_eq!(parsed.resource_id, "r-123");
    }

    #[test]
    fn parse_team_route() {
        let parsed =
            ParsedResource::parse("https://selfhost.example/team/devops/resources/r-123/").unwrap();
        assert_eq!(parsed.route_kind.as_deref(), Some("team"));
        assert_eq!(parsed.route_value.as_deref(), Some("devops"));
        assert_eq!(parsed.logs_prefix, "/team/devops/resources");
    }

    #[test]
    fn parse_keeps_explicit_port() {
        let parsed =
            ParsedResource::parse("http://127.0.0.1:8080/u/alice/resources/r-1/").unwrap();
        assert_eq!(parsed.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn parse_decodes_owner_and_resource_id() {
        let parsed =
            ParsedResource::parse("https://portal.example/u/a%20team/resources/r%2F1/").unwrap();
        assert_eq!(parsed.route_value.as_deref(), Some("a team"));
        assert_eq!(parsed.resource_id, "r/1");
    }

    #[test]
    fn parse_rejects_incomplete_references() {
        assert_eq!(ParsedResource::parse(""), None);
        assert_eq!(ParsedResource::parse("not a url"), None);
        assert_eq!(ParsedResource::parse("https://portal.example/"), None);
        assert_eq!(ParsedResource::parse("https://portal.example/resources/"), None);
        assert_eq!(
            ParsedResource::parse("https://portal.example/u/alice/resources/%20/"),
            None
        );
    }

    #[test]
    fn endpoint_prefers_parsed_logs_prefix() {
        let mut cfg = config();
        cfg.base_url = "https://dev.portal.example".to_owned();
        cfg.logs_prefix = Some("/team/starwood/resources".to_owned());
        cfg.resource_id = Some("5176".to_owned());

        let url = logs_endpoint(&cfg, Some("override-r")).unwrap();
        assert_eq!(
            url.as_str(),
            "https://dev.portal.example/team/starwood/resources/override-r/logs/"
        );
    }

    #[test]
    fn endpoint_from_discrete_fields() {
        let mut cfg = config();
        cfg.base_url = "https://cloud.logship.dev".to_owned();
        cfg.username = Some("alice".to_owned());
        cfg.resource_id = Some("r-123".to_owned());

        let url = logs_endpoint(&cfg, None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://cloud.logship.dev/u/alice/resources/r-123/logs/"
        );
    }

    #[test]
    fn endpoint_uses_portal_prefix_from_base_url_path() {
        let mut cfg = config();
        cfg.base_url = "https://portal.example/DevTools".to_owned();
        cfg.username = Some("alice".to_owned());
        cfg.resource_id = Some("r-123".to_owned());

        let url = logs_endpoint(&cfg, None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://portal.example/DevTools/u/alice/resources/r-123/logs/"
        );
    }

    #[test]
    fn explicit_portal_prefix_wins_over_base_url_path() {
        let mut cfg = config();
        cfg.base_url = "https://portal.example/ignored".to_owned();
        cfg.portal_prefix = Some(normalize_portal_prefix("apps/"));
        cfg.username = Some("alice".to_owned());
        cfg.resource_id = Some("r-123".to_owned());

        let url = logs_endpoint(&cfg, None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://portal.example/apps/u/alice/resources/r-123/logs/"
        );
    }

    #[test]
    fn endpoint_encodes_path_segments() {
        let mut cfg = config();
        cfg.username = Some("a team".to_owned());
        cfg.resource_id = Some("r/1".to_owned());

        let url = logs_endpoint(&cfg, None).unwrap();
        assert_eq!(
            url.path(),
            "/u/a%20team/resources/r%2F1/logs/"
        );
    }

    #[test]
    fn endpoint_missing_target_is_none() {
        // No resource id at all.
        let mut cfg = config();
        cfg.username = Some("alice".to_owned());
        assert_eq!(logs_endpoint(&cfg, None), None);

        // Discrete scheme without an owner segment.
        let mut cfg = config();
        cfg.resource_id = Some("r-123".to_owned());
        assert_eq!(logs_endpoint(&cfg, None), None);
    }

    #[test]
    fn normalize_portal_prefix_forms() {
        assert_eq!(normalize_portal_prefix(""), "");
        assert_eq!(normalize_portal_prefix("  "), "");
        assert_eq!(normalize_portal_prefix("/"), "");
        assert_eq!(normalize_portal_prefix("DevTools"), "/DevTools");
        assert_eq!(normalize_portal_prefix("/apps/portal/"), "/apps/portal");
    }
}
