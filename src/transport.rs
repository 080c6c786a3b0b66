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

//! Best-effort delivery to the collector.
//!
//! One blocking POST per event, from the caller's thread. Every failure mode
//! degrades to "skip this send"; nothing here ever reaches the caller as a
//! panic or error. In debug mode, outcomes and skip reasons are reported on
//! stderr.

use std::cell::Cell;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use url::Url;

use crate::config::Config;
use crate::event::Event;
use crate::event::Payload;
use crate::resource;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";
/// Header carrying the acting username.
pub const USERNAME_HEADER: &str = "x-user-username";

thread_local! {
    static SENDING: Cell<bool> = const { Cell::new(false) };
}

struct SendScope;

impl Drop for SendScope {
    fn drop(&mut self) {
        SENDING.with(|flag| flag.set(false));
    }
}

pub(crate) fn send(cfg: &Config, event: &Event) {
    // When the handler is attached to the `log` facade, the HTTP stack's own
    // log records would otherwise re-enter here and recurse.
    if SENDING.with(|flag| flag.replace(true)) {
        return;
    }
    let _scope = SendScope;

    if !cfg.enabled {
        diag(cfg, "forwarding disabled; event dropped");
        return;
    }
    let Some(api_key) = cfg
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
    else {
        diag(cfg, "no API key configured; event dropped");
        return;
    };
    let Some(url) = resource::logs_endpoint(cfg, event.resource_id.as_deref()) else {
        diag(cfg, "no resource target configured; event dropped");
        return;
    };

    match try_send(cfg, api_key, url.clone(), event) {
        Ok(status) if status.is_success() => {
            diag(cfg, &format!("delivered {} event to {url}", event.wire_level));
        }
        Ok(status) => {
            diag(cfg, &format!("collector returned {status} for {url}; event dropped"));
        }
        Err(err) => {
            diag(cfg, &format!("delivery to {url} failed: {err:#}; event dropped"));
        }
    }
}

fn try_send(cfg: &Config, api_key: &str, url: Url, event: &Event) -> anyhow::Result<StatusCode> {
    let client = client_for(cfg).context("failed to build HTTP client")?;
    let mut request = client
        .post(url)
        .header(API_KEY_HEADER, api_key)
        .json(&Payload::new(event));
    if let Some(username) = cfg
        .username
        .as_deref()
        .map(str::trim)
        .filter(|username| !username.is_empty())
    {
        request = request.header(USERNAME_HEADER, username);
    }
    let response = request.send().context("failed to deliver log event")?;
    Ok(response.status())
}

#[derive(Clone, PartialEq, Eq)]
struct ClientSettings {
    timeout: Duration,
    verify_tls: bool,
}

// The client is rebuilt only when the settings it depends on change.
fn client_for(cfg: &Config) -> anyhow::Result<Client> {
    static CLIENT: Mutex<Option<(ClientSettings, Client)>> = Mutex::new(None);

    let settings = ClientSettings {
        timeout: cfg.timeout,
        verify_tls: cfg.verify_tls,
    };

    let mut cached = CLIENT.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some((current, client)) = cached.as_ref() {
        if *current == settings {
            return Ok(client.clone());
        }
    }

    let client = Client::builder()
        .timeout(settings.timeout)
        .danger_accept_invalid_certs(!settings.verify_tls)
        .build()?;
    *cached = Some((settings, client.clone()));
    Ok(client)
}

fn diag(cfg: &Config, message: &str) {
    if cfg.debug {
        // Stderr may be closed; diagnostics must not panic.
        let _ = writeln!(std::io::stderr(), "logship: {message}");
    }
}
