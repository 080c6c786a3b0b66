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

use log::SetLoggerError;

/// An error that can occur while installing the handler into the host logging
/// framework.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("failed to set up the global logger: {0}")]
    SetLogger(SetLoggerError),
}

impl From<SetLoggerError> for SetupError {
    fn from(value: SetLoggerError) -> Self {
        SetupError::SetLogger(value)
    }
}

/// An unrecognized cloud level name.
#[derive(Debug, thiserror::Error)]
#[error("invalid cloud level: {0:?}")]
pub struct InvalidCloudLevel(pub(crate) String);
