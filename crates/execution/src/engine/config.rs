// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2019-2025 Meridian Systems Pty Ltd. All rights reserved.
//  https://meridian.systems
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

/// Configuration for `ExecutionEngine` instances.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExecutionEngineConfig {
    /// The timeout (seconds) within which the venue must acknowledge an
    /// outgoing command before a synthetic `OrderCommandTimeout` is emitted.
    pub command_timeout_secs: u64,
    /// Whether additional debug logging is enabled.
    pub debug: bool,
}

impl Default for ExecutionEngineConfig {
    /// Creates a new default [`ExecutionEngineConfig`] instance.
    fn default() -> Self {
        Self {
            command_timeout_secs: 5,
            debug: false,
        }
    }
}
