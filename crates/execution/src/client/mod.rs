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

//! Execution client contracts for trading venue connectivity.

use std::fmt::Debug;

use async_trait::async_trait;
use meridian_model::identifiers::{AccountId, ClientId, Venue};

use crate::messages::{AmendOrder, CancelOrder, SubmitOrder};

/// A client through which the execution engine reaches one trading venue.
///
/// Command submission is non-blocking: the ack or error covers handoff to the
/// venue transport only. Outcomes arrive later on the engine's event queue in
/// venue-declared order.
pub trait ExecutionClient {
    /// Returns the client ID.
    fn client_id(&self) -> ClientId;

    /// Returns the account ID for the client's venue account.
    fn account_id(&self) -> AccountId;

    /// Returns the venue the client executes on.
    fn venue(&self) -> Venue;

    /// Returns whether the client is connected to its venue.
    fn is_connected(&self) -> bool;

    /// Starts the execution client.
    ///
    /// # Errors
    ///
    /// Returns an error if the client fails to start.
    fn start(&self) -> anyhow::Result<()>;

    /// Stops the execution client.
    ///
    /// # Errors
    ///
    /// Returns an error if the client fails to stop.
    fn stop(&self) -> anyhow::Result<()>;

    /// Submits an order to the venue.
    ///
    /// # Errors
    ///
    /// Returns an error if submission to the transport fails.
    fn submit_order(&self, cmd: &SubmitOrder) -> anyhow::Result<()> {
        log_not_implemented(cmd);
        Ok(())
    }

    /// Amends a working order at the venue.
    ///
    /// # Errors
    ///
    /// Returns an error if submission to the transport fails.
    fn amend_order(&self, cmd: &AmendOrder) -> anyhow::Result<()> {
        log_not_implemented(cmd);
        Ok(())
    }

    /// Cancels an order at the venue.
    ///
    /// # Errors
    ///
    /// Returns an error if submission to the transport fails.
    fn cancel_order(&self, cmd: &CancelOrder) -> anyhow::Result<()> {
        log_not_implemented(cmd);
        Ok(())
    }
}

/// A live execution client with an async connection lifecycle.
#[async_trait(?Send)]
pub trait LiveExecutionClient: ExecutionClient {
    /// Establishes the venue connection.
    ///
    /// # Errors
    ///
    /// Returns an error if connection fails.
    async fn connect(&mut self) -> anyhow::Result<()>;

    /// Disconnects from the venue.
    ///
    /// # Errors
    ///
    /// Returns an error if disconnection fails.
    async fn disconnect(&mut self) -> anyhow::Result<()>;

    /// Disposes the client, releasing all resources.
    fn dispose(&mut self);
}

#[inline(always)]
fn log_not_implemented<T: Debug>(cmd: &T) {
    log::warn!("{cmd:?} - handler not implemented");
}
