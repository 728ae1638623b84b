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

use std::{cell::RefCell, rc::Rc};

use meridian_model::identifiers::{ClientOrderId, StrategyId, TraderId};

use super::get_datetime_tag;
use crate::clock::Clock;

/// Generates unique client order IDs, in the format
/// `O-{datetime}-{trader_tag}-{strategy_tag}-{count}`.
pub struct ClientOrderIdGenerator {
    clock: Rc<RefCell<dyn Clock>>,
    trader_id: TraderId,
    strategy_id: StrategyId,
    count: usize,
}

impl ClientOrderIdGenerator {
    /// Creates a new [`ClientOrderIdGenerator`] instance.
    #[must_use]
    pub fn new(
        trader_id: TraderId,
        strategy_id: StrategyId,
        clock: Rc<RefCell<dyn Clock>>,
        initial_count: usize,
    ) -> Self {
        Self {
            clock,
            trader_id,
            strategy_id,
            count: initial_count,
        }
    }

    /// Sets the count.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
    }

    /// Resets the count.
    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Returns the current count.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Generates a new client order ID.
    pub fn generate(&mut self) -> ClientOrderId {
        self.count += 1;
        let datetime_tag = get_datetime_tag(self.clock.borrow().timestamp_ms());
        let trader_tag = self.trader_id.get_tag();
        let strategy_tag = self.strategy_id.get_tag();
        let value = format!(
            "O-{datetime_tag}-{trader_tag}-{strategy_tag}-{}",
            self.count
        );
        ClientOrderId::from(value)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use meridian_model::identifiers::{ClientOrderId, StrategyId, TraderId};
    use rstest::rstest;

    use crate::{clock::TestClock, generators::client_order_id::ClientOrderIdGenerator};

    fn get_generator(initial_count: usize) -> ClientOrderIdGenerator {
        ClientOrderIdGenerator::new(
            TraderId::default(),
            StrategyId::default(),
            Rc::new(RefCell::new(TestClock::new())),
            initial_count,
        )
    }

    #[rstest]
    fn test_generate_sequential() {
        let mut generator = get_generator(0);
        assert_eq!(
            generator.generate(),
            ClientOrderId::from("O-19700101-000000-001-001-1")
        );
        assert_eq!(
            generator.generate(),
            ClientOrderId::from("O-19700101-000000-001-001-2")
        );
        assert_eq!(generator.count(), 2);
    }

    #[rstest]
    fn test_initial_count_continues_sequence() {
        let mut generator = get_generator(5);
        assert_eq!(
            generator.generate(),
            ClientOrderId::from("O-19700101-000000-001-001-6")
        );
    }
}
