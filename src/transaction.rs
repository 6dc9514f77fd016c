//! Programmable transaction requests for the marketplace entry points.
//!
//! A [`TransactionRequest`] is a description only: inputs plus an ordered list
//! of commands. The wallet resolves object versions, gas and signatures when it
//! submits.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::consts::{
    FN_BUY_AND_TAKE, FN_LIST, FN_MINT, FN_TAKE_PROFITS_AND_KEEP, MARKETPLACE_MODULE,
    WIDGET_MODULE,
};
use crate::types::{MarketplaceRef, ObjectId};

/// A transaction input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CallArg {
    #[serde(rename_all = "camelCase")]
    Object { object_id: ObjectId },
    Pure { value: Value },
}

/// Reference to a value available to a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCall {
    pub target: String,
    pub type_arguments: Vec<String>,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    MoveCall(MoveCall),
    #[serde(rename_all = "camelCase")]
    SplitCoins {
        coin: Argument,
        amounts: Vec<Argument>,
    },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
    pub show_effects: bool,
}

impl TransactionRequest {
    pub fn new() -> Self {
        Self {
            show_effects: true,
            ..Default::default()
        }
    }

    /// Add an object input.
    pub fn object(&mut self, object_id: &ObjectId) -> Argument {
        self.push_input(CallArg::Object {
            object_id: object_id.clone(),
        })
    }

    /// Add a pure (BCS-encodable) input.
    pub fn pure(&mut self, value: impl Into<Value>) -> Argument {
        self.push_input(CallArg::Pure {
            value: value.into(),
        })
    }

    /// Split one new coin per amount off `coin`. The new coins are
    /// `NestedResult(command, i)` of the returned command index.
    pub fn split_coins(&mut self, coin: Argument, amounts: Vec<Argument>) -> u16 {
        self.push_command(Command::SplitCoins { coin, amounts })
    }

    pub fn move_call(
        &mut self,
        target: String,
        type_arguments: Vec<String>,
        arguments: Vec<Argument>,
    ) -> u16 {
        self.push_command(Command::MoveCall(MoveCall {
            target,
            type_arguments,
            arguments,
        }))
    }

    /// Every Move call in command order.
    pub fn move_calls(&self) -> impl Iterator<Item = &MoveCall> {
        self.commands.iter().filter_map(|command| match command {
            Command::MoveCall(call) => Some(call),
            _ => None,
        })
    }

    fn push_input(&mut self, arg: CallArg) -> Argument {
        self.inputs.push(arg);
        Argument::Input((self.inputs.len() - 1) as u16)
    }

    fn push_command(&mut self, command: Command) -> u16 {
        self.commands.push(command);
        (self.commands.len() - 1) as u16
    }
}

/// Builds the four transaction shapes the marketplace package accepts.
#[derive(Debug, Clone)]
pub struct MarketCalls {
    market: MarketplaceRef,
}

impl MarketCalls {
    pub fn new(market: MarketplaceRef) -> Self {
        Self { market }
    }

    /// `widget::mint()`
    pub fn mint(&self) -> TransactionRequest {
        let mut tx = TransactionRequest::new();
        tx.move_call(self.market.target(WIDGET_MODULE, FN_MINT), vec![], vec![]);
        tx
    }

    /// `marketplace::list<Widget, SUI>(marketplace, widget, price)`
    pub fn list(&self, widget: &ObjectId, price: u64) -> TransactionRequest {
        let mut tx = TransactionRequest::new();
        let marketplace = tx.object(&self.market.marketplace_id);
        let item = tx.object(widget);
        let ask = tx.pure(price);
        tx.move_call(
            self.market.target(MARKETPLACE_MODULE, FN_LIST),
            self.item_type_arguments(),
            vec![marketplace, item, ask],
        );
        tx
    }

    /// Split `amount` off the gas coin, then
    /// `marketplace::buy_and_take<Widget, SUI>(marketplace, item_id, payment)`.
    pub fn purchase(&self, item_id: &ObjectId, amount: u64) -> TransactionRequest {
        let mut tx = TransactionRequest::new();
        let amount = tx.pure(amount);
        let split = tx.split_coins(Argument::GasCoin, vec![amount]);
        let payment = Argument::NestedResult(split, 0);

        let marketplace = tx.object(&self.market.marketplace_id);
        let item = tx.pure(item_id.as_str());
        tx.move_call(
            self.market.target(MARKETPLACE_MODULE, FN_BUY_AND_TAKE),
            self.item_type_arguments(),
            vec![marketplace, item, payment],
        );
        tx
    }

    /// `marketplace::take_profits_and_keep<SUI>(marketplace)`
    pub fn take_profits(&self) -> TransactionRequest {
        let mut tx = TransactionRequest::new();
        let marketplace = tx.object(&self.market.marketplace_id);
        tx.move_call(
            self.market.target(MARKETPLACE_MODULE, FN_TAKE_PROFITS_AND_KEEP),
            vec![self.market.coin_type().to_string()],
            vec![marketplace],
        );
        tx
    }

    fn item_type_arguments(&self) -> Vec<String> {
        vec![
            self.market.widget_type(),
            self.market.coin_type().to_string(),
        ]
    }
}
