use crate::testing::TestingContract;
use cosmwasm_std::{Addr, Empty, Env, Uint128};
use cw20::{BalanceResponse, Cw20Coin, MinterResponse};
use cw20_base::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};
use cw_multi_test::{App, Contract, ContractWrapper};

/// A real `cw20-base` token deployed into the [App], used as the fungible token ledger.
#[derive(Clone)]
pub struct Cw20TokenContract {
    pub addr: Addr,
    pub init: InstantiateMsg,
}

impl TestingContract<InstantiateMsg, ExecuteMsg, QueryMsg> for Cw20TokenContract {
    fn wrapper() -> Box<dyn Contract<Empty>> {
        Box::new(ContractWrapper::new(
            cw20_base::contract::execute,
            cw20_base::contract::instantiate,
            cw20_base::contract::query,
        ))
    }

    fn default_init(app: &mut App, _env: &Env) -> InstantiateMsg {
        InstantiateMsg {
            name: "Icebreaker Token".to_string(),
            symbol: "ICE".to_string(),
            decimals: 18,
            initial_balances: vec![Cw20Coin {
                address: app.api().addr_make("owner").to_string(),
                amount: Uint128::new(1_000_000_000_000_000_000_000),
            }],
            mint: Some(MinterResponse {
                minter: app.api().addr_make("minter").to_string(),
                cap: None,
            }),
            marketing: None,
        }
    }

    fn new(app: &mut App, env: &Env, msg: Option<InstantiateMsg>) -> Self {
        let init = msg.unwrap_or(Self::default_init(app, env));
        let code_id = Self::store_code(app);
        let addr = Self::instantiate(app, code_id, "cw20", &init);
        Self { addr, init }
    }

    fn addr(&self) -> &Addr {
        &self.addr
    }
}

impl Cw20TokenContract {
    fn minter(&self) -> Addr {
        let minter = self
            .init
            .mint
            .as_ref()
            .expect("cw20 token deployed without a minter");
        Addr::unchecked(&minter.minter)
    }

    /// Mint `amount` to `recipient`.
    pub fn fund(&self, app: &mut App, recipient: &Addr, amount: u128) {
        let msg = ExecuteMsg::Mint {
            recipient: recipient.to_string(),
            amount: Uint128::new(amount),
        };
        self.execute(app, &self.minter(), &msg).unwrap();
    }

    /// Let `spender` move up to `amount` of `owner`'s tokens with `TransferFrom`.
    pub fn increase_allowance(&self, app: &mut App, owner: &Addr, spender: &Addr, amount: u128) {
        let msg = ExecuteMsg::IncreaseAllowance {
            spender: spender.to_string(),
            amount: Uint128::new(amount),
            expires: None,
        };
        self.execute(app, owner, &msg).unwrap();
    }

    pub fn transfer(&self, app: &mut App, sender: &Addr, recipient: &Addr, amount: u128) {
        let msg = ExecuteMsg::Transfer {
            recipient: recipient.to_string(),
            amount: Uint128::new(amount),
        };
        self.execute(app, sender, &msg).unwrap();
    }

    pub fn balance(&self, app: &App, address: &Addr) -> u128 {
        let msg = QueryMsg::Balance {
            address: address.to_string(),
        };
        let res: BalanceResponse = self.query(app, &msg).unwrap();
        res.balance.u128()
    }
}
