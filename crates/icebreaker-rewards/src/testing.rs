#![cfg(not(target_arch = "wasm32"))]

use crate::msg::{ExecuteMsg, InstantiateMsg, QueryMsg};
use crate::oracle::OracleExecuteMsg;
use cosmwasm_std::{Addr, Binary, Empty, Env, HexBinary, Uint128};
use cw_multi_test::error::AnyResult;
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper};
use icebreaker_library::testing::TestingContract;
use icebreaker_library::time::DAYS;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RewardsContract {
    pub addr: Addr,
    pub init: InstantiateMsg,
}

impl TestingContract<InstantiateMsg, ExecuteMsg, QueryMsg> for RewardsContract {
    fn wrapper() -> Box<dyn Contract<Empty>> {
        Box::new(
            ContractWrapper::new(
                crate::contract::execute,
                crate::contract::instantiate,
                crate::contract::query,
            )
            .with_reply(crate::contract::reply)
            .with_migrate(crate::contract::migrate),
        )
    }

    /// Wired to the contracts deployed under "cw20" and "oracle", deploy those first.
    fn default_init(app: &mut App, _env: &Env) -> InstantiateMsg {
        InstantiateMsg {
            admin: app.api().addr_make("admin").to_string(),
            token: Self::get_contract_addr(app, "cw20").to_string(),
            treasury: app.api().addr_make("treasury").to_string(),
            base_reward_rate: Uint128::new(10_000_000_000_000_000_000),
            ice_breaker_fee: Uint128::new(1_000_000_000_000_000_000),
            min_reward_interval: DAYS,
            oracle: Self::get_contract_addr(app, "oracle").to_string(),
            subscription_id: 1,
        }
    }

    fn new(app: &mut App, env: &Env, msg: Option<InstantiateMsg>) -> Self {
        let init = msg.unwrap_or(Self::default_init(app, env));
        let code_id = Self::store_code(app);
        let addr = Self::instantiate(app, code_id, "rewards", &init);
        Self { addr, init }
    }

    fn addr(&self) -> &Addr {
        &self.addr
    }
}

impl RewardsContract {
    /// Deliver an oracle result, sent by the configured oracle.
    pub fn fulfill(
        &self,
        app: &mut App,
        request_id: &HexBinary,
        response: Binary,
        err: Binary,
    ) -> AnyResult<AppResponse> {
        let oracle = Addr::unchecked(&self.init.oracle);
        let msg = ExecuteMsg::FulfillRequest {
            request_id: request_id.clone(),
            response,
            err,
        };
        self.execute(app, &oracle, &msg)
    }
}

/// Extract the id of the request initiated by a `RequestInteractionReward` execution.
pub fn initiated_request_id(res: &AppResponse) -> HexBinary {
    let event = res
        .events
        .iter()
        .find(|event| event.ty == "wasm-RequestInitiated")
        .expect("no RequestInitiated event");
    let attribute = event
        .attributes
        .iter()
        .find(|attribute| attribute.key == "request_id")
        .expect("no request_id attribute");
    HexBinary::from_hex(&attribute.value).unwrap()
}

/// A stand-in for the external oracle service.
/// Every `SubmitRequest` is answered with a fresh request id as execute-response data,
/// results are delivered later by hand with [RewardsContract::fulfill].
pub mod mock_oracle {
    use crate::oracle::OracleExecuteMsg;
    use cosmwasm_schema::{cw_serde, QueryResponses};
    use cosmwasm_std::{
        to_json_binary, Addr, Binary, Deps, DepsMut, Env, HexBinary, MessageInfo, Response,
        StdResult,
    };
    use cw_storage_plus::Item;
    use sha3::{Digest, Sha3_256};

    const NONCE: Item<u64> = Item::new("nonce");
    const LAST_REQUEST: Item<LastRequest> = Item::new("last_request");

    #[cw_serde]
    pub struct InstantiateMsg {}

    #[cw_serde]
    #[derive(QueryResponses)]
    pub enum QueryMsg {
        #[returns(LastRequest)]
        LastRequest {},
    }

    #[cw_serde]
    pub struct LastRequest {
        pub request_id: HexBinary,
        pub requester: Addr,
        pub subscription_id: u64,
        pub args: Vec<String>,
    }

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        _msg: InstantiateMsg,
    ) -> StdResult<Response> {
        NONCE.save(deps.storage, &0)?;
        Ok(Response::new())
    }

    pub fn execute(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        msg: OracleExecuteMsg,
    ) -> StdResult<Response> {
        let OracleExecuteMsg::SubmitRequest {
            subscription_id,
            args,
        } = msg;

        let nonce = NONCE.load(deps.storage)? + 1;
        NONCE.save(deps.storage, &nonce)?;

        let request_id = HexBinary::from(Sha3_256::digest(nonce.to_be_bytes()).to_vec());
        LAST_REQUEST.save(
            deps.storage,
            &LastRequest {
                request_id: request_id.clone(),
                requester: info.sender,
                subscription_id,
                args,
            },
        )?;

        Ok(Response::new().set_data(request_id.to_vec()))
    }

    pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
        match msg {
            QueryMsg::LastRequest {} => to_json_binary(&LAST_REQUEST.load(deps.storage)?),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OracleContract {
    pub addr: Addr,
}

impl TestingContract<mock_oracle::InstantiateMsg, OracleExecuteMsg, mock_oracle::QueryMsg>
    for OracleContract
{
    fn wrapper() -> Box<dyn Contract<Empty>> {
        Box::new(ContractWrapper::new(
            mock_oracle::execute,
            mock_oracle::instantiate,
            mock_oracle::query,
        ))
    }

    fn default_init(_app: &mut App, _env: &Env) -> mock_oracle::InstantiateMsg {
        mock_oracle::InstantiateMsg {}
    }

    fn new(app: &mut App, env: &Env, msg: Option<mock_oracle::InstantiateMsg>) -> Self {
        let init = msg.unwrap_or(Self::default_init(app, env));
        let code_id = Self::store_code(app);
        let addr = Self::instantiate(app, code_id, "oracle", &init);
        Self { addr }
    }

    fn addr(&self) -> &Addr {
        &self.addr
    }
}

impl OracleContract {
    pub fn last_request(&self, app: &App) -> mock_oracle::LastRequest {
        self.query(app, &mock_oracle::QueryMsg::LastRequest {})
            .unwrap()
    }
}
