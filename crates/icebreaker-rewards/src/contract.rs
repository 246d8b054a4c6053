#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;

use crate::error::ContractError;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::state::{Config, CONFIG};
use cosmwasm_std::{
    to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, StdResult,
};
use cw2::set_contract_version;
use icebreaker_library::{admin, reentrancy};

const CONTRACT_NAME: &str = concat!("crates.io:", env!("CARGO_PKG_NAME"));
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// `SubmitRequest` to the oracle, the reply carries the request id
pub(crate) const REPLY_ORACLE_REQUEST: u64 = 1;
pub(crate) const REPLY_ICE_BREAKER: u64 = 2;
pub(crate) const REPLY_TIP: u64 = 3;
pub(crate) const REPLY_REWARD: u64 = 4;
pub(crate) const REPLY_WITHDRAW: u64 = 5;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let administrator = deps.api.addr_validate(&msg.admin)?;
    admin::set_admin(deps.storage, &administrator)?;

    let config = Config {
        token: deps.api.addr_validate(&msg.token)?,
        treasury: deps.api.addr_validate(&msg.treasury)?,
        base_reward_rate: msg.base_reward_rate,
        ice_breaker_fee: msg.ice_breaker_fee,
        min_reward_interval: msg.min_reward_interval,
        oracle: deps.api.addr_validate(&msg.oracle)?,
        subscription_id: msg.subscription_id,
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", administrator)
        .add_attribute("token", config.token)
        .add_attribute("treasury", config.treasury)
        .add_attribute("oracle", config.oracle))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    // nothing executes while a token transfer or oracle request of this contract is in flight
    reentrancy::assert_not_entered(deps.storage)?;

    match msg {
        ExecuteMsg::PayIceBreakerFee { invitee } => {
            let invitee = deps.api.addr_validate(&invitee)?;
            execute::pay_ice_breaker_fee(deps, info, invitee)
        }
        ExecuteMsg::Tip { recipient, amount } => {
            let recipient = deps.api.addr_validate(&recipient)?;
            execute::tip(deps, info, recipient, amount)
        }
        ExecuteMsg::RequestInteractionReward {
            participant_a,
            participant_b,
            args,
        } => {
            let participant_a = deps.api.addr_validate(&participant_a)?;
            let participant_b = deps.api.addr_validate(&participant_b)?;
            execute::request_interaction_reward(deps, info, participant_a, participant_b, args)
        }
        ExecuteMsg::FulfillRequest {
            request_id,
            response,
            err,
        } => execute::fulfill_request(deps, info, request_id.into(), response, err),
        ExecuteMsg::IssueReward { request_id } => {
            execute::issue_reward(deps, env, info, request_id.into())
        }
        ExecuteMsg::SetBaseRewardRate { base_reward_rate } => {
            execute::set_base_reward_rate(deps, info, base_reward_rate)
        }
        ExecuteMsg::SetIceBreakerFee { ice_breaker_fee } => {
            execute::set_ice_breaker_fee(deps, info, ice_breaker_fee)
        }
        ExecuteMsg::SetMinRewardInterval {
            min_reward_interval,
        } => execute::set_min_reward_interval(deps, info, min_reward_interval),
        ExecuteMsg::SetTreasury { treasury } => {
            let treasury = deps.api.addr_validate(&treasury)?;
            execute::set_treasury(deps, info, treasury)
        }
        ExecuteMsg::SetOracle {
            oracle,
            subscription_id,
        } => {
            let oracle = deps.api.addr_validate(&oracle)?;
            execute::set_oracle(deps, info, oracle, subscription_id)
        }
        ExecuteMsg::TransferAdmin { new_admin } => {
            let new_admin = deps.api.addr_validate(&new_admin)?;
            admin::transfer_admin(deps.storage, &info, new_admin).map_err(ContractError::from)
        }
        ExecuteMsg::Withdraw {} => execute::withdraw(deps, env, info),
    }
}

mod execute {
    use super::*;
    use crate::correlator::{self, Fulfillment, RequestId};
    use crate::pair::PairKey;
    use crate::{oracle, registry, reward, state, token};
    use cosmwasm_std::{Addr, Event, SubMsg, Uint128};

    /// Pay the ice breaker fee from the sender to the treasury.
    /// The balance is checked upfront so an underfunded sender fails without dispatching anything.
    pub fn pay_ice_breaker_fee(
        deps: DepsMut,
        info: MessageInfo,
        invitee: Addr,
    ) -> Result<Response, ContractError> {
        if invitee == info.sender {
            return Err(ContractError::InvalidParticipants {});
        }

        let config = state::get_config(deps.storage)?;
        let fee = config.ice_breaker_fee;

        let balance = token::query_balance(&deps.querier, &config.token, &info.sender)?;
        if balance < fee {
            return Err(ContractError::IceBreakerFee {});
        }

        let event = Event::new("IceBreakerSent")
            .add_attribute("caller", info.sender.as_str())
            .add_attribute("invitee", invitee.as_str())
            .add_attribute("fee", fee.to_string());

        if fee.is_zero() {
            return Ok(Response::new().add_event(event));
        }

        reentrancy::enter(deps.storage)?;
        let transfer = token::transfer_from(&config.token, &info.sender, &config.treasury, fee)?;

        Ok(Response::new()
            .add_submessage(SubMsg::reply_always(transfer, REPLY_ICE_BREAKER))
            .add_event(event))
    }

    /// Tips bypass the interaction registry and the rate limit entirely.
    pub fn tip(
        deps: DepsMut,
        info: MessageInfo,
        recipient: Addr,
        amount: Uint128,
    ) -> Result<Response, ContractError> {
        let config = state::get_config(deps.storage)?;

        reentrancy::enter(deps.storage)?;
        let transfer = token::transfer_from(&config.token, &info.sender, &recipient, amount)?;

        Ok(Response::new()
            .add_submessage(SubMsg::reply_always(transfer, REPLY_TIP))
            .add_event(
                Event::new("TipSent")
                    .add_attribute("sender", info.sender.as_str())
                    .add_attribute("recipient", recipient.as_str())
                    .add_attribute("amount", amount.to_string()),
            ))
    }

    /// Submit a verification request to the oracle on behalf of a pair.
    /// The pair is bound to the request id once the oracle returns it, see [reply].
    pub fn request_interaction_reward(
        deps: DepsMut,
        info: MessageInfo,
        participant_a: Addr,
        participant_b: Addr,
        args: Vec<String>,
    ) -> Result<Response, ContractError> {
        let is_participant = info.sender == participant_a || info.sender == participant_b;
        if !is_participant && !admin::is_admin(deps.storage, &info.sender)? {
            return Err(ContractError::UnauthorizedCaller {});
        }

        correlator::stash_initiation(deps.storage, &participant_a, &participant_b)?;

        let config = state::get_config(deps.storage)?;

        reentrancy::enter(deps.storage)?;
        let submit = oracle::submit_request(&config.oracle, config.subscription_id, args)?;

        Ok(Response::new()
            .add_submessage(SubMsg::reply_on_success(submit, REPLY_ORACLE_REQUEST))
            .add_attribute("method", "request_interaction_reward")
            .add_attribute("sender", info.sender.as_str()))
    }

    /// Only the configured oracle can deliver results.
    pub fn fulfill_request(
        deps: DepsMut,
        info: MessageInfo,
        request_id: RequestId,
        response: Binary,
        err: Binary,
    ) -> Result<Response, ContractError> {
        let config = state::get_config(deps.storage)?;
        if info.sender != config.oracle {
            return Err(ContractError::UnauthorizedCaller {});
        }

        let event = match correlator::fulfill(deps.storage, &request_id, &response, &err)? {
            Fulfillment::Fulfilled(value) => Event::new("RequestFulfilled")
                .add_attribute("request_id", request_id.to_hex())
                .add_attribute("value", value.to_string()),
            Fulfillment::Failed(reason) => Event::new("RequestFailed")
                .add_attribute("request_id", request_id.to_hex())
                .add_attribute("err", reason),
        };

        Ok(Response::new().add_event(event))
    }

    /// Reward both participants of a request.
    ///
    /// Local state (timestamp, count, request consumption) is written before the transfers are
    /// dispatched. If either transfer fails, the reply returns an error and every write is
    /// reverted with it.
    pub fn issue_reward(
        deps: DepsMut,
        env: Env,
        info: MessageInfo,
        request_id: RequestId,
    ) -> Result<Response, ContractError> {
        admin::assert_admin(deps.storage, &info)?;

        let request = correlator::resolve(deps.storage, &request_id)?;
        let key = PairKey::new(&request.participant_a, &request.participant_b)?;
        let config = state::get_config(deps.storage)?;

        // the rate limit and the reward amount are both derived from this single read
        let record = registry::get(deps.storage, &key)?;
        record.assert_interval_elapsed(config.min_reward_interval, env.block.time)?;
        let amount = reward::reward(config.base_reward_rate, record.interaction_count);

        registry::set_last_reward_timestamp(deps.storage, &key, env.block.time)?;
        let record = registry::increment_count(deps.storage, &key)?;
        correlator::consume(deps.storage, &request_id)?;

        let response = Response::new()
            .add_attribute("method", "issue_reward")
            .add_attribute("request_id", request_id.to_hex())
            .add_attribute("pair_key", key.to_hex())
            .add_attribute("interaction_count", record.interaction_count.to_string())
            .add_events(
                [&request.participant_a, &request.participant_b].map(|participant| {
                    Event::new("RewardUser")
                        .add_attribute("participant", participant.as_str())
                        .add_attribute("amount", amount.to_string())
                }),
            );

        if amount.is_zero() {
            return Ok(response);
        }

        reentrancy::enter(deps.storage)?;
        let to_a = token::transfer_from(
            &config.token,
            &config.treasury,
            &request.participant_a,
            amount,
        )?;
        let to_b = token::transfer_from(
            &config.token,
            &config.treasury,
            &request.participant_b,
            amount,
        )?;

        // only the last transfer releases the guard
        Ok(response
            .add_submessage(SubMsg::reply_on_error(to_a, REPLY_REWARD))
            .add_submessage(SubMsg::reply_always(to_b, REPLY_REWARD)))
    }

    pub fn set_base_reward_rate(
        deps: DepsMut,
        info: MessageInfo,
        base_reward_rate: Uint128,
    ) -> Result<Response, ContractError> {
        admin::assert_admin(deps.storage, &info)?;

        let (prev, new) = state::update_config(deps.storage, |config| {
            config.base_reward_rate = base_reward_rate
        })?;

        Ok(Response::new().add_event(config_updated(
            "base_reward_rate",
            prev.base_reward_rate,
            new.base_reward_rate,
        )))
    }

    pub fn set_ice_breaker_fee(
        deps: DepsMut,
        info: MessageInfo,
        ice_breaker_fee: Uint128,
    ) -> Result<Response, ContractError> {
        admin::assert_admin(deps.storage, &info)?;

        let (prev, new) = state::update_config(deps.storage, |config| {
            config.ice_breaker_fee = ice_breaker_fee
        })?;

        Ok(Response::new().add_event(config_updated(
            "ice_breaker_fee",
            prev.ice_breaker_fee,
            new.ice_breaker_fee,
        )))
    }

    pub fn set_min_reward_interval(
        deps: DepsMut,
        info: MessageInfo,
        min_reward_interval: u64,
    ) -> Result<Response, ContractError> {
        admin::assert_admin(deps.storage, &info)?;

        let (prev, new) = state::update_config(deps.storage, |config| {
            config.min_reward_interval = min_reward_interval
        })?;

        Ok(Response::new().add_event(config_updated(
            "min_reward_interval",
            prev.min_reward_interval,
            new.min_reward_interval,
        )))
    }

    pub fn set_treasury(
        deps: DepsMut,
        info: MessageInfo,
        treasury: Addr,
    ) -> Result<Response, ContractError> {
        admin::assert_admin(deps.storage, &info)?;

        let (prev, new) =
            state::update_config(deps.storage, |config| config.treasury = treasury)?;

        Ok(Response::new().add_event(config_updated("treasury", prev.treasury, new.treasury)))
    }

    pub fn set_oracle(
        deps: DepsMut,
        info: MessageInfo,
        oracle: Addr,
        subscription_id: u64,
    ) -> Result<Response, ContractError> {
        admin::assert_admin(deps.storage, &info)?;

        let (prev, new) = state::update_config(deps.storage, |config| {
            config.oracle = oracle;
            config.subscription_id = subscription_id;
        })?;

        Ok(Response::new()
            .add_event(config_updated("oracle", prev.oracle, new.oracle))
            .add_event(config_updated(
                "subscription_id",
                prev.subscription_id,
                new.subscription_id,
            )))
    }

    /// Sweep every token held by this contract to the admin.
    pub fn withdraw(deps: DepsMut, env: Env, info: MessageInfo) -> Result<Response, ContractError> {
        admin::assert_admin(deps.storage, &info)?;

        let config = state::get_config(deps.storage)?;
        let balance = token::query_balance(&deps.querier, &config.token, &env.contract.address)?;

        let response = Response::new().add_event(
            Event::new("BalanceWithdrawn")
                .add_attribute("administrator", info.sender.as_str())
                .add_attribute("amount", balance.to_string()),
        );

        if balance.is_zero() {
            return Ok(response);
        }

        reentrancy::enter(deps.storage)?;
        let transfer = token::transfer(&config.token, &info.sender, balance)?;
        Ok(response.add_submessage(SubMsg::reply_always(transfer, REPLY_WITHDRAW)))
    }

    fn config_updated(field: &str, prev: impl ToString, new: impl ToString) -> Event {
        Event::new("ConfigUpdated")
            .add_attribute("field", field)
            .add_attribute("prev", prev.to_string())
            .add_attribute("new", new.to_string())
    }
}

/// Every sub_message this contract dispatches comes back here.
/// A failed transfer is turned into the typed error of its operation, which reverts the
/// whole transaction; a successful final sub_message releases the reentrancy guard.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn reply(deps: DepsMut, env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        REPLY_ORACLE_REQUEST => reply::oracle_request(deps, env, msg.result),
        REPLY_ICE_BREAKER => reply::transfer(deps, msg.result, ContractError::IceBreakerFee {}),
        REPLY_TIP => reply::transfer(deps, msg.result, ContractError::TipUser {}),
        REPLY_REWARD => {
            reply::transfer(deps, msg.result, ContractError::RewardTransferFailed {})
        }
        REPLY_WITHDRAW => reply::transfer(deps, msg.result, ContractError::WithdrawFailed {}),
        id => Err(ContractError::UnknownReplyId { id }),
    }
}

mod reply {
    use super::*;
    use crate::{correlator, oracle};
    use cosmwasm_std::{Event, StdError, SubMsgResult};

    pub fn oracle_request(
        deps: DepsMut,
        env: Env,
        result: SubMsgResult,
    ) -> Result<Response, ContractError> {
        let response = result.into_result().map_err(StdError::generic_err)?;
        let request_id = oracle::parse_request_id(response)?;
        let request = correlator::complete_initiation(deps.storage, &request_id, env.block.time)?;

        reentrancy::exit(deps.storage)?;

        Ok(Response::new()
            .set_data(request_id.0.to_vec())
            .add_event(
                Event::new("RequestInitiated")
                    .add_attribute("request_id", request_id.to_hex())
                    .add_attribute("participant_a", request.participant_a.as_str())
                    .add_attribute("participant_b", request.participant_b.as_str()),
            ))
    }

    pub fn transfer(
        deps: DepsMut,
        result: SubMsgResult,
        failure: ContractError,
    ) -> Result<Response, ContractError> {
        match result {
            SubMsgResult::Ok(_) => {
                reentrancy::exit(deps.storage)?;
                Ok(Response::new())
            }
            SubMsgResult::Err(_) => Err(failure),
        }
    }
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => to_json_binary(&query::config(deps)?),
        QueryMsg::Admin {} => to_json_binary(&query::administrator(deps)?),
        QueryMsg::PairKey {
            participant_a,
            participant_b,
        } => {
            let participant_a = deps.api.addr_validate(&participant_a)?;
            let participant_b = deps.api.addr_validate(&participant_b)?;
            to_json_binary(&query::pair_key(&participant_a, &participant_b)?)
        }
        QueryMsg::Interaction {
            participant_a,
            participant_b,
        } => {
            let participant_a = deps.api.addr_validate(&participant_a)?;
            let participant_b = deps.api.addr_validate(&participant_b)?;
            to_json_binary(&query::interaction(deps, &participant_a, &participant_b)?)
        }
        QueryMsg::EstimateReward { interaction_count } => {
            to_json_binary(&query::estimate_reward(deps, interaction_count)?)
        }
        QueryMsg::PendingRequest { request_id } => {
            to_json_binary(&query::pending_request(deps, request_id.into())?)
        }
        QueryMsg::OracleResult { request_id } => {
            to_json_binary(&query::oracle_result(deps, request_id.into())?)
        }
    }
}

mod query {
    use super::*;
    use crate::correlator::{self, RequestId};
    use crate::msg::{
        AdminResponse, ConfigResponse, EstimateRewardResponse, InteractionResponse,
        OracleResultResponse, PairKeyResponse, PendingRequestResponse,
    };
    use crate::pair::PairKey;
    use crate::{registry, reward, state};
    use cosmwasm_std::{Addr, StdError};

    fn key(participant_a: &Addr, participant_b: &Addr) -> StdResult<PairKey> {
        PairKey::new(participant_a, participant_b)
            .map_err(|err| StdError::generic_err(err.to_string()))
    }

    pub fn config(deps: Deps) -> StdResult<ConfigResponse> {
        state::get_config(deps.storage)
    }

    pub fn administrator(deps: Deps) -> StdResult<AdminResponse> {
        admin::get_admin(deps.storage).map(AdminResponse)
    }

    pub fn pair_key(participant_a: &Addr, participant_b: &Addr) -> StdResult<PairKeyResponse> {
        Ok(PairKeyResponse(key(participant_a, participant_b)?.to_hex()))
    }

    /// Query the interaction record of a pair, and what its next reward cycle looks like.
    pub fn interaction(
        deps: Deps,
        participant_a: &Addr,
        participant_b: &Addr,
    ) -> StdResult<InteractionResponse> {
        let key = key(participant_a, participant_b)?;
        let config = state::get_config(deps.storage)?;
        let record = registry::get(deps.storage, &key)?;

        Ok(InteractionResponse {
            interaction_count: record.interaction_count,
            last_reward_timestamp: record.last_reward_timestamp,
            next_reward: reward::reward(config.base_reward_rate, record.interaction_count),
            next_reward_at: record.next_reward_at(config.min_reward_interval),
        })
    }

    pub fn estimate_reward(deps: Deps, interaction_count: u64) -> StdResult<EstimateRewardResponse> {
        let config = state::get_config(deps.storage)?;
        Ok(EstimateRewardResponse(reward::reward(
            config.base_reward_rate,
            interaction_count,
        )))
    }

    pub fn pending_request(
        deps: Deps,
        request_id: RequestId,
    ) -> StdResult<PendingRequestResponse> {
        let request = correlator::get_request(deps.storage, &request_id)?
            .ok_or_else(|| StdError::not_found(format!("request {}", request_id)))?;

        Ok(PendingRequestResponse {
            participant_a: request.participant_a,
            participant_b: request.participant_b,
            status: request.status,
            oracle_status: request.oracle_status,
            requested_at: request.requested_at,
        })
    }

    pub fn oracle_result(deps: Deps, request_id: RequestId) -> StdResult<OracleResultResponse> {
        correlator::get_oracle_result(deps.storage, &request_id).map(OracleResultResponse)
    }
}

/// This can only be called by the contract ADMIN, enforced by `wasmd` separate from cosmwasm.
#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    cw2::ensure_from_older_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new().add_attribute("method", "migrate"))
}
