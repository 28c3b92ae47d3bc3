use commons::*;
use concordium_cis1::*;
use concordium_std::*;

use crate::events::AuctionEvent;
use crate::external::*;
use crate::state::State;

/// Initialize the contract with an empty collection. The instance creator
/// becomes the immutable contract owner.
#[init(contract = "NftTimedAuction")]
fn contract_init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    Ok(State::new(state_builder, ctx.init_origin()))
}

/// Mint a token and open its auction. Owner only.
///
/// It rejects if:
/// - Fails to parse parameter;
/// - Sender is not the contract owner;
/// - The token ID is already taken;
/// - Fails to log events.
#[receive(
    mutable,
    contract = "NftTimedAuction",
    name = "mint",
    parameter = "MintParams",
    enable_logger
)]
fn contract_mint<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params = MintParams::deserial(&mut ctx.parameter_cursor())?;

    host.state_mut().guard.enter()?;
    let result = mint_locked(ctx, host, logger, params);
    host.state_mut().guard.exit();
    result
}

fn mint_locked<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
    params: MintParams,
) -> ContractResult<()> {
    let owner = host.state().owner;
    ensure!(
        ctx.sender().matches_account(&owner),
        CustomContractError::NotOwner.into()
    );

    host.state_mut().mint(
        params.token_id.clone(),
        params.metadata_url.clone(),
        params.duration,
        ctx.metadata().slot_time(),
    )?;

    logger.log(&Cis1Event::Mint(MintEvent {
        token_id: params.token_id.clone(),
        amount: 1,
        owner: Address::Account(owner),
    }))?;
    logger.log(&Cis1Event::TokenMetadata(TokenMetadataEvent {
        token_id: params.token_id.clone(),
        metadata_url: MetadataUrl {
            url: params.metadata_url,
            hash: None,
        },
    }))?;
    logger.log(&AuctionEvent::time_updated(&params.token_id, params.duration))?;

    Ok(())
}

/// Place a bid on an open auction. The attached CCD is the bid and stays
/// escrowed in the contract until settlement or a later outbid withdrawal.
///
/// It rejects if:
/// - Fails to parse parameter;
/// - Sender is a contract or the contract owner;
/// - The token was never minted;
/// - The auction has closed;
/// - The attached CCD is below the start price, or below the current bid
///   plus the minimum increment;
/// - Fails to log events.
#[receive(
    mutable,
    payable,
    contract = "NftTimedAuction",
    name = "bid",
    parameter = "TokenParams",
    enable_logger
)]
fn contract_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params = TokenParams::deserial(&mut ctx.parameter_cursor())?;

    let bidder = match ctx.sender() {
        Address::Account(account) => account,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };

    host.state_mut().guard.enter()?;
    let result = bid_locked(ctx, host, logger, params, bidder, amount);
    host.state_mut().guard.exit();
    result
}

fn bid_locked<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
    params: TokenParams,
    bidder: AccountAddress,
    amount: Amount,
) -> ContractResult<()> {
    let outcome = host.state_mut().bid(
        &params.token_id,
        bidder,
        amount,
        ctx.metadata().slot_time(),
    )?;

    if let Some(remaining) = outcome.extended {
        logger.log(&AuctionEvent::time_updated(&params.token_id, remaining))?;
    }
    if let Some((account, credit)) = outcome.credited {
        logger.log(&AuctionEvent::pending_credited(&account, credit))?;
    }
    logger.log(&AuctionEvent::bid_placed(&params.token_id, &bidder, amount))?;

    Ok(())
}

/// Withdraw the CCD owed to the caller after being outbid.
///
/// It rejects if:
/// - Sender is a contract;
/// - Nothing is owed to the caller;
/// - The outgoing payment fails, in which case the owed amount is put back
///   first;
/// - Fails to log events.
#[receive(
    mutable,
    contract = "NftTimedAuction",
    name = "withdraw",
    enable_logger
)]
fn contract_withdraw<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let caller = match ctx.sender() {
        Address::Account(account) => account,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };

    host.state_mut().guard.enter()?;
    let result = withdraw_locked(host, logger, caller);
    host.state_mut().guard.exit();
    result
}

fn withdraw_locked<S: HasStateApi>(
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
    caller: AccountAddress,
) -> ContractResult<()> {
    // The balance is zeroed before the payment attempt; a reentrant
    // withdrawal finds nothing owed.
    let owed = host.state_mut().take_pending(caller)?;
    logger.log(&AuctionEvent::pending_withdrawal(&caller, owed))?;

    if host.invoke_transfer(&caller, owed).is_err() {
        // Put the owed amount back before rejecting the call.
        host.state_mut().credit_pending(caller, owed);
        bail!(CustomContractError::TransferFailed.into());
    }

    logger.log(&AuctionEvent::withdraw_completed(&caller, owed))?;
    Ok(())
}

/// Settle a closed auction: pay the winning bid to the contract owner and
/// authorize the winner to claim the token. Ownership does not move here;
/// the winner performs the claim with a later `transfer` call. Owner only.
///
/// It rejects if:
/// - Fails to parse parameter;
/// - Sender is not the contract owner;
/// - The token was never minted;
/// - The auction is still open;
/// - No bid was ever placed;
/// - The payout to the owner fails;
/// - Fails to log events.
#[receive(
    mutable,
    contract = "NftTimedAuction",
    name = "acceptBid",
    parameter = "TokenParams",
    enable_logger
)]
fn contract_accept_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params = TokenParams::deserial(&mut ctx.parameter_cursor())?;

    host.state_mut().guard.enter()?;
    let result = accept_bid_locked(ctx, host, logger, params);
    host.state_mut().guard.exit();
    result
}

fn accept_bid_locked<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
    params: TokenParams,
) -> ContractResult<()> {
    let owner = host.state().owner;
    ensure!(
        ctx.sender().matches_account(&owner),
        CustomContractError::NotOwner.into()
    );

    let slot_time = ctx.metadata().slot_time();
    let (winner, price) = host.state().accept_bid(&params.token_id, slot_time)?;

    // Pay out the winning bid before authorizing the claim.
    host.invoke_transfer(&owner, price)
        .map_err(|_| CustomContractError::TransferFailed)?;

    // Authorization goes through the same guard the winner's claim will
    // pass later.
    host.state()
        .ensure_claimable(&params.token_id, &winner, slot_time)?;
    host.state_mut()
        .ledger
        .approve(&owner, &params.token_id, winner)?;

    logger.log(&AuctionEvent::bid_accepted(&params.token_id, &winner, price))?;

    Ok(())
}

/// Reopen an expired auction that never received a bid. Owner only.
///
/// It rejects if:
/// - Fails to parse parameter;
/// - Sender is not the contract owner;
/// - The token was never minted;
/// - The auction is still open;
/// - A bid was placed at some point, even one whose refund was already
///   withdrawn;
/// - Fails to log events.
#[receive(
    mutable,
    contract = "NftTimedAuction",
    name = "renewAuction",
    parameter = "TokenParams",
    enable_logger
)]
fn contract_renew_auction<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params = TokenParams::deserial(&mut ctx.parameter_cursor())?;

    host.state_mut().guard.enter()?;
    let result = renew_locked(ctx, host, logger, params);
    host.state_mut().guard.exit();
    result
}

fn renew_locked<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
    params: TokenParams,
) -> ContractResult<()> {
    let owner = host.state().owner;
    ensure!(
        ctx.sender().matches_account(&owner),
        CustomContractError::NotOwner.into()
    );

    let duration = host
        .state_mut()
        .renew(&params.token_id, ctx.metadata().slot_time())?;

    logger.log(&AuctionEvent::time_updated(&params.token_id, duration))?;

    Ok(())
}

/// Execute a list of token transfers, in the order of the list. Every
/// transfer must name the winning bidder of a closed auction as the
/// destination; the token ledger then authenticates the sender as the
/// owner or the approved account.
///
/// It rejects if:
/// - Fails to parse parameter;
/// - Sender is a contract;
/// - Any transfer amount is over 1;
/// - Any destination is a contract or not the winning bidder;
/// - Any auction is still open;
/// - The ledger rejects any transfer;
/// - Fails to log events.
#[receive(
    mutable,
    contract = "NftTimedAuction",
    name = "transfer",
    parameter = "TransferParameter",
    enable_logger
)]
fn contract_transfer<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let TransferParams(transfers) = TransferParameter::deserial(&mut ctx.parameter_cursor())?;

    let sender = match ctx.sender() {
        Address::Account(account) => account,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };

    host.state_mut().guard.enter()?;
    let result = transfer_locked(ctx, host, logger, transfers, sender);
    host.state_mut().guard.exit();
    result
}

fn transfer_locked<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
    transfers: Vec<Transfer<ContractTokenId>>,
    sender: AccountAddress,
) -> ContractResult<()> {
    let slot_time = ctx.metadata().slot_time();

    for transfer in transfers {
        // Check the transfer amount
        match transfer.amount {
            0 => continue,
            1 => (),
            _ => return Err(ContractError::InsufficientFunds),
        }

        // Only the winning bidder of a closed auction may receive a token.
        // Bidders are always accounts, so a contract destination can never
        // qualify.
        let to = match &transfer.to {
            Receiver::Account(account) => *account,
            Receiver::Contract(..) => {
                bail!(CustomContractError::AddressIsNotHighestBidder.into())
            }
        };
        host.state()
            .ensure_claimable(&transfer.token_id, &to, slot_time)?;

        let from = match transfer.from {
            Address::Account(account) => account,
            Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
        };

        host.state_mut()
            .ledger
            .transfer(&sender, &transfer.token_id, &from, to)?;

        logger.log(&Cis1Event::Transfer(TransferEvent {
            token_id: transfer.token_id,
            amount: 1,
            from: transfer.from,
            to: Address::Account(to),
        }))?;
    }

    Ok(())
}

/// Authorize an account to receive a token. Subject to the same guard as
/// `transfer`: the auction must be closed and the authorized account must
/// be the winning bidder. The sender must own the token.
///
/// It rejects if:
/// - Fails to parse parameter;
/// - Sender is a contract or not the token owner;
/// - The token was never minted;
/// - The auction is still open;
/// - The named account is not the winning bidder.
#[receive(
    mutable,
    contract = "NftTimedAuction",
    name = "approve",
    parameter = "ApproveParams"
)]
fn contract_approve<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    let params = ApproveParams::deserial(&mut ctx.parameter_cursor())?;

    let sender = match ctx.sender() {
        Address::Account(account) => account,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };

    host.state_mut().guard.enter()?;
    let result = approve_locked(ctx, host, params, sender);
    host.state_mut().guard.exit();
    result
}

fn approve_locked<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    params: ApproveParams,
    sender: AccountAddress,
) -> ContractResult<()> {
    host.state().ensure_claimable(
        &params.token_id,
        &params.to,
        ctx.metadata().slot_time(),
    )?;
    host.state_mut()
        .ledger
        .approve(&sender, &params.token_id, params.to)?;
    Ok(())
}

/// Operator management is permanently disabled: an operator for all tokens
/// could move a token past the winning-bidder restriction.
#[receive(
    contract = "NftTimedAuction",
    name = "updateOperator",
    parameter = "UpdateOperatorParams"
)]
fn contract_update_operator<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    _host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    Err(CustomContractError::FunctionDisabled.into())
}

/// Whether the auction for the token is still accepting bids.
#[receive(
    contract = "NftTimedAuction",
    name = "isOpen",
    parameter = "TokenParams",
    return_value = "bool"
)]
fn contract_is_open<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<bool> {
    let params = TokenParams::deserial(&mut ctx.parameter_cursor())?;
    let open = host
        .state()
        .is_open(&params.token_id, ctx.metadata().slot_time())?;
    Ok(open)
}

/// Time left until the auction deadline. Unlike `isOpen`, asking after the
/// deadline is an error, not a zero.
#[receive(
    contract = "NftTimedAuction",
    name = "remainingTime",
    parameter = "TokenParams",
    return_value = "Duration"
)]
fn contract_remaining_time<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Duration> {
    let params = TokenParams::deserial(&mut ctx.parameter_cursor())?;
    let remaining = host
        .state()
        .remaining_time(&params.token_id, ctx.metadata().slot_time())?;
    Ok(remaining)
}

/// The highest accepted bid, or the start price before any bid.
#[receive(
    contract = "NftTimedAuction",
    name = "highestBid",
    parameter = "TokenParams",
    return_value = "Amount"
)]
fn contract_highest_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Amount> {
    let params = TokenParams::deserial(&mut ctx.parameter_cursor())?;
    let bid = host.state().highest_bid(&params.token_id)?;
    Ok(bid)
}

/// The account holding the highest bid, if any bid was accepted.
#[receive(
    contract = "NftTimedAuction",
    name = "highestBidder",
    parameter = "TokenParams",
    return_value = "Option<AccountAddress>"
)]
fn contract_highest_bidder<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Option<AccountAddress>> {
    let params = TokenParams::deserial(&mut ctx.parameter_cursor())?;
    let bidder = host.state().highest_bidder(&params.token_id)?;
    Ok(bidder)
}

/// The CCD owed to an account after being outbid.
#[receive(
    contract = "NftTimedAuction",
    name = "pendingReturn",
    parameter = "AccountParams",
    return_value = "Amount"
)]
fn contract_pending_return<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Amount> {
    let params = AccountParams::deserial(&mut ctx.parameter_cursor())?;
    Ok(host.state().pending_return(&params.account))
}

/// Current owner of a token.
#[receive(
    contract = "NftTimedAuction",
    name = "ownerOf",
    parameter = "TokenParams",
    return_value = "AccountAddress"
)]
fn contract_owner_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<AccountAddress> {
    let params = TokenParams::deserial(&mut ctx.parameter_cursor())?;
    let owner = host.state().ledger.owner_of(&params.token_id)?;
    Ok(owner)
}

/// Total number of tokens minted so far.
#[receive(
    contract = "NftTimedAuction",
    name = "totalSupply",
    return_value = "u64"
)]
fn contract_total_supply<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<u64> {
    Ok(host.state().ledger.supply())
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use concordium_std::test_infrastructure::*;

    const OWNER: AccountAddress = AccountAddress([0u8; 32]);
    const ALICE: AccountAddress = AccountAddress([1u8; 32]);
    const BOB: AccountAddress = AccountAddress([2u8; 32]);
    const CAROL: AccountAddress = AccountAddress([3u8; 32]);

    /// Bidding window used by the tests, 30 minutes.
    const AUCTION_DURATION: u64 = 1_800_000;
    /// Slot time at which token 0 is minted.
    const T0: u64 = 10_000_000;

    fn token_0() -> ContractTokenId {
        TokenIdVec(vec![0])
    }

    fn fresh_host() -> TestHost<State<TestStateApi>> {
        let mut ctx = TestInitContext::empty();
        ctx.set_init_origin(OWNER);
        let mut state_builder = TestStateBuilder::new();
        let state = contract_init(&ctx, &mut state_builder)
            .expect_report("Contract initialization failed");
        TestHost::new(state, state_builder)
    }

    fn receive_ctx<'a>(
        sender: AccountAddress,
        slot_millis: u64,
        parameter_bytes: &'a [u8],
    ) -> TestReceiveContext<'a> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(sender))
            .set_metadata_slot_time(Timestamp::from_timestamp_millis(slot_millis))
            .set_parameter(parameter_bytes);
        ctx
    }

    fn mint_token_0(host: &mut TestHost<State<TestStateApi>>) {
        let parameter_bytes = to_bytes(&MintParams {
            token_id: token_0(),
            metadata_url: String::from("ipfs://token-0"),
            duration: Duration::from_millis(AUCTION_DURATION),
        });
        let ctx = receive_ctx(OWNER, T0, &parameter_bytes);
        let mut logger = TestLogger::init();
        contract_mint(&ctx, host, &mut logger).expect_report("Minting failed");
    }

    fn place_bid(
        host: &mut TestHost<State<TestStateApi>>,
        bidder: AccountAddress,
        micro_ccd: u64,
        slot_millis: u64,
    ) -> ContractResult<()> {
        let parameter_bytes = to_bytes(&TokenParams {
            token_id: token_0(),
        });
        let ctx = receive_ctx(bidder, slot_millis, &parameter_bytes);
        let mut logger = TestLogger::init();
        contract_bid(&ctx, host, Amount::from_micro_ccd(micro_ccd), &mut logger)
    }

    fn accept_bid(
        host: &mut TestHost<State<TestStateApi>>,
        sender: AccountAddress,
        slot_millis: u64,
    ) -> ContractResult<()> {
        let parameter_bytes = to_bytes(&TokenParams {
            token_id: token_0(),
        });
        let ctx = receive_ctx(sender, slot_millis, &parameter_bytes);
        let mut logger = TestLogger::init();
        contract_accept_bid(&ctx, host, &mut logger)
    }

    fn renew_auction(
        host: &mut TestHost<State<TestStateApi>>,
        sender: AccountAddress,
        slot_millis: u64,
    ) -> ContractResult<()> {
        let parameter_bytes = to_bytes(&TokenParams {
            token_id: token_0(),
        });
        let ctx = receive_ctx(sender, slot_millis, &parameter_bytes);
        let mut logger = TestLogger::init();
        contract_renew_auction(&ctx, host, &mut logger)
    }

    fn withdraw(
        host: &mut TestHost<State<TestStateApi>>,
        sender: AccountAddress,
    ) -> ContractResult<()> {
        let ctx = receive_ctx(sender, T0, &[]);
        let mut logger = TestLogger::init();
        contract_withdraw(&ctx, host, &mut logger)
    }

    fn claim_token(
        host: &mut TestHost<State<TestStateApi>>,
        sender: AccountAddress,
        from: AccountAddress,
        to: Receiver,
        slot_millis: u64,
    ) -> ContractResult<()> {
        let parameter_bytes = to_bytes(&TransferParams(vec![Transfer {
            token_id: token_0(),
            amount: 1,
            from: Address::Account(from),
            to,
            data: AdditionalData::empty(),
        }]));
        let ctx = receive_ctx(sender, slot_millis, &parameter_bytes);
        let mut logger = TestLogger::init();
        contract_transfer(&ctx, host, &mut logger)
    }

    fn remaining_time(
        host: &TestHost<State<TestStateApi>>,
        slot_millis: u64,
    ) -> ContractResult<Duration> {
        let parameter_bytes = to_bytes(&TokenParams {
            token_id: token_0(),
        });
        let ctx = receive_ctx(OWNER, slot_millis, &parameter_bytes);
        contract_remaining_time(&ctx, host)
    }

    fn is_open(host: &TestHost<State<TestStateApi>>, slot_millis: u64) -> ContractResult<bool> {
        let parameter_bytes = to_bytes(&TokenParams {
            token_id: token_0(),
        });
        let ctx = receive_ctx(OWNER, slot_millis, &parameter_bytes);
        contract_is_open(&ctx, host)
    }

    fn pending_return(host: &TestHost<State<TestStateApi>>, account: AccountAddress) -> Amount {
        host.state().pending_return(&account)
    }

    /// Mint token 0 and run the outbid sequence from the scenario: Alice
    /// holds 0.6 CCD, Bob outbids with 0.61 CCD.
    fn host_with_outbid_alice() -> TestHost<State<TestStateApi>> {
        let mut host = fresh_host();
        mint_token_0(&mut host);
        place_bid(&mut host, ALICE, 600_000, T0 + 60_000).expect_report("First bid failed");
        place_bid(&mut host, BOB, 610_000, T0 + 120_000).expect_report("Second bid failed");
        host
    }

    #[concordium_test]
    fn test_init_empty_state() {
        let host = fresh_host();
        let state = host.state();

        claim_eq!(state.owner, OWNER);
        claim_eq!(state.ledger.supply(), 0);
        claim_eq!(state.pending_return(&ALICE), Amount::zero());
    }

    #[concordium_test]
    fn test_mint_requires_owner() {
        let mut host = fresh_host();

        let parameter_bytes = to_bytes(&MintParams {
            token_id: token_0(),
            metadata_url: String::from("ipfs://token-0"),
            duration: Duration::from_millis(AUCTION_DURATION),
        });
        let ctx = receive_ctx(ALICE, T0, &parameter_bytes);
        let mut logger = TestLogger::init();
        let result = contract_mint(&ctx, &mut host, &mut logger);

        claim_eq!(result, Err(CustomContractError::NotOwner.into()));
    }

    #[concordium_test]
    fn test_mint_creates_token_and_auction() {
        let mut host = fresh_host();

        let parameter_bytes = to_bytes(&MintParams {
            token_id: token_0(),
            metadata_url: String::from("ipfs://token-0"),
            duration: Duration::from_millis(AUCTION_DURATION),
        });
        let ctx = receive_ctx(OWNER, T0, &parameter_bytes);
        let mut logger = TestLogger::init();
        contract_mint(&ctx, &mut host, &mut logger).expect_report("Minting failed");

        let state = host.state();
        claim_eq!(state.ledger.owner_of(&token_0()), Ok(OWNER));
        claim_eq!(state.ledger.supply(), 1);
        claim_eq!(state.highest_bid(&token_0()), Ok(crate::START_PRICE));
        claim_eq!(state.highest_bidder(&token_0()), Ok(None));

        claim_eq!(logger.logs.len(), 3);
        claim!(logger.logs.contains(&to_bytes(&Cis1Event::Mint(MintEvent {
            token_id: token_0(),
            amount: 1,
            owner: Address::Account(OWNER),
        }))));
        claim!(logger
            .logs
            .contains(&to_bytes(&AuctionEvent::time_updated(
                &token_0(),
                Duration::from_millis(AUCTION_DURATION)
            ))));
    }

    #[concordium_test]
    fn test_mint_rejects_duplicate_token_id() {
        let mut host = fresh_host();
        mint_token_0(&mut host);

        let parameter_bytes = to_bytes(&MintParams {
            token_id: token_0(),
            metadata_url: String::from("ipfs://token-0-again"),
            duration: Duration::from_millis(AUCTION_DURATION),
        });
        let ctx = receive_ctx(OWNER, T0 + 1, &parameter_bytes);
        let mut logger = TestLogger::init();
        let result = contract_mint(&ctx, &mut host, &mut logger);

        claim_eq!(
            result,
            Err(CustomContractError::TokenIdAlreadyExists.into())
        );
    }

    #[concordium_test]
    fn test_first_bid_boundaries() {
        let mut host = fresh_host();
        mint_token_0(&mut host);

        // Below the start price
        claim_eq!(
            place_bid(&mut host, ALICE, 400_000, T0),
            Err(CustomContractError::NotEnoughCcd.into())
        );
        // Exactly the start price is accepted
        place_bid(&mut host, ALICE, 500_000, T0).expect_report("Boundary bid failed");

        let state = host.state();
        claim_eq!(state.highest_bidder(&token_0()), Ok(Some(ALICE)));
        claim_eq!(
            state.highest_bid(&token_0()),
            Ok(Amount::from_micro_ccd(500_000))
        );
        // The first accepted bid credits nobody
        claim_eq!(pending_return(&host, ALICE), Amount::zero());
    }

    #[concordium_test]
    fn test_owner_cannot_bid() {
        let mut host = fresh_host();
        mint_token_0(&mut host);

        claim_eq!(
            place_bid(&mut host, OWNER, 600_000, T0),
            Err(CustomContractError::ContractOwnerNotAllowedToBid.into())
        );
    }

    #[concordium_test]
    fn test_bid_on_unknown_token() {
        let mut host = fresh_host();
        mint_token_0(&mut host);

        let parameter_bytes = to_bytes(&TokenParams {
            token_id: TokenIdVec(vec![1]),
        });
        let ctx = receive_ctx(ALICE, T0, &parameter_bytes);
        let mut logger = TestLogger::init();
        let result = contract_bid(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(600_000),
            &mut logger,
        );

        claim_eq!(result, Err(CustomContractError::NotExistingTokenId.into()));
    }

    #[concordium_test]
    fn test_bid_after_deadline() {
        let mut host = fresh_host();
        mint_token_0(&mut host);

        // At the deadline the auction is already closed
        claim_eq!(
            place_bid(&mut host, ALICE, 600_000, T0 + AUCTION_DURATION),
            Err(CustomContractError::AuctionFinished.into())
        );
    }

    #[concordium_test]
    fn test_outbid_credits_pending_return() {
        let mut host = fresh_host();
        mint_token_0(&mut host);
        place_bid(&mut host, ALICE, 600_000, T0 + 60_000).expect_report("First bid failed");

        // Raising by less than the minimum increment is rejected
        claim_eq!(
            place_bid(&mut host, BOB, 605_000, T0 + 120_000),
            Err(CustomContractError::NotEnoughCcd.into())
        );

        let parameter_bytes = to_bytes(&TokenParams {
            token_id: token_0(),
        });
        let ctx = receive_ctx(BOB, T0 + 120_000, &parameter_bytes);
        let mut logger = TestLogger::init();
        contract_bid(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(610_000),
            &mut logger,
        )
        .expect_report("Outbid failed");

        let state = host.state();
        claim_eq!(state.highest_bidder(&token_0()), Ok(Some(BOB)));
        claim_eq!(
            state.highest_bid(&token_0()),
            Ok(Amount::from_micro_ccd(610_000))
        );
        claim_eq!(pending_return(&host, ALICE), Amount::from_micro_ccd(600_000));

        claim!(logger
            .logs
            .contains(&to_bytes(&AuctionEvent::pending_credited(
                &ALICE,
                Amount::from_micro_ccd(600_000)
            ))));
        claim!(logger.logs.contains(&to_bytes(&AuctionEvent::bid_placed(
            &token_0(),
            &BOB,
            Amount::from_micro_ccd(610_000)
        ))));
    }

    #[concordium_test]
    fn test_late_bid_extends_deadline() {
        let mut host = fresh_host();
        mint_token_0(&mut host);

        // 90 seconds left, inside the 120 second window
        let late_slot = T0 + AUCTION_DURATION - 90_000;
        let parameter_bytes = to_bytes(&TokenParams {
            token_id: token_0(),
        });
        let ctx = receive_ctx(ALICE, late_slot, &parameter_bytes);
        let mut logger = TestLogger::init();
        contract_bid(
            &ctx,
            &mut host,
            Amount::from_micro_ccd(600_000),
            &mut logger,
        )
        .expect_report("Late bid failed");

        // The deadline moved forward by the full window
        claim_eq!(
            remaining_time(&host, late_slot),
            Ok(Duration::from_millis(210_000))
        );
        // Still open past the original deadline
        claim_eq!(is_open(&host, T0 + AUCTION_DURATION), Ok(true));
        claim!(logger
            .logs
            .contains(&to_bytes(&AuctionEvent::time_updated(
                &token_0(),
                Duration::from_millis(210_000)
            ))));

        // A second late bid keeps the auction alive again
        let second_slot = T0 + AUCTION_DURATION + 100_000;
        place_bid(&mut host, BOB, 610_000, second_slot).expect_report("Second late bid failed");
        claim_eq!(
            remaining_time(&host, second_slot),
            Ok(Duration::from_millis(140_000))
        );
    }

    #[concordium_test]
    fn test_remaining_time_fails_once_closed() {
        let mut host = fresh_host();
        mint_token_0(&mut host);

        let after_close = T0 + AUCTION_DURATION;
        // `remainingTime` rejects while `isOpen` answers
        claim_eq!(
            remaining_time(&host, after_close),
            Err(CustomContractError::AuctionFinished.into())
        );
        claim_eq!(is_open(&host, after_close), Ok(false));

        claim_eq!(
            remaining_time(&host, T0 + 60_000),
            Ok(Duration::from_millis(AUCTION_DURATION - 60_000))
        );
    }

    #[concordium_test]
    fn test_withdraw_pays_outbid_account() {
        let mut host = host_with_outbid_alice();
        host.set_self_balance(Amount::from_micro_ccd(1_210_000));

        withdraw(&mut host, ALICE).expect_report("Withdrawal failed");

        claim!(host.transfer_occurred(&ALICE, Amount::from_micro_ccd(600_000)));
        claim_eq!(pending_return(&host, ALICE), Amount::zero());

        // A second withdrawal finds nothing owed and moves no funds
        claim_eq!(
            withdraw(&mut host, ALICE),
            Err(CustomContractError::NotEnoughCcd.into())
        );
    }

    #[concordium_test]
    fn test_withdraw_with_nothing_owed() {
        let mut host = fresh_host();
        mint_token_0(&mut host);

        claim_eq!(
            withdraw(&mut host, CAROL),
            Err(CustomContractError::NotEnoughCcd.into())
        );
    }

    #[concordium_test]
    fn test_withdraw_restores_balance_on_failed_payment() {
        let mut host = host_with_outbid_alice();

        // Nothing to pay with: the outgoing transfer fails
        host.set_self_balance(Amount::zero());
        claim_eq!(
            withdraw(&mut host, ALICE),
            Err(CustomContractError::TransferFailed.into())
        );
        // The owed amount was put back before the call was rejected
        claim_eq!(pending_return(&host, ALICE), Amount::from_micro_ccd(600_000));

        // With funds available the retry succeeds
        host.set_self_balance(Amount::from_micro_ccd(1_210_000));
        withdraw(&mut host, ALICE).expect_report("Retried withdrawal failed");
        claim!(host.transfer_occurred(&ALICE, Amount::from_micro_ccd(600_000)));
    }

    #[concordium_test]
    fn test_accept_bid_requires_owner() {
        let mut host = host_with_outbid_alice();

        claim_eq!(
            accept_bid(&mut host, ALICE, T0 + AUCTION_DURATION + 1),
            Err(CustomContractError::NotOwner.into())
        );
    }

    #[concordium_test]
    fn test_accept_bid_requires_closed_auction() {
        let mut host = host_with_outbid_alice();

        claim_eq!(
            accept_bid(&mut host, OWNER, T0 + 300_000),
            Err(CustomContractError::AuctionStillOpen.into())
        );
    }

    #[concordium_test]
    fn test_accept_bid_requires_a_bid() {
        let mut host = fresh_host();
        mint_token_0(&mut host);

        claim_eq!(
            accept_bid(&mut host, OWNER, T0 + AUCTION_DURATION + 1),
            Err(CustomContractError::NoBidReceivedForThisToken.into())
        );
    }

    #[concordium_test]
    fn test_accept_bid_pays_owner_and_authorizes_winner() {
        let mut host = host_with_outbid_alice();
        host.set_self_balance(Amount::from_micro_ccd(1_210_000));

        let settle_slot = T0 + AUCTION_DURATION + 60_000;
        let parameter_bytes = to_bytes(&TokenParams {
            token_id: token_0(),
        });
        let ctx = receive_ctx(OWNER, settle_slot, &parameter_bytes);
        let mut logger = TestLogger::init();
        contract_accept_bid(&ctx, &mut host, &mut logger).expect_report("Settlement failed");

        claim!(host.transfer_occurred(&OWNER, Amount::from_micro_ccd(610_000)));
        // The winner is authorized but ownership has not moved yet
        claim_eq!(host.state().ledger.approved(&token_0()), Ok(Some(BOB)));
        claim_eq!(host.state().ledger.owner_of(&token_0()), Ok(OWNER));
        claim!(logger.logs.contains(&to_bytes(&AuctionEvent::bid_accepted(
            &token_0(),
            &BOB,
            Amount::from_micro_ccd(610_000)
        ))));
    }

    #[concordium_test]
    fn test_transfer_rejected_while_open() {
        let mut host = host_with_outbid_alice();

        claim_eq!(
            claim_token(
                &mut host,
                OWNER,
                OWNER,
                Receiver::Account(BOB),
                T0 + 300_000
            ),
            Err(CustomContractError::AuctionStillOpen.into())
        );
    }

    #[concordium_test]
    fn test_transfer_only_to_winner() {
        let mut host = host_with_outbid_alice();
        let settle_slot = T0 + AUCTION_DURATION + 60_000;

        // Any destination other than the winning bidder is rejected
        claim_eq!(
            claim_token(
                &mut host,
                OWNER,
                OWNER,
                Receiver::Account(ALICE),
                settle_slot
            ),
            Err(CustomContractError::AddressIsNotHighestBidder.into())
        );

        // A contract destination can never be the winning bidder
        let receiver = Receiver::Contract(
            ContractAddress {
                index: 5,
                subindex: 0,
            },
            OwnedReceiveName::new_unchecked(String::from("some-contract.onReceivingCIS1")),
        );
        claim_eq!(
            claim_token(&mut host, OWNER, OWNER, receiver, settle_slot),
            Err(CustomContractError::AddressIsNotHighestBidder.into())
        );

        // Naming the winner but sending from an unauthorized account fails
        // in the token ledger
        claim_eq!(
            claim_token(&mut host, CAROL, OWNER, Receiver::Account(BOB), settle_slot),
            Err(ContractError::Unauthorized)
        );
    }

    #[concordium_test]
    fn test_winner_claims_token_after_settlement() {
        let mut host = host_with_outbid_alice();
        host.set_self_balance(Amount::from_micro_ccd(1_210_000));

        let settle_slot = T0 + AUCTION_DURATION + 60_000;
        accept_bid(&mut host, OWNER, settle_slot).expect_report("Settlement failed");

        let parameter_bytes = to_bytes(&TransferParams(vec![Transfer {
            token_id: token_0(),
            amount: 1,
            from: Address::Account(OWNER),
            to: Receiver::Account(BOB),
            data: AdditionalData::empty(),
        }]));
        let ctx = receive_ctx(BOB, settle_slot + 60_000, &parameter_bytes);
        let mut logger = TestLogger::init();
        contract_transfer(&ctx, &mut host, &mut logger).expect_report("Claim failed");

        let state = host.state();
        claim_eq!(state.ledger.owner_of(&token_0()), Ok(BOB));
        claim_eq!(state.ledger.approved(&token_0()), Ok(None));
        claim_eq!(state.ledger.balance_of(&OWNER), 0);
        claim_eq!(state.ledger.balance_of(&BOB), 1);
        claim!(logger
            .logs
            .contains(&to_bytes(&Cis1Event::Transfer(TransferEvent {
                token_id: token_0(),
                amount: 1,
                from: Address::Account(OWNER),
                to: Address::Account(BOB),
            }))));
    }

    #[concordium_test]
    fn test_transfer_amount_bounds() {
        let mut host = host_with_outbid_alice();
        host.set_self_balance(Amount::from_micro_ccd(1_210_000));
        let settle_slot = T0 + AUCTION_DURATION + 60_000;
        accept_bid(&mut host, OWNER, settle_slot).expect_report("Settlement failed");

        // Amount 0 is a no-op
        let parameter_bytes = to_bytes(&TransferParams(vec![Transfer {
            token_id: token_0(),
            amount: 0,
            from: Address::Account(OWNER),
            to: Receiver::Account(BOB),
            data: AdditionalData::empty(),
        }]));
        let ctx = receive_ctx(BOB, settle_slot, &parameter_bytes);
        let mut logger = TestLogger::init();
        contract_transfer(&ctx, &mut host, &mut logger).expect_report("Empty transfer failed");
        claim_eq!(host.state().ledger.owner_of(&token_0()), Ok(OWNER));

        // Anything over 1 cannot be covered for a non-fungible token
        let parameter_bytes = to_bytes(&TransferParams(vec![Transfer {
            token_id: token_0(),
            amount: 2,
            from: Address::Account(OWNER),
            to: Receiver::Account(BOB),
            data: AdditionalData::empty(),
        }]));
        let ctx = receive_ctx(BOB, settle_slot, &parameter_bytes);
        let mut logger = TestLogger::init();
        claim_eq!(
            contract_transfer(&ctx, &mut host, &mut logger),
            Err(ContractError::InsufficientFunds)
        );
    }

    #[concordium_test]
    fn test_approve_entrypoint_guard() {
        let mut host = host_with_outbid_alice();
        let settle_slot = T0 + AUCTION_DURATION + 60_000;

        let approve = |host: &mut TestHost<State<TestStateApi>>,
                       sender: AccountAddress,
                       to: AccountAddress,
                       slot: u64| {
            let parameter_bytes = to_bytes(&ApproveParams {
                token_id: token_0(),
                to,
            });
            let ctx = receive_ctx(sender, slot, &parameter_bytes);
            contract_approve(&ctx, host)
        };

        // While the auction is open nobody can be authorized
        claim_eq!(
            approve(&mut host, OWNER, BOB, T0 + 300_000),
            Err(CustomContractError::AuctionStillOpen.into())
        );
        // Only the winning bidder can be authorized
        claim_eq!(
            approve(&mut host, OWNER, ALICE, settle_slot),
            Err(CustomContractError::AddressIsNotHighestBidder.into())
        );
        // Only the token owner can authorize
        claim_eq!(
            approve(&mut host, CAROL, BOB, settle_slot),
            Err(CustomContractError::Unauthorized.into())
        );

        approve(&mut host, OWNER, BOB, settle_slot).expect_report("Approval failed");
        claim_eq!(host.state().ledger.approved(&token_0()), Ok(Some(BOB)));
    }

    #[concordium_test]
    fn test_update_operator_is_disabled() {
        let host = fresh_host();

        let ctx = receive_ctx(OWNER, T0, &[]);
        claim_eq!(
            contract_update_operator(&ctx, &host),
            Err(CustomContractError::FunctionDisabled.into())
        );
    }

    #[concordium_test]
    fn test_renew_requires_owner_and_closed_auction() {
        let mut host = fresh_host();
        mint_token_0(&mut host);

        claim_eq!(
            renew_auction(&mut host, ALICE, T0 + AUCTION_DURATION + 1),
            Err(CustomContractError::NotOwner.into())
        );
        claim_eq!(
            renew_auction(&mut host, OWNER, T0 + 300_000),
            Err(CustomContractError::AuctionStillOpen.into())
        );
    }

    #[concordium_test]
    fn test_renew_resets_the_clock() {
        let mut host = fresh_host();
        mint_token_0(&mut host);

        let renew_slot = T0 + AUCTION_DURATION + 500_000;
        renew_auction(&mut host, OWNER, renew_slot).expect_report("Renewal failed");

        claim_eq!(is_open(&host, renew_slot), Ok(true));
        claim_eq!(
            remaining_time(&host, renew_slot),
            Ok(Duration::from_millis(AUCTION_DURATION))
        );
        // The renewed auction accepts bids again
        place_bid(&mut host, ALICE, 500_000, renew_slot + 60_000)
            .expect_report("Bid after renewal failed");
    }

    #[concordium_test]
    fn test_renew_rejected_once_bid_was_placed() {
        let mut host = host_with_outbid_alice();
        host.set_self_balance(Amount::from_micro_ccd(1_210_000));

        // Alice collects her refund; the auction still counts as bid on
        withdraw(&mut host, ALICE).expect_report("Withdrawal failed");

        claim_eq!(
            renew_auction(&mut host, OWNER, T0 + AUCTION_DURATION + 1),
            Err(CustomContractError::BidReceivedForThisToken.into())
        );
    }

    #[concordium_test]
    fn test_guard_blocks_nested_calls() {
        let mut host = fresh_host();
        mint_token_0(&mut host);

        // Simulate an operation in progress, as a payment recipient calling
        // back into the contract would observe it
        host.state_mut()
            .guard
            .enter()
            .expect_report("Guard acquisition failed");

        claim_eq!(
            place_bid(&mut host, ALICE, 600_000, T0 + 60_000),
            Err(CustomContractError::ReentrantCall.into())
        );
        claim_eq!(
            withdraw(&mut host, ALICE),
            Err(CustomContractError::ReentrantCall.into())
        );

        host.state_mut().guard.exit();
        place_bid(&mut host, ALICE, 600_000, T0 + 60_000)
            .expect_report("Bid after release failed");
    }
}
