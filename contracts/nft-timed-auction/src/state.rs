use commons::{ContractTokenId, CustomContractError, ReentrancyGuard, TokenLedger};
use concordium_std::*;

use crate::{BID_EXTENSION_WINDOW, MIN_BID_INCREMENT, START_PRICE};

/// Per-token auction record. Created exactly once at mint, never deleted;
/// a record that went through settlement is kept for the transfer checks.
#[derive(Debug, Serialize, Clone)]
pub struct AuctionData {
    /// Highest accepted bid, or the start price before any bid.
    pub current_bid: Amount,
    /// Account holding the highest bid. `None` iff no bid was ever
    /// accepted.
    pub current_bidder: Option<AccountAddress>,
    /// Start of the bidding window. Only ever moves forward, via anti-snipe
    /// extension or renewal.
    pub start: Timestamp,
    /// Length of the bidding window.
    pub duration: Duration,
    /// Opaque token metadata reference.
    pub metadata_url: String,
}

impl AuctionData {
    fn new(start: Timestamp, duration: Duration, metadata_url: String) -> Self {
        Self {
            current_bid: START_PRICE,
            current_bidder: None,
            start,
            duration,
            metadata_url,
        }
    }

    pub fn deadline(&self) -> Timestamp {
        Timestamp::from_timestamp_millis(self.start.timestamp_millis() + self.duration.millis())
    }

    /// Whether bids are still accepted at `slot_time`. There is no explicit
    /// close step; an auction is closed purely by clock comparison.
    pub fn is_open(&self, slot_time: Timestamp) -> bool {
        slot_time < self.deadline()
    }

    /// Time left until the deadline. Unlike `is_open`, asking after the
    /// deadline is an error, not a zero.
    pub fn remaining(&self, slot_time: Timestamp) -> Result<Duration, CustomContractError> {
        ensure!(self.is_open(slot_time), CustomContractError::AuctionFinished);
        Ok(Duration::from_millis(
            self.deadline().timestamp_millis() - slot_time.timestamp_millis(),
        ))
    }
}

/// Side effects of an accepted bid that the caller must log.
#[must_use]
pub struct BidOutcome {
    /// Pending-ledger credit for the outbid account, if there was one.
    pub credited: Option<(AccountAddress, Amount)>,
    /// New remaining time, present when the anti-snipe extension fired.
    pub extended: Option<Duration>,
}

/// The contract state.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Account that created the instance. Mints tokens and collects
    /// accepted bids.
    pub owner: AccountAddress,
    /// Mutual-exclusion flag for the state-mutating entrypoints.
    pub guard: ReentrancyGuard,
    /// Token-ownership ledger.
    pub ledger: TokenLedger<S>,
    /// Auction record per token.
    pub auctions: StateMap<ContractTokenId, AuctionData, S>,
    /// CCD owed to outbid accounts, withdrawn on their own initiative.
    pub pending_returns: StateMap<AccountAddress, Amount, S>,
}

impl<S: HasStateApi> State<S> {
    /// Create a new state with no tokens.
    pub fn new(state_builder: &mut StateBuilder<S>, owner: AccountAddress) -> Self {
        State {
            owner,
            guard: ReentrancyGuard::new(),
            ledger: TokenLedger::new(state_builder),
            auctions: state_builder.new_map(),
            pending_returns: state_builder.new_map(),
        }
    }

    /// Mint a token to the contract owner and open its auction.
    pub fn mint(
        &mut self,
        token_id: ContractTokenId,
        metadata_url: String,
        duration: Duration,
        slot_time: Timestamp,
    ) -> Result<(), CustomContractError> {
        self.ledger.mint(token_id.clone(), self.owner)?;
        self.auctions
            .insert(token_id, AuctionData::new(slot_time, duration, metadata_url));
        Ok(())
    }

    /// Validate and accept a bid, crediting the outbid account's pending
    /// balance. Returns the side effects for the caller to log.
    pub fn bid(
        &mut self,
        token_id: &ContractTokenId,
        bidder: AccountAddress,
        amount: Amount,
        slot_time: Timestamp,
    ) -> Result<BidOutcome, CustomContractError> {
        ensure!(
            bidder != self.owner,
            CustomContractError::ContractOwnerNotAllowedToBid
        );

        let (credited, extended) = {
            let mut record_ref = self
                .auctions
                .get_mut(token_id)
                .ok_or(CustomContractError::NotExistingTokenId)?;
            let record = record_ref.get_mut();

            ensure!(
                record.is_open(slot_time),
                CustomContractError::AuctionFinished
            );

            // Late bids keep the auction alive: push the deadline forward by
            // the full window.
            let mut extended = None;
            if record.remaining(slot_time)? < BID_EXTENSION_WINDOW {
                record.start = Timestamp::from_timestamp_millis(
                    record.start.timestamp_millis() + BID_EXTENSION_WINDOW.millis(),
                );
                extended = Some(record.remaining(slot_time)?);
            }

            match record.current_bidder {
                None => ensure!(amount >= START_PRICE, CustomContractError::NotEnoughCcd),
                Some(_) => ensure!(
                    amount >= record.current_bid + MIN_BID_INCREMENT,
                    CustomContractError::NotEnoughCcd
                ),
            }

            // Update the highest bid after all checks. The outbid account is
            // credited, never paid synchronously.
            let credited = record
                .current_bidder
                .replace(bidder)
                .map(|previous| (previous, record.current_bid));
            record.current_bid = amount;
            (credited, extended)
        };

        if let Some((account, refund)) = credited {
            self.credit_pending(account, refund);
        }

        Ok(BidOutcome { credited, extended })
    }

    /// Add to an account's pending balance. Also used to put the owed
    /// amount back when an outgoing payment fails.
    pub fn credit_pending(&mut self, account: AccountAddress, amount: Amount) {
        let owed = self.pending_return(&account);
        self.pending_returns.insert(account, owed + amount);
    }

    /// Zero the caller's pending balance and return what was owed. Fails
    /// when nothing is owed. Must happen before the outgoing payment is
    /// attempted.
    pub fn take_pending(
        &mut self,
        account: AccountAddress,
    ) -> Result<Amount, CustomContractError> {
        let owed = self.pending_return(&account);
        ensure!(owed > Amount::zero(), CustomContractError::NotEnoughCcd);
        self.pending_returns.insert(account, Amount::zero());
        Ok(owed)
    }

    pub fn pending_return(&self, account: &AccountAddress) -> Amount {
        self.pending_returns
            .get(account)
            .map(|owed| *owed)
            .unwrap_or_else(Amount::zero)
    }

    /// Settlement checks: the auction must be closed and have received a
    /// bid. Returns the winner and the price to pay out.
    pub fn accept_bid(
        &self,
        token_id: &ContractTokenId,
        slot_time: Timestamp,
    ) -> Result<(AccountAddress, Amount), CustomContractError> {
        let record = self
            .auctions
            .get(token_id)
            .ok_or(CustomContractError::NotExistingTokenId)?;
        ensure!(
            !record.is_open(slot_time),
            CustomContractError::AuctionStillOpen
        );
        let winner = record
            .current_bidder
            .ok_or(CustomContractError::NoBidReceivedForThisToken)?;
        Ok((winner, record.current_bid))
    }

    /// Reopen an expired auction that never received a bid. An auction with
    /// a bid has to go through acceptance instead.
    pub fn renew(
        &mut self,
        token_id: &ContractTokenId,
        slot_time: Timestamp,
    ) -> Result<Duration, CustomContractError> {
        let mut record_ref = self
            .auctions
            .get_mut(token_id)
            .ok_or(CustomContractError::NotExistingTokenId)?;
        let record = record_ref.get_mut();
        ensure!(
            !record.is_open(slot_time),
            CustomContractError::AuctionStillOpen
        );
        ensure!(
            record.current_bidder.is_none(),
            CustomContractError::BidReceivedForThisToken
        );
        record.start = slot_time;
        Ok(record.duration)
    }

    /// The transfer guard: ownership may only move to the winning bidder,
    /// and only after the auction has closed.
    pub fn ensure_claimable(
        &self,
        token_id: &ContractTokenId,
        to: &AccountAddress,
        slot_time: Timestamp,
    ) -> Result<(), CustomContractError> {
        let record = self
            .auctions
            .get(token_id)
            .ok_or(CustomContractError::NotExistingTokenId)?;
        ensure!(
            !record.is_open(slot_time),
            CustomContractError::AuctionStillOpen
        );
        ensure!(
            record.current_bidder == Some(*to),
            CustomContractError::AddressIsNotHighestBidder
        );
        Ok(())
    }

    pub fn is_open(
        &self,
        token_id: &ContractTokenId,
        slot_time: Timestamp,
    ) -> Result<bool, CustomContractError> {
        let record = self
            .auctions
            .get(token_id)
            .ok_or(CustomContractError::NotExistingTokenId)?;
        Ok(record.is_open(slot_time))
    }

    pub fn remaining_time(
        &self,
        token_id: &ContractTokenId,
        slot_time: Timestamp,
    ) -> Result<Duration, CustomContractError> {
        let record = self
            .auctions
            .get(token_id)
            .ok_or(CustomContractError::NotExistingTokenId)?;
        record.remaining(slot_time)
    }

    pub fn highest_bid(
        &self,
        token_id: &ContractTokenId,
    ) -> Result<Amount, CustomContractError> {
        self.auctions
            .get(token_id)
            .map(|record| record.current_bid)
            .ok_or(CustomContractError::NotExistingTokenId)
    }

    pub fn highest_bidder(
        &self,
        token_id: &ContractTokenId,
    ) -> Result<Option<AccountAddress>, CustomContractError> {
        self.auctions
            .get(token_id)
            .map(|record| record.current_bidder)
            .ok_or(CustomContractError::NotExistingTokenId)
    }
}
