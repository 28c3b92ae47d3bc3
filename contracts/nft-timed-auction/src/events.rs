use commons::{
    ContractTokenId, BID_ACCEPTED_TAG, BID_PLACED_TAG, PENDING_CREDITED_TAG,
    PENDING_WITHDRAWAL_TAG, TIME_UPDATED_TAG, WITHDRAW_COMPLETED_TAG,
};
use concordium_std::*;

/// Deadline change event data. Logged on mint, anti-snipe extension and
/// renewal.
#[derive(Debug, Serial)]
pub struct TimeUpdatedEvent<'a> {
    /// Token identifier.
    pub token_id: &'a ContractTokenId,
    /// Time left until the new deadline.
    pub remaining: Duration,
}

/// Accepted bid event data.
#[derive(Debug, Serial)]
pub struct BidPlacedEvent<'a> {
    /// Token identifier.
    pub token_id: &'a ContractTokenId,
    /// Bidder account address.
    pub bidder: &'a AccountAddress,
    /// Bid amount.
    pub amount: Amount,
}

/// Outbid refund credit event data.
#[derive(Debug, Serial)]
pub struct PendingCreditedEvent<'a> {
    /// Outbid account address.
    pub account: &'a AccountAddress,
    /// Amount added to the account's pending balance.
    pub amount: Amount,
}

/// Settlement event data.
#[derive(Debug, Serial)]
pub struct BidAcceptedEvent<'a> {
    /// Token identifier.
    pub token_id: &'a ContractTokenId,
    /// Account authorized to claim the token.
    pub winner: &'a AccountAddress,
    /// Winning bid paid out to the contract owner.
    pub price: Amount,
}

/// Withdrawal intent event data. Logged when a pending balance is zeroed,
/// before the outgoing payment is attempted.
#[derive(Debug, Serial)]
pub struct PendingWithdrawalEvent<'a> {
    /// Withdrawing account address.
    pub account: &'a AccountAddress,
    /// Amount owed.
    pub amount: Amount,
}

/// Withdrawal completion event data.
#[derive(Debug, Serial)]
pub struct WithdrawCompletedEvent<'a> {
    /// Withdrawing account address.
    pub account: &'a AccountAddress,
    /// Amount paid out.
    pub amount: Amount,
}

/// Tagged custom event to be serialized for the event log.
#[derive(Debug)]
pub enum AuctionEvent<'a> {
    TimeUpdated(TimeUpdatedEvent<'a>),
    BidPlaced(BidPlacedEvent<'a>),
    PendingCredited(PendingCreditedEvent<'a>),
    BidAccepted(BidAcceptedEvent<'a>),
    PendingWithdrawal(PendingWithdrawalEvent<'a>),
    WithdrawCompleted(WithdrawCompletedEvent<'a>),
}

impl<'a> AuctionEvent<'a> {
    pub fn time_updated(token_id: &'a ContractTokenId, remaining: Duration) -> Self {
        Self::TimeUpdated(TimeUpdatedEvent {
            token_id,
            remaining,
        })
    }

    pub fn bid_placed(
        token_id: &'a ContractTokenId,
        bidder: &'a AccountAddress,
        amount: Amount,
    ) -> Self {
        Self::BidPlaced(BidPlacedEvent {
            token_id,
            bidder,
            amount,
        })
    }

    pub fn pending_credited(account: &'a AccountAddress, amount: Amount) -> Self {
        Self::PendingCredited(PendingCreditedEvent { account, amount })
    }

    pub fn bid_accepted(
        token_id: &'a ContractTokenId,
        winner: &'a AccountAddress,
        price: Amount,
    ) -> Self {
        Self::BidAccepted(BidAcceptedEvent {
            token_id,
            winner,
            price,
        })
    }

    pub fn pending_withdrawal(account: &'a AccountAddress, amount: Amount) -> Self {
        Self::PendingWithdrawal(PendingWithdrawalEvent { account, amount })
    }

    pub fn withdraw_completed(account: &'a AccountAddress, amount: Amount) -> Self {
        Self::WithdrawCompleted(WithdrawCompletedEvent { account, amount })
    }
}

impl<'a> Serial for AuctionEvent<'a> {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            AuctionEvent::TimeUpdated(event) => {
                out.write_u8(TIME_UPDATED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::BidPlaced(event) => {
                out.write_u8(BID_PLACED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::PendingCredited(event) => {
                out.write_u8(PENDING_CREDITED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::BidAccepted(event) => {
                out.write_u8(BID_ACCEPTED_TAG)?;
                event.serial(out)
            }
            AuctionEvent::PendingWithdrawal(event) => {
                out.write_u8(PENDING_WITHDRAWAL_TAG)?;
                event.serial(out)
            }
            AuctionEvent::WithdrawCompleted(event) => {
                out.write_u8(WITHDRAW_COMPLETED_TAG)?;
                event.serial(out)
            }
        }
    }
}
