/// Tag for the custom TimeUpdated event.
pub const TIME_UPDATED_TAG: u8 = u8::MAX - 8;

/// Tag for the custom BidPlaced event.
pub const BID_PLACED_TAG: u8 = u8::MAX - 9;

/// Tag for the custom PendingCredited event.
pub const PENDING_CREDITED_TAG: u8 = u8::MAX - 10;

/// Tag for the custom BidAccepted event.
pub const BID_ACCEPTED_TAG: u8 = u8::MAX - 11;

/// Tag for the custom PendingWithdrawal event.
pub const PENDING_WITHDRAWAL_TAG: u8 = u8::MAX - 12;

/// Tag for the custom WithdrawCompleted event.
pub const WITHDRAW_COMPLETED_TAG: u8 = u8::MAX - 13;
