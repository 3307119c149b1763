use anchor_lang::prelude::*;

use crate::authorization::Authorization;
use crate::error::SmartAccountError;
use crate::state::Payload;

/// Which principal authorized a request
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum Authority {
    Owner,
    SessionKey,
}

/// Validation record for a relayed request.
/// Written by `validate_request` after the signer passed the authorization gate
/// and consumed (closed) by `execute` / `execute_batch` before any sub-call runs.
#[account]
#[derive(InitSpace, Debug)]
pub struct AuthorizedRequest {
    /// Smart account the request targets
    pub smart_account: Pubkey,
    /// Account nonce the request was signed over
    pub nonce: u64,
    /// keccak256 of the borsh-encoded payload
    pub payload_hash: [u8; 32],
    /// Recovered signer
    pub signer: [u8; 20],
    pub authority: Authority,
    /// Last second the request may execute; 0 means no bound
    pub valid_until: i64,
    /// Where to refund rent when the record is consumed
    pub rent_refund_to: Pubkey,
}

impl AuthorizedRequest {
    pub const PREFIX_SEED: &'static [u8] = b"authorized_request";

    pub fn new(
        smart_account: Pubkey,
        nonce: u64,
        payload: &Payload,
        authorization: &Authorization,
        rent_refund_to: Pubkey,
    ) -> Result<Self> {
        let validation_data = authorization.validation_data();
        Ok(Self {
            smart_account,
            nonce,
            payload_hash: payload.hash()?,
            signer: authorization.signer(),
            authority: validation_data.authority,
            valid_until: validation_data.valid_until,
            rent_refund_to,
        })
    }

    pub fn is_expired(&self, now: i64) -> bool {
        self.valid_until != 0 && now > self.valid_until
    }

    /// `payload` must be the one that was authorized, still within its window.
    pub fn check(&self, payload: &Payload, now: i64) -> Result<()> {
        require!(
            self.payload_hash == payload.hash()?,
            SmartAccountError::PayloadMismatch
        );
        require!(!self.is_expired(now), SmartAccountError::Expired);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Batch, Call};
    use crate::test_utils::{account_key, assert_error};

    const SIGNER: [u8; 20] = [0x5e; 20];

    fn payload(value: u64) -> Payload {
        Payload::Single(Call {
            target: Pubkey::new_from_array([3; 32]),
            value,
            data: vec![],
            account_count: 1,
        })
    }

    fn session_record(valid_until: i64) -> AuthorizedRequest {
        let authorization = Authorization::SessionKey {
            signer: SIGNER,
            valid_after: 0,
            valid_until,
        };
        AuthorizedRequest::new(account_key(), 4, &payload(10), &authorization, Pubkey::new_unique())
            .unwrap()
    }

    #[test]
    fn record_carries_the_authorization() {
        let record = session_record(500);
        assert_eq!(record.smart_account, account_key());
        assert_eq!(record.nonce, 4);
        assert_eq!(record.signer, SIGNER);
        assert_eq!(record.authority, Authority::SessionKey);
        assert_eq!(record.valid_until, 500);
        assert_eq!(record.payload_hash, payload(10).hash().unwrap());

        let owner = Authorization::Owner { signer: SIGNER };
        let record =
            AuthorizedRequest::new(account_key(), 0, &payload(1), &owner, Pubkey::new_unique()).unwrap();
        assert_eq!(record.authority, Authority::Owner);
        assert_eq!(record.valid_until, 0);
        record.check(&payload(1), i64::MAX).unwrap();
    }

    #[test]
    fn only_the_authorized_payload_runs() {
        let record = session_record(500);
        record.check(&payload(10), 100).unwrap();
        assert_error(record.check(&payload(11), 100), SmartAccountError::PayloadMismatch);

        let as_batch = Payload::Batch(Batch {
            targets: vec![Pubkey::new_from_array([3; 32])],
            values: vec![10],
            data: vec![vec![]],
            account_counts: vec![1],
        });
        assert_error(record.check(&as_batch, 100), SmartAccountError::PayloadMismatch);
    }

    #[test]
    fn session_record_expires_with_the_key() {
        let record = session_record(500);
        record.check(&payload(10), 500).unwrap();
        assert_error(record.check(&payload(10), 501), SmartAccountError::Expired);
    }
}
