use anchor_lang::prelude::*;

use crate::constants::{SignerAddress, MASTER_KEY_LIMIT, ZERO_ADDRESS};
use crate::error::SmartAccountError;
use crate::security::MAX_WHITELIST_SIZE;

/// Policy of one session key registered on a smart account.
///
/// A `valid_until` of zero marks a revoked (or never registered) key. A
/// `limit` of [`MASTER_KEY_LIMIT`] marks a master key: unlimited calls, no
/// whitelist, and authority to register or revoke other session keys.
#[account]
#[derive(Default, Debug, InitSpace)]
pub struct SessionKey {
    pub smart_account: Pubkey,
    pub key: [u8; 20],
    /// Inclusive lower bound, unix seconds
    pub valid_after: i64,
    /// Inclusive upper bound, unix seconds
    pub valid_until: i64,
    /// Remaining authorized calls
    pub limit: u64,
    #[max_len(10)]
    pub whitelist: Vec<Pubkey>,
    /// When set, every target must be in `whitelist` (an empty list allows nothing)
    pub is_whitelisted: bool,
    pub is_master_key: bool,
    pub bump: u8,
}

/// Registration parameters of a session key
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SessionKeyParams {
    pub key: [u8; 20],
    pub valid_after: i64,
    pub valid_until: i64,
    /// `None` registers a master key
    pub limit: Option<u64>,
    /// `None` leaves targets unrestricted, `Some(list)` enforces the list
    pub whitelist: Option<Vec<Pubkey>>,
}

impl SessionKeyParams {
    pub fn validate(&self) -> Result<()> {
        require!(self.key != ZERO_ADDRESS, SmartAccountError::ZeroAddressNotAllowed);
        require!(
            self.valid_after <= self.valid_until,
            SmartAccountError::InvalidWindow
        );
        require!(
            self.whitelist
                .as_ref()
                .map_or(true, |list| list.len() <= MAX_WHITELIST_SIZE),
            SmartAccountError::WhitelistTooLarge
        );
        Ok(())
    }
}

impl SessionKey {
    pub const PREFIX_SEED: &'static [u8] = b"session_key";

    /// Writes a fresh policy, replacing whatever was stored before.
    pub fn configure(
        &mut self,
        smart_account: Pubkey,
        params: SessionKeyParams,
        bump: u8,
    ) -> Result<()> {
        params.validate()?;

        let limit = params.limit.unwrap_or(MASTER_KEY_LIMIT);
        *self = SessionKey {
            smart_account,
            key: params.key,
            valid_after: params.valid_after,
            valid_until: params.valid_until,
            limit,
            is_whitelisted: params.whitelist.is_some(),
            whitelist: params.whitelist.unwrap_or_default(),
            is_master_key: limit == MASTER_KEY_LIMIT,
            bump,
        };
        Ok(())
    }

    /// Zeroes the policy; the key then reads as never registered.
    pub fn revoke(&mut self) {
        *self = SessionKey {
            smart_account: self.smart_account,
            bump: self.bump,
            ..SessionKey::default()
        };
    }

    pub fn is_registered(&self) -> bool {
        self.key != ZERO_ADDRESS && self.valid_until != 0
    }

    pub fn is_within_window(&self, now: i64) -> bool {
        self.valid_after <= now && now <= self.valid_until
    }

    pub fn is_active(&self, now: i64) -> bool {
        self.is_registered()
            && self.is_within_window(now)
            && (self.is_master_key || self.limit > 0)
    }

    pub fn is_active_master(&self, key: &SignerAddress, now: i64) -> bool {
        self.key == *key && self.is_master_key && self.is_active(now)
    }

    /// `None` for master keys
    pub fn remaining_uses(&self) -> Option<u64> {
        if self.is_master_key {
            None
        } else {
            Some(self.limit)
        }
    }

    pub fn is_target_allowed(&self, target: &Pubkey) -> bool {
        !self.is_whitelisted || self.whitelist.contains(target)
    }

    /// Checks the window, budget and whitelist for one request touching
    /// `targets`, then spends one call. Nothing changes on failure.
    pub fn check_and_consume(&mut self, now: i64, targets: &[Pubkey]) -> Result<()> {
        require!(self.is_registered(), SmartAccountError::UnknownSigner);
        require!(now >= self.valid_after, SmartAccountError::NotYetValid);
        require!(now <= self.valid_until, SmartAccountError::Expired);

        if self.is_master_key {
            return Ok(());
        }

        require!(self.limit > 0, SmartAccountError::LimitReached);
        require!(
            targets.iter().all(|target| self.is_target_allowed(target)),
            SmartAccountError::TargetNotWhitelisted
        );

        self.limit -= 1;
        Ok(())
    }
}
