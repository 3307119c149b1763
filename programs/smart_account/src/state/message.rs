use anchor_lang::prelude::*;
use anchor_lang::solana_program::keccak;

use crate::constants::{ADMIN_HASH_TAG, REQUEST_HASH_TAG};
use crate::error::SmartAccountError;
use crate::security::MAX_BATCH_SIZE;
use crate::state::SessionKeyParams;

/// One sub-call made by the smart account.
///
/// Its accounts are the next `account_count` entries of `remaining_accounts`;
/// the first of them must be `target`.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Call {
    /// Program to invoke, or lamport recipient when `data` is empty
    pub target: Pubkey,
    /// Lamports sent along with the call
    pub value: u64,
    pub data: Vec<u8>,
    pub account_count: u8,
}

/// Batched sub-calls as parallel arrays
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Batch {
    pub targets: Vec<Pubkey>,
    pub values: Vec<u64>,
    pub data: Vec<Vec<u8>>,
    pub account_counts: Vec<u8>,
}

impl Batch {
    pub fn calls(&self) -> Result<Vec<Call>> {
        let len = self.targets.len();
        require!(
            self.values.len() == len && self.data.len() == len && self.account_counts.len() == len,
            SmartAccountError::LengthMismatch
        );
        require!(len > 0, SmartAccountError::EmptyBatch);
        require!(len <= MAX_BATCH_SIZE, SmartAccountError::BatchTooLarge);

        Ok(self
            .targets
            .iter()
            .zip(&self.values)
            .zip(&self.data)
            .zip(&self.account_counts)
            .map(|(((target, value), data), account_count)| Call {
                target: *target,
                value: *value,
                data: data.clone(),
                account_count: *account_count,
            })
            .collect())
    }
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    Single(Call),
    Batch(Batch),
}

impl Payload {
    pub fn calls(&self) -> Result<Vec<Call>> {
        match self {
            Payload::Single(call) => Ok(vec![call.clone()]),
            Payload::Batch(batch) => batch.calls(),
        }
    }

    /// Every target the payload touches, in call order
    pub fn targets(&self) -> Vec<Pubkey> {
        match self {
            Payload::Single(call) => vec![call.target],
            Payload::Batch(batch) => batch.targets.clone(),
        }
    }

    pub fn hash(&self) -> Result<[u8; 32]> {
        Ok(keccak::hash(&encode(self)?).to_bytes())
    }
}

/// Content hash a relayed or direct execution request is signed over
pub fn request_hash(account: &Pubkey, nonce: u64, payload: &Payload) -> Result<[u8; 32]> {
    Ok(keccak::hashv(&[
        REQUEST_HASH_TAG,
        account.as_ref(),
        &nonce.to_le_bytes(),
        &payload.hash()?,
    ])
    .to_bytes())
}

/// Administrative operation authorized by a signed message
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum AdminAction {
    RegisterSessionKey(SessionKeyParams),
    RevokeSessionKey { key: [u8; 20] },
    ProposeTransfer { new_owner: [u8; 20] },
    AcceptOwnership,
    UpdateTrustedRelayer { new_relayer: Pubkey },
}

impl AdminAction {
    /// Content hash the caller signs for this action
    pub fn hash(&self, account: &Pubkey, nonce: u64) -> Result<[u8; 32]> {
        Ok(keccak::hashv(&[
            ADMIN_HASH_TAG,
            account.as_ref(),
            &nonce.to_le_bytes(),
            &encode(self)?,
        ])
        .to_bytes())
    }
}

fn encode<T: AnchorSerialize>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    value
        .serialize(&mut buf)
        .map_err(|_| error!(anchor_lang::error::ErrorCode::InstructionDidNotSerialize))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{account_key, assert_error};

    fn call(target: Pubkey) -> Call {
        Call {
            target,
            value: 0,
            data: vec![1, 2, 3],
            account_count: 2,
        }
    }

    fn batch(len: usize) -> Batch {
        Batch {
            targets: (0..len).map(|_| Pubkey::new_unique()).collect(),
            values: vec![0; len],
            data: vec![vec![9]; len],
            account_counts: vec![1; len],
        }
    }

    #[test]
    fn batch_arity_must_match() {
        let mut b = batch(3);
        b.values.pop();
        assert_error(b.calls(), SmartAccountError::LengthMismatch);

        let mut b = batch(3);
        b.data.push(vec![]);
        assert_error(b.calls(), SmartAccountError::LengthMismatch);

        let mut b = batch(3);
        b.account_counts.clear();
        assert_error(b.calls(), SmartAccountError::LengthMismatch);
    }

    #[test]
    fn batch_size_is_bounded() {
        assert_error(batch(0).calls(), SmartAccountError::EmptyBatch);
        assert_eq!(batch(MAX_BATCH_SIZE).calls().unwrap().len(), MAX_BATCH_SIZE);
        assert_error(
            batch(MAX_BATCH_SIZE + 1).calls(),
            SmartAccountError::BatchTooLarge,
        );
    }

    #[test]
    fn batch_calls_keep_order() {
        let b = batch(4);
        let calls = b.calls().unwrap();
        let targets: Vec<Pubkey> = calls.iter().map(|c| c.target).collect();
        assert_eq!(targets, b.targets);
        assert_eq!(Payload::Batch(b.clone()).targets(), b.targets);
    }

    #[test]
    fn request_hash_binds_account_nonce_and_payload() {
        let payload = Payload::Single(call(Pubkey::new_unique()));
        let base = request_hash(&account_key(), 0, &payload).unwrap();

        assert_eq!(base, request_hash(&account_key(), 0, &payload).unwrap());
        assert_ne!(base, request_hash(&account_key(), 1, &payload).unwrap());
        assert_ne!(
            base,
            request_hash(&Pubkey::new_unique(), 0, &payload).unwrap()
        );

        let mut other = payload.clone();
        if let Payload::Single(c) = &mut other {
            c.value = 1;
        }
        assert_ne!(base, request_hash(&account_key(), 0, &other).unwrap());
    }

    #[test]
    fn admin_and_request_hashes_do_not_collide() {
        let action = AdminAction::AcceptOwnership;
        let payload = Payload::Batch(Batch::default());
        assert_ne!(
            action.hash(&account_key(), 0).unwrap(),
            request_hash(&account_key(), 0, &payload).unwrap()
        );
    }
}
