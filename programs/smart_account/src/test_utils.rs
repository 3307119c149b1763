use anchor_lang::prelude::*;
use anchor_lang::solana_program::keccak;
use k256::ecdsa::SigningKey;

use crate::constants::SignerAddress;
use crate::error::SmartAccountError;
use crate::signature::{digest_for, Domain, SignatureMode};
use crate::state::{SessionKey, SessionKeyParams, SmartAccount};

/// secp256k1 key used to sign test messages
pub struct TestSigner {
    key: SigningKey,
}

impl TestSigner {
    pub fn new(seed: u8) -> Self {
        let mut secret = [0u8; 32];
        secret[31] = seed;
        secret[0] = 0x11;
        Self {
            key: SigningKey::from_slice(&secret).unwrap(),
        }
    }

    pub fn address(&self) -> SignerAddress {
        let encoded = self.key.verifying_key().to_encoded_point(false);
        let hash = keccak::hash(&encoded.as_bytes()[1..]).to_bytes();
        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);
        address
    }

    /// 65-byte `r || s || v` signature with `v` in {27, 28}
    pub fn sign(&self, mode: SignatureMode, domain: &Domain, hash: &[u8; 32]) -> Vec<u8> {
        let digest = digest_for(mode, domain, hash);
        let (signature, recovery_id) = self.key.sign_prehash_recoverable(&digest).unwrap();
        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte() + 27);
        bytes
    }
}

pub fn account_key() -> Pubkey {
    Pubkey::new_from_array([42u8; 32])
}

pub fn test_account(owner: SignerAddress) -> SmartAccount {
    SmartAccount {
        owner,
        pending_owner: [0u8; 20],
        trusted_relayer: Pubkey::new_from_array([7u8; 32]),
        admin: owner,
        salt: 1,
        chain_id: 1,
        nonce: 0,
        bump: 255,
    }
}

pub fn registered_key(
    key: SignerAddress,
    valid_after: i64,
    valid_until: i64,
    limit: Option<u64>,
    whitelist: Option<Vec<Pubkey>>,
) -> SessionKey {
    let mut session_key = SessionKey::default();
    session_key
        .configure(
            account_key(),
            SessionKeyParams {
                key,
                valid_after,
                valid_until,
                limit,
                whitelist,
            },
            254,
        )
        .unwrap();
    session_key
}

pub fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: SmartAccountError) {
    assert_eq!(result.unwrap_err(), anchor_lang::error::Error::from(expected));
}
