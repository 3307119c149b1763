use anchor_lang::prelude::*;
use anchor_lang::solana_program::keccak;
use anchor_lang::solana_program::secp256k1_recover::secp256k1_recover;

use crate::constants::{SignerAddress, DOMAIN_NAME, DOMAIN_VERSION};
use crate::error::SmartAccountError;

pub const SIGNATURE_LENGTH: usize = 65;

const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

const DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,bytes32 verifyingContract)";

const REQUEST_TYPE: &[u8] = b"AccountRequest(bytes32 requestHash)";

/// secp256k1 order / 2. Signatures with a larger `s` are malleable duplicates.
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b, 0x20, 0xa0,
];

/// Hash encodings a signer may have used over a request hash
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignatureMode {
    StructuredDomain,
    PersonalMessage,
    Raw,
}

impl SignatureMode {
    /// Order in which the authorization gate tries the encodings.
    /// The domain-bound encoding goes first.
    pub const RESOLUTION_ORDER: [SignatureMode; 3] = [
        SignatureMode::StructuredDomain,
        SignatureMode::PersonalMessage,
        SignatureMode::Raw,
    ];
}

/// Typed-data domain of a single smart account
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Domain {
    pub chain_id: u64,
    pub verifying_contract: Pubkey,
}

impl Domain {
    pub fn new(chain_id: u64, verifying_contract: Pubkey) -> Self {
        Self {
            chain_id,
            verifying_contract,
        }
    }

    pub fn separator(&self) -> [u8; 32] {
        let mut chain_id = [0u8; 32];
        chain_id[24..].copy_from_slice(&self.chain_id.to_be_bytes());

        keccak::hashv(&[
            &keccak::hash(DOMAIN_TYPE).to_bytes(),
            &keccak::hash(DOMAIN_NAME).to_bytes(),
            &keccak::hash(DOMAIN_VERSION).to_bytes(),
            &chain_id,
            self.verifying_contract.as_ref(),
        ])
        .to_bytes()
    }

    /// `keccak256("\x19\x01" || separator || keccak256(typeHash || h))`
    pub fn typed_data_hash(&self, hash: &[u8; 32]) -> [u8; 32] {
        let struct_hash =
            keccak::hashv(&[&keccak::hash(REQUEST_TYPE).to_bytes(), hash]).to_bytes();
        keccak::hashv(&[b"\x19\x01", &self.separator(), &struct_hash]).to_bytes()
    }
}

pub fn personal_message_hash(hash: &[u8; 32]) -> [u8; 32] {
    keccak::hashv(&[PERSONAL_MESSAGE_PREFIX, hash]).to_bytes()
}

/// A 65-byte `r || s || v` signature that passed format checks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    rs: [u8; 64],
    recovery_id: u8,
}

impl RecoverableSignature {
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        require!(
            bytes.len() == SIGNATURE_LENGTH,
            SmartAccountError::InvalidSignature
        );

        let recovery_id = match bytes[64] {
            27 | 28 => bytes[64] - 27,
            0 | 1 => bytes[64],
            _ => return err!(SmartAccountError::InvalidSignature),
        };

        require!(
            bytes[32..64] <= SECP256K1_HALF_ORDER[..],
            SmartAccountError::InvalidSignature
        );

        let mut rs = [0u8; 64];
        rs.copy_from_slice(&bytes[..64]);
        Ok(Self { rs, recovery_id })
    }

    pub fn recover(&self, digest: &[u8; 32]) -> Result<SignerAddress> {
        let pubkey = secp256k1_recover(digest, self.recovery_id, &self.rs)
            .map_err(|_| error!(SmartAccountError::InvalidSignature))?;
        Ok(address_from_pubkey(&pubkey.to_bytes()))
    }
}

/// Derives the signer address from a 64-byte uncompressed public key (no 0x04 prefix).
pub fn address_from_pubkey(pubkey: &[u8; 64]) -> SignerAddress {
    let hash = keccak::hash(pubkey).to_bytes();
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

/// Digest a signer actually signed under `mode`
pub fn digest_for(mode: SignatureMode, domain: &Domain, hash: &[u8; 32]) -> [u8; 32] {
    match mode {
        SignatureMode::StructuredDomain => domain.typed_data_hash(hash),
        SignatureMode::PersonalMessage => personal_message_hash(hash),
        SignatureMode::Raw => *hash,
    }
}

pub fn resolve_signer(
    mode: SignatureMode,
    domain: &Domain,
    hash: &[u8; 32],
    signature: &RecoverableSignature,
) -> Result<SignerAddress> {
    signature.recover(&digest_for(mode, domain, hash))
}
