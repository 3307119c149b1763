pub const SMART_ACCOUNT_SEED: &[u8] = b"smart_account";

/// 20-byte secp256k1 signer address (`keccak256(pubkey)[12..]`)
pub type SignerAddress = [u8; 20];

pub const ZERO_ADDRESS: SignerAddress = [0u8; 20];

/// `limit` value marking a master session key
pub const MASTER_KEY_LIMIT: u64 = u64::MAX;

/// Returned by `is_valid_signature` when the signature is accepted
pub const VALID_SIGNATURE_MAGIC: [u8; 4] = [0x16, 0x26, 0xba, 0x7e];
pub const INVALID_SIGNATURE_MAGIC: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

pub const DOMAIN_NAME: &[u8] = b"SmartAccount";
pub const DOMAIN_VERSION: &[u8] = b"1";

pub const REQUEST_HASH_TAG: &[u8] = b"smart_account:request";
pub const ADMIN_HASH_TAG: &[u8] = b"smart_account:admin";
