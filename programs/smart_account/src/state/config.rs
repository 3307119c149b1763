use anchor_lang::prelude::*;

#[account]
#[derive(Default, InitSpace)]
pub struct Config {
    pub authority: Pubkey,
    /// Relayer injected into every account created from now on
    pub trusted_relayer: Pubkey,
    /// Chain identifier bound into typed-data signatures
    pub chain_id: u64,
    pub is_paused: bool,
}

impl Config {
    pub const PREFIX_SEED: &'static [u8] = b"config";
}

#[derive(Debug, AnchorSerialize, AnchorDeserialize)]
pub enum UpdateConfigType {
    TrustedRelayer = 0,
    ChainId = 1,
    Authority = 2,
    Pause = 3,
    Unpause = 4,
}
