mod accept_ownership;
mod propose_transfer;
mod update_trusted_relayer;

pub use accept_ownership::*;
pub use propose_transfer::*;
pub use update_trusted_relayer::*;

use anchor_lang::prelude::*;

use crate::{
    authorization::resolve_caller,
    constants::{SignerAddress, SMART_ACCOUNT_SEED},
    state::{AdminAction, SmartAccount},
};

/// Accounts shared by the owner-level administrative messages. Any fee payer
/// may submit them; authority comes from the signed message.
#[derive(Accounts)]
pub struct ManageOwnership<'info> {
    pub payer: Signer<'info>,

    #[account(
        mut,
        seeds = [SMART_ACCOUNT_SEED, smart_account.admin.as_ref(), smart_account.salt.to_le_bytes().as_ref()],
        bump = smart_account.bump,
    )]
    pub smart_account: Box<Account<'info, SmartAccount>>,
}

/// Checks the nonce and recovers who signed `action`.
fn signed_caller(
    smart_account: &Account<'_, SmartAccount>,
    action: &AdminAction,
    nonce: u64,
    signature: &[u8],
) -> Result<SignerAddress> {
    smart_account.check_nonce(nonce)?;

    let account_key = smart_account.key();
    let hash = action.hash(&account_key, nonce)?;
    resolve_caller(
        smart_account,
        &smart_account.domain(account_key),
        &hash,
        signature,
        &[],
    )
}
