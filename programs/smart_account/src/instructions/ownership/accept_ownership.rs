use anchor_lang::prelude::*;

use super::{signed_caller, ManageOwnership};
use crate::{
    events::OwnershipTransferred,
    instructions::{AcceptOwnershipArgs, Args},
    state::AdminAction,
};

/// Second half of the handover, signed by the pending owner.
pub fn accept_ownership(ctx: Context<ManageOwnership>, args: AcceptOwnershipArgs) -> Result<()> {
    args.validate()?;

    let caller = signed_caller(
        &ctx.accounts.smart_account,
        &AdminAction::AcceptOwnership,
        args.nonce,
        &args.signature,
    )?;

    let smart_account = &mut ctx.accounts.smart_account;
    let previous_owner = smart_account.accept_ownership(&caller)?;
    smart_account.advance_nonce()?;

    msg!("Ownership transferred to {:?}", caller);
    emit!(OwnershipTransferred {
        smart_account: smart_account.key(),
        previous_owner,
        new_owner: caller,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
