use anchor_lang::prelude::*;

use super::{signed_caller, ManageOwnership};
use crate::{
    events::OwnershipTransferStarted,
    instructions::{Args, ProposeTransferArgs},
    state::AdminAction,
};

/// First half of the ownership handover. Proposing the zero address cancels
/// a pending transfer.
pub fn propose_transfer(ctx: Context<ManageOwnership>, args: ProposeTransferArgs) -> Result<()> {
    args.validate()?;

    let action = AdminAction::ProposeTransfer {
        new_owner: args.new_owner,
    };
    let caller = signed_caller(&ctx.accounts.smart_account, &action, args.nonce, &args.signature)?;

    let smart_account = &mut ctx.accounts.smart_account;
    smart_account.propose_transfer(&caller, args.new_owner)?;
    smart_account.advance_nonce()?;

    emit!(OwnershipTransferStarted {
        smart_account: smart_account.key(),
        owner: smart_account.owner,
        pending_owner: args.new_owner,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
