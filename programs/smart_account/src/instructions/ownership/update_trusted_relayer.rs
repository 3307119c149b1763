use anchor_lang::prelude::*;

use super::{signed_caller, ManageOwnership};
use crate::{
    events::TrustedRelayerUpdated,
    instructions::{Args, UpdateTrustedRelayerArgs},
    state::AdminAction,
};

pub fn update_trusted_relayer(
    ctx: Context<ManageOwnership>,
    args: UpdateTrustedRelayerArgs,
) -> Result<()> {
    args.validate()?;

    let action = AdminAction::UpdateTrustedRelayer {
        new_relayer: args.new_relayer,
    };
    let caller = signed_caller(&ctx.accounts.smart_account, &action, args.nonce, &args.signature)?;

    let smart_account = &mut ctx.accounts.smart_account;
    let old_relayer = smart_account.trusted_relayer;
    smart_account.update_trusted_relayer(&caller, args.new_relayer)?;
    smart_account.advance_nonce()?;

    emit!(TrustedRelayerUpdated {
        smart_account: smart_account.key(),
        old_relayer,
        new_relayer: args.new_relayer,
        timestamp: Clock::get()?.unix_timestamp,
    });
    Ok(())
}
