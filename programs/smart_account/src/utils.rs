use crate::error::SmartAccountError;
use crate::security::validation;
use crate::state::Call;
use crate::ID;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::{
    instruction::Instruction,
    program::{invoke, invoke_signed},
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct PdaSigner {
    pub seeds: Vec<Vec<u8>>,
    pub bump: u8,
}

impl PdaSigner {
    pub fn key(&self) -> Result<Pubkey> {
        let bump = [self.bump];
        let mut seeds: Vec<&[u8]> = self.seeds.iter().map(Vec::as_slice).collect();
        seeds.push(&bump);
        Pubkey::create_program_address(&seeds, &ID)
            .map_err(|_| error!(anchor_lang::error::ErrorCode::ConstraintSeeds))
    }
}

pub fn execute_cpi(
    accounts: &[AccountInfo],
    instruction_data: &[u8],
    cpi_program: &AccountInfo,
    pda_signer: Option<PdaSigner>,
) -> Result<()> {
    let signer_key = pda_signer.as_ref().map(PdaSigner::key).transpose()?;

    let account_metas = accounts
        .iter()
        .map(|account| AccountMeta {
            is_signer: account.is_signer || Some(*account.key) == signer_key,
            is_writable: account.is_writable,
            pubkey: *account.key,
        })
        .collect::<Vec<_>>();

    let instruction = Instruction {
        program_id: cpi_program.key(),
        accounts: account_metas,
        data: instruction_data.to_vec(),
    };

    if let Some(pda) = pda_signer {
        let bump = [pda.bump];
        let mut seeds: Vec<&[u8]> = pda.seeds.iter().map(Vec::as_slice).collect();
        seeds.push(&bump);
        invoke_signed(&instruction, accounts, &[seeds.as_slice()])?;
    } else {
        invoke(&instruction, accounts)?;
    }

    Ok(())
}

/// Moves lamports out of a program-owned PDA, keeping it rent exempt.
pub fn transfer_sol_from_pda(from: &AccountInfo, to: &AccountInfo, amount: u64) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let rent_exempt = Rent::get()?.minimum_balance(from.data_len());
    let spendable = from.lamports().saturating_sub(rent_exempt);
    require!(spendable >= amount, SmartAccountError::InsufficientLamports);

    let from_balance = from.lamports() - amount;
    **from.try_borrow_mut_lamports()? = from_balance;

    let to_balance = to
        .lamports()
        .checked_add(amount)
        .ok_or(SmartAccountError::IntegerOverflow)?;
    **to.try_borrow_mut_lamports()? = to_balance;

    Ok(())
}

/// Splits `remaining_accounts` into one consecutive slice per call.
pub fn split_call_accounts<'a, 'info>(
    remaining_accounts: &'a [AccountInfo<'info>],
    calls: &[Call],
) -> Result<Vec<&'a [AccountInfo<'info>]>> {
    let mut slices = Vec::with_capacity(calls.len());
    let mut offset = 0usize;
    for call in calls {
        let end = offset + call.account_count as usize;
        let accounts = remaining_accounts
            .get(offset..end)
            .ok_or(SmartAccountError::InsufficientAccounts)?;
        slices.push(accounts);
        offset = end;
    }
    Ok(slices)
}

/// Runs `calls` in order on behalf of the smart account. The first failing
/// call aborts the instruction with the callee's error.
pub fn execute_calls<'info>(
    smart_account: &AccountInfo<'info>,
    signer: &PdaSigner,
    calls: &[Call],
    remaining_accounts: &[AccountInfo<'info>],
) -> Result<()> {
    validation::validate_remaining_accounts(remaining_accounts)?;
    validation::validate_calls(calls)?;

    // Resolve every slice before the first call so a short account list
    // fails without side effects.
    let slices = split_call_accounts(remaining_accounts, calls)?;

    for (call, accounts) in calls.iter().zip(slices) {
        execute_call(smart_account, signer, call, accounts)?;
    }
    Ok(())
}

fn execute_call<'info>(
    smart_account: &AccountInfo<'info>,
    signer: &PdaSigner,
    call: &Call,
    accounts: &[AccountInfo<'info>],
) -> Result<()> {
    let (target, instruction_accounts) = accounts
        .split_first()
        .ok_or(SmartAccountError::InsufficientAccounts)?;
    require_keys_eq!(target.key(), call.target, SmartAccountError::AccountMismatch);

    if call.data.is_empty() {
        msg!("Transferring {} lamports to {}", call.value, target.key());
        return transfer_sol_from_pda(smart_account, target, call.value);
    }

    validation::validate_program_executable(target)?;
    validation::validate_not_self(target.key)?;

    msg!("Executing CPI to program: {}", target.key());
    execute_cpi(instruction_accounts, &call.data, target, Some(signer.clone()))
}
