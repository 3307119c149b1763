use anchor_lang::prelude::*;

// Security constants and validation utilities

/// Maximum number of targets in a session key whitelist
pub const MAX_WHITELIST_SIZE: usize = 10;

/// Maximum number of sub-calls in one batch
pub const MAX_BATCH_SIZE: usize = 10;

/// Maximum allowed size for the data of one sub-call
pub const MAX_CALL_DATA_SIZE: usize = 1024;

/// Maximum allowed remaining accounts
pub const MAX_REMAINING_ACCOUNTS: usize = 32;

/// Security validation functions
pub mod validation {
    use super::*;
    use crate::error::SmartAccountError;
    use crate::state::Call;

    /// Validate the size of every call's data
    pub fn validate_calls(calls: &[Call]) -> Result<()> {
        for call in calls {
            require!(
                call.data.len() <= MAX_CALL_DATA_SIZE,
                SmartAccountError::CallDataTooLarge
            );
            require!(call.account_count > 0, SmartAccountError::InsufficientAccounts);
            // Value always lands on `target`, which the whitelist covers
            require!(
                call.value == 0 || call.data.is_empty(),
                SmartAccountError::ValueWithCallData
            );
        }
        Ok(())
    }

    /// Validate remaining accounts count
    pub fn validate_remaining_accounts(accounts: &[AccountInfo]) -> Result<()> {
        require!(
            accounts.len() <= MAX_REMAINING_ACCOUNTS,
            SmartAccountError::TooManyRemainingAccounts
        );
        Ok(())
    }

    /// Validate program is executable
    pub fn validate_program_executable(program: &AccountInfo) -> Result<()> {
        require!(program.executable, SmartAccountError::ProgramNotExecutable);
        Ok(())
    }

    /// Sub-calls may not re-enter this program
    pub fn validate_not_self(program: &Pubkey) -> Result<()> {
        require_keys_neq!(*program, crate::ID, SmartAccountError::ReentrancyDetected);
        Ok(())
    }
}
