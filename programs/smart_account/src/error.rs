use anchor_lang::error_code;

#[error_code]
pub enum SmartAccountError {
    #[msg("Caller lacks the required role")]
    Unauthorized,

    #[msg("Malformed or non-recoverable signature")]
    InvalidSignature,

    #[msg("Recovered signer has no authority over this account")]
    UnknownSigner,

    #[msg("Session key has expired")]
    Expired,

    #[msg("Session key is not yet valid")]
    NotYetValid,

    #[msg("Session key call limit reached")]
    LimitReached,

    #[msg("Target is not in the session key whitelist")]
    TargetNotWhitelisted,

    #[msg("Whitelist exceeds the maximum number of entries")]
    WhitelistTooLarge,

    #[msg("Batch arrays have different lengths")]
    LengthMismatch,

    #[msg("Zero address is not allowed")]
    ZeroAddressNotAllowed,

    #[msg("validAfter is greater than validUntil")]
    InvalidWindow,

    #[msg("Nonce does not match the account nonce")]
    InvalidNonce,

    #[msg("Account nonce overflowed")]
    NonceOverflow,

    #[msg("Batch exceeds the maximum number of calls")]
    BatchTooLarge,

    #[msg("Batch contains no calls")]
    EmptyBatch,

    #[msg("Payload does not match the authorized request")]
    PayloadMismatch,

    #[msg("Record belongs to another smart account")]
    AccountMismatch,

    #[msg("Session key account does not match the signer")]
    SessionKeyMismatch,

    #[msg("Not enough remaining accounts for the call")]
    InsufficientAccounts,

    #[msg("Insufficient lamports in the smart account")]
    InsufficientLamports,

    #[msg("Call data exceeds the maximum size")]
    CallDataTooLarge,

    #[msg("Too many remaining accounts")]
    TooManyRemainingAccounts,

    #[msg("Sub-call into this program is not allowed")]
    ReentrancyDetected,

    #[msg("Target program is not executable")]
    ProgramNotExecutable,

    #[msg("Program is paused")]
    ProgramPaused,

    #[msg("Integer overflow")]
    IntegerOverflow,

    #[msg("Lamports can only be sent by a call without instruction data")]
    ValueWithCallData,
}
