/// Error definitions for the CLMM program.
///
/// Every failure mode of the core is surfaced synchronously through one of
/// these codes; a failed instruction aborts the whole transaction, so no
/// partial state is ever observable.
use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    /// A tick range is malformed: lower >= upper, a boundary is not a
    /// multiple of the pool's tick spacing, or a boundary is outside the
    /// supported tick domain.
    #[msg("The provided tick range is invalid")]
    InvalidTickRange,

    /// A tick index is misaligned or falls outside the supplied tick-array
    /// page.
    #[msg("Tick is out of bounds for the supplied tick array")]
    TickOutOfBounds,

    /// A sqrt price is outside the representable Q64.96 domain.
    #[msg("Sqrt price is out of range")]
    SqrtPriceOutOfRange,

    /// The swap swept past the edge of the supplied tick-array pages.
    ///
    /// The caller names the pages a swap may touch; crossing into a page
    /// that was not provided fails rather than silently stopping short.
    #[msg("A required tick array account was not provided")]
    TickArrayNotProvided,

    /// A supplied tick-array account does not belong to the pool or does
    /// not match the expected page start.
    #[msg("Invalid tick array account")]
    InvalidTickArrayAccount,

    /// A position must be opened with a nonzero liquidity amount.
    #[msg("Liquidity amount must be greater than zero")]
    ZeroLiquidity,

    /// Swap and liquidity-change amounts must be nonzero.
    #[msg("Amount entered is zero")]
    ZeroAmount,

    /// Returned when removing more liquidity than a position holds, or when
    /// swapping against a pool with no active liquidity.
    #[msg("Insufficient liquidity available")]
    InsufficientLiquidity,

    /// A fixed-point operation exceeded the representable range.
    #[msg("Operation would result in math overflow")]
    MathOverflow,

    /// A tick's gross liquidity would go negative; more liquidity was
    /// removed at a boundary than was ever added there.
    #[msg("Tick liquidity underflow")]
    LiquidityUnderflow,

    /// The swap produced less output than the caller's stated minimum.
    #[msg("Slippage tolerance exceeded")]
    SlippageExceeded,

    /// A position can only be closed once its liquidity has been decreased
    /// to zero.
    #[msg("Position still holds liquidity")]
    PositionNotEmpty,

    /// Pool creation requires token_0 < token_1 under the canonical mint
    /// ordering.
    #[msg("Token mints are not in canonical order")]
    InvalidTokenOrder,

    /// Tick spacing must be a positive integer.
    #[msg("Invalid tick spacing")]
    InvalidTickSpacing,

    /// An account references a pool other than the one in the instruction.
    #[msg("Invalid pool reference")]
    InvalidPoolReference,

    /// The signer does not own the position being modified.
    #[msg("Signer is not the position owner")]
    InvalidPositionOwner,

    /// The tick bounds passed in the instruction do not match the position.
    #[msg("Tick bounds do not match the position")]
    InvalidPositionRange,
}
