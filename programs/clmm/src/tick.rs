/// Tick ledger state: per-tick liquidity deltas and the fixed-size pages
/// ("tick arrays") that hold them.
///
/// Ticks are stored sparsely: a tick exists only while at least one position
/// uses it as a boundary, and the pages covering a range are created lazily
/// the first time a boundary lands in them. Every operation names the pages
/// it touches explicitly; nothing is discovered implicitly.
use crate::constants::TICKS_PER_ARRAY;
use crate::errors::ErrorCode;
use anchor_lang::prelude::*;

/// Liquidity bookkeeping for a single tick.
///
/// `liquidity_net` is applied to the pool's active liquidity when the price
/// crosses this tick: added moving up, subtracted moving down.
/// `liquidity_gross` counts all liquidity referencing the tick as a boundary
/// and decides whether the tick is initialized at all.
#[zero_copy]
#[repr(C)]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TickState {
    pub liquidity_gross: u128,
    pub liquidity_net: i128,
}

impl TickState {
    /// A tick is initialized while any position still references it.
    pub fn is_initialized(&self) -> bool {
        self.liquidity_gross != 0
    }

    /// Applies a position liquidity change to this tick.
    ///
    /// # Arguments
    /// * `liquidity_delta` - Positive when liquidity is added, negative when
    ///   removed.
    /// * `is_upper` - True when this tick is the upper boundary of the
    ///   position; the net delta flips sign at the upper boundary.
    pub fn update(&mut self, liquidity_delta: i128, is_upper: bool) -> Result<()> {
        let abs_delta = liquidity_delta.unsigned_abs();

        self.liquidity_gross = if liquidity_delta >= 0 {
            self.liquidity_gross
                .checked_add(abs_delta)
                .ok_or(ErrorCode::MathOverflow)?
        } else {
            self.liquidity_gross
                .checked_sub(abs_delta)
                .ok_or(ErrorCode::LiquidityUnderflow)?
        };

        self.liquidity_net = if is_upper {
            self.liquidity_net.checked_sub(liquidity_delta)
        } else {
            self.liquidity_net.checked_add(liquidity_delta)
        }
        .ok_or(ErrorCode::MathOverflow)?;

        Ok(())
    }
}

/// One page of the sparse tick index.
///
/// A page covers the half-open tick range
/// `[start_tick_index, start_tick_index + TICKS_PER_ARRAY * tick_spacing)`
/// and is addressed on chain by a PDA over `(pool, start_tick_index)`.
#[account(zero_copy)]
#[repr(C)]
#[derive(Debug, Default)]
pub struct TickArrayState {
    pub ticks: [TickState; TICKS_PER_ARRAY],
    pub pool: Pubkey,
    pub start_tick_index: i32,
    pub padding: [u8; 12],
}

impl TickArrayState {
    pub const LEN: usize = 8 // discriminator
        + TICKS_PER_ARRAY * 32 // ticks
        + 32 // pool
        + 4 // start_tick_index
        + 12; // padding

    /// The page start covering `tick`, derived with floor division so the
    /// mapping is uniform for negative and positive ticks alike.
    ///
    /// Truncating division would send e.g. tick -60 (spacing 60) to page 0,
    /// whose range `[0, 600)` does not contain it; floor division sends it
    /// to page -600 as required. Every page-start derivation in the program
    /// goes through this function.
    pub fn start_tick_index_for(tick: i32, tick_spacing: i32) -> i32 {
        let ticks_per_array = TICKS_PER_ARRAY as i32;
        tick.div_euclid(tick_spacing).div_euclid(ticks_per_array) * ticks_per_array * tick_spacing
    }

    /// Number of ticks spanned by one page.
    pub fn tick_span(tick_spacing: i32) -> i32 {
        TICKS_PER_ARRAY as i32 * tick_spacing
    }

    /// Resets the page for first use.
    pub fn initialize(&mut self, pool: Pubkey, start_tick_index: i32) {
        self.pool = pool;
        self.start_tick_index = start_tick_index;
        self.ticks = [TickState::default(); TICKS_PER_ARRAY];
        self.padding = [0; 12];
    }

    /// Whether `tick` falls inside this page's range.
    pub fn covers(&self, tick: i32, tick_spacing: i32) -> bool {
        tick >= self.start_tick_index
            && tick < self.start_tick_index + Self::tick_span(tick_spacing)
    }

    fn offset_of(&self, tick: i32, tick_spacing: i32) -> Result<usize> {
        require!(
            tick.rem_euclid(tick_spacing) == 0 && self.covers(tick, tick_spacing),
            ErrorCode::TickOutOfBounds
        );
        Ok(((tick - self.start_tick_index) / tick_spacing) as usize)
    }

    /// Read access to a tick slot in this page.
    pub fn get_tick(&self, tick: i32, tick_spacing: i32) -> Result<&TickState> {
        let offset = self.offset_of(tick, tick_spacing)?;
        Ok(&self.ticks[offset])
    }

    /// Mutable access to a tick slot in this page.
    pub fn get_tick_mut(&mut self, tick: i32, tick_spacing: i32) -> Result<&mut TickState> {
        let offset = self.offset_of(tick, tick_spacing)?;
        Ok(&mut self.ticks[offset])
    }

    /// Finds the nearest initialized tick in the swap direction, scanning
    /// only within this page.
    ///
    /// Searching down returns the greatest initialized tick at or below
    /// `from_tick`; searching up returns the least initialized tick strictly
    /// above it. `None` means the page edge was reached first and the caller
    /// must move on to the adjacent page.
    pub fn next_initialized_tick(
        &self,
        from_tick: i32,
        tick_spacing: i32,
        search_down: bool,
    ) -> Option<i32> {
        let start = self.start_tick_index;

        if search_down {
            if from_tick < start {
                return None;
            }
            let hi = (((from_tick - start) / tick_spacing) as usize).min(TICKS_PER_ARRAY - 1);
            for offset in (0..=hi).rev() {
                if self.ticks[offset].is_initialized() {
                    return Some(start + offset as i32 * tick_spacing);
                }
            }
            None
        } else {
            let lo = if from_tick < start {
                0
            } else {
                ((from_tick - start) / tick_spacing) as usize + 1
            };
            for offset in lo..TICKS_PER_ARRAY {
                if self.ticks[offset].is_initialized() {
                    return Some(start + offset as i32 * tick_spacing);
                }
            }
            None
        }
    }
}
