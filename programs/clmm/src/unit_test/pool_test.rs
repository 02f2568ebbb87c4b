use crate::errors::ErrorCode;
use crate::math::tick_to_sqrt_price_x96;
use crate::state::Pool;
use crate::tick::TickArrayState;
use anchor_lang::prelude::*;

#[cfg(test)]
mod pool_initialize_tests {
    use super::*;
    use crate::constants::{MAX_SQRT_PRICE_X96, MIN_SQRT_PRICE_X96};

    fn ordered_mints() -> (Pubkey, Pubkey) {
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();
        if a < b {
            (a, b)
        } else {
            (b, a)
        }
    }

    #[test]
    fn initialize_derives_tick_from_price() -> Result<()> {
        let (token_0, token_1) = ordered_mints();
        let mut pool = Pool::default();
        pool.initialize(
            255,
            token_0,
            token_1,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            60,
            tick_to_sqrt_price_x96(0)?,
        )?;

        assert_eq!(pool.current_tick, 0);
        assert_eq!(pool.global_liquidity, 0);
        assert_eq!(pool.tick_spacing, 60);
        Ok(())
    }

    #[test]
    fn initialize_rejects_unordered_mints() {
        let (token_0, token_1) = ordered_mints();
        let mut pool = Pool::default();
        let result = pool.initialize(
            255,
            token_1,
            token_0,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            60,
            tick_to_sqrt_price_x96(0).unwrap(),
        );
        assert_eq!(result.unwrap_err(), ErrorCode::InvalidTokenOrder.into());
    }

    #[test]
    fn initialize_rejects_bad_tick_spacing() {
        let (token_0, token_1) = ordered_mints();
        for tick_spacing in [0, -60] {
            let mut pool = Pool::default();
            let result = pool.initialize(
                255,
                token_0,
                token_1,
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                tick_spacing,
                tick_to_sqrt_price_x96(0).unwrap(),
            );
            assert_eq!(result.unwrap_err(), ErrorCode::InvalidTickSpacing.into());
        }
    }

    #[test]
    fn initialize_rejects_price_outside_domain() {
        let (token_0, token_1) = ordered_mints();
        for sqrt_price in [MIN_SQRT_PRICE_X96 - 1, MAX_SQRT_PRICE_X96] {
            let mut pool = Pool::default();
            let result = pool.initialize(
                255,
                token_0,
                token_1,
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                60,
                sqrt_price,
            );
            assert_eq!(result.unwrap_err(), ErrorCode::SqrtPriceOutOfRange.into());
        }
    }

    #[test]
    fn range_membership_is_half_open_on_ticks() {
        let pool = Pool {
            current_tick: 60,
            ..Pool::default()
        };
        assert!(pool.is_in_range(60, 120));
        assert!(!pool.is_in_range(0, 60));
        assert!(pool.is_in_range(0, 61));
    }
}

#[cfg(test)]
mod pool_swap_tests {
    use super::*;

    const SPACING: i32 = 60;
    const LIQUIDITY: u128 = 100_000;

    fn price(tick: i32) -> u128 {
        tick_to_sqrt_price_x96(tick).unwrap()
    }

    /// Pool at tick 0 with one position over `[-600, 60)`, liquidity 100_000.
    /// The lower boundary lives in page -600, the upper in page 0.
    fn pool_with_position() -> (Pool, TickArrayState, TickArrayState) {
        let pool = Pool {
            tick_spacing: SPACING,
            sqrt_price_x96: price(0),
            current_tick: 0,
            global_liquidity: LIQUIDITY,
            ..Pool::default()
        };

        let mut page_0 = TickArrayState::default();
        page_0.initialize(Pubkey::new_unique(), 0);
        page_0
            .get_tick_mut(60, SPACING)
            .unwrap()
            .update(LIQUIDITY as i128, true)
            .unwrap();

        let mut page_down = TickArrayState::default();
        page_down.initialize(Pubkey::new_unique(), -600);
        page_down
            .get_tick_mut(-600, SPACING)
            .unwrap()
            .update(LIQUIDITY as i128, false)
            .unwrap();

        (pool, page_0, page_down)
    }

    #[test]
    fn zero_input_is_rejected() {
        let (mut pool, page_0, _) = pool_with_position();
        let result = pool.swap(true, 0, 0, &[&page_0]);
        assert_eq!(result.unwrap_err(), ErrorCode::ZeroAmount.into());
    }

    #[test]
    fn swap_against_empty_pool_is_rejected() {
        let (mut pool, page_0, _) = pool_with_position();
        pool.global_liquidity = 0;
        let result = pool.swap(true, 100, 0, &[&page_0]);
        assert_eq!(result.unwrap_err(), ErrorCode::InsufficientLiquidity.into());
    }

    #[test]
    fn small_swap_down_stays_inside_range() -> Result<()> {
        let (mut pool, page_0, page_down) = pool_with_position();

        let (amount_in_used, amount_out) = pool.swap(true, 100, 0, &[&page_0, &page_down])?;

        assert_eq!(amount_in_used, 100);
        assert_eq!(amount_out, 99);
        // No boundary was crossed, so the active liquidity is untouched.
        assert_eq!(pool.global_liquidity, LIQUIDITY);
        assert_eq!(pool.current_tick, -20);
        assert!(pool.sqrt_price_x96 < price(0) && pool.sqrt_price_x96 > price(-600));
        Ok(())
    }

    #[test]
    fn swap_down_requires_next_page() {
        let (mut pool, page_0, _) = pool_with_position();

        // The current page holds nothing below tick 0; moving down needs
        // page -600 and it was not supplied.
        let result = pool.swap(true, 100, 0, &[&page_0]);
        assert_eq!(result.unwrap_err(), ErrorCode::TickArrayNotProvided.into());
    }

    #[test]
    fn swap_up_crosses_upper_boundary_and_stops() -> Result<()> {
        let (mut pool, page_0, _) = pool_with_position();

        // Reaching tick 60 takes 300 in; the rest cannot be filled because
        // crossing the boundary deactivates all liquidity.
        let (amount_in_used, amount_out) = pool.swap(false, 1000, 0, &[&page_0])?;

        assert_eq!(amount_in_used, 300);
        assert_eq!(amount_out, 299);
        assert_eq!(pool.global_liquidity, 0);
        assert_eq!(pool.current_tick, 60);
        assert_eq!(pool.sqrt_price_x96, price(60));
        Ok(())
    }

    #[test]
    fn swap_up_crosses_boundary_in_first_slot_of_next_page() -> Result<()> {
        // Position [-600, 600): the upper boundary sits in the first slot of
        // page 600, so the swap hands off at the page edge and must still
        // cross tick 600 there.
        let mut pool = Pool {
            tick_spacing: SPACING,
            sqrt_price_x96: price(0),
            current_tick: 0,
            global_liquidity: LIQUIDITY,
            ..Pool::default()
        };

        let mut page_0 = TickArrayState::default();
        page_0.initialize(Pubkey::new_unique(), 0);

        let mut page_600 = TickArrayState::default();
        page_600.initialize(Pubkey::new_unique(), 600);
        page_600
            .get_tick_mut(600, SPACING)
            .unwrap()
            .update(LIQUIDITY as i128, true)
            .unwrap();

        let (amount_in_used, amount_out) = pool.swap(false, 5000, 0, &[&page_0, &page_600])?;

        // Reaching tick 600 takes 3045 in; crossing it deactivates the
        // position, so the rest of the input is returned unused.
        assert_eq!(amount_in_used, 3045);
        assert_eq!(amount_out, 2955);
        assert_eq!(pool.global_liquidity, 0);
        assert_eq!(pool.current_tick, 600);
        assert_eq!(pool.sqrt_price_x96, price(600));
        Ok(())
    }

    #[test]
    fn swap_up_in_topmost_page_stops_at_the_tick_domain() -> Result<()> {
        // The last page at spacing 60 starts at 443400; its nominal edge at
        // 444000 lies past MAX_TICK.
        let mut pool = Pool {
            tick_spacing: SPACING,
            sqrt_price_x96: price(443_590),
            current_tick: 443_590,
            global_liquidity: 1_000,
            ..Pool::default()
        };
        let mut top_page = TickArrayState::default();
        top_page.initialize(Pubkey::new_unique(), 443_400);

        // A small input moves the price partway toward the domain edge.
        let (amount_in_used, amount_out) = pool.swap(false, 10, 0, &[&top_page])?;
        assert_eq!((amount_in_used, amount_out), (10, 0));
        assert_eq!(pool.current_tick, 443_590);

        // An input large enough to reach MAX_TICK runs out of pages, not
        // out of price domain.
        let result = pool.swap(false, u64::MAX, 0, &[&top_page]);
        assert_eq!(result.unwrap_err(), ErrorCode::TickArrayNotProvided.into());
        Ok(())
    }

    #[test]
    fn swap_down_crosses_lower_boundary_and_stops() -> Result<()> {
        let (mut pool, page_0, page_down) = pool_with_position();

        let (amount_in_used, amount_out) = pool.swap(true, 10_000, 0, &[&page_0, &page_down])?;

        assert_eq!(amount_in_used, 3045);
        assert_eq!(amount_out, 2955);
        assert_eq!(pool.global_liquidity, 0);
        // Landing exactly on the boundary moving down leaves the current
        // tick just under it.
        assert_eq!(pool.current_tick, -601);
        assert_eq!(pool.sqrt_price_x96, price(-600));
        Ok(())
    }

    #[test]
    fn slippage_floor_is_enforced() {
        let (mut pool, page_0, page_down) = pool_with_position();

        // The 100-in swap produces 99 out; demand one more.
        let result = pool.swap(true, 100, 100, &[&page_0, &page_down]);
        assert_eq!(result.unwrap_err(), ErrorCode::SlippageExceeded.into());
    }

    #[test]
    fn swap_after_liquidity_is_exhausted_is_rejected() -> Result<()> {
        let (mut pool, page_0, page_down) = pool_with_position();

        // Cross tick 60 moving up, deactivating the position.
        pool.swap(false, 1000, 0, &[&page_0])?;
        assert_eq!(pool.global_liquidity, 0);

        // With no active liquidity left, further swaps fail outright.
        let result = pool.swap(true, 100, 0, &[&page_0, &page_down]);
        assert_eq!(result.unwrap_err(), ErrorCode::InsufficientLiquidity.into());
        Ok(())
    }
}
