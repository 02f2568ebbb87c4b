use crate::constants::*;
use crate::errors::ErrorCode;
use crate::math::*;

#[cfg(test)]
mod tick_price_conversion_tests {
    use super::*;

    /// sqrt price of tick 60 at spacing 60, precomputed with exact integer
    /// arithmetic. Used as an anchor for the conversion tests below.
    const SQRT_PRICE_60_X96: u128 = 79466191966197645206303539200;
    const SQRT_PRICE_59_X96: u128 = 79462218954572724188655648768;

    #[test]
    fn tick_zero_maps_to_unit_price() -> anchor_lang::Result<()> {
        assert_eq!(tick_to_sqrt_price_x96(0)?, Q96);
        Ok(())
    }

    #[test]
    fn domain_boundaries_match_constants() -> anchor_lang::Result<()> {
        assert_eq!(tick_to_sqrt_price_x96(MIN_TICK)?, MIN_SQRT_PRICE_X96);
        assert_eq!(tick_to_sqrt_price_x96(MAX_TICK)?, MAX_SQRT_PRICE_X96);
        Ok(())
    }

    #[test]
    fn tick_out_of_bounds_is_rejected() {
        let result = tick_to_sqrt_price_x96(MAX_TICK + 1);
        assert_eq!(result.unwrap_err(), ErrorCode::TickOutOfBounds.into());

        let result = tick_to_sqrt_price_x96(MIN_TICK - 1);
        assert_eq!(result.unwrap_err(), ErrorCode::TickOutOfBounds.into());
    }

    #[test]
    fn price_is_monotonic_in_tick() -> anchor_lang::Result<()> {
        let samples = [
            MIN_TICK, -443_000, -100_000, -601, -600, -60, -1, 0, 1, 60, 600, 100_000, 443_000,
            MAX_TICK - 1,
        ];
        for window in samples.windows(2) {
            assert!(
                tick_to_sqrt_price_x96(window[0])? < tick_to_sqrt_price_x96(window[1])?,
                "price not increasing between ticks {} and {}",
                window[0],
                window[1]
            );
        }
        Ok(())
    }

    #[test]
    fn round_trip_is_exact_at_tick_boundaries() -> anchor_lang::Result<()> {
        for tick in [
            MIN_TICK,
            -443_600,
            -100_000,
            -601,
            -600,
            -61,
            -60,
            -1,
            0,
            1,
            59,
            60,
            600,
            100_000,
            MAX_TICK - 1,
        ] {
            let sqrt_price = tick_to_sqrt_price_x96(tick)?;
            assert_eq!(sqrt_price_x96_to_tick(sqrt_price)?, tick);
        }
        Ok(())
    }

    #[test]
    fn inverse_conversion_floors_between_boundaries() -> anchor_lang::Result<()> {
        assert_eq!(tick_to_sqrt_price_x96(60)?, SQRT_PRICE_60_X96);
        assert_eq!(tick_to_sqrt_price_x96(59)?, SQRT_PRICE_59_X96);

        // One above the boundary still floors to 60; one below floors to 59.
        assert_eq!(sqrt_price_x96_to_tick(SQRT_PRICE_60_X96 + 1)?, 60);
        assert_eq!(sqrt_price_x96_to_tick(SQRT_PRICE_60_X96 - 1)?, 59);
        Ok(())
    }

    #[test]
    fn price_out_of_domain_is_rejected() {
        let result = sqrt_price_x96_to_tick(MIN_SQRT_PRICE_X96 - 1);
        assert_eq!(result.unwrap_err(), ErrorCode::SqrtPriceOutOfRange.into());

        // The upper bound is exclusive.
        let result = sqrt_price_x96_to_tick(MAX_SQRT_PRICE_X96);
        assert_eq!(result.unwrap_err(), ErrorCode::SqrtPriceOutOfRange.into());
    }
}

#[cfg(test)]
mod amount_tests {
    use super::*;

    const LIQUIDITY: u128 = 100_000;

    fn price(tick: i32) -> u128 {
        tick_to_sqrt_price_x96(tick).unwrap()
    }

    #[test]
    fn amount_0_across_known_range() -> anchor_lang::Result<()> {
        assert_eq!(get_amount_0_delta(price(0), price(60), LIQUIDITY)?, 300);
        Ok(())
    }

    #[test]
    fn amount_0_keeps_precision_at_extreme_prices() -> anchor_lang::Result<()> {
        // Near MIN_TICK the sqrt prices are tiny and rounding in the
        // division order is worth billions of token0 units.
        assert_eq!(
            get_amount_0_delta(price(MIN_TICK), price(MIN_TICK + 60), 1_000_000)?,
            12_864_709_838_238
        );
        Ok(())
    }

    #[test]
    fn amount_1_across_known_range() -> anchor_lang::Result<()> {
        assert_eq!(get_amount_1_delta(price(-600), price(0), LIQUIDITY)?, 2955);
        Ok(())
    }

    #[test]
    fn empty_range_holds_nothing() -> anchor_lang::Result<()> {
        assert_eq!(get_amount_0_delta(price(0), price(0), LIQUIDITY)?, 0);
        assert_eq!(get_amount_1_delta(price(0), price(0), LIQUIDITY)?, 0);
        Ok(())
    }

    #[test]
    fn reversed_bounds_are_rejected() {
        let result = get_amount_0_delta(price(60), price(0), LIQUIDITY);
        assert_eq!(result.unwrap_err(), ErrorCode::SqrtPriceOutOfRange.into());

        let result = get_amount_1_delta(price(60), price(0), LIQUIDITY);
        assert_eq!(result.unwrap_err(), ErrorCode::SqrtPriceOutOfRange.into());
    }

    #[test]
    fn amounts_when_price_inside_range() -> anchor_lang::Result<()> {
        let (amount_0, amount_1) =
            get_amounts_for_liquidity(price(0), price(-600), price(60), LIQUIDITY)?;
        assert_eq!((amount_0, amount_1), (300, 2955));
        Ok(())
    }

    #[test]
    fn amounts_when_price_below_range() -> anchor_lang::Result<()> {
        // Only token0 is held when the price sits under the range.
        let (amount_0, amount_1) =
            get_amounts_for_liquidity(price(0), price(60), price(120), LIQUIDITY)?;
        assert_eq!(amount_1, 0);
        assert_eq!(amount_0, 299);
        Ok(())
    }

    #[test]
    fn amounts_when_price_above_range() -> anchor_lang::Result<()> {
        // Only token1 is held when the price sits over the range.
        let (amount_0, amount_1) =
            get_amounts_for_liquidity(price(0), price(-120), price(-60), LIQUIDITY)?;
        assert_eq!(amount_0, 0);
        assert_eq!(amount_1, 298);
        Ok(())
    }
}

#[cfg(test)]
mod swap_step_tests {
    use super::*;

    const LIQUIDITY: u128 = 100_000;

    fn price(tick: i32) -> u128 {
        tick_to_sqrt_price_x96(tick).unwrap()
    }

    #[test]
    fn zero_liquidity_is_rejected() {
        let result = compute_swap_step(price(0), price(-600), 0, 100, true);
        assert_eq!(result.unwrap_err(), ErrorCode::InsufficientLiquidity.into());
    }

    #[test]
    fn full_step_down_reaches_target() -> anchor_lang::Result<()> {
        let (next_price, amount_in, amount_out) =
            compute_swap_step(price(0), price(-600), LIQUIDITY, 1_000_000, true)?;
        assert_eq!(next_price, price(-600));
        assert_eq!(amount_in, 3045);
        assert_eq!(amount_out, 2955);
        Ok(())
    }

    #[test]
    fn partial_step_down_consumes_whole_input() -> anchor_lang::Result<()> {
        let (next_price, amount_in, amount_out) =
            compute_swap_step(price(0), price(-600), LIQUIDITY, 100, true)?;
        assert_eq!(amount_in, 100);
        assert_eq!(amount_out, 99);
        assert_eq!(next_price, 79149013500763574019524425910);
        assert!(next_price > price(-600) && next_price < price(0));
        Ok(())
    }

    #[test]
    fn full_step_up_reaches_target() -> anchor_lang::Result<()> {
        let (next_price, amount_in, amount_out) =
            compute_swap_step(price(0), price(60), LIQUIDITY, 1_000_000_000, false)?;
        assert_eq!(next_price, price(60));
        assert_eq!(amount_in, 300);
        assert_eq!(amount_out, 299);
        Ok(())
    }

    #[test]
    fn partial_step_up_consumes_whole_input() -> anchor_lang::Result<()> {
        let (next_price, amount_in, amount_out) =
            compute_swap_step(price(0), price(60), LIQUIDITY, 150, false)?;
        assert_eq!(amount_in, 150);
        assert_eq!(amount_out, 149);
        assert_eq!(next_price, 79347004758035734099934266261);
        assert!(next_price > price(0) && next_price < price(60));
        Ok(())
    }

    #[test]
    fn step_never_moves_price_past_target() -> anchor_lang::Result<()> {
        let (next_price, _, _) =
            compute_swap_step(price(0), price(-60), LIQUIDITY, u64::MAX as u128, true)?;
        assert_eq!(next_price, price(-60));

        let (next_price, _, _) =
            compute_swap_step(price(0), price(60), LIQUIDITY, u64::MAX as u128, false)?;
        assert_eq!(next_price, price(60));
        Ok(())
    }

    #[test]
    fn wrong_direction_target_is_rejected() {
        let result = compute_swap_step(price(0), price(60), LIQUIDITY, 100, true);
        assert_eq!(result.unwrap_err(), ErrorCode::SqrtPriceOutOfRange.into());

        let result = compute_swap_step(price(0), price(-60), LIQUIDITY, 100, false);
        assert_eq!(result.unwrap_err(), ErrorCode::SqrtPriceOutOfRange.into());
    }
}
