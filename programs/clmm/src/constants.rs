/// Protocol constants for the CLMM core.
///
/// All prices are square-root prices in Q64.96 fixed point: the value stored
/// is sqrt(price) * 2^96. The tick domain below is the largest symmetric range
/// whose sqrt price still fits a u128 after the 2^96 scaling.

/// The Q64.96 fixed-point scale (2^96).
pub const Q96: u128 = 1 << 96;

/// The lowest tick index the protocol supports.
///
/// At this tick the sqrt price reaches the bottom of the representable
/// Q64.96 range.
pub const MIN_TICK: i32 = -443636;

/// The highest tick index the protocol supports.
pub const MAX_TICK: i32 = -MIN_TICK;

/// sqrt(1.0001^MIN_TICK) in Q64.64, i.e. before the final shift into Q64.96.
pub const MIN_SQRT_PRICE_X64: u128 = 4295048016;

/// sqrt(1.0001^MAX_TICK) in Q64.64, exclusive upper bound.
pub const MAX_SQRT_PRICE_X64: u128 = 79226673521066979257578248091;

/// Lowest valid sqrt price in Q64.96, inclusive.
pub const MIN_SQRT_PRICE_X96: u128 = MIN_SQRT_PRICE_X64 << 32;

/// Highest valid sqrt price in Q64.96, exclusive.
pub const MAX_SQRT_PRICE_X96: u128 = MAX_SQRT_PRICE_X64 << 32;

/// Number of tick slots held by one tick-array page.
///
/// A page addressed by `start_tick_index` covers the half-open tick range
/// `[start, start + TICKS_PER_ARRAY * tick_spacing)`.
pub const TICKS_PER_ARRAY: usize = 10;

/// Fractional bits computed by the log2 approximation in
/// `sqrt_price_x96_to_tick`.
pub const LOG2_BIT_PRECISION: u32 = 16;

/// log2(sqrt(1.0001)) in X64 fixed point, the tick base of the inverse
/// price lookup.
pub const LOG2_TICK_BASE_X64: i128 = 1330580271462080;

/// Precomputed sqrt-price factors for the tick-to-price bit decomposition.
///
/// Entry `k` is `sqrt(1.0001)^(-2^k)` in Q64.64. Multiplying together the
/// entries selected by the set bits of `|tick|` yields
/// `sqrt(1.0001)^(-|tick|)`; positive ticks take the reciprocal of the
/// product. 19 entries cover the full `|tick| <= MAX_TICK < 2^19` domain.
pub const SQRT_PRICE_FACTORS_X64: [u128; 19] = [
    18445821805675392311,
    18444899583751176498,
    18443055278223354162,
    18439367220385604838,
    18431993317065449817,
    18417254355718160513,
    18387811781193591352,
    18329067761203520168,
    18212142134806087854,
    17980523815641551639,
    17526086738831147013,
    16651378430235024244,
    15030750278693429944,
    12247334978882834399,
    8131365268884726200,
    3584323654723342297,
    696457651847595233,
    26294789957452057,
    37481735321082,
];
