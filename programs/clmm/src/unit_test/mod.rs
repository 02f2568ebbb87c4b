pub mod math_test;
pub mod pool_test;
