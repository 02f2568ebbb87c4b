pub mod close_position;
pub mod decrease_liquidity;
pub mod increase_liquidity;
pub mod initialize_pool;
pub mod open_position;
pub mod shared;
pub mod swap;

pub use close_position::*;
pub use decrease_liquidity::*;
pub use increase_liquidity::*;
pub use initialize_pool::*;
pub use open_position::*;
pub use shared::*;
pub use swap::*;
