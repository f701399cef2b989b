pub mod deposit;
pub mod initialize;
pub mod redeem;
pub mod update_fees;

pub use deposit::*;
pub use initialize::*;
pub use redeem::*;
pub use update_fees::*;
