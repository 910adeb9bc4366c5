mod catalog;
mod customer;
mod material;
mod money;
mod record;
mod state;

pub use catalog::*;
pub use customer::*;
pub use material::*;
pub use money::*;
pub use record::*;
pub use state::*;
