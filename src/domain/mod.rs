mod aggregate;
mod money;
mod period;
mod portfolio;
mod tax;
mod taxonomy;
mod transaction;

pub use aggregate::*;
pub use money::*;
pub use period::*;
pub use portfolio::*;
pub use tax::*;
pub use taxonomy::*;
pub use transaction::*;
