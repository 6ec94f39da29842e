mod category;
mod entry;
mod money;
mod period;
mod summary;
mod validation;

pub use category::*;
pub use entry::*;
pub use money::*;
pub use period::*;
pub use summary::*;
pub use validation::*;
