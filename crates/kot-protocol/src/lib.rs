pub mod paths;
pub mod printer;
pub mod response;
pub mod snapshot;
pub mod ticket;

pub use printer::*;
pub use response::*;
pub use snapshot::*;
pub use ticket::*;
