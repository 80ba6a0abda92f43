pub mod response;
pub mod stock;
pub mod yahoo;

pub use response::*;
pub use stock::*;
pub use yahoo::*;
