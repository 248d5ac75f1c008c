pub mod offer;
pub mod order;
pub mod user;
pub mod wire;
