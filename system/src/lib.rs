mod aggregation_engine;
mod blueprint;
mod destination;
mod message;
mod point_buffer_store;
mod traits;
mod types;

pub extern crate serde;
pub extern crate serde_json;

pub use aggregation_engine::*;
pub use blueprint::*;
pub use destination::*;
pub use message::*;
pub use point_buffer_store::*;
pub use traits::*;
pub use types::*;
