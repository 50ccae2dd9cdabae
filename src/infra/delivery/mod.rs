//! Delivery service backends.

pub mod file;
#[cfg(feature = "http")]
pub mod http;
pub mod memory;

pub use file::JsonlDeliveryOutbox;
#[cfg(feature = "http")]
pub use http::HttpDelivery;
pub use memory::InMemoryDelivery;
