mod client;
pub mod models;
pub mod scheduler;
pub mod trips;
pub mod worker;

pub use client::GbfsClient;
