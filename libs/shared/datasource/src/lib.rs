pub mod client;

pub use client::DataSourceClient;
