mod client;

pub use client::TreeherderClient;
