pub mod client;
pub mod models;

pub use client::{DashboardClient, ProviderSource};
pub use models::ProviderData;
