pub mod cache;
pub mod crow_flies;
pub mod google;
pub mod provider;
