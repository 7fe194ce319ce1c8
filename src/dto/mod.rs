pub mod agents;
pub mod auth;
pub mod favorites;
pub mod inquiries;
pub mod landlords;
pub mod properties;
pub mod tenants;
pub mod uploads;
