pub mod admin_service;
pub mod auth_service;
pub mod favorite_service;
pub mod property_service;
