pub mod agents;
pub mod audit_logs;
pub mod favorites;
pub mod inquiries;
pub mod landlords;
pub mod properties;
pub mod tenants;
pub mod users;

pub use agents::Entity as Agents;
pub use audit_logs::Entity as AuditLogs;
pub use favorites::Entity as Favorites;
pub use inquiries::Entity as Inquiries;
pub use landlords::Entity as Landlords;
pub use properties::Entity as Properties;
pub use tenants::Entity as Tenants;
pub use users::Entity as Users;
