use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        agents::{AgentList, CreateAgentRequest, UpdateAgentRequest},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        favorites::{AddFavoriteRequest, FavoritePropertyList},
        inquiries::{CreateInquiryRequest, InquiryList},
        landlords::{CreateLandlordRequest, LandlordList, UpdateLandlordRequest},
        properties::{CreatePropertyRequest, PropertyList, UpdatePropertyRequest},
        tenants::{CreateTenantRequest, TenantList, UpdateTenantRequest},
        uploads::UploadResponse,
    },
    models::{Agent, Favorite, Features, Inquiry, Landlord, Location, Property, Tenant, User},
    response::{ApiResponse, Meta},
    routes::{
        admin, agents, auth, favorites, health, inquiries, landlords, params, properties, tenants,
        uploads,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::me,
        properties::list_properties,
        properties::list_my_properties,
        properties::get_property,
        properties::create_property,
        properties::update_property,
        properties::delete_property,
        agents::list_agents,
        agents::get_agent,
        agents::create_agent,
        agents::update_agent,
        agents::delete_agent,
        tenants::list_tenants,
        tenants::get_tenant,
        tenants::create_tenant,
        tenants::update_tenant,
        tenants::delete_tenant,
        landlords::list_landlords,
        landlords::get_landlord,
        landlords::create_landlord,
        landlords::update_landlord,
        landlords::delete_landlord,
        inquiries::create_inquiry,
        inquiries::list_inquiries,
        inquiries::get_inquiry,
        inquiries::delete_inquiry,
        favorites::list_favorites,
        favorites::add_favorite,
        favorites::remove_favorite,
        uploads::upload_file,
        admin::list_all_properties,
        admin::update_property_status,
        admin::overview
    ),
    components(
        schemas(
            User,
            Agent,
            Tenant,
            Landlord,
            Property,
            Location,
            Features,
            Inquiry,
            Favorite,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            CreatePropertyRequest,
            UpdatePropertyRequest,
            PropertyList,
            CreateAgentRequest,
            UpdateAgentRequest,
            AgentList,
            CreateTenantRequest,
            UpdateTenantRequest,
            TenantList,
            CreateLandlordRequest,
            UpdateLandlordRequest,
            LandlordList,
            CreateInquiryRequest,
            InquiryList,
            AddFavoriteRequest,
            FavoritePropertyList,
            UploadResponse,
            admin::UpdatePropertyStatusRequest,
            admin::OverviewStats,
            params::Pagination,
            params::PropertyQuery,
            params::AdminPropertyQuery,
            params::InquiryListQuery,
            Meta,
            ApiResponse<Property>,
            ApiResponse<PropertyList>,
            ApiResponse<FavoritePropertyList>,
            ApiResponse<admin::OverviewStats>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Properties", description = "Listing endpoints"),
        (name = "Agents", description = "Agent directory endpoints"),
        (name = "Tenants", description = "Tenant directory endpoints"),
        (name = "Landlords", description = "Landlord directory endpoints"),
        (name = "Inquiries", description = "Contact inquiry endpoints"),
        (name = "Favorites", description = "Favorite endpoints"),
        (name = "Uploads", description = "File upload endpoints"),
        (name = "Admin", description = "Moderation endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
