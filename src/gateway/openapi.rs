//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:3000/docs`
//! - OpenAPI JSON: `http://localhost:3000/api-docs/openapi.json`

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::ChallengeMessage;
use crate::auth::handlers::{LoginRequest, LoginResponse, NonceResponse};
use crate::documents::{CreateGroupRequest, DocumentRecord, Network};
use crate::gateway::types::{ErrorBody, HealthResponse};

/// Admin credential: JWT as bearer header or as the `etherdoc-auth` cookie
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Access token from POST /auth/login: Authorization: Bearer {token}",
                        ))
                        .build(),
                ),
            );
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "etherdoc-auth",
                    "HttpOnly cookie set by POST /auth/login. Takes precedence over the header.",
                ))),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Etherdoc Gateway API",
        version = "1.0.0",
        description = "Document registry gateway: wallet-signature admin login, pinning provider proxy and on-chain existence checks.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::auth::handlers::get_nonce,
        crate::auth::handlers::login,
        crate::documents::handlers::get_document,
        crate::documents::handlers::list_files,
        crate::documents::handlers::list_groups,
        crate::documents::handlers::create_group,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            ChallengeMessage,
            NonceResponse,
            LoginRequest,
            LoginResponse,
            Network,
            CreateGroupRequest,
            DocumentRecord,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Administrator challenge-response login"),
        (name = "Documents", description = "Document lookup (public) and pinning management (admin)"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
