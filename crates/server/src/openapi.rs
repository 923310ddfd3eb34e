use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct AccessTokenDoc {
    #[schema(rename = "accessToken")]
    pub access_token: String,
}

#[derive(ToSchema)]
pub struct AdminStatusDoc { pub admin: bool }

#[derive(ToSchema)]
pub struct ErrorBodyDoc { pub error: bool, pub message: String }

/// Fields written by `PUT /services/{id}`; absent ones are stored as null.
#[derive(ToSchema)]
pub struct ServiceFieldsDoc {
    pub image: Option<String>,
    pub name: Option<String>,
    /// Integer, or a string whose leading digits are taken.
    pub price: Option<i64>,
    pub description: Option<String>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct InsertOneResultDoc { pub acknowledged: bool, pub inserted_id: Uuid }

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct UpdateResultDoc {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<Uuid>,
}

#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct DeleteResultDoc { pub acknowledged: bool, pub deleted_count: u64 }

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::issue_jwt,
        crate::routes::services::list,
        crate::routes::services::create,
        crate::routes::services::upsert,
        crate::routes::services::remove,
        crate::routes::users::register,
        crate::routes::users::list,
        crate::routes::users::promote,
        crate::routes::users::admin_status,
        crate::routes::users::remove,
        crate::routes::orders::place,
        crate::routes::orders::list,
        crate::routes::reviews::list,
        crate::routes::reviews::submit,
    ),
    components(
        schemas(
            HealthResponse,
            AccessTokenDoc,
            AdminStatusDoc,
            ErrorBodyDoc,
            ServiceFieldsDoc,
            InsertOneResultDoc,
            UpdateResultDoc,
            DeleteResultDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "services"),
        (name = "users"),
        (name = "orders"),
        (name = "reviews")
    )
)]
pub struct ApiDoc;
