use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::users::get_user,
    ),
    components(
        schemas(
            crate::routes::auth::RegisterRequest,
            crate::routes::auth::LoginRequest,
            crate::routes::auth::RegisterResponse,
            crate::routes::auth::LoginResponse,
            crate::routes::auth::UserInfo,
            crate::routes::users::UserResponse,
            crate::errors::ErrorResponse,
            crate::errors::FieldError,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users")
    )
)]
pub struct ApiDoc;
