use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use modkit::api::problem::{FieldViolation, Problem};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users API",
        description = "CRUD surface for the users_info module"
    ),
    paths(
        handlers::list_users,
        handlers::get_user,
        handlers::create_user,
        handlers::update_user,
        handlers::delete_user
    ),
    components(schemas(
        dto::UserDto,
        dto::CreateUserReq,
        dto::UpdateUserReq,
        Problem,
        FieldViolation
    )),
    tags((name = "users", description = "User management"))
)]
pub struct ApiDoc;
