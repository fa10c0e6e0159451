pub mod jwt;
pub mod middleware;
pub mod password;
pub mod refresh_token;
pub mod routes;

pub use middleware::AuthUser;
pub use routes::routes;
