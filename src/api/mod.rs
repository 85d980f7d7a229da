// API layer - HTTP endpoints
pub mod health;
pub mod staff;

use poem_openapi::SecurityScheme;
use poem_openapi::auth::Bearer;

pub use health::HealthApi;
pub use staff::StaffApi;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(ty = "bearer", bearer_format = "JWT")]
pub struct BearerAuth(pub Bearer);
