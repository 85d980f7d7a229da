use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::BearerAuth;
use crate::coordinators::StaffCoordinator;
use crate::errors::StaffApiError;
use crate::providers::TokenProvider;
use crate::types::dto::staff::{CreateStaffRequest, CreateStaffResponse, DeleteStaffRequest, DeleteStaffResponse};
use crate::types::internal::context::RequestContext;

/// Staff account management endpoints
///
/// Every endpoint requires a bearer token carrying the admin claim.
pub struct StaffApi {
    staff_coordinator: Arc<StaffCoordinator>,
    token_provider: Arc<TokenProvider>,
}

impl StaffApi {
    pub fn new(staff_coordinator: Arc<StaffCoordinator>, token_provider: Arc<TokenProvider>) -> Self {
        Self {
            staff_coordinator,
            token_provider,
        }
    }

    /// Validate the bearer token and require the admin claim
    fn admin_context(&self, req: &Request, auth: &BearerAuth) -> Result<RequestContext, StaffApiError> {
        let ctx = RequestContext::from_api_request(req, &auth.0, &self.token_provider)
            .map_err(StaffApiError::from_internal_error)?;

        if !ctx.is_admin() {
            tracing::warn!(actor = %ctx.actor_id, "Non-admin caller rejected from staff endpoint");
            return Err(StaffApiError::forbidden());
        }

        Ok(ctx)
    }
}

/// API tags for staff endpoints
#[derive(Tags)]
enum StaffTags {
    /// Staff account lifecycle
    Staff,
}

#[OpenApi(prefix_path = "/staff")]
impl StaffApi {
    /// Create a staff account
    ///
    /// Creates the identity and its staff profile. When no password is given a
    /// one-time password is generated and returned as `temporaryPassword`.
    #[oai(path = "/create", method = "post", tag = "StaffTags::Staff")]
    async fn create_staff(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateStaffRequest>,
    ) -> Result<Json<CreateStaffResponse>, StaffApiError> {
        let ctx = self.admin_context(req, &auth)?;

        let created = self
            .staff_coordinator
            .create_staff_account(&ctx, body.0.into())
            .await?;

        Ok(Json(created.into()))
    }

    /// Delete a staff account
    ///
    /// Deletes the identity and its staff profile. An identity that is already
    /// gone is not an error; its profile is still removed.
    #[oai(path = "/delete", method = "post", tag = "StaffTags::Staff")]
    async fn delete_staff(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<DeleteStaffRequest>,
    ) -> Result<Json<DeleteStaffResponse>, StaffApiError> {
        let ctx = self.admin_context(req, &auth)?;

        let deleted = self
            .staff_coordinator
            .delete_staff_account(&ctx, body.0.into())
            .await?;

        Ok(Json(deleted.into()))
    }
}
