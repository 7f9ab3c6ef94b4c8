//! Reference data for console pickers.
//!
//! ```text
//! GET /api/v1/reference
//! ```

use actix_web::{get, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::locations::LOCATIONS;
use crate::domain::{Error, Role, Specialization, Table};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Operator;

/// Cities offered for one state.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StateCitiesDto {
    pub state: String,
    pub cities: Vec<String>,
}

/// Everything the console offers in drop-downs.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReferenceData {
    pub roles: Vec<Role>,
    pub specializations: Vec<Specialization>,
    pub tables: Vec<Table>,
    pub locations: Vec<StateCitiesDto>,
}

impl ReferenceData {
    fn current() -> Self {
        Self {
            roles: vec![Role::Client, Role::Lawyer],
            specializations: Specialization::ALL.to_vec(),
            tables: Table::ALL.to_vec(),
            locations: LOCATIONS
                .iter()
                .map(|entry| StateCitiesDto {
                    state: entry.state.to_owned(),
                    cities: entry.cities.iter().map(|city| (*city).to_owned()).collect(),
                })
                .collect(),
        }
    }
}

/// Roles, specializations, editable tables and the location catalogue.
#[utoipa::path(
    get,
    path = "/api/v1/reference",
    responses(
        (status = 200, description = "Reference data", body = ReferenceData),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["reference"],
    operation_id = "getReferenceData"
)]
#[get("/reference")]
pub async fn reference_data(_operator: Operator) -> ApiResult<web::Json<ReferenceData>> {
    Ok(web::Json(ReferenceData::current()))
}
