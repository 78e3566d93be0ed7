//! Status of background marking jobs.
//!
//! - `GET /api/jobs/{job_id}`: the job's current `JobStatus` as JSON, or
//!   `404` with `Job ID not found` for an id this server never issued.

mod get_status;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/jobs";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/{job_id}", get().to(get_status::process))
}
