//! Serves the choices the upload form is built from.
//!
//! - `GET /api/upload/options`: `FormOptions` as JSON (levels, subjects,
//!   exam boards, whether the marking-points input is shown, weekly upload
//!   limit for the help text).

mod get;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/upload";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/options", get().to(get::process))
}
