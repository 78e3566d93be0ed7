use crate::config::Config;
use actix_web::{web, HttpResponse, Responder};

pub(crate) async fn process(config: web::Data<Config>) -> impl Responder {
    HttpResponse::Ok().json(config.form_options())
}
