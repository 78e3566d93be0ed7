use crate::job_controller::state::JobsState;
use actix_web::{web, HttpResponse, Responder};

pub(crate) async fn process(job_id: web::Path<String>, state: web::Data<JobsState>) -> impl Responder {
    get_job_status(job_id, state).await
}

async fn get_job_status(job_id: web::Path<String>, state: web::Data<JobsState>) -> HttpResponse {
    match state.status(&job_id.into_inner()).await {
        Some(status) => HttpResponse::Ok().json(status),
        None => HttpResponse::NotFound().body("Job ID not found"),
    }
}

#[cfg(test)]
mod tests {
    use super::super::configure_routes;
    use crate::job_controller::state::JobsState;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use common::jobs::JobStatus;

    #[actix_web::test]
    async fn known_and_unknown_jobs() {
        let (state, _rx) = JobsState::new();
        state.set("abc", JobStatus::InProgress(0)).await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(configure_routes()),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/jobs/abc").to_request();
        let status: JobStatus = test::call_and_read_body_json(&app, req).await;
        assert_eq!(status, JobStatus::InProgress(0));

        let req = test::TestRequest::get().uri("/api/jobs/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(test::read_body(resp).await, "Job ID not found");
    }
}
