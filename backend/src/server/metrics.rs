//! Prometheus middleware that can be switched off at runtime.
//!
//! Registry setup may fail at startup; the server then runs with this layer
//! passing requests straight through instead of refusing to boot.

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::PrometheusMetrics;
use futures_util::future::LocalBoxFuture;
use std::sync::Arc;

/// Optional metrics middleware; both arms yield the same boxed service type.
#[derive(Clone)]
pub(crate) struct MetricsLayer(Option<Arc<PrometheusMetrics>>);

impl MetricsLayer {
    #[must_use]
    pub(crate) fn from_option(metrics: Option<PrometheusMetrics>) -> Self {
        Self(metrics.map(Arc::new))
    }
}

type BoxedService = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxedService;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let Some(metrics) = self.0.clone() else {
            return Box::pin(async move {
                let passthrough = service.map(ServiceResponse::map_into_boxed_body);
                Ok(boxed::service(passthrough))
            });
        };
        let pending = Compat::new((*metrics).clone()).new_transform(service);
        Box::pin(async move { Ok(boxed::service(pending.await?)) })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use actix_web_prom::PrometheusMetricsBuilder;
    use rstest::rstest;

    fn metrics() -> PrometheusMetrics {
        PrometheusMetricsBuilder::new("tracklist_test")
            .endpoint("/metrics")
            .build()
            .expect("metrics should build for tests")
    }

    #[rstest]
    #[case(false, StatusCode::NOT_FOUND)]
    #[case(true, StatusCode::OK)]
    #[actix_web::test]
    async fn metrics_endpoint_follows_the_layer(#[case] enabled: bool, #[case] expected: StatusCode) {
        let layer = MetricsLayer::from_option(enabled.then(metrics));
        let app = test::init_service(
            App::new()
                .wrap(layer)
                .route("/ping", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let ping = test::call_service(&app, test::TestRequest::get().uri("/ping").to_request()).await;
        assert_eq!(ping.status(), StatusCode::OK);
        let res =
            test::call_service(&app, test::TestRequest::get().uri("/metrics").to_request()).await;
        assert_eq!(res.status(), expected);
    }
}
