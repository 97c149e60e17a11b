use crate::api::routes;
use crate::config::SharedConfig;
use crate::error::Error;
use crate::interactions::dispatch::Dispatcher;
use axum::Router;
use ed25519_dalek::VerifyingKey;
use std::future::Future;
use std::sync::Arc;

#[derive(Clone)]
pub(super) struct AppState {
    pub config: SharedConfig,
    pub verifying_key: VerifyingKey,
    pub dispatcher: Arc<Dispatcher>,
}

/// Build the application router without binding a listener. Split out from [`new`] so tests
/// can drive it directly as a `tower` service.
///
/// # Errors
///
/// Returns [`Error::InvalidPublicKey`] if the configured public key can't be decoded.
pub fn router(config: SharedConfig, dispatcher: Arc<Dispatcher>) -> Result<Router, Error> {
    let verifying_key = config.verifying_key()?;
    Ok(routes::new(AppState {
        config,
        verifying_key,
        dispatcher,
    }))
}

/// Bind the configured address and serve the API.
///
/// # Errors
///
/// See [`router`].
pub fn new(
    config: SharedConfig,
    dispatcher: Arc<Dispatcher>,
) -> Result<impl Future<Output = hyper::Result<()>>, Error> {
    let app = router(config.clone(), dispatcher)?;
    Ok(axum::Server::bind(&config.api_bind_addr).serve(app.into_make_service()))
}
