/// Factory: build the shared `Authorizer` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::policy::authorizer::Authorizer;
use crate::services::policy::input::ConstantContextDataProvider;
use crate::services::policy::opa::{ClientBuildError, OpaClient};

pub fn build_authorizer(config: &Config) -> Result<Arc<Authorizer>, ClientBuildError> {
    let client = OpaClient::new(&config.opa_url, config.opa_timeout)?;

    let mut builder = Authorizer::builder()
        .client(Arc::new(client))
        .reason_key(config.opa_reason_key.clone());

    if let Some(path) = &config.opa_path {
        builder = builder.rule_path(path.clone());
    }
    if let Some(data) = &config.opa_context_data {
        builder = builder.context_data(Arc::new(ConstantContextDataProvider::new(data.clone())));
    }

    Ok(Arc::new(builder.build()?))
}
