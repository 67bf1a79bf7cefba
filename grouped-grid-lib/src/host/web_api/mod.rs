//! Dataverse Web API host

mod wire;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;
use url::Url;

use self::wire::AttributeCore;
use self::wire::ChoiceAttribute;
use self::wire::Collection;
use self::wire::EntityCore;
use self::wire::LookupAttribute;
use super::MetadataHost;
use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::error::Error;
use crate::error::MetadataError;
use crate::model::EntityMetadata;
use crate::model::Record;
use crate::model::metadata::AttributeMetadata;
use crate::model::metadata::AttributeType;

/// [`MetadataHost`] backed by the Dataverse Web API.
///
/// This host is cheap to clone (uses `Arc` internally) and can be shared
/// across threads safely.
///
/// # Example
///
/// ```ignore
/// use grouped_grid_lib::auth::StaticTokenProvider;
/// use grouped_grid_lib::host::WebApiHost;
///
/// let host = WebApiHost::builder()
///     .url("https://org.crm.dynamics.com")
///     .token_provider(StaticTokenProvider::new("my-token"))
///     .build()?;
/// ```
#[derive(Clone)]
pub struct WebApiHost {
    inner: Arc<WebApiHostInner>,
}

struct WebApiHostInner {
    base_url: String,
    api_version: String,
    token_provider: Arc<dyn TokenProvider>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl WebApiHost {
    /// Creates a new builder for constructing a host.
    pub fn builder() -> WebApiHostBuilder<Missing, Missing> {
        WebApiHostBuilder::new()
    }

    /// Returns the base URL of the Dataverse environment.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the API version being used.
    pub fn api_version(&self) -> &str {
        &self.inner.api_version
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/data/{}/{}",
            self.inner.base_url.trim_end_matches('/'),
            self.inner.api_version,
            path
        )
    }

    /// Makes an authenticated GET request and decodes the JSON body.
    ///
    /// A 404 is reported as `Ok(None)` so callers can map it to the
    /// matching [`MetadataError`].
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, Error> {
        let token = self
            .inner
            .token_provider
            .get_token(&self.inner.base_url)
            .await?;

        let mut headers = HeaderMap::new();
        headers.insert("OData-MaxVersion", HeaderValue::from_static("4.0"));
        headers.insert("OData-Version", HeaderValue::from_static("4.0"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        headers.insert(
            "Prefer",
            HeaderValue::from_static("odata.include-annotations=\"*\""),
        );

        let mut request = self
            .inner
            .http_client
            .get(url)
            .headers(headers)
            .bearer_auth(&token.access_token);

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        log::debug!("GET {}", url);
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.inner.timeout.unwrap_or_default())
            } else {
                ApiError::from(e)
            }
        })?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }

        let body = response.text().await.map_err(ApiError::from)?;
        if !status.is_success() {
            return Err(ApiError::http(status.as_u16(), body).into());
        }

        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body).into())
    }

    async fn fetch_entity_core(&self, entity: &str) -> Result<EntityCore, Error> {
        let url = self.api_url(&format!(
            "EntityDefinitions(LogicalName='{}')?$select=LogicalName,EntitySetName,PrimaryIdAttribute,PrimaryNameAttribute",
            entity
        ));
        self.get_json(&url).await?.ok_or_else(|| {
            MetadataError::EntityNotFound {
                name: entity.to_string(),
            }
            .into()
        })
    }

    async fn fetch_attribute(
        &self,
        entity: &str,
        attribute: &str,
    ) -> Result<AttributeMetadata, Error> {
        let base = format!(
            "EntityDefinitions(LogicalName='{}')/Attributes(LogicalName='{}')",
            entity, attribute
        );

        let core: AttributeCore = self
            .get_json(&self.api_url(&format!(
                "{}?$select=LogicalName,AttributeType,DisplayName",
                base
            )))
            .await?
            .ok_or_else(|| MetadataError::attribute_not_found(entity, attribute))?;

        let mut metadata = AttributeMetadata::new(core.logical_name, core.attribute_type);
        metadata.display_name = core.display_name.text().map(str::to_string);

        if let Some(cast) = choice_cast(core.attribute_type) {
            let url = self.api_url(&format!(
                "{}/Microsoft.Dynamics.CRM.{}?$select=LogicalName&$expand=OptionSet,GlobalOptionSet",
                base, cast
            ));
            let choice: ChoiceAttribute = self.get_json(&url).await?.unwrap_or_default();
            metadata.option_set = choice.options();
        } else if metadata.is_lookup() {
            let url = self.api_url(&format!(
                "{}/Microsoft.Dynamics.CRM.LookupAttributeMetadata?$select=Targets",
                base
            ));
            let lookup: LookupAttribute = self.get_json(&url).await?.unwrap_or_default();
            metadata.targets = lookup.targets;
        }

        Ok(metadata)
    }
}

/// Name of the derived metadata type that exposes an attribute's options.
fn choice_cast(attribute_type: AttributeType) -> Option<&'static str> {
    match attribute_type {
        AttributeType::Picklist => Some("PicklistAttributeMetadata"),
        AttributeType::State => Some("StateAttributeMetadata"),
        AttributeType::Status => Some("StatusAttributeMetadata"),
        AttributeType::Boolean => Some("BooleanAttributeMetadata"),
        _ => None,
    }
}

#[async_trait]
impl MetadataHost for WebApiHost {
    async fn get_entity_metadata(
        &self,
        entity: &str,
        attributes: &[&str],
    ) -> Result<EntityMetadata, Error> {
        let core = self.fetch_entity_core(entity).await?;

        let mut metadata = EntityMetadata::new(core.logical_name, core.primary_id_attribute);
        metadata.entity_set_name = core.entity_set_name;
        metadata.primary_name_attribute = core.primary_name_attribute;

        let fetched = futures::future::try_join_all(
            attributes
                .iter()
                .map(|attribute| self.fetch_attribute(entity, attribute)),
        )
        .await?;
        for attribute in fetched {
            metadata = metadata.with_attribute(attribute);
        }

        Ok(metadata)
    }

    async fn retrieve_multiple_records(
        &self,
        entity: &str,
        query: &str,
    ) -> Result<Vec<Record>, Error> {
        let core = self.fetch_entity_core(entity).await?;
        let entity_set = core
            .entity_set_name
            .clone()
            .unwrap_or_else(|| format!("{}s", entity));

        let url = self.api_url(&format!("{}{}", entity_set, query));
        let collection: Collection<Record> = self.get_json(&url).await?.ok_or_else(|| {
            MetadataError::EntityNotFound {
                name: entity.to_string(),
            }
        })?;

        let mut records = collection.value;
        for record in &mut records {
            record.set_entity_name(entity);
            if !record.assign_id_from(&core.primary_id_attribute) {
                log::warn!(
                    "{} record without {}; keeping it unidentified",
                    entity,
                    core.primary_id_attribute
                );
            }
        }
        Ok(records)
    }

    async fn open_form(&self, entity: &str, id: &str) -> Result<(), Error> {
        let url = form_url(&self.inner.base_url, entity, id)?;
        log::debug!("opening {}", url);
        open::that(url.as_str()).map_err(|e| ApiError::Navigation(e.to_string()))?;
        Ok(())
    }
}

/// URL of the main form for a record.
fn form_url(base_url: &str, entity: &str, id: &str) -> Result<Url, ApiError> {
    let base = format!("{}/", base_url.trim_end_matches('/'));
    let mut url = Url::parse(&base)
        .and_then(|base| base.join("main.aspx"))
        .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
    url.query_pairs_mut()
        .append_pair("etn", entity)
        .append_pair("id", id)
        .append_pair("pagetype", "entityrecord");
    Ok(url)
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`WebApiHost`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `url` - The Dataverse environment URL
/// - `token_provider` - A [`TokenProvider`] implementation
pub struct WebApiHostBuilder<U, P> {
    url: U,
    token_provider: P,
    api_version: String,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl WebApiHostBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: Missing,
            api_version: "v9.2".to_string(),
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }
}

impl Default for WebApiHostBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> WebApiHostBuilder<Missing, P> {
    /// Sets the Dataverse environment URL.
    pub fn url(self, url: impl Into<String>) -> WebApiHostBuilder<Set<String>, P> {
        WebApiHostBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            api_version: self.api_version,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U> WebApiHostBuilder<U, Missing> {
    /// Sets the token provider for authentication.
    pub fn token_provider<T: TokenProvider + 'static>(
        self,
        provider: T,
    ) -> WebApiHostBuilder<U, Set<Arc<dyn TokenProvider>>> {
        WebApiHostBuilder {
            url: self.url,
            token_provider: Set(Arc::new(provider) as Arc<dyn TokenProvider>),
            api_version: self.api_version,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U, P> WebApiHostBuilder<U, P> {
    /// Sets the API version to use.
    ///
    /// Defaults to `v9.2`.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout, applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl WebApiHostBuilder<Set<String>, Set<Arc<dyn TokenProvider>>> {
    /// Builds the [`WebApiHost`].
    ///
    /// This method is only available when both `url` and `token_provider` have been set.
    pub fn build(self) -> Result<WebApiHost, Error> {
        Url::parse(&self.url.0)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", self.url.0, e)))?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ApiError::from)?
            }
        };

        Ok(WebApiHost {
            inner: Arc::new(WebApiHostInner {
                base_url: self.url.0,
                api_version: self.api_version,
                token_provider: self.token_provider.0,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;

    #[test]
    fn form_url_carries_record_parameters() {
        let url = form_url("https://org.crm.dynamics.com/", "incident", "abc").unwrap();
        assert_eq!(
            url.as_str(),
            "https://org.crm.dynamics.com/main.aspx?etn=incident&id=abc&pagetype=entityrecord"
        );
    }

    #[test]
    fn builder_rejects_invalid_url() {
        let result = WebApiHost::builder()
            .url("not a url")
            .token_provider(StaticTokenProvider::new("t"))
            .build();
        assert!(matches!(result, Err(Error::Api(ApiError::InvalidUrl(_)))));
    }

    #[test]
    fn api_url_includes_version() {
        let host = WebApiHost::builder()
            .url("https://org.crm.dynamics.com/")
            .token_provider(StaticTokenProvider::new("t"))
            .build()
            .unwrap();
        assert_eq!(
            host.api_url("incidents"),
            "https://org.crm.dynamics.com/api/data/v9.2/incidents"
        );
    }
}
