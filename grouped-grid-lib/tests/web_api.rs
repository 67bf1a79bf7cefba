//! Live tests against a Dataverse environment.
//!
//! These tests require a reachable environment and are ignored by default.
//! To run them, create a `.env` file in the grouped-grid-lib directory with:
//!
//! ```env
//! DATAVERSE_URL=https://org.crm.dynamics.com
//! DATAVERSE_TOKEN=eyJ0eXAiOi...
//! ```
//!
//! Then run: `cargo test -p grouped-grid-lib -- --ignored`

use std::env;
use std::sync::Arc;

use grouped_grid_lib::GridService;
use grouped_grid_lib::MetadataHost;
use grouped_grid_lib::auth::StaticTokenProvider;
use grouped_grid_lib::host::WebApiHost;

fn load_env() -> Option<(String, String)> {
    let _ = dotenvy::dotenv();

    let url = env::var("DATAVERSE_URL").ok()?;
    let token = env::var("DATAVERSE_TOKEN").ok()?;

    Some((url, token))
}

fn host() -> WebApiHost {
    let (url, token) =
        load_env().expect("Missing required environment variables. See module docs.");
    WebApiHost::builder()
        .url(url)
        .token_provider(StaticTokenProvider::new(token))
        .build()
        .expect("Failed to build host")
}

#[tokio::test]
#[ignore = "requires real credentials in .env file"]
async fn test_entity_metadata() {
    let metadata = host()
        .get_entity_metadata("incident", &["statuscode", "customerid"])
        .await
        .expect("Metadata request failed");

    assert_eq!(metadata.primary_id_attribute, "incidentid");
    let status = metadata.attribute("statuscode").expect("statuscode missing");
    assert!(!status.option_set.is_empty());
    let customer = metadata.attribute("customerid").expect("customerid missing");
    assert!(customer.targets.iter().any(|t| t == "account"));
}

#[tokio::test]
#[ignore = "requires real credentials in .env file"]
async fn test_option_set_order() {
    let service = GridService::new(Arc::new(host()), "incident");
    let labels = service
        .option_labels("statuscode")
        .await
        .expect("Option set request failed");
    assert!(!labels.is_empty());
}

#[tokio::test]
#[ignore = "requires real credentials in .env file"]
async fn test_retrieve_records() {
    let records = host()
        .retrieve_multiple_records("incident", "?$select=title,statuscode&$top=3")
        .await
        .expect("Query failed");

    assert!(records.len() <= 3);
    for record in &records {
        assert_eq!(record.entity_name(), "incident");
        assert!(!record.record_id().is_empty());
    }
}
