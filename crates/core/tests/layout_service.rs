//! Integration tests for layout lookups.

mod support;

use std::sync::Arc;

use fmbridge_core::{LayoutService, ValueListOptions};
use fmbridge_domain::{
    DatasourceConfig, DatasourceId, DriverError, HttpFailure, OperationResult, ServerFailure,
};
use serde_json::json;
use support::{datasource, GatewayCall, MockCredentialStore, MockGateway, MockGatewayFactory};

fn service_with(datasource: DatasourceConfig) -> (LayoutService, Arc<MockGateway>) {
    let gateway = Arc::new(MockGateway::new("Web"));
    let service = LayoutService::new(
        Arc::new(MockCredentialStore::with("7", datasource)),
        Arc::new(MockGatewayFactory::new(gateway.clone())),
    );
    (service, gateway)
}

fn metadata_result() -> OperationResult {
    OperationResult::from_envelope(
        200,
        &json!({
            "response": {
                "fieldMetaData": [
                    {"name": "Color", "type": "normal", "result": "text", "valueList": "Colors"}
                ],
                "valueLists": [{
                    "name": "Colors",
                    "type": "customList",
                    "values": [{"value": "R", "displayValue": "Red"}, {"value": "Green"}]
                }]
            },
            "messages": [{"code": "0", "message": "OK"}]
        }),
    )
}

#[tokio::test]
async fn incomplete_datasource_aborts_silently() {
    let (service, gateway) =
        service_with(DatasourceConfig::new("fms.example.com", "", "web", "secret"));

    let metadata = service.layout_metadata(&DatasourceId::new("7"), "Web").await.unwrap();

    assert!(metadata.is_none());
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn loads_layout_metadata() {
    let (service, gateway) = service_with(datasource());
    gateway.respond(Ok(metadata_result()));

    let metadata =
        service.layout_metadata(&DatasourceId::new("7"), "Web").await.unwrap().unwrap();

    assert_eq!(metadata.field("Color").and_then(|f| f.value_list.as_deref()), Some("Colors"));
    assert_eq!(gateway.calls(), vec![GatewayCall::LayoutMetadata]);
}

#[tokio::test]
async fn tag_options_resolve_value_list() {
    let (service, gateway) = service_with(datasource());
    gateway.respond(Ok(metadata_result()));

    let options = service
        .options_for_tag(
            &DatasourceId::new("7"),
            "Web",
            &["include_blank".to_string(), "data:fm_value_list-Colors".to_string()],
        )
        .await
        .unwrap();

    assert_eq!(options.values, vec!["R", "Green"]);
    assert_eq!(options.labels, vec!["Red", "Green"]);
}

#[tokio::test]
async fn failed_metadata_request_yields_placeholder() {
    let (service, gateway) = service_with(datasource());
    gateway.respond(Err(DriverError::response(
        Some(HttpFailure::new(500, "Internal Server Error")),
        Some(ServerFailure::new(105, "Layout is missing")),
    )));

    let options = service
        .options_for_tag(
            &DatasourceId::new("7"),
            "Gone",
            &["data:fm_value_list-Colors".to_string()],
        )
        .await;

    assert_eq!(options, Some(ValueListOptions::retrieval_error()));
}

#[tokio::test]
async fn tags_without_value_list_are_untouched() {
    let (service, gateway) = service_with(datasource());

    let options = service
        .options_for_tag(&DatasourceId::new("7"), "Web", &["use_label_element".to_string()])
        .await;

    assert!(options.is_none());
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn layout_names_are_flattened() {
    let (service, gateway) = service_with(datasource());
    gateway.respond(Ok(OperationResult::from_envelope(
        200,
        &json!({
            "response": {"layouts": [
                {"name": "Web"},
                {"name": "Admin", "isFolder": true, "folderLayoutNames": [{"name": "Staff"}]}
            ]},
            "messages": [{"code": "0", "message": "OK"}]
        }),
    )));

    let names = service.layout_names(&DatasourceId::new("7")).await.unwrap();

    assert_eq!(names, vec!["Web", "Staff"]);
}
