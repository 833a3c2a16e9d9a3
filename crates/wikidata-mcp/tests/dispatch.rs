use serde_json::{Map, Value, json};
use wikidata::{Config, WikidataClient};
use wikidata_mcp::Dispatcher;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn make_dispatcher(mock: &MockServer) -> Dispatcher {
    let config = Config {
        wikibase_api_url: format!("{}/w/api.php", mock.uri()),
        sparql_endpoint: format!("{}/sparql", mock.uri()),
        ..Config::default()
    };
    Dispatcher::new(WikidataClient::new(config).unwrap())
}

fn args(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        _ => panic!("arguments must be an object"),
    }
}

#[tokio::test]
async fn unknown_tool_is_reported_as_text() {
    let mock = MockServer::start().await;
    let result = make_dispatcher(&mock).call_tool("ghost_tool", None).await;

    assert!(result.is_error);
    assert_eq!(result.text, "Error executing ghost_tool: Unknown tool: ghost_tool");
    assert!(mock.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn bogus_relation_type_makes_no_request() {
    let mock = MockServer::start().await;
    let result = make_dispatcher(&mock)
        .call_tool(
            "get_relations",
            args(json!({"entity_id": "Q42", "relation_type": "bogus"})),
        )
        .await;

    assert!(result.is_error);
    assert_eq!(
        result.text,
        "Error executing get_relations: Invalid relation_type: bogus"
    );
    assert!(mock.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_required_argument() {
    let mock = MockServer::start().await;
    let result = make_dispatcher(&mock)
        .call_tool("find_by_property", args(json!({"property": "P496"})))
        .await;

    assert!(result.is_error);
    assert!(result.text.starts_with("Error executing find_by_property: "));
    assert!(result.text.contains("value"));
}

#[tokio::test]
async fn search_success_is_pretty_json() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("search", "Douglas Adams"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "search": [{"id": "Q42", "label": "Douglas Adams", "description": "English writer"}]
        })))
        .mount(&mock)
        .await;

    let result = make_dispatcher(&mock)
        .call_tool("search_entities", args(json!({"query": "Douglas Adams", "limit": "5"})))
        .await;

    assert!(!result.is_error, "{}", result.text);
    assert!(result.text.contains('\n'));
    let parsed: Value = serde_json::from_str(&result.text).unwrap();
    assert_eq!(
        parsed,
        json!({"entities": [{
            "id": "Q42",
            "label": "Douglas Adams",
            "description": "English writer",
            "url": "https://www.wikidata.org/entity/Q42"
        }]})
    );

    let requests = mock.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query().unwrap().contains("limit=5"));
}

#[tokio::test]
async fn entity_not_found_names_the_tool() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entities": {"Q999999999": {"id": "Q999999999", "missing": ""}}
        })))
        .mount(&mock)
        .await;

    let result = make_dispatcher(&mock)
        .call_tool("get_entity", args(json!({"entity_id": "Q999999999"})))
        .await;

    assert!(result.is_error);
    assert_eq!(result.text, "Error executing get_entity: Entity Q999999999 not found");
}

#[tokio::test]
async fn upstream_error_status_is_reported() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sparql"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&mock)
        .await;

    let result = make_dispatcher(&mock)
        .call_tool("sparql_query", args(json!({"query": "SELECT ?s WHERE { ?s ?p ?o }"})))
        .await;

    assert!(result.is_error);
    assert_eq!(
        result.text,
        "Error executing sparql_query: HTTP 503: Service Unavailable"
    );
}

#[tokio::test]
async fn find_by_property_round_trip() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sparql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "head": {"vars": ["item", "itemLabel"]},
            "results": {"bindings": [{
                "item": {"type": "uri", "value": "http://www.wikidata.org/entity/Q42"},
                "itemLabel": {"type": "literal", "value": "Douglas Adams"}
            }]}
        })))
        .mount(&mock)
        .await;

    let result = make_dispatcher(&mock)
        .call_tool(
            "find_by_property",
            args(json!({"property": "P496", "value": "0000-0002-1825-0097"})),
        )
        .await;

    assert!(!result.is_error, "{}", result.text);
    let parsed: Value = serde_json::from_str(&result.text).unwrap();
    assert_eq!(parsed["entities"][0], json!({"id": "Q42", "label": "Douglas Adams"}));
}
