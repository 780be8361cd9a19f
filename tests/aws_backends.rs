//! DynamoDB and SSM clients against a mocked AWS endpoint
//!
//! Both services speak JSON over POST with the operation in `x-amz-target`,
//! so wiremock can stand in for them.
//!
//! Run with: cargo test --test aws_backends

use aws_sdk_dynamodb::config::retry::RetryConfig;
use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use cloud_resume::visitor::{count_visit, DynamoVisitorStore, VisitClassification, VisitorStore};
use serde_json::json;
use shared::{AppError, CachedSecretResolver, Config, SecretResolver, SsmSecretResolver, StaticSecretResolver};
use wiremock::matchers::{body_string_contains, header, method};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

const DYNAMO_JSON: &str = "application/x-amz-json-1.0";
const SSM_JSON: &str = "application/x-amz-json-1.1";
const SALT_PARAMETER: &str = "/cloud-resume/visitor-counter/ip-salt";

fn dynamo_store(server: &MockServer) -> DynamoVisitorStore {
    let config = aws_sdk_dynamodb::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("eu-north-1"))
        .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
        .endpoint_url(server.uri())
        .retry_config(RetryConfig::disabled())
        .build();
    DynamoVisitorStore::new(
        aws_sdk_dynamodb::Client::from_conf(config),
        &Config::default().visitor,
    )
}

fn ssm_resolver(server: &MockServer) -> SsmSecretResolver {
    let config = aws_sdk_ssm::Config::builder()
        .behavior_version(aws_sdk_ssm::config::BehaviorVersion::latest())
        .region(aws_sdk_ssm::config::Region::new("eu-north-1"))
        .credentials_provider(aws_sdk_ssm::config::Credentials::new(
            "AKIDTEST", "secret", None, None, "test",
        ))
        .endpoint_url(server.uri())
        .retry_config(aws_sdk_ssm::config::retry::RetryConfig::disabled())
        .build();
    SsmSecretResolver::new(aws_sdk_ssm::Client::from_conf(config))
}

fn dynamo(operation: &str) -> MockBuilder {
    Mock::given(method("POST")).and(header(
        "x-amz-target",
        format!("DynamoDB_20120810.{}", operation).as_str(),
    ))
}

fn dynamo_ok(body: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), DYNAMO_JSON)
}

fn dynamo_error(status: u16, error_type: &str) -> ResponseTemplate {
    let body = json!({
        "__type": format!("com.amazonaws.dynamodb.v20120810#{}", error_type),
        "message": "mocked failure"
    });
    ResponseTemplate::new(status).set_body_raw(body.to_string(), DYNAMO_JSON)
}

fn get_parameter() -> MockBuilder {
    Mock::given(method("POST")).and(header("x-amz-target", "AmazonSSM.GetParameter"))
}

#[tokio::test]
async fn test_insert_writes_conditionally() {
    let server = MockServer::start().await;
    dynamo("PutItem")
        .and(body_string_contains("attribute_not_exists(#ip)"))
        .and(body_string_contains("VisitorIPsIAC"))
        .respond_with(dynamo_ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let inserted = dynamo_store(&server).insert_visitor_if_absent("abc123").await.unwrap();
    assert!(inserted);
}

#[tokio::test]
async fn test_failed_condition_means_already_recorded() {
    let server = MockServer::start().await;
    dynamo("PutItem")
        .respond_with(dynamo_error(400, "ConditionalCheckFailedException"))
        .expect(1)
        .mount(&server)
        .await;

    let inserted = dynamo_store(&server).insert_visitor_if_absent("abc123").await.unwrap();
    assert!(!inserted);
}

#[tokio::test]
async fn test_other_put_failures_are_store_errors() {
    for (status, error_type) in [
        (400, "ProvisionedThroughputExceededException"),
        (500, "InternalServerError"),
    ] {
        let server = MockServer::start().await;
        dynamo("PutItem")
            .respond_with(dynamo_error(status, error_type))
            .expect(1)
            .mount(&server)
            .await;

        let err = dynamo_store(&server)
            .insert_visitor_if_absent("abc123")
            .await
            .unwrap_err();
        assert!(
            matches!(err, AppError::Store { ref operation, .. } if operation == "put_item"),
            "{} {} gave {:?}",
            status,
            error_type,
            err
        );
    }
}

#[tokio::test]
async fn test_increment_reads_updated_count() {
    let server = MockServer::start().await;
    dynamo("UpdateItem")
        .and(body_string_contains("ADD #c :inc"))
        .and(body_string_contains("UPDATED_NEW"))
        .respond_with(dynamo_ok(json!({"Attributes": {"count": {"N": "7"}}})))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(dynamo_store(&server).increment_count().await.unwrap(), 7);
}

#[tokio::test]
async fn test_increment_without_attributes_is_store_error() {
    let server = MockServer::start().await;
    dynamo("UpdateItem")
        .respond_with(dynamo_ok(json!({})))
        .mount(&server)
        .await;

    let err = dynamo_store(&server).increment_count().await.unwrap_err();
    assert!(matches!(err, AppError::Store { ref operation, .. } if operation == "update_item"));
}

#[tokio::test]
async fn test_reads_of_missing_rows() {
    let server = MockServer::start().await;
    dynamo("GetItem")
        .respond_with(dynamo_ok(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let store = dynamo_store(&server);
    assert!(!store.visitor_exists("abc123").await.unwrap());
    assert_eq!(store.current_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_reads_of_existing_rows() {
    let server = MockServer::start().await;
    dynamo("GetItem")
        .and(body_string_contains("VisitorIPsIAC"))
        .respond_with(dynamo_ok(json!({"Item": {"ip": {"S": "abc123"}}})))
        .mount(&server)
        .await;
    dynamo("GetItem")
        .and(body_string_contains("VisitorCounterIAC"))
        .respond_with(dynamo_ok(
            json!({"Item": {"id": {"S": "visitor_count"}, "count": {"N": "42"}}}),
        ))
        .mount(&server)
        .await;

    let store = dynamo_store(&server);
    assert!(store.visitor_exists("abc123").await.unwrap());
    assert_eq!(store.current_count().await.unwrap(), 42);
}

#[tokio::test]
async fn test_losing_the_insert_race_does_not_increment() {
    let server = MockServer::start().await;
    dynamo("GetItem")
        .and(body_string_contains("VisitorIPsIAC"))
        .respond_with(dynamo_ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    dynamo("PutItem")
        .respond_with(dynamo_error(400, "ConditionalCheckFailedException"))
        .expect(1)
        .mount(&server)
        .await;
    dynamo("GetItem")
        .and(body_string_contains("VisitorCounterIAC"))
        .respond_with(dynamo_ok(
            json!({"Item": {"id": {"S": "visitor_count"}, "count": {"N": "5"}}}),
        ))
        .expect(1)
        .mount(&server)
        .await;
    dynamo("UpdateItem")
        .respond_with(dynamo_ok(json!({"Attributes": {"count": {"N": "6"}}})))
        .expect(0)
        .mount(&server)
        .await;

    let secrets = StaticSecretResolver::new().with_secret(SALT_PARAMETER, "pepper");
    let outcome = count_visit(&secrets, &dynamo_store(&server), SALT_PARAMETER, "203.0.113.9")
        .await
        .unwrap();

    assert_eq!(outcome.classification, VisitClassification::ExistingVisitor);
    assert_eq!(outcome.count, 5);
}

#[tokio::test]
async fn test_first_visit_over_dynamo_increments() {
    let server = MockServer::start().await;
    dynamo("GetItem")
        .respond_with(dynamo_ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    dynamo("PutItem")
        .respond_with(dynamo_ok(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    dynamo("UpdateItem")
        .respond_with(dynamo_ok(json!({"Attributes": {"count": {"N": "8"}}})))
        .expect(1)
        .mount(&server)
        .await;

    let secrets = StaticSecretResolver::new().with_secret(SALT_PARAMETER, "pepper");
    let outcome = count_visit(&secrets, &dynamo_store(&server), SALT_PARAMETER, "203.0.113.9")
        .await
        .unwrap();

    assert_eq!(outcome.classification, VisitClassification::NewVisitor);
    assert_eq!(outcome.count, 8);
}

#[tokio::test]
async fn test_parameter_is_read_with_decryption() {
    let server = MockServer::start().await;
    get_parameter()
        .and(body_string_contains("\"WithDecryption\":true"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            json!({
                "Parameter": {
                    "Name": SALT_PARAMETER,
                    "Type": "SecureString",
                    "Value": "pepper",
                    "Version": 3
                }
            })
            .to_string(),
            SSM_JSON,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let secrets = CachedSecretResolver::new(ssm_resolver(&server));
    assert_eq!(secrets.resolve(SALT_PARAMETER).await.unwrap(), "pepper");
    assert_eq!(secrets.resolve(SALT_PARAMETER).await.unwrap(), "pepper");
}

#[tokio::test]
async fn test_missing_parameter_is_secret_unavailable() {
    let server = MockServer::start().await;
    get_parameter()
        .respond_with(ResponseTemplate::new(400).set_body_raw(
            json!({"__type": "ParameterNotFound", "message": "mocked failure"}).to_string(),
            SSM_JSON,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let err = ssm_resolver(&server).resolve(SALT_PARAMETER).await.unwrap_err();
    assert!(matches!(err, AppError::SecretUnavailable { ref name, .. } if name == SALT_PARAMETER));
}

#[tokio::test]
async fn test_parameter_without_value_is_secret_unavailable() {
    let server = MockServer::start().await;
    get_parameter()
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            json!({"Parameter": {"Name": SALT_PARAMETER, "Type": "SecureString", "Version": 1}})
                .to_string(),
            SSM_JSON,
        ))
        .mount(&server)
        .await;

    let err = ssm_resolver(&server).resolve(SALT_PARAMETER).await.unwrap_err();
    assert!(
        matches!(err, AppError::SecretUnavailable { ref message, .. } if message == "parameter has no value")
    );
}
