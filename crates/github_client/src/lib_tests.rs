//! Unit tests for the github_client crate.

use super::*; // Import items from lib.rs
use serde_json::json;
use wiremock::matchers::{
    body_json, header_regex, method, path, query_param, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

// --- Test Constants ---
const TEST_OWNER: &str = "test-owner";
const TEST_REPO: &str = "test-repo";
const TEST_TOKEN: &str = "ghs_test_token";

fn create_client(mock_server: &MockServer) -> GitHubClient {
    let token = SecretString::from(TEST_TOKEN.to_string());
    let octocrab = create_token_client_with_base_uri(&token, &mock_server.uri())
        .expect("Failed to create Octocrab client for mock server");
    GitHubClient::new(octocrab)
}

fn issue_json(number: u64, login: &str, is_pull_request: bool) -> serde_json::Value {
    let mut value = json!({
        "number": number,
        "title": format!("Record {number}"),
        "state": "open",
        "user": { "id": 1, "login": login },
        "labels": []
    });
    if is_pull_request {
        value["pull_request"] = json!({
            "url": format!("https://api.github.com/repos/{TEST_OWNER}/{TEST_REPO}/pulls/{number}"),
            "html_url": format!("https://github.com/{TEST_OWNER}/{TEST_REPO}/pull/{number}"),
            "merged_at": null
        });
    }
    value
}

#[tokio::test]
async fn test_add_labels_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/issues/42/labels")))
        .and(body_json(json!({ "labels": ["bug", "first-time-contributor"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "name": "bug", "color": "d73a4a" },
            { "id": 2, "name": "first-time-contributor", "color": "0e8a16" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let labels = vec!["bug".to_string(), "first-time-contributor".to_string()];

    let result = client.add_labels(TEST_OWNER, TEST_REPO, 42, &labels).await;

    let applied = result.expect("add_labels should succeed");
    assert_eq!(applied.len(), 2);
    assert_eq!(applied[0].name, "bug");
}

#[tokio::test]
async fn test_add_labels_sends_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/issues/1/labels")))
        .and(header_regex("authorization", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);

    let result = client
        .add_labels(TEST_OWNER, TEST_REPO, 1, &["bug".to_string()])
        .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_add_labels_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/issues/404/labels")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest/issues/labels#add-labels-to-an-issue"
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);

    let result = client
        .add_labels(TEST_OWNER, TEST_REPO, 404, &["bug".to_string()])
        .await;

    assert!(matches!(result, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_list_pull_requests_requests_single_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/pulls")))
        .and(query_param("state", "all"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "link",
                    format!(
                        "<{}/repos/{TEST_OWNER}/{TEST_REPO}/pulls?state=all&per_page=100&page=3>; rel=\"next\"",
                        mock_server.uri()
                    )
                    .as_str(),
                )
                .set_body_json(json!([
                    { "number": 101, "title": "First", "state": "open", "draft": false, "merged_at": null },
                    { "number": 102, "title": "Second", "state": "closed", "draft": false, "merged_at": "2024-01-02T03:04:05Z" }
                ])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);
    let query = PullRequestListQuery {
        state: StateFilter::All,
        per_page: 100,
        page: 2,
    };

    let result = client.list_pull_requests(TEST_OWNER, TEST_REPO, &query).await;

    let pulls = result.expect("list_pull_requests should succeed");
    assert_eq!(pulls.len(), 2);
    assert_eq!(pulls[0].number, 101);
    assert!(pulls[1].merged_at.is_some());
    // `.expect(1)` on the mock verifies the next page link was not followed
}

#[tokio::test]
async fn test_get_issue_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/issues/7")))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_json(7, "alice", false)))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);

    let issue = client
        .get_issue(TEST_OWNER, TEST_REPO, 7)
        .await
        .expect("get_issue should succeed");

    assert_eq!(issue.number, 7);
    assert_eq!(issue.author_login(), Some("alice"));
    assert!(!issue.is_pull_request());
}

#[tokio::test]
async fn test_get_issue_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/issues/7")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);

    let result = client.get_issue(TEST_OWNER, TEST_REPO, 7).await;

    match result {
        Err(Error::AuthError(message)) => assert_eq!(message, "Bad credentials"),
        other => panic!("Expected AuthError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_issue_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/issues/7")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "API rate limit exceeded for installation ID 1.",
            "documentation_url": "https://docs.github.com/rest/overview/resources-in-the-rest-api#rate-limiting"
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);

    let result = client.get_issue(TEST_OWNER, TEST_REPO, 7).await;

    assert!(matches!(result, Err(Error::RateLimitExceeded)));
}

#[tokio::test]
async fn test_get_issue_unprocessable_maps_to_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/issues/7")))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);

    let result = client.get_issue(TEST_OWNER, TEST_REPO, 7).await;

    match result {
        Err(Error::ApiError { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "Validation Failed");
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_get_issue_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/issues/7")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "title": "no number" })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);

    let result = client.get_issue(TEST_OWNER, TEST_REPO, 7).await;

    assert!(matches!(result, Err(Error::InvalidResponse)));
}

#[tokio::test]
async fn test_list_issues_by_creator_follows_pagination() {
    let mock_server = MockServer::start().await;
    let issues_path = format!("/repos/{TEST_OWNER}/{TEST_REPO}/issues");

    Mock::given(method("GET"))
        .and(path(issues_path.as_str()))
        .and(query_param("creator", "alice"))
        .and(query_param("state", "all"))
        .and(query_param("per_page", "100"))
        .and(query_param_is_missing("page"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "link",
                    format!(
                        "<{}{issues_path}?creator=alice&state=all&per_page=100&page=2>; rel=\"next\", <{}{issues_path}?creator=alice&state=all&per_page=100&page=2>; rel=\"last\"",
                        mock_server.uri(),
                        mock_server.uri()
                    )
                    .as_str(),
                )
                .set_body_json(json!([
                    issue_json(1, "alice", true),
                    issue_json(2, "alice", false)
                ])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(issues_path.as_str()))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            issue_json(3, "alice", true)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);

    let records = client
        .list_issues_by_creator(TEST_OWNER, TEST_REPO, "alice", StateFilter::All)
        .await
        .expect("list_issues_by_creator should succeed");

    let numbers: Vec<u64> = records.iter().map(|r| r.number).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(records.iter().filter(|r| r.is_pull_request()).count(), 2);
}

#[tokio::test]
async fn test_list_issues_by_creator_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/issues")))
        .and(query_param("creator", "newcomer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);

    let records = client
        .list_issues_by_creator(TEST_OWNER, TEST_REPO, "newcomer", StateFilter::All)
        .await
        .expect("list_issues_by_creator should succeed");

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_create_comment_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/issues/42/comments")))
        .and(body_json(json!({ "body": "Thanks for your first PR!" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 555,
            "body": "Thanks for your first PR!",
            "user": { "id": 2, "login": "github-actions[bot]" },
            "html_url": "https://github.com/test-owner/test-repo/issues/42#issuecomment-555"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);

    let comment = client
        .create_comment(TEST_OWNER, TEST_REPO, 42, "Thanks for your first PR!")
        .await
        .expect("create_comment should succeed");

    assert_eq!(comment.id, 555);
}

#[tokio::test]
async fn test_create_comment_forbidden() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/issues/42/comments")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "message": "Resource not accessible by integration",
            "documentation_url": "https://docs.github.com/rest/issues/comments#create-an-issue-comment"
        })))
        .mount(&mock_server)
        .await;

    let client = create_client(&mock_server);

    let result = client
        .create_comment(TEST_OWNER, TEST_REPO, 42, "hello")
        .await;

    assert!(matches!(result, Err(Error::AuthError(_))));
}

#[test]
fn test_create_token_client_with_invalid_base_uri() {
    let runtime = tokio::runtime::Runtime::new().expect("runtime should start");
    let _guard = runtime.enter();
    let token = SecretString::from(TEST_TOKEN.to_string());

    let result = create_token_client_with_base_uri(&token, "not a valid uri");

    assert!(matches!(result, Err(Error::InvalidBaseUri(_))));
}
