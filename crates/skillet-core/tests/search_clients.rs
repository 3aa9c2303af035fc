use mockito::{Matcher, Server};
use serde_json::json;

use skillet_core::error::SkillError;
use skillet_core::github::{BroadSearch, GitHubSearch};
use skillet_core::registry::{IndexClient, SkillIndex};

#[tokio::test]
async fn code_search_is_used_with_a_token() {
    let mut server = Server::new_async().await;
    let code = server
        .mock("GET", "/search/code")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "filename:SKILL.md pdf".into()),
            Matcher::UrlEncoded("per_page".into(), "5".into()),
        ]))
        .match_header("authorization", "Bearer t0ken")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "total_count": 1,
                "items": [{
                    "path": "skills/pdf/SKILL.md",
                    "repository": { "full_name": "acme/skills", "description": "Docs" }
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let suggestions = GitHubSearch::new(Some("t0ken".into()))
        .unwrap()
        .with_api_base(server.url())
        .search("pdf")
        .await
        .unwrap();

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].repo, "acme/skills");
    assert_eq!(suggestions[0].path.as_deref(), Some("skills/pdf/SKILL.md"));
    code.assert_async().await;
}

#[tokio::test]
async fn repository_search_is_used_anonymously() {
    let mut server = Server::new_async().await;
    let items: Vec<_> = (0..8)
        .map(|i| json!({ "full_name": format!("user{i}/pdf-skill"), "description": null }))
        .collect();
    let repos = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::UrlEncoded(
            "q".into(),
            "pdf skill in:name,description".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "items": items }).to_string())
        .create_async()
        .await;

    let suggestions = GitHubSearch::new(None)
        .unwrap()
        .with_api_base(server.url())
        .search("pdf")
        .await
        .unwrap();

    assert_eq!(suggestions.len(), 5);
    assert!(suggestions.iter().all(|s| s.path.is_none()));
    repos.assert_async().await;
}

#[tokio::test]
async fn search_quota_maps_to_rate_limited() {
    let mut server = Server::new_async().await;
    let _repos = server
        .mock("GET", "/search/repositories")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_header("x-ratelimit-remaining", "0")
        .create_async()
        .await;

    let err = GitHubSearch::new(None)
        .unwrap()
        .with_api_base(server.url())
        .search("pdf")
        .await
        .unwrap_err();
    assert!(matches!(err, SkillError::RateLimited(_)));
}

#[tokio::test]
async fn index_rotates_keys_between_requests() {
    let mut server = Server::new_async().await;
    let body = json!({ "skills": [{ "name": "pdf", "owner": "acme", "repo": "skills", "path": "pdf", "stars": 12 }] })
        .to_string();
    let first = server
        .mock("GET", "/v1/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "pdf".into()),
            Matcher::UrlEncoded("limit".into(), "20".into()),
        ]))
        .match_header("authorization", "Bearer key-a")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(&body)
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/v1/search")
        .match_query(Matcher::Any)
        .match_header("authorization", "Bearer key-b")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(&body)
        .expect(1)
        .create_async()
        .await;

    let client = IndexClient::new(
        format!("{}/v1/search", server.url()),
        vec!["key-a".into(), "key-b".into()],
    )
    .unwrap();
    let hits = client.search("pdf").await.unwrap();
    client.search("pdf").await.unwrap();

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].popularity, 12);
    assert_eq!(hits[0].path.as_deref(), Some("pdf"));
    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn index_server_error_is_transient() {
    let mut server = Server::new_async().await;
    let _search = server
        .mock("GET", "/v1/search")
        .match_query(Matcher::Any)
        .with_status(502)
        .create_async()
        .await;

    let err = IndexClient::new(format!("{}/v1/search", server.url()), Vec::new())
        .unwrap()
        .search("pdf")
        .await
        .unwrap_err();
    assert!(err.is_transient());
}
