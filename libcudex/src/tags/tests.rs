use super::*;
use mockito::Matcher;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn page_body(next: Option<&str>, names: &[&str]) -> String {
    let results: Vec<serde_json::Value> = names
        .iter()
        .map(|name| serde_json::json!({ "name": name, "last_updated": "2024-01-01T00:00:00Z" }))
        .collect();
    serde_json::json!({ "count": names.len(), "next": next, "results": results }).to_string()
}

#[test]
fn test_tag_page_deserialization_with_null_next() {
    let page: TagPage = serde_json::from_str(&page_body(None, &["a", "b"])).unwrap();

    assert_eq!(page.next, None);
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].name, "a");
}

#[test]
fn test_tag_page_deserialization_without_fields() {
    let page: TagPage = serde_json::from_str("{}").unwrap();

    assert_eq!(page.next, None);
    assert!(page.results.is_empty());
}

#[test]
fn test_filter_excludes_tags_without_lib_marker() {
    let tags = strings(&[
        "12.2.0-devel-ubuntu22.04",
        "12.2.0-cudnn8-devel-ubuntu22.04",
        "12.2.0-runtime-ubuntu22.04",
    ]);

    assert_eq!(
        filter_tags(tags),
        strings(&["12.2.0-cudnn8-devel-ubuntu22.04"])
    );
}

#[test]
fn test_filter_excludes_release_candidates() {
    let tags = strings(&[
        "12.4.0-cudnn-devel-ubuntu22.04-rc",
        "12.4.0-cudnn-devel-ubuntu22.04",
    ]);

    assert_eq!(
        filter_tags(tags),
        strings(&["12.4.0-cudnn-devel-ubuntu22.04"])
    );
}

#[test]
fn test_filter_keeps_rc_marker_in_the_middle() {
    // Only the suffix marks a release candidate
    let tags = strings(&["12.0.0-cudnn8-rc-devel-ubuntu22.04"]);

    assert_eq!(filter_tags(tags.clone()), tags);
}

#[test]
fn test_sort_descending_is_lexicographic() {
    let mut tags = strings(&["a-2", "a-10", "a-1"]);
    sort_descending(&mut tags);

    assert_eq!(tags, strings(&["a-2", "a-10", "a-1"]));
}

#[test]
fn test_sort_descending_versions() {
    let mut tags = strings(&[
        "11.8.0-cudnn8-devel-ubuntu22.04",
        "12.2.0-cudnn8-devel-ubuntu22.04",
        "9.2-cudnn7-devel-ubuntu18.04",
        "12.2.0-cudnn8-devel-ubuntu20.04",
    ]);
    sort_descending(&mut tags);

    assert_eq!(
        tags,
        strings(&[
            "9.2-cudnn7-devel-ubuntu18.04",
            "12.2.0-cudnn8-devel-ubuntu22.04",
            "12.2.0-cudnn8-devel-ubuntu20.04",
            "11.8.0-cudnn8-devel-ubuntu22.04",
        ])
    );
}

#[test]
fn test_select_candidates_filters_then_sorts() {
    let tags = strings(&[
        "11.8.0-cudnn8-devel-ubuntu22.04",
        "12.1.0-devel-ubuntu22.04",
        "12.1.0-cudnn8-devel-ubuntu22.04",
        "12.3.0-cudnn9-devel-ubuntu22.04-rc",
    ]);

    assert_eq!(
        select_candidates(tags),
        strings(&[
            "12.1.0-cudnn8-devel-ubuntu22.04",
            "11.8.0-cudnn8-devel-ubuntu22.04",
        ])
    );
}

#[test]
fn test_select_candidates_empty() {
    assert!(select_candidates(Vec::new()).is_empty());
}

#[tokio::test]
async fn test_fetch_all_tags_single_page() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v2/repositories/nvidia/cuda/tags/")
        .with_status(200)
        .with_body(page_body(None, &["b", "a"]))
        .create_async()
        .await;

    let client = Client::new(&server.url(), None).unwrap();
    let url = format!("{}/v2/repositories/nvidia/cuda/tags/", server.url());
    let tags = fetch_all_tags(&client, &url).await.unwrap();

    mock.assert_async().await;
    assert_eq!(tags, strings(&["b", "a"]));
}

#[tokio::test]
async fn test_fetch_all_tags_concatenates_pages_in_order() {
    let mut server = mockito::Server::new_async().await;
    let base = format!("{}/v2/repositories/nvidia/cuda/tags/", server.url());
    let page2 = format!("{}?page=2", base);
    let page3 = format!("{}?page=3", base);

    server
        .mock("GET", "/v2/repositories/nvidia/cuda/tags/")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_body(page_body(Some(&page2), &["z", "y"]))
        .create_async()
        .await;
    server
        .mock("GET", "/v2/repositories/nvidia/cuda/tags/")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(page_body(Some(&page3), &[]))
        .create_async()
        .await;
    server
        .mock("GET", "/v2/repositories/nvidia/cuda/tags/")
        .match_query(Matcher::UrlEncoded("page".into(), "3".into()))
        .with_status(200)
        .with_body(page_body(None, &["a"]))
        .create_async()
        .await;

    let client = Client::new(&server.url(), None).unwrap();
    let tags = fetch_all_tags(&client, &base).await.unwrap();

    assert_eq!(tags, strings(&["z", "y", "a"]));
}

#[tokio::test]
async fn test_fetch_all_tags_resolves_relative_next() {
    let mut server = mockito::Server::new_async().await;
    let base = format!("{}/v2/repositories/nvidia/cuda/tags/", server.url());

    server
        .mock("GET", "/v2/repositories/nvidia/cuda/tags/")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_body(page_body(Some("?page=2"), &["first"]))
        .create_async()
        .await;
    server
        .mock("GET", "/v2/repositories/nvidia/cuda/tags/")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(page_body(None, &["second"]))
        .create_async()
        .await;

    let client = Client::new(&server.url(), None).unwrap();
    let tags = fetch_all_tags(&client, &base).await.unwrap();

    assert_eq!(tags, strings(&["first", "second"]));
}

#[tokio::test]
async fn test_fetch_all_tags_empty_listing() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/tags")
        .with_status(200)
        .with_body(page_body(None, &[]))
        .create_async()
        .await;

    let client = Client::new(&server.url(), None).unwrap();
    let tags = fetch_all_tags(&client, &format!("{}/tags", server.url()))
        .await
        .unwrap();

    assert!(tags.is_empty());
}

#[tokio::test]
async fn test_fetch_all_tags_failing_page_aborts() {
    let mut server = mockito::Server::new_async().await;
    let base = format!("{}/tags", server.url());
    let page2 = format!("{}?page=2", base);

    server
        .mock("GET", "/tags")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_body(page_body(Some(&page2), &["kept-only-on-success"]))
        .create_async()
        .await;
    server
        .mock("GET", "/tags")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let client = Client::new(&server.url(), None).unwrap();
    let err = fetch_all_tags(&client, &base).await.unwrap_err();

    assert!(matches!(err, CudexError::Server { .. }));
    assert!(err.to_string().contains("page=2"));
}

#[tokio::test]
async fn test_fetch_all_tags_undecodable_page() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/tags")
        .with_status(200)
        .with_body(r#"{"results": "not a list"}"#)
        .create_async()
        .await;

    let client = Client::new(&server.url(), None).unwrap();
    let result = fetch_all_tags(&client, &format!("{}/tags", server.url())).await;

    assert!(matches!(result.unwrap_err(), CudexError::Format { .. }));
}

#[tokio::test]
async fn test_fetch_all_tags_detects_cycle() {
    let mut server = mockito::Server::new_async().await;
    let base = format!("{}/tags", server.url());

    server
        .mock("GET", "/tags")
        .with_status(200)
        .with_body(page_body(Some(&base), &["loop"]))
        .create_async()
        .await;

    let client = Client::new(&server.url(), None).unwrap();
    let result = fetch_all_tags(&client, &base).await;

    assert!(matches!(result.unwrap_err(), CudexError::Validation { .. }));
}

#[test]
fn test_select_candidates_drops_duplicates() {
    let tags = strings(&[
        "12.1.0-cudnn8-devel-ubuntu22.04",
        "11.8.0-cudnn8-devel-ubuntu22.04",
        "12.1.0-cudnn8-devel-ubuntu22.04",
    ]);

    assert_eq!(
        select_candidates(tags),
        strings(&[
            "12.1.0-cudnn8-devel-ubuntu22.04",
            "11.8.0-cudnn8-devel-ubuntu22.04",
        ])
    );
}

#[tokio::test]
async fn test_tag_repeated_across_pages_is_selected_once() {
    let mut server = mockito::Server::new_async().await;
    let base = format!("{}/tags", server.url());
    let page2 = format!("{}?page=2", base);

    server
        .mock("GET", "/tags")
        .match_query(Matcher::Missing)
        .with_status(200)
        .with_body(page_body(
            Some(&page2),
            &["12.1.0-cudnn8-devel-ubuntu22.04", "12.2.0-cudnn8-devel-ubuntu22.04"],
        ))
        .create_async()
        .await;
    server
        .mock("GET", "/tags")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(page_body(None, &["12.1.0-cudnn8-devel-ubuntu22.04"]))
        .create_async()
        .await;

    let client = Client::new(&server.url(), None).unwrap();
    let tags = fetch_all_tags(&client, &base).await.unwrap();
    assert_eq!(tags.len(), 3);

    assert_eq!(
        select_candidates(tags),
        strings(&[
            "12.2.0-cudnn8-devel-ubuntu22.04",
            "12.1.0-cudnn8-devel-ubuntu22.04",
        ])
    );
}
