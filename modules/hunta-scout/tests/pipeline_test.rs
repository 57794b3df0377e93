//! Search pipeline scenarios: fetch → extract against mocked outbound services.

use std::sync::Arc;

use hunta_common::{SearchQuery, SiteProfile};
use hunta_scout::testing::{candidates_json, page_of_len, pipeline_with, MockModel, MockProxy};
use hunta_scout::{
    CompletionModel, ExtractError, Extractor, FetchError, Fetcher, PipelineError, SearchPipeline,
};

fn query(term: &str) -> SearchQuery {
    SearchQuery::parse(term).unwrap()
}

#[tokio::test]
async fn successful_search_returns_normalized_listings() {
    let proxy = Arc::new(MockProxy::returning(page_of_len(2_000)));
    let model = Arc::new(MockModel::returning(candidates_json(4)));
    let pipeline = pipeline_with(&proxy, &model);

    let listings = pipeline.run(&query("bicycle")).await.unwrap();

    assert_eq!(listings.len(), 4);
    for listing in &listings {
        assert!(!listing.title.is_empty());
        assert!(!listing.price.is_empty());
        assert!(listing.link.starts_with("https://www.gumtree.com/"));
        assert_eq!(listing.source, "Gumtree");
    }
    assert_eq!(proxy.call_count(), 1);
    assert_eq!(model.call_count(), 1);
}

#[tokio::test]
async fn short_page_fails_at_fetch_and_skips_extraction() {
    let proxy = Arc::new(MockProxy::returning(page_of_len(50)));
    let model = Arc::new(MockModel::returning(candidates_json(4)));
    let pipeline = pipeline_with(&proxy, &model);

    let err = pipeline.run(&query("bicycle")).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Fetch(FetchError::InsufficientContent { len: 50, .. })
    ));
    assert_eq!(err.kind(), "fetch");
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn proxy_error_is_forwarded_unchanged() {
    let proxy = Arc::new(MockProxy::failing("API error (status 401): invalid api key"));
    let model = Arc::new(MockModel::returning("[]"));
    let pipeline = pipeline_with(&proxy, &model);

    let err = pipeline.run(&query("bicycle")).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Failed to fetch search page: API error (status 401): invalid api key"
    );
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn non_object_array_is_parse_error() {
    let proxy = Arc::new(MockProxy::returning(page_of_len(500)));
    let model = Arc::new(MockModel::returning(r#"["not an array of objects", 5]"#));
    let pipeline = pipeline_with(&proxy, &model);

    let err = pipeline.run(&query("bicycle")).await.unwrap_err();

    assert!(matches!(err, PipelineError::Extract(ExtractError::Parse(_))));
    assert_eq!(err.kind(), "parse");
}

#[tokio::test]
async fn stray_non_objects_are_filtered_not_fatal() {
    let output = serde_json::json!([
        { "title": "Desk", "price": "£30", "link": "/p/desk/1" },
        "advert",
        { "title": "Chair", "price": "£10", "link": "/p/chair/2" }
    ])
    .to_string();
    let proxy = Arc::new(MockProxy::returning(page_of_len(500)));
    let model = Arc::new(MockModel::returning(output));
    let pipeline = pipeline_with(&proxy, &model);

    let listings = pipeline.run(&query("furniture")).await.unwrap();

    let titles: Vec<_> = listings.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, ["Desk", "Chair"]);
}

#[tokio::test]
async fn malformed_json_is_parse_error() {
    let proxy = Arc::new(MockProxy::returning(page_of_len(500)));
    let model = Arc::new(MockModel::returning("```json\n[{\"title\": \"Bike\",\n```"));
    let pipeline = pipeline_with(&proxy, &model);

    let err = pipeline.run(&query("bicycle")).await.unwrap_err();
    assert_eq!(err.kind(), "parse");
}

#[tokio::test]
async fn completion_failure_is_extraction_error() {
    let proxy = Arc::new(MockProxy::returning(page_of_len(500)));
    let model = Arc::new(MockModel::failing("Request timed out: deadline has elapsed"));
    let pipeline = pipeline_with(&proxy, &model);

    let err = pipeline.run(&query("bicycle")).await.unwrap_err();

    assert!(matches!(err, PipelineError::Extract(ExtractError::Extraction(_))));
    assert_eq!(err.kind(), "extraction");
}

#[tokio::test]
async fn fifteen_candidates_keep_first_ten_in_order() {
    let proxy = Arc::new(MockProxy::returning(page_of_len(500)));
    let model = Arc::new(MockModel::returning(candidates_json(15)));
    let pipeline = pipeline_with(&proxy, &model);

    let listings = pipeline.run(&query("bicycle")).await.unwrap();

    assert_eq!(listings.len(), 10);
    for (i, listing) in listings.iter().enumerate() {
        assert_eq!(listing.title, format!("Item {}", i + 1));
    }
}

#[tokio::test]
async fn candidate_without_price_is_dropped() {
    let output = serde_json::json!([
        { "title": "Desk", "price": "£30", "link": "/p/desk/1" },
        { "title": "Chair", "link": "/p/chair/2" },
        { "title": "Shelf", "price": "£15", "link": "https://www.gumtree.com/p/shelf/3", "image": null }
    ])
    .to_string();
    let proxy = Arc::new(MockProxy::returning(page_of_len(500)));
    let model = Arc::new(MockModel::returning(output));
    let pipeline = pipeline_with(&proxy, &model);

    let listings = pipeline.run(&query("furniture")).await.unwrap();

    let titles: Vec<_> = listings.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, ["Desk", "Shelf"]);
    assert_eq!(listings[0].link, "https://www.gumtree.com/p/desk/1");
    assert_eq!(listings[1].link, "https://www.gumtree.com/p/shelf/3");
    assert_eq!(listings[1].image, None);
}

#[tokio::test]
async fn all_candidates_invalid_is_empty_success() {
    let proxy = Arc::new(MockProxy::returning(page_of_len(500)));
    let model = Arc::new(MockModel::returning(r#"[{"title": "No price or link"}]"#));
    let pipeline = pipeline_with(&proxy, &model);

    let listings = pipeline.run(&query("bicycle")).await.unwrap();
    assert!(listings.is_empty());
}

#[tokio::test]
async fn unconfigured_proxy_makes_no_outbound_calls() {
    let model = Arc::new(MockModel::returning(candidates_json(2)));
    let site = SiteProfile::gumtree();
    let pipeline = SearchPipeline::new(
        Fetcher::new(None, site.clone()),
        Extractor::new(Some(model.clone() as Arc<dyn CompletionModel>), site),
    );

    let err = pipeline.run(&query("bicycle")).await.unwrap_err();

    assert!(matches!(err, PipelineError::Fetch(FetchError::NotConfigured(_))));
    assert_eq!(model.call_count(), 0);
}
