use serde_json::json;
use wiremock::matchers::{basic_auth, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use wp_publish_lib::config::WordPressConfig;
use wp_publish_lib::document::{parse, MetadataParser};
use wp_publish_lib::error::PublishError;
use wp_publish_lib::markup::MarkupConverter;
use wp_publish_lib::publisher::{PostRecord, PostStatus, Publisher};

const USER: &str = "editor";
const PASSWORD: &str = "abcd efgh ijkl";

async fn publish_blocking(
    base_url: String,
    source: &'static str,
    status: PostStatus,
) -> Result<PostRecord, PublishError> {
    tokio::task::spawn_blocking(move || {
        let document = parse(source, MetadataParser::Yaml);
        let content = MarkupConverter::Html.convert(&document.body);
        let publisher = Publisher::new(WordPressConfig::new(base_url, USER, PASSWORD))?;
        publisher.publish(&document.metadata, content, status)
    })
    .await
    .expect("publish task panicked")
}

#[tokio::test(flavor = "multi_thread")]
async fn update_posts_to_resource_path_with_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wp/v2/posts/42"))
        .and(basic_auth(USER, PASSWORD))
        .and(body_partial_json(json!({
            "title": "Hello",
            "slug": "hello",
            "status": "draft",
            "content": "<h1>Hi</h1>\n",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "slug": "hello",
            "link": "http://x/hello",
            "status": "draft",
            "title": {"rendered": "Hello"},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = publish_blocking(
        server.uri(),
        "---\ntitle: Hello\nslug: hello\nwordpress_id: 42\n---\n# Hi\n",
        PostStatus::Draft,
    )
    .await
    .expect("update succeeds");

    assert_eq!(record.id, 42);
    assert_eq!(record.link, "http://x/hello");
    assert_eq!(record.title.rendered, "Hello");
}

#[tokio::test(flavor = "multi_thread")]
async fn create_posts_to_collection_with_excerpt_and_tags() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wp/v2/posts"))
        .and(body_partial_json(json!({
            "title": "New",
            "status": "publish",
            "excerpt": "Fresh content",
            "tags": ["rust"],
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 101,
            "slug": "new-post",
            "link": "http://x/new-post",
            "status": "publish",
            "title": {"rendered": "New"},
        })))
        .expect(1)
        .mount(&server)
        .await;

    let record = publish_blocking(
        format!("{}/", server.uri()),
        "---\ntitle: New\nslug: new-post\ntags: [rust]\nseo:\n  description: Fresh content\n---\nBody\n",
        PostStatus::Publish,
    )
    .await
    .expect("create succeeds");

    assert_eq!(record.id, 101);
    assert_eq!(record.status, "publish");
}

#[tokio::test(flavor = "multi_thread")]
async fn server_error_carries_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/wp-json/wp/v2/posts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = publish_blocking(server.uri(), "# No metadata\n", PostStatus::Draft)
        .await
        .unwrap_err();

    match err {
        PublishError::RemoteApi { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_host_is_transport_error() {
    let err = publish_blocking(
        "http://127.0.0.1:1".to_string(),
        "# No metadata\n",
        PostStatus::Draft,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, PublishError::Transport(_)), "{err:?}");
}
