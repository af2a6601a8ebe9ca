//! Controller → HTTP client → server → generator, over a real socket.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use form_builder::builder::{FormBuilder, GenerationOutcome};
use form_builder::client::GenFormClient;
use form_builder::engine::provider::{CompletionProvider, CompletionRequest};
use form_builder::engine::FieldGenerator;
use form_builder::error::{AppError, INVALID_INPUT_MESSAGE};
use form_builder::models::{FieldOrGroup, FieldVariant};
use form_builder::server::{router, ServerState};

struct StubProvider(Result<&'static str, &'static str>);

#[async_trait]
impl CompletionProvider for StubProvider {
    fn provider_name(&self) -> &'static str {
        "stub"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<String, AppError> {
        self.0
            .map(str::to_string)
            .map_err(|e| AppError::Provider(e.to_string()))
    }
}

const REPLY: &str = r#"[
    {"name":"email","type":"string","variant":"Input","label":"Email","placeholder":"you@example.com","required":true,"value":""},
    {"name":"terms","type":"boolean","variant":"Checkbox","label":"Terms","checked":false,"value":false}
]"#;

async fn spawn_server(provider: StubProvider) -> String {
    let state = Arc::new(ServerState {
        generator: FieldGenerator::new(Arc::new(provider), "gpt-4o", 1500),
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn generate_installs_flat_field_list() {
    let base = spawn_server(StubProvider(Ok(REPLY))).await;
    let client = GenFormClient::new(base, Duration::from_secs(10)).unwrap();

    let mut builder = FormBuilder::new();
    builder.set_interface_text("interface Signup { email: string; terms: boolean }");

    assert_eq!(builder.generate_fields(&client).await, GenerationOutcome::Applied);
    assert_eq!(builder.fields().len(), 2);
    match &builder.fields()[1] {
        FieldOrGroup::Field(f) => {
            assert_eq!(f.variant, FieldVariant::Checkbox);
            assert_eq!(f.row_index, 1);
        }
        FieldOrGroup::Group(_) => panic!("generated fields must not be grouped"),
    }
    assert!(!builder.has_error());
}

#[tokio::test]
async fn downstream_failure_leaves_tree_unchanged() {
    let base = spawn_server(StubProvider(Err("model overloaded"))).await;
    let client = GenFormClient::new(base, Duration::from_secs(10)).unwrap();

    let mut builder = FormBuilder::new();
    builder.add_field(FieldVariant::Input, None);
    builder.set_interface_text("interface A { b: string }");
    let before = builder.fields().to_vec();

    assert_eq!(builder.generate_fields(&client).await, GenerationOutcome::Failed);
    assert_eq!(builder.fields(), before.as_slice());
    assert!(builder.has_error());
    assert!(!builder.is_loading());
}

#[tokio::test]
async fn blank_interface_text_is_rejected() {
    let base = spawn_server(StubProvider(Ok(REPLY))).await;
    let client = GenFormClient::new(base, Duration::from_secs(10)).unwrap();

    let err = client
        .generate(Some(&serde_json::json!("")))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(ref m) if m == INVALID_INPUT_MESSAGE));

    let err = client.generate(None).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}
