use async_trait::async_trait;
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tokio::sync::Notify;
use uigen::{
    uigen_test::MockStrategy, CredentialSource, Dispatcher, GeneratedComponent, Generation,
    GenerationError, GenerationRequest, GenerationResult, GenerationStrategy, Provider,
    ProviderConfiguration, StrategyRegistry,
};
use uigen_studio::{
    KeyValueStore, MemoryStore, SessionStore, Studio, StudioError, HISTORY_KEY, SETTINGS_KEY,
};

fn component(name: &str) -> GeneratedComponent {
    GeneratedComponent {
        name: name.to_string(),
        description: format!("A {name}"),
        code: format!("export default function {}() {{ return <div />; }}", name.replace(' ', "")),
        preview_html: format!("<div>{name}</div>"),
    }
}

fn now_millis() -> i64 {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock after epoch");
    i64::try_from(elapsed.as_millis()).expect("timestamp fits")
}

fn dispatcher_with(strategy: Arc<dyn GenerationStrategy>) -> Dispatcher {
    let mut registry = StrategyRegistry::new();
    registry.register_arc(Provider::Gemini, strategy);
    Dispatcher::new(registry)
}

fn studio_with(
    mock: &Arc<MockStrategy>,
    store: Arc<MemoryStore>,
) -> Studio<Arc<MemoryStore>> {
    Studio::open(dispatcher_with(mock.clone()), SessionStore::new(store))
}

#[tokio::test]
async fn generate_stamps_and_records_the_artifact() {
    let mock = Arc::new(MockStrategy::new());
    mock.enqueue(component("Pricing Card"));
    let studio = studio_with(&mock, Arc::new(MemoryStore::new()));

    let before = now_millis();
    let artifact = studio.generate("a pricing card").await.unwrap();

    assert!(!artifact.id.is_empty());
    assert!(artifact.timestamp >= before);
    assert_eq!(artifact.name, "Pricing Card");
    assert_eq!(artifact.preview_html, "<div>Pricing Card</div>");
    assert_eq!(studio.current(), Some(artifact.clone()));
    assert_eq!(studio.history().as_slice(), [artifact]);
    assert!(!studio.is_busy());

    let requests = mock.tracked_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].prompt, "a pricing card");
    assert_eq!(requests[0].configuration, ProviderConfiguration::default());
}

#[tokio::test]
async fn history_is_most_recent_first() {
    let mock = Arc::new(MockStrategy::new());
    mock.enqueue_results(
        ["First", "Second", "Third"]
            .into_iter()
            .map(|name| component(name).into()),
    );
    let studio = studio_with(&mock, Arc::new(MemoryStore::new()));

    let mut ids = Vec::new();
    for prompt in ["one", "two", "three"] {
        ids.push(studio.generate(prompt).await.unwrap().id);
    }

    let history = studio.history();
    let names: Vec<&str> = history.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["Third", "Second", "First"]);

    let timestamps: Vec<i64> = history.iter().map(|a| a.timestamp).collect();
    assert!(timestamps.windows(2).all(|pair| pair[0] >= pair[1]));

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
    assert_eq!(studio.current().unwrap().name, "Third");
}

#[tokio::test]
async fn failed_generation_leaves_state_unchanged() {
    let mock = Arc::new(MockStrategy::new());
    mock.enqueue(component("Keeper"));
    mock.enqueue(GenerationError::EmptyResponse("gemini"));
    let studio = studio_with(&mock, Arc::new(MemoryStore::new()));

    let kept = studio.generate("keep me").await.unwrap();
    let error = studio.generate("fail").await.unwrap_err();

    assert!(matches!(
        error,
        StudioError::Generation(GenerationError::EmptyResponse("gemini"))
    ));
    assert_eq!(error.to_string(), "No content received from gemini");
    assert_eq!(studio.history().as_slice(), [kept.clone()]);
    assert_eq!(studio.current(), Some(kept));
    assert!(!studio.is_busy());
}

#[tokio::test]
async fn blank_prompt_is_rejected_without_calling_the_provider() {
    let mock = Arc::new(MockStrategy::new());
    let studio = studio_with(&mock, Arc::new(MemoryStore::new()));

    let error = studio.generate("   ").await.unwrap_err();

    assert!(matches!(
        error,
        StudioError::Generation(GenerationError::InvalidInput(_))
    ));
    assert!(mock.tracked_requests().is_empty());
    assert!(studio.history().is_empty());
    assert!(!studio.is_busy());
}

#[tokio::test]
async fn unsupported_provider_reaches_the_caller() {
    let mock = Arc::new(MockStrategy::new());
    let studio = studio_with(&mock, Arc::new(MemoryStore::new()));
    studio
        .update_settings(ProviderConfiguration::default().with_provider(Provider::OpenAI))
        .unwrap();

    let error = studio.generate("a button").await.unwrap_err();

    assert_eq!(error.to_string(), "Unsupported provider: openai");
    assert!(studio.history().is_empty());
}

struct GatedStrategy {
    started: Notify,
    release: Notify,
}

#[async_trait]
impl GenerationStrategy for GatedStrategy {
    fn provider(&self) -> &'static str {
        "gated"
    }

    async fn generate(&self, request: GenerationRequest) -> GenerationResult<Generation> {
        self.started.notify_one();
        self.release.notified().await;
        Ok(Generation {
            component: component("Slow Widget"),
            provider: "gated",
            model: request.configuration.model,
            credential: CredentialSource::Configuration,
        })
    }
}

#[tokio::test]
async fn only_one_generation_runs_at_a_time() {
    let gate = Arc::new(GatedStrategy {
        started: Notify::new(),
        release: Notify::new(),
    });
    let studio = Studio::open(
        dispatcher_with(gate.clone()),
        SessionStore::new(MemoryStore::new()),
    );

    let first = studio.generate("slow");
    let second = async {
        gate.started.notified().await;
        assert!(studio.is_busy());
        let result = studio.generate("impatient").await;
        gate.release.notify_one();
        result
    };
    let (first, second) = tokio::join!(first, second);

    assert!(matches!(second, Err(StudioError::Busy)));
    assert_eq!(first.unwrap().name, "Slow Widget");
    assert_eq!(studio.history().len(), 1);
    assert!(!studio.is_busy());
}

#[tokio::test]
async fn delete_clears_the_display_when_it_was_shown() {
    let mock = Arc::new(MockStrategy::new());
    mock.enqueue(component("Alpha"));
    mock.enqueue(component("Beta"));
    let studio = studio_with(&mock, Arc::new(MemoryStore::new()));

    let alpha = studio.generate("alpha").await.unwrap();
    let beta = studio.generate("beta").await.unwrap();

    studio.select(&alpha.id).unwrap();
    assert_eq!(studio.current(), Some(alpha.clone()));

    let removed = studio.delete(&alpha.id).unwrap();
    assert_eq!(removed, alpha);
    assert_eq!(studio.current(), None);
    assert_eq!(studio.history().as_slice(), [beta.clone()]);

    studio.select(&beta.id).unwrap();
    assert!(matches!(
        studio.delete(&alpha.id),
        Err(StudioError::NotFound(_))
    ));
    assert_eq!(studio.current(), Some(beta));
}

#[tokio::test]
async fn deleting_another_entry_keeps_the_display() {
    let mock = Arc::new(MockStrategy::new());
    mock.enqueue(component("Alpha"));
    mock.enqueue(component("Beta"));
    let studio = studio_with(&mock, Arc::new(MemoryStore::new()));

    let alpha = studio.generate("alpha").await.unwrap();
    let beta = studio.generate("beta").await.unwrap();

    studio.delete(&alpha.id).unwrap();
    assert_eq!(studio.current(), Some(beta));

    studio.clear_current();
    assert_eq!(studio.current(), None);
    assert_eq!(studio.history().len(), 1);
}

#[tokio::test]
async fn select_accepts_a_unique_id_prefix() {
    let mock = Arc::new(MockStrategy::new());
    mock.enqueue(component("Alpha"));
    let studio = studio_with(&mock, Arc::new(MemoryStore::new()));

    let alpha = studio.generate("alpha").await.unwrap();
    studio.clear_current();

    assert_eq!(studio.select(&alpha.id[..8]).unwrap(), alpha);
    assert_eq!(studio.find(&alpha.id).unwrap(), alpha);
    assert!(matches!(
        studio.select("no-such-id"),
        Err(StudioError::NotFound(_))
    ));
}

#[tokio::test]
async fn state_survives_a_restart() {
    let store = Arc::new(MemoryStore::new());
    let mock = Arc::new(MockStrategy::new());
    mock.enqueue(component("Alpha"));
    mock.enqueue(component("Beta"));

    let settings = ProviderConfiguration {
        provider: Provider::Anthropic,
        api_key: "sk-ant".to_string(),
        model: "claude-3-5-sonnet-latest".to_string(),
        base_url: None,
    };

    let history = {
        let studio = studio_with(&mock, store.clone());
        studio.generate("alpha").await.unwrap();
        let beta = studio.generate("beta").await.unwrap();
        studio.update_settings(settings.clone()).unwrap();
        studio.select(&beta.id).unwrap();
        studio.history()
    };

    let reopened = studio_with(&mock, store);
    assert_eq!(reopened.history(), history);
    assert_eq!(reopened.settings(), settings);
    assert_eq!(reopened.current(), None);
}

#[tokio::test]
async fn corrupt_stored_values_fall_back_to_defaults() {
    let store = Arc::new(MemoryStore::new());
    store.set(HISTORY_KEY, "not json").unwrap();
    store.set(SETTINGS_KEY, "{\"provider\":").unwrap();

    let studio = studio_with(&Arc::new(MockStrategy::new()), store);

    assert!(studio.history().is_empty());
    assert_eq!(studio.settings(), ProviderConfiguration::default());
}

#[tokio::test]
async fn updating_settings_leaves_history_alone() {
    let store = Arc::new(MemoryStore::new());
    let mock = Arc::new(MockStrategy::new());
    mock.enqueue(component("Alpha"));
    mock.enqueue(component("Beta"));
    let studio = studio_with(&mock, store.clone());

    let alpha = studio.generate("alpha").await.unwrap();
    let stored_history = store.get(HISTORY_KEY).unwrap();

    let settings = ProviderConfiguration {
        model: "gemini-2.5-pro".to_string(),
        ..studio.settings()
    };
    studio.update_settings(settings.clone()).unwrap();

    assert_eq!(studio.history().as_slice(), [alpha]);
    assert_eq!(store.get(HISTORY_KEY).unwrap(), stored_history);

    studio.generate("beta").await.unwrap();
    let requests = mock.tracked_requests();
    assert_eq!(requests[1].configuration, settings);
}
