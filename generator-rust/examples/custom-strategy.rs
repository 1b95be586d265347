//! Serve an extra provider identifier by registering another strategy. Here
//! a self-hosted OpenAI-compatible server is exposed as `local`.

use uigen::{
    openai::{OpenAICompatibleStrategy, OpenAICompatibleStrategyOptions},
    Dispatcher, DispatcherOptions, Provider, ProviderConfiguration, StrategyRegistry,
};

#[tokio::main]
async fn main() {
    let mut registry = StrategyRegistry::with_defaults(DispatcherOptions::default());
    registry.register(
        Provider::from("local".to_string()),
        OpenAICompatibleStrategy::new(
            "local",
            "http://localhost:11434/v1",
            "qwen2.5-coder",
            OpenAICompatibleStrategyOptions::default(),
        ),
    );

    let dispatcher = Dispatcher::new(registry);

    let configuration = ProviderConfiguration {
        provider: Provider::from("local".to_string()),
        api_key: "unused".to_string(),
        model: String::new(),
        base_url: None,
    };

    match dispatcher
        .generate("Responsive navbar with mega-menu and dark mode toggle", &configuration)
        .await
    {
        Ok(generation) => println!("{}", generation.component.preview_html),
        Err(error) => eprintln!("{error}"),
    }
}
