use uigen::{Provider, ProviderConfiguration};

pub fn get_configuration(provider: &str, model: &str) -> ProviderConfiguration {
    let provider = Provider::from(provider.to_string());
    let key_var = match provider {
        Provider::Gemini => "GEMINI_API_KEY",
        Provider::OpenAI => "OPENAI_API_KEY",
        Provider::Anthropic => "ANTHROPIC_API_KEY",
        Provider::DeepSeek => "DEEPSEEK_API_KEY",
        Provider::XAI => "XAI_API_KEY",
        Provider::Other(ref id) => panic!("Unsupported provider: {id}"),
    };

    ProviderConfiguration {
        provider,
        api_key: std::env::var(key_var)
            .unwrap_or_else(|_| panic!("{key_var} environment variable must be set")),
        model: model.to_string(),
        base_url: None,
    }
}
