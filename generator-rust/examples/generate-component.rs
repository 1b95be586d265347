use dotenvy::dotenv;
use uigen::{Dispatcher, DispatcherOptions};

mod common;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let provider = std::env::args().nth(1).unwrap_or_else(|| "openai".to_string());
    let configuration = common::get_configuration(&provider, "");

    let dispatcher = Dispatcher::with_defaults(DispatcherOptions::default());

    let generation = dispatcher
        .generate(
            "SaaS pricing table with toggle for monthly/annual billing",
            &configuration,
        )
        .await
        .unwrap();

    println!("{} ({} via {})", generation.component.name, generation.model, generation.provider);
    println!("{}", generation.component.description);
    println!("{}", generation.component.code);
}
