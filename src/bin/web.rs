use nba_props_ev::config::AppConfig;
use nba_props_ev::server::build_router;
use nba_props_ev::AppState;

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();

    println!("Loading props from {}...", config.props_path().display());

    // Load and enrich the dataset once; requests serve this snapshot
    let state = AppState::from_config(&config);
    match state.snapshot.as_ref() {
        Ok(rows) => {
            println!("Data loaded successfully");
            println!("  - {} props enriched", rows.len());
            println!(
                "  - {} with positive EV",
                rows.iter().filter(|r| r.ev_per_dollar > 0.0).count()
            );
        }
        Err(e) => {
            eprintln!("Error loading data: {}", e);
            eprintln!("Server will start but /analyze will report the error");
        }
    }

    if let Some(base_url) = &config.vllm_base_url {
        println!("LLM explanations enabled via {}", base_url);
    }

    let addr = config.socket_addr();
    println!("\nStarting web server at http://{}", addr);
    println!("Press Ctrl+C to stop\n");

    let app = build_router(state);

    // Run server
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    axum::serve(listener, app).await.unwrap();
}
