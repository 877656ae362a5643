use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Result;

use squad_manager::{Config, SquadRepositoryFactory, routes};

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    println!("🚀 Starting Squad Manager service...");

    let config = Config::from_env()?;
    println!(
        "📋 Configuration loaded (environment: {}, database: {} / {})",
        config.environment, config.database_url, config.database_name
    );

    // The parent connection is dialed on the first request, not here.
    let factory = web::Data::new(SquadRepositoryFactory::new(config.clone()));

    let server_address = config.server_address();
    println!("🌐 Server starting on http://{}", server_address);

    let app_factory = factory.clone();
    let result = HttpServer::new(move || {
        App::new()
            .app_data(app_factory.clone())
            .wrap(Logger::new(r#"%a "%r" %s %b "%{User-Agent}i" %T"#))
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await;

    factory.close().await;
    println!("👋 Squad Manager service stopped");

    result.map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
