use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use actix_cors::Cors;
use fixsight::api::{configure_routes, AppState};
use fixsight::{banner, config};
use rust_embed::RustEmbed;
use std::borrow::Cow;

#[derive(RustEmbed)]
#[folder = "static/"]
struct StaticAssets;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Print the startup banner
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  No .env file loaded: {}", e);
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let app_config = config::AppConfig::from_env();

    // A missing credential is a persistent user-visible condition, not a
    // startup failure: the page shows the banner and every analysis trigger
    // is rejected before any network activity.
    match &app_config.gemini {
        Some(g) => println!("✅ GEMINI_API_KEY set, using model: {}", g.model),
        None => eprintln!("❌ GEMINI_API_KEY not set — analysis requests will be rejected"),
    }

    let bind_addr = app_config.bind_addr.clone();
    let state = AppState::new(app_config);

    println!("🚀 Starting server...");
    println!("🔧 Frontend available at http://127.0.0.1:{}", bind_addr.1);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::JsonConfig::default().limit(fixsight::UPLOAD_BODY_LIMIT))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
            .route("/{_:.*}", web::get().to(static_file_handler))
    })
    .bind(bind_addr)?
    .run()
    .await
}

async fn static_file_handler(req: HttpRequest) -> impl Responder {
    let path = if req.path() == "/" {
        "index.html"
    } else {
        // trim leading '/'
        &req.path()[1..]
    };

    match StaticAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            HttpResponse::Ok().content_type(mime.as_ref()).body(Cow::into_owned(content.data))
        }
        None => HttpResponse::NotFound().body("404 Not Found"),
    }
}
