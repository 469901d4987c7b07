use axum::{
    middleware,
    response::Redirect,
    routing::{get, get_service, post},
    Router,
};
use dotenvy::dotenv;
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use std::net::SocketAddr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use nucleo_esporte::services::session_service;
use nucleo_esporte::web::middleware::auth as auth_middleware;
use nucleo_esporte::web::routes::{
    auth, cep, listing, pages, profile, promo, register, search, waitlist,
};

#[tokio::main]
async fn main() {
    // Carrega o .env
    dotenv().ok();

    // 1. Start logging
    tracing_subscriber::fmt::init();

    // 2. Conecta no banco
    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL precisa estar no .env");
    println!("Conectando ao banco: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("Não foi possível conectar ao banco");

    // Limpeza periódica de sessões expiradas
    session_service::spawn_cleanup_task(pool.clone());

    // 3. Rotas protegidas sob uma única camada de middleware
    let protected_routes = Router::new()
        .route("/busca", get(search::busca_handler))
        .route("/estabelecimentos", get(search::establishments_handler))
        .route("/grupos", get(search::groups_handler))
        .route(
            "/estabelecimentos/:establishment_id",
            get(listing::establishment_detail_handler),
        )
        .route("/grupos/:group_id", get(listing::group_detail_handler))
        .route("/favoritos", get(listing::favorites_handler))
        .route(
            "/listings/:listing_id/favorite",
            post(listing::favorite_command_handler),
        )
        .route(
            "/listings/:listing_id/reviews",
            post(listing::review_command_handler),
        )
        .route(
            "/perfil",
            get(profile::profile_page).post(profile::profile_update_handler),
        )
        .route("/promo", post(promo::promo_apply_handler))
        .route("/admin/promos", get(promo::admin_promos_handler))
        .route("/logout", post(auth::logout_handler))
        .layer(middleware::from_fn_with_state(
            pool.clone(),
            auth_middleware::require_auth,
        ));

    // 4. Monta a aplicação inteira
    let mut app = Router::new()
        // Public routes
        .route("/", get(|| async { Redirect::to("/busca") }))
        .route("/login", get(auth::login_page).post(auth::login_handler))
        .route(
            "/cadastro",
            get(register::register_page).post(register::register_handler),
        )
        .route("/lista-espera", post(waitlist::waitlist_handler))
        .route("/api/cep/:cep", get(cep::cep_lookup_handler));

    // Landing pages: one flat route per entry, all through the same handler.
    for page in pages::all() {
        app = app.route(&page.path, get(pages::landing_handler));
    }

    let app = app
        // Protected routes
        .merge(protected_routes)
        // Static files
        .nest_service(
            "/assets",
            get_service(ServeDir::new("assets")).layer(SetResponseHeaderLayer::if_not_present(
                CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            )),
        )
        // Layers
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        // State
        .with_state(pool);

    // 5. Sobe o servidor (com porta de fallback)
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("HOST/PORT inválidos");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!(
                "⚠️  Não consegui escutar em {}: {}. Tentando fallback {}:{}",
                addr,
                e,
                host,
                port + 1
            );
            let fallback: SocketAddr = format!("{}:{}", host, port + 1)
                .parse()
                .expect("Fallback inválido");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("Não consegui escutar na porta de fallback")
        }
    };

    let bound_addr = listener.local_addr().unwrap();
    println!("🚀 Servidor no ar em http://{}", bound_addr);
    println!("📍 Acesse http://{}/login para começar", bound_addr);

    axum::serve(listener, app).await.unwrap();
}
