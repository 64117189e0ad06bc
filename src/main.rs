#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use axum_server as _; // to use rustls over openssl bc alpine linux

mod cache;
mod config;
mod error;
mod fetch;
mod locations;
mod parse;
mod pipeline;
mod totals;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, on, MethodFilter},
    Extension, Router,
};
use chrono::Utc;
use juniper::{graphql_object, EmptyMutation, EmptySubscription, FieldResult, RootNode};
use juniper_axum::{graphiql, graphql, playground, ws};
use juniper_graphql_ws::ConnectionConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::{compression::CompressionLayer, cors::Any};

use crate::{
    cache::Multithreaded,
    config::Config,
    fetch::Fetcher,
    locations::{available_dates, escape_date, today, AvailableDate, Location, MealKind, Registry},
    parse::{MenuResult, NutritionRecord, NutritionReport},
    pipeline::{Pipeline, SelectedItem},
    totals::{calculate_nutrition_totals, NutrientColumnsInput, NutritionTotals},
};

pub use error::Result;

#[derive(Debug)]
pub struct AppState {
    pipeline: Pipeline,
    cache: Multithreaded,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            cache: Multithreaded::default(),
        }
    }

    /// Warms the nutrition cache for a menu in the background.
    fn spawn_preload(self: &Arc<Self>, location_id: String, date: String, meal: MealKind) {
        let state = Arc::clone(self);
        tokio::spawn(async move {
            match state
                .cache
                .preload_nutrition(&state.pipeline, &location_id, &date, meal)
                .await
            {
                Ok(loaded) => log::info!("Preloaded {loaded} nutrition labels for {location_id} {meal}"),
                Err(e) => tracing::warn!("Error while preloading nutrition: {e}"),
            }
        });
    }
}

fn date_or_today(date: Option<String>) -> String {
    date.unwrap_or_else(|| escape_date(today()))
}

#[derive(Clone, Debug)]
pub struct Query(Arc<AppState>);

#[graphql_object]
impl Query {
    fn locations(&self) -> Vec<Location> {
        self.0.pipeline.registry().iter().cloned().collect()
    }

    /// Dates with published menus, starting today.
    fn dates() -> Vec<AvailableDate> {
        available_dates(today())
    }

    fn meals(&self, location_id: String) -> FieldResult<Vec<MealKind>> {
        Ok(self.0.pipeline.registry().available_meals(&location_id)?)
    }

    /// `date` is `MM%2fDD%2fYYYY` and defaults to today.
    async fn menu(
        &self,
        location_id: String,
        date: Option<String>,
        meal: MealKind,
    ) -> FieldResult<MenuResult> {
        let date = date_or_today(date);
        let state = &self.0;
        let cached = state.cache.has_menu(&location_id, meal, &date).await;
        let menu = state
            .cache
            .menu(&state.pipeline, &location_id, &date, meal)
            .await?;
        if !cached && menu.error.is_none() {
            state.spawn_preload(location_id, date, meal);
        }
        Ok(menu)
    }

    async fn all_meals(&self, location_id: String, date: Option<String>) -> FieldResult<Vec<MenuResult>> {
        let date = date_or_today(date);
        Ok(self
            .0
            .cache
            .all_meals(&self.0.pipeline, &location_id, &date)
            .await?)
    }

    async fn item_nutrition(
        &self,
        location_id: String,
        date: Option<String>,
        meal: MealKind,
        name: String,
    ) -> FieldResult<Option<NutritionRecord>> {
        let date = date_or_today(date);
        Ok(self
            .0
            .cache
            .item_nutrition(&self.0.pipeline, &location_id, &date, meal, &name)
            .await?)
    }

    async fn nutrition_report(
        &self,
        location_id: String,
        date: Option<String>,
        meal: MealKind,
        items: Option<Vec<SelectedItem>>,
    ) -> FieldResult<NutritionReport> {
        let date = date_or_today(date);
        let pipeline = &self.0.pipeline;
        let meal_name = pipeline.registry().resolve_meal_name(&location_id, meal)?;
        let items = items.unwrap_or_default();
        Ok(pipeline
            .fetch_nutrition_report(&location_id, &date, meal_name, &items)
            .await?)
    }

    /// Sums report rows the client has already scaled by quantity.
    fn nutrition_totals(items: Vec<NutrientColumnsInput>) -> NutritionTotals {
        calculate_nutrition_totals(&items)
    }
}

type Schema = RootNode<'static, Query, EmptyMutation, EmptySubscription>;

fn schema(state: Arc<AppState>) -> Schema {
    Schema::new(Query(state), EmptyMutation::new(), EmptySubscription::new())
}

#[cfg(all(target_env = "musl", target_pointer_width = "64"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

async fn health(State(state): State<Arc<AppState>>) -> Response {
    let cache = state.cache.get().await;
    let body = serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
        "locations": state.pipeline.registry().len(),
        "availableDates": available_dates(today()),
        "cache": {
            "day": cache.day(),
            "entries": cache.len(),
            "refreshInSecs": cache.time_until_refresh().num_seconds(),
        },
    });
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body.to_string(),
    )
        .into_response()
}

fn app(state: Arc<AppState>) -> Router {
    let compression_layer: CompressionLayer = CompressionLayer::new()
        .br(true)
        .deflate(true)
        .gzip(true)
        .zstd(true);
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(Any);

    Router::new()
        .route(
            "/graphql",
            on(
                MethodFilter::GET.or(MethodFilter::POST),
                graphql::<Arc<Schema>>,
            ),
        )
        .route(
            "/subscriptions",
            get(ws::<Arc<Schema>>(ConnectionConfig::new(()))),
        )
        .route("/graphiql", get(graphiql("/graphql", "/subscriptions")))
        .route("/playground", get(playground("/graphql", "/subscriptions")))
        .route("/health", get(health))
        .with_state(Arc::clone(&state))
        .layer(cors_layer)
        .layer(Extension(Arc::new(schema(state))))
        .layer(compression_layer)
}

#[tokio::main]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let config = Config::from_env()?;
    let pipeline = Pipeline::new(Fetcher::from_config(&config)?, Registry::harvard());
    let state = Arc::new(AppState::new(pipeline));

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("failed to listen on {addr}: {e}"))?;
    log::info!("listening on http://{addr}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
