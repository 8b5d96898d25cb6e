//! Bulkcart - B2B bulk-pricing cart and quote service

use anyhow::Result;
use axum::{extract::{Path, State}, http::StatusCode, routing::{get, post}, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bulkcart::config::Config;
use bulkcart::storage::{CartStore, MemoryCartStore, SessionCart};
use bulkcart::submission::{LoggingSubmitter, QuoteSubmitter};
use bulkcart::{
    Cart, CartLineItem, CommerceError, ContactInfo, Money, PriceBreakdown, PricingTier, Product,
    ProductCatalog, QuoteRequest, TierTable,
};

#[derive(Clone)]
pub struct AppState {
    pub currency: String,
    pub catalog: Arc<ProductCatalog>,
    pub tiers: Arc<TierTable>,
    pub store: Arc<dyn CartStore>,
    pub submitter: Arc<dyn QuoteSubmitter>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let config = Config::from_env()?;
    let port = config.port;
    let state = AppState {
        currency: config.currency,
        catalog: Arc::new(config.catalog),
        tiers: Arc::new(config.tier_table),
        store: Arc::new(MemoryCartStore::new()),
        submitter: Arc::new(LoggingSubmitter),
    };

    let app = router(state);

    tracing::info!("🚀 Bulkcart listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "bulkcart"})) }))
        .route("/api/v1/products", get(list_products))
        .route("/api/v1/products/:id", get(get_product))
        .route("/api/v1/pricing/tiers", get(list_tiers))
        .route("/api/v1/pricing/quote", post(price_quote))
        .route("/api/v1/cart/:session", get(get_cart).post(add_to_cart).delete(clear_cart))
        .route("/api/v1/cart/:session/items/:id", axum::routing::put(update_cart_item).delete(remove_cart_item))
        .route("/api/v1/quotes", post(submit_quote))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state)
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(e: CommerceError) -> ApiError {
    let status = match &e {
        CommerceError::InvalidQuantity(_)
        | CommerceError::BelowMinimumOrder { .. }
        | CommerceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CommerceError::ItemNotFound(_) => StatusCode::NOT_FOUND,
        // A currency mismatch means the catalog seed disagrees with the
        // configured cart currency, not a bad client request.
        CommerceError::InvalidTierTable(_)
        | CommerceError::CurrencyMismatch { .. }
        | CommerceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let body = match &e {
        // Field-level structure so the storefront can render per-field hints.
        CommerceError::Validation(errors) => serde_json::json!({"error": e.to_string(), "fields": errors}),
        _ => serde_json::json!({"error": e.to_string()}),
    };
    (status, Json(body))
}

fn not_found(what: &str) -> ApiError {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": format!("{what} not found")})))
}

async fn list_products(State(s): State<AppState>) -> Json<Vec<Product>> {
    Json(s.catalog.list().into_iter().cloned().collect())
}

async fn get_product(State(s): State<AppState>, Path(id): Path<String>) -> Result<Json<Product>, ApiError> {
    s.catalog.get(&id).cloned().map(Json).ok_or_else(|| not_found("product"))
}

async fn list_tiers(State(s): State<AppState>) -> Json<Vec<PricingTier>> {
    Json(s.tiers.tiers().to_vec())
}

#[derive(Debug, Deserialize)]
pub struct PriceQuoteRequest { pub product_id: String, pub quantity: u32 }

async fn price_quote(State(s): State<AppState>, Json(r): Json<PriceQuoteRequest>) -> Result<Json<PriceBreakdown>, ApiError> {
    let product = s.catalog.get(&r.product_id).ok_or_else(|| not_found("product"))?;
    product.check_order_quantity(r.quantity).map_err(api_error)?;
    let breakdown = s.tiers.price(&product.unit_price, r.quantity).map_err(api_error)?;
    Ok(Json(breakdown))
}

#[derive(Debug, Serialize)]
pub struct CartView {
    pub session: String,
    pub items: Vec<CartLineItem>,
    pub total_items: u32,
    pub total_value: Money,
}

fn cart_view(session: &str, cart: &Cart) -> CartView {
    CartView {
        session: session.to_string(),
        items: cart.items().to_vec(),
        total_items: cart.total_items(),
        total_value: cart.total_value(),
    }
}

fn open_cart(s: &AppState, session: &str) -> SessionCart {
    SessionCart::open(session, &s.currency, s.store.clone())
}

async fn get_cart(State(s): State<AppState>, Path(session): Path<String>) -> Json<CartView> {
    let cart = open_cart(&s, &session);
    Json(cart_view(&session, cart.cart()))
}

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 { 1 }

async fn add_to_cart(State(s): State<AppState>, Path(session): Path<String>, Json(r): Json<AddToCartRequest>) -> Result<(StatusCode, Json<CartView>), ApiError> {
    let product = s.catalog.get(&r.product_id).ok_or_else(|| not_found("product"))?;
    let mut cart = open_cart(&s, &session);
    cart.add_item(CartLineItem {
        id: product.id.clone(),
        name: product.name.clone(),
        unit_price: product.unit_price.clone(),
        quantity: r.quantity,
        image_url: product.image_url.clone(),
    })
    .map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(cart_view(&session, cart.cart()))))
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest { pub quantity: u32 }

async fn update_cart_item(State(s): State<AppState>, Path((session, id)): Path<(String, String)>, Json(r): Json<UpdateQuantityRequest>) -> Result<Json<CartView>, ApiError> {
    let mut cart = open_cart(&s, &session);
    cart.set_quantity(&id, r.quantity).map_err(api_error)?;
    Ok(Json(cart_view(&session, cart.cart())))
}

async fn remove_cart_item(State(s): State<AppState>, Path((session, id)): Path<(String, String)>) -> Json<CartView> {
    let mut cart = open_cart(&s, &session);
    cart.remove_item(&id);
    Json(cart_view(&session, cart.cart()))
}

async fn clear_cart(State(s): State<AppState>, Path(session): Path<String>) -> StatusCode {
    let mut cart = open_cart(&s, &session);
    cart.clear();
    StatusCode::NO_CONTENT
}

#[derive(Debug, Deserialize)]
pub struct SubmitQuoteRequest {
    pub session: String,
    pub contact: ContactInfo,
    #[serde(default)]
    pub message: String,
}

async fn submit_quote(State(s): State<AppState>, Json(r): Json<SubmitQuoteRequest>) -> Result<(StatusCode, Json<QuoteRequest>), ApiError> {
    let cart = open_cart(&s, &r.session);
    let quote = QuoteRequest::build(cart.cart(), r.contact, r.message).map_err(api_error)?;
    s.submitter.submit(&quote).map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(quote)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn test_state() -> AppState {
        AppState {
            currency: "USD".into(),
            catalog: Arc::new(ProductCatalog::new(vec![Product {
                id: "PROD-001".into(),
                name: "Industrial Widget".into(),
                unit_price: Money::usd(dec!(12.99)),
                min_order_quantity: 10,
                image_url: String::new(),
            }])),
            tiers: Arc::new(TierTable::standard()),
            store: Arc::new(MemoryCartStore::new()),
            submitter: Arc::new(LoggingSubmitter),
        }
    }

    #[tokio::test]
    async fn test_price_quote_applies_tier() {
        let s = test_state();
        let Json(b) = price_quote(State(s), Json(PriceQuoteRequest { product_id: "PROD-001".into(), quantity: 150 })).await.unwrap();
        assert_eq!(b.tier_label, "Medium Bulk");
        assert_eq!(b.total_price.amount(), dec!(1461.375));
    }

    #[tokio::test]
    async fn test_price_quote_below_minimum_is_422() {
        let s = test_state();
        let (status, _) = price_quote(State(s), Json(PriceQuoteRequest { product_id: "PROD-001".into(), quantity: 5 })).await.unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_cart_round_trip_across_requests() {
        let s = test_state();
        add_to_cart(State(s.clone()), Path("sess".into()), Json(AddToCartRequest { product_id: "PROD-001".into(), quantity: 3 })).await.unwrap();
        add_to_cart(State(s.clone()), Path("sess".into()), Json(AddToCartRequest { product_id: "PROD-001".into(), quantity: 2 })).await.unwrap();
        let Json(view) = get_cart(State(s), Path("sess".into())).await;
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total_items, 5);
    }

    #[tokio::test]
    async fn test_quote_submission_validates_contact() {
        let s = test_state();
        let bad = SubmitQuoteRequest {
            session: "sess".into(),
            contact: ContactInfo { name: String::new(), email: "nope".into(), company: None, phone: None },
            message: String::new(),
        };
        let (status, Json(body)) = submit_quote(State(s), Json(bad)).await.unwrap_err();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.get("fields").is_some());
    }
}
