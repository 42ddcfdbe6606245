//! Local demo host for the category screens
//!
//! Every request is authenticated as a superuser. Do not expose it.

#![forbid(unsafe_code)]

use std::path::PathBuf;

use acton_categories::{
    auth::AdminUser,
    config::CategoriesConfig,
    flash::FlashQueue,
    forms::ValidationErrors,
    observability,
    registry::CategoryRegistry,
    routes::admin_router,
    schema::{CategoryMeta, FieldDef, SchemaDescribable},
    state::CategoriesState,
    store::CategoryRecord,
};
use anyhow::Result;
use axum::{extract::Request, middleware::Next, response::Response};
use clap::Parser;

#[derive(Parser)]
#[command(name = "categories-demo")]
#[command(version)]
#[command(about = "Serve the category screens with demo data types", long_about = None)]
struct Cli {
    /// Configuration file; defaults to the usual search path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    bind: String,
}

/// Blog tags
struct Tag;

impl SchemaDescribable for Tag {
    fn namespace() -> &'static str {
        "blog"
    }

    fn model_name() -> &'static str {
        "Tag"
    }

    fn meta() -> CategoryMeta {
        CategoryMeta::new("tag", "tags").description("Labels attached to blog posts")
    }

    fn fields() -> Vec<FieldDef> {
        vec![FieldDef::text("summary", "Summary").help("Shown on the tag's archive page")]
    }
}

/// Sales regions
struct Region;

impl SchemaDescribable for Region {
    fn namespace() -> &'static str {
        "places"
    }

    fn model_name() -> &'static str {
        "Region"
    }

    fn meta() -> CategoryMeta {
        CategoryMeta::new("region", "regions").description("Sales territories")
    }

    fn fields() -> Vec<FieldDef> {
        vec![
            FieldDef::char("code", "Code", 8).required(),
            FieldDef::choice(
                "hemisphere",
                "Hemisphere",
                [("north", "Northern"), ("south", "Southern")],
            ),
            FieldDef::integer("population", "Population"),
            FieldDef::boolean("active", "Active"),
            FieldDef::relation("site", "Site"),
        ]
    }

    fn clean(record: &CategoryRecord, errors: &mut ValidationErrors) {
        let code = record.field_text("code").unwrap_or_default();
        if code.chars().any(char::is_lowercase) {
            errors.add("code", "Region codes are upper case.");
        }
    }
}

async fn dev_session(flash: FlashQueue, mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(AdminUser::superuser(1, "demo"));
    request.extensions_mut().insert(flash);
    next.run(request).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CategoriesConfig::load_from(path)?,
        None => CategoriesConfig::load_for_service("categories-demo")?,
    };
    observability::init(&config.logging)?;

    let registry = CategoryRegistry::builder()
        .register::<Tag>()
        .register::<Region>()
        .build();
    let state = CategoriesState::from_config(registry, config).await?;
    let index = format!("{}/", state.config().mount_path());

    let flash = FlashQueue::new();
    let app = admin_router(state).layer(axum::middleware::from_fn(
        move |request: Request, next: Next| dev_session(flash.clone(), request, next),
    ));

    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    tracing::info!(address = %listener.local_addr()?, index = %index, "Serving category screens");
    axum::serve(listener, app).await?;

    Ok(())
}
