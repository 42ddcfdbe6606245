//! Category index and CRUD handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use acton_categories::handlers;
//! use axum::{routing::get, Router};
//!
//! let app = Router::new()
//!     .route("/", get(handlers::index))
//!     .route("/{namespace}/{type_name}/", get(handlers::list))
//!     .with_state(state);
//! ```

use axum::{
    extract::{rejection::FormRejection, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_htmx::HxRequest;

use super::{authorize, get_instance, resolve_type};
use crate::auth::CurrentUser;
use crate::error::CategoryResult;
use crate::flash::{Flash, FlashMessage};
use crate::forms::FormData;
use crate::pagination::{PageQuery, Paginator};
use crate::permissions::user_can_edit_category_type;
use crate::registry::capfirst;
use crate::routes::CategoryUrls;
use crate::state::CategoriesState;
use crate::store::CategoryRecord;
use crate::template::{
    CategoryTypeEntry, ConfirmDeleteTemplate, CreateTemplate, EditTemplate, HxTemplate,
    IndexTemplate, ItemRow, TypeIndexTemplate,
};

const CREATE_FAILED: &str = "The category could not be created due to errors.";
const SAVE_FAILED: &str = "The category could not be saved due to errors.";

/// GET / - Category types the user may edit
///
/// # Errors
///
/// Returns [`crate::error::CategoryError::Template`] if rendering fails.
pub async fn index(
    State(state): State<CategoriesState>,
    CurrentUser(user): CurrentUser,
    flash: Flash,
    HxRequest(is_htmx): HxRequest,
) -> CategoryResult<Response> {
    let prefix = state.config().mount_path();
    let registry = state.registry();

    let category_types = registry
        .list_registered_types()
        .iter()
        .filter_map(|category_type| {
            let identifier = registry.resolve_identifier(category_type);
            user_can_edit_category_type(&user, &identifier).then(|| CategoryTypeEntry {
                name: category_type.verbose_name_capitalized(),
                description: category_type.meta().description.clone().unwrap_or_default(),
                url: CategoryUrls::new(prefix, &identifier).list(),
            })
        })
        .collect();

    IndexTemplate {
        url_prefix: prefix.to_string(),
        messages: flash.drain(),
        category_types,
    }
    .render_htmx(is_htmx)
}

/// GET /{namespace}/{type_name}/ - Paginated records of one type
///
/// # Errors
///
/// Returns `NotFound` for an unregistered type, `Forbidden` without a
/// permission on it, or the store's error.
pub async fn list(
    State(state): State<CategoriesState>,
    CurrentUser(user): CurrentUser,
    flash: Flash,
    HxRequest(is_htmx): HxRequest,
    Path((namespace, type_name)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> CategoryResult<Response> {
    let resolved = resolve_type(&state, &namespace, &type_name)?;
    authorize(&user, &resolved)?;

    let prefix = state.config().mount_path();
    let urls = CategoryUrls::new(prefix, &resolved.identifier);

    let total = state.store().count(&resolved.identifier).await?;
    let page = Paginator::new(total, state.config().page_size).page(query.p.as_deref());
    let records = state
        .store()
        .list(&resolved.identifier, page.offset(), page.limit())
        .await?;

    let items = records
        .iter()
        .filter_map(|record| {
            let id = record.id?;
            Some(ItemRow {
                name: record.to_string(),
                edit_url: urls.edit(id),
                delete_url: urls.delete(id),
            })
        })
        .collect();

    TypeIndexTemplate {
        url_prefix: prefix.to_string(),
        messages: flash.drain(),
        category_type_name: resolved.name(),
        category_type_name_plural: capfirst(&resolved.category_type.meta().verbose_name_plural),
        list_url: urls.list(),
        add_url: urls.add(),
        items,
        page,
    }
    .render_htmx(is_htmx)
}

/// GET /{namespace}/{type_name}/new/ - Empty create form
///
/// # Errors
///
/// Returns `NotFound` for an unregistered type or `Forbidden` without a
/// permission on it.
pub async fn create_form(
    State(state): State<CategoriesState>,
    CurrentUser(user): CurrentUser,
    flash: Flash,
    HxRequest(is_htmx): HxRequest,
    Path((namespace, type_name)): Path<(String, String)>,
) -> CategoryResult<Response> {
    let resolved = resolve_type(&state, &namespace, &type_name)?;
    authorize(&user, &resolved)?;

    let urls = CategoryUrls::new(state.config().mount_path(), &resolved.identifier);
    let form = state
        .edit_handlers()
        .edit_handler_for(&resolved.category_type)
        .get_form_class()
        .bind(None, CategoryRecord::default());

    CreateTemplate {
        url_prefix: state.config().mount_path().to_string(),
        messages: flash.drain(),
        category_type_name: resolved.name(),
        form_html: form.render(&urls.add(), "Create"),
        list_url: urls.list(),
    }
    .render_htmx(is_htmx)
}

/// POST /{namespace}/{type_name}/new/ - Create a record
///
/// Valid data is saved and answered with a redirect to the list. Invalid
/// data re-renders the form with 200, keeping what was entered.
///
/// # Errors
///
/// Returns `NotFound` for an unregistered type, `Forbidden` without a
/// permission on it, or the store's error.
pub async fn create(
    State(state): State<CategoriesState>,
    CurrentUser(user): CurrentUser,
    flash: Flash,
    HxRequest(is_htmx): HxRequest,
    Path((namespace, type_name)): Path<(String, String)>,
    form_data: Result<Form<FormData>, FormRejection>,
) -> CategoryResult<Response> {
    let resolved = resolve_type(&state, &namespace, &type_name)?;
    authorize(&user, &resolved)?;

    let Form(data) = match form_data {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let urls = CategoryUrls::new(state.config().mount_path(), &resolved.identifier);
    let form = state
        .edit_handlers()
        .edit_handler_for(&resolved.category_type)
        .get_form_class()
        .bind(Some(data), CategoryRecord::default());

    if form.is_valid() {
        let saved = form.save(state.store(), &resolved.identifier).await?;
        tracing::info!(
            namespace = %resolved.identifier.namespace,
            type_name = %resolved.identifier.name,
            record_id = saved.id,
            user_id = user.id,
            "Category created"
        );
        flash.push(FlashMessage::success(format!(
            "{} '{saved}' created.",
            resolved.name()
        )));
        return Ok(Redirect::to(&urls.list()).into_response());
    }

    tracing::debug!(
        namespace = %resolved.identifier.namespace,
        type_name = %resolved.identifier.name,
        errors = form.errors().count(),
        "Category create rejected"
    );
    let mut messages = flash.drain();
    messages.push(FlashMessage::error(CREATE_FAILED));

    CreateTemplate {
        url_prefix: state.config().mount_path().to_string(),
        messages,
        category_type_name: resolved.name(),
        form_html: form.render(&urls.add(), "Create"),
        list_url: urls.list(),
    }
    .render_htmx(is_htmx)
}

/// GET /{namespace}/{type_name}/{id}/ - Edit form of one record
///
/// # Errors
///
/// Returns `NotFound` for an unregistered type or a missing record,
/// `Forbidden` without a permission on the type, or the store's error.
pub async fn edit_form(
    State(state): State<CategoriesState>,
    CurrentUser(user): CurrentUser,
    flash: Flash,
    HxRequest(is_htmx): HxRequest,
    Path((namespace, type_name, id)): Path<(String, String, String)>,
) -> CategoryResult<Response> {
    let resolved = resolve_type(&state, &namespace, &type_name)?;
    authorize(&user, &resolved)?;
    let instance = get_instance(&state, &resolved, &id).await?;

    let record_id = instance.id.unwrap_or_default();
    let urls = CategoryUrls::new(state.config().mount_path(), &resolved.identifier);
    let instance_name = instance.to_string();
    let form = state
        .edit_handlers()
        .edit_handler_for(&resolved.category_type)
        .get_form_class()
        .bind(None, instance);

    EditTemplate {
        url_prefix: state.config().mount_path().to_string(),
        messages: flash.drain(),
        category_type_name: resolved.name(),
        instance_name,
        form_html: form.render(&urls.edit(record_id), "Save"),
        delete_url: urls.delete(record_id),
        list_url: urls.list(),
    }
    .render_htmx(is_htmx)
}

/// POST /{namespace}/{type_name}/{id}/ - Update one record in place
///
/// # Errors
///
/// Returns `NotFound` for an unregistered type or a missing record,
/// `Forbidden` without a permission on the type, or the store's error.
pub async fn edit(
    State(state): State<CategoriesState>,
    CurrentUser(user): CurrentUser,
    flash: Flash,
    HxRequest(is_htmx): HxRequest,
    Path((namespace, type_name, id)): Path<(String, String, String)>,
    form_data: Result<Form<FormData>, FormRejection>,
) -> CategoryResult<Response> {
    let resolved = resolve_type(&state, &namespace, &type_name)?;
    authorize(&user, &resolved)?;
    let instance = get_instance(&state, &resolved, &id).await?;

    let Form(data) = match form_data {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let record_id = instance.id.unwrap_or_default();
    let urls = CategoryUrls::new(state.config().mount_path(), &resolved.identifier);
    let instance_name = instance.to_string();
    let form = state
        .edit_handlers()
        .edit_handler_for(&resolved.category_type)
        .get_form_class()
        .bind(Some(data), instance);

    if form.is_valid() {
        let saved = form.save(state.store(), &resolved.identifier).await?;
        tracing::info!(
            namespace = %resolved.identifier.namespace,
            type_name = %resolved.identifier.name,
            record_id,
            user_id = user.id,
            "Category updated"
        );
        flash.push(FlashMessage::success(format!(
            "{} '{saved}' updated.",
            resolved.name()
        )));
        return Ok(Redirect::to(&urls.list()).into_response());
    }

    let mut messages = flash.drain();
    messages.push(FlashMessage::error(SAVE_FAILED));

    EditTemplate {
        url_prefix: state.config().mount_path().to_string(),
        messages,
        category_type_name: resolved.name(),
        instance_name,
        form_html: form.render(&urls.edit(record_id), "Save"),
        delete_url: urls.delete(record_id),
        list_url: urls.list(),
    }
    .render_htmx(is_htmx)
}

/// GET /{namespace}/{type_name}/{id}/delete/ - Confirmation screen
///
/// Nothing is deleted.
///
/// # Errors
///
/// Returns `NotFound` for an unregistered type or a missing record,
/// `Forbidden` without a permission on the type, or the store's error.
pub async fn delete_confirm(
    State(state): State<CategoriesState>,
    CurrentUser(user): CurrentUser,
    flash: Flash,
    HxRequest(is_htmx): HxRequest,
    Path((namespace, type_name, id)): Path<(String, String, String)>,
) -> CategoryResult<Response> {
    let resolved = resolve_type(&state, &namespace, &type_name)?;
    authorize(&user, &resolved)?;
    let instance = get_instance(&state, &resolved, &id).await?;

    let urls = CategoryUrls::new(state.config().mount_path(), &resolved.identifier);

    ConfirmDeleteTemplate {
        url_prefix: state.config().mount_path().to_string(),
        messages: flash.drain(),
        category_type_name: resolved.name(),
        instance_name: instance.to_string(),
        action_url: urls.delete(instance.id.unwrap_or_default()),
        list_url: urls.list(),
    }
    .render_htmx(is_htmx)
}

/// POST /{namespace}/{type_name}/{id}/delete/ - Delete one record
///
/// The request body is not read; any POST deletes.
///
/// # Errors
///
/// Returns `NotFound` for an unregistered type or a missing record,
/// `Forbidden` without a permission on the type, or the store's error.
pub async fn delete(
    State(state): State<CategoriesState>,
    CurrentUser(user): CurrentUser,
    flash: Flash,
    Path((namespace, type_name, id)): Path<(String, String, String)>,
) -> CategoryResult<Response> {
    let resolved = resolve_type(&state, &namespace, &type_name)?;
    authorize(&user, &resolved)?;
    let instance = get_instance(&state, &resolved, &id).await?;

    let record_id = instance.id.unwrap_or_default();
    if state.store().delete(&resolved.identifier, record_id).await? {
        tracing::info!(
            namespace = %resolved.identifier.namespace,
            type_name = %resolved.identifier.name,
            record_id,
            user_id = user.id,
            "Category deleted"
        );
        flash.push(FlashMessage::success(format!(
            "{} '{instance}' deleted.",
            resolved.name()
        )));
    } else {
        tracing::debug!(record_id, "Category already deleted");
    }

    let urls = CategoryUrls::new(state.config().mount_path(), &resolved.identifier);
    Ok(Redirect::to(&urls.list()).into_response())
}
