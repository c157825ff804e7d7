//! Background fetch tasks and other helpers shared across the UI layer.
//!
//! Every network call runs in its own tokio task and reports back through the
//! `AppEvent` channel. Tasks are wrapped in [`catch_task_panic`] so a panic
//! surfaces as `AppEvent::TaskPanicked` instead of vanishing.

use crate::app::{App, AppEvent};
use crate::catalog::{distinct_categories, CatalogClient, PageRequest};
use crate::util::validate_url_for_open;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Wraps a future to catch panics and convert them to errors.
///
/// # Returns
///
/// - `Ok(result)` if the future completes normally
/// - `Err(panic_message)` if the future panics
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                format!("Unknown panic: {:?}", (*panic).type_id())
            }
        })
}

/// Spawn `work` as a background task that sends its event on completion.
///
/// A panic inside `work` is reported as `AppEvent::TaskPanicked`.
fn spawn_reporting<F>(
    task: &'static str,
    tx: mpsc::Sender<AppEvent>,
    work: F,
) -> JoinHandle<()>
where
    F: Future<Output = AppEvent> + Send + 'static,
{
    tokio::spawn(async move {
        let event = match catch_task_panic(work).await {
            Ok(event) => event,
            Err(panic_msg) => {
                tracing::error!(task, error = %panic_msg, "Background task panicked");
                AppEvent::TaskPanicked {
                    task,
                    error: panic_msg,
                }
            }
        };
        if let Err(e) = tx.send(event).await {
            tracing::warn!(task, error = %e, "Channel send failed (receiver dropped)");
        }
    })
}

/// Issue a page fetch if the page, search query or keyword changed.
///
/// Called once per event-loop pass. Returns `true` if a request was spawned.
pub fn sync_page_fetch(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) -> bool {
    let Some((generation, request)) = app.begin_page_fetch() else {
        return false;
    };
    app.page_handle = Some(spawn_page_fetch(
        app.client.clone(),
        generation,
        request,
        event_tx.clone(),
    ));
    true
}

/// Spawn one listing or search request.
pub fn spawn_page_fetch(
    client: CatalogClient,
    generation: u64,
    request: PageRequest,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    spawn_reporting("page_fetch", tx, async move {
        let result = client.fetch_page(&request).await;
        AppEvent::PageLoaded {
            generation,
            request,
            result,
        }
    })
}

/// Spawn the one-shot category discovery request.
pub fn spawn_category_fetch(client: CatalogClient, tx: mpsc::Sender<AppEvent>) -> JoinHandle<()> {
    spawn_reporting("category_fetch", tx, async move {
        let result = client
            .fetch_all()
            .await
            .map(|page| distinct_categories(&page.products));
        AppEvent::CategoriesLoaded(result)
    })
}

/// Start loading the detail page for `product_id`.
pub(super) fn start_product_fetch(
    app: &mut App,
    product_id: u64,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    let generation = app.begin_detail_fetch(product_id);
    app.detail_handle = Some(spawn_product_fetch(
        app.client.clone(),
        product_id,
        generation,
        event_tx.clone(),
    ));
}

/// Spawn a single-product request for the detail view.
pub fn spawn_product_fetch(
    client: CatalogClient,
    product_id: u64,
    generation: u64,
    tx: mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    spawn_reporting("product_fetch", tx, async move {
        let result = client.fetch_product(product_id).await;
        AppEvent::ProductLoaded {
            product_id,
            generation,
            result,
        }
    })
}

/// Open the detail product's primary image in the system browser.
pub(super) fn open_product_image(app: &mut App) {
    let Some(url) = app
        .detail_product()
        .and_then(|p| p.primary_image())
        .map(str::to_owned)
    else {
        app.set_status("No image to open");
        return;
    };

    match validate_url_for_open(&url) {
        Ok(validated) => match open::that(validated.as_str()) {
            Ok(()) => app.set_status("Opened in browser"),
            Err(e) => {
                tracing::warn!(url = %validated, error = %e, "Failed to open browser");
                app.set_status(format!("Failed to open browser: {}", e));
            }
        },
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Refusing to open URL");
            app.set_status(format!("Cannot open URL: {}", e));
        }
    }
}
