//! Application event handling.
//!
//! Applies completions of background fetches to the application state.

use crate::app::{App, AppEvent, View};

/// Handle application events from background tasks.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::PageLoaded {
            generation,
            request,
            result,
        } => {
            app.apply_page_result(generation, &request, result);
        }
        AppEvent::CategoriesLoaded(result) => {
            app.apply_categories(result);
        }
        AppEvent::ProductLoaded {
            product_id,
            generation,
            result,
        } => {
            // The user may have already left the detail view
            if app.view != View::Detail {
                tracing::debug!(product_id, "Ignoring product response outside detail view");
                return;
            }
            if app.apply_detail_result(product_id, generation, result) {
                app.scroll_offset = 0;
            }
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            if task == "page_fetch" {
                // The key stays recorded, so the page is not refetched until it changes
                app.page_loading = false;
                app.page_handle = None;
            }
            app.set_status(format!("Internal error in {} task", task));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DetailState;
    use crate::catalog::{CatalogClient, CatalogError, PageRequest, Product, ProductPage};
    use std::time::Duration;
    use url::Url;

    fn test_app() -> App {
        let base = Url::parse("http://127.0.0.1:9").unwrap();
        let client = CatalogClient::new(base, Duration::from_secs(1)).unwrap();
        App::new(client, Vec::new())
    }

    fn product(id: u64) -> Product {
        serde_json::from_value(serde_json::json!({ "id": id, "title": "Thing" })).unwrap()
    }

    #[test]
    fn page_event_replaces_page() {
        let mut app = test_app();
        let (generation, request) = app.begin_page_fetch().unwrap();
        handle_app_event(
            &mut app,
            AppEvent::PageLoaded {
                generation,
                request,
                result: Ok(ProductPage {
                    products: vec![product(1), product(2)],
                    total: 2,
                }),
            },
        );
        assert_eq!(app.page.products.len(), 2);
    }

    #[test]
    fn product_event_ignored_after_leaving_detail() {
        let mut app = test_app();
        app.view = View::Detail;
        let generation = app.begin_detail_fetch(5);
        app.exit_detail();

        handle_app_event(
            &mut app,
            AppEvent::ProductLoaded {
                product_id: 5,
                generation,
                result: Ok(product(5)),
            },
        );
        assert_eq!(app.detail, DetailState::Idle);
    }

    #[test]
    fn page_error_event_sets_no_status() {
        let mut app = test_app();
        let (generation, _) = app.begin_page_fetch().unwrap();
        handle_app_event(
            &mut app,
            AppEvent::PageLoaded {
                generation,
                request: PageRequest::new(1, 12, None),
                result: Err(CatalogError::Timeout),
            },
        );
        assert!(app.status_message.is_none());
    }

    #[test]
    fn panic_event_sets_status() {
        let mut app = test_app();
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "page_fetch",
                error: "boom".to_string(),
            },
        );
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, "Internal error in page_fetch task");
    }

    #[test]
    fn page_fetch_panic_stops_loading() {
        let mut app = test_app();
        assert!(app.begin_page_fetch().is_some());
        assert!(app.page_loading);

        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "page_fetch",
                error: "boom".to_string(),
            },
        );
        assert!(!app.page_loading);
        assert!(app.page_handle.is_none());
        assert!(!app.needs_fetch());
    }

    #[test]
    fn category_panic_leaves_page_fetch_running() {
        let mut app = test_app();
        assert!(app.begin_page_fetch().is_some());
        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "category_fetch",
                error: "boom".to_string(),
            },
        );
        assert!(app.page_loading);
    }
}
