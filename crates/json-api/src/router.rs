//! App Router

use salvo::Router;

use crate::orders;

pub fn app_router() -> Router {
    Router::with_path("order")
        .push(Router::with_path("create").post(orders::create::handler))
        .push(Router::with_path("capture").post(orders::capture::handler))
        .push(Router::with_path("list/{user}").get(orders::list::handler))
        .push(Router::with_path("details/{order}").get(orders::get::handler))
}
