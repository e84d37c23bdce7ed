use worker::*;

mod config;
mod error;
mod handlers;
mod provider;
mod routes;
mod utils;

use crate::config::Config;
use crate::error::AppError;
use crate::routes::Route;

#[event(fetch)]
async fn fetch(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    console_error_panic_hook::set_once();

    let config = Config::from_env(&env);
    let cors = config.as_ref().map(Config::cors).unwrap_or_default();

    let method = req.method();
    let path = req.path();
    let route = Route::resolve(&method, &path);
    let method_name: &str = method.as_ref();
    console_log!("[router] {} {} -> {:?}", method_name, path, route);

    match route {
        Route::Preflight => return handlers::preflight(&cors),
        Route::MethodNotAllowed => {
            return handlers::error_response(&AppError::MethodNotAllowed, &cors)
        }
        Route::ImageProxy | Route::Convert => {}
    }

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            console_error!("[config] {}", e);
            return handlers::error_response(&AppError::from(e), &cors);
        }
    };

    match route {
        Route::ImageProxy => handlers::image_proxy::handle(req, &config).await,
        _ => handlers::convert::handle(req, &config).await,
    }
}
