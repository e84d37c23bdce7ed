use worker::Method;

pub const IMAGE_PROXY_PATH: &str = "/image-proxy";

/// Where a request goes, decided from its method and path alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Preflight,
    ImageProxy,
    Convert,
    MethodNotAllowed,
}

impl Route {
    /// `OPTIONS` is answered on every path. `/image-proxy` (with or without a
    /// trailing slash) only takes `GET`; every other path is the conversion
    /// route and only takes `POST`.
    pub fn resolve(method: &Method, path: &str) -> Self {
        if *method == Method::Options {
            return Route::Preflight;
        }

        let trimmed = path.trim_end_matches('/');
        if trimmed == IMAGE_PROXY_PATH {
            return match method {
                Method::Get => Route::ImageProxy,
                _ => Route::MethodNotAllowed,
            };
        }

        match method {
            Method::Post => Route::Convert,
            _ => Route::MethodNotAllowed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_is_preflight_everywhere() {
        assert_eq!(Route::resolve(&Method::Options, "/"), Route::Preflight);
        assert_eq!(Route::resolve(&Method::Options, "/image-proxy"), Route::Preflight);
        assert_eq!(Route::resolve(&Method::Options, "/anything/else"), Route::Preflight);
    }

    #[test]
    fn post_converts() {
        assert_eq!(Route::resolve(&Method::Post, "/"), Route::Convert);
        assert_eq!(Route::resolve(&Method::Post, "/api/download"), Route::Convert);
    }

    #[test]
    fn other_methods_on_main_route_are_rejected() {
        for method in [
            Method::Get,
            Method::Head,
            Method::Put,
            Method::Patch,
            Method::Delete,
        ] {
            assert_eq!(Route::resolve(&method, "/"), Route::MethodNotAllowed);
        }
    }

    #[test]
    fn image_proxy_takes_get() {
        assert_eq!(Route::resolve(&Method::Get, "/image-proxy"), Route::ImageProxy);
        assert_eq!(Route::resolve(&Method::Get, "/image-proxy/"), Route::ImageProxy);
    }

    #[test]
    fn image_proxy_rejects_post() {
        assert_eq!(
            Route::resolve(&Method::Post, "/image-proxy"),
            Route::MethodNotAllowed
        );
    }

    #[test]
    fn similar_paths_are_not_the_proxy() {
        assert_eq!(Route::resolve(&Method::Get, "/image-proxy2"), Route::MethodNotAllowed);
        assert_eq!(Route::resolve(&Method::Post, "/image-proxy/x"), Route::Convert);
    }
}
