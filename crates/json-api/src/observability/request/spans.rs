//! HTTP span helpers.

use uuid::Uuid;

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    pub(super) otel_path: String,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let otel_path = normalise_path_for_span_name(path);
    let otel_span_name = format!("{method} {otel_path}");

    RequestSpanName {
        otel_path,
        otel_span_name,
    }
}

fn normalise_path_for_span_name(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        if Uuid::parse_str(segment).is_ok() {
            normalised.push_str("{uuid}");
        } else {
            normalised.push_str(segment);
        }
    }

    normalised
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_segments_are_collapsed() {
        let names = request_span_name("GET", "/order/details/0190b4f0-6f3a-7cc2-9d53-6c1c8e3a7f10");

        assert_eq!(names.otel_path, "/order/details/{uuid}");
        assert_eq!(names.otel_span_name, "GET /order/details/{uuid}");
    }

    #[test]
    fn static_paths_are_unchanged() {
        assert_eq!(request_span_name("POST", "/order/capture").otel_path, "/order/capture");
        assert_eq!(request_span_name("GET", "/").otel_path, "/");
    }
}
