//! Response and request rendering.
//!
//! Renders a received response for the terminal: the body is pretty-printed
//! when the response declares a JSON content type, otherwise printed raw.
//! Verbose mode adds the status code, the response headers, and a curl
//! preview line for the outgoing request.

use crate::models::response::HttpResponse;

/// Renders a response body, pretty-printing JSON content.
///
/// A response whose `Content-Type` starts with `application/json` is
/// reformatted with 2-space indentation; anything else (including JSON that
/// fails to parse) is returned as raw text.
pub fn render_body(response: &HttpResponse) -> String {
    let text = response.body_text();
    let is_json = response
        .content_type()
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false);

    if is_json {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
            if let Ok(pretty) = serde_json::to_string_pretty(&value) {
                return pretty;
            }
        }
    }
    text
}

/// Renders a full response for display.
///
/// # Arguments
///
/// * `response` - The received response
/// * `verbose` - When set, include the status code, response headers, and a
///   `Response Body:` label before the body
pub fn render_response(response: &HttpResponse, verbose: bool) -> String {
    let mut output = String::new();

    if verbose {
        output.push_str(&format!("Response Code: {}\n", response.status_code));
        output.push_str("Response Headers:\n");
        for (name, value) in &response.headers {
            output.push_str(&format!("{}: {}\n", name, value));
        }
    }

    if !response.body.is_empty() {
        if verbose {
            output.push_str("Response Body:\n");
        }
        output.push_str(&render_body(response));
    }

    output
}

/// Renders a JSON request body echo, printed before POST dispatch.
pub fn render_request_body(body: &serde_json::Value) -> String {
    format!(
        "Request Body:\n{}",
        serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())
    )
}

/// Renders the curl preview line printed in verbose mode.
pub fn curl_preview(method: &str, uri: &str, token_title: &str, token: Option<&str>) -> String {
    format!(
        "curl -k -X {} {} -H '{}: {}' 2>/dev/null | python -m json.tool",
        method,
        uri,
        token_title,
        token.unwrap_or("")
    )
}
