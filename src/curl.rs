//! curl command generation from captured request details

/// Render a replayable curl command line.
///
/// The method is upper-cased in the output. Headers are emitted one `-H`
/// flag each, in iteration order. The body is appended only for non-GET
/// requests with non-empty content, escaped so it stays a single
/// single-quoted shell token. Inputs are passed through verbatim
/// otherwise; this is not a validator.
pub fn render_curl(
    method: &str,
    url: &str,
    headers: &[(String, String)],
    body: Option<&str>,
) -> String {
    let method = method.to_uppercase();
    let mut command = format!("curl -X {} '{}'", method, url);

    for (name, value) in headers {
        command.push_str(&format!(" -H '{}: {}'", name, value));
    }

    if let Some(body) = body.filter(|b| !b.is_empty()) {
        if method != "GET" {
            command.push_str(&format!(" --data '{}'", escape_body(body)));
        }
    }

    command
}

/// Backslash-escape quotes and backslashes in the body payload.
fn escape_body(body: &str) -> String {
    body.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('"', "\\\"")
}
