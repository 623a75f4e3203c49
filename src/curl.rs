//! Curl Renderer.
//!
//! Pure text assembly from a [`ResolvedRequest`]. The first line is
//! `curl -X METHOD "URL"`; every further flag sits on its own line, indented
//! two spaces, joined with ` \`.

use crate::example::{value_text, BodyKind, RequestBody, ResolvedRequest};
use serde_json::Value;

const CONTINUATION: &str = " \\\n  ";

/// Flavours of the command shown in example files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurlVariant {
    Basic,
    /// `curl -v`, prints request and response headers.
    Verbose,
    /// Writes the response body to `response.json`.
    SaveToFile,
    /// Prints total transfer time.
    Timing,
}

impl CurlVariant {
    pub const ADVANCED: [CurlVariant; 3] =
        [CurlVariant::Verbose, CurlVariant::SaveToFile, CurlVariant::Timing];

    /// Comment line introducing the variant in the advanced section.
    pub fn caption(&self) -> &'static str {
        match self {
            CurlVariant::Basic => "# Basic request:",
            CurlVariant::Verbose => "# With verbose output and response headers:",
            CurlVariant::SaveToFile => "# Save response to file:",
            CurlVariant::Timing => "# With timing information:",
        }
    }
}

fn double_quoted(s: &str) -> String {
    let escaped = s.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn single_quoted(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

fn body_flags(body: &RequestBody) -> Vec<String> {
    match body.kind {
        BodyKind::Json => {
            let pretty =
                serde_json::to_string_pretty(&body.value).unwrap_or_else(|_| body.value.to_string());
            vec![format!("-d {}", single_quoted(&pretty))]
        }
        BodyKind::Multipart => match &body.value {
            Value::Object(fields) => fields
                .iter()
                .map(|(name, value)| {
                    let text = if body.binary_fields.contains(name) {
                        format!("@/path/to/{name}")
                    } else {
                        value_text(value)
                    };
                    format!("-F {}", double_quoted(&format!("{name}={text}")))
                })
                .collect(),
            other => vec![format!("-F {}", double_quoted(&format!("data={}", value_text(other))))],
        },
        BodyKind::UrlEncoded => match &body.value {
            Value::Object(fields) => fields
                .iter()
                .map(|(name, value)| {
                    format!("--data-urlencode {}", double_quoted(&format!("{name}={}", value_text(value))))
                })
                .collect(),
            other => vec![format!("--data-urlencode {}", double_quoted(&value_text(other)))],
        },
        BodyKind::Raw => {
            let text = match &body.value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            vec![format!("-d {}", single_quoted(&text))]
        }
    }
}

/// Render the basic command for `request`.
pub fn render(request: &ResolvedRequest) -> String {
    render_variant(request, CurlVariant::Basic)
}

/// Render `request` as the given variant.
pub fn render_variant(request: &ResolvedRequest, variant: CurlVariant) -> String {
    let opening = match variant {
        CurlVariant::Verbose => "curl -v -X",
        _ => "curl -X",
    };
    let mut parts = vec![format!(
        "{opening} {} {}",
        request.method,
        double_quoted(&request.url)
    )];

    parts.extend(
        request
            .headers
            .iter()
            .map(|(name, value)| format!("-H {}", double_quoted(&format!("{name}: {value}")))),
    );

    if !request.cookies.is_empty() {
        let jar = request
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        parts.push(format!("--cookie {}", double_quoted(&jar)));
    }

    if let Some(body) = &request.body {
        parts.extend(body_flags(body));
    }

    match variant {
        CurlVariant::SaveToFile => parts.push("-o response.json".to_string()),
        CurlVariant::Timing => parts.push(format!("-w {}", double_quoted("Total time: %{time_total}s"))),
        _ => {}
    }

    parts.join(CONTINUATION)
}
