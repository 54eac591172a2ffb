use serde::Serialize;

use super::schemas::IrSchema;
use super::types::NormalizedName;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
    Trace,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Trace => "TRACE",
        }
    }
}

/// One API operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrOperation {
    /// `operationId` as written, or the route-derived name when absent.
    pub operation_id: String,
    /// Name after the naming strategy and aliases are applied.
    pub name: NormalizedName,
    pub method: HttpMethod,
    pub path: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub parameters: Vec<IrParameter>,
    pub request_body: Option<IrRequestBody>,
    /// Every declared response, in document order.
    pub responses: Vec<IrResponse>,
    pub deprecated: bool,
}

/// A declared response for one status code (or `default`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrResponse {
    pub status_code: String,
    pub description: Option<String>,
    pub content_type: Option<String>,
    /// Absent when the response has no body.
    pub schema: Option<IrSchema>,
    /// The body is a `text/event-stream`; `schema` describes one event.
    pub stream: bool,
}

/// A path/query/header/cookie parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrParameter {
    pub name: NormalizedName,
    pub original_name: String,
    pub location: IrParameterLocation,
    pub schema: IrSchema,
    pub required: bool,
    pub description: Option<String>,
}

/// Parameter location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IrParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

/// Encoding metadata for a single field in a multipart request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrFieldEncoding {
    pub field_name: String,
    pub content_type: Option<String>,
}

/// A request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IrRequestBody {
    pub schema: IrSchema,
    pub required: bool,
    pub content_type: String,
    pub description: Option<String>,
    pub encoding: Vec<IrFieldEncoding>,
}

impl IrOperation {
    /// The response that describes a successful call: `200`, then any other
    /// `2xx` in document order, then `2XX`, then `default`, else the first.
    pub fn success_response(&self) -> Option<&IrResponse> {
        select_success(self.responses.iter().map(|r| r.status_code.as_str()))
            .and_then(|i| self.responses.get(i))
    }
}

/// Index of the success status among `codes`, by the order documented on
/// [`IrOperation::success_response`].
pub fn select_success<'a>(codes: impl IntoIterator<Item = &'a str>) -> Option<usize> {
    let codes: Vec<&str> = codes.into_iter().collect();
    let find = |pred: fn(&str) -> bool| codes.iter().position(|c| pred(c));
    find(|c| c == "200")
        .or_else(|| find(|c| c.len() == 3 && c.starts_with('2') && c.bytes().all(|b| b.is_ascii_digit())))
        .or_else(|| find(|c| c.eq_ignore_ascii_case("2XX")))
        .or_else(|| find(|c| c == "default"))
        .or_else(|| (!codes.is_empty()).then_some(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_status_order() {
        assert_eq!(select_success(["404", "201", "200"]), Some(2));
        assert_eq!(select_success(["404", "204", "201"]), Some(1));
        assert_eq!(select_success(["default", "2XX"]), Some(1));
        assert_eq!(select_success(["500", "default"]), Some(1));
        assert_eq!(select_success(["500", "404"]), Some(0));
        assert_eq!(select_success(Vec::<&str>::new()), None);
    }
}
