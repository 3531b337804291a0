// Request payload decoding
// POST bodies arrive as JSON or as url-encoded forms, depending on the editor build

use super::error::ApiError;
use super::types::{ActionRequest, QueryParams};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Decode a POST body according to its declared content type
///
/// An empty body decodes to an empty request so the action can still come
/// from the query string.
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Result<ActionRequest, ApiError> {
    let is_form = content_type.is_some_and(|ct| {
        ct.split(';')
            .next()
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
    });

    if is_form {
        return Ok(parse_form(body));
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ActionRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| ApiError::Internal(e.to_string()))
}

fn parse_form(body: &[u8]) -> ActionRequest {
    let mut request = ActionRequest::default();
    for (key, value) in url::form_urlencoded::parse(body) {
        let slot = match key.as_ref() {
            "action" => &mut request.action,
            "file" => &mut request.file,
            "html" => &mut request.html,
            "title" => &mut request.title,
            "folder" => &mut request.folder,
            "startTemplateUrl" => &mut request.start_template_url,
            "oldName" => &mut request.old_name,
            "newName" => &mut request.new_name,
            "name" => &mut request.name,
            _ => continue,
        };
        *slot = Some(value.into_owned());
    }
    request
}

/// Pull the parameters the dispatcher cares about out of a raw query string
pub fn parse_query(query: Option<&str>) -> QueryParams {
    let mut params = QueryParams::default();
    let Some(query) = query else {
        return params;
    };
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "action" => params.action = Some(value.into_owned()),
            "url" => params.url = Some(value.into_owned()),
            _ => {}
        }
    }
    params
}

/// Treat empty strings like absent values
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
