// Builder action handlers
// Storage is external to this service: handlers acknowledge but never write

use chrono::Utc;

use super::action::Action;
use super::error::ApiError;
use super::oembed::OEmbedFetch;
use super::payload::non_empty;
use super::template::{BLANK_TEMPLATE, BLANK_TEMPLATE_NAME};
use super::types::{
    timestamp, ActionRequest, MessageReply, NewPageReply, PageMeta, QueryParams, Reply,
    ReusableReply, SaveReply, SavedFile, StatusReply,
};
use crate::logger;

const DEFAULT_PAGE_TITLE: &str = "New Page";
const DEFAULT_PAGE_FILE: &str = "new-page.html";

/// Run one action; the match must stay exhaustive over `Action`
pub async fn dispatch_action(
    action: Action,
    request: &ActionRequest,
    query: &QueryParams,
    oembed: &dyn OEmbedFetch,
) -> Result<Reply, ApiError> {
    match action {
        Action::Save | Action::SaveAjax => handle_save(request).map(Reply::Saved),
        Action::NewPage => Ok(Reply::NewPage(handle_new_page(request))),
        Action::Delete => Ok(Reply::Message(handle_delete(request))),
        Action::Rename => Ok(Reply::Message(handle_rename(request))),
        Action::SaveReusable => Ok(Reply::Reusable(handle_save_reusable(request))),
        Action::OEmbedProxy => handle_oembed_proxy(query, oembed).await.map(Reply::Relay),
        Action::Test => Ok(Reply::Status(StatusReply::ok("Test successful"))),
    }
}

pub fn handle_save(request: &ActionRequest) -> Result<SaveReply, ApiError> {
    let (Some(file), Some(html)) = (
        non_empty(request.file.as_deref()),
        non_empty(request.html.as_deref()),
    ) else {
        return Err(ApiError::Validation("Missing file or html content"));
    };

    logger::log_action(
        "save",
        &format!("file={file}, html={} bytes", html.len()),
    );

    Ok(SaveReply {
        success: true,
        message: "File saved successfully".to_string(),
        data: SavedFile {
            file: file.to_string(),
            timestamp: timestamp(),
            size: html.len(),
            success: true,
        },
    })
}

pub fn handle_new_page(request: &ActionRequest) -> NewPageReply {
    let title = non_empty(request.title.as_deref()).unwrap_or(DEFAULT_PAGE_TITLE);
    let file = non_empty(request.file.as_deref()).unwrap_or(DEFAULT_PAGE_FILE);
    let folder = request.folder.as_deref().unwrap_or_default();

    logger::log_action(
        "newPage",
        &format!("title={title}, file={file}, folder={folder}"),
    );
    // Only the blank starter ships with the gateway
    if let Some(template) = non_empty(request.start_template_url.as_deref()) {
        if template != BLANK_TEMPLATE_NAME {
            logger::log_debug(&format!(
                "newPage requested template {template}, serving blank starter"
            ));
        }
    }

    NewPageReply {
        success: true,
        message: "New page created".to_string(),
        template: BLANK_TEMPLATE,
        data: PageMeta {
            title: title.to_string(),
            file: file.to_string(),
            folder: folder.to_string(),
        },
    }
}

pub fn handle_delete(request: &ActionRequest) -> MessageReply {
    let file = request.file.as_deref().unwrap_or_default();
    logger::log_action("delete", &format!("file={file}"));
    MessageReply::ok(format!("File {file} deleted successfully"))
}

pub fn handle_rename(request: &ActionRequest) -> MessageReply {
    let old_name = request.old_name.as_deref().unwrap_or_default();
    let new_name = request.new_name.as_deref().unwrap_or_default();
    logger::log_action("rename", &format!("{old_name} -> {new_name}"));
    MessageReply::ok(format!("File renamed from {old_name} to {new_name}"))
}

pub fn handle_save_reusable(request: &ActionRequest) -> ReusableReply {
    let name = request.name.as_deref().unwrap_or_default();
    logger::log_action("saveReusable", &format!("name={name}"));
    ReusableReply {
        success: true,
        message: format!("Reusable component \"{name}\" saved"),
        component_id: Utc::now().timestamp_millis().to_string(),
    }
}

pub async fn handle_oembed_proxy(
    query: &QueryParams,
    oembed: &dyn OEmbedFetch,
) -> Result<serde_json::Value, ApiError> {
    let url = non_empty(query.url.as_deref()).ok_or(ApiError::Validation("URL parameter required"))?;

    logger::log_action("oembedProxy", &format!("url={url}"));
    oembed.fetch(url).await.map_err(|e| {
        logger::log_error(&format!("oEmbed proxy error: {e}"));
        ApiError::Upstream(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(file: Option<&str>, html: Option<&str>) -> ActionRequest {
        ActionRequest {
            file: file.map(str::to_string),
            html: html.map(str::to_string),
            ..ActionRequest::default()
        }
    }

    #[test]
    fn test_save_size_is_byte_length() {
        let reply = handle_save(&request(Some("index.html"), Some("<p>héllo</p>"))).unwrap();
        assert!(reply.success);
        assert_eq!(reply.data.file, "index.html");
        assert_eq!(reply.data.size, "<p>héllo</p>".len());
        assert_eq!(reply.data.size, 13);
    }

    #[test]
    fn test_save_requires_file_and_html() {
        for req in [
            request(None, Some("<p></p>")),
            request(Some("a.html"), None),
            request(Some(""), Some("<p></p>")),
            request(Some("a.html"), Some("")),
        ] {
            let err = handle_save(&req).unwrap_err();
            assert_eq!(err.to_string(), "Missing file or html content");
        }
    }

    #[test]
    fn test_new_page_defaults() {
        let reply = handle_new_page(&ActionRequest::default());
        assert_eq!(reply.data.title, "New Page");
        assert_eq!(reply.data.file, "new-page.html");
        assert_eq!(reply.data.folder, "");
        assert!(reply.template.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_new_page_echoes_metadata() {
        let req = ActionRequest {
            title: Some("Pricing".into()),
            file: Some("pricing.html".into()),
            folder: Some("pages".into()),
            start_template_url: Some("landing.html".into()),
            ..ActionRequest::default()
        };
        let reply = handle_new_page(&req);
        assert_eq!(reply.data.title, "Pricing");
        assert_eq!(reply.data.file, "pricing.html");
        assert_eq!(reply.data.folder, "pages");
        assert_eq!(reply.template, BLANK_TEMPLATE);
    }

    #[test]
    fn test_delete_and_rename_messages() {
        let reply = handle_delete(&request(Some("old.html"), None));
        assert_eq!(reply.message, "File old.html deleted successfully");

        let req = ActionRequest {
            old_name: Some("a.html".into()),
            new_name: Some("b.html".into()),
            ..ActionRequest::default()
        };
        assert_eq!(handle_rename(&req).message, "File renamed from a.html to b.html");
    }

    #[test]
    fn test_absent_names_leave_empty_gaps() {
        let empty = ActionRequest::default();
        assert!(handle_delete(&empty).success);
        assert_eq!(handle_delete(&empty).message, "File  deleted successfully");
        assert_eq!(handle_rename(&empty).message, "File renamed from  to ");
        assert_eq!(handle_save_reusable(&empty).message, "Reusable component \"\" saved");
    }

    #[test]
    fn test_save_reusable_id_is_millis() {
        let before = Utc::now().timestamp_millis();
        let req = ActionRequest {
            name: Some("hero".into()),
            ..ActionRequest::default()
        };
        let reply = handle_save_reusable(&req);
        assert_eq!(reply.message, "Reusable component \"hero\" saved");
        let id: i64 = reply.component_id.parse().unwrap();
        assert!(id >= before);
    }
}
