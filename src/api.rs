use serde::Serialize;
use wasm_bindgen::prelude::*;
use crate::engine::DesignEngine;

pub const DEFAULT_API_BASE: &str = "/api";

/// Fire-and-forget analytics notification. The timestamp is attached by the
/// sender right before the request goes out.
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub data: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl AnalyticsEvent {
    pub fn new(event: &str, user_id: Option<String>, data: serde_json::Value) -> AnalyticsEvent {
        AnalyticsEvent { event: event.to_string(), user_id, data, timestamp: None }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[wasm_bindgen]
impl DesignEngine {
    /// `invitation_exported` event payload for the current design.
    pub fn export_event(&self, user_id: Option<String>) -> String {
        AnalyticsEvent::new(
            "invitation_exported",
            user_id,
            serde_json::json!({
                "templateId": self.template_id,
                "templateName": self.template_name,
                "elementCount": self.elements.len(),
            }),
        )
        .to_json()
    }

    /// `invitation_saved` event payload after a successful save.
    pub fn saved_event(&self, project_id: &str, user_id: Option<String>) -> String {
        AnalyticsEvent::new(
            "invitation_saved",
            user_id,
            serde_json::json!({
                "projectId": project_id,
                "templateId": self.template_id,
                "templateName": self.template_name,
                "elementCount": self.elements.len(),
            }),
        )
        .to_json()
    }
}

/// URL for creating or updating a project: POST `/projects` the first time,
/// PUT `/projects/{id}` once a project id exists.
pub fn project_endpoint(base_url: &str, project_id: Option<&str>) -> (String, &'static str) {
    match project_id {
        Some(id) => (format!("{}/projects/{}", base_url, id), "PUT"),
        None => (format!("{}/projects", base_url), "POST"),
    }
}

pub fn analytics_endpoint(base_url: &str) -> String {
    format!("{}/analytics/track", base_url)
}

/// Project id to keep after a save reply: the backend's when it returned a
/// string, otherwise the already-known id. Update replies may omit the field
/// or set it to null.
pub fn effective_project_id(reply_id: Option<String>, known_id: Option<String>) -> Option<String> {
    reply_id.or(known_id)
}

#[cfg(target_arch = "wasm32")]
mod fetch {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Headers, Request, RequestInit, Response};

    async fn request_json(url: &str, method: &str, body: &str) -> Result<JsValue, JsValue> {
        let headers = Headers::new()?;
        headers.append("Content-Type", "application/json")?;
        let opts = RequestInit::new();
        opts.set_method(method);
        opts.set_headers(&headers);
        opts.set_body(&JsValue::from_str(body));

        let request = Request::new_with_str_and_init(url, &opts)?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await?
            .unchecked_into();
        if !response.ok() {
            return Err(JsValue::from_str(&format!(
                "API error: {} {}",
                response.status(),
                response.status_text()
            )));
        }
        JsFuture::from(response.json()?).await
    }

    /// Creates or updates the project and returns the backend's project id.
    /// Callers store the id on the engine so the next save updates in place.
    #[wasm_bindgen]
    pub async fn save_project(
        base_url: String,
        project_id: Option<String>,
        payload: String,
    ) -> Result<JsValue, JsValue> {
        let (url, method) = project_endpoint(&base_url, project_id.as_deref());
        let response = request_json(&url, method, &payload).await?;
        // as_string is None for undefined, null, and non-string replies.
        let reply_id = js_sys::Reflect::get(&response, &JsValue::from_str("id"))?.as_string();
        Ok(match effective_project_id(reply_id, project_id) {
            Some(id) => JsValue::from_str(&id),
            None => JsValue::NULL,
        })
    }

    /// Fire-and-forget analytics. Failures are logged and never surfaced;
    /// the user-facing action has already happened.
    #[wasm_bindgen]
    pub fn track_event(base_url: String, event_json: String) {
        let mut event: serde_json::Value =
            serde_json::from_str(&event_json).unwrap_or(serde_json::Value::Null);
        if let Some(obj) = event.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(js_sys::Date::new_0().to_iso_string().into()),
            );
        }
        let body = event.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            let url = analytics_endpoint(&base_url);
            if let Err(err) = request_json(&url, "POST", &body).await {
                log::warn!("analytics request failed: {:?}", err);
            }
        });
    }
}

#[cfg(target_arch = "wasm32")]
pub use fetch::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_endpoint_switches_between_create_and_update() {
        assert_eq!(
            project_endpoint("/api", None),
            ("/api/projects".to_string(), "POST")
        );
        assert_eq!(
            project_endpoint("/api", Some("proj-9")),
            ("/api/projects/proj-9".to_string(), "PUT")
        );
    }

    #[test]
    fn null_reply_id_keeps_the_known_project_id() {
        assert_eq!(
            effective_project_id(None, Some("proj-9".to_string())),
            Some("proj-9".to_string())
        );
        assert_eq!(
            effective_project_id(Some("proj-10".to_string()), Some("proj-9".to_string())),
            Some("proj-10".to_string())
        );
        assert_eq!(effective_project_id(None, None), None);
    }

    #[test]
    fn export_event_carries_design_facts() {
        let mut engine = DesignEngine::new();
        engine.load_template(
            r#"{"id":"t1","name":"Garden","category":"wedding","elements":[{"type":"text","content":"Hi","x":1,"y":2}]}"#,
        );
        let event: serde_json::Value =
            serde_json::from_str(&engine.export_event(Some("user-1".to_string()))).unwrap();
        assert_eq!(event["event"], "invitation_exported");
        assert_eq!(event["userId"], "user-1");
        assert_eq!(event["data"]["templateId"], "t1");
        assert_eq!(event["data"]["elementCount"], 1);
        assert!(event.get("timestamp").is_none());
    }

    #[test]
    fn saved_event_names_the_project() {
        let engine = DesignEngine::new();
        let event: serde_json::Value =
            serde_json::from_str(&engine.saved_event("proj-9", None)).unwrap();
        assert_eq!(event["event"], "invitation_saved");
        assert_eq!(event["data"]["projectId"], "proj-9");
        assert!(event.get("userId").is_none());
    }
}
