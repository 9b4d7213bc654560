use scraper::{Html, Selector};
use serde_json::Value;
use crate::error::{Result, VaultKeyError};
use crate::http::parse_json;

const WIDGET_CONF_MARKER: &str = "window.widgetConf";

/// Pulls the `window.widgetConf = {...};` object out of a widget page.
pub fn extract_widget_configuration(html: &str) -> Result<Value> {
    let document = Html::parse_document(html);
    let scripts = Selector::parse("script").map_err(|e| VaultKeyError::ScrapeLayout(e.to_string()))?;

    for script in document.select(&scripts) {
        let text: String = script.text().collect();
        let Some(marker) = text.find(WIDGET_CONF_MARKER) else {
            continue;
        };
        let start = text[marker..]
            .find('{')
            .map(|i| marker + i)
            .ok_or_else(|| VaultKeyError::MalformedResponse("widget configuration has no object".to_string()))?;
        let end = text[start..]
            .find(';')
            .map(|i| start + i)
            .unwrap_or(text.len());
        return parse_json(&text[start..end]);
    }

    Err(VaultKeyError::MalformedResponse("Could not get VIP widget configuration.".to_string()))
}

/// Widget ids of every `code-redemption` entry in an activity-list configuration.
pub fn code_redemption_widget_ids(activity_list: &Value) -> Vec<String> {
    activity_list["entries"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter(|entry| entry["link"]["widgetType"] == "code-redemption")
                .filter_map(|entry| json_id(&entry["link"]["widgetId"]))
                .collect()
        })
        .unwrap_or_default()
}

/// Ids show up both as numbers and strings depending on the widget.
pub fn json_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
