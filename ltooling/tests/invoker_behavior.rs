use std::sync::Arc;

use chrono::{TimeZone, Utc};
use lcommon::SessionId;
use ltooling::calendar::CalendarEvent;
use ltooling::{
    CalendarSearchTool, InMemoryCalendar, ToolArguments, ToolDefinition, ToolInvoker,
    ToolOutcome, ToolRegistry, parse_json_object,
};
use serde_json::json;

fn registry() -> Arc<ToolRegistry> {
    let standup = Utc
        .with_ymd_and_hms(2025, 3, 3, 9, 0, 0)
        .single()
        .expect("valid timestamp");

    Arc::new(
        ToolRegistry::builder()
            .register(CalendarSearchTool::new(InMemoryCalendar::new(vec![
                CalendarEvent::new("Standup", standup),
            ])))
            .register_fn(
                ToolDefinition::new("notes.lookup", "Looks up a note by key"),
                |_session, args| async move {
                    let key = ltooling::required_string(&args, "key")?;
                    Ok(ToolOutcome::success(json!({"key": key, "note": "buy milk"})))
                },
            )
            .build(),
    )
}

#[tokio::test]
async fn calendar_tool_is_reachable_through_invoker() {
    let invoker = ToolInvoker::new(registry());
    let arguments = parse_json_object(r#"{"query":"standup","start":"2025-03-01"}"#)
        .expect("arguments should parse");

    let outcome = invoker
        .invoke("Calendar.Search", &SessionId::from("s1"), &arguments)
        .await;

    assert!(outcome.ok);
    let data = outcome.data.expect("data should be present");
    assert_eq!(data["events"][0]["title"], "Standup");
    assert_eq!(data["events"][0]["start"], "2025-03-03 09:00");
}

#[tokio::test]
async fn missing_required_argument_is_a_negative_outcome() {
    let invoker = ToolInvoker::new(registry());

    let outcome = invoker
        .invoke("notes.lookup", &SessionId::from("s1"), &ToolArguments::new())
        .await;

    assert!(!outcome.ok);
    assert_eq!(outcome.error.as_deref(), Some("missing required string: 'key'"));
    assert_eq!(
        outcome.prompt_payload(),
        json!({"error": "missing required string: 'key'"})
    );
}

#[test]
fn registry_advertises_every_definition() {
    let definitions = registry().definitions();
    let names: Vec<&str> = definitions
        .iter()
        .map(|definition| definition.name.as_str())
        .collect();

    assert_eq!(names, vec!["calendar.search", "notes.lookup"]);
    assert!(definitions[0].input_schema.contains("\"max\""));
}
