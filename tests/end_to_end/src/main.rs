fn main() {
    println!("Run `cargo test -p end-to-end` to execute the pipeline tests.");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio_util::sync::CancellationToken;

    use logsieve_bridge::{BridgeHandle, Relay};
    use logsieve_panel::{Clipboard, Controller, PanelError, SettingsStore, filter_indices};
    use logsieve_protocol::{LogEntry, LogKind};
    use logsieve_recorder::{Page, PageValue};

    struct MemoryClipboard(Arc<std::sync::Mutex<Vec<String>>>);

    impl Clipboard for MemoryClipboard {
        fn set_text(&mut self, text: String) -> Result<(), PanelError> {
            self.0.lock().unwrap().push(text);
            Ok(())
        }
    }

    fn bridged_page() -> (Arc<Page>, BridgeHandle) {
        let page = Arc::new(Page::new());
        let relay = Relay::attached_to(&page);
        let (handle, _task) = logsieve_bridge::spawn(relay, CancellationToken::new());
        (page, handle)
    }

    #[tokio::test]
    async fn capture_to_dump_is_deep_equal_but_detached() {
        let (page, handle) = bridged_page();
        page.install();

        let original = PageValue::object(vec![("a", PageValue::Number(1.0))]);
        page.console().log(&[PageValue::str("hello"), original.clone()]);

        let resp = handle.get_logs().await.unwrap();
        assert!(resp.error.is_none());
        assert_eq!(resp.logs.len(), 1);

        let entry = &resp.logs[0];
        assert_eq!(entry.kind, LogKind::Log);
        assert_eq!(entry.preview, "hello");
        assert_eq!(entry.arguments[0], serde_json::json!("hello"));
        assert_eq!(entry.arguments[1], serde_json::json!({"a": 1.0}));

        // The copy is detached: mutating the page-side value afterwards
        // does not change what was captured.
        if let PageValue::Object(cell) = &original {
            cell.borrow_mut().push(("b".into(), PageValue::Number(2.0)));
        }
        let resp = handle.get_logs().await.unwrap();
        assert_eq!(resp.logs[0].arguments[1], serde_json::json!({"a": 1.0}));
    }

    #[tokio::test]
    async fn round_trip_carries_the_buffer_in_capture_order() {
        let (page, handle) = bridged_page();
        page.install();
        for n in 0..50 {
            page.console().log(&[PageValue::Number(n as f64)]);
        }
        let resp = handle.get_logs().await.unwrap();
        assert_eq!(resp.logs.len(), 50);
        for (n, entry) in resp.logs.iter().enumerate() {
            assert_eq!(entry.preview, format!("{n}"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_reinstall_then_retry_succeeds() {
        let page = Arc::new(Page::new());
        let installs = Arc::new(AtomicUsize::new(0));
        let counted = installs.clone();
        let target = page.clone();
        let relay = Relay::new(
            page.bus().clone(),
            page.slot().clone(),
            Arc::new(move || {
                counted.fetch_add(1, Ordering::SeqCst);
                target.install();
            }),
        );
        let (handle, _task) = logsieve_bridge::spawn(relay, CancellationToken::new());

        // Nothing installed yet: first request times out, re-installs once.
        let resp = handle.get_logs().await.unwrap();
        assert!(resp.logs.is_empty());
        assert!(resp.error.is_some());
        assert_eq!(installs.load(Ordering::SeqCst), 1);

        // The retry the error asks for now works.
        page.console().warn(&[PageValue::str("back")]);
        let resp = handle.get_logs().await.unwrap();
        assert!(resp.error.is_none());
        assert_eq!(resp.logs.len(), 1);
        assert_eq!(resp.logs[0].preview, "back");
        assert_eq!(installs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn clear_round_trip_resets_everything() {
        let (page, handle) = bridged_page();
        let recorder = page.install();
        page.console().log(&[PageValue::str("stale")]);

        let resp = handle.clear_logs().await.unwrap();
        assert!(resp.success);
        assert!(recorder.is_empty());

        let resp = handle.get_logs().await.unwrap();
        assert!(resp.logs.is_empty());
        assert!(resp.error.is_none());
    }

    #[tokio::test]
    async fn full_panel_flow_filter_select_export() {
        let (page, handle) = bridged_page();
        page.install();
        for preview in ["apple pie", "Banana", "APPLE sauce", "cherry"] {
            page.console().log(&[PageValue::str(preview)]);
        }

        let dir = tempfile::tempdir().unwrap();
        let settings = SettingsStore::new(dir.path().join("settings.json")).unwrap();
        let copied = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut ctl = Controller::new(handle, settings, Box::new(MemoryClipboard(copied.clone())));

        ctl.refresh(false).await;
        ctl.set_pattern("apple");
        assert_eq!(ctl.stats_line(), "2 of 4 logs");

        ctl.set_selected(1, true);
        ctl.copy_selected();

        let texts = copied.lock().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&texts[0]).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
        assert_eq!(parsed[0]["args"][0], "APPLE sauce");
    }

    #[tokio::test]
    async fn hostile_arguments_survive_the_whole_pipeline() {
        let (page, handle) = bridged_page();
        page.install();

        let cyclic = PageValue::object(vec![("tag", PageValue::str("root"))]);
        if let PageValue::Object(cell) = &cyclic {
            cell.borrow_mut().push(("me".into(), cyclic.clone()));
        }
        page.console().error(&[
            cyclic,
            PageValue::Poisoned,
            PageValue::complex("Gadget", vec![("cb", PageValue::Function("f".into()))]),
        ]);

        let resp = handle.get_logs().await.unwrap();
        let entry = &resp.logs[0];
        assert_eq!(
            entry.arguments[0]["me"],
            serde_json::json!("[Circular Reference]")
        );
        assert_eq!(
            entry.arguments[1],
            serde_json::json!("[Error cloning argument]")
        );
        assert_eq!(
            entry.arguments[2],
            serde_json::json!("[Non-serializable object: Gadget]")
        );
    }

    #[test]
    fn filter_function_is_pure_over_wire_entries() {
        let json = r#"[
            {"type":"log","timestamp":"2024-05-01T00:00:00.000Z","preview":"apple pie","args":[],"source":"console"},
            {"type":"warn","timestamp":"2024-05-01T00:00:01.000Z","preview":"Banana","args":[],"source":"console"},
            {"type":"log","timestamp":"2024-05-01T00:00:02.000Z","preview":"APPLE sauce","args":[],"source":"console"}
        ]"#;
        let entries: Vec<LogEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(filter_indices(&entries, "apple", false), vec![0, 2]);
        // An unparseable regex degrades to substring matching: "[" occurs
        // in none of these previews, so nothing matches and nothing errors.
        assert_eq!(filter_indices(&entries, "[", true), Vec::<usize>::new());
    }
}
