//! Expressions evaluated inside the page.

pub fn count(selector: &str) -> String {
    let quoted = serde_json::to_string(selector).unwrap_or_else(|_| format!("{:?}", selector));
    format!("document.querySelectorAll({}).length", quoted)
}

pub fn scroll_to(y: f64) -> String {
    format!("window.scrollTo(0, {})", y)
}

pub fn scroll_to_bottom(offset: f64) -> String {
    format!(
        "window.scrollTo(0, document.body.scrollHeight - ({}))",
        offset
    )
}

/// Resolves once the resource count has been stable for `idle_ms`, or with
/// `ok: false` after `timeout_ms`.
pub fn network_idle(idle_ms: u64, timeout_ms: u64) -> String {
    format!(
        r#"(async () => {{
            const idleMs = {idle_ms};
            const timeoutMs = {timeout_ms};
            const interval = 100;
            const start = Date.now();
            const resources = () => {{
                try {{ return performance.getEntriesByType('resource').length; }} catch (_) {{ return 0; }}
            }};
            let last = resources();
            let stable = 0;
            while (Date.now() - start < timeoutMs) {{
                await new Promise(r => setTimeout(r, interval));
                const current = resources();
                if (document.readyState === 'complete' && current === last) {{
                    stable += interval;
                    if (stable >= idleMs) {{
                        return {{ ok: true, waitedMs: Date.now() - start, resourceCount: current }};
                    }}
                }} else {{
                    stable = 0;
                }}
                last = current;
            }}
            return {{ ok: false, waitedMs: Date.now() - start, resourceCount: last }};
        }})()"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_quotes_selector() {
        assert_eq!(
            count("div.AnswerItem"),
            r#"document.querySelectorAll("div.AnswerItem").length"#
        );
        assert_eq!(
            count(r#"a[href="x"]"#),
            r#"document.querySelectorAll("a[href=\"x\"]").length"#
        );
    }

    #[test]
    fn test_scroll_expressions() {
        assert_eq!(scroll_to(60.0), "window.scrollTo(0, 60)");
        assert_eq!(
            scroll_to_bottom(12.5),
            "window.scrollTo(0, document.body.scrollHeight - (12.5))"
        );
    }

    #[test]
    fn test_network_idle_embeds_limits() {
        let script = network_idle(500, 30000);
        assert!(script.contains("const idleMs = 500;"));
        assert!(script.contains("const timeoutMs = 30000;"));
    }
}
