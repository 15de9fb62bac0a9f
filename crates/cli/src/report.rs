use sdui_protocol::{ComponentDescriptor, StyleResolver, STYLE_PROPERTY};
use serde_json::{Map, Value};

const MAX_VALUE_CHARS: usize = 32;

/// Flattens a style object into `key=value` pairs for display
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleSummary;

impl StyleResolver for StyleSummary {
    type Handle = String;

    fn resolve(&self, style: &Map<String, Value>) -> String {
        style
            .iter()
            .map(|(key, value)| format!("{key}={}", short_value(value)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Indented, one-line-per-node rendering of a descriptor tree
pub fn render_outline(name: &str, tree: &ComponentDescriptor) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "# {name} ({} nodes, depth {})\n",
        tree.node_count(),
        tree.depth()
    ));
    tree.walk(|depth, node| {
        out.push_str(&"  ".repeat(depth));
        out.push_str(node.component_type().as_str());

        let props: Vec<String> = node
            .properties()
            .iter()
            .filter(|(key, _)| key.as_str() != STYLE_PROPERTY)
            .map(|(key, value)| format!("{key}={}", short_value(value)))
            .collect();
        if !props.is_empty() {
            out.push(' ');
            out.push_str(&props.join(" "));
        }
        if let Some(style) = node.resolve_style(&StyleSummary) {
            out.push_str(&format!(" [{style}]"));
        }
        out.push('\n');
    });
    out
}

fn short_value(value: &Value) -> String {
    let text = match value {
        Value::String(s) => format!("{s:?}"),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    };
    if text.chars().count() <= MAX_VALUE_CHARS {
        return text;
    }
    let mut cut: String = text.chars().take(MAX_VALUE_CHARS - 1).collect();
    cut.push('…');
    cut
}
