// src/internal/router/context.rs

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// A single value carried in a log [`Context`].
#[derive(Clone)]
pub enum ContextValue {
    Json(Value),
    /// Any object with a textual representation.
    Display(Arc<dyn fmt::Display + Send + Sync>),
}

impl ContextValue {
    pub fn display<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        ContextValue::Display(Arc::new(value))
    }

    /// Text used for placeholder substitution, or `None` when the value has
    /// no safe string form (arrays and objects).
    ///
    /// Scalars follow the usual bot-framework string cast: `true` is `"1"`,
    /// `false` and `null` are empty, integral floats drop their `.0`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            ContextValue::Json(Value::Null) => Some(String::new()),
            ContextValue::Json(Value::Bool(true)) => Some("1".to_string()),
            ContextValue::Json(Value::Bool(false)) => Some(String::new()),
            ContextValue::Json(Value::Number(n)) => Some(number_text(n)),
            ContextValue::Json(Value::String(s)) => Some(s.clone()),
            ContextValue::Json(Value::Array(_)) | ContextValue::Json(Value::Object(_)) => None,
            ContextValue::Display(d) => Some(d.to_string()),
        }
    }
}

fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

impl fmt::Debug for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextValue::Json(v) => write!(f, "Json({})", v),
            ContextValue::Display(d) => write!(f, "Display({})", d),
        }
    }
}

impl PartialEq for ContextValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ContextValue::Json(a), ContextValue::Json(b)) => a == b,
            (ContextValue::Display(a), ContextValue::Display(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

macro_rules! json_context_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for ContextValue {
                fn from(value: $t) -> Self {
                    ContextValue::Json(Value::from(value))
                }
            }
        )*
    };
}

json_context_value!(Value, bool, i32, i64, u32, u64, usize, f64, String, &str);

/// Key/value pairs attached to a log call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    entries: BTreeMap<String, ContextValue>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ContextValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.entries.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Replace `{key}` placeholders in `message` with values from this
    /// context.
    ///
    /// Only keys whose value has a text form are substituted; everything
    /// else stays literal. Where several keys match at one position the
    /// longest wins. Substituted text is never rescanned.
    pub fn interpolate(&self, message: &str) -> String {
        let mut placeholders: Vec<(String, String)> = self
            .entries
            .iter()
            .filter_map(|(key, value)| value.as_text().map(|text| (format!("{{{}}}", key), text)))
            .collect();

        if placeholders.is_empty() {
            return message.to_string();
        }
        placeholders.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        let mut out = String::with_capacity(message.len());
        let mut rest = message;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];

            match placeholders
                .iter()
                .find(|(placeholder, _)| tail.starts_with(placeholder.as_str()))
            {
                Some((placeholder, text)) => {
                    out.push_str(text);
                    rest = &tail[placeholder.len()..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }

        out.push_str(rest);
        out
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<ContextValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut context = Context::new();
        for (k, v) in iter {
            context.insert(k, v);
        }
        context
    }
}

/// Build a [`Context`] from `key => value` pairs.
#[macro_export]
macro_rules! context {
    () => {
        $crate::Context::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Context::new()$(.with($key, $value))+
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct UserId(u32);

    impl fmt::Display for UserId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "user#{}", self.0)
        }
    }

    #[test]
    fn test_interpolate_scalar() {
        let context = Context::new().with("id", 42);
        assert_eq!(context.interpolate("User {id} failed"), "User 42 failed");
    }

    #[test]
    fn test_interpolate_leaves_unstringifiable_values_literal() {
        let context = Context::new()
            .with("obj", json!({"a": 1}))
            .with("list", json!([1, 2]));

        assert_eq!(context.interpolate("got {obj} and {list}"), "got {obj} and {list}");
    }

    #[test]
    fn test_interpolate_uses_display_objects() {
        let context = Context::new().with("user", ContextValue::display(UserId(7)));
        assert_eq!(context.interpolate("hello {user}"), "hello user#7");
    }

    #[test]
    fn test_interpolate_is_single_pass() {
        let context = Context::new().with("a", "{b}").with("b", "nope");
        assert_eq!(context.interpolate("{a}"), "{b}");
    }

    #[test]
    fn test_interpolate_unknown_and_malformed_placeholders() {
        let context = Context::new().with("id", 1);

        assert_eq!(context.interpolate("{missing} {id}"), "{missing} 1");
        assert_eq!(context.interpolate("open { brace {id"), "open { brace {id");
        assert_eq!(context.interpolate("{{id}}"), "{1}");
        assert_eq!(context.interpolate("{id}{id}"), "11");
    }

    #[test]
    fn test_interpolate_scalar_forms() {
        let context = Context::new()
            .with("nil", Value::Null)
            .with("yes", true)
            .with("pi", 3.5)
            .with("name", "bot");

        assert_eq!(
            context.interpolate("[{nil}] {yes} {pi} {name}"),
            "[] 1 3.5 bot"
        );
    }

    #[test]
    fn test_interpolate_casts_like_the_framework() {
        let context = Context::new()
            .with("t", true)
            .with("f", false)
            .with("x", 3.0)
            .with("neg", -2.0)
            .with("big", u64::MAX);

        assert_eq!(
            context.interpolate("[{t}][{f}][{x}][{neg}][{big}]"),
            "[1][][3][-2][18446744073709551615]"
        );
    }

    #[test]
    fn test_interpolate_prefers_longest_key() {
        let context = Context::new().with("a}", "LONG").with("a", "SHORT");

        assert_eq!(context.interpolate("{a}}"), "LONG");
        assert_eq!(context.interpolate("{a} {a}}"), "SHORT LONG");
    }

    #[test]
    fn test_interpolate_skips_keys_without_text() {
        let context = Context::new().with("a}", json!([1])).with("a", "SHORT");
        assert_eq!(context.interpolate("{a}}"), "SHORT}");
    }

    #[test]
    fn test_interpolate_empty_context_returns_message() {
        assert_eq!(Context::new().interpolate("{id}"), "{id}");
    }

    #[test]
    fn test_interpolate_multibyte_text() {
        let context = Context::new().with("név", "ok");
        assert_eq!(context.interpolate("ü {név} ü"), "ü ok ü");
    }

    #[test]
    fn test_context_macro() {
        let context = crate::context! { "id" => 42, "name" => "bot" };
        assert_eq!(context.len(), 2);
        assert_eq!(context.get("name"), Some(&ContextValue::from("bot")));
    }
}
