//! Command registry: ordered key-symbol bindings.
//!
//! Lookup is a linear scan in registration order, so when two bindings share
//! a symbol the one registered first wins. Overlap is allowed, not rejected.

use std::fmt;
use std::io::{self, Write};
use std::slice;
use std::sync::Arc;

use crate::error::{DispatchError, Result};

/// Callable bound to a key; receives the matched symbol.
pub type ActionFn = dyn Fn(&str) + Send + Sync;

/// Normalized key symbols of one binding.
///
/// A single string is split into one symbol per character (`"qQ"` becomes
/// `["q", "Q"]`); an explicit list is kept as given, so multi-character names
/// such as `"KEY_ESCAPE"` survive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Symbols(Vec<String>);

impl Symbols {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|sym| sym == key)
    }
}

impl From<&str> for Symbols {
    fn from(chars: &str) -> Self {
        Self(chars.chars().map(String::from).collect())
    }
}

impl From<String> for Symbols {
    fn from(chars: String) -> Self {
        Self::from(chars.as_str())
    }
}

impl From<&[&str]> for Symbols {
    fn from(list: &[&str]) -> Self {
        Self(list.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Symbols {
    fn from(list: [&str; N]) -> Self {
        Self::from(&list[..])
    }
}

impl From<Vec<&str>> for Symbols {
    fn from(list: Vec<&str>) -> Self {
        Self::from(list.as_slice())
    }
}

impl From<Vec<String>> for Symbols {
    fn from(list: Vec<String>) -> Self {
        Self(list)
    }
}

impl From<&[String]> for Symbols {
    fn from(list: &[String]) -> Self {
        Self(list.to_vec())
    }
}

/// Key symbols, an action, and a help description.
///
/// Immutable once built; the registry shares bindings by `Arc`.
#[derive(Clone)]
pub struct Binding {
    symbols: Symbols,
    action: Arc<ActionFn>,
    description: String,
}

impl Binding {
    pub fn new<F>(symbols: impl Into<Symbols>, action: F, description: impl Into<String>) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        Self {
            symbols: symbols.into(),
            action: Arc::new(action),
            description: description.into(),
        }
    }

    pub fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn matches(&self, key: &str) -> bool {
        self.symbols.contains(key)
    }

    /// Run the action on the calling thread.
    pub fn invoke(&self, symbol: &str) {
        (self.action)(symbol)
    }

    /// Help line: `["h", "H", "?"] command help`.
    pub fn help_line(&self) -> String {
        format!("{:?} {}", self.symbols.as_slice(), self.description)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.symbols.as_slice(), self.description)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("symbols", &self.symbols)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Insertion-ordered, append-only list of bindings.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    bindings: Vec<Arc<Binding>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a prepared list, rejecting bindings without symbols.
    pub fn with_bindings(bindings: impl IntoIterator<Item = Binding>) -> Result<Self> {
        let mut registry = Self::new();
        for (index, binding) in bindings.into_iter().enumerate() {
            if binding.symbols().is_empty() {
                return Err(DispatchError::EmptySymbols { index });
            }
            registry.push(binding);
        }
        Ok(registry)
    }

    /// Register an action for one or more key symbols.
    ///
    /// Never fails. Duplicate symbols across bindings are kept; the earliest
    /// registration keeps winning lookups.
    pub fn add<F>(&mut self, symbols: impl Into<Symbols>, action: F, description: impl Into<String>)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.push(Binding::new(symbols, action, description));
    }

    pub fn push(&mut self, binding: Binding) {
        if binding.symbols().is_empty() {
            tracing::warn!(
                description = binding.description(),
                "binding has no key symbols and will never match"
            );
        }
        tracing::debug!(binding = %binding, "binding registered");
        self.bindings.push(Arc::new(binding));
    }

    /// First binding, in registration order, that lists `key`.
    pub fn find_action(&self, key: &str) -> Option<&Arc<Binding>> {
        self.bindings.iter().find(|binding| binding.matches(key))
    }

    pub fn iter(&self) -> slice::Iter<'_, Arc<Binding>> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Help listing in registration order, optionally printed to stdout.
    ///
    /// The listing is a snapshot: bindings added afterwards do not appear.
    pub fn list_descriptions(&self, print: bool) -> Descriptions {
        let descriptions = Descriptions {
            bindings: self.bindings.clone(),
        };
        if print {
            if let Err(err) = descriptions.print() {
                tracing::warn!(%err, "failed to print command help");
            }
        }
        descriptions
    }
}

/// Snapshot of the registry for help output.
///
/// Lines are formatted lazily on each iteration; iterate as often as needed.
#[derive(Debug, Clone)]
pub struct Descriptions {
    bindings: Vec<Arc<Binding>>,
}

impl Descriptions {
    pub fn iter(&self) -> DescriptionLines<'_> {
        DescriptionLines {
            inner: self.bindings.iter(),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Write every line to stdout.
    ///
    /// Lines end with `\r\n` so they render correctly while the terminal is in
    /// raw mode as well as in cooked mode.
    pub fn print(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for line in self.iter() {
            write!(out, "{line}\r\n")?;
        }
        out.flush()
    }
}

impl<'a> IntoIterator for &'a Descriptions {
    type Item = String;
    type IntoIter = DescriptionLines<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct DescriptionLines<'a> {
    inner: slice::Iter<'a, Arc<Binding>>,
}

impl Iterator for DescriptionLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|binding| binding.help_line())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for DescriptionLines<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Send + Sync + Clone + 'static) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let action = move |sym: &str| sink.lock().unwrap().push(sym.to_string());
        (log, action)
    }

    #[test]
    fn test_string_symbols_split_into_chars() {
        assert_eq!(Symbols::from("qQ").as_slice(), &["q", "Q"]);
        assert_eq!(Symbols::from("テスト").as_slice(), &["テ", "ス", "ト"]);
        assert!(Symbols::from("").is_empty());
    }

    #[test]
    fn test_symbol_list_kept_as_given() {
        let symbols = Symbols::from(["q", "Q", "KEY_ESCAPE"]);
        assert_eq!(symbols.as_slice(), &["q", "Q", "KEY_ESCAPE"]);
        assert!(symbols.contains("KEY_ESCAPE"));
        assert!(!symbols.contains("K"));

        let owned = Symbols::from(vec!["KEY_F1".to_string()]);
        assert_eq!(owned.as_slice(), &["KEY_F1"]);
    }

    #[test]
    fn test_find_action_returns_first_registered_match() {
        let (log, action) = recorder();
        let mut registry = CommandRegistry::new();
        registry.add("ab", action.clone(), "first");
        registry.add(["b", "c"], action, "second");

        let hit = registry.find_action("b").unwrap();
        assert_eq!(hit.description(), "first");
        assert_eq!(registry.find_action("c").unwrap().description(), "second");
        assert!(registry.find_action("z").is_none());

        hit.invoke("b");
        assert_eq!(log.lock().unwrap().as_slice(), &["b"]);
    }

    #[test]
    fn test_string_and_list_forms_match_identically() {
        let (_log, action) = recorder();
        let mut by_string = CommandRegistry::new();
        by_string.add("qQ", action.clone(), "quit");
        let mut by_list = CommandRegistry::new();
        by_list.add(["q", "Q"], action, "quit");

        for key in ["q", "Q", "qQ", "x"] {
            assert_eq!(
                by_string.find_action(key).is_some(),
                by_list.find_action(key).is_some(),
                "mismatch for {key:?}"
            );
        }
    }

    #[test]
    fn test_descriptions_are_ordered_and_restartable() {
        let (_log, action) = recorder();
        let mut registry = CommandRegistry::new();
        registry.add("hH?", action.clone(), "command help");
        registry.add(["q", "KEY_ESCAPE"], action.clone(), "quit");

        let listing = registry.list_descriptions(false);
        let first: Vec<String> = listing.iter().collect();
        let second: Vec<String> = listing.iter().collect();
        assert_eq!(
            first,
            vec![
                "[\"h\", \"H\", \"?\"] command help".to_string(),
                "[\"q\", \"KEY_ESCAPE\"] quit".to_string(),
            ]
        );
        assert_eq!(first, second);
        assert_eq!(listing.iter().len(), 2);

        // Snapshot semantics.
        registry.add("x", action, "later");
        assert_eq!(listing.len(), 2);
        assert_eq!(registry.list_descriptions(false).len(), 3);
    }

    #[test]
    fn test_with_bindings_rejects_empty_symbols() {
        let (_log, action) = recorder();
        let err = CommandRegistry::with_bindings(vec![
            Binding::new("a", action.clone(), "ok"),
            Binding::new(Vec::<String>::new(), action, "broken"),
        ])
        .unwrap_err();
        assert!(matches!(err, DispatchError::EmptySymbols { index: 1 }));
    }

    #[test]
    fn test_add_accepts_empty_symbols_without_matching() {
        let (_log, action) = recorder();
        let mut registry = CommandRegistry::new();
        registry.add("", action, "never");
        assert_eq!(registry.len(), 1);
        assert!(registry.find_action("").is_none());
    }

    #[test]
    fn test_binding_display() {
        let binding = Binding::new(["q", "Q"], |_: &str| {}, "quit");
        assert_eq!(binding.to_string(), "[\"q\", \"Q\"]:quit");
        assert_eq!(binding.help_line(), "[\"q\", \"Q\"] quit");
    }
}
