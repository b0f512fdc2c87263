use crate::value::Value;
use indexmap::IndexMap;

/// Environment holds the variable bindings of one session. Bindings keep the position of their
/// first definition, so iteration order is stable across reassignments.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    store: IndexMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set(&mut self, key: &str, value: Value) {
        self.store.insert(key.to_owned(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.store.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.store.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Drops every binding, starting a fresh session.
    pub fn clear(&mut self) {
        self.store.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.store.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::Environment;
    use crate::value::Value;

    #[test]
    fn last_assignment_wins() {
        let mut env = Environment::new();
        env.set("x", Value::Integer(1));
        env.set("x", Value::Str("one".to_owned()));

        assert_eq!(1, env.len());
        assert_eq!(Some(&Value::Str("one".to_owned())), env.get("x"));
    }

    #[test]
    fn iterates_in_definition_order() {
        let mut env = Environment::new();
        env.set("b", Value::Integer(1));
        env.set("a", Value::Integer(2));
        env.set("b", Value::Integer(3));

        let bindings: Vec<(&str, &Value)> = env.iter().collect();

        assert_eq!(
            vec![("b", &Value::Integer(3)), ("a", &Value::Integer(2))],
            bindings
        );
    }

    #[test]
    fn clear_resets_the_session() {
        let mut env = Environment::new();
        env.set("x", Value::Integer(1));
        assert!(env.contains("x"));

        env.clear();

        assert!(env.is_empty());
        assert_eq!(None, env.get("x"));
    }
}
