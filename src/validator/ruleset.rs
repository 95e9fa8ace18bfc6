//! Rule-set value object: a combination mode plus ordered rules.

use serde_json::Value;

/// How a rule set combines its rules: every rule must pass, or any one
/// rule passing is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMode {
    All,
    Any,
}

/// A combination mode bundled with an ordered list of rule descriptors.
///
/// Each descriptor is either a rule name (`"email"`) or an array whose
/// first element is the name and whose remainder are parameters
/// (`["maxLength", 80]`), the same shapes a field's `validation`
/// property carries, so a field's descriptors can be bundled directly.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    mode: RuleMode,
    rules: Vec<Value>,
}

impl RuleSet {
    pub fn new(mode: RuleMode, rules: Vec<Value>) -> Self {
        Self { mode, rules }
    }

    /// A set requiring every rule to pass.
    pub fn all(rules: Vec<Value>) -> Self {
        Self::new(RuleMode::All, rules)
    }

    /// A set requiring at least one rule to pass.
    pub fn any(rules: Vec<Value>) -> Self {
        Self::new(RuleMode::Any, rules)
    }

    pub fn mode(&self) -> RuleMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: RuleMode) {
        self.mode = mode;
    }

    pub fn rules(&self) -> &[Value] {
        &self.rules
    }

    pub fn set_rules(&mut self, rules: Vec<Value>) {
        self.rules = rules;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_constructors_set_mode() {
        let set = RuleSet::all(vec![json!("email")]);
        assert_eq!(set.mode(), RuleMode::All);

        let set = RuleSet::any(vec![json!("number"), json!("date")]);
        assert_eq!(set.mode(), RuleMode::Any);
        assert_eq!(set.rules().len(), 2);
    }
}
