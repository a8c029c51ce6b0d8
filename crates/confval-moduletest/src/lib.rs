//! Plain records describing the outcome of configuration test assertions.

pub mod diag {
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum Severity {
        Error,
        Warning,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Diagnostic {
        pub severity: Severity,
        pub summary: String,
        #[serde(default)]
        pub detail: String,
    }

    impl Diagnostic {
        pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
            Diagnostic {
                severity: Severity::Error,
                summary: summary.into(),
                detail: detail.into(),
            }
        }

        pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
            Diagnostic {
                severity: Severity::Warning,
                summary: summary.into(),
                detail: detail.into(),
            }
        }
    }

    /// True if any diagnostic is an error.
    pub fn has_errors(diags: &[Diagnostic]) -> bool {
        diags.iter().any(|d| d.severity == Severity::Error)
    }
}

pub mod moduletest {
    use super::diag::Diagnostic;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use std::fmt;

    /// Outcome of a test assertion. Serialized as its one-character symbol.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(into = "char", try_from = "char")]
    pub enum Status {
        /// Registered during planning but no outcome recorded, e.g. because an
        /// upstream failure blocked it.
        Pending,
        /// The condition succeeded.
        Passed,
        /// The condition was valid but did not succeed.
        Failed,
        /// The condition was invalid, or reporting failed some other way.
        Error,
    }

    impl Status {
        pub fn symbol(self) -> char {
            match self {
                Status::Pending => '?',
                Status::Passed => 'P',
                Status::Failed => 'F',
                Status::Error => 'E',
            }
        }

        pub fn from_symbol(c: char) -> Option<Self> {
            match c {
                '?' => Some(Status::Pending),
                'P' => Some(Status::Passed),
                'F' => Some(Status::Failed),
                'E' => Some(Status::Error),
                _ => None,
            }
        }

        // Error > Failed > Pending > Passed
        fn severity(self) -> u8 {
            match self {
                Status::Passed => 0,
                Status::Pending => 1,
                Status::Failed => 2,
                Status::Error => 3,
            }
        }

        /// The more severe of two outcomes.
        pub fn worst(self, other: Status) -> Status {
            if other.severity() > self.severity() {
                other
            } else {
                self
            }
        }
    }

    impl fmt::Display for Status {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.symbol())
        }
    }

    impl From<Status> for char {
        fn from(s: Status) -> char {
            s.symbol()
        }
    }

    impl TryFrom<char> for Status {
        type Error = String;

        fn try_from(c: char) -> Result<Self, String> {
            Status::from_symbol(c).ok_or_else(|| format!("unknown test status symbol {c:?}"))
        }
    }

    /// A single test assertion, successful or not.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Assertion {
        pub outcome: Status,
        /// User-provided description of what the assertion represents.
        #[serde(default)]
        pub description: String,
        /// Explanation of the problem; usually only set for failed or errored
        /// assertions.
        #[serde(default)]
        pub message: String,
        #[serde(default)]
        pub diagnostics: Vec<Diagnostic>,
    }

    impl Assertion {
        pub fn new(outcome: Status, description: impl Into<String>) -> Self {
            Assertion {
                outcome,
                description: description.into(),
                message: String::new(),
                diagnostics: Vec::new(),
            }
        }

        pub fn with_message(mut self, message: impl Into<String>) -> Self {
            self.message = message.into();
            self
        }

        pub fn with_diagnostic(mut self, diag: Diagnostic) -> Self {
            self.diagnostics.push(diag);
            self
        }
    }

    /// A component under test and its assertions, keyed by assertion name.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Component {
        pub assertions: BTreeMap<String, Assertion>,
    }

    /// Identifies an assertion within a test run.
    #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub struct AssertionKey {
        /// Grouping name chosen by the user; consumers may group results by it.
        pub component_name: String,
        /// Unique within its component, so results can be correlated between runs.
        pub assertion_name: String,
    }

    impl AssertionKey {
        pub fn new(component_name: impl Into<String>, assertion_name: impl Into<String>) -> Self {
            AssertionKey {
                component_name: component_name.into(),
                assertion_name: assertion_name.into(),
            }
        }
    }

    impl fmt::Display for AssertionKey {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}.{}", self.component_name, self.assertion_name)
        }
    }

    /// Results of one test suite, keyed by component name.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Suite {
        pub components: BTreeMap<String, Component>,
    }

    impl Suite {
        pub fn assertion(&self, key: &AssertionKey) -> Option<&Assertion> {
            self.components
                .get(&key.component_name)?
                .assertions
                .get(&key.assertion_name)
        }

        /// Inserts or replaces the assertion at `key`.
        pub fn record(&mut self, key: AssertionKey, assertion: Assertion) {
            self.components
                .entry(key.component_name)
                .or_default()
                .assertions
                .insert(key.assertion_name, assertion);
        }

        /// Every assertion with its key, in component then assertion order.
        pub fn assertions(&self) -> impl Iterator<Item = (AssertionKey, &Assertion)> {
            self.components.iter().flat_map(|(component, c)| {
                c.assertions
                    .iter()
                    .map(move |(name, a)| (AssertionKey::new(component.as_str(), name.as_str()), a))
            })
        }

        /// Worst outcome of all assertions; a suite with none is pending.
        pub fn status(&self) -> Status {
            self.assertions()
                .map(|(_, a)| a.outcome)
                .reduce(Status::worst)
                .unwrap_or(Status::Pending)
        }
    }
}
