//! Include/exclude filters for directory sync
//!
//! Rules are evaluated in order and the last matching rule wins. Paths that
//! match no rule are included.

use glob::Pattern;

#[derive(Debug, Clone)]
pub enum FilterRule {
    Include(Pattern),
    Exclude(Pattern),
}

impl FilterRule {
    fn pattern(&self) -> &Pattern {
        match self {
            FilterRule::Include(p) | FilterRule::Exclude(p) => p,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SyncFilters {
    rules: Vec<FilterRule>,
}

impl SyncFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include(mut self, pattern: &str) -> Result<Self, glob::PatternError> {
        self.rules.push(FilterRule::Include(Pattern::new(pattern)?));
        Ok(self)
    }

    pub fn exclude(mut self, pattern: &str) -> Result<Self, glob::PatternError> {
        self.rules.push(FilterRule::Exclude(Pattern::new(pattern)?));
        Ok(self)
    }

    pub fn rules(&self) -> &[FilterRule] {
        &self.rules
    }

    /// Whether a `/`-separated path relative to the sync root passes
    pub fn matches(&self, relative_path: &str) -> bool {
        let mut included = true;
        for rule in &self.rules {
            if rule.pattern().matches(relative_path) {
                included = matches!(rule, FilterRule::Include(_));
            }
        }
        included
    }

    /// Arguments in `aws s3 sync` form
    pub fn to_cli_args(&self) -> Vec<String> {
        self.rules
            .iter()
            .map(|rule| match rule {
                FilterRule::Include(p) => format!("--include={}", p.as_str()),
                FilterRule::Exclude(p) => format!("--exclude={}", p.as_str()),
            })
            .collect()
    }
}
