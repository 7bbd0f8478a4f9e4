use std::collections::HashMap;

/// The variable map for one compilation pass.
///
/// A Context has exactly one owner (the document compiler) and is passed
/// by reference through every node compile in the sequential walk; it is
/// never aliased beyond the active call tree, so read-after-write ordering
/// needs no synchronization. Variable blocks mutate it, tag blocks only
/// read it.
#[derive(Debug, Default)]
pub struct Context {
    vars: HashMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Context::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    /// Merge a variable block's assignments, overwriting existing keys.
    pub fn merge(&mut self, assignments: &HashMap<String, String>) {
        for (key, value) in assignments {
            self.vars.insert(key.clone(), value.clone());
        }
    }

    /// Replace every `$identifier` substring with its current value.
    /// Unresolved references stay literal, `$` included, so a missing
    /// variable is visible in the output rather than an error.
    pub fn interpolate(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '$' {
                out.push(c);
                continue;
            }

            let mut name = String::new();
            while let Some(&next) = chars.peek() {
                if next.is_alphanumeric() || next == '_' {
                    name.push(next);
                    chars.next();
                } else {
                    break;
                }
            }

            if name.is_empty() {
                out.push('$');
            } else {
                match self.vars.get(&name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('$');
                        out.push_str(&name);
                    }
                }
            }
        }

        out
    }
}
