//! Route pattern matching.
//!
//! # Responsibilities
//! - Compile a path template (`/todos/:id`) into segments
//! - Match request paths against the compiled template
//! - Extract named parameters
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - A parameter matches exactly one non-empty segment
//! - No trailing-slash normalization: `/todos/1/` does not match `/todos/:id`
//! - Percent-encoded input is returned as-is
//! - No regex to guarantee O(n) matching

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    template: String,
    segments: Vec<Segment>,
}

/// Named parameters captured by a successful match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    values: HashMap<String, String>,
}

impl PathParams {
    /// Get a captured parameter by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl RoutePattern {
    /// Compile a path template. Segments starting with `:` are parameters.
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let segments = split_path(&template)
            .map(|s| match s.strip_prefix(':') {
                Some(name) if !name.is_empty() => Segment::Param(name.to_string()),
                _ => Segment::Literal(s.to_string()),
            })
            .collect();

        Self { template, segments }
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns true if the path matches this pattern.
    pub fn test(&self, path: &str) -> bool {
        self.exec(path).is_some()
    }

    /// Match a path, returning captured parameters on success.
    pub fn exec(&self, path: &str) -> Option<PathParams> {
        if !path.starts_with('/') {
            return None;
        }

        let parts: Vec<&str> = split_path(path).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::default();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Param(name) if !part.is_empty() => {
                    params.values.insert(name.clone(), part.to_string());
                }
                _ => return None,
            }
        }

        Some(params)
    }
}

// "/" yields no segments; "/a/" yields ["a", ""] so trailing slashes stay significant.
fn split_path(path: &str) -> impl Iterator<Item = &str> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let empty_root = trimmed.is_empty();
    trimmed.split('/').filter(move |_| !empty_root)
}
