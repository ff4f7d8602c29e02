//! Stand-in type names
//!
//! A stand-in for `app::User` under namespace `Proxies` is named
//! `Proxies::__CG__::app::User`. The marker segment makes the mapping
//! reversible without any registry lookup.

/// Reserved path segment separating the proxy namespace from the target type
pub const MARKER: &str = "__CG__";

const MARKER_SEGMENT: &str = "::__CG__::";

/// Decorated name of the stand-in for `target` under `namespace`
pub fn stand_in_name(target: &str, namespace: &str) -> String {
    format!(
        "{}{}{}",
        namespace.trim_end_matches("::"),
        MARKER_SEGMENT,
        target.trim_start_matches("::")
    )
}

/// Recovers mapped type names from stand-in names
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassNameResolver;

impl ClassNameResolver {
    pub fn new() -> Self {
        Self
    }

    /// Name following the last marker segment, or `name` itself when it was
    /// never a stand-in name
    pub fn resolve<'a>(&self, name: &'a str) -> &'a str {
        match name.rfind(MARKER_SEGMENT) {
            Some(pos) => &name[pos + MARKER_SEGMENT.len()..],
            None => name,
        }
    }

    /// Whether `name` carries the marker segment
    pub fn is_stand_in(&self, name: &str) -> bool {
        name.contains(MARKER_SEGMENT)
    }

    /// Proxy namespace in front of the last marker segment
    pub fn namespace<'a>(&self, name: &'a str) -> Option<&'a str> {
        name.rfind(MARKER_SEGMENT).map(|pos| &name[..pos])
    }
}
