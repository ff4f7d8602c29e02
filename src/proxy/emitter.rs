//! Stand-in source generation
//!
//! Fills the stand-in template for one mapped type. The generated source is a
//! typed wrapper around [`Proxy`](crate::Proxy): identifier accessors that
//! never load, guarded accessors for every mapped field, and a serialization
//! routine matching the real type. It is either published as a file (with a
//! banner and checksum header) or defined in the in-process registry.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::domain::ports::{FileSystem, FsError};
use crate::error::{ProxyError, ProxyResult};
use crate::metadata::ClassDescriptor;
use crate::proxy::registry::{StandIn, StandInOrigin, StandInRegistry};
use crate::proxy::resolver::ClassNameResolver;

/// First line of every generated stand-in file
pub const BANNER: &str = "// Generated by docproxy. DO NOT EDIT.";

const STAND_IN_PREFIX: &str = "// stand-in: ";
const TARGET_PREFIX: &str = "// target: ";
const CHECKSUM_PREFIX: &str = "// checksum: sha256:";

/// Default stand-in template.
///
/// Holes: `<namespace>`, `<proxyShortClassName>`, `<className>`,
/// `<standInName>`, `<classNameLiteral>`, `<standInNameLiteral>`,
/// `<lazyAccessors>`, `<isInitialized>`, `<serializeImpl>`. Name holes are
/// escaped for comments; `*Literal` holes are quoted Rust string literals.
pub const STAND_IN_TEMPLATE: &str = r#"//! Stand-in `<standInName>` for `<className>` in namespace `<namespace>`

/// Lazily loaded `<className>`
#[derive(Debug, Clone)]
pub struct <proxyShortClassName> {
    proxy: ::docproxy::Proxy,
}

impl <proxyShortClassName> {
    pub const TARGET: &'static str = <classNameLiteral>;
    pub const STAND_IN: &'static str = <standInNameLiteral>;

    /// Wrap `proxy` when it stands in for `<className>`
    pub fn new(proxy: ::docproxy::Proxy) -> Option<Self> {
        (proxy.class().name() == Self::TARGET).then(|| Self { proxy })
    }

    pub fn proxy(&self) -> &::docproxy::Proxy {
        &self.proxy
    }

    /// Force initialization
    pub fn load(&self) -> ::docproxy::ProxyResult<()> {
        self.proxy.load()
    }

    /// Never loads
    pub fn is_initialized(&self) -> bool {
        <isInitialized>
    }
<lazyAccessors>
    /// Serialize as the real `<className>` would be; never loads
    pub fn serialize(&self) -> ::docproxy::proxy::Serialized {
<serializeImpl>
    }
}
"#;

/// Method names the template already uses
const RESERVED_METHODS: &[&str] = &["new", "proxy", "load", "is_initialized", "serialize"];

const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Result of filling the template for one type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedStandIn {
    /// Generated Rust type name
    pub type_name: String,
    pub stand_in_name: String,
    pub target: String,
    /// Full file content: header lines followed by the body
    pub source: String,
}

impl EmittedStandIn {
    fn into_stand_in(self, origin: StandInOrigin) -> StandIn {
        StandIn {
            name: self.stand_in_name,
            target: self.target,
            source: self.source,
            origin,
        }
    }
}

/// Generates stand-in source
#[derive(Debug, Clone)]
pub struct ProxyEmitter {
    template: String,
}

impl Default for ProxyEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxyEmitter {
    pub fn new() -> Self {
        Self::with_template(STAND_IN_TEMPLATE)
    }

    /// Use a custom template with the same holes as [`STAND_IN_TEMPLATE`]
    pub fn with_template(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// Fill the template for `class` under `stand_in_name`
    pub fn emit(&self, class: &ClassDescriptor, stand_in_name: &str) -> EmittedStandIn {
        let type_name = short_type_name(class.name());
        let namespace = ClassNameResolver::new()
            .namespace(stand_in_name)
            .unwrap_or_default();

        let lazy_accessors = lazy_accessors(class);
        let serialize_impl = serialize_impl(class);
        let namespace = single_line(namespace);
        let class_name = single_line(class.name());
        let stand_in = single_line(stand_in_name);
        let class_literal = format!("{:?}", class.name());
        let stand_in_literal = format!("{stand_in_name:?}");

        let holes: HashMap<&str, &str> = HashMap::from([
            ("namespace", namespace.as_str()),
            ("proxyShortClassName", type_name.as_str()),
            ("className", class_name.as_str()),
            ("standInName", stand_in.as_str()),
            ("classNameLiteral", class_literal.as_str()),
            ("standInNameLiteral", stand_in_literal.as_str()),
            ("lazyAccessors", lazy_accessors.as_str()),
            ("isInitialized", "self.proxy.is_initialized()"),
            ("serializeImpl", serialize_impl.as_str()),
        ]);
        let body = fill_template(&self.template, &holes);

        let source = format!(
            "{BANNER}\n{STAND_IN_PREFIX}{stand_in}\n{TARGET_PREFIX}{class_name}\n{CHECKSUM_PREFIX}{}\n{body}",
            checksum(&body),
        );

        EmittedStandIn {
            type_name,
            stand_in_name: stand_in_name.to_string(),
            target: class.name().to_string(),
            source,
        }
    }

    /// Persist the stand-in for `class` at `path`.
    ///
    /// The parent directory is created when absent. Content is published
    /// atomically, so concurrent generators never expose a partial file.
    pub fn write(
        &self,
        class: &ClassDescriptor,
        path: &Path,
        stand_in_name: &str,
        fs: &dyn FileSystem,
    ) -> ProxyResult<EmittedStandIn> {
        let emitted = self.emit(class, stand_in_name);

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs.ensure_writable_dir(dir).map_err(|err| {
            tracing::debug!(dir = %dir.display(), error = %err, "proxy directory unusable");
            ProxyError::ProxyDirectoryNotWritable {
                path: dir.to_path_buf(),
            }
        })?;
        fs.write_atomic(path, &emitted.source)?;

        tracing::debug!(class = class.name(), path = %path.display(), "stand-in written");
        Ok(emitted)
    }

    /// Define the stand-in for `class` in `registry` unless a stand-in of
    /// that name is already available
    pub fn define(
        &self,
        class: &ClassDescriptor,
        stand_in_name: &str,
        registry: &StandInRegistry,
    ) -> ProxyResult<Arc<StandIn>> {
        if let Some(existing) = registry.get(stand_in_name) {
            return Ok(existing);
        }

        let emitted = self.emit(class, stand_in_name);
        match registry.define(emitted.into_stand_in(StandInOrigin::InMemory)) {
            Ok(defined) => {
                tracing::debug!(class = class.name(), stand_in = stand_in_name, "stand-in defined");
                Ok(defined)
            }
            // Lost a race with another definer
            Err(ProxyError::StandInAlreadyDefined { name }) => registry
                .get(&name)
                .ok_or_else(|| ProxyError::StandInAlreadyDefined { name }),
            Err(err) => Err(err),
        }
    }

    /// Read a generated file back and check it is an intact stand-in named
    /// `stand_in_name` for `class`
    pub fn read_back(
        &self,
        class: &ClassDescriptor,
        path: &Path,
        stand_in_name: &str,
        fs: &dyn FileSystem,
    ) -> ProxyResult<StandIn> {
        let content = fs.read(path).map_err(|err| match err {
            FsError::NotFound(_) => ProxyError::StandInMissing {
                class: class.name().to_string(),
                path: path.to_path_buf(),
            },
            other => ProxyError::Fs(other),
        })?;

        let corrupt = |reason: String| ProxyError::StandInCorrupt {
            path: path.to_path_buf(),
            reason,
        };

        let header = parse_header(&content).map_err(corrupt)?;
        let expected_stand_in = single_line(stand_in_name);
        if header.stand_in != expected_stand_in {
            return Err(corrupt(format!(
                "declares stand-in '{}', expected '{}'",
                header.stand_in, expected_stand_in
            )));
        }
        let expected_target = single_line(class.name());
        if header.target != expected_target {
            return Err(corrupt(format!(
                "stands in for '{}', expected '{}'",
                header.target, expected_target
            )));
        }

        Ok(StandIn {
            name: stand_in_name.to_string(),
            target: class.name().to_string(),
            source: content,
            origin: StandInOrigin::File(path.to_path_buf()),
        })
    }
}

struct Header<'a> {
    stand_in: &'a str,
    target: &'a str,
}

/// Split off and verify the header lines
fn parse_header(content: &str) -> Result<Header<'_>, String> {
    let mut lines = content.splitn(5, '\n');
    let mut next = || lines.next().unwrap_or_default();

    if next() != BANNER {
        return Err("missing generator banner".to_string());
    }
    let stand_in = next()
        .strip_prefix(STAND_IN_PREFIX)
        .ok_or_else(|| "missing stand-in line".to_string())?;
    let target = next()
        .strip_prefix(TARGET_PREFIX)
        .ok_or_else(|| "missing target line".to_string())?;
    let expected = next()
        .strip_prefix(CHECKSUM_PREFIX)
        .ok_or_else(|| "missing checksum line".to_string())?;
    let body = next();

    if checksum(body) != expected {
        return Err("checksum mismatch, file was modified".to_string());
    }

    Ok(Header { stand_in, target })
}

fn checksum(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    format!("{:x}", hasher.finalize())
}

/// Replace every `<name>` whose name is a known hole, in a single pass.
/// Anything else between angle brackets is left alone, and substituted text
/// is never rescanned.
pub fn fill_template(template: &str, holes: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let replacement = after
            .find('>')
            .and_then(|end| holes.get(&after[..end]).map(|value| (end, *value)));

        match replacement {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('<');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// `text` with quotes, backslashes and control characters escaped, so it
/// fits on one comment line
fn single_line(text: &str) -> String {
    text.escape_debug().to_string()
}

/// Last path segment of `class_name` as a Rust type name
fn short_type_name(class_name: &str) -> String {
    let short = class_name.rsplit("::").next().unwrap_or(class_name);
    let mut name: String = short
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert_str(0, "StandIn");
    }
    if RUST_KEYWORDS.contains(&name.as_str()) {
        name.push('_');
    }
    name
}

/// snake_case method name for a field name
fn method_name(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    let mut after_lower = false;

    for c in field.chars() {
        if c.is_ascii_uppercase() {
            if after_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            after_lower = false;
        } else if c.is_ascii_alphanumeric() {
            out.push(c);
            after_lower = true;
        } else {
            out.push('_');
            after_lower = false;
        }
    }

    if out.is_empty()
        || out.starts_with(|c: char| c.is_ascii_digit())
        || out.chars().all(|c| c == '_')
    {
        out.insert_str(0, "field_");
    }
    out
}

/// Claim a method name not used yet
fn unique_method(base: String, used: &mut BTreeSet<String>) -> String {
    let mut name = base;
    while RUST_KEYWORDS.contains(&name.as_str())
        || RESERVED_METHODS.contains(&name.as_str())
        || used.contains(&name)
    {
        name.push('_');
    }
    used.insert(name.clone());
    name
}

fn lazy_accessors(class: &ClassDescriptor) -> String {
    let mut used = BTreeSet::new();
    let mut out = String::new();

    for field in class.identifier_fields() {
        let getter = unique_method(method_name(field), &mut used);
        let doc = single_line(field);
        out.push_str(&format!(
            "
    /// Identifier `{doc}`; never loads
    pub fn {getter}(&self) -> Option<&::docproxy::Value> {{
        self.proxy.identifier().get({field:?})
    }}
"
        ));
    }

    let mapped: BTreeSet<&str> = class
        .field_names()
        .chain(class.association_names())
        .filter(|name| !class.is_identifier(name))
        .collect();

    for field in mapped {
        let getter = unique_method(method_name(field), &mut used);
        let setter = unique_method(format!("set_{getter}"), &mut used);
        out.push_str(&format!(
            "
    pub fn {getter}(&self) -> ::docproxy::ProxyResult<Option<::docproxy::Value>> {{
        self.proxy.get({field:?})
    }}

    pub fn {setter}(&self, value: ::docproxy::Value) -> ::docproxy::ProxyResult<()> {{
        self.proxy.set({field:?}, value)
    }}
"
        ));
    }

    out.push('\n');
    out
}

fn serialize_impl(class: &ClassDescriptor) -> String {
    let hooks = class.serialization();

    if hooks.custom.is_some() {
        return "        self.proxy.serialize()".to_string();
    }

    let strip_bookkeeping = "        let mut properties = self.proxy.slots();
        properties.remove(&::docproxy::proxy::lazy_state_slot(self.proxy.stand_in_name()));";

    match &hooks.legacy_fields {
        Some(selection) => {
            let names: Vec<String> = selection.iter().map(|name| format!("{name:?}")).collect();
            format!(
                "        const SERIALIZE_FIELDS: &[&str] = &[{}];
{strip_bookkeeping}
        ::docproxy::proxy::select_fields(Self::TARGET, &properties, SERIALIZE_FIELDS)",
                names.join(", ")
            )
        }
        None => format!(
            "{strip_bookkeeping}
        ::docproxy::proxy::Serialized {{
            state: properties,
            diagnostics: Vec::new(),
        }}"
        ),
    }
}
