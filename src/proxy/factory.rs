//! Proxy factory
//!
//! Facade over the proxy subsystem. Resolves type names, applies the
//! generation policy, caches one [`ProxyDescriptor`] per type and hands out
//! uninitialized proxies.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::{AutoGenerate, ProxyConfig};
use crate::domain::ports::{DocumentLoader, FileSystem, MetadataSource};
use crate::error::{ProxyError, ProxyResult};
use crate::metadata::ClassDescriptor;
use crate::models::{Identifier, SlotKey};
use crate::proxy::emitter::ProxyEmitter;
use crate::proxy::instance::Proxy;
use crate::proxy::lazy::LazyInitializer;
use crate::proxy::registry::{StandIn, StandInRegistry};
use crate::proxy::resolver::{stand_in_name, ClassNameResolver, MARKER};
use crate::proxy::skip_list::SkipListBuilder;

/// Creates a new stand-in bound to an identifier
pub type ProxyConstructor = Arc<dyn Fn(Identifier) -> Proxy + Send + Sync>;

/// Cached per-type proxy data
pub struct ProxyDescriptor {
    class: Arc<ClassDescriptor>,
    stand_in_name: String,
    file_path: Option<PathBuf>,
    skipped: Arc<BTreeSet<SlotKey>>,
    stand_in: Arc<StandIn>,
    constructor: ProxyConstructor,
}

impl ProxyDescriptor {
    pub fn target(&self) -> &str {
        self.class.name()
    }

    pub fn class(&self) -> &Arc<ClassDescriptor> {
        &self.class
    }

    pub fn stand_in_name(&self) -> &str {
        &self.stand_in_name
    }

    /// Generated file, for the file based modes
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn skipped(&self) -> &BTreeSet<SlotKey> {
        &self.skipped
    }

    pub fn stand_in(&self) -> &Arc<StandIn> {
        &self.stand_in
    }

    /// New uninitialized proxy; `identifier` must already be validated
    pub fn create(&self, identifier: Identifier) -> Proxy {
        (self.constructor)(identifier)
    }
}

impl fmt::Debug for ProxyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyDescriptor")
            .field("target", &self.class.name())
            .field("stand_in_name", &self.stand_in_name)
            .field("file_path", &self.file_path)
            .field("skipped", &self.skipped)
            .finish()
    }
}

/// Hands out lazily initialized proxies
pub struct ProxyFactory {
    config: ProxyConfig,
    metadata: Arc<dyn MetadataSource>,
    loader: Arc<dyn DocumentLoader>,
    fs: Arc<dyn FileSystem>,
    registry: Arc<StandInRegistry>,
    emitter: ProxyEmitter,
    resolver: ClassNameResolver,
    skip_lists: SkipListBuilder,
    descriptors: Mutex<HashMap<String, Arc<ProxyDescriptor>>>,
}

impl ProxyFactory {
    /// Fails when a file based mode is configured and the proxy directory
    /// exists but cannot be written to
    pub fn new(
        config: ProxyConfig,
        metadata: Arc<dyn MetadataSource>,
        loader: Arc<dyn DocumentLoader>,
        fs: Arc<dyn FileSystem>,
    ) -> ProxyResult<Self> {
        let dir = config.dir();
        if config.auto_generate().writes_files() && fs.exists(dir) && !fs.is_writable_dir(dir) {
            return Err(ProxyError::ProxyDirectoryNotWritable {
                path: dir.to_path_buf(),
            });
        }

        Ok(Self {
            config,
            metadata,
            loader,
            fs,
            registry: Arc::new(StandInRegistry::new()),
            emitter: ProxyEmitter::new(),
            resolver: ClassNameResolver::new(),
            skip_lists: SkipListBuilder::new(),
            descriptors: Mutex::new(HashMap::new()),
        })
    }

    /// Share stand-ins defined by other factories
    pub fn with_registry(mut self, registry: Arc<StandInRegistry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_emitter(mut self, emitter: ProxyEmitter) -> Self {
        self.emitter = emitter;
        self
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<StandInRegistry> {
        &self.registry
    }

    fn lock_descriptors(&self) -> MutexGuard<'_, HashMap<String, Arc<ProxyDescriptor>>> {
        self.descriptors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// New uninitialized proxy for `class`. Never loads.
    #[tracing::instrument(skip_all, fields(class = %class.name(), %identifier))]
    pub fn get_proxy(&self, class: &ClassDescriptor, identifier: Identifier) -> ProxyResult<Proxy> {
        let identifier = class.identifier(&identifier)?;
        let descriptor = self.proxy_descriptor(class)?;
        Ok(descriptor.create(identifier))
    }

    /// Same as [`get_proxy`](Self::get_proxy) for a type name, which may be a
    /// stand-in name
    pub fn get_proxy_by_name(&self, name: &str, identifier: Identifier) -> ProxyResult<Proxy> {
        let target = self.resolver.resolve(name);
        let class = self
            .metadata
            .class_descriptor(target)
            .ok_or_else(|| ProxyError::UnknownClass {
                class: target.to_string(),
            })?;
        self.get_proxy(&class, identifier)
    }

    /// Cached descriptor for `class`, built on first use
    pub fn proxy_descriptor(&self, class: &ClassDescriptor) -> ProxyResult<Arc<ProxyDescriptor>> {
        let target = self.resolver.resolve(class.name());
        if let Some(descriptor) = self.lock_descriptors().get(target) {
            return Ok(Arc::clone(descriptor));
        }

        let class = if target == class.name() {
            Arc::new(class.clone())
        } else {
            self.metadata
                .class_descriptor(target)
                .ok_or_else(|| ProxyError::UnknownClass {
                    class: target.to_string(),
                })?
        };
        let descriptor = Arc::new(self.build_descriptor(class)?);

        // First descriptor built for a type wins
        let mut descriptors = self.lock_descriptors();
        let cached = descriptors
            .entry(target.to_string())
            .or_insert(descriptor);
        Ok(Arc::clone(cached))
    }

    fn build_descriptor(&self, class: Arc<ClassDescriptor>) -> ProxyResult<ProxyDescriptor> {
        let name = stand_in_name(class.name(), self.config.namespace());
        let file_path = match self.config.auto_generate() {
            AutoGenerate::Eval => None,
            _ => Some(Self::proxy_file_name(class.name(), self.config.dir())),
        };

        let stand_in = self.load_proxy_class(&class, &name, file_path.as_deref())?;
        let skipped = Arc::new(self.skip_lists.build(&class));
        let initializer = Arc::new(LazyInitializer::new(
            Arc::clone(&class),
            Arc::clone(&self.loader),
        ));

        let constructor: ProxyConstructor = {
            let class = Arc::clone(&class);
            let skipped = Arc::clone(&skipped);
            let name = name.clone();
            Arc::new(move |identifier| {
                Proxy::new(
                    Arc::clone(&class),
                    name.clone(),
                    Arc::clone(&skipped),
                    identifier,
                    Arc::clone(&initializer),
                )
            })
        };

        Ok(ProxyDescriptor {
            class,
            stand_in_name: name,
            file_path,
            skipped,
            stand_in,
            constructor,
        })
    }

    /// Make the stand-in for `class` available, generating it when the
    /// configured mode asks for it
    fn load_proxy_class(
        &self,
        class: &ClassDescriptor,
        name: &str,
        path: Option<&Path>,
    ) -> ProxyResult<Arc<StandIn>> {
        if let Some(existing) = self.registry.get(name) {
            tracing::debug!(stand_in = name, "reusing defined stand-in");
            return Ok(existing);
        }

        let mode = self.config.auto_generate();
        let path = match (mode, path) {
            (AutoGenerate::Eval, _) | (_, None) => {
                return self.emitter.define(class, name, &self.registry);
            }
            (_, Some(path)) => path,
        };

        let generate = match mode {
            AutoGenerate::Never | AutoGenerate::Eval => false,
            AutoGenerate::Always => true,
            AutoGenerate::FileNotExists => !self.fs.exists(path),
            AutoGenerate::FileNotExistsOrChanged => self.is_stale(class, path),
        };

        if generate {
            tracing::debug!(class = class.name(), %mode, path = %path.display(), "generating stand-in");
            self.emitter.write(class, path, name, self.fs.as_ref())?;
        }

        let stand_in = self.emitter.read_back(class, path, name, self.fs.as_ref())?;
        match self.registry.define(stand_in) {
            Ok(defined) => Ok(defined),
            Err(ProxyError::StandInAlreadyDefined { name }) => self
                .registry
                .get(&name)
                .ok_or_else(|| ProxyError::StandInAlreadyDefined { name }),
            Err(err) => Err(err),
        }
    }

    /// Missing, or older than the type's source file. Without a known
    /// source file only a missing file is stale.
    fn is_stale(&self, class: &ClassDescriptor, path: &Path) -> bool {
        if !self.fs.exists(path) {
            return true;
        }
        let Some(source) = class.source_file() else {
            return false;
        };

        match (self.fs.modified(path), self.fs.modified(source)) {
            (Ok(generated), Ok(changed)) => generated < changed,
            (Err(_), _) => true,
            (_, Err(err)) => {
                tracing::debug!(source = %source.display(), error = %err, "source file unreadable");
                false
            }
        }
    }

    /// Write stand-ins for every instantiable type in `classes` to
    /// `target_dir` (the configured directory by default). Returns how many
    /// were generated.
    #[tracing::instrument(skip_all)]
    pub fn generate_proxy_classes<'a, I>(
        &self,
        classes: I,
        target_dir: Option<&Path>,
    ) -> ProxyResult<usize>
    where
        I: IntoIterator<Item = &'a ClassDescriptor>,
    {
        let dir = target_dir.unwrap_or(self.config.dir());
        let mut generated = 0;

        for class in classes {
            if !class.is_instantiable() {
                tracing::debug!(class = class.name(), kind = ?class.kind(), "skipping non-instantiable type");
                continue;
            }

            let target = self.resolver.resolve(class.name());
            let name = stand_in_name(target, self.config.namespace());
            let path = Self::proxy_file_name(target, dir);
            self.emitter.write(class, &path, &name, self.fs.as_ref())?;
            generated += 1;
        }

        tracing::debug!(generated, dir = %dir.display(), "stand-ins generated");
        Ok(generated)
    }

    /// `<base_dir>/__CG__<type name without separators>.rs`
    pub fn proxy_file_name(class_name: &str, base_dir: &Path) -> PathBuf {
        let target = ClassNameResolver::new().resolve(class_name);
        base_dir.join(format!("{MARKER}{}.rs", target.replace("::", "")))
    }
}

impl fmt::Debug for ProxyFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyFactory")
            .field("config", &self.config)
            .field("descriptors", &self.lock_descriptors().len())
            .finish()
    }
}
