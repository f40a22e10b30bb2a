//! Module Contract
//!
//! A benchmark module exposes four entry points: `init`, `get_iterations`,
//! `setup` and `run`. Configuration and fixture are plain values handed back
//! to the harness and passed explicitly into every later entry point, so a
//! module carries no state of its own and nothing leaks between modules.
//!
//! There are two ways to provide a module:
//!
//! - [`BenchModule`]: a type implementing the trait. The compiler checks that
//!   every entry point exists. Wrap it in [`TypedSource`] to hand it to the loader.
//! - [`EntryTable`]: entry points assembled at runtime. Any of them may be
//!   absent; the loader rejects tables missing a required one. A missing
//!   `setup` builds `F::default()`.

use crate::error::{BenchError, EntryPoint, LoadFailure, ModuleError};
use crate::overrides::Overrides;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// A statically typed benchmark module
///
/// ```ignore
/// struct Fibonacci;
///
/// #[derive(Serialize, Deserialize)]
/// struct FibConfig { iterations: i64, n: u32 }
///
/// impl BenchModule for Fibonacci {
///     type Config = FibConfig;
///     type Fixture = ();
///
///     fn init() -> Result<FibConfig, ModuleError> { Ok(FibConfig { iterations: 50, n: 1000 }) }
///     fn get_iterations(c: &FibConfig) -> Result<i64, ModuleError> { Ok(c.iterations) }
///     fn setup(_: &FibConfig) -> Result<(), ModuleError> { Ok(()) }
///     fn run(c: &FibConfig, _: &mut ()) -> Result<Option<String>, ModuleError> {
///         black_box(fib(c.n));
///         Ok(Some("fib()".into()))
///     }
/// }
/// ```
pub trait BenchModule {
    /// Configuration established by `init`; overridable through its serde form
    type Config: Serialize + DeserializeOwned + 'static;
    /// Input data built by `setup` and reused by `run`
    type Fixture: 'static;

    /// Establish the module configuration. Called exactly once, first.
    fn init() -> Result<Self::Config, ModuleError>;

    /// Iteration count declared by the configuration
    fn get_iterations(config: &Self::Config) -> Result<i64, ModuleError>;

    /// Build the fixture. Called once after `init`, before the first `run`.
    fn setup(config: &Self::Config) -> Result<Self::Fixture, ModuleError>;

    /// Perform the workload once. The returned label is only used for reporting.
    fn run(config: &Self::Config, fixture: &mut Self::Fixture)
    -> Result<Option<String>, ModuleError>;
}

/// `init` entry point
pub type InitFn<C> = fn() -> Result<C, ModuleError>;
/// `get_iterations` entry point
pub type IterationsFn<C> = fn(&C) -> Result<i64, ModuleError>;
/// `setup` entry point
pub type SetupFn<C, F> = fn(&C) -> Result<F, ModuleError>;
/// `run` entry point
pub type RunFn<C, F> = fn(&C, &mut F) -> Result<Option<String>, ModuleError>;

/// Object-safe lifecycle driven by the runner
pub trait Module {
    /// Module name (source identity)
    fn name(&self) -> &str;

    /// Invoke `init` and apply the relevant overrides to its configuration
    fn init(&mut self, overrides: &Overrides) -> Result<(), BenchError>;

    /// Iteration count declared by the configuration; fails before `init`
    fn get_iterations(&self) -> Result<i64, BenchError>;

    /// Build (or rebuild) the fixture, discarding any previous one first
    fn setup(&mut self) -> Result<(), BenchError>;

    /// Perform one unit of work
    fn run(&mut self) -> Result<Option<String>, ModuleError>;
}

/// A candidate module handed to the loader
pub trait ModuleSource {
    /// Source identity, used as the module name
    fn identity(&self) -> &str;

    /// Validate the candidate and turn it into a runnable module
    fn load(self: Box<Self>) -> Result<Box<dyn Module>, LoadFailure>;
}

/// Run module code, turning a panic into a [`ModuleError`].
fn guarded<T>(f: impl FnOnce() -> Result<T, ModuleError>) -> Result<T, ModuleError> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(panic) => Err(ModuleError::new(format!("panicked: {}", panic_message(&*panic)))),
    }
}

/// Extract the text of a panic payload
pub fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ─── Loaded module ───────────────────────────────────────────────────────────

/// A validated module with all four entry points resolved
struct LoadedModule<C, F> {
    name: String,
    init: InitFn<C>,
    get_iterations: IterationsFn<C>,
    setup: SetupFn<C, F>,
    run: RunFn<C, F>,
    config: Option<C>,
    fixture: Option<F>,
}

impl<C, F> Module for LoadedModule<C, F>
where
    C: Serialize + DeserializeOwned,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn init(&mut self, overrides: &Overrides) -> Result<(), BenchError> {
        let config = guarded(self.init)
            .map_err(|e| BenchError::Configuration(format!("init failed: {e}")))?;
        let config = overrides.apply(&self.name, config)?;
        self.config = Some(config);
        self.fixture = None;
        Ok(())
    }

    fn get_iterations(&self) -> Result<i64, BenchError> {
        let config = self.config.as_ref().ok_or_else(|| {
            BenchError::Configuration("get_iterations called before init".to_string())
        })?;
        let get_iterations = self.get_iterations;
        guarded(|| get_iterations(config))
            .map_err(|e| BenchError::Configuration(format!("get_iterations failed: {e}")))
    }

    fn setup(&mut self) -> Result<(), BenchError> {
        let config = self
            .config
            .as_ref()
            .ok_or_else(|| BenchError::Configuration("setup called before init".to_string()))?;
        self.fixture = None;
        let setup = self.setup;
        let fixture = guarded(|| setup(config)).map_err(|e| BenchError::Setup(e.to_string()))?;
        self.fixture = Some(fixture);
        Ok(())
    }

    fn run(&mut self) -> Result<Option<String>, ModuleError> {
        let (Some(config), Some(fixture)) = (self.config.as_ref(), self.fixture.as_mut()) else {
            return Err(ModuleError::new("run called before setup"));
        };
        let run = self.run;
        guarded(|| run(config, fixture))
    }
}

// ─── Typed source ────────────────────────────────────────────────────────────

/// Loader source for a [`BenchModule`] implementation
pub struct TypedSource<M> {
    name: String,
    _module: PhantomData<fn() -> M>,
}

impl<M: BenchModule> TypedSource<M> {
    /// Source that loads `M` under `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            _module: PhantomData,
        }
    }
}

impl<M: BenchModule> ModuleSource for TypedSource<M> {
    fn identity(&self) -> &str {
        &self.name
    }

    fn load(self: Box<Self>) -> Result<Box<dyn Module>, LoadFailure> {
        Ok(Box::new(LoadedModule::<M::Config, M::Fixture> {
            name: self.name,
            init: M::init,
            get_iterations: M::get_iterations,
            setup: M::setup,
            run: M::run,
            config: None,
            fixture: None,
        }))
    }
}

// ─── Entry table ─────────────────────────────────────────────────────────────

/// Module assembled from individually supplied entry points
pub struct EntryTable<C, F> {
    name: String,
    init: Option<InitFn<C>>,
    get_iterations: Option<IterationsFn<C>>,
    setup: Option<SetupFn<C, F>>,
    run: Option<RunFn<C, F>>,
}

impl<C, F> EntryTable<C, F> {
    /// Empty table for module `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            init: None,
            get_iterations: None,
            setup: None,
            run: None,
        }
    }

    /// Provide `init`
    pub fn with_init(mut self, f: InitFn<C>) -> Self {
        self.init = Some(f);
        self
    }

    /// Provide `get_iterations`
    pub fn with_get_iterations(mut self, f: IterationsFn<C>) -> Self {
        self.get_iterations = Some(f);
        self
    }

    /// Provide `setup`
    pub fn with_setup(mut self, f: SetupFn<C, F>) -> Self {
        self.setup = Some(f);
        self
    }

    /// Provide `run`
    pub fn with_run(mut self, f: RunFn<C, F>) -> Self {
        self.run = Some(f);
        self
    }

    /// Entry points that are present
    pub fn provided(&self) -> Vec<EntryPoint> {
        [
            (EntryPoint::Init, self.init.is_some()),
            (EntryPoint::GetIterations, self.get_iterations.is_some()),
            (EntryPoint::Setup, self.setup.is_some()),
            (EntryPoint::Run, self.run.is_some()),
        ]
        .into_iter()
        .filter_map(|(point, present)| present.then_some(point))
        .collect()
    }

    /// Required entry points that are absent
    pub fn missing(&self) -> Vec<EntryPoint> {
        let provided = self.provided();
        EntryPoint::REQUIRED
            .into_iter()
            .filter(|p| !provided.contains(p))
            .collect()
    }
}

fn default_fixture<C, F: Default>(_config: &C) -> Result<F, ModuleError> {
    Ok(F::default())
}

impl<C, F> ModuleSource for EntryTable<C, F>
where
    C: Serialize + DeserializeOwned + 'static,
    F: Default + 'static,
{
    fn identity(&self) -> &str {
        &self.name
    }

    fn load(self: Box<Self>) -> Result<Box<dyn Module>, LoadFailure> {
        let (Some(init), Some(get_iterations), Some(run)) =
            (self.init, self.get_iterations, self.run)
        else {
            return Err(LoadFailure::MissingEntryPoints(self.missing()));
        };

        Ok(Box::new(LoadedModule::<C, F> {
            name: self.name,
            init,
            get_iterations,
            setup: self.setup.unwrap_or(default_fixture::<C, F>),
            run,
            config: None,
            fixture: None,
        }))
    }
}
