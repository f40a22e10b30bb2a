//! Module registry
//!
//! Modules register themselves at link time with [`register_module!`]
//! (backed by `inventory`). Sources named on the command line are resolved
//! against this registry.
//!
//! [`register_module!`]: crate::register_module

use crate::error::LoadFailure;
use crate::module::{Module, ModuleSource};

/// Static registration record produced by [`register_module!`](crate::register_module)
#[derive(Debug, Clone)]
pub struct ModuleDef {
    /// Name the module is selected by
    pub name: &'static str,
    /// Source file of the registration
    pub file: &'static str,
    /// Source line of the registration
    pub line: u32,
    /// Creates a fresh loader source for the module
    pub source: fn() -> Box<dyn ModuleSource>,
}

inventory::collect!(ModuleDef);

/// All registered modules, sorted by name for a deterministic order
pub fn registered_modules() -> Vec<&'static ModuleDef> {
    let mut defs: Vec<&'static ModuleDef> = inventory::iter::<ModuleDef>.into_iter().collect();
    defs.sort_by_key(|d| d.name);
    defs
}

/// Look up a registered module by name
pub fn find_module(name: &str) -> Option<&'static ModuleDef> {
    inventory::iter::<ModuleDef>
        .into_iter()
        .find(|d| d.name == name)
}

/// Source standing in for a name with no registration behind it
struct Unregistered {
    name: String,
}

impl ModuleSource for Unregistered {
    fn identity(&self) -> &str {
        &self.name
    }

    fn load(self: Box<Self>) -> Result<Box<dyn Module>, LoadFailure> {
        Err(LoadFailure::NotRegistered)
    }
}

/// Turn module names into loader sources.
///
/// An empty list selects every registered module. Unknown names are kept
/// as sources that fail to load, so they show up in the report.
pub fn resolve_sources(names: &[String]) -> Vec<Box<dyn ModuleSource>> {
    if names.is_empty() {
        return registered_modules()
            .into_iter()
            .map(|def| (def.source)())
            .collect();
    }

    names
        .iter()
        .map(|name| match find_module(name) {
            Some(def) => (def.source)(),
            None => Box::new(Unregistered { name: name.clone() }) as Box<dyn ModuleSource>,
        })
        .collect()
}

/// Register a [`BenchModule`](crate::BenchModule) type under a name.
///
/// ```ignore
/// modbench::register_module!(Fibonacci, "fibonacci");
/// ```
#[macro_export]
macro_rules! register_module {
    ($module:ty, $name:literal) => {
        const _: () = {
            fn __modbench_source() -> ::std::boxed::Box<dyn $crate::ModuleSource> {
                ::std::boxed::Box::new($crate::TypedSource::<$module>::new($name))
            }

            $crate::internal::inventory::submit! {
                $crate::ModuleDef {
                    name: $name,
                    file: file!(),
                    line: line!(),
                    source: __modbench_source,
                }
            }
        };
    };
}
