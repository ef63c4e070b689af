//=========================================================================
// Scene Module Resolver
//=========================================================================
//
// Boundary to whatever loads scene modules from disk. The registry only
// needs to know which scene kinds a module at a given path declares.
//
//=========================================================================

/// Resolves a scene module path to the scene kinds it declares.
///
/// Returns `None` when the path does not name a loadable module. Closures
/// of type `Fn(&str) -> Option<Vec<String>>` implement this trait.
pub trait SceneModuleResolver {
    fn resolve(&self, path: &str) -> Option<Vec<String>>;
}

impl<F> SceneModuleResolver for F
where
    F: Fn(&str) -> Option<Vec<String>>,
{
    fn resolve(&self, path: &str) -> Option<Vec<String>> {
        self(path)
    }
}
