use crate::ports::{DocumentRenderer, PlistParser, PlistStore, StructureValidator};

/// Application context holding dependencies for command execution.
pub struct AppContext<S, R, P, V>
where
    S: PlistStore,
    R: DocumentRenderer,
    P: PlistParser,
    V: StructureValidator,
{
    store: S,
    renderer: R,
    parser: P,
    validator: V,
}

impl<S, R, P, V> AppContext<S, R, P, V>
where
    S: PlistStore,
    R: DocumentRenderer,
    P: PlistParser,
    V: StructureValidator,
{
    /// Create a new application context.
    pub fn new(store: S, renderer: R, parser: P, validator: V) -> Self {
        Self { store, renderer, parser, validator }
    }

    /// Get a reference to the plist store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Get a reference to the external structure validator.
    pub fn validator(&self) -> &V {
        &self.validator
    }
}
