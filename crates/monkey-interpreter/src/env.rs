use std::fmt::{self, Debug, Formatter};

use gc::{Finalize, Gc, GcCell, Trace};
use rustc_hash::FxHashMap;

use crate::object::Object;

/// A lexical scope. Cloning an [`Env`] yields another handle to the same
/// scope, which is how closures share the scope they were defined in.
#[derive(Clone, Finalize, Trace)]
pub struct Env(Gc<GcCell<EnvImpl>>);

impl Default for Env {
    fn default() -> Self {
        Self(Gc::new(GcCell::new(EnvImpl::default())))
    }
}

impl Env {
    pub fn with_parent(parent: &Env) -> Self {
        let env = EnvImpl { map: FxHashMap::default(), parent: Some(parent.clone()) };
        Self(Gc::new(GcCell::new(env)))
    }

    /// Looks `name` up in this scope, then in each enclosing scope.
    pub fn get(&self, name: &str) -> Option<Object> {
        let env = self.0.borrow();
        match env.map.get(name) {
            Some(object) => Some(object.clone()),
            None => env.parent.as_ref()?.get(name),
        }
    }

    /// Binds `name` in this scope, replacing any previous binding here.
    pub fn define(&mut self, name: &str, value: Object) {
        self.0.borrow_mut().map.insert(name.to_string(), value);
    }
}

impl Debug for Env {
    // Closures stored in a scope point back at it, so only print the names.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let env = self.0.borrow();
        let mut names = env.map.keys().collect::<Vec<_>>();
        names.sort_unstable();
        f.debug_struct("Env").field("names", &names).field("parent", &env.parent).finish()
    }
}

#[derive(Default, Finalize, Trace)]
pub struct EnvImpl {
    map: FxHashMap<String, Object>,
    parent: Option<Env>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_walks_parents() {
        let mut globals = Env::default();
        globals.define("x", Object::Int(1));
        let mut local = Env::with_parent(&globals);
        local.define("y", Object::Int(2));

        assert_eq!(local.get("x"), Some(Object::Int(1)));
        assert_eq!(local.get("y"), Some(Object::Int(2)));
        assert_eq!(globals.get("y"), None);
    }

    #[test]
    fn define_shadows_parent() {
        let mut globals = Env::default();
        globals.define("x", Object::Int(1));
        let mut local = Env::with_parent(&globals);
        local.define("x", Object::Bool(true));

        assert_eq!(local.get("x"), Some(Object::Bool(true)));
        assert_eq!(globals.get("x"), Some(Object::Int(1)));
    }

    #[test]
    fn clones_share_scope() {
        let mut env = Env::default();
        let alias = env.clone();
        env.define("x", Object::Null);
        assert_eq!(alias.get("x"), Some(Object::Null));
    }
}
