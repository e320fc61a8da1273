//! Lexical scopes: insertion-ordered name -> declaration maps chained to a
//! parent. Grounded on spec §4.5 / §3.3. Scopes are created by the checker
//! on entering a function, block, or `for`, and are never mutated after the
//! checker pass finishes -- their lifetime is exactly one compilation.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::Decl;
use crate::types::Type;

/// Raised by [`Scope::add`] when a name collides in the *current* scope.
/// Handled at the exact declaration site, never propagated across
/// component boundaries (spec §4.5 / §7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    /// Same name, same type already bound in this scope.
    AlreadyDefined,
    /// Same name, a *different* type already bound in this scope.
    Conflict,
}

pub struct Scope {
    pub tag: String,
    parent: Option<Rc<Scope>>,
    names: RefCell<Vec<(String, Rc<Decl>)>>,
}

impl Scope {
    pub fn root(tag: impl Into<String>) -> Rc<Scope> {
        Rc::new(Scope {
            tag: tag.into(),
            parent: None,
            names: RefCell::new(Vec::new()),
        })
    }

    pub fn child(parent: &Rc<Scope>, tag: impl Into<String>) -> Rc<Scope> {
        Rc::new(Scope {
            tag: tag.into(),
            parent: Some(Rc::clone(parent)),
            names: RefCell::new(Vec::new()),
        })
    }

    /// Insert `name -> decl` into the current scope only (never searches
    /// parents). A duplicate with an identical type is `AlreadyDefined`; a
    /// duplicate with a different type is `Conflict`.
    pub fn add(&self, name: &str, decl: Rc<Decl>) -> Result<(), SymbolError> {
        let mut names = self.names.borrow_mut();
        if let Some((_, existing)) = names.iter().find(|(n, _)| n == name) {
            return if existing.decl_type() == decl.decl_type() {
                Err(SymbolError::AlreadyDefined)
            } else {
                Err(SymbolError::Conflict)
            };
        }
        names.push((name.to_string(), decl));
        Ok(())
    }

    /// Search the current scope, then each parent up to the root.
    pub fn get(&self, name: &str) -> Option<Rc<Decl>> {
        if let Some((_, decl)) = self.names.borrow().iter().find(|(n, _)| n == name) {
            return Some(Rc::clone(decl));
        }
        self.parent.as_ref().and_then(|p| p.get(name))
    }

    pub fn get_type(&self, name: &str) -> Option<Type> {
        self.get(name).map(|d| d.decl_type())
    }

    pub fn is_global(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::VarDecl;
    use crate::types::Type;

    fn var(name: &str, ty: Type) -> Rc<Decl> {
        Rc::new(Decl::Var(VarDecl {
            name: name.to_string(),
            ty,
            init: None,
            line: 1,
        }))
    }

    #[test]
    fn lookup_searches_parent_chain() {
        let global = Scope::root("global");
        global.add("g", var("g", Type::Integer)).unwrap();
        let inner = Scope::child(&global, "block_1");
        assert_eq!(inner.get_type("g"), Some(Type::Integer));
        assert!(inner.get("missing").is_none());
    }

    #[test]
    fn add_does_not_search_parents_for_shadowing() {
        let global = Scope::root("global");
        global.add("x", var("x", Type::Integer)).unwrap();
        let inner = Scope::child(&global, "block_1");
        // Shadowing in a child scope is legal even though the parent has it.
        assert!(inner.add("x", var("x", Type::Float)).is_ok());
        assert_eq!(inner.get_type("x"), Some(Type::Float));
        assert_eq!(global.get_type("x"), Some(Type::Integer));
    }

    #[test]
    fn duplicate_same_type_is_already_defined() {
        let scope = Scope::root("global");
        scope.add("x", var("x", Type::Integer)).unwrap();
        assert_eq!(
            scope.add("x", var("x", Type::Integer)),
            Err(SymbolError::AlreadyDefined)
        );
    }

    #[test]
    fn duplicate_different_type_is_conflict() {
        let scope = Scope::root("global");
        scope.add("x", var("x", Type::Integer)).unwrap();
        assert_eq!(
            scope.add("x", var("x", Type::Float)),
            Err(SymbolError::Conflict)
        );
    }
}
