//! Lexical scopes.
//!
//! Scopes form a parent-linked chain of frames stored in one arena. Lookup
//! walks from the current frame towards the root; declaration only ever
//! looks at the current frame, so inner frames may shadow outer ones.
//!
//! Functions live in a separate arena and frames refer to them by
//! [`FunctionId`]. Rewriting a local function's signature writes a new
//! value at its id, so every later lookup sees the new signature.

use std::rc::Rc;

use plover_bound_tree::{FunctionSymbol, StructSymbol, VariableSymbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(usize);

/// An entry in a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Variable(Rc<VariableSymbol>),
    Function(FunctionId),
    Type(Rc<StructSymbol>),
}

#[derive(Debug, Clone, Default)]
struct Frame {
    parent: Option<FrameId>,
    /// Declaration order matters for overload sets, so this is not a map
    symbols: Vec<(String, Symbol)>,
    /// Variables assigned a non-null value while this frame was current
    assigned: Vec<String>,
}

/// Overloads are told apart by parameter types alone. Local functions are
/// renamed once bound, so their names cannot be compared.
fn same_parameters(a: &FunctionSymbol, b: &FunctionSymbol) -> bool {
    a.parameters.len() == b.parameters.len()
        && a.parameters.iter().zip(&b.parameters).all(|(a, b)| a.ty == b.ty)
}

#[derive(Debug, Clone)]
pub struct BoundScope {
    frames: Vec<Frame>,
    current: FrameId,
    functions: Vec<Rc<FunctionSymbol>>,
}

impl Default for BoundScope {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundScope {
    /// A scope with a single, empty root frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
            current: FrameId(0),
            functions: Vec::new(),
        }
    }

    pub fn current(&self) -> FrameId {
        self.current
    }

    /// Enter a new child frame of the current one.
    pub fn push(&mut self) -> FrameId {
        let id = FrameId(self.frames.len());
        self.frames.push(Frame {
            parent: Some(self.current),
            ..Frame::default()
        });
        self.current = id;
        id
    }

    /// Return to the parent frame. The root frame is never left.
    pub fn pop(&mut self) {
        if let Some(parent) = self.frames[self.current.0].parent {
            self.current = parent;
        }
    }

    fn frame(&self, id: FrameId) -> &Frame {
        &self.frames[id.0]
    }

    fn ancestors(&self) -> impl Iterator<Item = &Frame> {
        std::iter::successors(Some(self.frame(self.current)), |frame| {
            frame.parent.map(|parent| self.frame(parent))
        })
    }

    pub fn function(&self, id: FunctionId) -> &Rc<FunctionSymbol> {
        &self.functions[id.0]
    }

    pub fn try_declare_variable(&mut self, variable: Rc<VariableSymbol>) -> bool {
        let name = variable.name.clone();
        if self.frame(self.current).symbols.iter().any(|(n, _)| *n == name) {
            return false;
        }
        self.insert(name, Symbol::Variable(variable));
        true
    }

    pub fn try_declare_type(&mut self, symbol: Rc<StructSymbol>) -> bool {
        let name = symbol.name.clone();
        if self.frame(self.current).symbols.iter().any(|(n, _)| *n == name) {
            return false;
        }
        self.insert(name, Symbol::Type(symbol));
        true
    }

    /// Declare `function` under its own name.
    ///
    /// Fails when the current frame already holds a non-function of that
    /// name or a function with an identical signature.
    pub fn try_declare_function(&mut self, function: FunctionSymbol) -> Option<FunctionId> {
        let name = function.name.clone();
        self.try_declare_function_as(name, function)
    }

    /// Declare `function` under `name`, which may differ from the symbol's name.
    pub fn try_declare_function_as(
        &mut self,
        name: String,
        function: FunctionSymbol,
    ) -> Option<FunctionId> {
        let conflict = self
            .frame(self.current)
            .symbols
            .iter()
            .filter(|(n, _)| *n == name)
            .any(|(_, symbol)| match symbol {
                Symbol::Function(id) => same_parameters(self.function(*id), &function),
                _ => true,
            });
        if conflict {
            return None;
        }

        let id = FunctionId(self.functions.len());
        self.functions.push(Rc::new(function));
        self.insert(name, Symbol::Function(id));
        Some(id)
    }

    fn insert(&mut self, name: String, symbol: Symbol) {
        let current = self.current.0;
        self.frames[current].symbols.push((name, symbol));
    }

    /// The nearest symbol named `name`. For overloaded names this is only one
    /// of the overloads; use [`BoundScope::lookup_overloads`] for all of them.
    pub fn lookup_symbol(&self, name: &str) -> Option<&Symbol> {
        self.ancestors()
            .find_map(|frame| frame.symbols.iter().find(|(n, _)| n == name))
            .map(|(_, symbol)| symbol)
    }

    pub fn lookup_variable(&self, name: &str) -> Option<&Rc<VariableSymbol>> {
        self.ancestors().find_map(|frame| {
            frame.symbols.iter().find_map(|(n, symbol)| match symbol {
                Symbol::Variable(variable) if n == name => Some(variable),
                _ => None,
            })
        })
    }

    pub fn lookup_type(&self, name: &str) -> Option<&Rc<StructSymbol>> {
        self.ancestors().find_map(|frame| {
            frame.symbols.iter().find_map(|(n, symbol)| match symbol {
                Symbol::Type(ty) if n == name => Some(ty),
                _ => None,
            })
        })
    }

    /// Every function reachable as `name`, nearest frame first.
    ///
    /// Functions whose current name is `strict_name` are searched first and
    /// returned alone when any exist. A function in a farther frame is skipped
    /// when a nearer one has an identical signature; differently-signed
    /// overloads from every frame accumulate.
    pub fn lookup_overloads(&self, name: &str, strict_name: &str) -> Vec<FunctionId> {
        let strict = self.collect_overloads(|_, function| function.name == strict_name);
        if !strict.is_empty() {
            return strict;
        }
        self.collect_overloads(|declared, _| declared == name)
    }

    fn collect_overloads(
        &self,
        matches: impl Fn(&str, &FunctionSymbol) -> bool,
    ) -> Vec<FunctionId> {
        let mut found: Vec<FunctionId> = Vec::new();

        for frame in self.ancestors() {
            let nearer = found.len();
            for (declared, symbol) in &frame.symbols {
                let Symbol::Function(id) = symbol else {
                    continue;
                };
                let function = self.function(*id);
                if !matches(declared, function) {
                    continue;
                }
                let shadowed = found[..nearer]
                    .iter()
                    .any(|other| same_parameters(self.function(*other), function));
                if !shadowed {
                    found.push(*id);
                }
            }
        }

        found
    }

    /// Replace the nearest function declared as `name` with `function`.
    ///
    /// Used once per local function, after its body has been bound and its
    /// capture parameters are known.
    pub fn try_modify_function(&mut self, name: &str, function: FunctionSymbol) -> bool {
        let id = self.ancestors().find_map(|frame| {
            frame.symbols.iter().find_map(|(n, symbol)| match symbol {
                Symbol::Function(id) if n == name => Some(*id),
                _ => None,
            })
        });

        match id {
            Some(id) => {
                self.functions[id.0] = Rc::new(function);
                true
            }
            None => false,
        }
    }

    /// Record that `name` was assigned a non-null value.
    ///
    /// Tracking is flow-insensitive: a note anywhere in the current frame or
    /// an ancestor counts for the rest of that frame's lifetime.
    pub fn note_assignment(&mut self, name: &str) {
        let current = self.current.0;
        if !self.frames[current].assigned.iter().any(|n| n == name) {
            self.frames[current].assigned.push(name.to_string());
        }
    }

    pub fn is_assigned(&self, name: &str) -> bool {
        self.ancestors()
            .any(|frame| frame.assigned.iter().any(|n| n == name))
    }

    pub fn declared_variables(&self) -> Vec<Rc<VariableSymbol>> {
        self.frame(self.current)
            .symbols
            .iter()
            .filter_map(|(_, symbol)| match symbol {
                Symbol::Variable(variable) => Some(variable.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn declared_functions(&self) -> Vec<Rc<FunctionSymbol>> {
        self.frame(self.current)
            .symbols
            .iter()
            .filter_map(|(_, symbol)| match symbol {
                Symbol::Function(id) => Some(self.function(*id).clone()),
                _ => None,
            })
            .collect()
    }

    pub fn declared_types(&self) -> Vec<Rc<StructSymbol>> {
        self.frame(self.current)
            .symbols
            .iter()
            .filter_map(|(_, symbol)| match symbol {
                Symbol::Type(ty) => Some(ty.clone()),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plover_bound_tree::{BoundType, VariableKind};

    fn variable(name: &str, ty: BoundType) -> Rc<VariableSymbol> {
        Rc::new(VariableSymbol::new(name, ty, VariableKind::Local))
    }

    fn function(name: &str, params: &[BoundType]) -> FunctionSymbol {
        let parameters = params
            .iter()
            .enumerate()
            .map(|(i, ty)| Rc::new(VariableSymbol::parameter(format!("p{}", i), ty.clone(), i)))
            .collect();
        FunctionSymbol::new(name, parameters, BoundType::void(), None)
    }

    #[test]
    fn test_duplicate_variable_in_same_frame() {
        let mut scope = BoundScope::new();
        assert!(scope.try_declare_variable(variable("x", BoundType::int())));
        assert!(!scope.try_declare_variable(variable("x", BoundType::string())));
    }

    #[test]
    fn test_inner_frame_may_shadow() {
        let mut scope = BoundScope::new();
        assert!(scope.try_declare_variable(variable("x", BoundType::int())));
        scope.push();
        assert!(scope.try_declare_variable(variable("x", BoundType::string())));
        assert_eq!(scope.lookup_variable("x").unwrap().ty, BoundType::string());
        scope.pop();
        assert_eq!(scope.lookup_variable("x").unwrap().ty, BoundType::int());
    }

    #[test]
    fn test_function_overloading() {
        let mut scope = BoundScope::new();
        assert!(scope
            .try_declare_function(function("f", &[BoundType::nullable_int()]))
            .is_some());
        assert!(scope
            .try_declare_function(function("f", &[BoundType::nullable_decimal()]))
            .is_some());
        assert!(scope
            .try_declare_function(function("f", &[BoundType::nullable_int()]))
            .is_none());
        assert_eq!(scope.lookup_overloads("f", "f").len(), 2);
    }

    #[test]
    fn test_function_conflicts_with_variable() {
        let mut scope = BoundScope::new();
        scope.try_declare_variable(variable("f", BoundType::int()));
        assert!(scope.try_declare_function(function("f", &[])).is_none());
    }

    #[test]
    fn test_nearer_overloads_shadow_identical_signatures_only() {
        let mut scope = BoundScope::new();
        scope.try_declare_function(function("f", &[BoundType::nullable_int()]));
        scope.try_declare_function(function("f", &[BoundType::nullable_string()]));
        scope.push();
        let inner = scope
            .try_declare_function(function("f", &[BoundType::nullable_int()]))
            .unwrap();

        let overloads = scope.lookup_overloads("f", "f");
        assert_eq!(overloads.len(), 2);
        assert_eq!(overloads[0], inner);
        assert!(overloads
            .iter()
            .any(|id| scope.function(*id).parameters[0].ty == BoundType::nullable_string()));
    }

    #[test]
    fn test_strict_name_is_searched_first() {
        let mut scope = BoundScope::new();
        scope.try_declare_function(function("inner", &[]));
        scope.push();
        scope.try_declare_function(function("inner", &[BoundType::nullable_int()]));
        assert!(scope.try_modify_function(
            "inner",
            function("<main::inner>$", &[BoundType::nullable_int()])
        ));

        let overloads = scope.lookup_overloads("inner", "<main::inner>$");
        assert_eq!(overloads.len(), 1);
        assert_eq!(scope.function(overloads[0]).name, "<main::inner>$");

        let unknown = scope.lookup_overloads("inner", "<other::inner>$");
        assert_eq!(unknown.len(), 2);
    }

    #[test]
    fn test_modify_missing_function_fails() {
        let mut scope = BoundScope::new();
        assert!(!scope.try_modify_function("nothing", function("nothing", &[])));
    }

    #[test]
    fn test_declared_symbols_are_frame_local() {
        let mut scope = BoundScope::new();
        scope.try_declare_variable(variable("outer", BoundType::int()));
        scope.push();
        scope.try_declare_variable(variable("inner", BoundType::int()));
        let declared = scope.declared_variables();
        let names: Vec<_> = declared.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["inner"]);

        scope.pop();
        let declared = scope.declared_variables();
        assert_eq!(declared.len(), 1);
        assert_eq!(declared[0].name, "outer");
    }

    #[test]
    fn test_assignments_are_visible_to_inner_frames() {
        let mut scope = BoundScope::new();
        scope.note_assignment("point");
        scope.push();
        assert!(scope.is_assigned("point"));
        scope.note_assignment("other");
        scope.pop();
        assert!(!scope.is_assigned("other"));
    }
}
