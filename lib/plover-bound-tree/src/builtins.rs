//! Functions available in every compilation without a declaration.

use std::rc::Rc;

use crate::symbols::{FunctionSymbol, VariableSymbol};
use crate::ty::BoundType;

fn builtin(name: &str, parameters: &[(&str, BoundType)], return_type: BoundType) -> FunctionSymbol {
    let parameters = parameters
        .iter()
        .enumerate()
        .map(|(ordinal, (name, ty))| Rc::new(VariableSymbol::parameter(*name, ty.clone(), ordinal)))
        .collect();
    FunctionSymbol::new(name, parameters, return_type, None)
}

/// The nullable-wrapper helpers are declared once per primitive, `any` first.
fn wrapper_types() -> [BoundType; 5] {
    [
        BoundType::any(),
        BoundType::bool(),
        BoundType::decimal(),
        BoundType::int(),
        BoundType::string(),
    ]
}

pub fn value(ty: BoundType) -> FunctionSymbol {
    builtin("Value", &[("value", ty.clone().nullable())], ty)
}

pub fn has_value(ty: BoundType) -> FunctionSymbol {
    builtin("HasValue", &[("value", ty.nullable())], BoundType::bool())
}

/// `HasValue(any?)`, which `x is null` lowers to.
pub fn has_value_any() -> FunctionSymbol {
    has_value(BoundType::any())
}

pub fn value_any() -> FunctionSymbol {
    value(BoundType::any())
}

/// Every builtin, in declaration order.
pub fn all() -> Vec<FunctionSymbol> {
    let mut functions = vec![
        builtin("Print", &[("text", BoundType::nullable_any())], BoundType::void()),
        builtin("PrintLine", &[("text", BoundType::nullable_any())], BoundType::void()),
        builtin("PrintLine", &[], BoundType::void()),
        builtin("Input", &[], BoundType::string()),
        builtin("RandInt", &[("max", BoundType::nullable_int())], BoundType::int()),
    ];
    functions.extend(wrapper_types().into_iter().map(value));
    functions.extend(wrapper_types().into_iter().map(has_value));
    functions
}

/// True for the `any` overloads of `Value` and `HasValue`.
pub fn is_any_wrapper(function: &FunctionSymbol) -> bool {
    function.is_builtin()
        && (function.signature_matches(&value_any()) || function.signature_matches(&has_value_any()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_duplicate_signatures() {
        let functions = all();
        for (i, a) in functions.iter().enumerate() {
            for b in &functions[i + 1..] {
                assert!(!a.signature_matches(b), "{} duplicates {}", a, b);
            }
        }
    }

    #[test]
    fn test_wrappers() {
        let value = value(BoundType::int());
        assert_eq!(value.to_string(), "Value(int)");
        assert_eq!(value.return_type, BoundType::int());
        assert!(is_any_wrapper(&has_value_any()));
        assert!(!is_any_wrapper(&has_value(BoundType::string())));
    }
}
