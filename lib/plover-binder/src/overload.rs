//! Overload resolution.
//!
//! Arguments are bound once, before any candidate is tried. Each candidate
//! then rearranges them into parameter order, fills in defaults and capture
//! references, and casts every argument to its parameter type. A candidate's
//! score is the number of implicit, non-identity casts it needed; the lowest
//! score wins.

use std::rc::Rc;

use plover_bound_tree::{builtins, BoundExpression, Cast, FunctionSymbol, VariableSymbol};
use plover_span::Span;

use crate::binder::Binder;
use crate::diagnostics::{
    AmbiguousOverload, IncorrectArgumentCount, NoOverload, NoSuchParameter,
    ParameterAlreadySpecified, UndefinedName,
};
use crate::error::BindResult;

/// A call-site argument, bound before overload resolution.
#[derive(Debug, Clone)]
pub(crate) struct Argument {
    /// Name and span of `name:` for named arguments
    pub name: Option<(String, Span)>,
    pub value: BoundExpression,
    pub span: Span,
}

/// A candidate that accepted the arguments.
#[derive(Debug)]
struct Match {
    function: Rc<FunctionSymbol>,
    arguments: Vec<BoundExpression>,
    score: usize,
}

pub(crate) struct OverloadResolution<'a> {
    binder: &'a mut Binder,
}

impl<'a> OverloadResolution<'a> {
    pub(crate) fn new(binder: &'a mut Binder) -> Self {
        Self { binder }
    }

    /// Pick the candidate `arguments` bind best to and build the call.
    ///
    /// A lone candidate keeps whatever it reports. With several, every
    /// candidate's diagnostics are discarded and only the outcome is
    /// reported.
    pub(crate) fn resolve(
        mut self,
        name: &str,
        candidates: &[Rc<FunctionSymbol>],
        arguments: &[Argument],
        span: Span,
    ) -> BindResult<BoundExpression> {
        if let [function] = candidates {
            let result = self.try_candidate(name, function, arguments, false, &span)?;
            return Ok(match result {
                Some(found) => BoundExpression::call(found.function, found.arguments, span),
                None => BoundExpression::error(span),
            });
        }

        let start = self.binder.diagnostics.checkpoint();
        let mut best: Vec<Match> = Vec::new();
        let mut min_score = usize::MAX;

        for function in candidates {
            let before = self.binder.diagnostics.checkpoint();
            let result = self.try_candidate(name, function, arguments, true, &span)?;
            if self.binder.diagnostics.grew_since(before) {
                continue;
            }
            let Some(found) = result else {
                continue;
            };

            if found.score < min_score {
                min_score = found.score;
                best.clear();
                best.push(found);
            } else if found.score == min_score {
                best.push(found);
            }
        }

        self.binder.diagnostics.rollback(start);

        if best.len() > 1 {
            // `HasValue(null)` and friends match every wrapper equally
            if let Some(index) = best
                .iter()
                .position(|found| builtins::is_any_wrapper(&found.function))
            {
                let found = best.swap_remove(index);
                return Ok(BoundExpression::call(found.function, found.arguments, span));
            }

            self.binder.report(AmbiguousOverload {
                name: name.to_string(),
                candidates: best.iter().map(|found| found.function.to_string()).collect(),
                span: span.clone(),
            });
            return Ok(BoundExpression::error(span));
        }

        match best.pop() {
            Some(found) => Ok(BoundExpression::call(found.function, found.arguments, span)),
            None => {
                self.binder.report(NoOverload {
                    name: name.to_string(),
                    span: span.clone(),
                });
                Ok(BoundExpression::error(span))
            }
        }
    }

    fn try_candidate(
        &mut self,
        name: &str,
        function: &Rc<FunctionSymbol>,
        arguments: &[Argument],
        has_overloads: bool,
        span: &Span,
    ) -> BindResult<Option<Match>> {
        let visible: Vec<Rc<VariableSymbol>> = function.visible_parameters().cloned().collect();
        let required = visible
            .iter()
            .filter(|parameter| parameter.default_value().is_none())
            .count();

        if arguments.len() < required || arguments.len() > visible.len() {
            self.binder.report(IncorrectArgumentCount {
                name: name.to_string(),
                expected: visible.len(),
                found: arguments.len(),
                span: span.clone(),
            });
            return Ok(None);
        }

        let Some(slots) = self.rearrange(name, &visible, arguments, has_overloads) else {
            return Ok(None);
        };

        let mut bound = Vec::with_capacity(function.parameters.len());
        let mut score = 0;
        let mut failed = false;

        for (parameter, slot) in visible.iter().zip(slots) {
            let Some(value) = slot.or_else(|| parameter.default_value().cloned()) else {
                self.binder.report(IncorrectArgumentCount {
                    name: name.to_string(),
                    expected: visible.len(),
                    found: arguments.len(),
                    span: span.clone(),
                });
                return Ok(None);
            };

            let (value, cast) = self
                .binder
                .bind_cast(value.span.clone(), value, &parameter.ty, false);
            if value.is_error() {
                failed = true;
            }
            if cast == Cast::Implicit {
                score += 1;
            }
            bound.push(value);
        }

        for parameter in function.capture_parameters() {
            let captured = &parameter.name[1..];
            let Some(variable) = self.binder.scope.lookup_variable(captured).cloned() else {
                self.binder.report(UndefinedName {
                    name: captured.to_string(),
                    span: span.clone(),
                });
                failed = true;
                continue;
            };

            self.binder.track_usage(&variable);
            let reference = BoundExpression::reference(variable, span.clone());
            let (value, _) = self
                .binder
                .bind_cast(span.clone(), reference, &parameter.ty, false);
            bound.push(value);
        }

        if failed {
            return Ok(None);
        }

        Ok(Some(Match {
            function: function.clone(),
            arguments: bound,
            score,
        }))
    }

    /// Put each argument in the slot of the parameter it supplies.
    ///
    /// Positional arguments always precede named ones, so they fill slots in
    /// order. Returns `None` after reporting an unknown or repeated name.
    fn rearrange(
        &mut self,
        name: &str,
        visible: &[Rc<VariableSymbol>],
        arguments: &[Argument],
        has_overloads: bool,
    ) -> Option<Vec<Option<BoundExpression>>> {
        let mut slots: Vec<Option<BoundExpression>> = vec![None; visible.len()];
        let mut failed = false;

        for (position, argument) in arguments.iter().enumerate() {
            let index = match &argument.name {
                None => position,
                Some((parameter, parameter_span)) => {
                    match visible.iter().position(|p| p.name == *parameter) {
                        Some(index) => index,
                        None => {
                            self.binder.report(NoSuchParameter {
                                function: name.to_string(),
                                parameter: parameter.clone(),
                                has_overloads,
                                span: parameter_span.clone(),
                            });
                            failed = true;
                            continue;
                        }
                    }
                }
            };

            if slots[index].is_some() {
                self.binder.report(ParameterAlreadySpecified {
                    name: visible[index].name.clone(),
                    span: argument.span.clone(),
                });
                failed = true;
                continue;
            }
            slots[index] = Some(argument.value.clone());
        }

        (!failed).then_some(slots)
    }
}
