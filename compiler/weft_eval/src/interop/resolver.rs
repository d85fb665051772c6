//! Overload resolution for host and extension operations.
//!
//! Resolution runs in five steps:
//! 1. Collect candidates: declared operations of the receiver type and its
//!    ancestors, then extension operations registered for those types.
//!    An operation already seen with the same signature is overridden and
//!    skipped.
//! 2. Match arity. A variadic operation accepts `params - 1` or more
//!    arguments and collects the trailing ones into an array, unless exactly
//!    `params` arguments are given and the last one already is a matching
//!    array, which then binds positionally.
//! 3. Score each match. Identical or assignable arguments cost nothing, a
//!    numeric widening costs its kind distance, and narrowing is rejected
//!    unless the argument is a big integer or big decimal whose value
//!    survives the conversion ([`NARROW_PENALTY`] plus distance).
//! 4. Keep the cheapest matches, prefer positional binding over collected
//!    varargs, and drop any candidate another one is strictly more specific
//!    than. More than one survivor is ambiguous.
//! 5. Cache the result by call shape: receiver type, operation name,
//!    static-ness and argument types. A shape whose outcome depends on
//!    argument values (a big integer or big decimal meeting a parameter it
//!    can only reach by narrowing) is resolved afresh on every call.

use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use tracing::{debug, trace};
use weft_ir::Name;

use super::{HostOperation, ParamType, TypeRegistry};
use crate::errors::{ambiguous_operation, no_applicable_operation, EvalError};
use crate::extensions::ExtensionRegistry;
use crate::numeric::{self, Conversion, NumericKind};
use crate::Value;

/// Cost of accepting a round-tripping narrowing conversion.
pub const NARROW_PENALTY: u32 = 100;

/// Cache key for a resolution.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallShape {
    pub receiver: ParamType,
    pub operation: Name,
    pub is_static: bool,
    pub args: SmallVec<[ParamType; 4]>,
}

impl CallShape {
    pub fn of(receiver: &Value, operation: &Name, is_static: bool, args: &[Value]) -> Self {
        CallShape {
            receiver: receiver.runtime_type(),
            operation: operation.clone(),
            is_static,
            args: args.iter().map(Value::runtime_type).collect(),
        }
    }
}

/// How call arguments map onto the chosen operation's parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArgBinding {
    Positional,
    /// The first `fixed` arguments bind positionally; the rest become an
    /// array of `element`.
    Collect { fixed: usize, element: ParamType },
}

/// The operation a call shape resolved to.
#[derive(Debug)]
pub struct Resolution {
    pub operation: Arc<HostOperation>,
    pub binding: ArgBinding,
}

impl Resolution {
    /// Convert `args` to the operation's parameter types, collecting varargs.
    pub fn bind_args(&self, args: Vec<Value>) -> Result<Vec<Value>, EvalError> {
        let params = &self.operation.params;
        match &self.binding {
            ArgBinding::Positional => params
                .iter()
                .zip(args)
                .map(|(param, arg)| coerce(param, arg))
                .collect(),
            ArgBinding::Collect { fixed, element } => {
                let mut args = args.into_iter();
                let mut bound = Vec::with_capacity(params.len());
                for param in &params[..*fixed] {
                    let arg = args.next().unwrap_or(Value::Null);
                    bound.push(coerce(param, arg)?);
                }
                let rest = args
                    .map(|arg| coerce(element, arg))
                    .collect::<Result<Vec<_>, _>>()?;
                bound.push(Value::array(element.clone(), rest));
                Ok(bound)
            }
        }
    }
}

/// Convert a single argument to a declared parameter type.
fn coerce(param: &ParamType, arg: Value) -> Result<Value, EvalError> {
    match param {
        ParamType::Kind(NumericKind::Object) => Ok(arg),
        ParamType::Kind(_) if matches!(arg, Value::Null) => Ok(arg),
        ParamType::Kind(NumericKind::Number) => Ok(arg),
        ParamType::Kind(kind) => numeric::convert(&arg, *kind),
        _ => Ok(arg),
    }
}

/// Concurrent, insert-once resolution cache plus the matching logic.
pub struct Resolver {
    cache: DashMap<CallShape, Arc<Resolution>, FxBuildHasher>,
}

impl Default for Resolver {
    fn default() -> Self {
        Resolver::new()
    }
}

impl Resolver {
    pub fn new() -> Self {
        Resolver {
            cache: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Number of cached call shapes.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Resolve `operation` for `receiver` and `args`.
    ///
    /// `receiver` is a [`Value::Type`] for constructors and static
    /// operations, with `is_static` set.
    pub fn resolve(
        &self,
        types: &TypeRegistry,
        extensions: &ExtensionRegistry,
        receiver: &Value,
        operation: &Name,
        is_static: bool,
        args: &[Value],
    ) -> Result<Arc<Resolution>, EvalError> {
        let shape = CallShape::of(receiver, operation, is_static, args);
        if let Some(hit) = self.cache.get(&shape) {
            trace!(operation = %operation, "resolution cache hit");
            return Ok(Arc::clone(hit.value()));
        }

        let candidates = candidates(types, extensions, receiver, operation, is_static);
        let resolution = Arc::new(select(types, receiver, operation, &candidates, args)?);
        let sensitive = value_sensitive(&candidates, args);
        debug!(
            chosen = %resolution.operation.signature(),
            candidates = candidates.len(),
            cached = !sensitive,
            "resolved host operation"
        );
        if sensitive {
            return Ok(resolution);
        }
        let entry = self.cache.entry(shape).or_insert(resolution);
        Ok(Arc::clone(entry.value()))
    }

    /// Whether `receiver` has any operation called `operation`, regardless of
    /// arity.
    pub fn has_operation(
        &self,
        types: &TypeRegistry,
        extensions: &ExtensionRegistry,
        receiver: &Value,
        operation: &str,
        is_static: bool,
    ) -> bool {
        let name = Name::new(operation);
        !candidates(types, extensions, receiver, &name, is_static).is_empty()
    }
}

/// Declared operations first (most derived type first), then extensions.
fn candidates(
    types: &TypeRegistry,
    extensions: &ExtensionRegistry,
    receiver: &Value,
    operation: &Name,
    is_static: bool,
) -> Vec<Arc<HostOperation>> {
    let mut found: Vec<Arc<HostOperation>> = Vec::new();
    let mut add = |op: &Arc<HostOperation>| {
        if op.name == *operation
            && op.is_static == is_static
            && !found.iter().any(|seen| seen.same_signature(op))
        {
            found.push(Arc::clone(op));
        }
    };

    let ancestor_names = match receiver {
        Value::Type(info) => {
            for ancestor in info.ancestors() {
                ancestor.operations().iter().for_each(&mut add);
            }
            return found;
        }
        Value::Host(object) => {
            let ancestors = object.info().ancestors();
            for ancestor in &ancestors {
                ancestor.operations().iter().for_each(&mut add);
            }
            let mut names: Vec<Name> = ancestors.iter().map(|t| t.name.clone()).collect();
            names.push(Name::new("object"));
            names
        }
        other => other.runtime_type().ancestor_names(types),
    };
    for name in &ancestor_names {
        extensions.operations_for(name).iter().for_each(&mut add);
    }
    found
}

/// Whether the outcome for `args` can depend on their values and not only
/// their kinds: some arbitrary-precision argument faces a parameter it can
/// only reach by a value-checked narrowing.
fn value_sensitive(candidates: &[Arc<HostOperation>], args: &[Value]) -> bool {
    let sources: SmallVec<[NumericKind; 4]> = args
        .iter()
        .filter_map(Value::numeric_kind)
        .filter(|kind| kind.is_arbitrary_precision())
        .collect();
    if sources.is_empty() {
        return false;
    }
    let narrows_to = |target: NumericKind| {
        sources
            .iter()
            .any(|source| source.conversion_to(target) == Conversion::Narrow)
    };
    candidates
        .iter()
        .flat_map(|op| op.params.iter())
        .any(|param| match param {
            ParamType::Kind(target) => narrows_to(*target),
            ParamType::Array(element) => match element.as_ref() {
                ParamType::Kind(target) => narrows_to(*target),
                _ => false,
            },
            _ => false,
        })
}

struct Match {
    operation: Arc<HostOperation>,
    difficulty: u32,
    binding: ArgBinding,
    /// Parameter types laid out against the actual arguments.
    expanded: Vec<ParamType>,
}

fn select(
    types: &TypeRegistry,
    receiver: &Value,
    operation: &Name,
    candidates: &[Arc<HostOperation>],
    args: &[Value],
) -> Result<Resolution, EvalError> {
    let mut matches: Vec<Match> = candidates
        .iter()
        .filter_map(|op| match_operation(op, args))
        .collect();

    let type_name = receiver.type_name();
    if matches.is_empty() {
        let arg_types: Vec<String> = args.iter().map(Value::type_name).collect();
        return Err(no_applicable_operation(&type_name, operation, &arg_types));
    }

    let best = matches.iter().map(|m| m.difficulty).min().unwrap_or(0);
    matches.retain(|m| m.difficulty == best);

    if matches.iter().any(|m| m.binding == ArgBinding::Positional) {
        matches.retain(|m| m.binding == ArgBinding::Positional);
    }

    let dominated: Vec<bool> = matches
        .iter()
        .map(|m| {
            matches.iter().any(|other| {
                more_specific(types, &other.expanded, &m.expanded)
                    && !more_specific(types, &m.expanded, &other.expanded)
            })
        })
        .collect();
    let mut survivors: Vec<Match> = matches
        .into_iter()
        .zip(dominated)
        .filter_map(|(m, dominated)| (!dominated).then_some(m))
        .collect();

    if survivors.len() > 1 {
        let names = survivors
            .iter()
            .map(|m| m.operation.signature())
            .collect();
        return Err(ambiguous_operation(&type_name, operation, names));
    }
    match survivors.pop() {
        Some(m) => Ok(Resolution {
            operation: m.operation,
            binding: m.binding,
        }),
        None => {
            let arg_types: Vec<String> = args.iter().map(Value::type_name).collect();
            Err(no_applicable_operation(&type_name, operation, &arg_types))
        }
    }
}

fn match_operation(op: &Arc<HostOperation>, args: &[Value]) -> Option<Match> {
    let params = &op.params;
    let positional = |expanded: &[ParamType]| -> Option<u32> {
        expanded
            .iter()
            .zip(args)
            .map(|(param, arg)| penalty(param, arg))
            .sum()
    };

    if args.len() == params.len() {
        let last_binds_whole =
            !op.variadic || matches!(args.last(), Some(Value::Array(_) | Value::Null));
        if last_binds_whole {
            if let Some(difficulty) = positional(params.as_slice()) {
                return Some(Match {
                    operation: Arc::clone(op),
                    difficulty,
                    binding: ArgBinding::Positional,
                    expanded: params.clone(),
                });
            }
        }
    }
    if !op.variadic {
        return None;
    }

    let fixed = params.len().checked_sub(1)?;
    let Some(ParamType::Array(element)) = params.last() else {
        return None;
    };
    if args.len() < fixed {
        return None;
    }
    let mut expanded: Vec<ParamType> = params[..fixed].to_vec();
    expanded.extend(std::iter::repeat((**element).clone()).take(args.len() - fixed));
    let difficulty = positional(expanded.as_slice())?;
    Some(Match {
        operation: Arc::clone(op),
        difficulty,
        binding: ArgBinding::Collect {
            fixed,
            element: (**element).clone(),
        },
        expanded,
    })
}

/// Cost of passing `arg` where `param` is declared; `None` if it cannot be
/// passed at all.
fn penalty(param: &ParamType, arg: &Value) -> Option<u32> {
    if let Value::Null = arg {
        return accepts_null(param).then_some(0);
    }
    match param {
        ParamType::Kind(target) => match arg.numeric_kind() {
            Some(source) => match source.conversion_to(*target) {
                Conversion::Identical => Some(0),
                Conversion::Widen => Some(source.distance(*target)),
                Conversion::Narrow
                    if source.is_arbitrary_precision()
                        && numeric::convert(arg, *target).is_ok() =>
                {
                    Some(NARROW_PENALTY + source.distance(*target))
                }
                Conversion::Narrow | Conversion::Impossible => None,
            },
            None => (*target == NumericKind::Object).then_some(0),
        },
        ParamType::Text => matches!(arg, Value::Str(_)).then_some(0),
        ParamType::List => matches!(arg, Value::List(_)).then_some(0),
        ParamType::Map => matches!(arg, Value::Map(_)).then_some(0),
        ParamType::Tuple => matches!(arg, Value::Tuple(_)).then_some(0),
        ParamType::Function => {
            matches!(arg, Value::Function(_) | Value::Builtin(_) | Value::Method(_)).then_some(0)
        }
        ParamType::Array(element) => match arg {
            Value::Array(array) => array_element_accepts(element, &array.element).then_some(0),
            _ => None,
        },
        ParamType::Host(name) => match arg {
            Value::Host(object) => object.info().is_subtype_of(name).then_some(0),
            _ => None,
        },
        ParamType::Type(name) => match arg {
            Value::Type(info) => (info.name == *name).then_some(0),
            _ => None,
        },
        ParamType::Null | ParamType::Void => None,
    }
}

fn accepts_null(param: &ParamType) -> bool {
    match param {
        ParamType::Kind(kind) => matches!(
            kind,
            NumericKind::BigInteger | NumericKind::BigDecimal | NumericKind::Number | NumericKind::Object
        ),
        ParamType::Null | ParamType::Void => false,
        _ => true,
    }
}

fn array_element_accepts(param: &ParamType, arg: &ParamType) -> bool {
    param == arg
        || *param == ParamType::OBJECT && !matches!(arg, ParamType::Kind(_))
}

/// `a` is at least as specific as `b`, parameter by parameter.
fn more_specific(types: &TypeRegistry, a: &[ParamType], b: &[ParamType]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(a, b)| param_assignable(types, a, b))
}

fn param_assignable(types: &TypeRegistry, from: &ParamType, to: &ParamType) -> bool {
    if from == to || *to == ParamType::OBJECT {
        return true;
    }
    match (from, to) {
        (ParamType::Kind(a), ParamType::Kind(b)) => a.conversion_to(*b) == Conversion::Widen,
        (ParamType::Array(a), ParamType::Array(b)) => array_element_accepts(b, a),
        (ParamType::Host(a), ParamType::Host(b)) => types.is_subtype(a, b),
        _ => false,
    }
}
