//! Expected action calls
//!
//! `call!(|c: CustomerController| c.get(32))` compiles the call against the
//! controller and records its shape as a [`CallExpr`] tree. The
//! [`ExpressionReader`] turns that tree into an [`ExpectedCall`]: controller,
//! action and the literal argument bound to each parameter.

use std::fmt;
use std::marker::PhantomData;

use routeprobe_router::{Controller, ControllerDescriptor, Value};

use crate::error::ExpressionError;
use crate::values::{RouteValue, RouteValueOrigin, RouteValues};

/// Shape of a call expression
#[derive(Debug, Clone, PartialEq)]
pub enum CallExpr {
    /// The closure's controller parameter
    Parameter(String),
    MethodCall {
        receiver: Box<CallExpr>,
        method: String,
        args: Vec<CallExpr>,
    },
    /// A cast or `.into()` around another expression
    Convert(Box<CallExpr>),
    Literal(Value),
    FieldAccess {
        receiver: Box<CallExpr>,
        field: String,
    },
    /// Anything else, kept as source text
    Other(String),
}

impl CallExpr {
    /// `receiver.method(args)` on a controller parameter named `receiver`
    pub fn call(receiver: &str, method: &str, args: Vec<CallExpr>) -> Self {
        CallExpr::MethodCall {
            receiver: Box::new(CallExpr::Parameter(receiver.to_string())),
            method: method.to_string(),
            args,
        }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        CallExpr::Literal(value.into())
    }

    pub fn convert(inner: CallExpr) -> Self {
        CallExpr::Convert(Box::new(inner))
    }

    /// Strips conversion wrappers
    pub fn unwrap_conversions(&self) -> &CallExpr {
        let mut expr = self;
        while let CallExpr::Convert(inner) = expr {
            expr = inner;
        }
        expr
    }
}

impl fmt::Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallExpr::Parameter(name) => f.write_str(name),
            CallExpr::MethodCall {
                receiver,
                method,
                args,
            } => {
                write!(f, "{}.{}(", receiver, method)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
            CallExpr::Convert(inner) => write!(f, "{}", inner),
            CallExpr::Literal(Value::Str(s)) => write!(f, "{:?}", s),
            CallExpr::Literal(Value::Null) => f.write_str("None"),
            CallExpr::Literal(value) => write!(f, "{}", value),
            CallExpr::FieldAccess { receiver, field } => write!(f, "{}.{}", receiver, field),
            CallExpr::Other(text) => f.write_str(text),
        }
    }
}

/// A call expression typed by the controller it calls into
///
/// Built by the `call!` macro.
pub struct ActionCall<C> {
    expr: CallExpr,
    _controller: PhantomData<fn() -> C>,
}

impl<C> ActionCall<C> {
    pub fn new(expr: CallExpr) -> Self {
        Self {
            expr,
            _controller: PhantomData,
        }
    }

    pub fn expr(&self) -> &CallExpr {
        &self.expr
    }
}

impl<C: Controller> ActionCall<C> {
    pub fn read(&self) -> Result<ExpectedCall, ExpressionError> {
        ExpressionReader::read(&self.expr, &C::descriptor())
    }
}

impl<C> fmt::Debug for ActionCall<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCall")
            .field("controller", &std::any::type_name::<C>())
            .field("expr", &self.expr)
            .finish()
    }
}

impl<C> Clone for ActionCall<C> {
    fn clone(&self) -> Self {
        Self::new(self.expr.clone())
    }
}

/// Controller, action and arguments of one expected call
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectedCall {
    /// Controller route name, `Customer` for `CustomerController`
    pub controller: String,
    pub controller_type: String,
    pub action: String,
    /// (parameter name, literal) in parameter order
    pub arguments: Vec<(String, Value)>,
}

impl ExpectedCall {
    /// Expected route values, naming the controller by route name or by
    /// type name
    pub fn to_route_values(&self, strip_controller_suffix: bool) -> RouteValues {
        let controller = if strip_controller_suffix {
            &self.controller
        } else {
            &self.controller_type
        };

        let mut values = RouteValues::new()
            .with_controller(controller.as_str())
            .with_action(self.action.as_str());

        for (name, value) in &self.arguments {
            values.add(RouteValue::new(name.as_str(), value.clone(), RouteValueOrigin::Unknown));
        }
        values
    }
}

/// Reads expected calls out of call expressions
pub struct ExpressionReader;

impl ExpressionReader {
    /// Reads a call on one of `controller`'s actions
    ///
    /// The root, after conversions are stripped, must be a method call on the
    /// controller parameter; each argument must be a literal.
    ///
    /// # Examples
    ///
    /// ```
    /// use routeprobe::router::{ActionDescriptor, ControllerDescriptor, ParameterDescriptor, Value};
    /// use routeprobe::{CallExpr, ExpressionReader};
    ///
    /// let controller = ControllerDescriptor::new("CustomerController").with_action(
    ///     ActionDescriptor::new("get", "get")
    ///         .with_parameter(ParameterDescriptor::new("id", "i32", false)),
    /// );
    ///
    /// let expr = CallExpr::call("c", "get", vec![CallExpr::literal(32)]);
    /// let call = ExpressionReader::read(&expr, &controller).unwrap();
    ///
    /// assert_eq!(call.controller, "Customer");
    /// assert_eq!(call.arguments, vec![("id".to_string(), Value::Int(32))]);
    /// ```
    pub fn read(
        expr: &CallExpr,
        controller: &ControllerDescriptor,
    ) -> Result<ExpectedCall, ExpressionError> {
        let (method, args) = match expr.unwrap_conversions() {
            CallExpr::MethodCall {
                receiver,
                method,
                args,
            } if matches!(receiver.unwrap_conversions(), CallExpr::Parameter(_)) => (method, args),
            other => {
                return Err(ExpressionError::UnsupportedExpressionKind(other.to_string()));
            }
        };

        let mut actions = controller.actions_for_method(method);
        let action = actions.next().ok_or_else(|| ExpressionError::UnknownAction {
            controller: controller.type_name().to_string(),
            method: method.clone(),
        })?;
        if actions.next().is_some() {
            return Err(ExpressionError::AmbiguousAction {
                controller: controller.type_name().to_string(),
                method: method.clone(),
            });
        }

        let parameters = action.parameters();
        if parameters.len() != args.len() {
            return Err(ExpressionError::ArgumentCountMismatch {
                method: method.clone(),
                expected: parameters.len(),
                found: args.len(),
            });
        }

        let arguments = parameters
            .iter()
            .zip(args)
            .map(|(parameter, arg)| match arg.unwrap_conversions() {
                CallExpr::Literal(value) => Ok((parameter.name.clone(), value.clone())),
                other => Err(ExpressionError::NonLiteralArgument {
                    parameter: parameter.name.clone(),
                    expression: other.to_string(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ExpectedCall {
            controller: controller.name().to_string(),
            controller_type: controller.type_name().to_string(),
            action: action.name().to_string(),
            arguments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use routeprobe_router::{ActionDescriptor, ParameterDescriptor};

    fn member_controller() -> ControllerDescriptor {
        ControllerDescriptor::new("tests::MemberController")
            .with_action(
                ActionDescriptor::new("ChangePassword", "change_password")
                    .with_parameter(ParameterDescriptor::new("member_id", "i32", false))
                    .with_parameter(ParameterDescriptor::new("new_password", "&str", false)),
            )
            .with_action(ActionDescriptor::new("list", "list"))
    }

    #[test]
    fn test_reads_literal_arguments_in_parameter_order() {
        let expr = CallExpr::call(
            "c",
            "change_password",
            vec![CallExpr::literal(1234), CallExpr::literal("new")],
        );

        let call = ExpressionReader::read(&expr, &member_controller()).unwrap();
        assert_eq!(call.controller, "Member");
        assert_eq!(call.controller_type, "MemberController");
        assert_eq!(call.action, "ChangePassword");
        assert_eq!(
            call.arguments,
            vec![
                ("member_id".to_string(), Value::Int(1234)),
                ("new_password".to_string(), Value::from("new")),
            ]
        );
    }

    #[test]
    fn test_unwraps_result_conversion() {
        let expr = CallExpr::convert(CallExpr::call(
            "c",
            "change_password",
            vec![CallExpr::convert(CallExpr::literal(1)), CallExpr::literal("x")],
        ));

        let call = ExpressionReader::read(&expr, &member_controller()).unwrap();
        assert_eq!(call.arguments[0].1, Value::Int(1));
    }

    #[test]
    fn test_field_access_is_unsupported() {
        let expr = CallExpr::FieldAccess {
            receiver: Box::new(CallExpr::Parameter("c".to_string())),
            field: "name".to_string(),
        };

        assert_eq!(
            ExpressionReader::read(&expr, &member_controller()),
            Err(ExpressionError::UnsupportedExpressionKind("c.name".to_string()))
        );
    }

    #[test]
    fn test_call_on_other_receiver_is_unsupported() {
        let expr = CallExpr::MethodCall {
            receiver: Box::new(CallExpr::Other("helper()".to_string())),
            method: "list".to_string(),
            args: vec![],
        };

        assert!(matches!(
            ExpressionReader::read(&expr, &member_controller()),
            Err(ExpressionError::UnsupportedExpressionKind(_))
        ));
    }

    #[test]
    fn test_variable_argument_is_rejected() {
        let expr = CallExpr::call(
            "c",
            "change_password",
            vec![CallExpr::Other("id".to_string()), CallExpr::literal("x")],
        );

        assert_eq!(
            ExpressionReader::read(&expr, &member_controller()),
            Err(ExpressionError::NonLiteralArgument {
                parameter: "member_id".to_string(),
                expression: "id".to_string(),
            })
        );
    }

    #[test]
    fn test_unknown_action_and_argument_count() {
        let expr = CallExpr::call("c", "missing", vec![]);
        assert!(matches!(
            ExpressionReader::read(&expr, &member_controller()),
            Err(ExpressionError::UnknownAction { .. })
        ));

        let expr = CallExpr::call("c", "list", vec![CallExpr::literal(1)]);
        assert_eq!(
            ExpressionReader::read(&expr, &member_controller()),
            Err(ExpressionError::ArgumentCountMismatch {
                method: "list".to_string(),
                expected: 0,
                found: 1,
            })
        );
    }

    #[test]
    fn test_expected_route_values() {
        let expr = CallExpr::call(
            "c",
            "change_password",
            vec![CallExpr::literal(1234), CallExpr::literal("new")],
        );
        let call = ExpressionReader::read(&expr, &member_controller()).unwrap();

        let values = call.to_route_values(true);
        assert_eq!(values.controller(), Some("Member"));
        assert_eq!(values.action(), Some("ChangePassword"));
        assert_eq!(values.values().len(), 2);

        let values = call.to_route_values(false);
        assert_eq!(values.controller(), Some("MemberController"));
    }

    #[test]
    fn test_display() {
        let expr = CallExpr::call(
            "c",
            "change_password",
            vec![CallExpr::literal(1), CallExpr::literal("new"), CallExpr::literal(Value::Null)],
        );
        assert_eq!(expr.to_string(), "c.change_password(1, \"new\", None)");
    }
}
