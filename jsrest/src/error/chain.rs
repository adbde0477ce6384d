use std::error::Error as StdError;

use crate::error::error_impl::{CompositeError, Error, ErrorRepr};

/// How a chain node leads to its causes.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Unwrap<'a> {
    Leaf,
    Single(&'a (dyn StdError + 'static)),
    Multi(&'a [Error]),
}

/// Returns the causes of a chain node.
///
/// Nodes of this crate's [`Error`] type expose all of their causes; any other
/// error is followed through [`StdError::source`].
pub(crate) fn unwrap<'a>(node: &'a (dyn StdError + 'static)) -> Unwrap<'a> {
    if let Some(error) = node.downcast_ref::<Error>() {
        return error.unwrap_causes();
    }
    if let Some(composite) = node.downcast_ref::<CompositeError>() {
        return Unwrap::Multi(composite.causes());
    }

    node.source().map_or(Unwrap::Leaf, Unwrap::Single)
}

/// Returns the node itself as `E`, looking inside [`Error`] wrappers.
pub(crate) fn downcast_node<'a, E>(node: &'a (dyn StdError + 'static)) -> Option<&'a E>
where
    E: StdError + 'static,
{
    if let Some(error) = node.downcast_ref::<E>() {
        return Some(error);
    }

    match node.downcast_ref::<Error>()?.repr() {
        ErrorRepr::Status(status) => <dyn StdError>::downcast_ref::<E>(status),
        ErrorRepr::Composite(composite) => <dyn StdError>::downcast_ref::<E>(composite),
        ErrorRepr::Message { .. } => None,
        ErrorRepr::Custom(inner) => inner.downcast_ref::<E>(),
    }
}

/// Returns `true` if the node is a transparent join.
pub(crate) fn is_composite(node: &(dyn StdError + 'static)) -> bool {
    downcast_node::<CompositeError>(node).is_some()
}

/// Pre-order iterator over the nodes of an error chain.
///
/// Returned by [`Error::chain`]. Each node is yielded before its causes, and
/// the causes of a multi-cause node in the order they were supplied.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    stack: Vec<&'a (dyn StdError + 'static)>,
}

impl<'a> Chain<'a> {
    pub(crate) fn new(root: &'a Error) -> Self {
        let root: &'a (dyn StdError + 'static) = root;
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        match unwrap(node) {
            Unwrap::Leaf => {}
            Unwrap::Single(cause) => self.stack.push(cause),
            Unwrap::Multi(causes) => self.stack.extend(
                causes
                    .iter()
                    .rev()
                    .map(|cause| -> &'a (dyn StdError + 'static) { cause }),
            ),
        }

        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatusError;

    fn texts(error: &Error) -> Vec<String> {
        error.chain().map(ToString::to_string).collect()
    }

    #[test]
    fn chain_single_node() {
        let error = Error::custom("alone");

        assert_eq!(texts(&error), ["alone"]);
    }

    #[test]
    fn chain_pre_order_left_to_right() {
        let error = Error::message(
            "root",
            vec![
                Error::message("a", vec![Error::custom("a1"), Error::custom("a2")]),
                Error::message("b", vec![Error::custom("b1")]),
            ],
        );

        assert_eq!(texts(&error), ["root", "a", "a1", "a2", "b", "b1"]);
    }

    #[test]
    fn chain_includes_composites() {
        let error = Error::join([Error::custom("first"), Error::from(StatusError::GONE)]);

        let nodes: Vec<_> = error.chain().collect();
        assert_eq!(nodes.len(), 3);
        assert!(is_composite(nodes[0]));
        assert!(!is_composite(nodes[1]));
        assert_eq!(nodes[2].to_string(), "[410] Gone");
    }

    #[test]
    fn chain_follows_std_sources() {
        #[derive(Debug, thiserror::Error)]
        #[error("wrapper")]
        struct Wrapper(#[source] std::io::Error);

        let error = Error::message(
            "root",
            vec![Error::custom(Wrapper(std::io::Error::other("io")))],
        );

        assert_eq!(texts(&error), ["root", "wrapper", "io"]);
    }

    #[test]
    fn downcast_node_looks_inside_error() {
        let error = Error::from(StatusError::LOCKED);
        let node: &(dyn StdError + 'static) = &error;

        assert_eq!(downcast_node::<StatusError>(node), Some(&StatusError::LOCKED));
        assert!(downcast_node::<CompositeError>(node).is_none());
    }

    #[test]
    fn unwrap_message_arity() {
        let leaf = Error::message("leaf", Vec::new());
        let single = Error::message("single", vec![Error::custom("x")]);
        let multi = Error::message("multi", vec![Error::custom("x"), Error::custom("y")]);

        assert!(matches!(unwrap(&leaf), Unwrap::Leaf));
        assert!(matches!(unwrap(&single), Unwrap::Single(_)));
        assert!(matches!(unwrap(&multi), Unwrap::Multi(causes) if causes.len() == 2));
    }
}
