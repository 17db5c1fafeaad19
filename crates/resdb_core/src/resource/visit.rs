//! Payload traversal.

use crate::error::CoreResult;
use crate::resource::value::{FieldValue, Resource};

/// Field shapes a traversal can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// Structured reference fields.
    Reference,
    /// Plain address-valued text fields.
    Uri,
    /// Rich-text fields with embedded links.
    Markup,
}

/// Invokes `action` once per field whose shape is in `shapes`, at any
/// nesting depth, in document order.
///
/// Lists and groups are descended into; they are containers, not
/// shapes. The first error aborts the traversal.
///
/// # Errors
///
/// Propagates the first error returned by `action`.
pub fn visit_fields_mut<F>(
    resource: &mut Resource,
    shapes: &[FieldShape],
    action: &mut F,
) -> CoreResult<()>
where
    F: FnMut(&mut FieldValue) -> CoreResult<()>,
{
    for (_, value) in &mut resource.fields {
        visit_value(value, shapes, action)?;
    }
    Ok(())
}

fn visit_value<F>(value: &mut FieldValue, shapes: &[FieldShape], action: &mut F) -> CoreResult<()>
where
    F: FnMut(&mut FieldValue) -> CoreResult<()>,
{
    let matched = match value {
        FieldValue::Reference(_) => shapes.contains(&FieldShape::Reference),
        FieldValue::Uri(_) => shapes.contains(&FieldShape::Uri),
        FieldValue::Markup(_) => shapes.contains(&FieldShape::Markup),
        FieldValue::List(items) => {
            for item in items {
                visit_value(item, shapes, action)?;
            }
            return Ok(());
        }
        FieldValue::Group(fields) => {
            for (_, nested) in fields {
                visit_value(nested, shapes, action)?;
            }
            return Ok(());
        }
        FieldValue::Text(_) | FieldValue::Boolean(_) | FieldValue::Integer(_) => false,
    };
    if matched {
        action(value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::resource::value::Reference;

    fn sample() -> Resource {
        Resource::new("DiagnosticReport")
            .field("status", FieldValue::Text("final".to_string()))
            .field(
                "subject",
                FieldValue::Reference(Reference::to("Patient/1")),
            )
            .field(
                "result",
                FieldValue::List(vec![
                    FieldValue::Reference(Reference::to("Observation/1")),
                    FieldValue::Group(vec![(
                        "link".to_string(),
                        FieldValue::Uri("Observation/2".to_string()),
                    )]),
                ]),
            )
            .field("text", FieldValue::Markup("<div/>".to_string()))
    }

    #[test]
    fn visits_matching_shapes_at_any_depth() {
        let mut resource = sample();
        let mut seen = Vec::new();
        visit_fields_mut(
            &mut resource,
            &[FieldShape::Reference, FieldShape::Uri, FieldShape::Markup],
            &mut |value| {
                seen.push(match value {
                    FieldValue::Reference(_) => "reference",
                    FieldValue::Uri(_) => "uri",
                    FieldValue::Markup(_) => "markup",
                    _ => "other",
                });
                Ok(())
            },
        )
        .unwrap();
        assert_eq!(seen, ["reference", "reference", "uri", "markup"]);
    }

    #[test]
    fn shape_selection_filters_visits() {
        let mut resource = sample();
        let mut count = 0;
        visit_fields_mut(&mut resource, &[FieldShape::Uri], &mut |_| {
            count += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn action_can_mutate_in_place() {
        let mut resource = sample();
        visit_fields_mut(&mut resource, &[FieldShape::Reference], &mut |value| {
            if let FieldValue::Reference(reference) = value {
                reference.target = Some("rewritten".to_string());
            }
            Ok(())
        })
        .unwrap();
        match resource.get("subject") {
            Some(FieldValue::Reference(reference)) => {
                assert_eq!(reference.target.as_deref(), Some("rewritten"));
            }
            other => panic!("unexpected field: {other:?}"),
        }
    }

    #[test]
    fn first_error_aborts_traversal() {
        let mut resource = sample();
        let mut visits = 0;
        let result = visit_fields_mut(&mut resource, &[FieldShape::Reference], &mut |_| {
            visits += 1;
            Err(CoreError::unresolved_reference("Patient/1"))
        });
        assert!(result.is_err());
        assert_eq!(visits, 1);
    }
}
