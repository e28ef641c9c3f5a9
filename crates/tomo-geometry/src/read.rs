//! Field readers shared by the geometry constructors
//!
//! Every reader marks the field as parsed before looking it up, so a missing
//! field is reported as missing rather than also as unused.

use crate::error::{GeometryError, Result};
use tomo_config::{ConfigNode, ConfigStackCheck};

pub(crate) fn required_node<'a>(
    cc: &ConfigStackCheck<'_>,
    node: &'a ConfigNode,
    field: &str,
) -> Result<&'a ConfigNode> {
    cc.mark_node_parsed(field);
    node.single_node(field)
        .ok_or_else(|| GeometryError::MissingField {
            component: cc.component().to_string(),
            field: field.to_string(),
        })
}

pub(crate) fn number(cc: &ConfigStackCheck<'_>, node: &ConfigNode, field: &str) -> Result<f64> {
    let value = required_node(cc, node, field)?.content_number()?;
    if !value.is_finite() {
        return Err(GeometryError::invalid(
            cc.component(),
            field,
            "must be finite",
        ));
    }
    Ok(value)
}

/// Counts are truncated toward zero
pub(crate) fn count(cc: &ConfigStackCheck<'_>, node: &ConfigNode, field: &str) -> Result<u32> {
    let value = number(cc, node, field)?;
    if value < 1.0 || value > u32::MAX as f64 {
        return Err(GeometryError::invalid(
            cc.component(),
            field,
            format!("must be a positive count, got {}", value),
        ));
    }
    Ok(value as u32)
}

pub(crate) fn list(cc: &ConfigStackCheck<'_>, node: &ConfigNode, field: &str) -> Result<Vec<f64>> {
    let values = required_node(cc, node, field)?.content_list()?;
    if values.is_empty() {
        return Err(GeometryError::invalid(cc.component(), field, "is empty"));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(GeometryError::invalid(
            cc.component(),
            field,
            "contains non-finite values",
        ));
    }
    Ok(values)
}

pub(crate) fn option(
    cc: &ConfigStackCheck<'_>,
    node: &ConfigNode,
    key: &str,
    default: f64,
) -> Result<f64> {
    cc.mark_option_parsed(key);
    Ok(node.option_numerical(key, default)?)
}
