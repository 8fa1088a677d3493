//! Parameter definitions and constraints for filters.
//!
//! Every filter publishes its parameters with a default and optional
//! constraints. The registry uses them to validate and complete a
//! [`FilterSpec`](crate::core::types::FilterSpec) before construction.

use crate::core::error::{ImagingError, ImagingResult};
use crate::core::types::{ParamType, Value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Definition of a filter parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterDefinition {
    /// Unique name within the filter
    pub name: String,
    /// Human-readable name
    pub display_name: String,
    /// Type of the parameter
    pub param_type: ParamType,
    /// Value used when the request omits the parameter
    pub default_value: Value,
    /// Description for documentation
    pub description: String,
    /// Constraints for validation
    pub constraints: Vec<Constraint>,
}

/// Constraints that can be applied to parameter values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "params")]
pub enum Constraint {
    /// Numeric value must be within range [min, max]
    Range {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// Numeric value must be >= min
    MinValue(f64),
    /// Numeric value must be <= max
    MaxValue(f64),
    /// Numeric value must be > 0
    Positive,
    /// Numeric value must be >= 0
    NonNegative,
    /// String must be one of the listed options
    OneOf(Vec<String>),
}

impl ParameterDefinition {
    /// Create a new parameter definition.
    pub fn new(name: impl Into<String>, param_type: ParamType, default_value: Value) -> Self {
        let name = name.into();
        Self {
            display_name: name_to_display(&name),
            name,
            param_type,
            default_value,
            description: String::new(),
            constraints: Vec::new(),
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Validate a value against this parameter's type and constraints.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        if !self.param_type.matches(value) {
            return Err(format!(
                "expected {}, got {}",
                self.param_type,
                value.get_type()
            ));
        }

        for constraint in &self.constraints {
            constraint.validate(value)?;
        }

        Ok(())
    }
}

// ============================================================================
// Constraint Validation
// ============================================================================

impl Constraint {
    /// Validate a value against this constraint.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match self {
            Constraint::Range { min, max } => {
                if let Some(num) = value.as_float() {
                    if num < *min || num > *max {
                        return Err(format!("value {} is out of range [{}, {}]", num, min, max));
                    }
                }
            }

            Constraint::MinValue(min) => {
                if let Some(num) = value.as_float() {
                    if num < *min {
                        return Err(format!("value {} is below minimum {}", num, min));
                    }
                }
            }

            Constraint::MaxValue(max) => {
                if let Some(num) = value.as_float() {
                    if num > *max {
                        return Err(format!("value {} is above maximum {}", num, max));
                    }
                }
            }

            Constraint::Positive => {
                if let Some(num) = value.as_float() {
                    if num <= 0.0 {
                        return Err(format!("value {} must be positive", num));
                    }
                }
            }

            Constraint::NonNegative => {
                if let Some(num) = value.as_float() {
                    if num < 0.0 {
                        return Err(format!("value {} must be non-negative", num));
                    }
                }
            }

            Constraint::OneOf(options) => {
                if let Some(s) = value.as_string() {
                    if !options.iter().any(|o| o == s) {
                        return Err(format!("'{}' is not one of {:?}", s, options));
                    }
                }
            }
        }

        Ok(())
    }

    /// Get a human-readable description of this constraint.
    pub fn description(&self) -> String {
        match self {
            Constraint::Range { min, max } => format!("Must be between {} and {}", min, max),
            Constraint::MinValue(min) => format!("Must be at least {}", min),
            Constraint::MaxValue(max) => format!("Must be at most {}", max),
            Constraint::Positive => "Must be positive".to_string(),
            Constraint::NonNegative => "Must be non-negative".to_string(),
            Constraint::OneOf(options) => format!("One of: {}", options.join(", ")),
        }
    }
}

/// Convert snake_case name to Title Case display name.
fn name_to_display(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolved parameters handed to a filter factory.
///
/// Built by completing a request with the filter's defaults, so every
/// declared parameter is present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    values: IndexMap<String, Value>,
}

impl FilterParams {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `overrides` against `definitions` and fill in defaults.
    pub fn resolve(
        definitions: &[ParameterDefinition],
        overrides: &IndexMap<String, Value>,
    ) -> ImagingResult<Self> {
        if let Some(unknown) = overrides
            .keys()
            .find(|name| !definitions.iter().any(|d| &d.name == *name))
        {
            return Err(ImagingError::invalid_parameter(
                unknown.as_str(),
                &overrides[unknown.as_str()],
                "not a parameter of this filter",
            ));
        }

        let mut values = IndexMap::with_capacity(definitions.len());
        for definition in definitions {
            let value = match overrides.get(&definition.name) {
                Some(value) => {
                    definition.validate(value).map_err(|reason| {
                        ImagingError::invalid_parameter(definition.name.as_str(), value, reason)
                    })?;
                    value.clone()
                }
                None => definition.default_value.clone(),
            };
            values.insert(definition.name.clone(), value);
        }
        Ok(Self { values })
    }

    /// Set a value directly.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Get a raw value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Get a parameter as an integer.
    pub fn integer(&self, name: &str) -> ImagingResult<i64> {
        let value = self.require(name)?;
        value
            .as_integer()
            .ok_or_else(|| ImagingError::invalid_parameter(name, value, "expected an integer"))
    }

    /// Get a parameter as a float.
    pub fn float(&self, name: &str) -> ImagingResult<f64> {
        let value = self.require(name)?;
        value
            .as_float()
            .ok_or_else(|| ImagingError::invalid_parameter(name, value, "expected a number"))
    }

    /// Get a parameter as a string.
    pub fn string(&self, name: &str) -> ImagingResult<&str> {
        let value = self.require(name)?;
        value
            .as_string()
            .ok_or_else(|| ImagingError::invalid_parameter(name, value, "expected a string"))
    }

    /// Number of resolved parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, name: &str) -> ImagingResult<&Value> {
        self.values.get(name).ok_or_else(|| {
            ImagingError::invalid_parameter(name, "<missing>", "parameter is required")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions() -> Vec<ParameterDefinition> {
        vec![
            ParameterDefinition::new("kernel_size", ParamType::Integer, Value::Integer(3)),
            ParameterDefinition::new("sigma", ParamType::Float, Value::Float(1.0))
                .with_constraint(Constraint::Positive),
            ParameterDefinition::new("element", ParamType::String, Value::from("square"))
                .with_constraint(Constraint::OneOf(vec!["square".into(), "disk".into()])),
        ]
    }

    #[test]
    fn test_display_name() {
        let def = ParameterDefinition::new("sigma_spatial", ParamType::Float, Value::Float(1.0));
        assert_eq!(def.display_name, "Sigma Spatial");
    }

    #[test]
    fn test_constraint_range_validation() {
        let constraint = Constraint::Range { min: 0.0, max: 255.0 };

        assert!(constraint.validate(&Value::Float(0.0)).is_ok());
        assert!(constraint.validate(&Value::Integer(255)).is_ok());
        assert!(constraint.validate(&Value::Float(-0.5)).is_err());
        assert!(constraint.validate(&Value::Float(255.5)).is_err());
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let mut overrides = IndexMap::new();
        overrides.insert("sigma".to_string(), Value::Integer(2));
        let params = FilterParams::resolve(&definitions(), &overrides).unwrap();

        assert_eq!(params.len(), 3);
        assert_eq!(params.integer("kernel_size").unwrap(), 3);
        assert_eq!(params.float("sigma").unwrap(), 2.0);
        assert_eq!(params.string("element").unwrap(), "square");
    }

    #[test]
    fn test_resolve_rejects_unknown_and_invalid() {
        let mut overrides = IndexMap::new();
        overrides.insert("radius".to_string(), Value::Integer(2));
        let err = FilterParams::resolve(&definitions(), &overrides).unwrap_err();
        assert!(matches!(err, ImagingError::InvalidParameter { ref name, .. } if name == "radius"));

        let mut overrides = IndexMap::new();
        overrides.insert("element".to_string(), Value::from("hexagon"));
        assert!(FilterParams::resolve(&definitions(), &overrides).is_err());

        let mut overrides = IndexMap::new();
        overrides.insert("kernel_size".to_string(), Value::Float(3.5));
        assert!(FilterParams::resolve(&definitions(), &overrides).is_err());
    }

    #[test]
    fn test_missing_parameter() {
        let params = FilterParams::new();
        assert!(params.integer("kernel_size").is_err());
    }
}
