//! Symbolic circuit parameters
//!
//! Gantree: L1_Circuit → Parameter
//!
//! A [`Parameter`] is a handle compared by identity, not by name: two
//! parameters both called `theta` are different parameters. Clones share
//! the identity of the original.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_PARAMETER_ID: AtomicU64 = AtomicU64::new(1);

/// Unique parameter identity
pub type ParameterId = u64;

/// Symbolic parameter handle
/// Gantree: Parameter // 심볼 파라미터
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    /// Display name (not used for equality)
    name: String,

    /// Process-unique identity
    id: ParameterId,
}

impl Parameter {
    /// Create a fresh parameter with a new identity
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: NEXT_PARAMETER_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Parameter name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter identity
    pub fn id(&self) -> ParameterId {
        self.id
    }

    /// `coeff * self + offset` as an expression
    pub fn scaled(&self, coeff: f64, offset: f64) -> ParamExpr {
        ParamExpr::Linear {
            param: self.clone(),
            coeff,
            offset,
        }
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Parameter {}

impl Hash for Parameter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ============================================================================
// ParameterVector
// ============================================================================

/// Indexed family of parameters `prefix[0] .. prefix[n-1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterVector {
    prefix: String,
    params: Vec<Parameter>,
}

impl ParameterVector {
    /// Create `n` fresh parameters
    pub fn new(prefix: impl Into<String>, n: usize) -> Self {
        let prefix = prefix.into();
        let params = (0..n)
            .map(|i| Parameter::new(format!("{}[{}]", prefix, i)))
            .collect();
        Self { prefix, params }
    }

    /// Name prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameter at index
    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.params.get(index)
    }

    /// All parameters
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }
}

impl std::ops::Index<usize> for ParameterVector {
    type Output = Parameter;

    fn index(&self, index: usize) -> &Self::Output {
        &self.params[index]
    }
}

// ============================================================================
// ParamExpr
// ============================================================================

/// Gate angle: a fixed value or an affine function of one parameter
/// Gantree: ParamExpr // 각도 표현식
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamExpr {
    /// Fixed angle
    Value(f64),

    /// `coeff * param + offset`
    Linear {
        /// Referenced parameter
        param: Parameter,
        /// Multiplier
        coeff: f64,
        /// Additive offset
        offset: f64,
    },
}

impl ParamExpr {
    /// Referenced parameter, if any
    pub fn parameter(&self) -> Option<&Parameter> {
        match self {
            ParamExpr::Value(_) => None,
            ParamExpr::Linear { param, .. } => Some(param),
        }
    }

    /// Check if the expression depends on a parameter
    pub fn is_parameterized(&self) -> bool {
        self.parameter().is_some()
    }

    /// Evaluate given the bound value of the referenced parameter
    pub fn evaluate(&self, bound: Option<f64>) -> f64 {
        match self {
            ParamExpr::Value(v) => *v,
            ParamExpr::Linear { coeff, offset, .. } => coeff * bound.unwrap_or(0.0) + offset,
        }
    }
}

impl From<f64> for ParamExpr {
    fn from(value: f64) -> Self {
        ParamExpr::Value(value)
    }
}

impl From<Parameter> for ParamExpr {
    fn from(param: Parameter) -> Self {
        ParamExpr::Linear {
            param,
            coeff: 1.0,
            offset: 0.0,
        }
    }
}

impl From<&Parameter> for ParamExpr {
    fn from(param: &Parameter) -> Self {
        param.clone().into()
    }
}

impl fmt::Display for ParamExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamExpr::Value(v) => write!(f, "{:.6}", v),
            ParamExpr::Linear {
                param,
                coeff,
                offset,
            } => {
                if *coeff == 1.0 && *offset == 0.0 {
                    write!(f, "{}", param)
                } else {
                    write!(f, "{}*{} + {}", coeff, param, offset)
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
